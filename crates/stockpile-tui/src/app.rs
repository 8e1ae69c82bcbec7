//! Application state management for the stockpile console.
//!
//! This module contains the core `App` struct that manages all application
//! state: UI state, the live product/movement view, the scanning session,
//! operator login, and background refresh coordination.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use stockpile_core::api::ApiClient;
use stockpile_core::auth::{CredentialStore, Session};
use stockpile_core::cache::{Connectivity, SnapshotStore};
use stockpile_core::config::Config;
use stockpile_core::models::{BarcodeInfo, Movement, Product, User, WriteOffAct};
use stockpile_core::report;
use stockpile_core::scan::{ReceivingSession, ScanBuffer, ScanKey, ScanOutcome};
use stockpile_core::store::{DataSource, RefreshOutcome, StockStore};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A refresh produces a handful of messages; 32 leaves headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Stock,
    Receive,
    History,
    Acts,
    Users,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Stock => "Stock",
            Tab::Receive => "Receive",
            Tab::History => "History",
            Tab::Acts => "Acts",
            Tab::Users => "Users",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Stock,
            Tab::Stock => Tab::Receive,
            Tab::Receive => Tab::History,
            Tab::History => Tab::Acts,
            Tab::Acts => Tab::Users,
            Tab::Users => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Users,
            Tab::Stock => Tab::Dashboard,
            Tab::Receive => Tab::Stock,
            Tab::History => Tab::Receive,
            Tab::Acts => Tab::History,
            Tab::Users => Tab::Acts,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    ConfirmingReset,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background tasks, sent through an MPSC channel back to
/// the main application.
enum TaskResult {
    /// Outcome of a catalog refresh plus the snapshot's age for the status bar
    Catalog {
        outcome: RefreshOutcome,
        cache_age: String,
    },
    /// Saved write-off acts fetched successfully
    Acts(Vec<WriteOffAct>),
    /// Operator accounts fetched successfully
    Users(Vec<User>),
    /// Receiving session posted: how many movements went through
    MovementsPosted { posted: usize, failed: usize },
    /// Advisory barcode lookup finished (hit or miss)
    BarcodeLookup {
        code: String,
        info: Option<BarcodeInfo>,
    },
    /// Offline snapshot was cleared
    SnapshotCleared(Result<(), String>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,
    store: Arc<Mutex<StockStore<ApiClient>>>,
    connectivity: Arc<Connectivity>,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub search_query: String,

    // Live data view
    pub products: Vec<Product>,
    pub movements: Vec<Movement>,
    pub data_source: DataSource,
    pub acts: Vec<WriteOffAct>,
    pub users: Vec<User>,

    // Scanning
    pub scanner: ScanBuffer,
    pub receiving: ReceivingSession,
    pub lookup_result: Option<BarcodeInfo>,

    // Selection indices
    pub stock_selection: usize,
    pub history_selection: usize,
    pub receive_selection: usize,
    pub acts_selection: usize,
    pub users_selection: usize,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    // Status bar
    pub status_message: Option<String>,
    pub last_sync: String,
    pub offline_mode: bool,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = config.data_dir()?;
        debug!(?data_dir, "Data directory configured");

        let mut session = Session::new(data_dir.clone());
        let load_result = session.load();
        debug!(?load_result, has_data = session.data.is_some(), "Session loaded");

        let mut api = ApiClient::new(config.endpoints())?;
        if let Some(user_id) = session.user_id() {
            api.set_user(user_id);
        }

        let snapshots = SnapshotStore::open(data_dir)?;
        let offline_mode = config.offline_mode;
        let connectivity = Arc::new(Connectivity::new(!offline_mode));

        let store = StockStore::new(api.clone(), snapshots, Arc::clone(&connectivity));

        // Show whatever the snapshot holds until the first refresh lands
        let initial = store.cached_view();
        let last_sync = store.snapshots().snapshot().age_display();

        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = std::env::var("STOCKPILE_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var("STOCKPILE_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,
            store: Arc::new(Mutex::new(store)),
            connectivity,

            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            search_query: String::new(),

            products: initial.products,
            movements: initial.movements,
            data_source: DataSource::CachedOffline,
            acts: Vec::new(),
            users: Vec::new(),

            scanner: ScanBuffer::new(),
            receiving: ReceivingSession::new(),
            lookup_result: None,

            stock_selection: 0,
            history_selection: 0,
            receive_selection: 0,
            acts_selection: 0,
            users_selection: 0,

            login_username,
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            task_rx,
            task_tx,

            status_message: None,
            last_sync,
            offline_mode,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Check if the operator has a valid session
    pub fn is_authenticated(&self) -> bool {
        self.session.is_valid()
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.clone();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.login_error = None;

        match self.api.authenticate(&username, &password).await {
            Ok(session_data) => {
                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.api.set_user(session_data.user_id);
                self.session.update(session_data);
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let text = e.to_string().to_lowercase();
                let user_message = if text.contains("unauthorized") || text.contains("401") {
                    "Invalid username or password".to_string()
                } else if text.contains("network") || text.contains("connect") {
                    "Unable to connect to server. Check your internet connection.".to_string()
                } else if text.contains("timeout") {
                    "Connection timed out. Please try again.".to_string()
                } else {
                    format!("Login failed: {}", e)
                };
                self.login_error = Some(user_message);
                Err(e)
            }
        }
    }

    pub fn can_add_username_char(&self) -> bool {
        self.login_username.len() < MAX_USERNAME_LENGTH
    }

    pub fn can_add_password_char(&self) -> bool {
        self.login_password.len() < MAX_PASSWORD_LENGTH
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task running the refresh protocol, then fetching
    /// acts and users while the connection is known to work.
    pub fn refresh_background(&mut self) {
        info!("Starting background refresh");
        let store = Arc::clone(&self.store);
        let api = self.api.clone();
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            // The store mutex serializes overlapping refresh requests
            let (outcome, cache_age) = {
                let mut store = store.lock().await;
                let outcome = store.refresh().await;
                let cache_age = store.snapshots().snapshot().age_display();
                (outcome, cache_age)
            };
            let reached_network = outcome.source == DataSource::Network;
            Self::send_result(&tx, TaskResult::Catalog { outcome, cache_age }).await;

            if reached_network {
                match api.fetch_acts().await {
                    Ok(acts) => Self::send_result(&tx, TaskResult::Acts(acts)).await,
                    Err(e) => debug!(error = %e, "Failed to fetch write-off acts"),
                }
                match api.fetch_users().await {
                    Ok(users) => Self::send_result(&tx, TaskResult::Users(users)).await,
                    Err(e) => debug!(error = %e, "Failed to fetch users"),
                }
            }
        });

        self.status_message = Some("Refreshing data...".to_string());
    }

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Catalog { outcome, cache_age } => {
                self.products = outcome.products;
                self.movements = outcome.movements;
                self.data_source = outcome.source;
                self.last_sync = cache_age;
                self.clamp_selections();

                if let Some(ref message) = outcome.error {
                    debug!(error = %message, "Refresh degraded");
                }
                self.status_message = outcome.source.notice().map(str::to_string);
            }
            TaskResult::Acts(acts) => {
                debug!(count = acts.len(), "Write-off acts fetched");
                self.acts = acts;
                self.clamp_selections();
            }
            TaskResult::Users(users) => {
                debug!(count = users.len(), "Users fetched");
                self.users = users;
                self.clamp_selections();
            }
            TaskResult::MovementsPosted { posted, failed } => {
                if failed == 0 {
                    self.status_message = Some(format!("Receiving posted: {} movements", posted));
                } else {
                    self.status_message = Some(format!(
                        "Receiving posted: {} ok, {} failed",
                        posted, failed
                    ));
                }
                // Stock levels changed server-side; pick them up
                self.refresh_background();
            }
            TaskResult::BarcodeLookup { code, info } => {
                match &info {
                    Some(found) => {
                        self.status_message =
                            Some(format!("Found in product database: {}", found.summary()));
                    }
                    None => {
                        self.status_message =
                            Some(format!("Code {} not found in catalog or database", code));
                    }
                }
                self.lookup_result = info;
            }
            TaskResult::SnapshotCleared(result) => match result {
                Ok(()) => {
                    self.last_sync = "never".to_string();
                    self.status_message = Some("Offline data cleared".to_string());
                }
                Err(e) => {
                    self.status_message = Some(format!("Error: {}", e));
                }
            },
        }
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Arm or disarm the scanner. Disarming discards any in-progress buffer.
    pub fn toggle_scanning(&mut self) {
        if self.scanner.is_armed() {
            self.scanner.disarm();
            self.status_message = Some("Scanning stopped".to_string());
        } else {
            self.scanner.arm();
            self.status_message = Some("Scanning - listening for scanner input".to_string());
        }
    }

    /// Called every event-loop tick so the scan inactivity window can lapse
    /// without further keystrokes.
    pub fn tick(&mut self) {
        self.scanner.poll(Instant::now());
    }

    /// Feed an armed-mode keystroke to the scan buffer, handling a
    /// completed code if this keystroke terminated one.
    pub fn handle_scanner_key(&mut self, key: ScanKey) {
        if let Some(code) = self.scanner.handle_key(key, Instant::now()) {
            self.handle_scan(code);
        }
    }

    /// A completed scan: match it against the catalog, or fall back to the
    /// advisory external lookup.
    fn handle_scan(&mut self, code: String) {
        match self.receiving.record_scan(&code, &self.products) {
            ScanOutcome::Matched { name, quantity } => {
                self.lookup_result = None;
                self.receive_selection = 0;
                self.status_message = Some(format!("Scanned: {} (total {})", name, quantity));
            }
            ScanOutcome::Unmatched { code } => {
                info!(code = %code, "Scan did not match catalog, trying external lookup");
                self.status_message = Some(format!("Code {} not in catalog - searching...", code));

                let api = self.api.clone();
                let tx = self.task_tx.clone();
                tokio::spawn(async move {
                    let info = match api.lookup_barcode(&code).await {
                        Ok(info) => info,
                        Err(e) => {
                            // Lookup failure is informational, same as a miss
                            debug!(error = %e, "Barcode lookup failed");
                            None
                        }
                    };
                    Self::send_result(&tx, TaskResult::BarcodeLookup { code, info }).await;
                });
            }
        }
    }

    /// Post the pending receiving session as incoming movements.
    pub fn submit_receiving(&mut self) {
        if self.receiving.is_empty() {
            self.status_message = Some("Nothing scanned yet".to_string());
            return;
        }
        if !self.session.is_admin() {
            self.status_message = Some("Admin role required to post movements".to_string());
            return;
        }
        if !self.connectivity.is_online() {
            self.status_message = Some("Cannot post while offline".to_string());
            return;
        }

        let user_name = self
            .session
            .display_name()
            .unwrap_or("operator")
            .to_string();
        let movements = self.receiving.drain_movements(&user_name);
        let count = movements.len();
        info!(count, "Posting receiving session");

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let results = join_all(
                movements
                    .iter()
                    .map(|movement| api.create_movement(movement)),
            )
            .await;
            let failed = results.iter().filter(|r| r.is_err()).count();
            for e in results.iter().filter_map(|r| r.as_ref().err()) {
                warn!(error = %e, "Failed to post movement");
            }
            Self::send_result(
                &tx,
                TaskResult::MovementsPosted {
                    posted: count - failed,
                    failed,
                },
            )
            .await;
        });

        self.status_message = Some("Posting receiving session...".to_string());
    }

    // =========================================================================
    // Offline mode / snapshot management
    // =========================================================================

    /// Toggle offline mode: the connectivity flag flips and the next
    /// refresh serves the snapshot without touching the network.
    pub fn toggle_offline(&mut self) {
        self.offline_mode = !self.offline_mode;
        self.connectivity.set_online(!self.offline_mode);
        self.config.offline_mode = self.offline_mode;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
        self.refresh_background();
    }

    /// Explicit "reset offline data" action (behind a confirmation).
    pub fn reset_offline_data(&mut self) {
        let store = Arc::clone(&self.store);
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = store
                .lock()
                .await
                .clear_snapshot()
                .map_err(|e| e.to_string());
            Self::send_result(&tx, TaskResult::SnapshotCleared(result)).await;
        });
    }

    // =========================================================================
    // Write-off acts
    // =========================================================================

    /// Render the selected act to a printable text file in the data
    /// directory; the platform print flow takes it from there.
    pub fn export_selected_act(&mut self) {
        let Some(act) = self.acts.get(self.acts_selection) else {
            self.status_message = Some("No act selected".to_string());
            return;
        };

        let document = report::render_act(act);
        let result = self.config.data_dir().and_then(|dir| {
            let acts_dir = dir.join("acts");
            std::fs::create_dir_all(&acts_dir)?;
            let path = acts_dir.join(format!("act_{}.txt", act.act_number.replace('/', "-")));
            std::fs::write(&path, document)?;
            Ok(path)
        });

        match result {
            Ok(path) => {
                info!(path = %path.display(), "Act exported");
                self.status_message = Some(format!("Act exported to {}", path.display()));
            }
            Err(e) => {
                error!(error = %e, "Failed to export act");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Products filtered by the current search query (name or inventory
    /// number, case-insensitive).
    pub fn filtered_products(&self) -> Vec<&Product> {
        if self.search_query.is_empty() {
            return self.products.iter().collect();
        }
        let query = self.search_query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.inventory_number.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Number of products at or below their minimum-stock threshold.
    pub fn low_stock_count(&self) -> usize {
        self.products
            .iter()
            .filter(|p| p.status().is_below_threshold())
            .count()
    }

    /// Total stock value across the catalog.
    pub fn total_stock_value(&self) -> f64 {
        self.products.iter().map(|p| p.line_value()).sum()
    }

    /// Total units on hand across the catalog.
    pub fn total_units(&self) -> f64 {
        self.products.iter().map(|p| p.quantity).sum()
    }

    /// Move the active tab's selection by `delta`, clamped to its list.
    pub fn move_selection(&mut self, delta: i64) {
        let len = match self.current_tab {
            Tab::Dashboard => return,
            Tab::Stock => self.filtered_products().len(),
            Tab::Receive => self.receiving.lines().len(),
            Tab::History => self.movements.len(),
            Tab::Acts => self.acts.len(),
            Tab::Users => self.users.len(),
        };
        let selection = match self.current_tab {
            Tab::Dashboard => return,
            Tab::Stock => &mut self.stock_selection,
            Tab::Receive => &mut self.receive_selection,
            Tab::History => &mut self.history_selection,
            Tab::Acts => &mut self.acts_selection,
            Tab::Users => &mut self.users_selection,
        };
        if len == 0 {
            *selection = 0;
            return;
        }
        let current = *selection as i64;
        *selection = current.saturating_add(delta).clamp(0, len as i64 - 1) as usize;
    }

    fn clamp_selections(&mut self) {
        self.stock_selection = self
            .stock_selection
            .min(self.filtered_products().len().saturating_sub(1));
        self.history_selection = self.history_selection.min(self.movements.len().saturating_sub(1));
        self.receive_selection = self
            .receive_selection
            .min(self.receiving.lines().len().saturating_sub(1));
        self.acts_selection = self.acts_selection.min(self.acts.len().saturating_sub(1));
        self.users_selection = self.users_selection.min(self.users.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_round_trip() {
        let mut tab = Tab::Dashboard;
        for _ in 0..6 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Users);
        assert_eq!(Tab::Users.next(), Tab::Dashboard);
    }

    #[test]
    fn test_tab_titles() {
        assert_eq!(Tab::Receive.title(), "Receive");
        assert_eq!(Tab::Acts.title(), "Acts");
    }
}
