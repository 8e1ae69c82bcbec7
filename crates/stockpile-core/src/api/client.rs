//! API client for the warehouse REST endpoints.
//!
//! This module provides the `ApiClient` struct for talking to the remote
//! product, movement, user and write-off act endpoints, plus the advisory
//! external barcode lookup.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionData;
use crate::models::{
    ActsResponse, BarcodeInfo, Movement, MovementsResponse, NewMovement, Product,
    ProductsResponse, User, UsersResponse, WriteOffAct,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the warehouse endpoints. Overridable via config or
/// the STOCKPILE_API_BASE environment variable.
const DEFAULT_API_BASE: &str = "https://warehouse-api.stockpile.app";

/// Base URL for the external barcode lookup (Open Food Facts).
const BARCODE_LOOKUP_BASE: &str = "https://world.openfoodfacts.org/api/v0/product";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Header carrying the authenticated operator's id on mutating requests.
const USER_ID_HEADER: &str = "X-User-Id";

// ============================================================================
// Endpoints
// ============================================================================

/// Resolved URLs for each remote resource.
///
/// The backend deploys each resource as its own function URL, so every
/// resource gets an independent entry rather than a single base.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub products: String,
    pub movements: String,
    pub users: String,
    pub writeoff_acts: String,
}

impl Endpoints {
    /// Derive all resource URLs from a single base URL.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            products: format!("{}/products", base),
            movements: format!("{}/movements", base),
            users: format!("{}/users", base),
            writeoff_acts: format!("{}/writeoff-acts", base),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_base(DEFAULT_API_BASE)
    }
}

// ============================================================================
// Client
// ============================================================================

/// API client for the warehouse backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: Endpoints,
    user_id: Option<i64>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoints,
            user_id: None,
        })
    }

    /// Set the operator id sent with authenticated requests
    pub fn set_user(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
    }

    /// Create a new ApiClient acting as the given operator, sharing the
    /// connection pool.
    pub fn with_user(&self, user_id: i64) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            endpoints: self.endpoints.clone(),
            user_id: Some(user_id),
        }
    }

    /// Verify operator credentials against the users endpoint and return
    /// session data for the authenticated operator.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<SessionData> {
        let body = serde_json::json!({
            "action": "login",
            "username": username,
            "password": password,
        });

        let response = self
            .client
            .post(&self.endpoints.users)
            .json(&body)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;
        let login: LoginResponse = response.json().await.context("Failed to parse login response")?;

        Ok(SessionData {
            user_id: login.user.id,
            username: login.user.username,
            display_name: login.user.name,
            role: login.user.role,
            created_at: Utc::now(),
        })
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(user_id) = self.user_id {
            headers.insert(
                USER_ID_HEADER,
                header::HeaderValue::from_str(&user_id.to_string())?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            // Rate limited - signal to retry
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    // Rate limited
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn post<B: Serialize>(&self, url: &str, body: &B) -> Result<reqwest::Response> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .post(url)
                .headers(self.auth_headers()?)
                .json(body)
                .send()
                .await
                .with_context(|| format!("Failed to send POST request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    // Rate limited
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch the full product catalog with current stock levels
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        let response: ProductsResponse = self.get(&self.endpoints.products).await?;
        debug!(count = response.products.len(), "Products fetched");
        Ok(response.products)
    }

    /// Fetch recent stock movements
    pub async fn fetch_movements(&self) -> Result<Vec<Movement>> {
        let response: MovementsResponse = self.get(&self.endpoints.movements).await?;
        debug!(count = response.movements.len(), "Movements fetched");
        Ok(response.movements.iter().map(|m| m.to_movement()).collect())
    }

    /// Post a stock movement (incoming or outgoing)
    pub async fn create_movement(&self, movement: &NewMovement) -> Result<()> {
        let response = self.post(&self.endpoints.movements, movement).await?;
        // The created record comes back in the body; nothing here needs it.
        let _ = response.bytes().await;
        Ok(())
    }

    /// Fetch all operator accounts
    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let response: UsersResponse = self.get(&self.endpoints.users).await?;
        Ok(response.users)
    }

    /// Fetch saved write-off acts
    pub async fn fetch_acts(&self) -> Result<Vec<WriteOffAct>> {
        let response: ActsResponse = self.get(&self.endpoints.writeoff_acts).await?;
        Ok(response.acts)
    }

    /// Look up an unknown barcode in the external product database.
    ///
    /// Advisory only: a miss (or any parse oddity) is Ok(None), not an
    /// error. Network failures still surface as Err so the caller can tell
    /// "not found" from "could not ask".
    pub async fn lookup_barcode(&self, code: &str) -> Result<Option<BarcodeInfo>> {
        let url = format!("{}/{}.json", BARCODE_LOOKUP_BASE, code);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send barcode lookup request")?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        debug!(code, "Barcode lookup response received");
        Ok(parse_barcode_lookup(code, &text))
    }
}

// Internal API response types for parsing

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    status: i64,
    product: Option<LookupProduct>,
}

#[derive(Debug, Deserialize)]
struct LookupProduct {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    generic_name: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default)]
    categories: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_front_url: Option<String>,
}

fn parse_barcode_lookup(code: &str, body: &str) -> Option<BarcodeInfo> {
    let parsed: LookupResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "Failed to parse barcode lookup response");
            return None;
        }
    };

    if parsed.status != 1 {
        return None;
    }
    let product = parsed.product?;

    let name = product
        .product_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Unidentified product".to_string());

    Some(BarcodeInfo {
        barcode: code.to_string(),
        name,
        brand: product.brands,
        category: product.categories,
        description: product.generic_name,
        image: product.image_url.or(product.image_front_url),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_base() {
        let endpoints = Endpoints::from_base("https://api.example.com/");
        assert_eq!(endpoints.products, "https://api.example.com/products");
        assert_eq!(endpoints.writeoff_acts, "https://api.example.com/writeoff-acts");
    }

    #[test]
    fn test_parse_barcode_lookup_hit() {
        let json = r#"{"status": 1, "product": {
            "product_name": "Sparkling water",
            "brands": "Aqua",
            "categories": "Beverages",
            "generic_name": "Carbonated mineral water",
            "image_url": "https://images.example/1.jpg"
        }}"#;

        let info = parse_barcode_lookup("4600000000017", json).expect("lookup hit");
        assert_eq!(info.name, "Sparkling water");
        assert_eq!(info.brand.as_deref(), Some("Aqua"));
        assert_eq!(info.barcode, "4600000000017");
    }

    #[test]
    fn test_parse_barcode_lookup_miss() {
        assert!(parse_barcode_lookup("123", r#"{"status": 0}"#).is_none());
        assert!(parse_barcode_lookup("123", "not json at all").is_none());
        assert!(parse_barcode_lookup("123", r#"{"status": 1}"#).is_none());
    }

    #[test]
    fn test_parse_barcode_lookup_unnamed_product() {
        let json = r#"{"status": 1, "product": {"brands": "NoName"}}"#;
        let info = parse_barcode_lookup("123", json).expect("lookup hit");
        assert_eq!(info.name, "Unidentified product");
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"user": {"id": 1, "username": "admin", "name": "Administrator", "role": "admin"}}"#;
        let login: LoginResponse = serde_json::from_str(json).expect("parse login");
        assert_eq!(login.user.id, 1);
        assert!(login.user.is_admin());
    }
}
