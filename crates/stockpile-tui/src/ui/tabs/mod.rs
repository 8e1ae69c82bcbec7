pub mod acts;
pub mod dashboard;
pub mod history;
pub mod receive;
pub mod stock;
pub mod users;
