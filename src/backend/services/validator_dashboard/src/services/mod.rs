pub mod alert_service;
pub mod credential_service;
pub mod earnings_service;
pub mod log_service;
pub mod metrics_service;
pub mod search_debouncer;
