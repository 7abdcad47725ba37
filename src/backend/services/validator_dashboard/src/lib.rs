//! Logic layer behind the validator operations dashboard: log stream
//! filtering, proposer duty alerts, account earnings and the withdrawal
//! credential step of the validator creation wizard.

pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

pub use utils::errors::{DashboardError, Result};
