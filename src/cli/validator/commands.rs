use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use validator_dashboard::{
    models::{currency::ExchangeRateTable, log::LogType},
    repositories::{FilePreferenceRepository, PreferenceRepository, Storage},
    services::{
        alert_service::ProposerAlertBoard,
        credential_service::is_execution_address,
        earnings_service::{AccountEarningsService, EarningsOption},
        log_service::{LogStreams, LogView},
        metrics_service::basic_validator_metrics,
    },
    DashboardError,
};

use crate::{
    config::Config,
    types::{read_json, read_log_lines, read_validator_cache, read_validator_states, DutyGroups},
};

/// Error type for dashboard commands
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Search error: {0}")]
    Search(String),
}

/// Options of the `duties` command
pub struct DutyOptions {
    pub input: PathBuf,
    pub head_slot: u64,
    pub seconds_per_slot: u64,
    pub expand: bool,
    pub dismiss: Vec<String>,
}

/// Options of the `earnings` command
pub struct EarningsOptions {
    pub states: PathBuf,
    pub cache: PathBuf,
    pub rates: Option<PathBuf>,
    pub estimate: Option<EarningsOption>,
    pub validator: Option<u64>,
}

/// Commands for dashboard operations
pub struct DashboardCommands;

impl DashboardCommands {
    /// Print the records of a log stream matching `search`, with its severity counts
    pub async fn logs(
        config: &Config,
        input: &Path,
        log_type: LogType,
        search: Option<&str>,
    ) -> Result<Vec<String>, Error> {
        let mut streams = match config.max_log_records {
            Some(max) => LogStreams::with_capacity_limit(max),
            None => LogStreams::new(),
        };
        streams.extend(log_type, read_log_lines(input)?);

        let mut view = LogView::new(log_type, Duration::from_millis(config.search_debounce_ms));
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let mut changes = view.query_changes();
            view.on_search_text(search);
            changes
                .changed()
                .await
                .map_err(|e| Error::Search(format!("search was dropped: {}", e)))?;
        }

        let metrics = view.metrics(&streams);
        let mut lines = vec![format!(
            "{} logs: {} critical, {} errors, {} warnings",
            log_type, metrics.critical_logs, metrics.error_logs, metrics.warning_logs
        )];

        let rows = view.rows(&streams);
        if rows.is_empty() {
            lines.push("No logs found".to_string());
        }
        for row in rows.iter() {
            lines.push(serde_json::to_string(row).map_err(DashboardError::from)?);
        }

        debug!(rows = rows.len(), query = %view.query(), "Rendered log stream");
        Ok(lines)
    }

    /// Print proposer alert groups relative to the head slot
    pub fn duties(options: &DutyOptions) -> Result<Vec<String>, Error> {
        let groups: DutyGroups = read_json(&options.input)?;
        let mut board = ProposerAlertBoard::new(groups);

        if !options.dismiss.is_empty() {
            let removed = board.dismiss(&options.dismiss);
            info!(removed, "Dismissed proposer duties");
        }
        if options.expand {
            for group in board.groups_mut() {
                group.toggle();
            }
        }

        let mut lines = Vec::new();
        for group in board.groups() {
            if let Some(summary) = group.summary(options.head_slot, options.seconds_per_slot) {
                let hint = if group.is_expanded() { "collapse" } else { "expand" };
                lines.push(format!(
                    "{} [{}] (dismiss: {})",
                    summary,
                    hint,
                    group.dismiss().join(",")
                ));
            }

            let indent = if group.is_full_group() { "  " } else { "" };
            for row in group.rows(options.head_slot, options.seconds_per_slot) {
                let tense = if row.is_future { "will propose" } else { "proposed" };
                let dismiss = if row.is_deletable {
                    format!(" (dismiss: {})", row.duty.uuid)
                } else {
                    String::new()
                };
                lines.push(format!(
                    "{}validator {} {} at slot {} {}{}",
                    indent, row.duty.validator_index, tense, row.duty.slot, row.time, dismiss
                ));
            }
        }

        if lines.is_empty() {
            lines.push("No proposer duties".to_string());
        }
        Ok(lines)
    }

    /// Print the account earnings summary in the stored display currency
    pub async fn earnings(
        config: &Config,
        options: &EarningsOptions,
    ) -> Result<Vec<String>, Error> {
        let states = read_validator_states(&options.states)?;
        let cache = read_validator_cache(&options.cache)?;
        let rates = match &options.rates {
            Some(path) => read_json::<ExchangeRateTable>(path)?,
            None => ExchangeRateTable::default(),
        };

        let repository = Arc::new(FilePreferenceRepository::new(config.preferences_path()));
        let service = AccountEarningsService::new(repository);
        let mut earnings = service.load(&states, &cache).await;
        earnings.select_estimate(options.estimate);

        let summary = earnings.summary(&rates);
        let estimate_label = summary.time_frame.unwrap_or("total");
        let mut lines = vec![
            format!("Account earnings: {}", summary.total_earnings_display),
            format!("Current rate: {}", summary.rate_display),
            format!("Total balance: {}", summary.total_balance_display),
            format!(
                "Estimate ({}): {} / {}",
                estimate_label, summary.estimate_display, summary.estimate_fiat_display
            ),
            format!("Annualized: {} ({:?})", summary.apr_display, summary.apr_tone),
        ];

        if let Some(index) = options.validator {
            let validator = states
                .iter()
                .find(|v| v.index == index)
                .ok_or_else(|| DashboardError::NotFound(format!("validator {}", index)))?;
            let metrics = basic_validator_metrics(earnings.balance_info(), validator, &rates);
            lines.push(format!(
                "Validator {}: ETH rate {}, balance {}, income {}",
                index,
                metrics.eth_rate_display,
                metrics.balance_display,
                metrics.income.earnings_display
            ));
        }

        Ok(lines)
    }

    /// Show or change the display currency
    pub async fn currency(config: &Config, code: Option<&str>) -> Result<String, Error> {
        let repository = Arc::new(FilePreferenceRepository::new(config.preferences_path()));

        match code {
            Some(code) => {
                let code = code.trim().to_ascii_uppercase();
                if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(Error::Parse(format!("invalid currency code: {}", code)));
                }
                repository
                    .set_preference(Storage::Currency, code.clone())
                    .await?;
                Ok(format!("Display currency set to {}", code))
            }
            None => {
                let service = AccountEarningsService::new(repository);
                Ok(format!("Display currency: {}", service.active_currency().await))
            }
        }
    }

    /// Check an address before using it as withdrawal credentials
    pub fn check_credentials(address: &str) -> Result<String, Error> {
        if is_execution_address(address) {
            Ok(format!("{} is a valid execution address", address.trim()))
        } else {
            Err(Error::Parse(format!(
                "{} is not a 0x-prefixed 20 byte address",
                address.trim()
            )))
        }
    }
}
