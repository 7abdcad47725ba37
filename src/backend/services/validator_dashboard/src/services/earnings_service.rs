use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::currency::{formatted_prefix, ExchangeRateTable, DEFAULT_CURRENCY};
use crate::models::validator::{
    BalanceSeries, Epoch, ValidatorBalanceInfo, ValidatorCache, ValidatorIndex, ValidatorInfo,
    EPOCHS_PER_DAY, EPOCHS_PER_YEAR,
};
use crate::repositories::traits::{PreferenceRepository, Storage};
use crate::utils::errors::Result;
use crate::utils::format::{
    format_local_currency, format_percentage, DEFAULT_MAX_FRACTION_DIGITS,
};

/// Fold validator states and their cached balance history into
/// per-validator series and per-epoch totals.
///
/// Validators without cache entries and snapshots without a usable
/// balance are skipped, so the result degrades towards zero instead of
/// failing. Each validator index is counted once. Totals only cover
/// epochs for which every aggregated validator has a balance.
pub fn aggregate(states: &[ValidatorInfo], cache: &ValidatorCache) -> ValidatorBalanceInfo {
    let mut validators: BTreeMap<ValidatorIndex, BalanceSeries> = BTreeMap::new();

    for state in states {
        if validators.contains_key(&state.index) {
            continue;
        }
        let snapshots = match cache.get(&state.index) {
            Some(snapshots) => snapshots,
            None => {
                debug!(index = state.index, "No cached balances for validator");
                continue;
            }
        };

        let mut usable: Vec<(Epoch, f64)> = snapshots
            .iter()
            .filter_map(|s| s.usable_balance().map(|balance| (s.epoch, balance)))
            .collect();
        usable.sort_by_key(|(epoch, _)| *epoch);
        usable.dedup_by_key(|(epoch, _)| *epoch);

        let mut series = BalanceSeries::default();
        for (epoch, balance) in usable {
            series.push(epoch, balance);
        }
        if !series.is_empty() {
            validators.insert(state.index, series);
        }
    }

    let mut totals: BTreeMap<Epoch, (usize, f64)> = BTreeMap::new();
    for series in validators.values() {
        for (epoch, balance) in series.epochs.iter().zip(&series.balances) {
            let entry = totals.entry(*epoch).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += balance;
        }
    }
    let (epochs, totals) = totals
        .into_iter()
        .filter(|(_, (count, _))| *count == validators.len())
        .map(|(epoch, (_, total))| (epoch, total))
        .unzip();

    ValidatorBalanceInfo {
        epochs,
        totals,
        validators,
    }
}

/// Time buckets offered for earnings estimates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EarningsOption {
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl EarningsOption {
    pub const ALL: [EarningsOption; 4] = [
        EarningsOption::Daily,
        EarningsOption::Weekly,
        EarningsOption::Monthly,
        EarningsOption::Annual,
    ];

    pub fn epochs(&self) -> u64 {
        match self {
            EarningsOption::Daily => EPOCHS_PER_DAY,
            EarningsOption::Weekly => EPOCHS_PER_DAY * 7,
            EarningsOption::Monthly => EPOCHS_PER_DAY * 30,
            EarningsOption::Annual => EPOCHS_PER_YEAR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EarningsOption::Daily => "daily",
            EarningsOption::Weekly => "weekly",
            EarningsOption::Monthly => "monthly",
            EarningsOption::Annual => "annual",
        }
    }
}

impl fmt::Display for EarningsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for EarningsOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EarningsOption::ALL
            .iter()
            .copied()
            .find(|option| option.title().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown earnings option: {}", s))
    }
}

/// Which projection of the aggregated totals is displayed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EarningsEstimate {
    total_earnings: f64,
    earnings_per_epoch: f64,
    selection: Option<EarningsOption>,
}

impl EarningsEstimate {
    pub fn new(info: &ValidatorBalanceInfo) -> Self {
        Self {
            total_earnings: info.total_earnings(),
            earnings_per_epoch: info.earnings_per_epoch(),
            selection: None,
        }
    }

    pub fn total_earnings(&self) -> f64 {
        self.total_earnings
    }

    pub fn selection(&self) -> Option<EarningsOption> {
        self.selection
    }

    pub fn select(&mut self, option: Option<EarningsOption>) {
        self.selection = option;
    }

    /// Projected earnings for the selected bucket, or the total when
    /// nothing is selected.
    pub fn estimate(&self) -> f64 {
        match self.selection {
            Some(option) => self.earnings_per_epoch * option.epochs() as f64,
            None => self.total_earnings,
        }
    }
}

/// How an APR figure should be toned when shown
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AprTone {
    Positive,
    Negative,
    Neutral,
}

impl AprTone {
    pub fn of(apr: Option<f64>) -> Self {
        match apr {
            Some(apr) if apr > 0.0 => AprTone::Positive,
            Some(apr) if apr < 0.0 => AprTone::Negative,
            _ => AprTone::Neutral,
        }
    }
}

/// Annualized growth of the cached balances, as a percentage.
///
/// Averages the rate of every validator with at least two usable
/// snapshots spanning more than one epoch.
pub fn estimate_apr(cache: &ValidatorCache) -> Option<f64> {
    let rates: Vec<f64> = cache
        .values()
        .filter_map(|snapshots| {
            let mut usable = snapshots
                .iter()
                .filter_map(|s| s.usable_balance().map(|balance| (s.epoch, balance)));
            let (first_epoch, first_balance) = usable.next()?;
            let (last_epoch, last_balance) = usable.last()?;

            let span = last_epoch.checked_sub(first_epoch).filter(|span| *span > 0)?;
            if first_balance <= 0.0 {
                return None;
            }
            let growth = (last_balance - first_balance) / first_balance;
            Some(growth * EPOCHS_PER_YEAR as f64 / span as f64 * 100.0)
        })
        .collect();

    if rates.is_empty() {
        return None;
    }
    Some(rates.iter().sum::<f64>() / rates.len() as f64)
}

/// Everything the account earnings panel shows, already formatted
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EarningsSummary {
    pub currency: String,
    pub total_earnings: f64,
    pub total_earnings_display: String,
    pub rate: f64,
    pub rate_display: String,
    pub total_balance: f64,
    pub total_balance_display: String,
    pub time_frame: Option<&'static str>,
    pub estimate: f64,
    pub estimate_display: String,
    pub estimate_fiat: f64,
    pub estimate_fiat_display: String,
    pub apr: Option<f64>,
    pub apr_display: String,
    pub apr_tone: AprTone,
}

/// Earnings of the whole account in the active display currency
#[derive(Debug, Clone, PartialEq)]
pub struct AccountEarnings {
    balance_info: ValidatorBalanceInfo,
    estimate: EarningsEstimate,
    apr: Option<f64>,
    currency: String,
}

impl AccountEarnings {
    pub fn new(
        states: &[ValidatorInfo],
        cache: &ValidatorCache,
        currency: impl Into<String>,
    ) -> Self {
        let balance_info = aggregate(states, cache);
        let estimate = EarningsEstimate::new(&balance_info);

        Self {
            balance_info,
            estimate,
            apr: estimate_apr(cache),
            currency: currency.into(),
        }
    }

    pub fn balance_info(&self) -> &ValidatorBalanceInfo {
        &self.balance_info
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn select_estimate(&mut self, option: Option<EarningsOption>) {
        self.estimate.select(option);
    }

    pub fn estimate(&self) -> &EarningsEstimate {
        &self.estimate
    }

    pub fn summary(&self, rates: &ExchangeRateTable) -> EarningsSummary {
        let currency = self.currency.as_str();
        let prefix = formatted_prefix(currency);
        let rate = rates.rate(currency);

        let total_earnings = self.estimate.total_earnings();
        let total_balance = rate * total_earnings;
        let estimate = self.estimate.estimate();
        let estimate_fiat = rate * estimate;

        EarningsSummary {
            currency: currency.to_string(),
            total_earnings,
            total_earnings_display: format!(
                "{} ETH",
                format_local_currency(Some(total_earnings), 3)
            ),
            rate,
            rate_display: format!(
                "{}{} {}/ETH",
                prefix,
                format_local_currency(Some(rate), DEFAULT_MAX_FRACTION_DIGITS),
                currency
            ),
            total_balance,
            total_balance_display: format!(
                "{}{} {}",
                prefix,
                format_local_currency(Some(total_balance), DEFAULT_MAX_FRACTION_DIGITS),
                currency
            ),
            time_frame: self.estimate.selection().map(|option| option.title()),
            estimate,
            estimate_display: format!("{} ETH", format_local_currency(Some(estimate), 4)),
            estimate_fiat,
            estimate_fiat_display: format!(
                "{}{} {}",
                prefix,
                format_local_currency(Some(estimate_fiat), DEFAULT_MAX_FRACTION_DIGITS),
                currency
            ),
            apr: self.apr,
            apr_display: format_percentage(self.apr),
            apr_tone: AprTone::of(self.apr),
        }
    }
}

/// Loads account earnings with the persisted display currency and
/// records currency changes.
pub struct AccountEarningsService<R> {
    preferences: Arc<R>,
}

impl<R> AccountEarningsService<R>
where
    R: PreferenceRepository,
{
    pub fn new(preferences: Arc<R>) -> Self {
        Self { preferences }
    }

    /// Stored display currency; an unreadable store falls back to the default.
    pub async fn active_currency(&self) -> String {
        match self.preferences.get_preference(Storage::Currency).await {
            Ok(Some(currency)) if !currency.is_empty() => currency,
            Ok(_) => DEFAULT_CURRENCY.to_string(),
            Err(e) => {
                warn!(error = %e, "Failed to read currency preference");
                DEFAULT_CURRENCY.to_string()
            }
        }
    }

    pub async fn load(&self, states: &[ValidatorInfo], cache: &ValidatorCache) -> AccountEarnings {
        let currency = self.active_currency().await;
        AccountEarnings::new(states, cache, currency)
    }

    pub async fn select_currency(
        &self,
        earnings: &mut AccountEarnings,
        currency: &str,
    ) -> Result<()> {
        self.preferences
            .set_preference(Storage::Currency, currency.to_string())
            .await?;
        earnings.currency = currency.to_string();
        Ok(())
    }
}
