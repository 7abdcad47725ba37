use serde::Serialize;

use crate::models::currency::ExchangeRateTable;
use crate::models::validator::{BalanceSeries, ValidatorBalanceInfo, ValidatorInfo};
use crate::utils::format::{format_local_currency, DEFAULT_MAX_FRACTION_DIGITS};

/// Income of one validator over the aggregated window
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidatorIncomeSummary {
    pub earnings: f64,
    pub earnings_display: String,
}

impl ValidatorIncomeSummary {
    pub fn from_balances(info: &ValidatorBalanceInfo, index: u64) -> Self {
        let earnings = info
            .validators
            .get(&index)
            .map(BalanceSeries::earnings)
            .unwrap_or(0.0);

        Self {
            earnings,
            earnings_display: format!("{} ETH", format_local_currency(Some(earnings), 4)),
        }
    }
}

/// Headline figures shown next to a single validator
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BasicValidatorMetrics {
    pub eth_rate_display: String,
    pub balance_display: String,
    pub income: ValidatorIncomeSummary,
}

pub fn basic_validator_metrics(
    info: &ValidatorBalanceInfo,
    validator: &ValidatorInfo,
    rates: &ExchangeRateTable,
) -> BasicValidatorMetrics {
    let usd_rate = rates.rates.get("USD").copied();
    let balance = if validator.balance.is_finite() {
        validator.balance
    } else {
        0.0
    };

    BasicValidatorMetrics {
        eth_rate_display: format!(
            "${}",
            format_local_currency(usd_rate, DEFAULT_MAX_FRACTION_DIGITS)
        ),
        balance_display: format!("{:.2}", balance),
        income: ValidatorIncomeSummary::from_balances(info, validator.index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn validator(balance: f64) -> ValidatorInfo {
        ValidatorInfo {
            index: 4,
            pubkey: "0xabc".to_string(),
            name: "home".to_string(),
            status: "active_ongoing".to_string(),
            balance,
        }
    }

    #[test]
    fn test_metrics_without_rates_or_history() {
        let metrics = basic_validator_metrics(
            &ValidatorBalanceInfo::default(),
            &validator(32.0125),
            &ExchangeRateTable::default(),
        );

        assert_eq!(metrics.eth_rate_display, "$0.00");
        assert_eq!(metrics.balance_display, "32.01");
        assert_eq!(metrics.income.earnings, 0.0);
    }

    #[test]
    fn test_metrics_with_history() {
        let mut info = ValidatorBalanceInfo::default();
        info.validators.insert(
            4,
            BalanceSeries {
                epochs: vec![100, 325],
                balances: vec![32.0, 32.25],
            },
        );

        let mut rates = BTreeMap::new();
        rates.insert("USD".to_string(), 3120.456);

        let metrics =
            basic_validator_metrics(&info, &validator(32.25), &ExchangeRateTable::new(rates));
        assert_eq!(metrics.eth_rate_display, "$3,120.46");
        assert_eq!(metrics.income.earnings_display, "0.25 ETH");
    }
}
