use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_CURRENCY: &str = "USD";

/// ETH exchange rates keyed by currency code
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRateTable {
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl ExchangeRateTable {
    pub fn new(rates: BTreeMap<String, f64>) -> Self {
        Self { rates }
    }

    /// Rate for `currency`, or 0 when the table has none.
    pub fn rate(&self, currency: &str) -> f64 {
        self.rates
            .get(currency)
            .copied()
            .filter(|r| r.is_finite())
            .unwrap_or(0.0)
    }
}

/// Display symbol for a currency code
pub fn currency_prefix(currency: &str) -> Option<&'static str> {
    let prefix = match currency {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "AUD" => "A$",
        "CAD" => "C$",
        "CHF" => "Fr",
        "HKD" => "HK$",
        "NZD" => "NZ$",
        "SGD" => "S$",
        _ => return None,
    };
    Some(prefix)
}

/// Prefix rendered in front of amounts; multi-character symbols are
/// left out since the code is printed after the amount anyway.
pub fn formatted_prefix(currency: &str) -> &'static str {
    match currency_prefix(currency) {
        Some(prefix) if prefix.chars().count() == 1 => prefix,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_rate_is_zero() {
        let mut rates = BTreeMap::new();
        rates.insert("USD".to_string(), 3200.5);
        let table = ExchangeRateTable::new(rates);

        assert_eq!(table.rate("USD"), 3200.5);
        assert_eq!(table.rate("XYZ"), 0.0);
        assert_eq!(ExchangeRateTable::default().rate("USD"), 0.0);
    }

    #[test]
    fn test_single_character_prefix_only() {
        assert_eq!(formatted_prefix("EUR"), "€");
        assert_eq!(formatted_prefix("AUD"), "");
        assert_eq!(formatted_prefix("XYZ"), "");
    }
}
