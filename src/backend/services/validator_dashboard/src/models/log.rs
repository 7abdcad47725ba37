use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The two independent log streams exposed by the node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Beacon,
    Validator,
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogType::Beacon => write!(f, "beacon"),
            LogType::Validator => write!(f, "validator"),
        }
    }
}

impl std::str::FromStr for LogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beacon" | "bn" => Ok(LogType::Beacon),
            "validator" | "vc" => Ok(LogType::Validator),
            other => Err(format!("unknown log type: {}", other)),
        }
    }
}

/// A single log line as pushed by the log stream. Field names are not
/// fixed; the severity lives in the `level` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LogRecord {
    pub fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn level(&self) -> Option<&str> {
        self.fields.get(LEVEL_FIELD).and_then(Value::as_str)
    }

    pub fn severity(&self) -> Option<Severity> {
        self.level().and_then(Severity::parse)
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

pub const LEVEL_FIELD: &str = "level";

/// Severity tiers tracked by the log metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Error,
    Warning,
}

impl Severity {
    pub fn parse(level: &str) -> Option<Self> {
        match level.trim().to_ascii_lowercase().as_str() {
            "crit" | "critical" => Some(Severity::Critical),
            "erro" | "error" => Some(Severity::Error),
            "warn" | "warning" => Some(Severity::Warning),
            _ => None,
        }
    }
}

/// Counts of priority records in a stream
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogMetric {
    pub critical_logs: usize,
    pub error_logs: usize,
    pub warning_logs: usize,
}

impl LogMetric {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LogRecord>,
    {
        records
            .into_iter()
            .fold(Self::default(), |mut metric, record| {
                match record.severity() {
                    Some(Severity::Critical) => metric.critical_logs += 1,
                    Some(Severity::Error) => metric.error_logs += 1,
                    Some(Severity::Warning) => metric.warning_logs += 1,
                    None => {}
                }
                metric
            })
    }

    pub fn total(&self) -> usize {
        self.critical_logs + self.error_logs + self.warning_logs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> LogRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_metric_counts_by_level() {
        let records = vec![
            record(json!({"level": "CRIT", "msg": "db corrupted"})),
            record(json!({"level": "ERRO", "msg": "peer dropped"})),
            record(json!({"level": "Error", "msg": "peer dropped"})),
            record(json!({"level": "WARN", "msg": "slow"})),
            record(json!({"level": "INFO", "msg": "synced"})),
            record(json!({"msg": "no level"})),
        ];

        let metric = LogMetric::from_records(&records);
        assert_eq!(metric.critical_logs, 1);
        assert_eq!(metric.error_logs, 2);
        assert_eq!(metric.warning_logs, 1);
        assert_eq!(metric.total(), 4);
    }

    #[test]
    fn test_log_type_parsing() {
        assert_eq!("Beacon".parse::<LogType>().unwrap(), LogType::Beacon);
        assert_eq!("vc".parse::<LogType>().unwrap(), LogType::Validator);
        assert!("execution".parse::<LogType>().is_err());
        assert_eq!(LogType::Validator.to_string(), "validator");
    }
}
