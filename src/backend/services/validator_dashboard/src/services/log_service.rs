use std::borrow::Cow;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::models::log::{LogMetric, LogRecord, LogType};
use crate::services::search_debouncer::SearchDebouncer;

/// Narrow `records` to those with a field containing `query`,
/// case-insensitively. An empty or blank query yields the input as is.
pub fn filter_logs<'a>(records: &'a [LogRecord], query: &str) -> Cow<'a, [LogRecord]> {
    if query.trim().is_empty() {
        return Cow::Borrowed(records);
    }

    let needle = query.to_lowercase();
    Cow::Owned(
        records
            .iter()
            .filter(|record| matches_query(record, &needle))
            .cloned()
            .collect(),
    )
}

fn matches_query(record: &LogRecord, needle: &str) -> bool {
    record
        .fields
        .values()
        .filter_map(field_text)
        .any(|text| text.to_lowercase().contains(needle))
}

/// Empty values (`null`, `false`, `0`, `""`) carry no text to search.
fn field_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Append-only buffers for the beacon node and validator client streams
#[derive(Debug, Clone, Default)]
pub struct LogStreams {
    beacon: Vec<LogRecord>,
    validator: Vec<LogRecord>,
    max_records: Option<usize>,
}

impl LogStreams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_records` per stream, dropping the oldest first.
    pub fn with_capacity_limit(max_records: usize) -> Self {
        Self {
            max_records: Some(max_records),
            ..Self::default()
        }
    }

    pub fn push(&mut self, log_type: LogType, record: LogRecord) {
        let max_records = self.max_records;
        let buffer = self.buffer_mut(log_type);
        buffer.push(record);

        if let Some(max) = max_records {
            if buffer.len() > max {
                let overflow = buffer.len() - max;
                buffer.drain(..overflow);
                debug!(%log_type, overflow, "Evicted oldest log records");
            }
        }
    }

    pub fn extend<I>(&mut self, log_type: LogType, records: I)
    where
        I: IntoIterator<Item = LogRecord>,
    {
        for record in records {
            self.push(log_type, record);
        }
    }

    pub fn records(&self, log_type: LogType) -> &[LogRecord] {
        match log_type {
            LogType::Beacon => &self.beacon,
            LogType::Validator => &self.validator,
        }
    }

    pub fn metrics(&self, log_type: LogType) -> LogMetric {
        LogMetric::from_records(self.records(log_type))
    }

    fn buffer_mut(&mut self, log_type: LogType) -> &mut Vec<LogRecord> {
        match log_type {
            LogType::Beacon => &mut self.beacon,
            LogType::Validator => &mut self.validator,
        }
    }
}

/// State behind a log viewer: which stream it shows, whether the stream
/// is still loading and the settled search query.
pub struct LogView {
    log_type: LogType,
    is_loading: bool,
    search: SearchDebouncer,
}

impl LogView {
    pub fn new(log_type: LogType, debounce: Duration) -> Self {
        Self {
            log_type,
            is_loading: false,
            search: SearchDebouncer::new(debounce),
        }
    }

    pub fn log_type(&self) -> LogType {
        self.log_type
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Raw keystroke input; only the value left standing after the
    /// debounce delay is applied.
    pub fn on_search_text(&mut self, text: impl Into<String>) {
        self.search.schedule(text.into());
    }

    /// Entering the loading state drops the query immediately.
    pub fn set_loading(&mut self, is_loading: bool) {
        if is_loading && !self.is_loading {
            debug!(log_type = %self.log_type, "Log stream loading, clearing search");
            self.search.reset();
        }
        self.is_loading = is_loading;
    }

    pub fn query(&self) -> String {
        self.search.current()
    }

    pub fn query_changes(&self) -> watch::Receiver<String> {
        self.search.subscribe()
    }

    /// Rows to display for the current stream snapshot
    pub fn rows<'a>(&self, streams: &'a LogStreams) -> Cow<'a, [LogRecord]> {
        if self.is_loading {
            return Cow::Owned(Vec::new());
        }
        filter_logs(streams.records(self.log_type), &self.query())
    }

    /// Severity counts over the whole stream, regardless of the search
    pub fn metrics(&self, streams: &LogStreams) -> LogMetric {
        streams.metrics(self.log_type)
    }
}
