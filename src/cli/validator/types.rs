use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::{fs, path::Path};

use validator_dashboard::models::{
    duty::ProposerDuty,
    log::LogRecord,
    validator::{ValidatorCache, ValidatorInfo},
};

use crate::commands::Error;

/// Proposer duties as grouped upstream, one inner list per alert group
pub type DutyGroups = Vec<Vec<ProposerDuty>>;

/// Validator states file: either a bare list or `{"validators": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValidatorStates {
    List(Vec<ValidatorInfo>),
    Wrapped { validators: Vec<ValidatorInfo> },
}

impl ValidatorStates {
    pub fn into_inner(self) -> Vec<ValidatorInfo> {
        match self {
            ValidatorStates::List(validators) => validators,
            ValidatorStates::Wrapped { validators } => validators,
        }
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let data = fs::read(path)?;
    serde_json::from_slice(&data)
        .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))
}

pub fn read_validator_states(path: &Path) -> Result<Vec<ValidatorInfo>, Error> {
    read_json::<ValidatorStates>(path).map(ValidatorStates::into_inner)
}

pub fn read_validator_cache(path: &Path) -> Result<ValidatorCache, Error> {
    read_json(path)
}

/// One JSON object per line; blank lines are skipped.
pub fn read_log_lines(path: &Path) -> Result<Vec<LogRecord>, Error> {
    let data = fs::read_to_string(path)?;
    parse_log_lines(&data)
}

pub fn parse_log_lines(data: &str) -> Result<Vec<LogRecord>, Error> {
    data.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::Parse(format!("log line {}: {}", number + 1, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_lines_skips_blanks() {
        let records = parse_log_lines("{\"msg\":\"a\"}\n\n{\"msg\":\"b\"}\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_log_lines_reports_line() {
        let err = parse_log_lines("{\"msg\":\"a\"}\nnot json\n").unwrap_err();
        assert!(err.to_string().contains("log line 2"));
    }

    #[test]
    fn test_validator_states_accepts_both_shapes() {
        let list: ValidatorStates =
            serde_json::from_str(r#"[{"index": 1, "balance": 32.0}]"#).unwrap();
        assert_eq!(list.into_inner().len(), 1);

        let wrapped: ValidatorStates =
            serde_json::from_str(r#"{"validators": [{"index": 1}, {"index": 2}]}"#).unwrap();
        assert_eq!(wrapped.into_inner().len(), 2);
    }
}
