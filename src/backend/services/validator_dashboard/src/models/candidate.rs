use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A validator waiting to be configured in the creation wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatorCandidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub withdrawal_credentials: Option<String>,
    #[serde(default)]
    pub is_verified_credentials: bool,
}

impl ValidatorCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            withdrawal_credentials: None,
            is_verified_credentials: false,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.withdrawal_credentials
            .as_deref()
            .map_or(false, |c| !c.is_empty())
    }

    pub fn clear_credentials(&mut self) {
        self.withdrawal_credentials = None;
        self.is_verified_credentials = false;
    }
}
