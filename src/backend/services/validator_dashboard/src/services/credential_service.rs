use serde::Serialize;
use tracing::{debug, info};

use crate::models::candidate::ValidatorCandidate;
use crate::utils::errors::{DashboardError, Result};

/// How withdrawal credentials are assigned to the candidates
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialMode {
    /// Every candidate carries its own credentials
    PerValidator,
    /// One set of credentials for the whole group
    Shared,
}

/// Where the wizard goes when the user presses next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    Advance,
    /// Unverified credentials: the user has to acknowledge the risk first
    ShowRisk,
}

/// Checks for an execution-layer address: `0x` and 20 bytes of hex.
pub fn is_execution_address(value: &str) -> bool {
    match value.trim().strip_prefix("0x") {
        Some(body) => body.len() == 40 && hex::decode(body).is_ok(),
        None => false,
    }
}

/// Withdrawal credential step of the validator creation wizard
#[derive(Debug, Clone)]
pub struct WithdrawalCredentialsStep {
    candidates: Vec<ValidatorCandidate>,
    mode: CredentialMode,
    shared_credentials: Option<String>,
    is_shared_credential_verified: bool,
}

impl WithdrawalCredentialsStep {
    pub fn new(candidates: Vec<ValidatorCandidate>) -> Self {
        let mode = Self::default_mode(candidates.len());
        Self {
            candidates,
            mode,
            shared_credentials: None,
            is_shared_credential_verified: false,
        }
    }

    fn default_mode(count: usize) -> CredentialMode {
        if count > 1 {
            CredentialMode::Shared
        } else {
            CredentialMode::PerValidator
        }
    }

    pub fn candidates(&self) -> &[ValidatorCandidate] {
        &self.candidates
    }

    pub fn mode(&self) -> CredentialMode {
        self.mode
    }

    pub fn shared_credentials(&self) -> Option<&str> {
        self.shared_credentials.as_deref()
    }

    /// Replace the candidate list; a change in count re-derives the mode.
    pub fn set_candidates(&mut self, candidates: Vec<ValidatorCandidate>) {
        if candidates.len() != self.candidates.len() {
            self.mode = Self::default_mode(candidates.len());
        }
        self.candidates = candidates;
    }

    /// The mode toggle is only offered for two or more candidates.
    pub fn can_toggle_mode(&self) -> bool {
        self.candidates.len() > 1
    }

    /// Switch modes, dropping every credential entered so far.
    pub fn toggle_mode(&mut self) {
        self.shared_credentials = None;
        self.is_shared_credential_verified = false;
        for candidate in &mut self.candidates {
            candidate.clear_credentials();
        }

        self.mode = match self.mode {
            CredentialMode::PerValidator => CredentialMode::Shared,
            CredentialMode::Shared => CredentialMode::PerValidator,
        };
        debug!(mode = ?self.mode, "Switched withdrawal credential mode");
    }

    pub fn update_candidate(&mut self, id: &str, candidate: ValidatorCandidate) -> Result<()> {
        let slot = self
            .candidates
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("validator candidate {}", id)))?;
        *slot = candidate;
        Ok(())
    }

    pub fn update_shared_credentials(&mut self, credentials: Option<String>, is_verified: bool) {
        self.shared_credentials = credentials.filter(|c| !c.is_empty());
        self.is_shared_credential_verified = is_verified;
    }

    /// Credentials are present for the active mode.
    pub fn is_valid_address(&self) -> bool {
        match self.mode {
            CredentialMode::Shared => self.shared_credentials.is_some(),
            CredentialMode::PerValidator => {
                self.candidates.iter().all(ValidatorCandidate::has_credentials)
            }
        }
    }

    /// Credentials are verified for the active mode.
    pub fn is_verified_address(&self) -> bool {
        match self.mode {
            CredentialMode::Shared => self.is_shared_credential_verified,
            CredentialMode::PerValidator => {
                self.candidates.iter().all(|c| c.is_verified_credentials)
            }
        }
    }

    /// Try to leave the step. Missing credentials keep the user here;
    /// unverified ones route through the risk acknowledgment.
    pub fn next_step(&self) -> Result<StepTransition> {
        if !self.is_valid_address() {
            return Err(DashboardError::ValidationError(
                "withdrawal credentials are required before continuing".to_string(),
            ));
        }
        if !self.is_verified_address() {
            info!(
                mode = ?self.mode,
                "Unverified withdrawal credentials, requesting risk acknowledgment"
            );
            return Ok(StepTransition::ShowRisk);
        }
        Ok(StepTransition::Advance)
    }

    /// Credentials each candidate ends up with once the step completes
    pub fn resolved_credentials(&self) -> Vec<(String, Option<String>)> {
        self.candidates
            .iter()
            .map(|candidate| {
                let credentials = match self.mode {
                    CredentialMode::Shared => self.shared_credentials.clone(),
                    CredentialMode::PerValidator => candidate.withdrawal_credentials.clone(),
                };
                (candidate.id.clone(), credentials)
            })
            .collect()
    }
}
