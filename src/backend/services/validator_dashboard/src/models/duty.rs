use serde::{Deserialize, Serialize};

/// A block proposal assignment for one of our validators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProposerDuty {
    #[serde(default)]
    pub pubkey: String,
    pub validator_index: String,
    /// Target slot, delivered by the node as a numeric string
    pub slot: String,
    pub uuid: String,
}

impl ProposerDuty {
    /// Slot as a number; malformed slots degrade to 0.
    pub fn slot_number(&self) -> u64 {
        self.slot.trim().parse().unwrap_or(0)
    }
}
