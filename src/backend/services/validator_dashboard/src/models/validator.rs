use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ValidatorIndex = u64;
pub type Epoch = u64;

/// Current state of one of the validators managed by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatorInfo {
    pub index: ValidatorIndex,
    #[serde(default)]
    pub pubkey: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    /// Current balance in ETH
    #[serde(default)]
    pub balance: f64,
}

/// Balance snapshot recorded by the validator cache for one epoch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EpochBalance {
    pub epoch: Epoch,
    /// Total balance in ETH; absent when the node had no data
    #[serde(default)]
    pub total_balance: Option<f64>,
}

impl EpochBalance {
    pub fn usable_balance(&self) -> Option<f64> {
        self.total_balance.filter(|b| b.is_finite())
    }
}

/// Per-validator balance history, possibly partial
pub type ValidatorCache = BTreeMap<ValidatorIndex, Vec<EpochBalance>>;

/// Usable balances of one validator, ascending by epoch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BalanceSeries {
    pub epochs: Vec<Epoch>,
    pub balances: Vec<f64>,
}

impl BalanceSeries {
    pub fn push(&mut self, epoch: Epoch, balance: f64) {
        self.epochs.push(epoch);
        self.balances.push(balance);
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn epoch_span(&self) -> u64 {
        match (self.epochs.first(), self.epochs.last()) {
            (Some(first), Some(last)) => last.saturating_sub(*first),
            _ => 0,
        }
    }

    /// Last balance minus the first; 0 with fewer than two snapshots.
    pub fn earnings(&self) -> f64 {
        match (self.balances.first(), self.balances.last()) {
            (Some(first), Some(last)) if self.balances.len() > 1 => last - first,
            _ => 0.0,
        }
    }

    pub fn earnings_per_epoch(&self) -> f64 {
        match self.epoch_span() {
            0 => 0.0,
            span => self.earnings() / span as f64,
        }
    }
}

/// Aggregated balances across a set of validators
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidatorBalanceInfo {
    /// Epochs every aggregated validator has a balance for, ascending
    pub epochs: Vec<Epoch>,
    /// Sum of balances at each entry of `epochs`
    pub totals: Vec<f64>,
    /// Balance series of each validator that had cached data
    pub validators: BTreeMap<ValidatorIndex, BalanceSeries>,
}

impl ValidatorBalanceInfo {
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Sum of every validator's own earnings, so a series that starts
    /// late or stops early only contributes what it observed.
    pub fn total_earnings(&self) -> f64 {
        self.validators.values().map(BalanceSeries::earnings).sum()
    }

    pub fn earnings_per_epoch(&self) -> f64 {
        self.validators
            .values()
            .map(BalanceSeries::earnings_per_epoch)
            .sum()
    }
}

/// 32 slots of 12 seconds
pub const EPOCHS_PER_DAY: u64 = 225;
pub const EPOCHS_PER_YEAR: u64 = EPOCHS_PER_DAY * 365;
