use serde::{Deserialize, Serialize};

/// Relative timing of a slot against the current head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTimeData {
    /// True when the target slot is ahead of the head slot
    pub is_future: bool,
    /// Signed distance from head to target in seconds
    pub delta_seconds: i64,
    /// Coarse human label, e.g. `in 1m` or `5s ago`
    pub short_hand: String,
}

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Classify `target_slot` relative to `head_slot`.
pub fn classify(head_slot: u64, target_slot: u64, seconds_per_slot: u64) -> SlotTimeData {
    let slot_difference = target_slot as i128 - head_slot as i128;
    let delta = slot_difference.saturating_mul(seconds_per_slot as i128);
    let delta_seconds = delta.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
    let is_future = target_slot > head_slot;

    let span = short_span(delta_seconds.unsigned_abs());
    let short_hand = if is_future {
        format!("in {}", span)
    } else {
        format!("{} ago", span)
    };

    SlotTimeData {
        is_future,
        delta_seconds,
        short_hand,
    }
}

fn short_span(seconds: u64) -> String {
    match seconds {
        s if s < MINUTE => format!("{}s", s),
        s if s < HOUR => format!("{}m", s / MINUTE),
        s if s < DAY => format!("{}h", s / HOUR),
        s => format!("{}d", s / DAY),
    }
}
