use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::models::duty::ProposerDuty;
use crate::utils::slot_time::{classify, SlotTimeData};

/// One duty line as rendered inside an alert group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyAlertRow {
    pub duty: ProposerDuty,
    pub is_future: bool,
    pub time: String,
    /// Rows carry their own delete action only in single-duty groups
    pub is_deletable: bool,
}

/// Header line of a group holding several duties
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub is_future: bool,
    pub count: usize,
    pub indices: String,
}

impl fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_future {
            write!(
                f,
                "{} validators are scheduled to propose: {}",
                self.count, self.indices
            )
        } else {
            write!(f, "{} validators proposed blocks: {}", self.count, self.indices)
        }
    }
}

/// Proposer duties that share a validator set and are shown together.
///
/// Duties are kept sorted by descending slot, so the first one is the
/// latest and drives the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertGroup {
    duties: Vec<ProposerDuty>,
    is_expanded: bool,
}

impl AlertGroup {
    pub fn new(mut duties: Vec<ProposerDuty>) -> Self {
        duties.sort_by(|a, b| b.slot_number().cmp(&a.slot_number()));
        Self {
            duties,
            is_expanded: false,
        }
    }

    pub fn duties(&self) -> &[ProposerDuty] {
        &self.duties
    }

    pub fn len(&self) -> usize {
        self.duties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duties.is_empty()
    }

    /// Only groups of two or more duties collapse.
    pub fn is_full_group(&self) -> bool {
        self.duties.len() > 1
    }

    pub fn is_expanded(&self) -> bool {
        self.is_full_group() && self.is_expanded
    }

    pub fn toggle(&mut self) {
        if self.is_full_group() {
            self.is_expanded = !self.is_expanded;
        }
    }

    pub fn latest_duty(&self) -> Option<&ProposerDuty> {
        self.duties.first()
    }

    pub fn indices(&self) -> Vec<&str> {
        self.duties
            .iter()
            .map(|duty| duty.validator_index.as_str())
            .collect()
    }

    pub fn uuids(&self) -> Vec<String> {
        self.duties.iter().map(|duty| duty.uuid.clone()).collect()
    }

    pub fn latest_time(&self, head_slot: u64, seconds_per_slot: u64) -> Option<SlotTimeData> {
        self.latest_duty()
            .map(|duty| classify(head_slot, duty.slot_number(), seconds_per_slot))
    }

    /// Header of a full group; single duties have none.
    pub fn summary(&self, head_slot: u64, seconds_per_slot: u64) -> Option<GroupSummary> {
        if !self.is_full_group() {
            return None;
        }
        let latest = self.latest_time(head_slot, seconds_per_slot)?;
        Some(GroupSummary {
            is_future: latest.is_future,
            count: self.duties.len(),
            indices: self.indices().join(", "),
        })
    }

    /// Rows to render: every duty of a single group, or of a full group
    /// once expanded.
    pub fn rows(&self, head_slot: u64, seconds_per_slot: u64) -> Vec<DutyAlertRow> {
        if self.is_full_group() && !self.is_expanded {
            return Vec::new();
        }
        let is_deletable = !self.is_full_group();

        self.duties
            .iter()
            .map(|duty| {
                let SlotTimeData {
                    is_future,
                    short_hand,
                    ..
                } = classify(head_slot, duty.slot_number(), seconds_per_slot);
                DutyAlertRow {
                    duty: duty.clone(),
                    is_future,
                    time: short_hand,
                    is_deletable,
                }
            })
            .collect()
    }

    /// Identifiers to hand to the dismissal callback
    pub fn dismiss(&self) -> Vec<String> {
        self.uuids()
    }

    fn retain_unlisted(&mut self, ids: &HashSet<&str>) -> usize {
        let before = self.duties.len();
        self.duties.retain(|duty| !ids.contains(duty.uuid.as_str()));
        before - self.duties.len()
    }
}

/// All proposer alert groups currently shown, with upstream dismissal
#[derive(Debug, Clone, Default)]
pub struct ProposerAlertBoard {
    groups: Vec<AlertGroup>,
}

impl ProposerAlertBoard {
    pub fn new<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Vec<ProposerDuty>>,
    {
        Self {
            groups: groups
                .into_iter()
                .filter(|duties| !duties.is_empty())
                .map(AlertGroup::new)
                .collect(),
        }
    }

    pub fn groups(&self) -> &[AlertGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [AlertGroup] {
        &mut self.groups
    }

    pub fn duty_count(&self) -> usize {
        self.groups.iter().map(AlertGroup::len).sum()
    }

    /// Remove every duty whose uuid is listed; groups left empty go away.
    pub fn dismiss<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let ids: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        let removed: usize = self
            .groups
            .iter_mut()
            .map(|group| group.retain_unlisted(&ids))
            .sum();
        self.groups.retain(|group| !group.is_empty());

        debug!(removed, remaining = self.duty_count(), "Dismissed proposer alerts");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duty(index: &str, slot: &str, uuid: &str) -> ProposerDuty {
        ProposerDuty {
            pubkey: format!("0x{}", index),
            validator_index: index.to_string(),
            slot: slot.to_string(),
            uuid: uuid.to_string(),
        }
    }

    #[test]
    fn test_single_duty_never_collapses() {
        let mut group = AlertGroup::new(vec![duty("7", "120", "a")]);
        assert!(!group.is_full_group());

        group.toggle();
        assert!(!group.is_expanded());
        assert!(group.summary(100, 12).is_none());

        let rows = group.rows(100, 12);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_deletable);
        assert!(rows[0].is_future);
    }

    #[test]
    fn test_full_group_starts_collapsed() {
        let mut group = AlertGroup::new(vec![duty("1", "90", "a"), duty("2", "110", "b")]);
        assert!(group.is_full_group());
        assert!(!group.is_expanded());
        assert!(group.rows(100, 12).is_empty());

        group.toggle();
        let rows = group.rows(100, 12);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| !row.is_deletable));

        group.toggle();
        assert!(!group.is_expanded());
    }

    #[test]
    fn test_latest_duty_drives_summary() {
        let group = AlertGroup::new(vec![
            duty("1", "90", "a"),
            duty("3", "150", "c"),
            duty("2", "110", "b"),
        ]);

        let slots: Vec<u64> = group.duties().iter().map(|d| d.slot_number()).collect();
        assert_eq!(slots, vec![150, 110, 90]);

        let summary = group.summary(100, 12).unwrap();
        assert!(summary.is_future);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.indices, "3, 2, 1");

        let past = group.summary(200, 12).unwrap();
        assert!(!past.is_future);
    }

    #[test]
    fn test_board_dismissal_drops_empty_groups() {
        let mut board = ProposerAlertBoard::new(vec![
            vec![duty("1", "90", "a"), duty("2", "110", "b")],
            vec![duty("3", "150", "c")],
            vec![],
        ]);
        assert_eq!(board.groups().len(), 2);

        let single = board.groups()[1].dismiss();
        assert_eq!(board.dismiss(&single), 1);
        assert_eq!(board.groups().len(), 1);

        assert_eq!(board.dismiss(&["a"]), 1);
        assert_eq!(board.duty_count(), 1);
        assert!(!board.groups()[0].is_full_group());
    }
}
