//! Crossfire campaign configuration.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ProjectionError;

/// Campaign parameters, constructed once at startup.
///
/// The four timestamps split the campaign into three phases:
/// `(phase_one_start, phase_two_start)`, `(phase_two_start,
/// phase_three_start)` and `(phase_three_start, competition_end)`. All
/// window checks are strict; a block landing exactly on a boundary belongs
/// to neither side.
#[derive(Debug, Clone, Deserialize)]
pub struct CrossfireConfig {
    pub phase_one_start: DateTime<Utc>,
    pub phase_two_start: DateTime<Utc>,
    pub phase_three_start: DateTime<Utc>,
    pub competition_end: DateTime<Utc>,

    /// Account address allowed to submit the network upgrade proposal.
    pub admin_address: String,
    /// Target proposal id for the vote and upgrade tasks, once assigned.
    pub network_upgrade_proposal_id: Option<String>,

    /// bech32 prefix for consensus node addresses, e.g. `"crocnclcons"`.
    pub consensus_prefix: String,
    /// bech32 prefix for validator operator addresses, e.g. `"crocncl"`.
    pub validator_prefix: String,
}

impl CrossfireConfig {
    /// Reject a config whose timestamps are not strictly increasing.
    pub fn validated(self) -> Result<Self, ProjectionError> {
        if self.phase_one_start < self.phase_two_start
            && self.phase_two_start < self.phase_three_start
            && self.phase_three_start < self.competition_end
        {
            Ok(self)
        } else {
            Err(ProjectionError::Validation(
                "crossfire phases must be strictly ordered".into(),
            ))
        }
    }

    /// The phase whose open interval contains `time`, if any.
    pub fn phase_of(&self, time: DateTime<Utc>) -> Option<Phase> {
        if time > self.phase_one_start && time < self.phase_two_start {
            Some(Phase::One)
        } else if time > self.phase_two_start && time < self.phase_three_start {
            Some(Phase::Two)
        } else if time > self.phase_three_start && time < self.competition_end {
            Some(Phase::Three)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    One,
    Two,
    Three,
}
