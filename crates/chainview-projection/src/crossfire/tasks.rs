//! Crossfire task statuses and counter key layout.

/// Completion status of a campaign task, stored as an integer column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Incomplete = 0,
    Completed = 1,
    Missed = 2,
}

impl TaskStatus {
    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

/// The task columns of `view_crossfire_validators`. A closed set so task
/// updates can never touch an arbitrary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskColumn {
    Phase1NodeSetup,
    Phase2KeepNodeActive,
    Phase2ProposalVote,
    Phase2NetworkUpgrade,
}

impl TaskColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Phase1NodeSetup => "task_phase1_node_setup",
            Self::Phase2KeepNodeActive => "task_phase2_keep_node_active",
            Self::Phase2ProposalVote => "task_phase2_proposal_vote",
            Self::Phase2NetworkUpgrade => "task_phase2_network_upgrade",
        }
    }
}

// Counter key prefixes. Full keys are `<prefix>:<suffix>`, where the suffix
// is the signer's base64 pubkey for the tx-volume counters, the voter's
// account address for the vote record, or `timestamp`/`blockheight` for the
// chain-wide upgrade record.
pub const KEY_PHASE1_TX_SENT: &str = "phase_1_tx_sent";
pub const KEY_PHASE2_TX_SENT: &str = "phase_2_tx_sent";
pub const KEY_PHASE3_TX_SENT: &str = "phase_3_tx_sent";
pub const KEY_TOTAL_TX_SENT: &str = "total_tx_sent";
pub const KEY_VOTED_PROPOSAL_ID: &str = "voted_proposal_id";
pub const KEY_NETWORK_UPGRADE: &str = "network_upgrade";

pub fn stats_key(prefix: &str, suffix: &str) -> String {
    format!("{prefix}:{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_integer_mapping_is_stable() {
        assert_eq!(TaskStatus::Incomplete.as_i64(), 0);
        assert_eq!(TaskStatus::Completed.as_i64(), 1);
        assert_eq!(TaskStatus::Missed.as_i64(), 2);
    }

    #[test]
    fn key_layout() {
        assert_eq!(
            stats_key(KEY_PHASE2_TX_SENT, "tcro1abc"),
            "phase_2_tx_sent:tcro1abc"
        );
        assert_eq!(
            stats_key(KEY_NETWORK_UPGRADE, "blockheight"),
            "network_upgrade:blockheight"
        );
    }
}
