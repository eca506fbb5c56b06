//! Begin-block event parsing.
//!
//! Walks the block's begin-block event list once, left to right, mapping
//! each event type to exactly one command kind. Command order follows event
//! order, including interleaving across validators — downstream projections
//! must not assume grouping by validator.

use std::collections::HashSet;

use chainview_core::model::{
    AccountTransferParams, BlockEvent, MintParams, SlashValidatorParams,
};
use chainview_core::Command;

use crate::error::ParseError;

const EVENT_TRANSFER: &str = "transfer";
const EVENT_MINT: &str = "mint";
const EVENT_PROPOSER_REWARD: &str = "proposer_reward";
const EVENT_COMMISSION: &str = "commission";
const EVENT_REWARDS: &str = "rewards";
const EVENT_SLASH: &str = "slash";
const EVENT_JAIL: &str = "jail";
const EVENT_LIVENESS: &str = "liveness";

/// Reason recorded for a jail event that does not carry its own: on this
/// chain a liveness jail always follows the slash it belongs to.
const JAIL_REASON_FALLBACK: &str = "same_reason_as_slashed";

/// Parse a block's begin-block events into an ordered command sequence.
///
/// Exact duplicate attribute groups (same type, same attributes in the same
/// order) are suppressed; semantically distinct payouts to the same
/// validator (proposer reward vs. block reward vs. commission) are all
/// emitted. Unknown event types are skipped.
pub fn parse_begin_block_events_commands(
    block_height: i64,
    events: &[BlockEvent],
) -> Result<Vec<Command>, ParseError> {
    let mut commands = Vec::with_capacity(events.len());
    let mut seen: HashSet<&BlockEvent> = HashSet::with_capacity(events.len());

    for event in events {
        if !seen.insert(event) {
            continue;
        }

        match event.event_type.as_str() {
            EVENT_TRANSFER => commands.push(Command::CreateAccountTransfer {
                block_height,
                params: AccountTransferParams {
                    recipient: required(event, "recipient")?.to_string(),
                    sender: required(event, "sender")?.to_string(),
                    amount: required(event, "amount")?.to_string(),
                },
            }),
            EVENT_MINT => commands.push(Command::CreateMint {
                block_height,
                params: MintParams {
                    bonded_ratio: required(event, "bonded_ratio")?.to_string(),
                    inflation: required(event, "inflation")?.to_string(),
                    annual_provisions: required(event, "annual_provisions")?.to_string(),
                    amount: required(event, "amount")?.to_string(),
                },
            }),
            EVENT_PROPOSER_REWARD => commands.push(Command::CreateBlockProposerReward {
                block_height,
                validator: required(event, "validator")?.to_string(),
                amount: required(event, "amount")?.to_string(),
            }),
            EVENT_COMMISSION => commands.push(Command::CreateBlockCommission {
                block_height,
                validator: required(event, "validator")?.to_string(),
                amount: required(event, "amount")?.to_string(),
            }),
            EVENT_REWARDS => commands.push(Command::CreateBlockReward {
                block_height,
                validator: required(event, "validator")?.to_string(),
                amount: required(event, "amount")?.to_string(),
            }),
            EVENT_SLASH => commands.push(Command::SlashValidator {
                block_height,
                params: SlashValidatorParams {
                    consensus_node_address: required(event, "address")?.to_string(),
                    slashed_power: required(event, "power")?.to_string(),
                    reason: required(event, "reason")?.to_string(),
                },
            }),
            EVENT_JAIL | EVENT_LIVENESS => commands.push(Command::JailValidator {
                block_height,
                consensus_node_address: required(event, "address")?.to_string(),
                reason: event
                    .attribute("reason")
                    .unwrap_or(JAIL_REASON_FALLBACK)
                    .to_string(),
            }),
            _ => {}
        }
    }

    Ok(commands)
}

fn required<'a>(event: &'a BlockEvent, key: &str) -> Result<&'a str, ParseError> {
    event
        .attribute(key)
        .ok_or_else(|| ParseError::MissingAttribute {
            event_type: event.event_type.clone(),
            key: key.to_string(),
        })
}
