//! Event registry — the `(name, version) → codec` lookup table.
//!
//! The registry is an explicitly constructed, immutable value: build it once
//! at startup (normally via [`EventRegistry::standard`]) and pass it by
//! reference into everything that decodes persisted events. There is no
//! process-wide singleton.
//!
//! Round-trip law: for every registered variant `e`,
//! `decode_by_type(e.name(), e.version(), encode(e)) == e`.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::RegistryError;
use crate::event::{names, Event};

/// Key for codec lookup by name + version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameVersion(String, u32);

type DecodeFn = fn(&[u8]) -> Result<Event, RegistryError>;

pub struct EventRegistry {
    decoders: HashMap<NameVersion, DecodeFn>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Build a registry with every event kind this crate defines.
    pub fn standard() -> Self {
        let mut registry = Self::new();

        let entries: [(&str, DecodeFn); 13] = [
            (names::BLOCK_CREATED, |b| Ok(Event::BlockCreated(decode_payload(b)?))),
            (names::TRANSACTION_CREATED, |b| {
                Ok(Event::TransactionCreated(decode_payload(b)?))
            }),
            (names::TRANSACTION_FAILED, |b| {
                Ok(Event::TransactionFailed(decode_payload(b)?))
            }),
            (names::VALIDATOR_CREATED, |b| {
                Ok(Event::ValidatorCreated(decode_payload(b)?))
            }),
            (names::VOTE_CAST, |b| Ok(Event::VoteCast(decode_payload(b)?))),
            (names::SOFTWARE_UPGRADE_PROPOSAL_SUBMITTED, |b| {
                Ok(Event::SoftwareUpgradeProposalSubmitted(decode_payload(b)?))
            }),
            (names::BLOCK_PROPOSER_REWARDED, |b| {
                Ok(Event::BlockProposerRewarded(decode_payload(b)?))
            }),
            (names::BLOCK_REWARDED, |b| Ok(Event::BlockRewarded(decode_payload(b)?))),
            (names::BLOCK_COMMISSIONED, |b| {
                Ok(Event::BlockCommissioned(decode_payload(b)?))
            }),
            (names::VALIDATOR_SLASHED, |b| {
                Ok(Event::ValidatorSlashed(decode_payload(b)?))
            }),
            (names::VALIDATOR_JAILED, |b| {
                Ok(Event::ValidatorJailed(decode_payload(b)?))
            }),
            (names::ACCOUNT_TRANSFERRED, |b| {
                Ok(Event::AccountTransferred(decode_payload(b)?))
            }),
            (names::COINS_MINTED, |b| Ok(Event::CoinsMinted(decode_payload(b)?))),
        ];
        for (name, decode) in entries {
            registry
                .register(name, 1, decode)
                .unwrap_or_else(|_| panic!("duplicate standard event registration: {name}"));
        }

        registry
    }

    /// Register a codec for `(name, version)`. Registration happens during
    /// construction only; the registry is read-only afterwards.
    pub fn register(
        &mut self,
        name: &str,
        version: u32,
        decode: DecodeFn,
    ) -> Result<(), RegistryError> {
        let key = NameVersion(name.to_string(), version);
        if self.decoders.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered {
                name: name.to_string(),
                version,
            });
        }
        self.decoders.insert(key, decode);
        Ok(())
    }

    /// Encode an event's payload for persistence. Fails with
    /// [`RegistryError::UnknownEvent`] for an unregistered variant so that
    /// nothing un-replayable ever reaches the event log.
    pub fn encode(&self, event: &Event) -> Result<Vec<u8>, RegistryError> {
        let key = NameVersion(event.name().to_string(), event.version());
        if !self.decoders.contains_key(&key) {
            return Err(RegistryError::UnknownEvent {
                name: event.name().to_string(),
                version: event.version(),
            });
        }

        match event {
            Event::BlockCreated(p) => encode_payload(p),
            Event::TransactionCreated(p) | Event::TransactionFailed(p) => encode_payload(p),
            Event::ValidatorCreated(p) => encode_payload(p),
            Event::VoteCast(p) => encode_payload(p),
            Event::SoftwareUpgradeProposalSubmitted(p) => encode_payload(p),
            Event::BlockProposerRewarded(p)
            | Event::BlockRewarded(p)
            | Event::BlockCommissioned(p) => encode_payload(p),
            Event::ValidatorSlashed(p) => encode_payload(p),
            Event::ValidatorJailed(p) => encode_payload(p),
            Event::AccountTransferred(p) => encode_payload(p),
            Event::CoinsMinted(p) => encode_payload(p),
        }
    }

    /// Decode a persisted payload back into a typed event.
    pub fn decode_by_type(
        &self,
        name: &str,
        version: u32,
        bytes: &[u8],
    ) -> Result<Event, RegistryError> {
        let decode = self
            .decoders
            .get(&NameVersion(name.to_string(), version))
            .ok_or_else(|| RegistryError::UnknownEvent {
                name: name.to_string(),
                version,
            })?;
        decode(bytes)
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RegistryError> {
    serde_json::from_slice(bytes).map_err(RegistryError::Decode)
}

fn encode_payload<T: serde::Serialize>(payload: &T) -> Result<Vec<u8>, RegistryError> {
    serde_json::to_vec(payload).map_err(RegistryError::Encode)
}
