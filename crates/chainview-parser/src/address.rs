//! Address derivation from consensus / account public keys.
//!
//! All addresses are bech32-rendered, prefix-tagged digests of the public
//! key. Every function here is a pure function of its inputs: same prefix
//! and key bytes always yield the same address; different prefixes are not
//! comparable.
//!
//! - consensus node address: first 20 bytes of `SHA-256(pubkey)` (ed25519)
//! - account address: `RIPEMD-160(SHA-256(pubkey))` (compressed secp256k1)
//! - validator (operator) address: re-tagging of an account address

use bech32::{FromBase32, ToBase32, Variant};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::ParseError;

const ED25519_PUBKEY_LEN: usize = 32;
const SECP256K1_COMPRESSED_PUBKEY_LEN: usize = 33;
const ADDRESS_LEN: usize = 20;

/// Derive the bech32 consensus node address from a Tendermint ed25519
/// public key.
pub fn consensus_address(prefix: &str, pubkey: &[u8]) -> Result<String, ParseError> {
    if pubkey.len() != ED25519_PUBKEY_LEN {
        return Err(ParseError::MalformedPubKey {
            reason: format!(
                "expected {ED25519_PUBKEY_LEN}-byte ed25519 key, got {} bytes",
                pubkey.len()
            ),
        });
    }
    let digest = Sha256::digest(pubkey);
    encode_bech32(prefix, &digest[..ADDRESS_LEN])
}

/// Derive the raw Tendermint address (uppercase hex, no prefix) from an
/// ed25519 public key.
pub fn tendermint_address(pubkey: &[u8]) -> Result<String, ParseError> {
    if pubkey.len() != ED25519_PUBKEY_LEN {
        return Err(ParseError::MalformedPubKey {
            reason: format!(
                "expected {ED25519_PUBKEY_LEN}-byte ed25519 key, got {} bytes",
                pubkey.len()
            ),
        });
    }
    let digest = Sha256::digest(pubkey);
    Ok(hex::encode_upper(&digest[..ADDRESS_LEN]))
}

/// Derive the bech32 account address from a compressed secp256k1 public key.
pub fn account_address(prefix: &str, pubkey: &[u8]) -> Result<String, ParseError> {
    if pubkey.len() != SECP256K1_COMPRESSED_PUBKEY_LEN {
        return Err(ParseError::MalformedPubKey {
            reason: format!(
                "expected {SECP256K1_COMPRESSED_PUBKEY_LEN}-byte compressed secp256k1 key, got {} bytes",
                pubkey.len()
            ),
        });
    }
    let sha = Sha256::digest(pubkey);
    let digest = Ripemd160::digest(sha);
    encode_bech32(prefix, &digest)
}

/// Re-tag an account address under the validator (operator) prefix. The
/// underlying 20-byte hash is unchanged, so the pairing between an account
/// and its operator address is stable.
pub fn validator_address_from_account_address(
    prefix: &str,
    account_address: &str,
) -> Result<String, ParseError> {
    let (_, data, variant) =
        bech32::decode(account_address).map_err(|e| ParseError::MalformedAddress {
            address: account_address.to_string(),
            reason: e.to_string(),
        })?;
    if variant != Variant::Bech32 {
        return Err(ParseError::MalformedAddress {
            address: account_address.to_string(),
            reason: "not a bech32 (non-m) address".into(),
        });
    }
    let bytes = Vec::<u8>::from_base32(&data).map_err(|e| ParseError::MalformedAddress {
        address: account_address.to_string(),
        reason: e.to_string(),
    })?;
    encode_bech32(prefix, &bytes)
}

fn encode_bech32(prefix: &str, bytes: &[u8]) -> Result<String, ParseError> {
    bech32::encode(prefix, bytes.to_base32(), Variant::Bech32).map_err(|e| {
        ParseError::MalformedAddress {
            address: prefix.to_string(),
            reason: e.to_string(),
        }
    })
}
