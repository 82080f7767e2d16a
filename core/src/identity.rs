//! Identities of parties, escrow records, and capability tokens.

use serde_with::hex::Hex;
use serde_with::serde_as;

use crate::error::IdentityError;
use crate::Result;

/// Opaque 32-byte identity of a party (depositor, recipient, claimer).
#[serde_as]
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(#[serde_as(as = "Hex")] [u8; 32]);

impl Address {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::str::FromStr for Address {
    type Err = crate::EscrowError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(IdentityError::Hex)?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| IdentityError::Length(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({self})")
    }
}

/// Globally unique identifier of an escrow record, assigned at creation.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record-{}", self.0)
    }
}

/// Identifier pairing a capability token with exactly one escrow record.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityId(pub u64);

impl std::fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "capability-{}", self.0)
    }
}

/// Single-use credential: minted 1:1 with a lock record, consumed (dropped)
/// exactly once on successful claim.
///
/// Deliberately neither `Clone` nor `Deserialize` — the only way to hold one
/// is to receive it from the vault that minted it, and a consumed token
/// cannot be re-presented.
#[derive(serde::Serialize, Debug, PartialEq, Eq)]
pub struct CapabilityToken {
    id: CapabilityId,
}

impl CapabilityToken {
    pub(crate) fn mint(id: CapabilityId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> CapabilityId {
        self.id
    }
}
