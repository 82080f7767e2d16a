//! Keccak-256 hash commitments and foreign-chain addresses.
//!
//! Keccak-256 is the single canonical commitment digest for every variant:
//! cross-chain interoperability requires one hash function used identically
//! at creation and at claim, so no alternative digest (and no claim-time
//! fallback) is exposed.

use serde_with::hex::Hex;
use serde_with::serde_as;
use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;

use crate::error::ConditionError;
use crate::Result;

/// Byte length of a hash commitment.
pub const COMMITMENT_LEN: usize = 32;

/// Byte length of a foreign-chain (EVM-style) address.
pub const FOREIGN_ADDRESS_LEN: usize = 20;

/// A fixed-size Keccak-256 digest of a secret, published before the secret
/// itself is known.
///
/// # Example
///
/// ```
/// use swaplock_core::HashCommitment;
///
/// let commitment = HashCommitment::digest(b"s3cr3t!!");
/// assert!(commitment.matches(b"s3cr3t!!"));
/// assert!(!commitment.matches(b"wrong"));
/// ```
#[serde_as]
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashCommitment(#[serde_as(as = "Hex")] [u8; COMMITMENT_LEN]);

impl HashCommitment {
    /// Computes the commitment for a preimage.
    pub fn digest(preimage: &[u8]) -> Self {
        Self(Keccak256::digest(preimage).into())
    }

    /// Builds a commitment from raw digest bytes, enforcing the 32-byte
    /// length at creation.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::CommitmentLength`] on any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let digest: [u8; COMMITMENT_LEN] = bytes
            .try_into()
            .map_err(|_| ConditionError::CommitmentLength(bytes.len()))?;
        Ok(Self(digest))
    }

    /// Constant-time check that `Keccak-256(preimage)` equals this
    /// commitment, byte-for-byte over all 32 bytes.
    pub fn matches(&self, preimage: &[u8]) -> bool {
        let computed = Keccak256::digest(preimage);
        computed.as_slice().ct_eq(&self.0).unwrap_u8() == 1
    }

    pub fn as_bytes(&self) -> &[u8; COMMITMENT_LEN] {
        &self.0
    }
}

impl From<[u8; COMMITMENT_LEN]> for HashCommitment {
    fn from(digest: [u8; COMMITMENT_LEN]) -> Self {
        Self(digest)
    }
}

impl std::str::FromStr for HashCommitment {
    type Err = crate::EscrowError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))
            .map_err(crate::error::IdentityError::Hex)?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Display for HashCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for HashCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HashCommitment({self})")
    }
}

/// A 20-byte address on a foreign chain running the mirrored HTLC contract.
/// Carried as metadata so the counterpart relayer knows where the mirrored
/// leg pays out; never part of the claim predicate on this side.
#[serde_as]
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignAddress(#[serde_as(as = "Hex")] [u8; FOREIGN_ADDRESS_LEN]);

impl ForeignAddress {
    /// # Errors
    ///
    /// Returns [`ConditionError::ForeignAddressLength`] unless `bytes` is
    /// exactly 20 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let addr: [u8; FOREIGN_ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| ConditionError::ForeignAddressLength(bytes.len()))?;
        Ok(Self(addr))
    }

    pub fn as_bytes(&self) -> &[u8; FOREIGN_ADDRESS_LEN] {
        &self.0
    }
}

impl From<[u8; FOREIGN_ADDRESS_LEN]> for ForeignAddress {
    fn from(addr: [u8; FOREIGN_ADDRESS_LEN]) -> Self {
        Self(addr)
    }
}

impl std::str::FromStr for ForeignAddress {
    type Err = crate::EscrowError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))
            .map_err(crate::error::IdentityError::Hex)?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Display for ForeignAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for ForeignAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ForeignAddress(0x{})", hex::encode(self.0))
    }
}
