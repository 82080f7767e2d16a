//! The escrow record: custody of one asset under one condition.
//!
//! A record is created by `open`, never mutated, and destroyed by exactly
//! one terminal transition. Custody is enforced by ownership: the asset is a
//! plain field of the record and can only leave it through
//! [`EscrowRecord::into_asset`], which consumes the record by value.

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::commitment::ForeignAddress;
use crate::condition::{ClaimProof, Condition};
use crate::event::{EscrowEvent, RefundReason};
use crate::identity::{Address, RecordId};
use crate::time::{is_expired, DurationMs, Timestamp};
use crate::{EscrowError, Result};

/// Who may trigger a reclaim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimAuth {
    /// Anyone may trigger post-expiry release back to the creator (plain
    /// lock semantics: no recipient restriction applies to reclaim).
    Anyone,
    /// Only the creator.
    CreatorOnly,
}

/// One active escrow, `Held` from creation until a terminal transition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EscrowRecord {
    pub id: RecordId,
    pub creator: Address,
    pub recipient: Option<Address>,
    pub condition: Condition,
    /// Payout address for the mirrored leg on a foreign chain, if any.
    pub foreign_address: Option<ForeignAddress>,
    pub created_at: Timestamp,
    pub duration: DurationMs,
    asset: Asset,
}

impl EscrowRecord {
    /// Validates inputs and takes the asset into custody.
    ///
    /// # Errors
    ///
    /// - asset and condition validation errors as-is;
    /// - [`EscrowError::InvalidDeadline`] if `duration` is zero or the
    ///   expiry would overflow the timestamp range.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn open(
        id: RecordId,
        asset: Asset,
        creator: Address,
        recipient: Option<Address>,
        condition: Condition,
        foreign_address: Option<ForeignAddress>,
        created_at: Timestamp,
        duration: DurationMs,
    ) -> Result<Self> {
        asset.validate()?;
        condition.validate()?;
        if duration == 0 || created_at.checked_add(duration).is_none() {
            return Err(EscrowError::InvalidDeadline);
        }

        Ok(Self {
            id,
            creator,
            recipient,
            condition,
            foreign_address,
            created_at,
            duration,
            asset,
        })
    }

    /// `created_at + duration`; overflow is ruled out at open.
    pub fn expiry(&self) -> Timestamp {
        self.created_at.saturating_add(self.duration)
    }

    /// The asset in custody. Read-only; extraction goes through the
    /// terminal transitions.
    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// Whether a claim with `proof` would succeed at `now`. Pure check, no
    /// state change: callers verify first, then settle.
    ///
    /// # Errors
    ///
    /// [`EscrowError::DeadlineExpired`] at or past expiry, then the
    /// condition's own verification errors.
    pub fn check_claim(&self, proof: &ClaimProof<'_>, now: Timestamp) -> Result<()> {
        if is_expired(now, self.expiry()) {
            return Err(EscrowError::DeadlineExpired);
        }
        self.condition.verify(proof)
    }

    /// Whether a reclaim by `caller` would succeed at `now`, and with which
    /// reason. `allow_early` enables the creator's pre-expiry cancellation
    /// path in the variants that offer it.
    pub fn check_reclaim(
        &self,
        caller: &Address,
        now: Timestamp,
        auth: ReclaimAuth,
        allow_early: bool,
    ) -> Result<RefundReason> {
        if auth == ReclaimAuth::CreatorOnly && *caller != self.creator {
            return Err(EscrowError::Unauthorized);
        }
        if is_expired(now, self.expiry()) {
            Ok(RefundReason::Timeout)
        } else if allow_early {
            Ok(RefundReason::EarlyCancel)
        } else {
            Err(EscrowError::DeadlineNotReached)
        }
    }

    /// Terminal transition: consumes the record, releasing the asset
    /// exactly once.
    pub(crate) fn into_asset(self) -> Asset {
        self.asset
    }

    /// The creation event for this record, emitted by the vault that
    /// opened it.
    pub fn created_event(&self) -> EscrowEvent {
        EscrowEvent::Created {
            record_id: self.id,
            creator: self.creator,
            recipient: self.recipient,
            asset: self.asset.clone(),
            hash_commitment: self.condition.hash_commitment,
            capability_id: self.condition.capability_id,
            foreign_address: self.foreign_address,
            created_at: self.created_at,
            expires_at: self.expiry(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::HashCommitment;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    fn record(duration: DurationMs) -> EscrowRecord {
        EscrowRecord::open(
            RecordId(1),
            Asset::Fungible { amount: 100 },
            addr(1),
            Some(addr(2)),
            Condition::hashlock(HashCommitment::digest(b"secret")).with_recipient(addr(2)),
            None,
            0,
            duration,
        )
        .unwrap()
    }

    #[test]
    fn open_rejects_bad_deadlines() {
        let open = |created_at, duration| {
            EscrowRecord::open(
                RecordId(1),
                Asset::Fungible { amount: 1 },
                addr(1),
                None,
                Condition::hashlock(HashCommitment::digest(b"s")),
                None,
                created_at,
                duration,
            )
        };
        assert_eq!(open(0, 0), Err(EscrowError::InvalidDeadline));
        assert_eq!(open(u64::MAX, 1), Err(EscrowError::InvalidDeadline));
        assert!(open(0, 1).is_ok());
    }

    #[test]
    fn claim_deadline_boundary() {
        let record = record(1000);
        let proof = ClaimProof::preimage(addr(2), b"secret");

        assert!(record.check_claim(&proof, 999).is_ok());
        assert_eq!(
            record.check_claim(&proof, 1000),
            Err(EscrowError::DeadlineExpired)
        );
    }

    #[test]
    fn reclaim_deadline_boundary() {
        let record = record(1000);

        assert_eq!(
            record.check_reclaim(&addr(1), 999, ReclaimAuth::CreatorOnly, false),
            Err(EscrowError::DeadlineNotReached)
        );
        assert_eq!(
            record.check_reclaim(&addr(1), 1000, ReclaimAuth::CreatorOnly, false),
            Ok(RefundReason::Timeout)
        );
    }

    #[test]
    fn reclaim_authorization() {
        let record = record(1000);

        assert_eq!(
            record.check_reclaim(&addr(9), 2000, ReclaimAuth::CreatorOnly, false),
            Err(EscrowError::Unauthorized)
        );
        // plain lock semantics: anyone may break the timelock after expiry
        assert_eq!(
            record.check_reclaim(&addr(9), 2000, ReclaimAuth::Anyone, false),
            Ok(RefundReason::Timeout)
        );
    }

    #[test]
    fn early_cancel_reason() {
        let record = record(1000);

        assert_eq!(
            record.check_reclaim(&addr(1), 500, ReclaimAuth::CreatorOnly, true),
            Ok(RefundReason::EarlyCancel)
        );
        assert_eq!(
            record.check_reclaim(&addr(1), 1500, ReclaimAuth::CreatorOnly, true),
            Ok(RefundReason::Timeout)
        );
    }

    #[test]
    fn created_event_fields() {
        let record = record(1000);
        match record.created_event() {
            EscrowEvent::Created {
                record_id,
                creator,
                recipient,
                expires_at,
                hash_commitment,
                ..
            } => {
                assert_eq!(record_id, RecordId(1));
                assert_eq!(creator, addr(1));
                assert_eq!(recipient, Some(addr(2)));
                assert_eq!(expires_at, 1000);
                assert_eq!(hash_commitment, Some(HashCommitment::digest(b"secret")));
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }
}
