//! Pooled-balance HTLC for fungible value, interoperable with a foreign
//! chain's compatible contract via the shared Keccak-256 hash function.
//!
//! Custody is split from authorization: deposits aggregate into one pooled
//! balance while per-record accounting lives in a map keyed by hashlock
//! (settlement is keyed by commitment so a foreign relayer can claim with
//! nothing but the preimage). The accounting invariant is that the pool
//! never drops below the sum of all unsettled records' committed amounts;
//! nothing but this module's bookkeeping enforces it, so every mutation to
//! the pool happens together with its record update and the invariant is
//! asserted after each operation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::commitment::{ForeignAddress, HashCommitment};
use crate::error::{AssetError, ConditionError};
use crate::event::{EscrowEvent, EventLog, RefundReason};
use crate::identity::{Address, RecordId};
use crate::time::{is_expired, Clock, DurationMs, Timestamp};
use crate::{Asset, EscrowError, Result};

/// Authorization record for one pooled deposit. Value custody is in the
/// pool, not here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FactoryRecord {
    pub id: RecordId,
    pub hashlock: HashCommitment,
    pub creator: Address,
    /// Payout address for the mirrored leg on the foreign chain.
    pub foreign_address: ForeignAddress,
    pub amount: u128,
    pub created_at: Timestamp,
    pub duration: DurationMs,
}

impl FactoryRecord {
    pub fn expiry(&self) -> Timestamp {
        self.created_at.saturating_add(self.duration)
    }
}

/// Aggregated-balance HTLC factory.
#[derive(Debug, Default)]
pub struct HtlcFactory {
    pool: u128,
    records: HashMap<HashCommitment, FactoryRecord>,
    events: EventLog,
    next_id: u64,
}

impl HtlcFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposits `amount` into the pool under `hashlock`. One live record
    /// per hashlock: a duplicate is rejected while the first is unsettled.
    pub fn open(
        &mut self,
        amount: u128,
        creator: Address,
        foreign_address: ForeignAddress,
        hashlock: HashCommitment,
        duration: DurationMs,
        clock: &impl Clock,
    ) -> Result<RecordId> {
        let now = clock.now_ms();
        if amount == 0 {
            return Err(AssetError::ZeroAmount.into());
        }
        if duration == 0 || now.checked_add(duration).is_none() {
            return Err(EscrowError::InvalidDeadline);
        }
        if self.records.contains_key(&hashlock) {
            return Err(ConditionError::DuplicateHashlock.into());
        }
        let pool = self
            .pool
            .checked_add(amount)
            .ok_or(EscrowError::Asset(AssetError::Overflow))?;

        // All checks passed; mutate pool and accounting together.
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.pool = pool;
        self.records.insert(
            hashlock,
            FactoryRecord {
                id,
                hashlock,
                creator,
                foreign_address,
                amount,
                created_at: now,
                duration,
            },
        );

        self.events.record(EscrowEvent::Created {
            record_id: id,
            creator,
            recipient: None,
            asset: Asset::Fungible { amount },
            hash_commitment: Some(hashlock),
            capability_id: None,
            foreign_address: Some(foreign_address),
            created_at: now,
            expires_at: now.saturating_add(duration),
        });
        tracing::debug!(%id, %hashlock, amount, "factory deposit opened");
        self.assert_accounting();
        Ok(id)
    }

    /// Withdraws a deposit by revealing its preimage before the deadline.
    /// Open authorization: anyone presenting a valid preimage may claim.
    pub fn claim(
        &mut self,
        hashlock: HashCommitment,
        preimage: &[u8],
        claimer: Address,
        clock: &impl Clock,
    ) -> Result<u128> {
        let now = clock.now_ms();
        let record = self
            .records
            .get(&hashlock)
            .ok_or(EscrowError::RecordNotFound)?;
        if is_expired(now, record.expiry()) {
            return Err(EscrowError::DeadlineExpired);
        }
        if !hashlock.matches(preimage) {
            return Err(EscrowError::InvalidProof);
        }
        self.check_pool_covers(record.amount)?;

        // Commit: record and pool change together.
        let record = self
            .records
            .remove(&hashlock)
            .ok_or(EscrowError::RecordNotFound)?;
        self.pool -= record.amount;

        self.events.record(EscrowEvent::SecretRevealed {
            record_id: record.id,
            preimage: Some(preimage.to_vec()),
            hash: Some(hashlock),
            claimer,
            timestamp: now,
        });
        tracing::debug!(id = %record.id, %hashlock, amount = record.amount, "factory claim");
        self.assert_accounting();
        Ok(record.amount)
    }

    /// Refunds a deposit to its creator after the deadline.
    pub fn refund(
        &mut self,
        hashlock: HashCommitment,
        caller: Address,
        clock: &impl Clock,
    ) -> Result<u128> {
        let now = clock.now_ms();
        let record = self
            .records
            .get(&hashlock)
            .ok_or(EscrowError::RecordNotFound)?;
        if caller != record.creator {
            return Err(EscrowError::Unauthorized);
        }
        if !is_expired(now, record.expiry()) {
            return Err(EscrowError::DeadlineNotReached);
        }
        self.check_pool_covers(record.amount)?;

        let record = self
            .records
            .remove(&hashlock)
            .ok_or(EscrowError::RecordNotFound)?;
        self.pool -= record.amount;

        self.events.record(EscrowEvent::Refunded {
            record_id: record.id,
            reason: RefundReason::Timeout,
        });
        tracing::debug!(id = %record.id, %hashlock, amount = record.amount, "factory refund");
        self.assert_accounting();
        Ok(record.amount)
    }

    /// Current pooled balance.
    pub fn pool_balance(&self) -> u128 {
        self.pool
    }

    /// Sum of all unsettled records' committed amounts.
    pub fn committed(&self) -> u128 {
        self.records
            .values()
            .fold(0u128, |sum, r| sum.saturating_add(r.amount))
    }

    pub fn record(&self, hashlock: &HashCommitment) -> Result<&FactoryRecord> {
        self.records
            .get(hashlock)
            .ok_or(EscrowError::RecordNotFound)
    }

    pub fn events(&self) -> &[EscrowEvent] {
        self.events.events()
    }

    fn check_pool_covers(&self, requested: u128) -> Result<()> {
        if requested > self.pool {
            return Err(EscrowError::InsufficientAmount {
                requested,
                available: self.pool,
            });
        }
        Ok(())
    }

    fn assert_accounting(&self) {
        debug_assert!(
            self.pool >= self.committed(),
            "pool {} below committed {}",
            self.pool,
            self.committed()
        );
    }
}
