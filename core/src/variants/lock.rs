//! Single-key timelock: release to whoever holds the paired capability
//! token, or unconditionally back to the creator after the duration elapses.

use thiserror::Error;

use crate::asset::Asset;
use crate::condition::{ClaimProof, Condition};
use crate::event::{EscrowEvent, EventLog};
use crate::identity::{Address, CapabilityId, CapabilityToken, RecordId};
use crate::ledger::Ledger;
use crate::record::{EscrowRecord, ReclaimAuth};
use crate::time::{Clock, DurationMs};
use crate::variants::Refund;
use crate::{EscrowError, Result};

/// A failed claim hands the capability token back: a rejected attempt must
/// leave everything claimable again, the token included.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ClaimRejected {
    pub token: CapabilityToken,
    pub error: EscrowError,
}

impl ClaimRejected {
    fn new(token: CapabilityToken, error: EscrowError) -> Self {
        Self { token, error }
    }
}

impl From<ClaimRejected> for EscrowError {
    fn from(rejected: ClaimRejected) -> Self {
        rejected.error
    }
}

/// Vault of capability-token timelocks.
#[derive(Debug, Default)]
pub struct LockVault {
    ledger: Ledger,
    events: EventLog,
    next_capability: u64,
}

impl LockVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks `asset` and mints the paired single-use capability token,
    /// returned to the creator to hold or hand over.
    pub fn open(
        &mut self,
        asset: Asset,
        creator: Address,
        duration: DurationMs,
        clock: &impl Clock,
    ) -> Result<(RecordId, CapabilityToken)> {
        let now = clock.now_ms();
        let capability_id = CapabilityId(self.next_capability);

        let id = self.ledger.insert_with(|id| {
            EscrowRecord::open(
                id,
                asset,
                creator,
                None,
                Condition::capability(capability_id),
                None,
                now,
                duration,
            )
        })?;
        self.next_capability += 1;

        self.events.record(self.ledger.get(id)?.created_event());
        tracing::debug!(%id, %capability_id, "lock opened");
        Ok((id, CapabilityToken::mint(capability_id)))
    }

    /// Releases the asset to whoever presents the matching token before
    /// expiry. The token is consumed on success and returned inside the
    /// error otherwise.
    pub fn claim(
        &mut self,
        id: RecordId,
        token: CapabilityToken,
        caller: Address,
        clock: &impl Clock,
    ) -> std::result::Result<Asset, ClaimRejected> {
        let now = clock.now_ms();
        let record = match self.ledger.get(id) {
            Ok(record) => record,
            Err(e) => return Err(ClaimRejected::new(token, e)),
        };
        if let Err(e) = record.check_claim(&ClaimProof::capability(caller, &token), now) {
            return Err(ClaimRejected::new(token, e));
        }

        let record = match self.ledger.settle(id) {
            Ok(record) => record,
            Err(e) => return Err(ClaimRejected::new(token, e)),
        };
        drop(token); // consumed; the id can never satisfy another record

        self.events.record(EscrowEvent::SecretRevealed {
            record_id: id,
            preimage: None,
            hash: None,
            claimer: caller,
            timestamp: now,
        });
        tracing::debug!(%id, "lock claimed");
        Ok(record.into_asset())
    }

    /// Breaks the timelock after expiry. Anyone may trigger this; the asset
    /// always goes back to the creator.
    pub fn reclaim(&mut self, id: RecordId, caller: Address, clock: &impl Clock) -> Result<Refund> {
        let now = clock.now_ms();
        let record = self.ledger.get(id)?;
        let reason = record.check_reclaim(&caller, now, ReclaimAuth::Anyone, false)?;

        let record = self.ledger.settle(id)?;
        self.events.record(EscrowEvent::Refunded {
            record_id: id,
            reason,
        });
        tracing::debug!(%id, ?reason, "lock reclaimed");
        Ok(Refund {
            to: record.creator,
            asset: record.into_asset(),
            reason,
        })
    }

    pub fn events(&self) -> &[EscrowEvent] {
        self.events.events()
    }

    pub fn record(&self, id: RecordId) -> Result<&EscrowRecord> {
        self.ledger.get(id)
    }
}
