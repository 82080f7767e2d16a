//! Single-party HTLC: release to the designated recipient on proof of the
//! secret before the deadline, otherwise back to the creator after it.

use crate::asset::Asset;
use crate::commitment::HashCommitment;
use crate::condition::{ClaimProof, Condition};
use crate::event::{EscrowEvent, EventLog};
use crate::identity::{Address, RecordId};
use crate::ledger::Ledger;
use crate::record::{EscrowRecord, ReclaimAuth};
use crate::time::{Clock, DurationMs};
use crate::variants::Refund;
use crate::Result;

/// Vault of recipient-restricted hash time-locks.
#[derive(Debug, Default)]
pub struct HashlockVault {
    ledger: Ledger,
    events: EventLog,
}

impl HashlockVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks `asset` for `recipient` under a Keccak-256 commitment.
    pub fn open(
        &mut self,
        asset: Asset,
        creator: Address,
        recipient: Address,
        commitment: HashCommitment,
        duration: DurationMs,
        clock: &impl Clock,
    ) -> Result<RecordId> {
        let now = clock.now_ms();
        let id = self.ledger.insert_with(|id| {
            EscrowRecord::open(
                id,
                asset,
                creator,
                Some(recipient),
                Condition::hashlock(commitment).with_recipient(recipient),
                None,
                now,
                duration,
            )
        })?;

        self.events.record(self.ledger.get(id)?.created_event());
        tracing::debug!(%id, %commitment, "hashlock opened");
        Ok(id)
    }

    /// Releases the asset to the recipient on a matching preimage before
    /// expiry, revealing the preimage in the event stream.
    pub fn claim(
        &mut self,
        id: RecordId,
        preimage: &[u8],
        caller: Address,
        clock: &impl Clock,
    ) -> Result<Asset> {
        let now = clock.now_ms();
        let record = self.ledger.get(id)?;
        record.check_claim(&ClaimProof::preimage(caller, preimage), now)?;

        let record = self.ledger.settle(id)?;
        self.events.record(EscrowEvent::SecretRevealed {
            record_id: id,
            preimage: Some(preimage.to_vec()),
            hash: record.condition.hash_commitment,
            claimer: caller,
            timestamp: now,
        });
        tracing::debug!(%id, "hashlock claimed");
        Ok(record.into_asset())
    }

    /// Returns the asset to the creator once the deadline has passed.
    /// Creator-only; there is no early-cancel path in this variant.
    pub fn reclaim(&mut self, id: RecordId, caller: Address, clock: &impl Clock) -> Result<Refund> {
        let now = clock.now_ms();
        let record = self.ledger.get(id)?;
        let reason = record.check_reclaim(&caller, now, ReclaimAuth::CreatorOnly, false)?;

        let record = self.ledger.settle(id)?;
        self.events.record(EscrowEvent::Refunded {
            record_id: id,
            reason,
        });
        tracing::debug!(%id, ?reason, "hashlock reclaimed");
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
