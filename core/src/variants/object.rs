//! Per-record HTLC for non-fungible assets, the object-custody sibling of
//! the pooled factory. Same predicate set (Keccak-256 hashlock plus a
//! 20-byte foreign payout address), open claim authorization.

use crate::asset::Asset;
use crate::commitment::{ForeignAddress, HashCommitment};
use crate::condition::{ClaimProof, Condition};
use crate::error::AssetError;
use crate::event::{EscrowEvent, EventLog};
use crate::identity::{Address, RecordId};
use crate::ledger::Ledger;
use crate::record::{EscrowRecord, ReclaimAuth};
use crate::time::{Clock, DurationMs};
use crate::variants::Refund;
use crate::Result;

/// HTLC vault holding non-fungible assets one record at a time.
#[derive(Debug, Default)]
pub struct ObjectHtlc {
    ledger: Ledger,
    events: EventLog,
}

impl ObjectHtlc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks a non-fungible `asset` under `hashlock`.
    ///
    /// # Errors
    ///
    /// [`AssetError::NotNonFungible`] for fungible assets — those belong in
    /// the pooled [`crate::variants::factory::HtlcFactory`].
    pub fn open(
        &mut self,
        asset: Asset,
        creator: Address,
        foreign_address: ForeignAddress,
        hashlock: HashCommitment,
        duration: DurationMs,
        clock: &impl Clock,
    ) -> Result<RecordId> {
        if asset.is_fungible() {
            return Err(AssetError::NotNonFungible.into());
        }
        let now = clock.now_ms();
        let id = self.ledger.insert_with(|id| {
            EscrowRecord::open(
                id,
                asset,
                creator,
                None,
                Condition::hashlock(hashlock),
                Some(foreign_address),
                now,
                duration,
            )
        })?;

        self.events.record(self.ledger.get(id)?.created_event());
        tracing::debug!(%id, %hashlock, "object htlc opened");
        Ok(id)
    }

    /// Releases the object to anyone presenting the preimage before expiry.
    pub fn claim(
        &mut self,
        id: RecordId,
        preimage: &[u8],
        claimer: Address,
        clock: &impl Clock,
    ) -> Result<Asset> {
        let now = clock.now_ms();
        let record = self.ledger.get(id)?;
        record.check_claim(&ClaimProof::preimage(claimer, preimage), now)?;

        let record = self.ledger.settle(id)?;
        self.events.record(EscrowEvent::SecretRevealed {
            record_id: id,
            preimage: Some(preimage.to_vec()),
            hash: record.condition.hash_commitment,
            claimer,
            timestamp: now,
        });
        tracing::debug!(%id, "object htlc claimed");
        Ok(record.into_asset())
    }

    /// Returns the object to its creator after expiry. Creator-only.
    pub fn refund(&mut self, id: RecordId, caller: Address, clock: &impl Clock) -> Result<Refund> {
        let now = clock.now_ms();
        let record = self.ledger.get(id)?;
        let reason = record.check_reclaim(&caller, now, ReclaimAuth::CreatorOnly, false)?;

        let record = self.ledger.settle(id)?;
        self.events.record(EscrowEvent::Refunded {
            record_id: id,
            reason,
        });
        tracing::debug!(%id, ?reason, "object htlc refunded");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EscrowError;
    use crate::time::ManualClock;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    fn deed() -> Asset {
        Asset::NonFungible { id: "deed-42".into() }
    }

    fn foreign() -> ForeignAddress {
        ForeignAddress::from([0xEE; 20])
    }

    #[test]
    fn fungible_assets_rejected() {
        let clock = ManualClock::at(0);
        let mut vault = ObjectHtlc::new();
        assert_eq!(
            vault
                .open(
                    Asset::Fungible { amount: 5 },
                    addr(1),
                    foreign(),
                    HashCommitment::digest(b"s"),
                    1000,
                    &clock,
                )
                .unwrap_err(),
            EscrowError::Asset(AssetError::NotNonFungible)
        );
    }

    #[test]
    fn anyone_with_preimage_claims() {
        let clock = ManualClock::at(0);
        let mut vault = ObjectHtlc::new();
        let id = vault
            .open(deed(), addr(1), foreign(), HashCommitment::digest(b"s"), 1000, &clock)
            .unwrap();

        clock.set(500);
        let asset = vault.claim(id, b"s", addr(9), &clock).unwrap();
        assert_eq!(asset, deed());
        assert_eq!(vault.record(id).unwrap_err(), EscrowError::RecordNotFound);
    }

    #[test]
    fn refund_path() {
        let clock = ManualClock::at(0);
        let mut vault = ObjectHtlc::new();
        let id = vault
            .open(deed(), addr(1), foreign(), HashCommitment::digest(b"s"), 1000, &clock)
            .unwrap();

        clock.set(999);
        assert_eq!(
            vault.refund(id, addr(1), &clock).unwrap_err(),
            EscrowError::DeadlineNotReached
        );

        clock.set(1000);
        assert_eq!(
            vault.claim(id, b"s", addr(9), &clock).unwrap_err(),
            EscrowError::DeadlineExpired
        );
        let refund = vault.refund(id, addr(1), &clock).unwrap();
        assert_eq!(refund.asset, deed());
        assert_eq!(refund.to, addr(1));
    }

    #[test]
    fn created_event_carries_foreign_address() {
        let clock = ManualClock::at(0);
        let mut vault = ObjectHtlc::new();
        vault
            .open(deed(), addr(1), foreign(), HashCommitment::digest(b"s"), 1000, &clock)
            .unwrap();

        match &vault.events()[0] {
            EscrowEvent::Created { foreign_address, .. } => {
                assert_eq!(*foreign_address, Some(foreign()));
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }
}
