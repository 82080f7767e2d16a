//! Two-party atomic swap: "give X, get Y" with shared mutable visibility.
//!
//! Both parties open offers under the same hash commitment, each naming the
//! other as counterpart. A claim by the counterpart releases both legs in
//! one operation: the claimer receives the offered asset and the offer's
//! creator receives the counterpart's asset. Either creator may abort an
//! unmatched offer early.

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::commitment::HashCommitment;
use crate::condition::{ClaimProof, Condition};
use crate::event::{EscrowEvent, EventLog};
use crate::identity::{Address, RecordId};
use crate::ledger::Ledger;
use crate::record::{EscrowRecord, ReclaimAuth};
use crate::time::{Clock, DurationMs};
use crate::variants::Refund;
use crate::{EscrowError, Result};

/// Result of a successful bilateral claim: the cross-transfer of both legs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    /// Asset released to the claimer.
    pub received: Asset,
    /// The claimed record's creator, who receives the counterpart leg.
    pub counterpart: Address,
    /// Asset released to the counterpart.
    pub counterpart_receives: Asset,
    /// The counterpart record consumed in the same operation.
    pub counterpart_record: RecordId,
}

/// Shared desk of bilateral swap offers. Any party can attempt any
/// operation; only the specified counterpart can succeed.
#[derive(Debug, Default)]
pub struct EscrowDesk {
    ledger: Ledger,
    events: EventLog,
}

impl EscrowDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an offer of `asset` to `counterpart` under `commitment`.
    pub fn offer(
        &mut self,
        asset: Asset,
        creator: Address,
        counterpart: Address,
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
                Some(counterpart),
                Condition::hashlock(commitment).with_recipient(counterpart),
                None,
                now,
                duration,
            )
        })?;

        self.events.record(self.ledger.get(id)?.created_event());
        tracing::debug!(%id, %commitment, "swap offer opened");
        Ok(id)
    }

    /// Claims record `id` with the secret, atomically cross-releasing the
    /// counterpart leg. The counterpart leg is the record opened by the
    /// claimer back to this offer's creator under the same commitment; the
    /// claim fails with [`EscrowError::ConditionMismatch`] until it exists.
    pub fn claim(
        &mut self,
        id: RecordId,
        preimage: &[u8],
        caller: Address,
        clock: &impl Clock,
    ) -> Result<SwapOutcome> {
        let now = clock.now_ms();
        let record = self.ledger.get(id)?;
        record.check_claim(&ClaimProof::preimage(caller, preimage), now)?;

        let counterpart_id = self.find_counterpart(record, caller)?;

        // Commit point: both legs leave the desk in the same operation.
        let record = self.ledger.settle(id)?;
        let counterpart_record = self.ledger.settle(counterpart_id)?;

        self.events.record(EscrowEvent::SecretRevealed {
            record_id: id,
            preimage: Some(preimage.to_vec()),
            hash: record.condition.hash_commitment,
            claimer: caller,
            timestamp: now,
        });
        self.events.record(EscrowEvent::Swapped {
            record_id: id,
            counterpart_id,
            claimer: caller,
            timestamp: now,
        });
        tracing::debug!(%id, %counterpart_id, "swap settled");

        Ok(SwapOutcome {
            counterpart: record.creator,
            received: record.into_asset(),
            counterpart_receives: counterpart_record.into_asset(),
            counterpart_record: counterpart_id,
        })
    }

    /// Aborts or reclaims an offer. Creator-only; allowed before expiry
    /// (`EarlyCancel`, to abort an unmatched offer without waiting out the
    /// timeout) as well as after (`Timeout`).
    pub fn cancel(&mut self, id: RecordId, caller: Address, clock: &impl Clock) -> Result<Refund> {
        let now = clock.now_ms();
        let record = self.ledger.get(id)?;
        let reason = record.check_reclaim(&caller, now, ReclaimAuth::CreatorOnly, true)?;

        let record = self.ledger.settle(id)?;
        self.events.record(EscrowEvent::Refunded {
            record_id: id,
            reason,
        });
        tracing::debug!(%id, ?reason, "swap offer cancelled");
        Ok(Refund {
            to: record.creator,
            asset: record.into_asset(),
            reason,
        })
    }

    // The counterpart leg: opened by the claimer, addressed back to the
    // claimed offer's creator, under the same commitment.
    fn find_counterpart(&self, record: &EscrowRecord, claimer: Address) -> Result<RecordId> {
        self.ledger
            .iter()
            .find(|other| {
                other.id != record.id
                    && other.creator == claimer
                    && other.recipient == Some(record.creator)
                    && other.condition.hash_commitment == record.condition.hash_commitment
            })
            .map(|other| other.id)
            .ok_or(EscrowError::ConditionMismatch)
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
    use crate::event::RefundReason;
    use crate::time::ManualClock;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    fn coins(amount: u128) -> Asset {
        Asset::Fungible { amount }
    }

    fn matched_pair(desk: &mut EscrowDesk, clock: &ManualClock) -> (RecordId, RecordId) {
        let commitment = HashCommitment::digest(b"swap-secret");
        let a = desk
            .offer(coins(100), addr(1), addr(2), commitment, 1000, clock)
            .unwrap();
        let b = desk
            .offer(coins(200), addr(2), addr(1), commitment, 1000, clock)
            .unwrap();
        (a, b)
    }

    #[test]
    fn swap_releases_both_legs() {
        let clock = ManualClock::at(0);
        let mut desk = EscrowDesk::new();
        let (a, b) = matched_pair(&mut desk, &clock);

        clock.set(500);
        let outcome = desk.claim(a, b"swap-secret", addr(2), &clock).unwrap();
        assert_eq!(outcome.received, coins(100));
        assert_eq!(outcome.counterpart, addr(1));
        assert_eq!(outcome.counterpart_receives, coins(200));
        assert_eq!(outcome.counterpart_record, b);

        // neither record exists afterwards
        assert_eq!(desk.record(a).unwrap_err(), EscrowError::RecordNotFound);
        assert_eq!(desk.record(b).unwrap_err(), EscrowError::RecordNotFound);

        // sibling events fired together
        let events = desk.events();
        assert!(matches!(
            events[events.len() - 2],
            EscrowEvent::SecretRevealed { .. }
        ));
        assert!(matches!(events[events.len() - 1], EscrowEvent::Swapped { .. }));
    }

    #[test]
    fn unmatched_offer_cannot_be_claimed() {
        let clock = ManualClock::at(0);
        let mut desk = EscrowDesk::new();
        let commitment = HashCommitment::digest(b"swap-secret");
        let a = desk
            .offer(coins(100), addr(1), addr(2), commitment, 1000, &clock)
            .unwrap();

        // correct secret and caller, but no counterpart leg yet
        assert_eq!(
            desk.claim(a, b"swap-secret", addr(2), &clock).unwrap_err(),
            EscrowError::ConditionMismatch
        );
        assert!(desk.record(a).is_ok());
    }

    #[test]
    fn only_counterpart_can_claim() {
        let clock = ManualClock::at(0);
        let mut desk = EscrowDesk::new();
        let (a, _b) = matched_pair(&mut desk, &clock);

        assert_eq!(
            desk.claim(a, b"swap-secret", addr(3), &clock).unwrap_err(),
            EscrowError::Unauthorized
        );
    }

    #[test]
    fn early_cancel_aborts_unmatched_offer() {
        let clock = ManualClock::at(0);
        let mut desk = EscrowDesk::new();
        let commitment = HashCommitment::digest(b"swap-secret");
        let a = desk
            .offer(coins(100), addr(1), addr(2), commitment, 1000, &clock)
            .unwrap();

        clock.set(500);
        assert_eq!(
            desk.cancel(a, addr(2), &clock).unwrap_err(),
            EscrowError::Unauthorized
        );
        let refund = desk.cancel(a, addr(1), &clock).unwrap();
        assert_eq!(refund.reason, RefundReason::EarlyCancel);
        assert_eq!(refund.to, addr(1));
    }

    #[test]
    fn claim_after_cancel_loses_the_race() {
        let clock = ManualClock::at(0);
        let mut desk = EscrowDesk::new();
        let (a, b) = matched_pair(&mut desk, &clock);

        desk.cancel(a, addr(1), &clock).unwrap();
        // the cancelled record is gone; a claim cannot succeed against it
        assert_eq!(
            desk.claim(a, b"swap-secret", addr(2), &clock).unwrap_err(),
            EscrowError::RecordNotFound
        );
        // the other leg is unaffected and can still be cancelled by its creator
        assert!(desk.cancel(b, addr(2), &clock).is_ok());
    }

    #[test]
    fn mismatched_commitments_do_not_pair() {
        let clock = ManualClock::at(0);
        let mut desk = EscrowDesk::new();
        let a = desk
            .offer(
                coins(100),
                addr(1),
                addr(2),
                HashCommitment::digest(b"one"),
                1000,
                &clock,
            )
            .unwrap();
        desk.offer(
            coins(200),
            addr(2),
            addr(1),
            HashCommitment::digest(b"two"),
            1000,
            &clock,
        )
        .unwrap();

        assert_eq!(
            desk.claim(a, b"one", addr(2), &clock).unwrap_err(),
            EscrowError::ConditionMismatch
        );
    }
}
