//! Structured events emitted on every state transition.
//!
//! Each transition emits exactly one event (a bilateral claim emits the
//! reveal/swap sibling pair). Events carry enough to let an external indexer
//! reconstruct full escrow state without re-reading ledger storage, and are
//! append-only: never retracted, never edited.

use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;

use crate::asset::Asset;
use crate::commitment::{ForeignAddress, HashCommitment};
use crate::identity::{Address, CapabilityId, RecordId};
use crate::time::Timestamp;

/// Why an escrow was refunded to its creator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefundReason {
    /// Creator aborted an unmatched offer before expiry.
    EarlyCancel,
    /// Deadline passed unclaimed.
    Timeout,
}

/// One state transition of one escrow record.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EscrowEvent {
    /// An escrow record was opened and its asset taken into custody.
    Created {
        record_id: RecordId,
        creator: Address,
        recipient: Option<Address>,
        asset: Asset,
        hash_commitment: Option<HashCommitment>,
        capability_id: Option<CapabilityId>,
        foreign_address: Option<ForeignAddress>,
        created_at: Timestamp,
        expires_at: Timestamp,
    },

    /// A claim succeeded. The preimage is published in plaintext on
    /// purpose: revelation is how the counterpart relayer learns the secret
    /// for the mirrored contract. Secrets must therefore never be derived
    /// from reusable or identifying material.
    SecretRevealed {
        record_id: RecordId,
        #[serde_as(as = "Option<Hex>")]
        preimage: Option<Vec<u8>>,
        hash: Option<HashCommitment>,
        claimer: Address,
        timestamp: Timestamp,
    },

    /// Sibling of [`EscrowEvent::SecretRevealed`] on a bilateral claim:
    /// the counterpart leg was released in the same operation.
    Swapped {
        record_id: RecordId,
        counterpart_id: RecordId,
        claimer: Address,
        timestamp: Timestamp,
    },

    /// The asset went back to its creator.
    Refunded {
        record_id: RecordId,
        reason: RefundReason,
    },
}

impl EscrowEvent {
    /// The record this event belongs to.
    pub fn record_id(&self) -> RecordId {
        match self {
            Self::Created { record_id, .. }
            | Self::SecretRevealed { record_id, .. }
            | Self::Swapped { record_id, .. }
            | Self::Refunded { record_id, .. } => *record_id,
        }
    }
}

/// Append-only event log owned by a vault.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<EscrowEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, event: EscrowEvent) {
        tracing::debug!(record = %event.record_id(), ?event, "escrow event");
        self.events.push(event);
    }

    /// All events emitted so far, oldest first.
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
