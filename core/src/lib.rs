//! Trustless atomic-swap escrow primitives: conditional asset transfer that
//! releases a held asset only when a cryptographic or temporal condition is
//! satisfied.
//!
//! One parameterized state machine (`Held -> Released | Reclaimed`, terminal
//! transitions destroy the record) drives five variants, each a thin
//! configuration of condition predicates and custody strategy — see
//! [`variants`].

/// Data representations of escrowed assets
pub mod asset;
/// Keccak-256 hash commitments and foreign-chain addresses
pub mod commitment;
/// Claim predicates and deterministic verification logic
pub mod condition;
/// Structured events consumed by indexer collaborators
pub mod event;
/// Identities of parties, records, and capability tokens
pub mod identity;
/// JSON file helpers for params/metadata
pub mod interface;
/// Keyed store of active records; removal is the exclusivity primitive
pub mod ledger;
/// The escrow record and its terminal transitions
pub mod record;
/// Trusted clock injection and the canonical deadline rule
pub mod time;
/// The five escrow variants
pub mod variants;

pub mod error;
pub use error::EscrowError;

pub type Result<T> = std::result::Result<T, EscrowError>;

pub use asset::Asset;
pub use commitment::{ForeignAddress, HashCommitment};
pub use condition::{ClaimProof, Condition};
pub use event::{EscrowEvent, RefundReason};
pub use identity::{Address, CapabilityId, CapabilityToken, RecordId};
pub use record::EscrowRecord;
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
pub use variants::bilateral::{EscrowDesk, SwapOutcome};
pub use variants::factory::HtlcFactory;
pub use variants::hashlock::HashlockVault;
pub use variants::lock::LockVault;
pub use variants::object::ObjectHtlc;
pub use variants::Refund;
