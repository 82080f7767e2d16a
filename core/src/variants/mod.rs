//! The escrow variants: thin configurations of the shared state machine.
//!
//! Each variant pairs a condition predicate with a custody strategy:
//!
//! | Variant | Condition | Custody | Claim authorization |
//! |---|---|---|---|
//! | [`lock::LockVault`] | capability token | per-record | any token holder |
//! | [`hashlock::HashlockVault`] | hash commitment | per-record | designated recipient |
//! | [`bilateral::EscrowDesk`] | hash commitment + counterpart leg | per-record | designated counterpart |
//! | [`factory::HtlcFactory`] | hash commitment + foreign address | pooled balance | anyone with the preimage |
//! | [`object::ObjectHtlc`] | hash commitment + foreign address | per-record | anyone with the preimage |
//!
//! Deadline and predicate logic live in [`crate::record`] and
//! [`crate::condition`]; no variant re-implements the comparison rule.

pub mod bilateral;
pub mod factory;
pub mod hashlock;
pub mod lock;
pub mod object;

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::event::RefundReason;
use crate::identity::Address;

/// Result of a successful reclaim: the asset and where it goes. The caller
/// (a wallet or relayer collaborator) executes the actual transfer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Refund {
    /// The original depositor the asset returns to.
    pub to: Address,
    pub asset: Asset,
    pub reason: RefundReason,
}
