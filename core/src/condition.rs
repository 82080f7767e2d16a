//! Claim predicates and their deterministic verification.
//!
//! Every escrow variant is a configuration of the same predicate set: an
//! optional hash commitment, an optional capability-token pairing, and an
//! optional recipient restriction. Deadlines are checked by the record, not
//! here; this module only answers "does this proof satisfy this condition".

use serde::{Deserialize, Serialize};

use crate::commitment::HashCommitment;
use crate::error::ConditionError;
use crate::identity::{Address, CapabilityId, CapabilityToken};
use crate::{EscrowError, Result};

/// The condition an escrow record releases under. Immutable after creation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Condition {
    /// Satisfied by a preimage whose Keccak-256 digest equals this value.
    pub hash_commitment: Option<HashCommitment>,
    /// Satisfied by presenting (and consuming) the paired capability token.
    pub capability_id: Option<CapabilityId>,
    /// Restricts successful claims to this caller.
    pub recipient: Option<Address>,
}

/// Evidence presented with a claim.
#[derive(Debug, Clone, Copy)]
pub struct ClaimProof<'a> {
    /// Who is attempting the claim.
    pub caller: Address,
    /// Secret preimage, if the condition carries a hash commitment.
    pub preimage: Option<&'a [u8]>,
    /// Capability token, if the condition carries a pairing.
    pub capability: Option<&'a CapabilityToken>,
}

impl<'a> ClaimProof<'a> {
    pub fn preimage(caller: Address, preimage: &'a [u8]) -> Self {
        Self {
            caller,
            preimage: Some(preimage),
            capability: None,
        }
    }

    pub fn capability(caller: Address, token: &'a CapabilityToken) -> Self {
        Self {
            caller,
            preimage: None,
            capability: Some(token),
        }
    }
}

impl Condition {
    pub fn hashlock(commitment: HashCommitment) -> Self {
        Self {
            hash_commitment: Some(commitment),
            ..Self::default()
        }
    }

    pub fn capability(id: CapabilityId) -> Self {
        Self {
            capability_id: Some(id),
            ..Self::default()
        }
    }

    /// Restrict claims to a designated recipient.
    pub fn with_recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Structural validation at creation time. Length constraints on the
    /// commitment are enforced by [`HashCommitment`] construction; here we
    /// only reject conditions with nothing to satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.hash_commitment.is_none() && self.capability_id.is_none() {
            return Err(ConditionError::Empty.into());
        }
        Ok(())
    }

    /// Verify that `proof` satisfies every configured predicate.
    ///
    /// # Errors
    ///
    /// - [`EscrowError::Unauthorized`] if a recipient is configured and the
    ///   caller is someone else;
    /// - [`EscrowError::ConditionMismatch`] if a capability pairing is
    ///   configured and the token is absent or wrong;
    /// - [`EscrowError::InvalidProof`] if a hash commitment is configured and
    ///   the preimage is absent or does not digest to it.
    pub fn verify(&self, proof: &ClaimProof<'_>) -> Result<()> {
        if let Some(recipient) = &self.recipient {
            if proof.caller != *recipient {
                return Err(EscrowError::Unauthorized);
            }
        }

        if let Some(capability_id) = &self.capability_id {
            match proof.capability {
                Some(token) if token.id() == *capability_id => {}
                _ => return Err(EscrowError::ConditionMismatch),
            }
        }

        if let Some(commitment) = &self.hash_commitment {
            match proof.preimage {
                Some(preimage) if commitment.matches(preimage) => {}
                _ => return Err(EscrowError::InvalidProof),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    #[test]
    fn empty_condition_rejected() {
        assert_eq!(
            Condition::default().validate(),
            Err(EscrowError::InvalidCondition(ConditionError::Empty))
        );
        assert!(Condition::hashlock(HashCommitment::digest(b"s")).validate().is_ok());
    }

    #[test]
    fn hashlock_predicate() {
        let cond = Condition::hashlock(HashCommitment::digest(b"secret"));

        assert!(cond.verify(&ClaimProof::preimage(addr(1), b"secret")).is_ok());
        assert_eq!(
            cond.verify(&ClaimProof::preimage(addr(1), b"wrong")),
            Err(EscrowError::InvalidProof)
        );
        // missing preimage entirely
        let no_proof = ClaimProof {
            caller: addr(1),
            preimage: None,
            capability: None,
        };
        assert_eq!(cond.verify(&no_proof), Err(EscrowError::InvalidProof));
    }

    #[test]
    fn capability_predicate() {
        let cond = Condition::capability(CapabilityId(7));
        let token = CapabilityToken::mint(CapabilityId(7));
        let wrong = CapabilityToken::mint(CapabilityId(8));

        assert!(cond.verify(&ClaimProof::capability(addr(1), &token)).is_ok());
        assert_eq!(
            cond.verify(&ClaimProof::capability(addr(1), &wrong)),
            Err(EscrowError::ConditionMismatch)
        );
    }

    #[test]
    fn recipient_outranks_correct_preimage() {
        let cond = Condition::hashlock(HashCommitment::digest(b"secret")).with_recipient(addr(2));

        // correct preimage, wrong caller
        assert_eq!(
            cond.verify(&ClaimProof::preimage(addr(3), b"secret")),
            Err(EscrowError::Unauthorized)
        );
        assert!(cond.verify(&ClaimProof::preimage(addr(2), b"secret")).is_ok());
    }

    #[test]
    fn compound_condition() {
        let token = CapabilityToken::mint(CapabilityId(1));
        let cond = Condition {
            hash_commitment: Some(HashCommitment::digest(b"secret")),
            capability_id: Some(CapabilityId(1)),
            recipient: None,
        };

        let full = ClaimProof {
            caller: addr(1),
            preimage: Some(b"secret"),
            capability: Some(&token),
        };
        assert!(cond.verify(&full).is_ok());

        // token alone is not enough
        assert_eq!(
            cond.verify(&ClaimProof::capability(addr(1), &token)),
            Err(EscrowError::InvalidProof)
        );
        // preimage alone is not enough
        assert_eq!(
            cond.verify(&ClaimProof::preimage(addr(1), b"secret")),
            Err(EscrowError::ConditionMismatch)
        );
    }
}
