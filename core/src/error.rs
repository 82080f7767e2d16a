use thiserror::Error;

/// Escrow-related errors.
///
/// Every precondition failure aborts the whole operation; a failed claim or
/// reclaim leaves the record exactly as it was.
#[derive(Debug, Error, PartialEq)]
pub enum EscrowError {
    /// Malformed condition at creation time.
    #[error("invalid condition: {0}")]
    InvalidCondition(ConditionError),

    /// Zero duration, or an expiry that does not resolve to a future timestamp.
    #[error("invalid deadline")]
    InvalidDeadline,

    /// Claim attempted at or after expiry.
    #[error("deadline expired")]
    DeadlineExpired,

    /// Reclaim attempted before expiry.
    #[error("deadline not reached")]
    DeadlineNotReached,

    /// Preimage does not hash to the stored commitment.
    #[error("preimage does not match hash commitment")]
    InvalidProof,

    /// Caller is not the party the operation is restricted to.
    #[error("unauthorized caller")]
    Unauthorized,

    /// Wrong capability token presented.
    #[error("capability token does not match condition")]
    ConditionMismatch,

    /// Factory pool cannot cover the requested withdrawal.
    #[error("insufficient pooled funds: requested {requested}, available {available}")]
    InsufficientAmount { requested: u128, available: u128 },

    /// The record was already settled (or never existed). This is the error
    /// the loser of a claim/reclaim race observes.
    #[error("escrow record not found")]
    RecordNotFound,

    #[error("asset error: {0}")]
    Asset(AssetError),

    #[error("identity error: {0}")]
    Identity(IdentityError),
}

/// Errors rejecting a condition at escrow creation.
#[derive(Debug, Error, PartialEq)]
pub enum ConditionError {
    #[error("hash commitment must be 32 bytes, got {0}")]
    CommitmentLength(usize),

    #[error("foreign address must be 20 bytes, got {0}")]
    ForeignAddressLength(usize),

    #[error("condition must carry at least one predicate")]
    Empty,

    #[error("an unsettled record already exists for this hashlock")]
    DuplicateHashlock,
}

/// Errors when validating or working with an `Asset`.
#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("non-fungible asset id must be non-empty")]
    EmptyId,

    #[error("fungible asset expected")]
    NotFungible,

    #[error("non-fungible asset expected")]
    NotNonFungible,

    #[error("amount overflow")]
    Overflow,
}

/// Errors that might occur while parsing identities.
#[derive(Debug, Error, PartialEq)]
pub enum IdentityError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("address must be 32 bytes, got {0}")]
    Length(usize),
}

impl From<ConditionError> for EscrowError {
    fn from(value: ConditionError) -> Self {
        Self::InvalidCondition(value)
    }
}

impl From<AssetError> for EscrowError {
    fn from(value: AssetError) -> Self {
        Self::Asset(value)
    }
}

impl From<IdentityError> for EscrowError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}
