//! Data representations of the assets an escrow can hold.

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::Result;

/// An asset under escrow. Held exclusively by its record for the record's
/// lifetime and transferred out exactly once, on the terminal transition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "asset_type", rename_all = "snake_case")]
pub enum Asset {
    /// Fungible value in the smallest unit.
    Fungible { amount: u128 },
    /// Non-fungible asset identified uniquely by an id.
    NonFungible { id: String },
}

impl Asset {
    /// Validate by enforcing zero-amount and empty-id invariants.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fungible { amount } if *amount == 0 => Err(AssetError::ZeroAmount.into()),
            Self::NonFungible { id } if id.is_empty() => Err(AssetError::EmptyId.into()),
            _ => Ok(()),
        }
    }

    /// Fungible amount, or an error for non-fungible assets.
    pub fn amount(&self) -> Result<u128> {
        match self {
            Self::Fungible { amount } => Ok(*amount),
            Self::NonFungible { .. } => Err(AssetError::NotFungible.into()),
        }
    }

    pub fn is_fungible(&self) -> bool {
        matches!(self, Self::Fungible { .. })
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fungible { amount } => write!(f, "Fungible[{amount}]"),
            Self::NonFungible { id } => write!(f, "NonFungible[{id}]"),
        }
    }
}
