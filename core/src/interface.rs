//! JSON (de)serialization of escrow parameters for file-driven collaborators.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::commitment::{ForeignAddress, HashCommitment};
use crate::identity::Address;
use crate::time::DurationMs;

/// Reads a JSON-encoded file from the given `path` and deserializes into type `T`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be opened, read, or parsed.
pub fn load_escrow_data<P, T>(path: P) -> anyhow::Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("loading escrow data: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parsing JSON from {:?}", path))
}

/// Writes `data` (serializable) as pretty-printed JSON to the given `path`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be created or data cannot be serialized.
pub fn save_escrow_data<P, T>(path: P, data: &T) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating file {:?}", path))?;
    serde_json::to_writer_pretty(file, data)
        .with_context(|| format!("serializing to JSON to {:?}", path))
}

/// Parameters a wallet or relayer submits to open an escrow, variant fields
/// optional per the variant table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EscrowParams {
    pub asset: Asset,
    pub creator: Address,
    pub recipient: Option<Address>,
    pub hash_commitment: Option<HashCommitment>,
    pub foreign_address: Option<ForeignAddress>,
    pub duration: DurationMs,
}
