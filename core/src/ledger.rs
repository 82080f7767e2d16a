//! Keyed store of active escrow records.
//!
//! Removal-on-terminal is the concurrency-control primitive: exactly one of
//! a competing claim/reclaim pair can take a record out of the map, and the
//! loser observes [`EscrowError::RecordNotFound`] rather than a logic error.

use std::collections::HashMap;

use crate::identity::RecordId;
use crate::record::EscrowRecord;
use crate::{EscrowError, Result};

/// Registry of `Held` records. Terminal transitions remove entries; there
/// is no update operation.
#[derive(Debug, Default)]
pub struct Ledger {
    records: HashMap<u64, EscrowRecord>,
    next_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next record id and inserts the record `build`
    /// constructs for it. Nothing is stored if `build` fails.
    pub fn insert_with(
        &mut self,
        build: impl FnOnce(RecordId) -> Result<EscrowRecord>,
    ) -> Result<RecordId> {
        let id = RecordId(self.next_id);
        let record = build(id)?;
        debug_assert_eq!(record.id, id);
        self.next_id += 1;
        self.records.insert(id.0, record);
        Ok(id)
    }

    /// # Errors
    ///
    /// [`EscrowError::RecordNotFound`] if the record was settled or never
    /// existed.
    pub fn get(&self, id: RecordId) -> Result<&EscrowRecord> {
        self.records.get(&id.0).ok_or(EscrowError::RecordNotFound)
    }

    /// Removes a record for settlement. This is the commit point of every
    /// terminal transition; callers validate before calling it.
    pub fn settle(&mut self, id: RecordId) -> Result<EscrowRecord> {
        self.records
            .remove(&id.0)
            .ok_or(EscrowError::RecordNotFound)
    }

    /// Iterate over all `Held` records.
    pub fn iter(&self) -> impl Iterator<Item = &EscrowRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
