//! In-process store backed by a sharded concurrent map
//!
//! Each shard lock covers the whole read-modify-write of a record, which is
//! what gives `insert_new` and `record_click` their atomicity. Nothing is
//! persisted across restarts.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::LinkStore;
use crate::error::StoreError;
use crate::model::Link;

#[derive(Debug, Default)]
pub struct MemoryStore {
    links: DashMap<String, Link>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkStore for MemoryStore {
    fn insert_new(&self, link: &Link) -> Result<(), StoreError> {
        match self.links.entry(link.code.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(link.clone());
                Ok(())
            }
        }
    }

    fn get(&self, code: &str) -> Result<Option<Link>, StoreError> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    fn record_click(&self, code: &str) -> Result<Option<Link>, StoreError> {
        Ok(self.links.get_mut(code).map(|mut entry| {
            entry.record_click(Utc::now());
            entry.value().clone()
        }))
    }

    fn list(&self) -> Result<Vec<Link>, StoreError> {
        Ok(self.links.iter().map(|entry| entry.value().clone()).collect())
    }

    fn remove(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.links.remove(code).is_some())
    }
}
