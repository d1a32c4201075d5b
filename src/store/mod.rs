//! Storage boundary for link records
//!
//! A store is a key-value map from code to [`Link`]. Every method is one
//! round trip and blocking; the registry moves calls onto the blocking pool.
//! Implementations must make `insert_new` and `record_click` atomic with
//! respect to each other and to concurrent calls for the same code.

pub mod memory;

use std::sync::Arc;

use crate::config::{Settings, StorageBackend};
use crate::database::RedbStore;
use crate::error::StoreError;
use crate::model::Link;

pub use memory::MemoryStore;

pub trait LinkStore: Send + Sync + 'static {
    /// Inserts `link` unless its code is taken, in which case
    /// `StoreError::Conflict` is returned and nothing is written.
    fn insert_new(&self, link: &Link) -> Result<(), StoreError>;

    fn get(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Increments the click counter and stamps the click time in one step.
    /// Returns the updated record, or `None` if the code does not exist.
    fn record_click(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// All records, in no particular order
    fn list(&self) -> Result<Vec<Link>, StoreError>;

    /// Returns whether a record was removed
    fn remove(&self, code: &str) -> Result<bool, StoreError>;
}

/// Opens the backend selected in `settings`
pub fn open_store(settings: &Settings) -> Result<Arc<dyn LinkStore>, StoreError> {
    match settings.storage {
        StorageBackend::Redb => {
            let store = RedbStore::open(&settings.database_url)?;
            Ok(Arc::new(store) as Arc<dyn LinkStore>)
        }
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new()) as Arc<dyn LinkStore>),
    }
}
