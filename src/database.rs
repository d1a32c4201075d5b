//! Durable link store on the embedded redb database
//!
//! redb allows a single write transaction at a time, so a lookup followed by a
//! write inside one transaction is a serialized critical section. That is how
//! code uniqueness and click counting stay race-free here.

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::error::StoreError;
use crate::model::Link;
use crate::store::LinkStore;

/// Main table for storing link records
///
/// Key: short code as string
/// Value: JSON-serialized [`Link`]
///
/// Example:
/// - Key: "abc123"
/// - Value: '{"code":"abc123","targetUrl":"https://example.com",...}'
pub const TABLE_LINKS: TableDefinition<&str, &str> = TableDefinition::new("links_v1");

/// Creates or opens the database file and makes sure the links table exists
///
/// # Example
///
/// ```no_run
/// # use linkreg::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_LINKS)?;
    }
    write_txn.commit()?;

    Ok(db)
}

pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        Ok(Self::new(init_db(db_path)?))
    }
}

impl LinkStore for RedbStore {
    fn insert_new(&self, link: &Link) -> Result<(), StoreError> {
        let record_json = serde_json::to_string(link)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_LINKS)?;
            if table.get(link.code.as_str())?.is_some() {
                // Dropping the transaction aborts it
                return Err(StoreError::Conflict);
            }
            table.insert(link.code.as_str(), record_json.as_str())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    fn get(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_LINKS)?;

        let link = match table.get(code)? {
            Some(value) => Some(serde_json::from_str(value.value())?),
            None => None,
        };
        Ok(link)
    }

    fn record_click(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let write_txn = self.db.begin_write()?;
        let link = {
            let mut table = write_txn.open_table(TABLE_LINKS)?;
            let mut link: Link = match table.get(code)? {
                Some(value) => serde_json::from_str(value.value())?,
                None => return Ok(None),
            };

            // Stamped while holding the write lock so the last click wins
            link.record_click(Utc::now());
            let record_json = serde_json::to_string(&link)?;
            table.insert(code, record_json.as_str())?;
            link
        };
        write_txn.commit()?;

        Ok(Some(link))
    }

    fn list(&self) -> Result<Vec<Link>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_LINKS)?;

        let mut links = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            links.push(serde_json::from_str(value.value())?);
        }
        Ok(links)
    }

    fn remove(&self, code: &str) -> Result<bool, StoreError> {
        let write_txn = self.db.begin_write()?;
        let mut table = write_txn.open_table(TABLE_LINKS)?;
        let removed = table.remove(code)?.is_some();
        drop(table);
        write_txn.commit()?;

        Ok(removed)
    }
}
