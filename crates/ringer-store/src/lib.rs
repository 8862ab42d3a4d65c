pub mod error;
pub mod history;
pub mod migrate;
pub mod paths;
pub mod property;
pub mod repo;

use crate::error::Result;
use ringer_core::InMemoryCallHistory;
use rusqlite::Connection;
use std::path::Path;

pub use history::PersistentCallHistory;
pub use property::{MemoryPropertyListStorage, PropertyDictionary, PropertyListStorage, PropertyValue};

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens or creates the database file, readable by its owner only.
    pub fn open(path: &Path) -> Result<Self> {
        create_private_file(path)?;
        Self::configure(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // Items and values cascade from their list.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        // Rollback journal keeps the store to a single file.
        conn.pragma_update(None, "journal_mode", "DELETE")?;
        conn.busy_timeout(std::time::Duration::from_secs(2))?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn property_list(&self, name: &str) -> repo::PropertyListRepo<'_> {
        repo::PropertyListRepo::new(&self.conn, name)
    }

    /// Call history persisted to the named property list, loaded on return.
    pub fn call_history(
        &self,
        list: &str,
    ) -> PersistentCallHistory<InMemoryCallHistory, repo::PropertyListRepo<'_>> {
        PersistentCallHistory::new(InMemoryCallHistory::new(), self.property_list(list))
    }
}

#[cfg(unix)]
fn create_private_file(path: &Path) -> Result<()> {
    use std::fs::{self, OpenOptions};
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn create_private_file(_path: &Path) -> Result<()> {
    Ok(())
}
