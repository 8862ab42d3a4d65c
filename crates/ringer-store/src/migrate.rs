use crate::error::{Result, StoreError};
use rusqlite::Connection;

/// Schema steps in order. `PRAGMA user_version` counts how many have run.
const MIGRATIONS: &[&str] = &[include_str!("../migrations/001_init.sql")];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;
    let applied = usize::try_from(current)
        .ok()
        .filter(|applied| *applied <= MIGRATIONS.len())
        .ok_or_else(|| {
            StoreError::Migration(format!(
                "schema version {current} not in 0..={}",
                MIGRATIONS.len()
            ))
        })?;
    if applied == MIGRATIONS.len() {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    for (offset, sql) in MIGRATIONS.iter().enumerate().skip(applied) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", (offset + 1) as i64)?;
    }
    tx.commit()?;
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}
