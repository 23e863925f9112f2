//! Embedded schema steps.
//!
//! Each step is one SQL file. The last applied step is kept in
//! `PRAGMA user_version`, so reopening a file only runs newer steps.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// `(version, sql)` pairs in ascending version order.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_store.sql"))];

pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Version recorded in the database header.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Runs every step newer than the recorded version inside one transaction.
///
/// Returns how many steps were applied.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    match found.cmp(&supported) {
        Ordering::Greater => return Err(DbError::UnsupportedSchemaVersion { found, supported }),
        Ordering::Equal => return Ok(0),
        Ordering::Less => {}
    }

    let tx = conn.transaction()?;
    let mut applied = 0;
    for &(version, sql) in STEPS.iter().filter(|(version, _)| *version > found) {
        tx.execute_batch(sql)
            .map_err(|source| DbError::Migration { version, source })?;
        tx.pragma_update(None, "user_version", version)?;
        applied += 1;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={found} to={supported} applied={applied}");
    Ok(applied)
}
