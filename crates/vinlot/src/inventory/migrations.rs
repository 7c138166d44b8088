//! Inventory schema versioning.
//!
//! The version lives in the `metadata` table. A fresh database gets the
//! full schema from [`SCHEMA_STATEMENTS`] and is stamped with the current
//! version; older databases are stepped forward one version at a time.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Create missing tables and bring the schema up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if schema creation fails, the stored version is not a
/// number, or the database is newer than this build understands.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    let mut current = version;
    while current < CURRENT_VERSION {
        current += 1;
        run_migration(conn, current)?;
    }
    set_schema_version(conn, CURRENT_VERSION)
}

/// Stored schema version, or 0 for a database that has none yet.
///
/// # Errors
///
/// Returns an error if the query fails or the stored value is not a number.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

fn run_migration(_conn: &Connection, version: i32) -> Result<()> {
    match version {
        // Version 1 is the base schema.
        1 => Ok(()),
        _ => Err(Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}
