// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::{SCHEMA_SQL, TABLE_NAMES};

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only access; every write fails with a query error
    ReadOnly,
    /// Read-write access to an existing database
    ReadWrite,
    /// Create new database if it doesn't exist
    Create,
}

/// Handle to the food donation database.
///
/// Constructed once at startup and passed to every operation. Statements and
/// transactions are scoped to the call that issues them, and nothing survives
/// between calls except the connection itself. Call [`FoodDb::close`] at
/// shutdown to observe close errors; dropping the handle closes it silently.
pub struct FoodDb {
    pub(crate) conn: Connection,
}

impl FoodDb {
    /// Open a database at `path`.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let flags = match mode {
            OpenMode::ReadOnly => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_ONLY
            }
            OpenMode::ReadWrite => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE
            }
            OpenMode::Create => OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        };

        let conn = Connection::open_with_flags(path, flags).map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let db = Self { conn };
        db.set_foreign_keys(false)?;

        if mode == OpenMode::Create {
            db.configure_pragmas()?;
        }

        debug!("Opened database at {} ({:?})", path.display(), mode);
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    ///
    /// The database is initialized with the full schema.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.set_foreign_keys(false)?;
        db.create_schema()?;
        debug!("Created in-memory database");
        Ok(db)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;
        Ok(())
    }

    /// Turn foreign key enforcement on or off for this connection.
    ///
    /// [`FoodDb::open`] and [`FoodDb::open_memory`] switch it off whatever
    /// default SQLite was compiled with, so inserting a listing for an unknown
    /// provider succeeds and deleting a listing leaves its claims behind.
    pub fn set_foreign_keys(&self, enabled: bool) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", enabled)?;
        debug!("foreign_keys = {enabled}");
        Ok(())
    }

    /// Whether foreign key enforcement is active on this connection.
    pub fn foreign_keys(&self) -> Result<bool> {
        let on: i64 = self
            .conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
        Ok(on != 0)
    }

    /// Create the four dataset tables if they are missing.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        debug!("Created database schema");
        Ok(())
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Check that all four dataset tables exist.
    pub fn has_schema(&self) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1")?;
        for table in TABLE_NAMES {
            let count: i64 = stmt.query_row([table], |row| row.get(0))?;
            if count == 0 {
                debug!("Table {table} is missing");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Close the connection, reporting any error SQLite raises while doing so.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Sqlite(e))?;
        debug!("Closed database");
        Ok(())
    }
}
