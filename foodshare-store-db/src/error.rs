// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Error types for food donation store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during store database operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite rejected or failed a statement
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// A caller-supplied field failed a precondition
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A query was dispatched without one of its required parameters
    #[error("Query '{query}' requires parameter '{param}'")]
    MissingParameter { query: &'static str, param: String },

    /// A parameter was supplied that the query does not declare
    #[error("Query '{query}' does not accept parameter '{param}'")]
    UnexpectedParameter { query: &'static str, param: String },

    /// No catalog entry with this name or label
    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    /// Not one of the four dataset tables
    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// Coarse classification of [`Error`] for callers that only need to know
/// where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The store could not be reached or opened.
    Connection,
    /// The store rejected the statement.
    Query,
    /// The caller's input was rejected before dispatch.
    Validation,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DatabaseOpen { .. } | Error::DatabaseNotFound(_) => ErrorKind::Connection,
            Error::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if matches!(
                    e.code,
                    rusqlite::ErrorCode::CannotOpen
                        | rusqlite::ErrorCode::NotADatabase
                        | rusqlite::ErrorCode::DatabaseBusy
                        | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                ErrorKind::Connection
            }
            Error::Sqlite(_) => ErrorKind::Query,
            Error::Validation { .. }
            | Error::MissingParameter { .. }
            | Error::UnexpectedParameter { .. }
            | Error::UnknownQuery(_)
            | Error::UnknownTable(_) => ErrorKind::Validation,
        }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
