// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! SQLite query layer for the food donation dataset.
//!
//! This crate owns every statement the dashboard runs against the
//! `providers`, `receivers`, `food_listings` and `claims` tables: whole-table
//! dumps, the fixed analytics queries, and the add/update/delete operations
//! on food listings.
//!
//! # Key Features
//!
//! - Static query catalog with display hints for charting
//! - Column-name keyed result sets that serialize to JSON objects
//! - Transactional, validated writes with bound parameters only
//! - In-memory database for testing
//!
//! # Example
//!
//! ```ignore
//! use foodshare_store_db::{FoodDb, OpenMode, QueryParams};
//!
//! let db = FoodDb::open("food_wastage.db", OpenMode::ReadOnly)?;
//!
//! let per_city = db.run_named("Q1", &QueryParams::new())?;
//! for record in per_city.records() {
//!     println!("{:?}", record.get("City"));
//! }
//!
//! db.close()?;
//! ```

pub mod catalog;
mod connection;
mod error;
mod query;
mod schema;
mod types;
mod write;

pub use catalog::{DisplayHint, QueryDef, Table, WriteStatement};
pub use connection::{FoodDb, OpenMode};
pub use error::{Error, ErrorKind, Result};
pub use query::QueryParams;
pub use schema::{SCHEMA_SQL, TABLE_NAMES};
pub use types::*;
pub use write::*;
