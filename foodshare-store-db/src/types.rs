// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Row types for the food donation dataset and generic query results.

use std::fmt;

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, ValueRef};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

// Only the id columns are declared `not null`, so every other column may be
// NULL in a database loaded from outside this crate.

/// A donor, from the `providers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    pub provider_id: i64,
    pub name: Option<String>,
    /// Restaurant, grocery store, supermarket, ...
    pub provider_type: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
}

/// A recipient, from the `receivers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receiver {
    pub receiver_id: i64,
    pub name: Option<String>,
    /// NGO, shelter, individual, ...
    pub receiver_type: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
}

/// A single food donation, from the `food_listings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodListing {
    pub food_id: i64,
    pub food_name: Option<String>,
    pub quantity: Option<i64>,
    /// Not set by listings created through this crate
    pub expiry_date: Option<String>,
    pub provider_id: Option<i64>,
    /// Not set by listings created through this crate
    pub provider_type: Option<String>,
    pub location: Option<String>,
    pub food_type: Option<String>,
    pub meal_type: Option<String>,
}

/// A receiver's claim against a listing, from the `claims` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub claim_id: i64,
    pub food_id: Option<i64>,
    pub receiver_id: Option<i64>,
    /// Free text; see [`Claim::status`] for a typed view.
    pub status: Option<String>,
    pub timestamp: Option<String>,
}

impl Claim {
    pub fn status(&self) -> Option<ClaimStatus> {
        self.status.as_deref().map(ClaimStatus::from)
    }
}

/// Typed view over the free-text `Status` column.
///
/// The column is not constrained, so unrecognised values are kept verbatim
/// in [`ClaimStatus::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    Pending,
    Completed,
    Cancelled,
    Other(String),
}

impl ClaimStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Completed => "Completed",
            ClaimStatus::Cancelled => "Cancelled",
            ClaimStatus::Other(s) => s,
        }
    }
}

impl From<&str> for ClaimStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => ClaimStatus::Pending,
            "Completed" => ClaimStatus::Completed,
            "Cancelled" => ClaimStatus::Cancelled,
            other => ClaimStatus::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An owned SQLite value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(r) => ValueRef::Real(*r),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        }))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r:.2}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Ordered rows returned by a read query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}

/// One row of a [`ResultSet`], addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
