// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Write operations on the `food_listings` table.
//!
//! Each operation is one bound statement run in its own transaction. The
//! transaction rolls back when dropped, so an error anywhere before commit
//! leaves the database untouched.

use rusqlite::ToSql;
use tracing::{debug, warn};

use crate::catalog::WriteStatement;
use crate::connection::FoodDb;
use crate::error::{Error, Result};
use crate::types::Value;

/// Fields for a new food listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    /// Not checked against `providers`
    pub provider_id: i64,
    pub food_name: String,
    pub food_type: String,
    pub meal_type: String,
    /// Must be at least 1
    pub quantity: i64,
    pub location: String,
}

/// A write request against `food_listings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Add(NewListing),
    UpdateQuantity { food_id: i64, quantity: i64 },
    Delete { food_id: i64 },
}

/// Outcome of a committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteAck {
    pub rows_affected: usize,
    /// The generated `Food_ID` of an added listing
    pub inserted_id: Option<i64>,
}

fn check_quantity(quantity: i64) -> Result<()> {
    if quantity < 1 {
        return Err(Error::validation(
            "quantity",
            format!("must be at least 1, got {quantity}"),
        ));
    }
    Ok(())
}

fn check_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

impl WriteOp {
    pub fn statement(&self) -> WriteStatement {
        match self {
            WriteOp::Add(_) => WriteStatement::AddListing,
            WriteOp::UpdateQuantity { .. } => WriteStatement::UpdateQuantity,
            WriteOp::Delete { .. } => WriteStatement::DeleteListing,
        }
    }

    /// Check caller-side preconditions. The store is never consulted.
    pub fn validate(&self) -> Result<()> {
        match self {
            WriteOp::Add(listing) => {
                check_text("food_name", &listing.food_name)?;
                check_text("food_type", &listing.food_type)?;
                check_text("meal_type", &listing.meal_type)?;
                check_text("location", &listing.location)?;
                check_quantity(listing.quantity)
            }
            WriteOp::UpdateQuantity { quantity, .. } => check_quantity(*quantity),
            WriteOp::Delete { .. } => Ok(()),
        }
    }

    /// Parameter values in the order of [`WriteStatement::params`].
    fn values(&self) -> Vec<Value> {
        match self {
            WriteOp::Add(l) => vec![
                Value::Integer(l.provider_id),
                Value::from(l.food_name.as_str()),
                Value::from(l.food_type.as_str()),
                Value::from(l.meal_type.as_str()),
                Value::Integer(l.quantity),
                Value::from(l.location.as_str()),
            ],
            WriteOp::UpdateQuantity { food_id, quantity } => {
                vec![Value::Integer(*quantity), Value::Integer(*food_id)]
            }
            WriteOp::Delete { food_id } => vec![Value::Integer(*food_id)],
        }
    }
}

impl FoodDb {
    /// Validate and run a write, committing on success.
    pub fn apply(&mut self, op: &WriteOp) -> Result<WriteAck> {
        op.validate()?;

        let statement = op.statement();
        let names: Vec<String> = statement.params().iter().map(|p| format!(":{p}")).collect();
        let values = op.values();
        let named: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .map(String::as_str)
            .zip(values.iter().map(|v| v as &dyn ToSql))
            .collect();

        let tx = self.conn.transaction()?;
        let rows_affected = {
            let mut stmt = tx.prepare_cached(statement.sql())?;
            stmt.execute(named.as_slice())?
        };
        let inserted_id = matches!(op, WriteOp::Add(_)).then(|| tx.last_insert_rowid());
        tx.commit()?;

        if rows_affected == 0 {
            warn!("{} matched no rows", statement.name());
        } else {
            debug!("{} affected {rows_affected} rows", statement.name());
        }
        Ok(WriteAck {
            rows_affected,
            inserted_id,
        })
    }

    /// Insert a new listing.
    ///
    /// Returns the generated `Food_ID`. Identical inputs insert identical
    /// rows under different ids.
    pub fn add_listing(&mut self, listing: &NewListing) -> Result<i64> {
        let ack = self.apply(&WriteOp::Add(listing.clone()))?;
        Ok(ack.inserted_id.unwrap_or_else(|| self.conn.last_insert_rowid()))
    }

    /// Set the quantity of a listing.
    ///
    /// Returns the number of rows changed; an unknown id changes nothing and
    /// is not an error.
    pub fn update_quantity(&mut self, food_id: i64, quantity: i64) -> Result<usize> {
        let ack = self.apply(&WriteOp::UpdateQuantity { food_id, quantity })?;
        Ok(ack.rows_affected)
    }

    /// Delete a listing.
    ///
    /// Claims against the listing are left in place. Returns the number of
    /// rows removed; an unknown id removes nothing and is not an error.
    pub fn delete_listing(&mut self, food_id: i64) -> Result<usize> {
        let ack = self.apply(&WriteOp::Delete { food_id })?;
        Ok(ack.rows_affected)
    }
}
