// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read query operations: catalog execution and typed table readers.

use std::collections::BTreeMap;

use rusqlite::{OptionalExtension, Row, ToSql, named_params};
use tracing::debug;

use crate::catalog::{self, LISTING_BY_ID, QueryDef, Table};
use crate::connection::FoodDb;
use crate::error::{Error, Result};
use crate::types::{Claim, FoodListing, Provider, Receiver, ResultSet, Value};

/// Named parameter values for a catalog query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    values: BTreeMap<String, Value>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any earlier value under the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Match the supplied values against what `def` declares, returning
    /// `(":name", value)` pairs ready for binding.
    fn bind(&self, def: &QueryDef) -> Result<Vec<(String, &Value)>> {
        if let Some(extra) = self.values.keys().find(|k| !def.params.contains(&k.as_str())) {
            return Err(Error::UnexpectedParameter {
                query: def.name,
                param: extra.clone(),
            });
        }
        def.params
            .iter()
            .map(|p| {
                self.values
                    .get(*p)
                    .map(|v| (format!(":{p}"), v))
                    .ok_or_else(|| Error::MissingParameter {
                        query: def.name,
                        param: (*p).to_owned(),
                    })
            })
            .collect()
    }
}

impl FoodDb {
    /// Run a catalog read query with bound parameters.
    pub fn run(&self, def: &QueryDef, params: &QueryParams) -> Result<ResultSet> {
        let bound = params.bind(def)?;
        let named: Vec<(&str, &dyn ToSql)> = bound
            .iter()
            .map(|(name, value)| (name.as_str(), *value as &dyn ToSql))
            .collect();

        let mut stmt = self.conn.prepare_cached(def.sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut out = Vec::new();
        let mut rows = stmt.query(named.as_slice())?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(Value::from(row.get_ref(i)?));
            }
            out.push(values);
        }

        debug!("{} returned {} rows", def.name, out.len());
        Ok(ResultSet { columns, rows: out })
    }

    /// Run an analytics query by name or label (`"Q4"`).
    pub fn run_named(&self, name: &str, params: &QueryParams) -> Result<ResultSet> {
        let def = catalog::lookup(name).ok_or_else(|| Error::UnknownQuery(name.to_owned()))?;
        self.run(def, params)
    }

    /// Every row of one of the dataset tables.
    pub fn dump_table(&self, table: Table) -> Result<ResultSet> {
        self.run(table.dump(), &QueryParams::new())
    }

    pub fn list_providers(&self) -> Result<Vec<Provider>> {
        self.collect_rows(Table::Providers, |row| {
            Ok(Provider {
                provider_id: row.get(0)?,
                name: row.get(1)?,
                provider_type: row.get(2)?,
                address: row.get(3)?,
                city: row.get(4)?,
                contact: row.get(5)?,
            })
        })
    }

    pub fn list_receivers(&self) -> Result<Vec<Receiver>> {
        self.collect_rows(Table::Receivers, |row| {
            Ok(Receiver {
                receiver_id: row.get(0)?,
                name: row.get(1)?,
                receiver_type: row.get(2)?,
                city: row.get(3)?,
                contact: row.get(4)?,
            })
        })
    }

    pub fn list_food_listings(&self) -> Result<Vec<FoodListing>> {
        self.collect_rows(Table::FoodListings, food_listing_from_row)
    }

    pub fn list_claims(&self) -> Result<Vec<Claim>> {
        self.collect_rows(Table::Claims, |row| {
            Ok(Claim {
                claim_id: row.get(0)?,
                food_id: row.get(1)?,
                receiver_id: row.get(2)?,
                status: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })
    }

    /// Query a single listing by id.
    ///
    /// Returns `None` if no listing has that id.
    pub fn food_listing(&self, food_id: i64) -> Result<Option<FoodListing>> {
        let mut stmt = self.conn.prepare_cached(LISTING_BY_ID.sql)?;
        let listing = stmt
            .query_row(named_params! { ":food_id": food_id }, food_listing_from_row)
            .optional()?;
        Ok(listing)
    }

    /// Count the rows of a table.
    pub fn count_rows(&self, table: Table) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn collect_rows<T, F>(&self, table: Table, f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare_cached(table.dump().sql)?;
        let rows = stmt.query_map([], f)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn food_listing_from_row(row: &Row<'_>) -> rusqlite::Result<FoodListing> {
    Ok(FoodListing {
        food_id: row.get(0)?,
        food_name: row.get(1)?,
        quantity: row.get(2)?,
        expiry_date: row.get(3)?,
        provider_id: row.get(4)?,
        provider_type: row.get(5)?,
        location: row.get(6)?,
        food_type: row.get(7)?,
        meal_type: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_missing_parameter_rejected_before_dispatch() {
        let db = FoodDb::open_memory().unwrap();
        let err = db.run_named("Q3", &QueryParams::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingParameter { query: "q3_provider_contacts_in_city", ref param } if param == "city"
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_unexpected_parameter_rejected() {
        let db = FoodDb::open_memory().unwrap();
        let params = QueryParams::new().with("city", "Delhi");
        let err = db.run_named("Q1", &params).unwrap_err();
        assert!(matches!(err, Error::UnexpectedParameter { .. }));
    }

    #[test]
    fn test_unknown_query() {
        let db = FoodDb::open_memory().unwrap();
        let err = db.run_named("Q99", &QueryParams::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownQuery(ref n) if n == "Q99"));
    }

    #[test]
    fn test_columns_match_catalog() {
        let db = FoodDb::open_memory().unwrap();
        for def in &catalog::ANALYTICS {
            let params = if def.params.is_empty() {
                QueryParams::new()
            } else {
                QueryParams::new().with("city", "Delhi")
            };
            let rs = db.run(def, &params).unwrap();
            assert_eq!(rs.columns(), def.columns, "{}", def.name);
        }
        for table in Table::ALL {
            let rs = db.dump_table(table).unwrap();
            assert_eq!(rs.columns(), table.dump().columns, "{table}");
        }
    }

    #[test]
    fn test_bound_value_is_not_interpolated() {
        let db = FoodDb::open_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO providers VALUES (1, 'A', 'Restaurant', 'x', 'Delhi', '1')",
                [],
            )
            .unwrap();
        let params = QueryParams::new().with("city", "Delhi' OR '1'='1");
        let rs = db.run_named("Q3", &params).unwrap();
        assert!(rs.is_empty());
    }

    #[test]
    fn test_typed_readers_accept_null_columns() {
        let db = FoodDb::open_memory().unwrap();
        db.connection()
            .execute_batch(
                r#"
                INSERT INTO providers (Provider_ID, Name, City) VALUES (1, 'A', 'Delhi');
                INSERT INTO receivers (Receiver_ID) VALUES (1);
                INSERT INTO food_listings (Food_ID, Food_Name) VALUES (1, 'Rice');
                INSERT INTO claims (Claim_ID, Food_ID) VALUES (1, 1);
                "#,
            )
            .unwrap();

        let providers = db.list_providers().unwrap();
        assert_eq!(providers[0].city.as_deref(), Some("Delhi"));
        assert_eq!(providers[0].contact, None);

        let receivers = db.list_receivers().unwrap();
        assert_eq!(receivers[0].name, None);

        let listing = db.food_listing(1).unwrap().unwrap();
        assert_eq!(listing.quantity, None);
        assert_eq!(listing.provider_id, None);
        assert_eq!(db.list_food_listings().unwrap(), vec![listing]);

        let claims = db.list_claims().unwrap();
        assert_eq!(claims[0].food_id, Some(1));
        assert_eq!(claims[0].status(), None);
    }

    #[test]
    fn test_count_rows() {
        let db = FoodDb::open_memory().unwrap();
        assert_eq!(db.count_rows(Table::Claims).unwrap(), 0);
        db.connection()
            .execute_batch(
                "INSERT INTO claims (Claim_ID) VALUES (1); INSERT INTO claims (Claim_ID) VALUES (2);",
            )
            .unwrap();
        assert_eq!(db.count_rows(Table::Claims).unwrap(), 2);
        assert_eq!(db.count_rows(Table::Providers).unwrap(), 0);
    }

    #[test]
    fn test_food_listing_absent() {
        let db = FoodDb::open_memory().unwrap();
        assert!(db.food_listing(42).unwrap().is_none());
    }
}
