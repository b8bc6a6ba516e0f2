// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! The fixed set of statements the dashboard may run.
//!
//! Every read and write is declared here with its SQL text, the named
//! parameters it binds and, for reads, the columns it returns and how they
//! should be charted. Nothing outside this module builds SQL.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// How a presentation layer should draw a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayHint {
    /// Plain table, no chart.
    Table,
    /// Bar chart with `index` as the category axis. `limit` truncates what is
    /// drawn, not what the query returns.
    Bar {
        index: &'static str,
        limit: Option<usize>,
    },
    /// Pie chart of `values` labelled by `labels`.
    Pie {
        labels: &'static str,
        values: &'static str,
    },
    /// A single headline number taken from the first row.
    Metric {
        label: &'static str,
        column: &'static str,
    },
}

/// A catalog read entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryDef {
    /// Stable key, e.g. `q1_providers_per_city`
    pub name: &'static str,
    /// Short dashboard label, e.g. `Q1`
    pub label: &'static str,
    pub title: &'static str,
    #[serde(skip)]
    pub sql: &'static str,
    /// Named parameters the SQL binds, without the leading `:`
    pub params: &'static [&'static str],
    pub columns: &'static [&'static str],
    /// Row cap applied by the SQL itself, ordered by the last column
    /// descending
    pub top_n: Option<usize>,
    pub hint: DisplayHint,
}

impl QueryDef {
    /// Whether the query caps its result at a fixed number of rows.
    pub fn row_limit(&self) -> Option<usize> {
        self.top_n
    }

    /// The column a top-N query is ordered by, descending.
    pub fn metric_column(&self) -> Option<&'static str> {
        self.row_limit().and_then(|_| self.columns.last().copied())
    }
}

/// Row cap for the "top N" analytics.
pub const TOP_N: usize = 10;

/// The analytics queries, in dashboard order.
pub static ANALYTICS: [QueryDef; 14] = [
    QueryDef {
        name: "q1_providers_per_city",
        label: "Q1",
        title: "Providers per city",
        sql: "SELECT City, COUNT(*) AS provider_count FROM providers GROUP BY City",
        params: &[],
        columns: &["City", "provider_count"],
        top_n: None,
        hint: DisplayHint::Bar {
            index: "City",
            limit: Some(10),
        },
    },
    QueryDef {
        name: "q1b_receivers_per_city",
        label: "Q1b",
        title: "Receivers per city",
        sql: "SELECT City, COUNT(*) AS receiver_count FROM receivers GROUP BY City",
        params: &[],
        columns: &["City", "receiver_count"],
        top_n: None,
        hint: DisplayHint::Bar {
            index: "City",
            limit: Some(10),
        },
    },
    QueryDef {
        name: "q2_listings_by_provider_type",
        label: "Q2",
        title: "Provider type contributing most food",
        sql: "SELECT Provider_Type, COUNT(*) AS total_listings FROM food_listings GROUP BY Provider_Type",
        params: &[],
        columns: &["Provider_Type", "total_listings"],
        top_n: None,
        hint: DisplayHint::Bar {
            index: "Provider_Type",
            limit: None,
        },
    },
    QueryDef {
        name: "q3_provider_contacts_in_city",
        label: "Q3",
        title: "Provider contact info in a city",
        sql: "SELECT Name, Contact, Address, City FROM providers WHERE City = :city",
        params: &["city"],
        columns: &["Name", "Contact", "Address", "City"],
        top_n: None,
        hint: DisplayHint::Table,
    },
    QueryDef {
        name: "q4_top_receivers_by_claims",
        label: "Q4",
        title: "Top 10 receivers by claims",
        sql: r#"
            SELECT r.Name, COUNT(c.Claim_ID) AS total_claims
            FROM claims c
            JOIN receivers r ON c.Receiver_ID = r.Receiver_ID
            GROUP BY r.Name
            ORDER BY total_claims DESC
            LIMIT 10
            "#,
        params: &[],
        columns: &["Name", "total_claims"],
        top_n: Some(TOP_N),
        hint: DisplayHint::Bar {
            index: "Name",
            limit: None,
        },
    },
    QueryDef {
        name: "q5_total_quantity_available",
        label: "Q5",
        title: "Total quantity of food available",
        sql: "SELECT COALESCE(SUM(Quantity), 0) AS total_food_available FROM food_listings",
        params: &[],
        columns: &["total_food_available"],
        top_n: None,
        hint: DisplayHint::Metric {
            label: "Total Food Available",
            column: "total_food_available",
        },
    },
    QueryDef {
        name: "q6_top_cities_by_listings",
        label: "Q6",
        title: "Cities with the most food listings",
        sql: r#"
            SELECT Location AS City, COUNT(*) AS total_listings
            FROM food_listings
            GROUP BY Location
            ORDER BY total_listings DESC
            LIMIT 10
            "#,
        params: &[],
        columns: &["City", "total_listings"],
        top_n: Some(TOP_N),
        hint: DisplayHint::Bar {
            index: "City",
            limit: None,
        },
    },
    QueryDef {
        name: "q7_food_type_counts",
        label: "Q7",
        title: "Most commonly available food types",
        sql: "SELECT Food_Type, COUNT(*) AS count_food FROM food_listings GROUP BY Food_Type",
        params: &[],
        columns: &["Food_Type", "count_food"],
        top_n: None,
        hint: DisplayHint::Bar {
            index: "Food_Type",
            limit: None,
        },
    },
    QueryDef {
        name: "q8_top_claimed_foods",
        label: "Q8",
        title: "Claims made per food item (top 10)",
        sql: r#"
            SELECT f.Food_Name, COUNT(c.Claim_ID) AS claims_count
            FROM claims c
            JOIN food_listings f ON c.Food_ID = f.Food_ID
            GROUP BY f.Food_Name
            ORDER BY claims_count DESC
            LIMIT 10
            "#,
        params: &[],
        columns: &["Food_Name", "claims_count"],
        top_n: Some(TOP_N),
        hint: DisplayHint::Bar {
            index: "Food_Name",
            limit: None,
        },
    },
    QueryDef {
        name: "q9_top_providers_by_completed_claims",
        label: "Q9",
        title: "Providers with the most successful claims",
        sql: r#"
            SELECT p.Name, COUNT(c.Claim_ID) AS successful_claims
            FROM claims c
            JOIN food_listings f ON c.Food_ID = f.Food_ID
            JOIN providers p ON f.Provider_ID = p.Provider_ID
            WHERE c.Status = 'Completed'
            GROUP BY p.Name
            ORDER BY successful_claims DESC
            LIMIT 10
            "#,
        params: &[],
        columns: &["Name", "successful_claims"],
        top_n: Some(TOP_N),
        hint: DisplayHint::Bar {
            index: "Name",
            limit: None,
        },
    },
    QueryDef {
        name: "q10_claim_status_distribution",
        label: "Q10",
        title: "Claim status distribution (%)",
        sql: r#"
            SELECT Status,
                   COUNT(*) * 100.0 / NULLIF((SELECT COUNT(*) FROM claims), 0) AS percentage
            FROM claims
            GROUP BY Status
            "#,
        params: &[],
        columns: &["Status", "percentage"],
        top_n: None,
        hint: DisplayHint::Pie {
            labels: "Status",
            values: "percentage",
        },
    },
    QueryDef {
        name: "q11_top_receivers_by_avg_quantity",
        label: "Q11",
        title: "Average quantity claimed per receiver (top 10)",
        sql: r#"
            SELECT r.Name, AVG(f.Quantity) AS avg_quantity_claimed
            FROM claims c
            JOIN receivers r ON c.Receiver_ID = r.Receiver_ID
            JOIN food_listings f ON c.Food_ID = f.Food_ID
            GROUP BY r.Name
            ORDER BY avg_quantity_claimed DESC
            LIMIT 10
            "#,
        params: &[],
        columns: &["Name", "avg_quantity_claimed"],
        top_n: Some(TOP_N),
        hint: DisplayHint::Bar {
            index: "Name",
            limit: None,
        },
    },
    QueryDef {
        name: "q12_claims_by_meal_type",
        label: "Q12",
        title: "Most claimed meal type",
        sql: r#"
            SELECT f.Meal_Type, COUNT(c.Claim_ID) AS total_claims
            FROM claims c
            JOIN food_listings f ON c.Food_ID = f.Food_ID
            GROUP BY f.Meal_Type
            ORDER BY total_claims DESC
            "#,
        params: &[],
        columns: &["Meal_Type", "total_claims"],
        top_n: None,
        hint: DisplayHint::Bar {
            index: "Meal_Type",
            limit: None,
        },
    },
    QueryDef {
        name: "q13_top_providers_by_quantity",
        label: "Q13",
        title: "Total quantity donated by each provider (top 10)",
        sql: r#"
            SELECT p.Name, SUM(f.Quantity) AS total_donated
            FROM food_listings f
            JOIN providers p ON f.Provider_ID = p.Provider_ID
            GROUP BY p.Name
            ORDER BY total_donated DESC
            LIMIT 10
            "#,
        params: &[],
        columns: &["Name", "total_donated"],
        top_n: Some(TOP_N),
        hint: DisplayHint::Bar {
            index: "Name",
            limit: None,
        },
    },
];

/// Find an analytics query by name or label, ignoring case.
pub fn lookup(name: &str) -> Option<&'static QueryDef> {
    ANALYTICS
        .iter()
        .find(|q| q.name.eq_ignore_ascii_case(name) || q.label.eq_ignore_ascii_case(name))
}

/// The four dataset tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Providers,
    Receivers,
    FoodListings,
    Claims,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Providers,
        Table::Receivers,
        Table::FoodListings,
        Table::Claims,
    ];

    pub fn name(self) -> &'static str {
        self.dump().name
    }

    /// The catalog entry that dumps the whole table.
    pub fn dump(self) -> &'static QueryDef {
        match self {
            Table::Providers => &TABLE_DUMPS[0],
            Table::Receivers => &TABLE_DUMPS[1],
            Table::FoodListings => &TABLE_DUMPS[2],
            Table::Claims => &TABLE_DUMPS[3],
        }
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownTable(s.to_owned()))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const LISTING_COLUMNS: &[&str] = &[
    "Food_ID",
    "Food_Name",
    "Quantity",
    "Expiry_Date",
    "Provider_ID",
    "Provider_Type",
    "Location",
    "Food_Type",
    "Meal_Type",
];

static TABLE_DUMPS: [QueryDef; 4] = [
    QueryDef {
        name: "providers",
        label: "providers",
        title: "Providers",
        sql: "SELECT Provider_ID, Name, Type, Address, City, Contact FROM providers",
        params: &[],
        columns: &["Provider_ID", "Name", "Type", "Address", "City", "Contact"],
        top_n: None,
        hint: DisplayHint::Table,
    },
    QueryDef {
        name: "receivers",
        label: "receivers",
        title: "Receivers",
        sql: "SELECT Receiver_ID, Name, Type, City, Contact FROM receivers",
        params: &[],
        columns: &["Receiver_ID", "Name", "Type", "City", "Contact"],
        top_n: None,
        hint: DisplayHint::Table,
    },
    QueryDef {
        name: "food_listings",
        label: "food_listings",
        title: "Food listings",
        sql: r#"
            SELECT Food_ID, Food_Name, Quantity, Expiry_Date, Provider_ID,
                   Provider_Type, Location, Food_Type, Meal_Type
            FROM food_listings
            "#,
        params: &[],
        columns: LISTING_COLUMNS,
        top_n: None,
        hint: DisplayHint::Table,
    },
    QueryDef {
        name: "claims",
        label: "claims",
        title: "Claims",
        sql: "SELECT Claim_ID, Food_ID, Receiver_ID, Status, Timestamp FROM claims",
        params: &[],
        columns: &["Claim_ID", "Food_ID", "Receiver_ID", "Status", "Timestamp"],
        top_n: None,
        hint: DisplayHint::Table,
    },
];

/// Single listing by id, for reading back a row after a write.
pub static LISTING_BY_ID: QueryDef = QueryDef {
    name: "food_listing_by_id",
    label: "food_listing",
    title: "Food listing",
    sql: r#"
        SELECT Food_ID, Food_Name, Quantity, Expiry_Date, Provider_ID,
               Provider_Type, Location, Food_Type, Meal_Type
        FROM food_listings
        WHERE Food_ID = :food_id
        "#,
    params: &["food_id"],
    columns: LISTING_COLUMNS,
    top_n: None,
    hint: DisplayHint::Table,
};

/// The write statements, all against `food_listings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatement {
    AddListing,
    UpdateQuantity,
    DeleteListing,
}

impl WriteStatement {
    pub fn sql(self) -> &'static str {
        match self {
            WriteStatement::AddListing => {
                r#"
                INSERT INTO food_listings (Provider_ID, Food_Name, Food_Type, Meal_Type, Quantity, Location)
                VALUES (:provider_id, :food_name, :food_type, :meal_type, :quantity, :location)
                "#
            }
            WriteStatement::UpdateQuantity => {
                "UPDATE food_listings SET Quantity = :quantity WHERE Food_ID = :food_id"
            }
            WriteStatement::DeleteListing => "DELETE FROM food_listings WHERE Food_ID = :food_id",
        }
    }

    pub fn params(self) -> &'static [&'static str] {
        match self {
            WriteStatement::AddListing => &[
                "provider_id",
                "food_name",
                "food_type",
                "meal_type",
                "quantity",
                "location",
            ],
            WriteStatement::UpdateQuantity => &["quantity", "food_id"],
            WriteStatement::DeleteListing => &["food_id"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WriteStatement::AddListing => "add_listing",
            WriteStatement::UpdateQuantity => "update_quantity",
            WriteStatement::DeleteListing => "delete_listing",
        }
    }
}
