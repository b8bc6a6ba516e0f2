// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database schema definitions for the food donation dataset.
//!
//! The production database is expected to exist already; this DDL only
//! bootstraps scratch and in-memory databases. Foreign keys are declared but
//! only enforced when `PRAGMA foreign_keys` is switched on.

/// The four dataset tables.
pub const SCHEMA_SQL: &str = r#"
create table if not exists providers (
    Provider_ID integer primary key not null,
    Name        text,
    Type        text,
    Address     text,
    City        text,
    Contact     text
);

create table if not exists receivers (
    Receiver_ID integer primary key not null,
    Name        text,
    Type        text,
    City        text,
    Contact     text
);

create table if not exists food_listings (
    Food_ID       integer primary key autoincrement not null,
    Food_Name     text,
    Quantity      integer,
    Expiry_Date   text,
    Provider_ID   integer,
    Provider_Type text,
    Location      text,
    Food_Type     text,
    Meal_Type     text,
    foreign key (Provider_ID) references providers(Provider_ID)
);

create index if not exists IndexFoodListingsProvider on food_listings(Provider_ID);

create table if not exists claims (
    Claim_ID    integer primary key not null,
    Food_ID     integer,
    Receiver_ID integer,
    Status      text,
    Timestamp   text,
    foreign key (Food_ID) references food_listings(Food_ID),
    foreign key (Receiver_ID) references receivers(Receiver_ID)
);

create index if not exists IndexClaimsFood on claims(Food_ID);
create index if not exists IndexClaimsReceiver on claims(Receiver_ID);
"#;

/// Table names in dependency order.
pub const TABLE_NAMES: [&str; 4] = ["providers", "receivers", "food_listings", "claims"];
