// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Fixture helpers shared by the integration tests.

#![allow(dead_code)]

use foodshare_store_db::FoodDb;
use rusqlite::params;

pub fn insert_provider(db: &FoodDb, id: i64, name: &str, city: &str) {
    db.connection()
        .execute(
            "INSERT INTO providers (Provider_ID, Name, Type, Address, City, Contact)
             VALUES (?1, ?2, 'Restaurant', ?3, ?4, '+91-000')",
            params![id, name, format!("{id} Main Road"), city],
        )
        .unwrap();
}

pub fn insert_receiver(db: &FoodDb, id: i64, name: &str, city: &str) {
    db.connection()
        .execute(
            "INSERT INTO receivers (Receiver_ID, Name, Type, City, Contact)
             VALUES (?1, ?2, 'NGO', ?3, '+91-111')",
            params![id, name, city],
        )
        .unwrap();
}

#[allow(clippy::too_many_arguments)]
pub fn insert_listing(
    db: &FoodDb,
    id: i64,
    name: &str,
    quantity: i64,
    provider_id: i64,
    provider_type: &str,
    location: &str,
    food_type: &str,
    meal_type: &str,
) {
    db.connection()
        .execute(
            "INSERT INTO food_listings
               (Food_ID, Food_Name, Quantity, Expiry_Date, Provider_ID, Provider_Type,
                Location, Food_Type, Meal_Type)
             VALUES (?1, ?2, ?3, '2025-03-17', ?4, ?5, ?6, ?7, ?8)",
            params![id, name, quantity, provider_id, provider_type, location, food_type, meal_type],
        )
        .unwrap();
}

pub fn insert_claim(db: &FoodDb, id: i64, food_id: i64, receiver_id: i64, status: &str) {
    db.connection()
        .execute(
            "INSERT INTO claims (Claim_ID, Food_ID, Receiver_ID, Status, Timestamp)
             VALUES (?1, ?2, ?3, ?4, '2025-03-05 05:26:00')",
            params![id, food_id, receiver_id, status],
        )
        .unwrap();
}

/// A small but complete dataset: three providers, three receivers, four
/// listings and six claims.
pub fn seeded() -> FoodDb {
    let db = FoodDb::open_memory().unwrap();

    insert_provider(&db, 1, "Gupta Kitchen", "Delhi");
    insert_provider(&db, 2, "Fresh Mart", "Delhi");
    insert_provider(&db, 3, "Sea Breeze", "Mumbai");

    insert_receiver(&db, 1, "Hope Shelter", "Delhi");
    insert_receiver(&db, 2, "Food Bank", "Mumbai");
    insert_receiver(&db, 3, "Anand", "Pune");

    insert_listing(&db, 1, "Rice", 10, 1, "Restaurant", "Delhi", "Vegetarian", "Lunch");
    insert_listing(&db, 2, "Bread", 20, 2, "Grocery Store", "Delhi", "Vegan", "Breakfast");
    insert_listing(&db, 3, "Fish Curry", 5, 3, "Restaurant", "Mumbai", "Non-Vegetarian", "Dinner");
    insert_listing(&db, 4, "Fruit", 8, 2, "Grocery Store", "Pune", "Vegan", "Snacks");

    insert_claim(&db, 1, 1, 1, "Completed");
    insert_claim(&db, 2, 1, 2, "Pending");
    insert_claim(&db, 3, 2, 1, "Completed");
    insert_claim(&db, 4, 3, 3, "Cancelled");
    insert_claim(&db, 5, 2, 1, "Completed");
    // Receiver 9 does not exist; inner joins must drop this claim.
    insert_claim(&db, 6, 4, 9, "Pending");

    db
}
