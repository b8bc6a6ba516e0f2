// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Property tests over randomly generated datasets.

mod common;

use foodshare_store_db::{FoodDb, NewListing, QueryParams, Table, Value, catalog};
use proptest::prelude::*;

use common::{insert_claim, insert_listing, insert_provider, insert_receiver};

const CITIES: [&str; 4] = ["Delhi", "Mumbai", "Pune", "Chennai"];
const STATUSES: [&str; 4] = ["Pending", "Completed", "Cancelled", "Expired"];

#[derive(Debug, Clone)]
struct Dataset {
    providers: Vec<usize>,
    receivers: Vec<usize>,
    listings: Vec<(usize, i64, usize)>,
    claims: Vec<(usize, usize, usize)>,
}

prop_compose! {
    fn arb_dataset()(
        providers in prop::collection::vec(0..CITIES.len(), 1..15),
        receivers in prop::collection::vec(0..CITIES.len(), 1..15),
        listings in prop::collection::vec((0..20usize, 1..100i64, 0..CITIES.len()), 0..30),
        claims in prop::collection::vec((0..40usize, 0..20usize, 0..STATUSES.len()), 0..60),
    ) -> Dataset {
        Dataset { providers, receivers, listings, claims }
    }
}

fn load(data: &Dataset) -> FoodDb {
    let db = FoodDb::open_memory().unwrap();
    for (i, city) in data.providers.iter().enumerate() {
        insert_provider(&db, i as i64 + 1, &format!("Provider {i}"), CITIES[*city]);
    }
    for (i, city) in data.receivers.iter().enumerate() {
        insert_receiver(&db, i as i64 + 1, &format!("Receiver {i}"), CITIES[*city]);
    }
    for (i, (provider, quantity, city)) in data.listings.iter().enumerate() {
        insert_listing(
            &db,
            i as i64 + 1,
            &format!("Food {}", i % 7),
            *quantity,
            *provider as i64 + 1,
            "Restaurant",
            CITIES[*city],
            "Vegan",
            "Lunch",
        );
    }
    for (i, (food, receiver, status)) in data.claims.iter().enumerate() {
        insert_claim(
            &db,
            i as i64 + 1,
            *food as i64 + 1,
            *receiver as i64 + 1,
            STATUSES[*status],
        );
    }
    db
}

proptest! {
    #[test]
    fn top_queries_are_bounded_and_descending(data in arb_dataset()) {
        let db = load(&data);
        for def in catalog::ANALYTICS.iter().filter(|q| q.row_limit().is_some()) {
            let rs = db.run(def, &QueryParams::new()).unwrap();
            prop_assert!(rs.len() <= catalog::TOP_N, "{} returned {}", def.name, rs.len());

            let metric: Vec<f64> = rs
                .column(def.metric_column().unwrap())
                .unwrap()
                .into_iter()
                .map(|v| v.as_f64().unwrap())
                .collect();
            prop_assert!(metric.windows(2).all(|w| w[0] >= w[1]), "{}: {:?}", def.name, metric);
        }
    }

    #[test]
    fn status_percentages_sum_to_hundred(data in arb_dataset()) {
        let db = load(&data);
        let rs = db.run_named("Q10", &QueryParams::new()).unwrap();
        if data.claims.is_empty() {
            prop_assert!(rs.is_empty());
        } else {
            let sum: f64 = rs
                .column("percentage")
                .unwrap()
                .into_iter()
                .filter_map(Value::as_f64)
                .sum();
            prop_assert!((sum - 100.0).abs() < 1e-6, "sum = {sum}");
        }
    }

    #[test]
    fn total_quantity_matches_listings(data in arb_dataset()) {
        let db = load(&data);
        let rs = db.run_named("Q5", &QueryParams::new()).unwrap();
        let expected: i64 = data.listings.iter().map(|(_, q, _)| q).sum();
        prop_assert_eq!(rs.record(0).unwrap().values()[0].clone(), Value::Integer(expected));
    }

    #[test]
    fn add_inserts_exactly_one_matching_row(
        provider_id in 1..50i64,
        food_name in "[A-Za-z][A-Za-z ]{0,15}",
        quantity in 1..1000i64,
        location in prop::sample::select(CITIES.to_vec()),
    ) {
        let mut db = FoodDb::open_memory().unwrap();
        let existing = NewListing {
            provider_id,
            food_name: food_name.clone(),
            food_type: "Vegetarian".into(),
            meal_type: "Lunch".into(),
            quantity,
            location: location.to_string(),
        };
        db.add_listing(&existing).unwrap();
        let before = db.count_rows(Table::FoodListings).unwrap();

        let id = db.add_listing(&existing).unwrap();
        prop_assert_eq!(db.count_rows(Table::FoodListings).unwrap(), before + 1);

        let row = db.food_listing(id).unwrap().unwrap();
        prop_assert_eq!(row.provider_id, Some(provider_id));
        prop_assert_eq!(row.food_name, Some(food_name));
        prop_assert_eq!(row.quantity, Some(quantity));
        prop_assert_eq!(row.location.as_deref(), Some(location));
    }
}
