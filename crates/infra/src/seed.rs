//! Demo dataset: four products, three warehouses, twenty movements.

use chrono::{DateTime, Duration, Utc};

use stockroom_core::{LocationId, MovementId, ProductId};
use stockroom_inventory::Movement;
use stockroom_locations::Location;
use stockroom_products::Product;

use crate::store::{InventoryStore, Snapshot, StoreError, StoreResult};

/// Counts of what [`seed_store`] inserted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub locations: usize,
    pub movements: usize,
}

// Seed ids are literals, so construction cannot fail.
fn pid(s: &str) -> ProductId {
    ProductId::new(s).unwrap_or_else(|e| unreachable!("seed product id {s}: {e}"))
}

fn lid(s: &str) -> LocationId {
    LocationId::new(s).unwrap_or_else(|e| unreachable!("seed location id {s}: {e}"))
}

fn mid(s: String) -> MovementId {
    MovementId::new(&s).unwrap_or_else(|e| unreachable!("seed movement id {s}: {e}"))
}

/// Build the demo dataset with movement timestamps one minute apart from `t0`.
///
/// - `M-IN-1..7`: stock arriving at L-X (even) or L-Y (odd), P-A every third
///   movement and P-B otherwise.
/// - `M-8..20`: transfers out of L-X (even) or L-Y (odd) into L-Z on
///   multiples of three, otherwise across to the other warehouse; P-A on
///   even numbers and P-C on odd ones.
pub fn demo_dataset(t0: DateTime<Utc>) -> Snapshot {
    let products = ["A", "B", "C", "D"]
        .into_iter()
        .map(|s| {
            Product::restore(
                pid(&format!("P-{s}")),
                format!("Product {s}"),
                Some(format!("Sample {s}")),
                None,
            )
        })
        .collect();

    let locations = ["X", "Y", "Z"]
        .into_iter()
        .map(|s| {
            Location::restore(
                lid(&format!("L-{s}")),
                format!("Warehouse {s}"),
                Some(format!("Location {s} addr")),
            )
        })
        .collect();

    let mut movements = Vec::with_capacity(20);

    for i in 1..=7i64 {
        movements.push(Movement::restore(
            mid(format!("M-IN-{i}")),
            t0 + Duration::minutes(i),
            None,
            Some(lid(if i % 2 == 0 { "L-X" } else { "L-Y" })),
            pid(if i % 3 == 0 { "P-A" } else { "P-B" }),
            10 + (i % 5),
        ));
    }

    for i in 8..=20i64 {
        let even = i % 2 == 0;
        let to = if i % 3 == 0 {
            "L-Z"
        } else if even {
            "L-Y"
        } else {
            "L-X"
        };
        movements.push(Movement::restore(
            mid(format!("M-{i}")),
            t0 + Duration::minutes(i),
            Some(lid(if even { "L-X" } else { "L-Y" })),
            Some(lid(to)),
            pid(if even { "P-A" } else { "P-C" }),
            (i % 6) + 1,
        ));
    }

    Snapshot {
        products,
        locations,
        movements,
    }
}

/// Insert the demo dataset into an empty store.
///
/// Refuses to touch a store that already holds products, locations or
/// movements, since ids would collide with existing records.
pub async fn seed_store<S>(store: &S, t0: DateTime<Utc>) -> StoreResult<SeedSummary>
where
    S: InventoryStore + ?Sized,
{
    let existing = store.snapshot().await?;
    if !(existing.products.is_empty() && existing.locations.is_empty() && existing.movements.is_empty()) {
        return Err(StoreError::Conflict("store is not empty; refusing to seed".to_string()));
    }

    let data = demo_dataset(t0);
    let summary = SeedSummary {
        products: data.products.len(),
        locations: data.locations.len(),
        movements: data.movements.len(),
    };

    for p in data.products {
        store.insert_product(p).await?;
    }
    for l in data.locations {
        store.insert_location(l).await?;
    }
    for m in data.movements {
        store.insert_movement(m).await?;
    }

    tracing::info!(
        products = summary.products,
        locations = summary.locations,
        movements = summary.movements,
        "seeded demo dataset"
    );
    Ok(summary)
}
