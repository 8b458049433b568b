//! Balance report: net quantity per product per location.
//!
//! The report is a pure function of three snapshots. Every product × location
//! pair starts at zero; each movement then adds its quantity at the
//! destination and subtracts it at the source. Only the sum matters, so the
//! result does not depend on the order of the movements.
//!
//! Dangling references never fail the computation:
//! - a source or destination that is not a known location is skipped for
//!   that side only;
//! - a product that is not in the catalog still accumulates, under its id,
//!   against known locations (its name resolves to `""`).

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use stockroom_core::{LocationId, ProductId};
use stockroom_locations::Location;
use stockroom_products::Product;

use crate::movement::Movement;

/// One line of the balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub location_id: LocationId,
    pub location_name: String,
    /// Widened so that summing any number of `i64` quantities cannot overflow.
    pub qty: i128,
}

/// Dense balance table, rows sorted by `(product_id, location_id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    rows: Vec<BalanceRow>,
}

impl BalanceReport {
    pub fn rows(&self) -> &[BalanceRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<BalanceRow> {
        self.rows
    }

    /// Balance of a single cell, if the pair is part of the report.
    pub fn get(&self, product_id: &ProductId, location_id: &LocationId) -> Option<i128> {
        self.rows
            .binary_search_by(|row| {
                (&row.product_id, &row.location_id).cmp(&(product_id, location_id))
            })
            .ok()
            .map(|idx| self.rows[idx].qty)
    }

    /// Sum of a product's balance over every location in the report.
    pub fn product_total(&self, product_id: &ProductId) -> i128 {
        self.rows
            .iter()
            .filter(|row| &row.product_id == product_id)
            .map(|row| row.qty)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Derive the balance report from full snapshots of the three collections.
pub fn compute_balances(
    products: &[Product],
    locations: &[Location],
    movements: &[Movement],
) -> BalanceReport {
    let product_names: HashMap<&ProductId, &str> = products
        .iter()
        .map(|p| (p.id_typed(), p.name()))
        .collect();
    let location_names: HashMap<&LocationId, &str> = locations
        .iter()
        .map(|l| (l.id_typed(), l.name()))
        .collect();

    let mut balances: BTreeMap<(&ProductId, &LocationId), i128> = BTreeMap::new();
    for p in products {
        for l in locations {
            balances.insert((p.id_typed(), l.id_typed()), 0);
        }
    }

    for m in movements {
        if let Some(to) = m.to_location().filter(|l| location_names.contains_key(l)) {
            *balances.entry((m.product_id(), to)).or_insert(0) += i128::from(m.qty());
        }
        if let Some(from) = m.from_location().filter(|l| location_names.contains_key(l)) {
            *balances.entry((m.product_id(), from)).or_insert(0) -= i128::from(m.qty());
        }
    }

    let rows = balances
        .into_iter()
        .map(|((product_id, location_id), qty)| BalanceRow {
            product_name: product_names.get(product_id).copied().unwrap_or_default().to_string(),
            location_name: location_names.get(location_id).copied().unwrap_or_default().to_string(),
            product_id: product_id.clone(),
            location_id: location_id.clone(),
            qty,
        })
        .collect();

    BalanceReport { rows }
}
