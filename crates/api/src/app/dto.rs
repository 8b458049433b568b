use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_inventory::{BalanceReport, BalanceRow, Movement, MovementKind};
use stockroom_locations::Location;
use stockroom_products::Product;

// -------------------------
// Request DTOs
// -------------------------
//
// Create/update bodies deserialize straight into the domain commands
// (`CreateProduct`, `UpdateLocation`, `RecordMovement`, ...); the domain
// constructors own every field rule.

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product_id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub location_id: String,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovementResponse {
    pub movement_id: String,
    pub timestamp: DateTime<Utc>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub product_id: String,
    pub qty: i64,
    pub kind: MovementKind,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub rows: Vec<BalanceRow>,
    pub count: usize,
}

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        Self {
            product_id: p.id_typed().to_string(),
            name: p.name().to_string(),
            description: p.description().map(str::to_string),
            image_url: p.image_url().map(str::to_string),
        }
    }
}

impl From<&Location> for LocationResponse {
    fn from(l: &Location) -> Self {
        Self {
            location_id: l.id_typed().to_string(),
            name: l.name().to_string(),
            address: l.address().map(str::to_string),
        }
    }
}

impl From<&Movement> for MovementResponse {
    fn from(m: &Movement) -> Self {
        Self {
            movement_id: m.id_typed().to_string(),
            timestamp: m.timestamp(),
            from_location: m.from_location().map(ToString::to_string),
            to_location: m.to_location().map(ToString::to_string),
            product_id: m.product_id().to_string(),
            qty: m.qty(),
            kind: m.kind(),
        }
    }
}

impl From<BalanceReport> for ReportResponse {
    fn from(report: BalanceReport) -> Self {
        let rows = report.into_rows();
        Self {
            count: rows.len(),
            rows,
        }
    }
}

pub fn list<E, R>(entities: &[E]) -> ListResponse<R>
where
    R: for<'a> From<&'a E>,
{
    ListResponse {
        items: entities.iter().map(R::from).collect(),
    }
}
