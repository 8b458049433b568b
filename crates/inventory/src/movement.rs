use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, LocationId, MovementId, ProductId, text};

/// Direction of a movement, derived from which ends are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Destination only: stock enters the system.
    Inbound,
    /// Source only: stock leaves the system.
    Outbound,
    /// Both ends set.
    Transfer,
    /// Neither end set; recorded but affects no balance.
    NoOp,
}

/// Entity: Movement (immutable once recorded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    id: MovementId,
    timestamp: DateTime<Utc>,
    from_location: Option<LocationId>,
    to_location: Option<LocationId>,
    product_id: ProductId,
    qty: i64,
}

/// Command: RecordMovement (raw submitted fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMovement {
    pub movement_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub from_location: Option<String>,
    #[serde(default)]
    pub to_location: Option<String>,
    pub product_id: String,
    #[serde(default)]
    pub qty: Option<i64>,
}

impl Movement {
    /// Validate a submission and build a movement.
    ///
    /// `known_products` is the set of selectable products; the product must be
    /// one of them. Location references are free text and are not checked.
    /// A missing or unparsable timestamp falls back to `now`.
    pub fn record(
        cmd: RecordMovement,
        known_products: &BTreeSet<ProductId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let id = MovementId::new(&cmd.movement_id)?;

        if cmd.product_id.trim().is_empty() {
            return Err(DomainError::required("product_id"));
        }
        let product_id = ProductId::new(&cmd.product_id)?;
        if !known_products.contains(&product_id) {
            return Err(DomainError::validation(format!(
                "product_id: '{product_id}' is not a valid choice"
            )));
        }

        // Zero is treated as "not provided", same as an absent quantity.
        let qty = match cmd.qty {
            Some(q) if q != 0 => q,
            _ => return Err(DomainError::required("qty")),
        };

        let from_location = location_ref(cmd.from_location.as_deref())?;
        let to_location = location_ref(cmd.to_location.as_deref())?;

        let timestamp = cmd
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now);

        Ok(Self {
            id,
            timestamp,
            from_location,
            to_location,
            product_id,
            qty,
        })
    }

    /// Rehydrate a movement from storage.
    pub fn restore(
        id: MovementId,
        timestamp: DateTime<Utc>,
        from_location: Option<LocationId>,
        to_location: Option<LocationId>,
        product_id: ProductId,
        qty: i64,
    ) -> Self {
        Self {
            id,
            timestamp,
            from_location,
            to_location,
            product_id,
            qty,
        }
    }

    pub fn id_typed(&self) -> &MovementId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn from_location(&self) -> Option<&LocationId> {
        self.from_location.as_ref()
    }

    pub fn to_location(&self) -> Option<&LocationId> {
        self.to_location.as_ref()
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn qty(&self) -> i64 {
        self.qty
    }

    pub fn kind(&self) -> MovementKind {
        match (&self.from_location, &self.to_location) {
            (None, Some(_)) => MovementKind::Inbound,
            (Some(_), None) => MovementKind::Outbound,
            (Some(_), Some(_)) => MovementKind::Transfer,
            (None, None) => MovementKind::NoOp,
        }
    }
}

impl Entity for Movement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn location_ref(raw: Option<&str>) -> DomainResult<Option<LocationId>> {
    text::optional_trimmed(raw).map(LocationId::new).transpose()
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp as submitted in a form.
///
/// Accepts RFC 3339 (with offset), naive date-times (taken as UTC) and bare
/// dates (midnight UTC). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
