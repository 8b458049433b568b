//! Entity store: products, locations and movements.
//!
//! The store is plain CRUD over three collections. It never computes
//! balances; callers take a [`Snapshot`] and hand it to the aggregator.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockroom_core::{LocationId, MovementId, ProductId};
use stockroom_inventory::{BalanceReport, Movement, compute_balances};
use stockroom_locations::Location;
use stockroom_products::Product;

use crate::config::DatabaseConfig;

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryInventoryStore;
pub use sqlite::SqliteInventoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The record addressed by an update does not exist.
    #[error("not found")]
    NotFound,

    /// A record with the same primary key already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be decoded into a domain entity.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Fully materialized copy of all three collections, in retrieval order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Ordered by identifier.
    pub products: Vec<Product>,
    /// Ordered by identifier.
    pub locations: Vec<Location>,
    /// Ordered by timestamp ascending (ties by identifier).
    pub movements: Vec<Movement>,
}

impl Snapshot {
    pub fn balances(&self) -> BalanceReport {
        compute_balances(&self.products, &self.locations, &self.movements)
    }
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert a new product; `Conflict` if the id is taken.
    async fn insert_product(&self, product: Product) -> StoreResult<()>;
    /// Replace an existing product; `NotFound` if absent.
    async fn update_product(&self, product: Product) -> StoreResult<()>;
    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>>;
    /// All products ordered by identifier.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn insert_location(&self, location: Location) -> StoreResult<()>;
    async fn update_location(&self, location: Location) -> StoreResult<()>;
    async fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>>;
    /// All locations ordered by identifier.
    async fn list_locations(&self) -> StoreResult<Vec<Location>>;

    async fn insert_movement(&self, movement: Movement) -> StoreResult<()>;
    async fn get_movement(&self, id: &MovementId) -> StoreResult<Option<Movement>>;
    /// All movements ordered by timestamp ascending.
    async fn list_movements(&self) -> StoreResult<Vec<Movement>>;

    async fn snapshot(&self) -> StoreResult<Snapshot> {
        Ok(Snapshot {
            products: self.list_products().await?,
            locations: self.list_locations().await?,
            movements: self.list_movements().await?,
        })
    }
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        (**self).insert_product(product).await
    }

    async fn update_product(&self, product: Product) -> StoreResult<()> {
        (**self).update_product(product).await
    }

    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        (**self).get_product(id).await
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        (**self).list_products().await
    }

    async fn insert_location(&self, location: Location) -> StoreResult<()> {
        (**self).insert_location(location).await
    }

    async fn update_location(&self, location: Location) -> StoreResult<()> {
        (**self).update_location(location).await
    }

    async fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>> {
        (**self).get_location(id).await
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        (**self).list_locations().await
    }

    async fn insert_movement(&self, movement: Movement) -> StoreResult<()> {
        (**self).insert_movement(movement).await
    }

    async fn get_movement(&self, id: &MovementId) -> StoreResult<Option<Movement>> {
        (**self).get_movement(id).await
    }

    async fn list_movements(&self) -> StoreResult<Vec<Movement>> {
        (**self).list_movements().await
    }

    async fn snapshot(&self) -> StoreResult<Snapshot> {
        (**self).snapshot().await
    }
}

/// Open the store selected by configuration.
pub async fn open(config: &DatabaseConfig) -> StoreResult<Arc<dyn InventoryStore>> {
    match config {
        DatabaseConfig::InMemory => Ok(Arc::new(InMemoryInventoryStore::new())),
        DatabaseConfig::Sqlite { url } => Ok(Arc::new(SqliteInventoryStore::connect(url).await?)),
    }
}
