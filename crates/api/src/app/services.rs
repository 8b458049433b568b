use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use stockroom_core::{DomainError, LocationId, MovementId, ProductId};
use stockroom_infra::{InventoryStore, StoreError};
use stockroom_inventory::{BalanceReport, Movement, MovementKind, RecordMovement};
use stockroom_locations::{CreateLocation, Location, UpdateLocation};
use stockroom_products::{CreateProduct, Product, UpdateProduct};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use cases behind the HTTP handlers.
///
/// Handlers never talk to the store directly: every write is validated by the
/// domain crates first, then persisted, then logged.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn InventoryStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    // -------------------------
    // Products
    // -------------------------

    pub async fn create_product(&self, cmd: CreateProduct) -> ServiceResult<Product> {
        let product = Product::create(cmd).inspect_err(|e| rejected("product", e))?;
        self.store.insert_product(product.clone()).await?;
        tracing::info!(product_id = %product.id_typed(), "product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, cmd: UpdateProduct) -> ServiceResult<Product> {
        let mut product = self.get_product(id).await?;
        product.update(cmd).inspect_err(|e| rejected("product", e))?;
        self.store.update_product(product.clone()).await?;
        tracing::info!(product_id = %product.id_typed(), "product updated");
        Ok(product)
    }

    pub async fn get_product(&self, id: &str) -> ServiceResult<Product> {
        let id = ProductId::new(id).map_err(|_| DomainError::NotFound)?;
        self.store
            .get_product(&id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }

    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.store.list_products().await?)
    }

    // -------------------------
    // Locations
    // -------------------------

    pub async fn create_location(&self, cmd: CreateLocation) -> ServiceResult<Location> {
        let location = Location::create(cmd).inspect_err(|e| rejected("location", e))?;
        self.store.insert_location(location.clone()).await?;
        tracing::info!(location_id = %location.id_typed(), "location created");
        Ok(location)
    }

    pub async fn update_location(&self, id: &str, cmd: UpdateLocation) -> ServiceResult<Location> {
        let mut location = self.get_location(id).await?;
        location.update(cmd).inspect_err(|e| rejected("location", e))?;
        self.store.update_location(location.clone()).await?;
        tracing::info!(location_id = %location.id_typed(), "location updated");
        Ok(location)
    }

    pub async fn get_location(&self, id: &str) -> ServiceResult<Location> {
        let id = LocationId::new(id).map_err(|_| DomainError::NotFound)?;
        self.store
            .get_location(&id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }

    pub async fn list_locations(&self) -> ServiceResult<Vec<Location>> {
        Ok(self.store.list_locations().await?)
    }

    // -------------------------
    // Movements
    // -------------------------

    /// Validate against the current catalog and persist a movement.
    pub async fn record_movement(&self, cmd: RecordMovement) -> ServiceResult<Movement> {
        let known: BTreeSet<ProductId> = self
            .store
            .list_products()
            .await?
            .into_iter()
            .map(|p| p.id_typed().clone())
            .collect();

        let movement =
            Movement::record(cmd, &known, Utc::now()).inspect_err(|e| rejected("movement", e))?;
        self.store.insert_movement(movement.clone()).await?;

        if movement.kind() == MovementKind::NoOp {
            tracing::warn!(
                movement_id = %movement.id_typed(),
                "movement has neither source nor destination; it will not affect balances"
            );
        } else {
            tracing::info!(
                movement_id = %movement.id_typed(),
                product_id = %movement.product_id(),
                qty = movement.qty(),
                kind = ?movement.kind(),
                "movement recorded"
            );
        }
        Ok(movement)
    }

    pub async fn get_movement(&self, id: &str) -> ServiceResult<Movement> {
        let id = MovementId::new(id).map_err(|_| DomainError::NotFound)?;
        self.store
            .get_movement(&id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }

    /// All movements, newest first.
    pub async fn list_movements(&self) -> ServiceResult<Vec<Movement>> {
        let mut movements = self.store.list_movements().await?;
        movements.reverse();
        Ok(movements)
    }

    // -------------------------
    // Report
    // -------------------------

    pub async fn report(&self) -> ServiceResult<BalanceReport> {
        let snapshot = self.store.snapshot().await?;
        let report = snapshot.balances();
        tracing::debug!(
            products = snapshot.products.len(),
            locations = snapshot.locations.len(),
            movements = snapshot.movements.len(),
            rows = report.len(),
            "balance report computed"
        );
        Ok(report)
    }
}

fn rejected(resource: &'static str, err: &DomainError) {
    tracing::debug!(resource, error = %err, "submission rejected");
}
