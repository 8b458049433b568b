use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockroom_core::{Entity, LocationId, MovementId, ProductId};
use stockroom_inventory::Movement;
use stockroom_locations::Location;
use stockroom_products::Product;

use super::{InventoryStore, StoreError, StoreResult};

/// In-memory store for tests/dev. `BTreeMap` keeps id order for free.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    products: RwLock<BTreeMap<ProductId, Product>>,
    locations: RwLock<BTreeMap<LocationId, Location>>,
    movements: RwLock<BTreeMap<MovementId, Movement>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Database("in-memory store lock poisoned".to_string())
}

fn insert<E: Entity + Clone>(map: &RwLock<BTreeMap<E::Id, E>>, entity: E) -> StoreResult<()> {
    let mut map = map.write().map_err(poisoned)?;
    if map.contains_key(entity.id()) {
        return Err(StoreError::Conflict(format!("{} already exists", entity.id())));
    }
    map.insert(entity.id().clone(), entity);
    Ok(())
}

fn replace<E: Entity + Clone>(map: &RwLock<BTreeMap<E::Id, E>>, entity: E) -> StoreResult<()> {
    let mut map = map.write().map_err(poisoned)?;
    match map.get_mut(entity.id()) {
        Some(slot) => {
            *slot = entity;
            Ok(())
        }
        None => Err(StoreError::NotFound),
    }
}

fn get<E: Entity + Clone>(map: &RwLock<BTreeMap<E::Id, E>>, id: &E::Id) -> StoreResult<Option<E>> {
    let map = map.read().map_err(poisoned)?;
    Ok(map.get(id).cloned())
}

fn list<E: Entity + Clone>(map: &RwLock<BTreeMap<E::Id, E>>) -> StoreResult<Vec<E>> {
    let map = map.read().map_err(poisoned)?;
    Ok(map.values().cloned().collect())
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        insert(&self.products, product)
    }

    async fn update_product(&self, product: Product) -> StoreResult<()> {
        replace(&self.products, product)
    }

    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        get(&self.products, id)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        list(&self.products)
    }

    async fn insert_location(&self, location: Location) -> StoreResult<()> {
        insert(&self.locations, location)
    }

    async fn update_location(&self, location: Location) -> StoreResult<()> {
        replace(&self.locations, location)
    }

    async fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>> {
        get(&self.locations, id)
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        list(&self.locations)
    }

    async fn insert_movement(&self, movement: Movement) -> StoreResult<()> {
        insert(&self.movements, movement)
    }

    async fn get_movement(&self, id: &MovementId) -> StoreResult<Option<Movement>> {
        get(&self.movements, id)
    }

    async fn list_movements(&self) -> StoreResult<Vec<Movement>> {
        let mut movements = list(&self.movements)?;
        // Stable sort over id-ordered values: ties stay in id order.
        movements.sort_by_key(Movement::timestamp);
        Ok(movements)
    }
}
