//! SQLite-backed entity store.
//!
//! Tables mirror the three entities one-to-one. Timestamps are stored as
//! fixed-width RFC 3339 UTC text (microsecond precision, `Z` suffix) so that
//! `ORDER BY timestamp` on the text column is chronological.
//!
//! Rows written by older versions of the app carry naive
//! `YYYY-MM-DD HH:MM:SS[.ffffff]` timestamps (taken as UTC). They are read
//! with the same lenient parser used for submissions.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use stockroom_core::{LocationId, MovementId, ProductId};
use stockroom_inventory::{Movement, parse_timestamp};
use stockroom_locations::Location;
use stockroom_products::Product;

use super::{InventoryStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct SqliteInventoryStore {
    pool: SqlitePool,
}

impl SqliteInventoryStore {
    /// Connect (creating the database file if needed) and ensure the schema.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every connection to `:memory:` is a separate database: pin to one.
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let store = Self { pool };
        store.ensure_schema().await?;
        tracing::info!(url, "sqlite store ready");
        Ok(store)
    }

    /// Wrap an existing pool. The schema is created if missing.
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS product (
                product_id  TEXT PRIMARY KEY NOT NULL,
                name        TEXT NOT NULL,
                description TEXT NULL,
                image_url   TEXT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS location (
                location_id TEXT PRIMARY KEY NOT NULL,
                name        TEXT NOT NULL,
                address     TEXT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // No foreign keys: a movement may name locations that were never
        // registered, and the report skips those sides.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS product_movement (
                movement_id   TEXT PRIMARY KEY NOT NULL,
                timestamp     TEXT NOT NULL,
                from_location TEXT NULL,
                to_location   TEXT NULL,
                product_id    TEXT NOT NULL,
                qty           INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Databases created before product images existed lack the column.
        let columns: Vec<String> = sqlx::query("SELECT name FROM pragma_table_info('product')")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<Result<_, _>>()?;

        if !columns.iter().any(|c| c == "image_url") {
            tracing::info!("adding missing product.image_url column");
            sqlx::query("ALTER TABLE product ADD COLUMN image_url TEXT NULL")
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn corrupt(what: &str, err: impl core::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("{what}: {err}"))
}

fn product_from_row(row: &SqliteRow) -> StoreResult<Product> {
    let id: String = row.try_get("product_id")?;
    Ok(Product::restore(
        ProductId::new(&id).map_err(|e| corrupt("product.product_id", e))?,
        row.try_get("name")?,
        row.try_get("description")?,
        row.try_get("image_url")?,
    ))
}

fn location_from_row(row: &SqliteRow) -> StoreResult<Location> {
    let id: String = row.try_get("location_id")?;
    Ok(Location::restore(
        LocationId::new(&id).map_err(|e| corrupt("location.location_id", e))?,
        row.try_get("name")?,
        row.try_get("address")?,
    ))
}

fn optional_location(raw: Option<String>) -> StoreResult<Option<LocationId>> {
    raw.map(|s| LocationId::new(s).map_err(|e| corrupt("product_movement location", e)))
        .transpose()
}

fn movement_from_row(row: &SqliteRow) -> StoreResult<Movement> {
    let id: String = row.try_get("movement_id")?;
    let ts: String = row.try_get("timestamp")?;
    let product_id: String = row.try_get("product_id")?;

    Ok(Movement::restore(
        MovementId::new(&id).map_err(|e| corrupt("product_movement.movement_id", e))?,
        parse_timestamp(&ts)
            .ok_or_else(|| corrupt("product_movement.timestamp", format!("unrecognized value '{ts}'")))?,
        optional_location(row.try_get("from_location")?)?,
        optional_location(row.try_get("to_location")?)?,
        ProductId::new(&product_id).map_err(|e| corrupt("product_movement.product_id", e))?,
        row.try_get("qty")?,
    ))
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO product (product_id, name, description, image_url)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (product_id) DO NOTHING
            "#,
        )
        .bind(product.id_typed().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.image_url())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("{} already exists", product.id_typed())));
        }
        Ok(())
    }

    async fn update_product(&self, product: Product) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE product
            SET name = ?2, description = ?3, image_url = ?4
            WHERE product_id = ?1
            "#,
        )
        .bind(product.id_typed().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.image_url())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        sqlx::query(
            r#"
            SELECT product_id, name, description, image_url
            FROM product
            WHERE product_id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(product_from_row)
        .transpose()
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        sqlx::query(
            r#"
            SELECT product_id, name, description, image_url
            FROM product
            ORDER BY product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(product_from_row)
        .collect()
    }

    async fn insert_location(&self, location: Location) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO location (location_id, name, address)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (location_id) DO NOTHING
            "#,
        )
        .bind(location.id_typed().as_str())
        .bind(location.name())
        .bind(location.address())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("{} already exists", location.id_typed())));
        }
        Ok(())
    }

    async fn update_location(&self, location: Location) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE location
            SET name = ?2, address = ?3
            WHERE location_id = ?1
            "#,
        )
        .bind(location.id_typed().as_str())
        .bind(location.name())
        .bind(location.address())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>> {
        sqlx::query(
            r#"
            SELECT location_id, name, address
            FROM location
            WHERE location_id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(location_from_row)
        .transpose()
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        sqlx::query(
            r#"
            SELECT location_id, name, address
            FROM location
            ORDER BY location_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(location_from_row)
        .collect()
    }

    async fn insert_movement(&self, movement: Movement) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO product_movement (
                movement_id,
                timestamp,
                from_location,
                to_location,
                product_id,
                qty
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (movement_id) DO NOTHING
            "#,
        )
        .bind(movement.id_typed().as_str())
        .bind(format_timestamp(movement.timestamp()))
        .bind(movement.from_location().map(LocationId::as_str))
        .bind(movement.to_location().map(LocationId::as_str))
        .bind(movement.product_id().as_str())
        .bind(movement.qty())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("{} already exists", movement.id_typed())));
        }
        Ok(())
    }

    async fn get_movement(&self, id: &MovementId) -> StoreResult<Option<Movement>> {
        sqlx::query(
            r#"
            SELECT movement_id, timestamp, from_location, to_location, product_id, qty
            FROM product_movement
            WHERE movement_id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(movement_from_row)
        .transpose()
    }

    async fn list_movements(&self) -> StoreResult<Vec<Movement>> {
        sqlx::query(
            r#"
            SELECT movement_id, timestamp, from_location, to_location, product_id, qty
            FROM product_movement
            ORDER BY timestamp ASC, movement_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(movement_from_row)
        .collect::<StoreResult<Vec<_>>>()
        .map(|mut movements| {
            // Legacy and current timestamp text do not sort together.
            movements.sort_by(|a, b| {
                (a.timestamp(), a.id_typed()).cmp(&(b.timestamp(), b.id_typed()))
            });
            movements
        })
    }
}
