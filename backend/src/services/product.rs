//! Catalog service: product CRUD for sellers, lookups for order snapshots

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Product;
use shared::validation::validate_price;

/// Product service backing the catalog collaborator
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    store_id: Uuid,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock: i32,
    image_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            store_id: row.store_id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            image_path: row.image_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, store_id, name, description, price, stock, image_path, created_at, updated_at";

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_path: Option<String>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_path: Option<String>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List a store's products, optionally limited
    pub async fn list_by_store(&self, store_id: Uuid, limit: Option<i64>) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE store_id = $1 ORDER BY created_at DESC LIMIT $2",
            PRODUCT_COLUMNS
        ))
        .bind(store_id)
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List all products across stores (student browsing)
    pub async fn list_all(&self, limit: Option<i64>) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY created_at DESC LIMIT $1",
            PRODUCT_COLUMNS
        ))
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Create a product under the seller's store
    pub async fn create_product(
        &self,
        store_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<Product> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name cannot be empty".to_string(),
            });
        }
        validate_price(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;
        if input.stock < 0 {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Stock cannot be negative".to_string(),
            });
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (store_id, name, description, price, stock, image_path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.image_path)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a product; the product must belong to the seller's store
    pub async fn update_product(
        &self,
        store_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = self.get_product(product_id).await?;
        if existing.store_id != store_id {
            return Err(AppError::InsufficientPermissions);
        }

        let price = input.price.unwrap_or(existing.price);
        validate_price(price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;
        let stock = input.stock.unwrap_or(existing.stock);
        if stock < 0 {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Stock cannot be negative".to_string(),
            });
        }

        let name = input.name.unwrap_or(existing.name);
        let description = input.description.or(existing.description);
        let image_path = input.image_path.or(existing.image_path);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $1, description = $2, price = $3, stock = $4,
                image_path = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&name)
        .bind(&description)
        .bind(price)
        .bind(stock)
        .bind(&image_path)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a product; the product must belong to the seller's store
    pub async fn delete_product(&self, store_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let existing = self.get_product(product_id).await?;
        if existing.store_id != store_id {
            return Err(AppError::InsufficientPermissions);
        }

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
