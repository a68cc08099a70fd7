//! Cart service: single-store carts with offer annotation
//!
//! Cart mutation is last-write-wins per item; the single-store invariant is
//! enforced here, and switching stores requires an explicit clear.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::OfferService;
use shared::engine::{self, CartLine, OrderSummary};
use shared::models::{AppliedDiscount, CartItem};
use shared::types::ist_date;
use shared::validation::validate_quantity;

/// Cart service for student carts
#[derive(Clone)]
pub struct CartService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: Uuid,
    student_id: Uuid,
    store_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
    added_at: DateTime<Utc>,
    product_name: String,
    image_path: Option<String>,
}

/// Input for adding a product to the cart
#[derive(Debug, Deserialize)]
pub struct AddCartItemInput {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Input for changing a line's quantity
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemInput {
    /// Zero removes the line
    pub quantity: u32,
}

/// A cart line as shown to the student
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub image_path: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub discount: Option<AppliedDiscount>,
}

/// The whole cart with its store, offer annotation, and summary
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub store_id: Option<Uuid>,
    pub applied_offer_id: Option<Uuid>,
    /// Delivery fee stays zero until checkout matches a slot
    pub summary: OrderSummary,
}

impl CartService {
    /// Create a new CartService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The student's raw cart items
    pub async fn items(&self, student_id: Uuid) -> AppResult<Vec<CartItem>> {
        let rows = self.rows(student_id).await?;
        Ok(rows
            .into_iter()
            .map(|row| CartItem {
                id: row.id,
                student_id: row.student_id,
                store_id: row.store_id,
                product_id: row.product_id,
                quantity: row.quantity.max(0) as u32,
                unit_price: row.unit_price,
                added_at: row.added_at,
            })
            .collect())
    }

    /// The student's cart with offers resolved and the summary computed
    pub async fn view_cart(&self, student_id: Uuid) -> AppResult<CartView> {
        let rows = self.rows(student_id).await?;
        if rows.is_empty() {
            return Ok(CartView {
                items: vec![],
                store_id: None,
                applied_offer_id: None,
                summary: engine::compute_summary(&[], Decimal::ZERO, Decimal::ZERO),
            });
        }

        let store_id = rows[0].store_id;
        let gst_percentage = sqlx::query_scalar::<_, Decimal>(
            "SELECT gst_percentage FROM stores WHERE id = $1",
        )
        .bind(store_id)
        .fetch_one(&self.db)
        .await?;

        let offers = OfferService::new(self.db.clone())
            .list_active_for_store(store_id)
            .await?;

        let lines: Vec<CartLine> = rows
            .iter()
            .map(|row| CartLine {
                product_id: row.product_id,
                quantity: row.quantity.max(0) as u32,
                unit_price: row.unit_price,
            })
            .collect();

        let annotation = engine::resolve_offers(&offers, &lines, ist_date(Utc::now()));
        let summary =
            engine::compute_summary(&annotation.items, gst_percentage, Decimal::ZERO).rounded();

        let items = rows
            .into_iter()
            .zip(annotation.items)
            .map(|(row, annotated)| CartItemView {
                id: row.id,
                product_id: row.product_id,
                product_name: row.product_name,
                image_path: row.image_path,
                quantity: annotated.quantity,
                unit_price: annotated.unit_price,
                subtotal: annotated.subtotal.round_dp(2),
                discount: annotated.discount,
            })
            .collect();

        Ok(CartView {
            items,
            store_id: Some(store_id),
            applied_offer_id: annotation.applied_offer_id,
            summary,
        })
    }

    /// Add a product to the cart, capturing its current price.
    ///
    /// Items from a second store are refused until the cart is cleared.
    pub async fn add_item(&self, student_id: Uuid, input: AddCartItemInput) -> AppResult<()> {
        validate_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let product = sqlx::query_as::<_, (Uuid, Decimal)>(
            "SELECT store_id, price FROM products WHERE id = $1",
        )
        .bind(input.product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if let Some(cart_store) = self.cart_store(student_id).await? {
            if cart_store != product.0 {
                return Err(AppError::Conflict {
                    resource: "cart".to_string(),
                    message: "Cart holds items from another store; clear it before switching"
                        .to_string(),
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO cart_items (student_id, store_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                          unit_price = EXCLUDED.unit_price
            "#,
        )
        .bind(student_id)
        .bind(product.0)
        .bind(input.product_id)
        .bind(input.quantity as i32)
        .bind(product.1)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Set a line's quantity; zero removes the line
    pub async fn update_item(
        &self,
        student_id: Uuid,
        item_id: Uuid,
        input: UpdateCartItemInput,
    ) -> AppResult<()> {
        if input.quantity == 0 {
            return self.remove_item(student_id, item_id).await;
        }

        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $1 WHERE id = $2 AND student_id = $3",
        )
        .bind(input.quantity as i32)
        .bind(item_id)
        .bind(student_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cart item".to_string()));
        }
        Ok(())
    }

    /// Remove a line from the cart
    pub async fn remove_item(&self, student_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND student_id = $2")
            .bind(item_id)
            .bind(student_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cart item".to_string()));
        }
        Ok(())
    }

    /// Empty the cart (also the explicit step before switching stores)
    pub async fn clear_cart(&self, student_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM cart_items WHERE student_id = $1")
            .bind(student_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// The single store the cart is bound to, if any
    pub async fn cart_store(&self, student_id: Uuid) -> AppResult<Option<Uuid>> {
        let store = sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT store_id FROM cart_items WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(store)
    }

    async fn rows(&self, student_id: Uuid) -> AppResult<Vec<CartRow>> {
        let rows = sqlx::query_as::<_, CartRow>(
            r#"
            SELECT ci.id, ci.student_id, ci.store_id, ci.product_id, ci.quantity,
                   ci.unit_price, ci.added_at, p.name AS product_name, p.image_path
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.student_id = $1
            ORDER BY ci.added_at
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
