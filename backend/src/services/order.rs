//! Order service: placement, listing, and the status lifecycle
//!
//! All engine calls here are pure; this service supplies them with loaded
//! state and persists their outputs transactionally, re-checking
//! preconditions with compare-and-swap updates so concurrent requests
//! cannot double-apply side effects.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::{CartService, NotificationService, OfferService, SlotService, StoreService};
use shared::engine::{self, EngineError, TransitionContext, TransitionRequest};
use shared::models::{
    AppliedDiscount, NotificationKind, Order, OrderItem, OrderStatus,
};
use shared::types::{ist_date, TimeOfDay};

/// Order service for placement and fulfillment
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
    eta_offset: Duration,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    student_id: Uuid,
    store_id: Uuid,
    delivery_address: String,
    delivery_start_time: String,
    delivery_end_time: String,
    delivery_slot_id: Uuid,
    delivery_fee: Decimal,
    original_subtotal: Decimal,
    total_discount: Decimal,
    subtotal: Decimal,
    gst_amount: Decimal,
    total_amount: Decimal,
    status: String,
    estimated_delivery_time: Option<DateTime<Utc>>,
    delivery_person_contact: Option<String>,
    order_date: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    product_id: Uuid,
    product_name: String,
    unit_price: Decimal,
    quantity: i32,
    subtotal: Decimal,
    discount_info: Option<serde_json::Value>,
}

const ORDER_COLUMNS: &str = "id, student_id, store_id, delivery_address, \
     delivery_start_time, delivery_end_time, delivery_slot_id, delivery_fee, \
     original_subtotal, total_discount, subtotal, gst_amount, total_amount, \
     status, estimated_delivery_time, delivery_person_contact, order_date";

/// Input for placing an order from the current cart
#[derive(Debug, Deserialize)]
pub struct PlaceOrderInput {
    pub delivery_address: String,
    pub delivery_start_time: TimeOfDay,
    pub delivery_end_time: TimeOfDay,
    /// The offer the student saw applied at checkout, re-validated here
    pub applied_offer_id: Option<Uuid>,
}

/// Input for a seller-driven status change
#[derive(Debug, Deserialize)]
pub struct TransitionInput {
    pub status: OrderStatus,
    /// Required when rejecting; the edge is irreversible
    #[serde(default)]
    pub confirmed: bool,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            eta_offset: Duration::hours(config.delivery.estimated_delivery_offset_hours),
        }
    }

    /// Place an order from the student's cart.
    ///
    /// Snapshots the cart lines, matches the delivery window to a slot,
    /// re-validates the applied offer, computes the summary, and persists
    /// everything in one transaction. The offer's usage count is bumped at
    /// most once per order id, guarded by a redemption row.
    pub async fn place_order(&self, student_id: Uuid, input: PlaceOrderInput) -> AppResult<Order> {
        if input.delivery_address.trim().is_empty() {
            return Err(AppError::Validation {
                field: "delivery_address".to_string(),
                message: "Delivery address cannot be empty".to_string(),
            });
        }

        let cart = CartService::new(self.db.clone());
        let items = cart.items(student_id).await?;
        if items.is_empty() {
            return Err(AppError::Validation {
                field: "cart".to_string(),
                message: "Cart is empty".to_string(),
            });
        }
        let store_id = items[0].store_id;
        let store = StoreService::new(self.db.clone()).get_store(store_id).await?;

        // Fix the delivery fee by matching the requested window to a slot
        let slots = SlotService::new(self.db.clone()).list_slots(store_id).await?;
        let slot_match = engine::match_delivery_slot(
            &slots,
            input.delivery_start_time,
            input.delivery_end_time,
        )?;

        // Re-validate offers at placement, not just at display
        let lines: Vec<engine::CartLine> = items.iter().map(engine::CartLine::from).collect();
        let today = ist_date(Utc::now());
        let offer_service = OfferService::new(self.db.clone());
        let annotation = match input.applied_offer_id {
            Some(offer_id) => {
                let offer = offer_service.get_offer(offer_id).await?;
                if offer.store_id != store_id {
                    return Err(EngineError::InvalidOfferScope.into());
                }
                engine::apply_offer(&offer, &lines, today)?
            }
            None => {
                let offers = offer_service.list_active_for_store(store_id).await?;
                engine::resolve_offers(&offers, &lines, today)
            }
        };

        let summary = engine::compute_summary(
            &annotation.items,
            store.gst_percentage,
            slot_match.delivery_fee,
        )
        .rounded();

        // Names for the immutable item snapshots
        let names = self.product_names(&items.iter().map(|i| i.product_id).collect::<Vec<_>>()).await?;

        let mut tx = self.db.begin().await?;

        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO orders (student_id, store_id, delivery_address,
                                delivery_start_time, delivery_end_time,
                                delivery_slot_id, delivery_fee,
                                original_subtotal, total_discount, subtotal,
                                gst_amount, total_amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'pending')
            RETURNING id
            "#,
        )
        .bind(student_id)
        .bind(store_id)
        .bind(input.delivery_address.trim())
        .bind(input.delivery_start_time.to_string())
        .bind(input.delivery_end_time.to_string())
        .bind(slot_match.slot_id)
        .bind(summary.delivery_fee)
        .bind(summary.original_subtotal)
        .bind(summary.total_discount)
        .bind(summary.subtotal)
        .bind(summary.gst_amount)
        .bind(summary.total)
        .fetch_one(&mut *tx)
        .await?;

        for annotated in &annotation.items {
            let name = names
                .iter()
                .find(|(id, _)| *id == annotated.product_id)
                .map(|(_, name)| name.clone())
                .unwrap_or_default();
            let discount_info = annotated
                .discount
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| AppError::Internal(format!("Discount serialization failed: {}", e)))?;

            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, product_name,
                                         unit_price, quantity, subtotal, discount_info)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(order_id)
            .bind(annotated.product_id)
            .bind(&name)
            .bind(annotated.unit_price)
            .bind(annotated.quantity as i32)
            .bind(annotated.subtotal.round_dp(2))
            .bind(discount_info)
            .execute(&mut *tx)
            .await?;
        }

        // Redeem the offer exactly once per order id. The redemption row is
        // the idempotency guard; the usage-count bump is a compare-and-swap
        // against the cap.
        if let Some(offer_id) = annotation.applied_offer_id {
            let redeemed = sqlx::query(
                r#"
                INSERT INTO offer_redemptions (offer_id, order_id)
                VALUES ($1, $2)
                ON CONFLICT (offer_id, order_id) DO NOTHING
                "#,
            )
            .bind(offer_id)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

            if redeemed.rows_affected() == 1 {
                let bumped = sqlx::query(
                    r#"
                    UPDATE offers
                    SET usage_count = usage_count + 1
                    WHERE id = $1 AND (offer_limit = 0 OR usage_count < offer_limit)
                    "#,
                )
                .bind(offer_id)
                .execute(&mut *tx)
                .await?;

                if bumped.rows_affected() == 0 {
                    // Another order exhausted the cap between display and now
                    return Err(EngineError::OfferLimitReached.into());
                }
            }
        }

        // Cart is ephemeral: placement consumes it
        sqlx::query("DELETE FROM cart_items WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Order {} placed for store {}", order_id, store_id);

        NotificationService::new(self.db.clone())
            .notify_best_effort(
                store.seller_id,
                "New order received",
                &format!("Order for {} is awaiting your confirmation", summary.total),
                NotificationKind::Order,
                Some(order_id),
            )
            .await;

        self.load_order(order_id).await
    }

    /// A student's orders, newest first
    pub async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE student_id = $1 ORDER BY order_date DESC",
            ORDER_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(&self.db)
        .await?;

        self.assemble_all(rows).await
    }

    /// A student's order by id
    pub async fn get_for_student(&self, student_id: Uuid, order_id: Uuid) -> AppResult<Order> {
        let order = self.load_order(order_id).await?;
        if order.student_id != student_id {
            return Err(AppError::NotFound("Order".to_string()));
        }
        Ok(order)
    }

    /// A store's orders, optionally filtered by status, newest first
    pub async fn list_for_store(
        &self,
        store_id: Uuid,
        status: Option<OrderStatus>,
    ) -> AppResult<Vec<Order>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {} FROM orders WHERE store_id = $1 AND status = $2 \
                     ORDER BY order_date DESC",
                    ORDER_COLUMNS
                ))
                .bind(store_id)
                .bind(status.as_str())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {} FROM orders WHERE store_id = $1 ORDER BY order_date DESC",
                    ORDER_COLUMNS
                ))
                .bind(store_id)
                .fetch_all(&self.db)
                .await?
            }
        };

        self.assemble_all(rows).await
    }

    /// A store's order by id
    pub async fn get_for_store(&self, store_id: Uuid, order_id: Uuid) -> AppResult<Order> {
        let order = self.load_order(order_id).await?;
        if order.store_id != store_id {
            return Err(AppError::NotFound("Order".to_string()));
        }
        Ok(order)
    }

    /// Advance an order through its lifecycle on behalf of the seller.
    ///
    /// The engine validates the edge; persistence re-checks the precondition
    /// with `WHERE status = <expected>` so a concurrent transition (e.g. a
    /// double-clicked accept) is applied once, and the loser observes the
    /// already-updated status as an illegal transition.
    pub async fn transition(
        &self,
        store_id: Uuid,
        order_id: Uuid,
        input: TransitionInput,
    ) -> AppResult<Order> {
        let order = self.get_for_store(store_id, order_id).await?;
        let roster = StoreService::new(self.db.clone())
            .get_roster(store_id)
            .await?;

        let outcome = engine::apply_transition(
            order.status,
            TransitionRequest {
                target: input.status,
                confirmed: input.confirmed,
            },
            &TransitionContext {
                now: Utc::now(),
                eta_offset: self.eta_offset,
                roster: &roster,
            },
        )?;

        let updated = sqlx::query(
            r#"
            UPDATE orders
            SET status = $1,
                estimated_delivery_time = COALESCE($2, estimated_delivery_time),
                delivery_person_contact = COALESCE($3, delivery_person_contact)
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(outcome.status.as_str())
        .bind(outcome.estimated_delivery_time)
        .bind(&outcome.delivery_person_contact)
        .bind(order_id)
        .bind(order.status.as_str())
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            // Lost the race: report against the status that actually holds
            let fresh = self.load_order(order_id).await?;
            return Err(EngineError::IllegalTransition {
                from: fresh.status,
                to: input.status,
            }
            .into());
        }

        tracing::info!(
            "Order {} moved {} -> {}",
            order_id,
            order.status,
            outcome.status
        );

        let student_user = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM student_profiles WHERE id = $1",
        )
        .bind(order.student_id)
        .fetch_optional(&self.db)
        .await?;
        if let Some(user_id) = student_user {
            NotificationService::new(self.db.clone())
                .notify_best_effort(
                    user_id,
                    "Order status updated",
                    &format!("Your order is now {}", outcome.status),
                    NotificationKind::Order,
                    Some(order_id),
                )
                .await;
        }

        self.load_order(order_id).await
    }

    async fn product_names(&self, product_ids: &[Uuid]) -> AppResult<Vec<(Uuid, String)>> {
        let rows = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, name FROM products WHERE id = ANY($1)",
        )
        .bind(product_ids)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn load_order(&self, order_id: Uuid) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        self.assemble(row).await
    }

    async fn assemble_all(&self, rows: Vec<OrderRow>) -> AppResult<Vec<Order>> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.assemble(row).await?);
        }
        Ok(orders)
    }

    async fn assemble(&self, row: OrderRow) -> AppResult<Order> {
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT product_id, product_name, unit_price, quantity, subtotal, discount_info
            FROM order_items
            WHERE order_id = $1
            ORDER BY product_name
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.db)
        .await?;

        let items = item_rows
            .into_iter()
            .map(|item| {
                let discount: Option<AppliedDiscount> = item
                    .discount_info
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(|e| {
                        AppError::Internal(format!("Bad discount_info in order item: {}", e))
                    })?;
                Ok(OrderItem {
                    product_id: item.product_id,
                    product_name: item.product_name,
                    unit_price: item.unit_price,
                    quantity: item.quantity.max(0) as u32,
                    subtotal: item.subtotal,
                    discount,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let status = OrderStatus::from_str(&row.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown order status '{}'", row.status)))?;
        let delivery_start_time: TimeOfDay = row
            .delivery_start_time
            .parse()
            .map_err(|e| AppError::Internal(format!("Bad delivery_start_time: {}", e)))?;
        let delivery_end_time: TimeOfDay = row
            .delivery_end_time
            .parse()
            .map_err(|e| AppError::Internal(format!("Bad delivery_end_time: {}", e)))?;

        Ok(Order {
            id: row.id,
            student_id: row.student_id,
            store_id: row.store_id,
            items,
            delivery_address: row.delivery_address,
            delivery_start_time,
            delivery_end_time,
            delivery_slot_id: row.delivery_slot_id,
            delivery_fee: row.delivery_fee,
            original_subtotal: row.original_subtotal,
            total_discount: row.total_discount,
            subtotal: row.subtotal,
            gst_amount: row.gst_amount,
            total_amount: row.total_amount,
            status,
            estimated_delivery_time: row.estimated_delivery_time,
            delivery_person_contact: row.delivery_person_contact,
            order_date: row.order_date,
        })
    }
}
