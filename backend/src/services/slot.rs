//! Delivery slot service: seller CRUD over published slots

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::DeliverySlot;
use shared::types::TimeOfDay;
use shared::validation::{validate_delivery_fee, validate_slot_window};

/// Slot service for seller-published delivery windows
#[derive(Clone)]
pub struct SlotService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct SlotRow {
    id: Uuid,
    store_id: Uuid,
    start_time: String,
    end_time: String,
    delivery_fee: Decimal,
}

impl SlotRow {
    fn into_slot(self) -> AppResult<DeliverySlot> {
        let start_time: TimeOfDay = self
            .start_time
            .parse()
            .map_err(|e| AppError::Internal(format!("Bad start_time in slot row: {}", e)))?;
        let end_time: TimeOfDay = self
            .end_time
            .parse()
            .map_err(|e| AppError::Internal(format!("Bad end_time in slot row: {}", e)))?;

        Ok(DeliverySlot {
            id: self.id,
            store_id: self.store_id,
            start_time,
            end_time,
            delivery_fee: self.delivery_fee,
        })
    }
}

/// Input for creating or updating a slot
#[derive(Debug, Deserialize)]
pub struct SlotInput {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub delivery_fee: Decimal,
}

impl SlotService {
    /// Create a new SlotService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All slots of a store, in the deterministic matching order
    pub async fn list_slots(&self, store_id: Uuid) -> AppResult<Vec<DeliverySlot>> {
        let rows = sqlx::query_as::<_, SlotRow>(
            r#"
            SELECT id, store_id, start_time, end_time, delivery_fee
            FROM delivery_slots
            WHERE store_id = $1
            ORDER BY start_time, id
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(SlotRow::into_slot).collect()
    }

    /// Create a slot for the seller's store
    pub async fn create_slot(&self, store_id: Uuid, input: SlotInput) -> AppResult<DeliverySlot> {
        Self::validate(&input)?;

        let row = sqlx::query_as::<_, SlotRow>(
            r#"
            INSERT INTO delivery_slots (store_id, start_time, end_time, delivery_fee)
            VALUES ($1, $2, $3, $4)
            RETURNING id, store_id, start_time, end_time, delivery_fee
            "#,
        )
        .bind(store_id)
        .bind(input.start_time.to_string())
        .bind(input.end_time.to_string())
        .bind(input.delivery_fee)
        .fetch_one(&self.db)
        .await?;

        row.into_slot()
    }

    /// Update a slot; it must belong to the seller's store
    pub async fn update_slot(
        &self,
        store_id: Uuid,
        slot_id: Uuid,
        input: SlotInput,
    ) -> AppResult<DeliverySlot> {
        Self::validate(&input)?;

        let row = sqlx::query_as::<_, SlotRow>(
            r#"
            UPDATE delivery_slots
            SET start_time = $1, end_time = $2, delivery_fee = $3
            WHERE id = $4 AND store_id = $5
            RETURNING id, store_id, start_time, end_time, delivery_fee
            "#,
        )
        .bind(input.start_time.to_string())
        .bind(input.end_time.to_string())
        .bind(input.delivery_fee)
        .bind(slot_id)
        .bind(store_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery slot".to_string()))?;

        row.into_slot()
    }

    /// Delete a slot; it must belong to the seller's store
    pub async fn delete_slot(&self, store_id: Uuid, slot_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM delivery_slots WHERE id = $1 AND store_id = $2")
            .bind(slot_id)
            .bind(store_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Delivery slot".to_string()));
        }
        Ok(())
    }

    fn validate(input: &SlotInput) -> AppResult<()> {
        validate_slot_window(input.start_time, input.end_time).map_err(|msg| {
            AppError::Validation {
                field: "start_time".to_string(),
                message: msg.to_string(),
            }
        })?;
        validate_delivery_fee(input.delivery_fee).map_err(|msg| AppError::Validation {
            field: "delivery_fee".to_string(),
            message: msg.to_string(),
        })?;
        Ok(())
    }
}
