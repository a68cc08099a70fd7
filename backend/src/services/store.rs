//! Store profile service: store listing, seller profile updates, and the
//! delivery-person roster that gates the delivering transition

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{DeliveryPerson, Store};
use shared::types::TimeOfDay;
use shared::validation::{validate_gst_percentage, validate_indian_phone, validate_slot_window};

/// Store service for store profiles and rosters
#[derive(Clone)]
pub struct StoreService {
    db: PgPool,
}

/// Database row for a store
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: Uuid,
    seller_id: Uuid,
    name: String,
    address: String,
    phone_number: String,
    working_days: String,
    opening_time: String,
    closing_time: String,
    gst_percentage: Decimal,
    delivery_persons: serde_json::Value,
}

impl StoreRow {
    fn into_store(self) -> AppResult<Store> {
        let opening_time: TimeOfDay = self
            .opening_time
            .parse()
            .map_err(|e| AppError::Internal(format!("Bad opening_time in store row: {}", e)))?;
        let closing_time: TimeOfDay = self
            .closing_time
            .parse()
            .map_err(|e| AppError::Internal(format!("Bad closing_time in store row: {}", e)))?;
        let delivery_persons: Vec<DeliveryPerson> = serde_json::from_value(self.delivery_persons)
            .map_err(|e| AppError::Internal(format!("Bad roster in store row: {}", e)))?;

        Ok(Store {
            id: self.id,
            seller_id: self.seller_id,
            name: self.name,
            address: self.address,
            phone_number: self.phone_number,
            working_days: self.working_days,
            opening_time,
            closing_time,
            gst_percentage: self.gst_percentage,
            delivery_persons,
        })
    }
}

const STORE_COLUMNS: &str = "id, seller_id, name, address, phone_number, working_days, \
     opening_time, closing_time, gst_percentage, delivery_persons";

/// Input for updating a seller's store profile
#[derive(Debug, Deserialize)]
pub struct UpdateStoreInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub working_days: Option<String>,
    pub opening_time: Option<TimeOfDay>,
    pub closing_time: Option<TimeOfDay>,
    pub gst_percentage: Option<Decimal>,
}

/// Input for adding a roster entry
#[derive(Debug, Deserialize)]
pub struct AddDeliveryPersonInput {
    pub name: String,
    pub phone: String,
}

impl StoreService {
    /// Create a new StoreService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all stores, optionally limited
    pub async fn list_stores(&self, limit: Option<i64>) -> AppResult<Vec<Store>> {
        let rows = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {} FROM stores ORDER BY name LIMIT $1",
            STORE_COLUMNS
        ))
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StoreRow::into_store).collect()
    }

    /// Get a store by id
    pub async fn get_store(&self, store_id: Uuid) -> AppResult<Store> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {} FROM stores WHERE id = $1",
            STORE_COLUMNS
        ))
        .bind(store_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Store".to_string()))?;

        row.into_store()
    }

    /// Update the seller's store profile
    pub async fn update_store(&self, store_id: Uuid, input: UpdateStoreInput) -> AppResult<Store> {
        let current = self.get_store(store_id).await?;

        let opening_time = input.opening_time.unwrap_or(current.opening_time);
        let closing_time = input.closing_time.unwrap_or(current.closing_time);
        validate_slot_window(opening_time, closing_time).map_err(|msg| AppError::Validation {
            field: "opening_time".to_string(),
            message: msg.to_string(),
        })?;

        let gst_percentage = input.gst_percentage.unwrap_or(current.gst_percentage);
        validate_gst_percentage(gst_percentage).map_err(|msg| AppError::Validation {
            field: "gst_percentage".to_string(),
            message: msg.to_string(),
        })?;

        let phone_number = input.phone_number.unwrap_or(current.phone_number);
        validate_indian_phone(&phone_number).map_err(|msg| AppError::Validation {
            field: "phone_number".to_string(),
            message: msg.to_string(),
        })?;

        let name = input.name.unwrap_or(current.name);
        let address = input.address.unwrap_or(current.address);
        let working_days = input.working_days.unwrap_or(current.working_days);

        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r#"
            UPDATE stores
            SET name = $1, address = $2, phone_number = $3, working_days = $4,
                opening_time = $5, closing_time = $6, gst_percentage = $7
            WHERE id = $8
            RETURNING {}
            "#,
            STORE_COLUMNS
        ))
        .bind(&name)
        .bind(&address)
        .bind(&phone_number)
        .bind(&working_days)
        .bind(opening_time.to_string())
        .bind(closing_time.to_string())
        .bind(gst_percentage)
        .bind(store_id)
        .fetch_one(&self.db)
        .await?;

        row.into_store()
    }

    /// The store's delivery-person roster
    pub async fn get_roster(&self, store_id: Uuid) -> AppResult<Vec<DeliveryPerson>> {
        Ok(self.get_store(store_id).await?.delivery_persons)
    }

    /// Add a delivery person to the roster
    pub async fn add_delivery_person(
        &self,
        store_id: Uuid,
        input: AddDeliveryPersonInput,
    ) -> AppResult<Vec<DeliveryPerson>> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Delivery person name cannot be empty".to_string(),
            });
        }
        validate_indian_phone(&input.phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
        })?;

        let mut roster = self.get_roster(store_id).await?;
        roster.push(DeliveryPerson {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
        });

        self.write_roster(store_id, &roster).await?;
        Ok(roster)
    }

    /// Remove a delivery person from the roster
    ///
    /// Orders already marked delivering keep their contact snapshot.
    pub async fn remove_delivery_person(
        &self,
        store_id: Uuid,
        person_id: Uuid,
    ) -> AppResult<Vec<DeliveryPerson>> {
        let mut roster = self.get_roster(store_id).await?;
        let before = roster.len();
        roster.retain(|person| person.id != person_id);
        if roster.len() == before {
            return Err(AppError::NotFound("Delivery person".to_string()));
        }

        self.write_roster(store_id, &roster).await?;
        Ok(roster)
    }

    async fn write_roster(&self, store_id: Uuid, roster: &[DeliveryPerson]) -> AppResult<()> {
        let value = serde_json::to_value(roster)
            .map_err(|e| AppError::Internal(format!("Roster serialization failed: {}", e)))?;

        sqlx::query("UPDATE stores SET delivery_persons = $1 WHERE id = $2")
            .bind(value)
            .bind(store_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
