//! Offer service: seller CRUD over promotional offers and the
//! student-facing active-offer listings

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Discount, Offer, OfferScope};
use shared::types::ist_date;
use shared::validation::validate_offer_fields;

/// Offer service for promotional offers
#[derive(Clone)]
pub struct OfferService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct OfferRow {
    id: Uuid,
    store_id: Uuid,
    title: String,
    description: Option<String>,
    discount_type: String,
    amount: Decimal,
    min_purchase: Decimal,
    applicable_products: serde_json::Value,
    offer_limit: i32,
    usage_count: i32,
    starting_date: NaiveDate,
    closing_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl OfferRow {
    fn into_offer(self) -> AppResult<Offer> {
        let discount = match self.discount_type.as_str() {
            "percentage" => Discount::Percentage {
                amount: self.amount,
            },
            "fixed" => Discount::Fixed {
                amount: self.amount,
            },
            other => {
                return Err(AppError::Internal(format!(
                    "Unknown discount type '{}' in offer row",
                    other
                )))
            }
        };
        let scope: OfferScope = serde_json::from_value(self.applicable_products)
            .map_err(|e| AppError::Internal(format!("Bad offer scope in row: {}", e)))?;

        Ok(Offer {
            id: self.id,
            store_id: self.store_id,
            title: self.title,
            description: self.description,
            discount,
            min_purchase: self.min_purchase,
            scope,
            offer_limit: self.offer_limit.max(0) as u32,
            usage_count: self.usage_count.max(0) as u32,
            starting_date: self.starting_date,
            closing_date: self.closing_date,
            created_at: self.created_at,
        })
    }
}

const OFFER_COLUMNS: &str = "id, store_id, title, description, discount_type, amount, \
     min_purchase, applicable_products, offer_limit, usage_count, \
     starting_date, closing_date, created_at";

/// Input for creating or updating an offer
#[derive(Debug, Deserialize)]
pub struct OfferInput {
    pub title: String,
    pub description: Option<String>,
    pub discount: Discount,
    #[serde(default)]
    pub min_purchase: Decimal,
    pub scope: OfferScope,
    /// 0 means unlimited
    #[serde(default)]
    pub offer_limit: u32,
    pub starting_date: NaiveDate,
    pub closing_date: NaiveDate,
}

impl OfferService {
    /// Create a new OfferService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All offers of a store, newest first (seller view)
    pub async fn list_by_store(&self, store_id: Uuid) -> AppResult<Vec<Offer>> {
        let rows = sqlx::query_as::<_, OfferRow>(&format!(
            "SELECT {} FROM offers WHERE store_id = $1 ORDER BY created_at DESC",
            OFFER_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(OfferRow::into_offer).collect()
    }

    /// A store's offers that are active today (student view)
    pub async fn list_active_for_store(&self, store_id: Uuid) -> AppResult<Vec<Offer>> {
        let offers = self.list_by_store(store_id).await?;
        let today = ist_date(Utc::now());
        Ok(offers
            .into_iter()
            .filter(|offer| offer.is_active_on(today))
            .collect())
    }

    /// Active offers across all stores (banners on the student dashboard)
    pub async fn list_active(&self, limit: Option<i64>) -> AppResult<Vec<Offer>> {
        let rows = sqlx::query_as::<_, OfferRow>(&format!(
            "SELECT {} FROM offers ORDER BY created_at DESC LIMIT $1",
            OFFER_COLUMNS
        ))
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(&self.db)
        .await?;

        let today = ist_date(Utc::now());
        let offers: AppResult<Vec<Offer>> = rows.into_iter().map(OfferRow::into_offer).collect();
        Ok(offers?
            .into_iter()
            .filter(|offer| offer.is_active_on(today))
            .collect())
    }

    /// Get an offer by id
    pub async fn get_offer(&self, offer_id: Uuid) -> AppResult<Offer> {
        let row = sqlx::query_as::<_, OfferRow>(&format!(
            "SELECT {} FROM offers WHERE id = $1",
            OFFER_COLUMNS
        ))
        .bind(offer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Offer".to_string()))?;

        row.into_offer()
    }

    /// Create an offer for the seller's store
    pub async fn create_offer(&self, store_id: Uuid, input: OfferInput) -> AppResult<Offer> {
        Self::validate(&input)?;
        let scope = Self::scope_value(&input.scope)?;

        let row = sqlx::query_as::<_, OfferRow>(&format!(
            r#"
            INSERT INTO offers (store_id, title, description, discount_type, amount,
                                min_purchase, applicable_products, offer_limit,
                                starting_date, closing_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            OFFER_COLUMNS
        ))
        .bind(store_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.discount.kind_str())
        .bind(input.discount.amount())
        .bind(input.min_purchase)
        .bind(scope)
        .bind(input.offer_limit as i32)
        .bind(input.starting_date)
        .bind(input.closing_date)
        .fetch_one(&self.db)
        .await?;

        row.into_offer()
    }

    /// Update an offer; it must belong to the seller's store.
    ///
    /// The usage count is never reset by an update.
    pub async fn update_offer(
        &self,
        store_id: Uuid,
        offer_id: Uuid,
        input: OfferInput,
    ) -> AppResult<Offer> {
        Self::validate(&input)?;
        let scope = Self::scope_value(&input.scope)?;

        let row = sqlx::query_as::<_, OfferRow>(&format!(
            r#"
            UPDATE offers
            SET title = $1, description = $2, discount_type = $3, amount = $4,
                min_purchase = $5, applicable_products = $6, offer_limit = $7,
                starting_date = $8, closing_date = $9
            WHERE id = $10 AND store_id = $11
            RETURNING {}
            "#,
            OFFER_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.discount.kind_str())
        .bind(input.discount.amount())
        .bind(input.min_purchase)
        .bind(scope)
        .bind(input.offer_limit as i32)
        .bind(input.starting_date)
        .bind(input.closing_date)
        .bind(offer_id)
        .bind(store_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Offer".to_string()))?;

        row.into_offer()
    }

    /// Delete an offer; expired offers linger until the seller does this
    pub async fn delete_offer(&self, store_id: Uuid, offer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1 AND store_id = $2")
            .bind(offer_id)
            .bind(store_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Offer".to_string()));
        }
        Ok(())
    }

    fn validate(input: &OfferInput) -> AppResult<()> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation {
                field: "title".to_string(),
                message: "Offer title cannot be empty".to_string(),
            });
        }

        // Borrow the field checks shared with the engine by assembling a
        // throwaway offer record
        let candidate = Offer {
            id: Uuid::nil(),
            store_id: Uuid::nil(),
            title: input.title.clone(),
            description: input.description.clone(),
            discount: input.discount,
            min_purchase: input.min_purchase,
            scope: input.scope.clone(),
            offer_limit: input.offer_limit,
            usage_count: 0,
            starting_date: input.starting_date,
            closing_date: input.closing_date,
            created_at: Utc::now(),
        };
        validate_offer_fields(&candidate).map_err(|msg| AppError::Validation {
            field: "discount".to_string(),
            message: msg.to_string(),
        })
    }

    fn scope_value(scope: &OfferScope) -> AppResult<serde_json::Value> {
        serde_json::to_value(scope)
            .map_err(|e| AppError::Internal(format!("Scope serialization failed: {}", e)))
    }
}
