//! Student carts

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line in a student's cart
///
/// Invariant: a non-empty cart only ever references one store. The cart
/// service refuses items from a second store until the cart is explicitly
/// cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub student_id: Uuid,
    pub store_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    /// Price captured when the item was added
    pub unit_price: Decimal,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Pre-discount line subtotal
    pub fn line_subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
