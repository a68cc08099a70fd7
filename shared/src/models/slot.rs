//! Seller-defined delivery slots

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::TimeOfDay;

/// A delivery time window published by a store, with its fee
///
/// Invariant: `start_time < end_time`. Slots are not guaranteed to be
/// disjoint; the matcher resolves overlaps deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySlot {
    pub id: Uuid,
    pub store_id: Uuid,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub delivery_fee: Decimal,
}
