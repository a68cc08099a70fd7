//! Delivery slot matching
//!
//! Resolves a customer-chosen delivery window against a store's published
//! slots and fixes the delivery fee.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::engine::EngineError;
use crate::models::DeliverySlot;
use crate::types::TimeOfDay;

/// Minimum bookable window length
pub const MIN_WINDOW_MINUTES: u16 = 60;

/// The slot that won the match, with its fee
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotMatch {
    pub slot_id: Uuid,
    pub delivery_fee: Decimal,
}

/// Find the slot whose window fully contains `[start, end]`.
///
/// Slots may overlap, so candidates are scanned in ascending
/// `(start_time, id)` order and the first hit wins; fee resolution is
/// therefore reproducible for any input order of `slots`.
pub fn match_delivery_slot(
    slots: &[DeliverySlot],
    start: TimeOfDay,
    end: TimeOfDay,
) -> Result<SlotMatch, EngineError> {
    if end.minutes() <= start.minutes()
        || end.minutes() - start.minutes() < MIN_WINDOW_MINUTES
    {
        return Err(EngineError::InvalidWindow);
    }

    let mut ordered: Vec<&DeliverySlot> = slots.iter().collect();
    ordered.sort_by_key(|slot| (slot.start_time, slot.id));

    ordered
        .into_iter()
        .find(|slot| slot.start_time <= start && end <= slot.end_time)
        .map(|slot| SlotMatch {
            slot_id: slot.id,
            delivery_fee: slot.delivery_fee,
        })
        .ok_or(EngineError::NoMatchingSlot)
}
