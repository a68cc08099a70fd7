//! WebAssembly module for the Grocto marketplace
//!
//! Provides client-side checkout computation so the frontend can validate
//! delivery windows, resolve slot fees, and preview order totals without a
//! round trip:
//! - Delivery window validation
//! - Slot matching with deterministic fee resolution
//! - Cart summary computation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::engine;
use shared::engine::AnnotatedItem;
use shared::models::DeliverySlot;
use shared::types::TimeOfDay;

/// Check that a delivery window is long enough to book (>= 1 hour)
#[wasm_bindgen]
pub fn is_valid_delivery_window(start: &str, end: &str) -> bool {
    match (parse_time(start), parse_time(end)) {
        (Ok(start), Ok(end)) => {
            end.minutes() > start.minutes()
                && end.minutes() - start.minutes() >= engine::MIN_WINDOW_MINUTES
        }
        _ => false,
    }
}

/// Match a delivery window against a store's slots.
///
/// `slots_json` is the JSON array of delivery slots the checkout page
/// already fetched. Returns `{slot_id, delivery_fee}` as JSON, or an error
/// message for display.
#[wasm_bindgen]
pub fn match_delivery_slot(slots_json: &str, start: &str, end: &str) -> Result<String, JsValue> {
    let slots: Vec<DeliverySlot> = serde_json::from_str(slots_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid slots JSON: {}", e)))?;
    let start = parse_time(start).map_err(JsValue::from_str)?;
    let end = parse_time(end).map_err(JsValue::from_str)?;

    let matched = engine::match_delivery_slot(&slots, start, end)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&matched)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Compute an order summary for annotated cart items.
///
/// `items_json` is the annotated-items array returned by the cart endpoint;
/// `gst_percentage` and `delivery_fee` are decimal strings. Returns the
/// rounded summary as JSON.
#[wasm_bindgen]
pub fn compute_cart_summary(
    items_json: &str,
    gst_percentage: &str,
    delivery_fee: &str,
) -> Result<String, JsValue> {
    let items: Vec<AnnotatedItem> = serde_json::from_str(items_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid items JSON: {}", e)))?;
    let gst = parse_decimal(gst_percentage).map_err(JsValue::from_str)?;
    let fee = parse_decimal(delivery_fee).map_err(JsValue::from_str)?;

    let summary = engine::compute_summary(&items, gst, fee).rounded();
    serde_json::to_string(&summary)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

fn parse_time(s: &str) -> Result<TimeOfDay, &'static str> {
    s.parse()
}

fn parse_decimal(s: &str) -> Result<Decimal, &'static str> {
    s.parse().map_err(|_| "Invalid decimal value")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_validation() {
        assert!(is_valid_delivery_window("09:00", "10:00"));
        assert!(is_valid_delivery_window("09:00", "11:30"));
        assert!(!is_valid_delivery_window("09:15", "09:45"));
        assert!(!is_valid_delivery_window("10:00", "09:00"));
        assert!(!is_valid_delivery_window("late", "later"));
    }

    #[test]
    fn test_match_delivery_slot_json() {
        let slots = r#"[
            {"id":"00000000-0000-0000-0000-000000000001","store_id":"00000000-0000-0000-0000-000000000009","start_time":"09:00","end_time":"12:00","delivery_fee":"20"},
            {"id":"00000000-0000-0000-0000-000000000002","store_id":"00000000-0000-0000-0000-000000000009","start_time":"08:00","end_time":"11:00","delivery_fee":"15"}
        ]"#;

        let result = match_delivery_slot(slots, "09:00", "10:30").unwrap();
        assert!(result.contains("00000000-0000-0000-0000-000000000002"));
        assert!(result.contains("15"));
    }

    #[test]
    fn test_compute_cart_summary_json() {
        let items = r#"[
            {"product_id":"00000000-0000-0000-0000-000000000001","quantity":1,"unit_price":"500","subtotal":"500","discount":{"offer_id":"00000000-0000-0000-0000-000000000002","offer_title":"10% off","amount":"50","discounted_subtotal":"450"}}
        ]"#;

        let summary = compute_cart_summary(items, "5", "30").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&summary).unwrap();
        let total: Decimal = parsed["total"].as_str().unwrap().parse().unwrap();
        assert_eq!(total, Decimal::new(50250, 2));
    }
}
