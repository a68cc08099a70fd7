//! End-to-end checkout pipeline tests
//!
//! Drives the engine the way the order service does: annotate the cart with
//! offers, compute the summary, match the delivery window, and only then
//! fold the fee into the total.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::engine::{
    compute_summary, match_delivery_slot, resolve_offers, CartLine, EngineError,
};
use shared::models::{DeliverySlot, Discount, Offer, OfferScope};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn ten_percent_off(store_id: Uuid) -> Offer {
    Offer {
        id: Uuid::from_u128(77),
        store_id,
        title: "10% off everything".to_string(),
        description: Some("Campus special".to_string()),
        discount: Discount::Percentage { amount: dec("10") },
        min_purchase: dec("200"),
        scope: OfferScope::All,
        offer_limit: 100,
        usage_count: 3,
        starting_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        closing_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        created_at: Utc::now(),
    }
}

fn slots(store_id: Uuid) -> Vec<DeliverySlot> {
    vec![
        DeliverySlot {
            id: Uuid::from_u128(1),
            store_id,
            start_time: "09:00".parse().unwrap(),
            end_time: "12:00".parse().unwrap(),
            delivery_fee: dec("30"),
        },
        DeliverySlot {
            id: Uuid::from_u128(2),
            store_id,
            start_time: "15:00".parse().unwrap(),
            end_time: "18:00".parse().unwrap(),
            delivery_fee: dec("20"),
        },
    ]
}

/// A full checkout: 5% GST, a 10% offer, and a 30-rupee slot fee
#[test]
fn test_checkout_happy_path() {
    let store_id = Uuid::from_u128(9);
    let cart = vec![CartLine {
        product_id: Uuid::from_u128(1),
        quantity: 5,
        unit_price: dec("100"),
    }];

    // Offers attach first (cart view)
    let offers = vec![ten_percent_off(store_id)];
    let annotation = resolve_offers(&offers, &cart, today());
    assert_eq!(annotation.total_discount, dec("50"));

    // Summary without a slot: delivery contributes nothing yet
    let preview = compute_summary(&annotation.items, dec("5"), Decimal::ZERO);
    assert_eq!(preview.total, dec("472.50"));

    // Checkout matches the window and fixes the fee
    let matched = match_delivery_slot(
        &slots(store_id),
        "09:30".parse().unwrap(),
        "11:00".parse().unwrap(),
    )
    .unwrap();
    assert_eq!(matched.delivery_fee, dec("30"));

    let summary = compute_summary(&annotation.items, dec("5"), matched.delivery_fee).rounded();
    assert_eq!(summary.subtotal, dec("450"));
    assert_eq!(summary.gst_amount, dec("22.50"));
    assert_eq!(summary.total, dec("502.50"));
}

/// A failed slot match leaves the fee out of the total entirely
#[test]
fn test_unmatched_window_excludes_fee() {
    let store_id = Uuid::from_u128(9);
    let cart = vec![CartLine {
        product_id: Uuid::from_u128(1),
        quantity: 1,
        unit_price: dec("250"),
    }];

    let annotation = resolve_offers(&[ten_percent_off(store_id)], &cart, today());

    // 13:00-14:30 falls between the two slots
    let result = match_delivery_slot(
        &slots(store_id),
        "13:00".parse().unwrap(),
        "14:30".parse().unwrap(),
    );
    assert_eq!(result.unwrap_err(), EngineError::NoMatchingSlot);

    // The caller re-prompts; the summary it can show has a zero fee
    let summary = compute_summary(&annotation.items, dec("5"), Decimal::ZERO);
    assert_eq!(summary.delivery_fee, Decimal::ZERO);
    assert_eq!(summary.total, summary.subtotal + summary.gst_amount);
}

/// Below the offer's minimum purchase the cart prices without a discount
#[test]
fn test_min_purchase_not_met_prices_plain() {
    let store_id = Uuid::from_u128(9);
    let cart = vec![CartLine {
        product_id: Uuid::from_u128(1),
        quantity: 1,
        unit_price: dec("150"),
    }];

    let annotation = resolve_offers(&[ten_percent_off(store_id)], &cart, today());
    assert_eq!(annotation.applied_offer_id, None);

    let summary = compute_summary(&annotation.items, dec("5"), Decimal::ZERO);
    assert_eq!(summary.total_discount, Decimal::ZERO);
    assert_eq!(summary.subtotal, dec("150"));
}

/// Scoped offers discount only their products, and the summary follows
#[test]
fn test_scoped_offer_through_pipeline() {
    let store_id = Uuid::from_u128(9);
    let snacks = Uuid::from_u128(1);
    let dairy = Uuid::from_u128(2);
    let cart = vec![
        CartLine {
            product_id: snacks,
            quantity: 2,
            unit_price: dec("100"),
        },
        CartLine {
            product_id: dairy,
            quantity: 1,
            unit_price: dec("300"),
        },
    ];

    let mut offer = ten_percent_off(store_id);
    offer.scope = OfferScope::Products([snacks].into_iter().collect());
    offer.min_purchase = Decimal::ZERO;

    let annotation = resolve_offers(&[offer], &cart, today());
    // 10% of the 200 snack line only
    assert_eq!(annotation.total_discount, dec("20"));
    assert!(annotation.items[1].discount.is_none());

    let summary = compute_summary(&annotation.items, Decimal::ZERO, Decimal::ZERO);
    assert_eq!(summary.subtotal, dec("480"));
}
