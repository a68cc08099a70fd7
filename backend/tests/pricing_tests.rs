//! Monetary summary tests
//!
//! Covers the subtotal/discount/GST/fee arithmetic, idempotence, and the
//! round-at-the-boundary discipline.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::engine::{compute_summary, AnnotatedItem};
use shared::models::AppliedDiscount;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(qty: u32, price: Decimal, discount: Option<Decimal>) -> AnnotatedItem {
    let subtotal = price * Decimal::from(qty);
    AnnotatedItem {
        product_id: Uuid::new_v4(),
        quantity: qty,
        unit_price: price,
        subtotal,
        discount: discount.map(|amount| AppliedDiscount {
            offer_id: Uuid::nil(),
            offer_title: "Test offer".to_string(),
            amount,
            discounted_subtotal: subtotal - amount,
        }),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Store GST 5%, subtotal 500, 10% offer, slot fee 30 -> total 502.50
    #[test]
    fn test_worked_example() {
        let items = vec![item(1, dec("500"), Some(dec("50")))];
        let summary = compute_summary(&items, dec("5"), dec("30"));

        assert_eq!(summary.original_subtotal, dec("500"));
        assert_eq!(summary.total_discount, dec("50"));
        assert_eq!(summary.subtotal, dec("450"));
        assert_eq!(summary.gst_amount, dec("22.50"));
        assert_eq!(summary.delivery_fee, dec("30"));
        assert_eq!(summary.total, dec("502.50"));
    }

    /// Before a slot is matched the fee contributes nothing
    #[test]
    fn test_fee_defaults_to_zero_contribution() {
        let items = vec![item(2, dec("100"), None)];
        let summary = compute_summary(&items, dec("5"), Decimal::ZERO);

        assert_eq!(summary.total, dec("210"));
    }

    /// A store without GST configured contributes zero tax
    #[test]
    fn test_zero_gst(){
        let items = vec![item(1, dec("99.99"), None)];
        let summary = compute_summary(&items, Decimal::ZERO, dec("10"));

        assert_eq!(summary.gst_amount, Decimal::ZERO);
        assert_eq!(summary.total, dec("109.99"));
    }

    #[test]
    fn test_multiple_items_mixed_discounts() {
        let items = vec![
            item(2, dec("50"), Some(dec("10"))),
            item(1, dec("200"), None),
            item(3, dec("10"), Some(dec("5"))),
        ];
        let summary = compute_summary(&items, Decimal::ZERO, Decimal::ZERO);

        // 100 + 200 + 30 = 330 gross, 15 off
        assert_eq!(summary.original_subtotal, dec("330"));
        assert_eq!(summary.total_discount, dec("15"));
        assert_eq!(summary.subtotal, dec("315"));
        assert_eq!(summary.total, dec("315"));
    }

    #[test]
    fn test_empty_cart_summary_is_all_zero() {
        let summary = compute_summary(&[], dec("18"), Decimal::ZERO);

        assert_eq!(summary.original_subtotal, Decimal::ZERO);
        assert_eq!(summary.total_discount, Decimal::ZERO);
        assert_eq!(summary.gst_amount, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    /// Internal values keep full precision; rounding is a separate view
    #[test]
    fn test_rounded_view() {
        let items = vec![item(3, dec("33.337"), None)];
        let summary = compute_summary(&items, dec("5"), Decimal::ZERO);

        assert_eq!(summary.subtotal, dec("100.011"));
        let rounded = summary.rounded();
        assert_eq!(rounded.subtotal, dec("100.01"));
        assert_eq!(rounded.gst_amount, dec("5.00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn gst_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=2800i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn items_strategy() -> impl Strategy<Value = Vec<AnnotatedItem>> {
        prop::collection::vec((1u32..10, price_strategy()), 0..8).prop_map(|raw| {
            raw.into_iter()
                .map(|(qty, price)| item(qty, price, None))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Calling the calculator twice yields identical output
        #[test]
        fn prop_summary_idempotent(
            items in items_strategy(),
            gst in gst_strategy(),
            fee in price_strategy()
        ) {
            let first = compute_summary(&items, gst, fee);
            let second = compute_summary(&items, gst, fee);
            prop_assert_eq!(first, second);
        }

        /// total = subtotal + gst + fee, always
        #[test]
        fn prop_total_is_sum_of_parts(
            items in items_strategy(),
            gst in gst_strategy(),
            fee in price_strategy()
        ) {
            let summary = compute_summary(&items, gst, fee);
            prop_assert_eq!(
                summary.total,
                summary.subtotal + summary.gst_amount + summary.delivery_fee
            );
        }

        /// subtotal = original - discount, and nothing goes negative
        /// on discount-free carts
        #[test]
        fn prop_subtotal_consistent(
            items in items_strategy(),
            gst in gst_strategy(),
            fee in price_strategy()
        ) {
            let summary = compute_summary(&items, gst, fee);
            prop_assert_eq!(
                summary.subtotal,
                summary.original_subtotal - summary.total_discount
            );
            prop_assert!(summary.subtotal >= Decimal::ZERO);
            prop_assert!(summary.gst_amount >= Decimal::ZERO);
        }

        /// GST follows the configured rate exactly
        #[test]
        fn prop_gst_matches_rate(
            items in items_strategy(),
            gst in gst_strategy()
        ) {
            let summary = compute_summary(&items, gst, Decimal::ZERO);
            let expected = if gst > Decimal::ZERO {
                summary.subtotal * gst / Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
            prop_assert_eq!(summary.gst_amount, expected);
        }

        /// Rounding moves every field by at most half a paisa
        #[test]
        fn prop_rounding_is_tight(
            items in items_strategy(),
            gst in gst_strategy(),
            fee in price_strategy()
        ) {
            let summary = compute_summary(&items, gst, fee);
            let rounded = summary.rounded();
            let half_paisa = Decimal::new(5, 3);

            prop_assert!((summary.total - rounded.total).abs() <= half_paisa);
            prop_assert!((summary.gst_amount - rounded.gst_amount).abs() <= half_paisa);
        }
    }
}
