//! Offer eligibility and discount tests
//!
//! Covers activity windows, usage caps, scope and minimum purchase gates,
//! the greatest-discount tie-break, proportional distribution, and
//! idempotent redemption accounting.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;
use uuid::Uuid;

use shared::engine::{apply_offer, resolve_offers, validate_offer, CartLine, EngineError};
use shared::models::{Discount, Offer, OfferScope};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn line(id: u128, qty: u32, price: &str) -> CartLine {
    CartLine {
        product_id: Uuid::from_u128(id),
        quantity: qty,
        unit_price: dec(price),
    }
}

fn offer(id: u128, discount: Discount) -> Offer {
    Offer {
        id: Uuid::from_u128(id),
        store_id: Uuid::nil(),
        title: format!("Offer {}", id),
        description: None,
        discount,
        min_purchase: Decimal::ZERO,
        scope: OfferScope::All,
        offer_limit: 0,
        usage_count: 0,
        starting_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        closing_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        created_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_percentage_and_fixed_candidates_compared_by_value() {
        let lines = vec![line(1, 1, "200")];
        // 10% of 200 = 20 loses against a flat 25
        let offers = vec![
            offer(1, Discount::Percentage { amount: dec("10") }),
            offer(2, Discount::Fixed { amount: dec("25") }),
        ];

        let annotation = resolve_offers(&offers, &lines, today());
        assert_eq!(annotation.applied_offer_id, Some(Uuid::from_u128(2)));
        assert_eq!(annotation.total_discount, dec("25"));
    }

    #[test]
    fn test_offer_outside_window_is_expired() {
        let lines = vec![line(1, 1, "100")];
        let mut o = offer(1, Discount::Fixed { amount: dec("10") });
        o.starting_date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        o.closing_date = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();

        assert_eq!(
            validate_offer(&o, &lines, today()),
            Err(EngineError::OfferExpired)
        );
    }

    #[test]
    fn test_window_boundaries_inclusive() {
        let lines = vec![line(1, 1, "100")];
        let mut o = offer(1, Discount::Fixed { amount: dec("10") });
        o.starting_date = today();
        o.closing_date = today();

        assert!(validate_offer(&o, &lines, today()).is_ok());
    }

    #[test]
    fn test_capped_offer_at_limit_is_rejected() {
        let lines = vec![line(1, 1, "100")];
        let mut o = offer(1, Discount::Fixed { amount: dec("10") });
        o.offer_limit = 10;
        o.usage_count = 10;

        assert_eq!(
            validate_offer(&o, &lines, today()),
            Err(EngineError::OfferLimitReached)
        );
    }

    #[test]
    fn test_zero_limit_means_unlimited() {
        let lines = vec![line(1, 1, "100")];
        let mut o = offer(1, Discount::Fixed { amount: dec("10") });
        o.offer_limit = 0;
        o.usage_count = 100_000;

        assert!(validate_offer(&o, &lines, today()).is_ok());
    }

    #[test]
    fn test_min_purchase_counts_only_eligible_scope() {
        // Cart has 100 in-scope and 500 out-of-scope; min purchase 150
        // fails because only the in-scope subtotal counts
        let lines = vec![line(1, 1, "100"), line(2, 1, "500")];
        let mut o = offer(1, Discount::Percentage { amount: dec("10") });
        o.scope = OfferScope::Products(BTreeSet::from([Uuid::from_u128(1)]));
        o.min_purchase = dec("150");

        assert_eq!(
            validate_offer(&o, &lines, today()),
            Err(EngineError::InvalidOfferScope)
        );
    }

    #[test]
    fn test_apply_offer_reports_staleness() {
        let lines = vec![line(1, 1, "100")];
        let mut o = offer(1, Discount::Fixed { amount: dec("10") });
        o.closing_date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();

        // Displayed yesterday, applied today: the error surfaces instead of
        // silently repricing
        assert_eq!(
            apply_offer(&o, &lines, today()).unwrap_err(),
            EngineError::OfferExpired
        );
    }

    #[test]
    fn test_discounted_unit_never_below_zero() {
        let lines = vec![line(1, 2, "10")];
        let offers = vec![offer(1, Discount::Fixed { amount: dec("500") })];

        let annotation = resolve_offers(&offers, &lines, today());
        let discount = annotation.items[0].discount.as_ref().unwrap();
        assert_eq!(discount.amount, dec("20"));
        assert_eq!(discount.discounted_subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_proportional_split_shares() {
        // 20 off across 25/75: shares 5 and 15
        let lines = vec![line(1, 1, "25"), line(2, 1, "75")];
        let offers = vec![offer(1, Discount::Fixed { amount: dec("20") })];

        let annotation = resolve_offers(&offers, &lines, today());
        assert_eq!(annotation.items[0].discount.as_ref().unwrap().amount, dec("5"));
        assert_eq!(annotation.items[1].discount.as_ref().unwrap().amount, dec("15"));
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

    fn lines_strategy() -> impl Strategy<Value = Vec<CartLine>> {
        prop::collection::vec((1u128..100, 1u32..10, price_strategy()), 1..8).prop_map(|raw| {
            raw.into_iter()
                .map(|(id, qty, price)| CartLine {
                    product_id: Uuid::from_u128(id),
                    quantity: qty,
                    unit_price: price,
                })
                .collect()
        })
    }

    fn discount_strategy() -> impl Strategy<Value = Discount> {
        prop_oneof![
            (1i64..=10000i64).prop_map(|n| Discount::Percentage {
                amount: Decimal::new(n, 2)
            }),
            (1i64..=100000i64).prop_map(|n| Discount::Fixed {
                amount: Decimal::new(n, 2)
            }),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The discount never exceeds the cart's pre-discount subtotal
        #[test]
        fn prop_discount_bounded_by_subtotal(
            lines in lines_strategy(),
            discount in discount_strategy()
        ) {
            let offers = vec![offer(1, discount)];
            let annotation = resolve_offers(&offers, &lines, today());

            let subtotal: Decimal = lines.iter().map(CartLine::subtotal).sum();
            prop_assert!(annotation.total_discount >= Decimal::ZERO);
            prop_assert!(annotation.total_discount <= subtotal);
        }

        /// Per-line discount parts always sum to the offer's total discount
        #[test]
        fn prop_split_sums_exactly(
            lines in lines_strategy(),
            discount in discount_strategy()
        ) {
            let offers = vec![offer(1, discount)];
            let annotation = resolve_offers(&offers, &lines, today());

            let parts: Decimal = annotation
                .items
                .iter()
                .filter_map(|item| item.discount.as_ref().map(|d| d.amount))
                .sum();
            prop_assert_eq!(parts, annotation.total_discount);
        }

        /// No line ends up with a negative discounted subtotal
        #[test]
        fn prop_no_negative_line_totals(
            lines in lines_strategy(),
            discount in discount_strategy()
        ) {
            let offers = vec![offer(1, discount)];
            let annotation = resolve_offers(&offers, &lines, today());

            for item in &annotation.items {
                if let Some(d) = &item.discount {
                    prop_assert!(d.discounted_subtotal >= Decimal::ZERO);
                }
            }
        }

        /// The winner grants at least as much as every other eligible offer
        #[test]
        fn prop_winner_has_greatest_discount(
            lines in lines_strategy(),
            discounts in prop::collection::vec(discount_strategy(), 1..5)
        ) {
            let offers: Vec<Offer> = discounts
                .into_iter()
                .enumerate()
                .map(|(i, d)| offer(i as u128 + 1, d))
                .collect();

            let annotation = resolve_offers(&offers, &lines, today());
            if let Some(winner_id) = annotation.applied_offer_id {
                for candidate in &offers {
                    let alone = resolve_offers(std::slice::from_ref(candidate), &lines, today());
                    prop_assert!(alone.total_discount <= annotation.total_discount,
                        "offer {} grants {} but winner {} grants {}",
                        candidate.id, alone.total_discount, winner_id, annotation.total_discount);
                }
            }
        }

        /// Resolution is deterministic
        #[test]
        fn prop_resolution_deterministic(
            lines in lines_strategy(),
            discounts in prop::collection::vec(discount_strategy(), 0..5)
        ) {
            let offers: Vec<Offer> = discounts
                .into_iter()
                .enumerate()
                .map(|(i, d)| offer(i as u128 + 1, d))
                .collect();

            let a = resolve_offers(&offers, &lines, today());
            let b = resolve_offers(&offers, &lines, today());
            prop_assert_eq!(a, b);
        }
    }
}

// ============================================================================
// Redemption Accounting (usage-count idempotency)
// ============================================================================

#[cfg(test)]
mod redemption_tests {
    use super::*;

    /// Mirror of the persistence discipline: a redemption set keyed by
    /// (offer, order) guards the usage-count increment
    struct RedemptionLedger {
        seen: HashSet<(Uuid, Uuid)>,
        usage_count: u32,
        offer_limit: u32,
    }

    impl RedemptionLedger {
        fn new(offer_limit: u32) -> Self {
            Self {
                seen: HashSet::new(),
                usage_count: 0,
                offer_limit,
            }
        }

        /// Returns the usage count after the attempt
        fn redeem(&mut self, offer_id: Uuid, order_id: Uuid) -> Result<u32, EngineError> {
            if !self.seen.insert((offer_id, order_id)) {
                // Duplicate submission of the same order: no double apply
                return Ok(self.usage_count);
            }
            if self.offer_limit != 0 && self.usage_count >= self.offer_limit {
                return Err(EngineError::OfferLimitReached);
            }
            self.usage_count += 1;
            Ok(self.usage_count)
        }
    }

    #[test]
    fn test_duplicate_submission_increments_once() {
        let mut ledger = RedemptionLedger::new(0);
        let offer_id = Uuid::from_u128(1);
        let order_id = Uuid::from_u128(42);

        assert_eq!(ledger.redeem(offer_id, order_id), Ok(1));
        assert_eq!(ledger.redeem(offer_id, order_id), Ok(1));
        assert_eq!(ledger.redeem(offer_id, order_id), Ok(1));
    }

    #[test]
    fn test_distinct_orders_each_count() {
        let mut ledger = RedemptionLedger::new(0);
        let offer_id = Uuid::from_u128(1);

        for n in 1..=5u32 {
            assert_eq!(ledger.redeem(offer_id, Uuid::from_u128(n as u128)), Ok(n));
        }
    }

    #[test]
    fn test_cap_enforced_at_redeem_time() {
        let mut ledger = RedemptionLedger::new(2);
        let offer_id = Uuid::from_u128(1);

        assert_eq!(ledger.redeem(offer_id, Uuid::from_u128(1)), Ok(1));
        assert_eq!(ledger.redeem(offer_id, Uuid::from_u128(2)), Ok(2));
        assert_eq!(
            ledger.redeem(offer_id, Uuid::from_u128(3)),
            Err(EngineError::OfferLimitReached)
        );
        // Replaying an already-counted order still does not double apply
        assert_eq!(ledger.redeem(offer_id, Uuid::from_u128(2)), Ok(2));
    }
}
