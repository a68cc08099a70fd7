//! Offer eligibility and discount attachment
//!
//! Decides which active offer (at most one) applies to a cart, and splits
//! the resulting discount across the eligible lines.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::EngineError;
use crate::models::{AppliedDiscount, CartItem, Discount, Offer};

/// A cart line as the engine sees it: product, quantity, captured price
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl From<&CartItem> for CartLine {
    fn from(item: &CartItem) -> Self {
        CartLine {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// A cart line after offer resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Pre-discount line subtotal
    pub subtotal: Decimal,
    pub discount: Option<AppliedDiscount>,
}

/// Result of resolving offers against a cart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartAnnotation {
    pub items: Vec<AnnotatedItem>,
    /// The offer that won, if any, with the total discount it grants
    pub applied_offer_id: Option<Uuid>,
    pub total_discount: Decimal,
}

/// Re-check a specific offer against a cart at apply time.
///
/// Offers shown at browse time can expire or exhaust before the order is
/// placed; order placement calls this again and surfaces the error instead
/// of silently pricing without the discount.
pub fn validate_offer(
    offer: &Offer,
    lines: &[CartLine],
    today: NaiveDate,
) -> Result<(), EngineError> {
    if !offer.in_window(today) {
        return Err(EngineError::OfferExpired);
    }
    if offer.is_exhausted() {
        return Err(EngineError::OfferLimitReached);
    }
    let eligible = eligible_subtotal(offer, lines);
    if eligible.is_zero() || eligible < offer.min_purchase {
        return Err(EngineError::InvalidOfferScope);
    }
    Ok(())
}

/// Apply one specific offer to the cart, re-validating it first.
///
/// Order placement uses this when the student checked out with an offer
/// attached, so staleness surfaces as an error rather than silent repricing.
pub fn apply_offer(
    offer: &Offer,
    lines: &[CartLine],
    today: NaiveDate,
) -> Result<CartAnnotation, EngineError> {
    validate_offer(offer, lines, today)?;
    let value = discount_value(offer, eligible_subtotal(offer, lines));
    Ok(annotate(offer, value, lines))
}

/// Attach the best eligible offer (if any) to the cart.
///
/// The winner is the offer granting the greatest absolute discount on its
/// eligible subtotal; ties break by earliest starting date, then lowest id.
pub fn resolve_offers(offers: &[Offer], lines: &[CartLine], today: NaiveDate) -> CartAnnotation {
    let winner = offers
        .iter()
        .filter(|offer| validate_offer(offer, lines, today).is_ok())
        .map(|offer| {
            let value = discount_value(offer, eligible_subtotal(offer, lines));
            (value, offer)
        })
        .max_by_key(|(value, offer)| {
            (
                *value,
                std::cmp::Reverse(offer.starting_date),
                std::cmp::Reverse(offer.id),
            )
        });

    match winner {
        Some((value, offer)) if !value.is_zero() => annotate(offer, value, lines),
        _ => CartAnnotation {
            items: lines.iter().map(plain_item).collect(),
            applied_offer_id: None,
            total_discount: Decimal::ZERO,
        },
    }
}

/// Sum of line subtotals the offer's scope covers
fn eligible_subtotal(offer: &Offer, lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .filter(|line| offer.scope.covers(line.product_id))
        .map(CartLine::subtotal)
        .sum()
}

/// Absolute discount the offer grants on an eligible subtotal.
///
/// Both kinds are capped at the eligible subtotal so no line can be priced
/// below zero.
fn discount_value(offer: &Offer, eligible: Decimal) -> Decimal {
    match offer.discount {
        Discount::Percentage { amount } => {
            (eligible * amount / Decimal::ONE_HUNDRED).min(eligible)
        }
        Discount::Fixed { amount } => amount.min(eligible),
    }
}

fn plain_item(line: &CartLine) -> AnnotatedItem {
    AnnotatedItem {
        product_id: line.product_id,
        quantity: line.quantity,
        unit_price: line.unit_price,
        subtotal: line.subtotal(),
        discount: None,
    }
}

/// Split `total_discount` across the offer's eligible lines proportionally
/// to their subtotal share. The final eligible line absorbs the remainder so
/// the per-line parts always sum to exactly `total_discount`.
fn annotate(offer: &Offer, total_discount: Decimal, lines: &[CartLine]) -> CartAnnotation {
    let eligible = eligible_subtotal(offer, lines);
    let last_eligible_idx = lines
        .iter()
        .rposition(|line| offer.scope.covers(line.product_id));

    let mut allocated = Decimal::ZERO;
    let items = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            if !offer.scope.covers(line.product_id) {
                return plain_item(line);
            }
            let subtotal = line.subtotal();
            let share = if Some(idx) == last_eligible_idx {
                total_discount - allocated
            } else {
                total_discount * subtotal / eligible
            };
            allocated += share;
            AnnotatedItem {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal,
                discount: Some(AppliedDiscount {
                    offer_id: offer.id,
                    offer_title: offer.title.clone(),
                    amount: share,
                    discounted_subtotal: subtotal - share,
                }),
            }
        })
        .collect();

    CartAnnotation {
        items,
        applied_offer_id: Some(offer.id),
        total_discount,
    }
}
