//! Order-level monetary summaries
//!
//! Applies the discounts attached by offer resolution, then GST and the
//! delivery fee. All math stays at full `Decimal` precision; rounding to two
//! places happens only when a summary is persisted or displayed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::offers::AnnotatedItem;

/// Monetary breakdown of a cart or order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Sum of unit price x quantity over all items, pre-discount
    pub original_subtotal: Decimal,
    pub total_discount: Decimal,
    /// `original_subtotal - total_discount`
    pub subtotal: Decimal,
    pub gst_amount: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// The 2-decimal-place form used at persistence/display boundaries
    pub fn rounded(&self) -> OrderSummary {
        OrderSummary {
            original_subtotal: self.original_subtotal.round_dp(2),
            total_discount: self.total_discount.round_dp(2),
            subtotal: self.subtotal.round_dp(2),
            gst_amount: self.gst_amount.round_dp(2),
            delivery_fee: self.delivery_fee.round_dp(2),
            total: self.total.round_dp(2),
        }
    }
}

/// Compute the monetary summary for annotated items.
///
/// Never fails on valid inputs: a store without GST passes zero, and the fee
/// is zero until a slot has been matched.
pub fn compute_summary(
    items: &[AnnotatedItem],
    gst_percentage: Decimal,
    delivery_fee: Decimal,
) -> OrderSummary {
    let original_subtotal: Decimal = items.iter().map(|item| item.subtotal).sum();
    let total_discount: Decimal = items
        .iter()
        .filter_map(|item| item.discount.as_ref().map(|d| d.amount))
        .sum();
    let subtotal = original_subtotal - total_discount;
    let gst_amount = if gst_percentage > Decimal::ZERO {
        subtotal * gst_percentage / Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let total = subtotal + gst_amount + delivery_fee;

    OrderSummary {
        original_subtotal,
        total_discount,
        subtotal,
        gst_amount,
        delivery_fee,
        total,
    }
}
