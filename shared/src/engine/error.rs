//! Engine error taxonomy
//!
//! Every variant is recoverable and user-facing; the caller re-prompts. All
//! checks run before any state mutation, so a returned error implies nothing
//! was applied.

use thiserror::Error;

use crate::models::OrderStatus;

/// Errors produced by the order/pricing engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Requested delivery window is shorter than the minimum booking length
    #[error("delivery time interval must be at least 1 hour")]
    InvalidWindow,

    /// No published slot fully contains the requested window
    #[error("selected time does not match any available delivery slot")]
    NoMatchingSlot,

    /// The status change is not an edge of the lifecycle table
    #[error("cannot change order status from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// packaging -> delivering needs at least one roster entry
    #[error("no delivery person available; add one to the store roster first")]
    NoDeliveryPersonAvailable,

    /// Rejecting an order is irreversible and must be confirmed explicitly
    #[error("rejecting an order requires explicit confirmation")]
    ConfirmationRequired,

    /// The offer's validity window does not cover today
    #[error("offer is no longer valid")]
    OfferExpired,

    /// The offer's usage cap is exhausted
    #[error("offer usage limit has been reached")]
    OfferLimitReached,

    /// The offer does not cover the cart's products, or the minimum
    /// purchase is not met
    #[error("offer does not apply to the selected products")]
    InvalidOfferScope,
}
