//! Order status state machine
//!
//! The only legal edges are pending->accepted, pending->rejected,
//! accepted->packaging, packaging->delivering, delivering->delivered.
//! Transitions are validated before any effect is produced; an error means
//! nothing changed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::engine::EngineError;
use crate::models::{DeliveryPerson, OrderStatus};

/// A seller's request to advance an order
#[derive(Debug, Clone, Copy)]
pub struct TransitionRequest {
    pub target: OrderStatus,
    /// Required for the irreversible pending->rejected edge
    pub confirmed: bool,
}

/// Data the machine needs beyond the statuses themselves
#[derive(Debug, Clone)]
pub struct TransitionContext<'a> {
    pub now: DateTime<Utc>,
    /// Offset stamped onto `estimated_delivery_time` at acceptance
    pub eta_offset: Duration,
    /// The store's delivery-person roster
    pub roster: &'a [DeliveryPerson],
}

/// The new status plus any side-effect data to persist with it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionOutcome {
    pub status: OrderStatus,
    pub estimated_delivery_time: Option<DateTime<Utc>>,
    pub delivery_person_contact: Option<String>,
}

impl TransitionOutcome {
    fn plain(status: OrderStatus) -> Self {
        TransitionOutcome {
            status,
            estimated_delivery_time: None,
            delivery_person_contact: None,
        }
    }
}

/// Apply one transition of the order lifecycle.
///
/// - accepting stamps `estimated_delivery_time = now + eta_offset`;
/// - rejecting demands `confirmed` (there is no compensating edge back);
/// - going out for delivery requires a roster entry and snapshots its
///   contact as `"Name (Phone)"` so later roster edits don't rewrite
///   history;
/// - everything else outside the table is an [`EngineError::IllegalTransition`].
pub fn apply_transition(
    current: OrderStatus,
    request: TransitionRequest,
    ctx: &TransitionContext<'_>,
) -> Result<TransitionOutcome, EngineError> {
    use OrderStatus::*;

    match (current, request.target) {
        (Pending, Accepted) => Ok(TransitionOutcome {
            status: Accepted,
            estimated_delivery_time: Some(ctx.now + ctx.eta_offset),
            delivery_person_contact: None,
        }),
        (Pending, Rejected) => {
            if !request.confirmed {
                return Err(EngineError::ConfirmationRequired);
            }
            Ok(TransitionOutcome::plain(Rejected))
        }
        (Accepted, Packaging) => Ok(TransitionOutcome::plain(Packaging)),
        (Packaging, Delivering) => ctx
            .roster
            .first()
            .map(|person| TransitionOutcome {
                status: Delivering,
                estimated_delivery_time: None,
                delivery_person_contact: Some(person.contact_snapshot()),
            })
            .ok_or(EngineError::NoDeliveryPersonAvailable),
        (Delivering, Delivered) => Ok(TransitionOutcome::plain(Delivered)),
        (from, to) => Err(EngineError::IllegalTransition { from, to }),
    }
}
