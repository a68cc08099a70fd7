//! The order lifecycle and delivery-scheduling engine
//!
//! Pure computation only: every function works over data supplied by the
//! caller (slots, offers, cart lines, clocks) and returns either a value or
//! an [`EngineError`]. Persistence, authorization, and notification are the
//! backend's job; nothing in this module performs I/O.

mod error;
pub mod offers;
pub mod pricing;
pub mod slots;
pub mod status;

pub use error::EngineError;
pub use offers::{apply_offer, resolve_offers, validate_offer, AnnotatedItem, CartAnnotation, CartLine};
pub use pricing::{compute_summary, OrderSummary};
pub use slots::{match_delivery_slot, SlotMatch, MIN_WINDOW_MINUTES};
pub use status::{apply_transition, TransitionContext, TransitionOutcome, TransitionRequest};
