//! Database models for the Grocto marketplace backend
//!
//! Re-exports models from the shared crate.

pub use shared::models::*;
