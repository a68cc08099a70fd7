//! Shared types and models for the Grocto campus grocery marketplace
//!
//! This crate contains the domain model, the pure order/pricing engine, and
//! validation helpers shared between the backend, the frontend (via WASM),
//! and other components of the system.

pub mod engine;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
