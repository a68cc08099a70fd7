//! Middleware for the Grocto marketplace backend

mod auth;

pub use auth::{auth_middleware, AuthUser, Claims, CurrentUser};
