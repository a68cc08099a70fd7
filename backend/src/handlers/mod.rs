//! HTTP handlers for the Grocto marketplace backend

mod auth;
mod cart;
mod health;
mod notification;
mod offer;
mod order;
mod product;
mod slot;
mod store;

pub use auth::*;
pub use cart::*;
pub use health::*;
pub use notification::*;
pub use offer::*;
pub use order::*;
pub use product::*;
pub use slot::*;
pub use store::*;
