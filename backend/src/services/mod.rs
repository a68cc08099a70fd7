//! Business logic services for the Grocto marketplace backend

pub mod auth;
pub mod cart;
pub mod notification;
pub mod offer;
pub mod order;
pub mod product;
pub mod slot;
pub mod store;

pub use auth::AuthService;
pub use cart::CartService;
pub use notification::NotificationService;
pub use offer::OfferService;
pub use order::OrderService;
pub use product::ProductService;
pub use slot::SlotService;
pub use store::StoreService;
