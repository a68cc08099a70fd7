//! Route definitions for the Grocto marketplace backend

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Public browsing routes
        .route("/stores", get(handlers::list_stores))
        .route("/stores/:store_id", get(handlers::get_store))
        .route("/stores/:store_id/products", get(handlers::list_store_products))
        .route("/stores/:store_id/slots", get(handlers::list_store_slots))
        .route("/stores/:store_id/offers", get(handlers::list_store_offers))
        .route("/offers/active", get(handlers::list_active_offers))
        // Protected routes - catalog management
        .nest("/products", product_routes())
        // Protected routes - seller store profile and roster
        .nest("/seller", seller_routes())
        // Protected routes - delivery slot management
        .nest("/slots", slot_routes())
        // Protected routes - offer management
        .nest("/offers", offer_routes())
        // Protected routes - cart
        .nest("/cart", cart_routes())
        // Protected routes - orders
        .nest("/orders", order_routes())
        // Protected routes - notifications
        .nest("/notifications", notification_routes())
}

/// Authentication routes (public except /me)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register/student", post(handlers::register_student))
        .route("/register/seller", post(handlers::register_seller))
        .route("/login", post(handlers::login))
        .route(
            "/me",
            get(handlers::me).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Seller store profile routes (protected)
fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/store", get(handlers::get_my_store).put(handlers::update_my_store))
        .route(
            "/delivery-persons",
            get(handlers::get_roster).post(handlers::add_delivery_person),
        )
        .route(
            "/delivery-persons/:person_id",
            delete(handlers::remove_delivery_person),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Delivery slot routes (protected)
fn slot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_my_slots).post(handlers::create_slot))
        .route(
            "/:slot_id",
            put(handlers::update_slot).delete(handlers::delete_slot),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Offer management routes (protected)
fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_my_offers).post(handlers::create_offer))
        .route(
            "/:offer_id",
            put(handlers::update_offer).delete(handlers::delete_offer),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Cart routes (protected)
fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_cart).post(handlers::add_to_cart).delete(handlers::clear_cart))
        .route(
            "/:item_id",
            put(handlers::update_cart_item).delete(handlers::remove_cart_item),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Order routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        // Student side
        .route("/", get(handlers::list_my_orders).post(handlers::place_order))
        .route("/:order_id", get(handlers::get_my_order))
        // Seller side
        .route("/store", get(handlers::list_store_orders))
        .route("/store/:order_id", get(handlers::get_store_order))
        .route("/store/:order_id/status", put(handlers::update_order_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Notification routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_notifications))
        .route("/unread-count", get(handlers::get_unread_count))
        .route("/mark-all-read", post(handlers::mark_all_as_read))
        .route("/:notification_id/read", post(handlers::mark_as_read))
        .route_layer(middleware::from_fn(auth_middleware))
}
