//! HTTP boundary: routes under `/api`, JSON bodies and error mapping.

mod accounts;
mod admin;
mod error;
mod extract;
mod orders;
mod products;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::app_system::StoreSystem;
use crate::auth::AccessControl;
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::domain::PageLimits;

pub use error::ApiError;
pub use extract::{AdminUser, ApiJson, ApiQuery, AuthUser};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderClient,
    pub products: ProductClient,
    pub users: UserClient,
    pub access: AccessControl,
    pub limits: PageLimits,
}

impl AppState {
    pub fn new(system: &StoreSystem, access: AccessControl, limits: PageLimits) -> Self {
        Self {
            orders: system.order_client.clone(),
            products: system.product_client.clone(),
            users: system.user_client.clone(),
            access,
            limits,
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/admin/login", post(accounts::admin_login))
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
        .route("/orders", post(orders::create_order))
        .route("/orders/my", get(orders::my_orders))
        .route("/orders/:id", get(orders::get_order))
        .route("/orders/:id/cancel", put(orders::cancel_order))
        .route("/orders/:id/status", put(orders::update_status).patch(orders::update_status))
        .route("/user/orders/my", get(orders::my_orders))
        .route("/admin/profile", get(admin::profile))
        .route("/admin/products", get(admin::list_products).post(admin::create_product))
        .route(
            "/admin/products/:id",
            get(admin::get_product)
                .put(admin::update_product)
                .delete(admin::delete_product),
        )
        .route("/admin/orders", get(admin::list_orders))
        .route(
            "/admin/orders/export",
            get(admin::export_orders).post(admin::export_selected_orders),
        )
        .route("/admin/orders/:id", get(admin::get_order))
        .route("/admin/orders/:id/status", put(orders::update_status))
        .route("/admin/revenue", get(admin::revenue))
        .route("/admin/revenue/events", get(admin::revenue_events));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
