use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::{Order, OrderDetails, PlaceOrder};

use super::{AdminUser, ApiError, ApiJson, AppState, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(request): ApiJson<PlaceOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.orders.create_order(principal.id, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn my_orders(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.my_orders(principal.id).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OrderDetails>, ApiError> {
    Ok(Json(state.orders.order_details(id, &principal).await?))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let order = state.orders.cancel_order(id, principal.id).await?;
    Ok(Json(json!({ "message": "Order cancelled", "order": order })))
}

pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<Value>, ApiError> {
    if update.status.trim().is_empty() {
        return Err(ApiError::Validation("Status is required".to_string()));
    }
    let order = state.orders.update_status(id, &update.status, update.admin_notes).await?;
    info!(admin_id = %admin.id, order_id = %order.id, status = %order.status, "Status updated by admin");
    Ok(Json(json!({ "message": "Order status updated", "order": order })))
}
