use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::domain::{OrderDetails, PageRequest, Product, ProductCreate, ProductPatch, User};

use super::products::product_page;
use super::{AdminUser, ApiError, ApiJson, ApiQuery, AppState};

/// Query string of the admin order listing.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub q: Option<String>,
    pub status: Option<String>,
}

/// Body of the selective order export.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub selected_ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExportRow<'a> {
    #[serde(rename = "OrderID")]
    order_id: &'a str,
    customer: &'a str,
    email: &'a str,
    total: String,
    status: String,
    date: String,
}

fn orders_csv(rows: &[OrderDetails]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        let customer = row.customer.as_ref();
        writer.serialize(ExportRow {
            order_id: &row.order.id,
            customer: customer.map_or("N/A", |c| c.name.as_str()),
            email: customer.map_or("N/A", |c| c.email.as_str()),
            total: row.order.total_price.to_string(),
            status: row.order.status.to_string(),
            date: row.order.created_at.to_rfc3339(),
        })?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

pub async fn profile(State(state): State<AppState>, AdminUser(admin): AdminUser) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .get_user(admin.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(request): ApiQuery<PageRequest>,
) -> Result<Json<Value>, ApiError> {
    let page = state.products.list_page(&request, true, state.limits).await?;
    Ok(product_page(page))
}

pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(params): ApiJson<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.create_product(params).await?;
    info!(admin_id = %admin.id, product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.update_product(id, patch).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let product = state.products.soft_delete(id).await?;
    info!(admin_id = %admin.id, product_id = %product.id, "Product soft-deleted");
    Ok(Json(json!({ "success": true, "product": product })))
}

pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> Result<Json<Value>, ApiError> {
    let request = PageRequest {
        page: query.page,
        limit: query.limit,
        q: query.q,
    };
    let page = state
        .orders
        .list_page(&request, query.status.as_deref(), state.limits)
        .await?;
    Ok(Json(json!({
        "orders": page.items,
        "page": page.page,
        "totalPages": page.total_pages,
        "total": page.total,
    })))
}

pub async fn get_order(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<OrderDetails>, ApiError> {
    Ok(Json(state.orders.order_details(id, &admin).await?))
}

pub async fn revenue(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Value>, ApiError> {
    let total = state.orders.revenue_total().await?;
    Ok(Json(json!({ "totalRevenue": total })))
}

pub async fn revenue_events(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Value>, ApiError> {
    let events = state.orders.revenue_events().await?;
    Ok(Json(json!({ "events": events })))
}

pub async fn export_orders(State(state): State<AppState>, AdminUser(admin): AdminUser) -> Result<impl IntoResponse, ApiError> {
    export_csv(&state, &admin.id, Vec::new()).await
}

pub async fn export_selected_orders(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(request): ApiJson<ExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    export_csv(&state, &admin.id, request.selected_ids).await
}

async fn export_csv(state: &AppState, admin_id: &str, selected: Vec<String>) -> Result<impl IntoResponse, ApiError> {
    let rows = state.orders.export(selected).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound("No orders found".to_string()));
    }
    let body = orders_csv(&rows).map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(admin_id = %admin_id, rows = rows.len(), "Orders exported");
    Ok((
        [
            (CONTENT_TYPE, "text/csv"),
            (CONTENT_DISPOSITION, "attachment; filename=\"orders.csv\""),
        ],
        body,
    ))
}
