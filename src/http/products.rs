use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::domain::{Page, PageRequest, Product};

use super::{ApiError, ApiQuery, AppState};

pub(super) fn product_page(page: Page<Product>) -> Json<Value> {
    Json(json!({
        "products": page.items,
        "page": page.page,
        "totalPages": page.total_pages,
        "total": page.total,
    }))
}

pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(request): ApiQuery<PageRequest>,
) -> Result<Json<Value>, ApiError> {
    let page = state.products.list_page(&request, false, state.limits).await?;
    Ok(product_page(page))
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.find_visible(id).await?))
}
