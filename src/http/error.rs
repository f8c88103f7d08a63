use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;

/// Every failure a route can answer with. The body is always `{"message": ...}`.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "Request failed");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) => ApiError::NotFound("Order not found".to_string()),
            // At checkout a missing product is a bad request, not a missing resource.
            OrderError::ProductNotFound(_) | OrderError::InsufficientStock { .. } => ApiError::Validation(e.to_string()),
            OrderError::ValidationError(message) => ApiError::Validation(message),
            OrderError::IllegalTransition { .. } => ApiError::Conflict(e.to_string()),
            OrderError::Forbidden => ApiError::Forbidden("Access denied".to_string()),
            OrderError::ActorCommunicationError(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(_) => ApiError::NotFound("Product not found".to_string()),
            ProductError::ActorCommunicationError(detail) => ApiError::Internal(detail),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            UserError::ActorCommunicationError(detail) => ApiError::Internal(detail),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthorized(message) => ApiError::Unauthorized(message),
            AuthError::Forbidden => ApiError::Forbidden("Admin access required".to_string()),
            AuthError::InvalidInput(message) => ApiError::Validation(message),
            AuthError::Issue(detail) | AuthError::Unavailable(detail) | AuthError::Hash(detail) => {
                ApiError::Internal(detail)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;

    #[test]
    fn test_order_errors_map_to_status_codes() {
        let cases = [
            (OrderError::NotFound("o1".into()), StatusCode::NOT_FOUND),
            (OrderError::ProductNotFound("p1".into()), StatusCode::BAD_REQUEST),
            (
                OrderError::InsufficientStock { product: "Mouse".into(), requested: 3, available: 1 },
                StatusCode::BAD_REQUEST,
            ),
            (OrderError::ValidationError("No items".into()), StatusCode::BAD_REQUEST),
            (
                OrderError::IllegalTransition { from: OrderStatus::Shipped, to: OrderStatus::Cancelled },
                StatusCode::BAD_REQUEST,
            ),
            (OrderError::Forbidden, StatusCode::FORBIDDEN),
            (OrderError::ActorCommunicationError("closed".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_conflict_message_names_status() {
        let error = ApiError::from(OrderError::IllegalTransition { from: OrderStatus::Shipped, to: OrderStatus::Cancelled });
        assert_eq!(error, ApiError::Conflict("Cannot move order with status Shipped to Cancelled".into()));
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(ApiError::from(AuthError::Unauthorized("No token".into())).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::Forbidden).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(AuthError::Unavailable("down".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::from(AuthError::InvalidInput("short".into())), ApiError::Validation("short".into()));
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("actor dropped".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), 1000).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "message": "Server error" }));
    }
}
