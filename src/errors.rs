use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// Error body returned to clients, shared by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "FAIL",
    "message": "This store does not exist",
    "error": "INVALID_STORE"
}))]
pub struct ErrorResponse {
    /// Always "FAIL" for error responses
    #[schema(example = "FAIL")]
    pub status: String,
    /// Human-readable error description
    #[schema(example = "This store does not exist")]
    pub message: String,
    /// Machine-readable error code
    #[schema(example = "INVALID_STORE")]
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("This store does not exist")]
    InvalidStore,

    #[error("This item does not exist")]
    InvalidItem,

    #[error("This order does not exist")]
    InvalidOrder,

    #[error("Cart cannot be empty")]
    EmptyCart,

    #[error("Not enough stock of {0}")]
    OutOfStock(String),

    #[error("Price must be a valid number")]
    InvalidPrice,

    #[error("Quantity must be a valid number")]
    InvalidQuantity,

    #[error("Please fill all the required fields")]
    IncompleteForm,

    #[error("An account with this email already exists")]
    Duplicate,

    #[error("No account found with this email")]
    NoUserFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Hash error: {0}")]
    HashError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidStore
            | Self::InvalidItem
            | Self::InvalidOrder
            | Self::EmptyCart
            | Self::OutOfStock(_)
            | Self::InvalidPrice
            | Self::InvalidQuantity
            | Self::IncompleteForm
            | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Duplicate => StatusCode::CONFLICT,
            Self::NoUserFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::DatabaseError(_)
            | Self::SerializationError(_)
            | Self::HashError(_)
            | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the short machine-readable code placed in the `error` field.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStore => "INVALID_STORE",
            Self::InvalidItem => "INVALID_ITEM",
            Self::InvalidOrder => "INVALID_ORDER",
            Self::EmptyCart => "EMPTY_CART",
            Self::OutOfStock(_) => "OUT_OF_STOCK",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::IncompleteForm => "INCOMPLETE_FORM",
            Self::Duplicate => "DUPLICATE",
            Self::NoUserFound => "NO_USER_FOUND",
            Self::InvalidCredentials | Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::DatabaseError(_)
            | Self::SerializationError(_)
            | Self::HashError(_)
            | Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_)
            | Self::SerializationError(_)
            | Self::HashError(_)
            | Self::InternalError(_) => "Something went wrong".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            status: "FAIL".to_string(),
            message: self.response_message(),
            error: self.error_code().to_string(),
        };
        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::InvalidStore.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidItem.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::EmptyCart.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::OutOfStock("Milk".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::Duplicate.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ServiceError::NoUserFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes_match_response_contract() {
        assert_eq!(ServiceError::InvalidStore.error_code(), "INVALID_STORE");
        assert_eq!(ServiceError::InvalidOrder.error_code(), "INVALID_ORDER");
        assert_eq!(
            ServiceError::OutOfStock("Milk".into()).error_code(),
            "OUT_OF_STOCK"
        );
        assert_eq!(ServiceError::InvalidPrice.error_code(), "INVALID_PRICE");
        assert_eq!(ServiceError::IncompleteForm.error_code(), "INCOMPLETE_FORM");
        assert_eq!(ServiceError::Duplicate.error_code(), "DUPLICATE");
        assert_eq!(ServiceError::NoUserFound.error_code(), "NO_USER_FOUND");
    }

    #[test]
    fn response_message_hides_internal_details() {
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("connection refused".into()))
                .response_message(),
            "Something went wrong"
        );
        assert_eq!(
            ServiceError::HashError("argon2 params".into()).response_message(),
            "Something went wrong"
        );
        assert_eq!(
            ServiceError::OutOfStock("Milk".into()).response_message(),
            "Not enough stock of Milk"
        );
    }

    #[tokio::test]
    async fn error_response_body_renders_fail_envelope() {
        let response = ServiceError::InvalidStore.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.status, "FAIL");
        assert_eq!(payload.error, "INVALID_STORE");
        assert_eq!(payload.message, "This store does not exist");
    }
}
