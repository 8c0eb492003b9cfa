//! Mapping from domain errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pizzeria_core::PizzeriaError;
use serde::Serialize;
use utoipa::ToSchema;

/// Error payload returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error kind: conflict, not_found, invalid_composition, invalid, unavailable
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError(pub PizzeriaError);

impl From<PizzeriaError> for ApiError {
    fn from(err: PizzeriaError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PizzeriaError::Conflict { .. } => StatusCode::CONFLICT,
            PizzeriaError::NotFound(_) => StatusCode::NOT_FOUND,
            PizzeriaError::InvalidComposition(_) => StatusCode::BAD_REQUEST,
            PizzeriaError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PizzeriaError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self.0);
        }

        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_core::models::IngredientKind;
    use pizzeria_core::StoreError;

    #[test]
    fn test_status_mapping() {
        let conflict = ApiError(PizzeriaError::Conflict {
            kind: IngredientKind::Sauce,
            name: "tomato".into(),
        });
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError(PizzeriaError::pizza_not_found("x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(PizzeriaError::coverage()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(PizzeriaError::Unavailable(StoreError::Closed)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
