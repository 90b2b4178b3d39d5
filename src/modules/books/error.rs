use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookshelf_db::StoreError;
use bookshelf_http::AppError;
use serde_json::json;
use thiserror::Error;

/// Failures of the book operations.
///
/// The response mapping is part of the public contract: missing fields and
/// absent books answer 200 with a plain JSON string, only malformed ids get a
/// 404.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("ID not found")]
    InvalidId,

    #[error("no book exists")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl IntoResponse for BookError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            BookError::MissingField(_) | BookError::NotFound => {
                tracing::debug!(outcome = %message, "book request rejected");
                (StatusCode::OK, Json(message)).into_response()
            }
            BookError::InvalidId => {
                tracing::debug!(outcome = %message, "book id rejected");
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            BookError::Storage(err) => {
                AppError::Internal(anyhow::Error::new(err).context("book store request failed"))
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_field_is_a_200_string() {
        let response = BookError::MissingField("title").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!("missing required field title"));
    }

    #[tokio::test]
    async fn absent_book_is_a_200_string() {
        let response = BookError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!("no book exists"));
    }

    #[tokio::test]
    async fn malformed_id_is_a_404_message() {
        let response = BookError::InvalidId.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "message": "ID not found" }));
    }

    #[tokio::test]
    async fn storage_failure_is_a_500_envelope() {
        let response =
            BookError::Storage(StoreError::Unavailable("connection reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "internal_error");
    }
}
