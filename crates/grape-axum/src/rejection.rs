//! # Rejections
//!
//! Structured rejection for [`Bound`](crate::Bound). Bind errors map to
//! 422 Unprocessable Entity with a JSON body carrying the error code, the
//! message and the offending field. Malformed JSON is a 422 too: the HTTP
//! framing was fine, the content was not.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use grape_params::BindError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `MISSING_REQUIRED_FIELD`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Top-level field the error is attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Why [`Bound`](crate::Bound) rejected a request.
#[derive(Error, Debug)]
pub enum BindRejection {
    /// The body could not be read.
    #[error(transparent)]
    Body(#[from] BytesRejection),

    /// The body was read but did not bind.
    #[error(transparent)]
    Bind(#[from] BindError),
}

impl BindRejection {
    /// HTTP status the rejection renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body(rejection) => rejection.status(),
            Self::Bind(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for BindRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Body(rejection) => {
                tracing::debug!(status = %rejection.status(), error = %rejection, "request body unreadable");
                rejection.into_response()
            }
            Self::Bind(err) => {
                tracing::debug!(code = err.code(), error = %err, "request parameters rejected");
                let body = ErrorBody {
                    error: ErrorDetail {
                        code: err.code().to_string(),
                        message: err.to_string(),
                        field: err.field().map(str::to_owned),
                    },
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_field_renders_422() {
        let rejection = BindRejection::from(BindError::MissingRequired {
            field: "name".into(),
            mode: "create".into(),
        });
        assert_eq!(rejection.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = rejection.into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
        assert_eq!(
            body["error"]["message"],
            "missing required field 'name' for create"
        );
        assert_eq!(body["error"]["field"], "name");
    }

    #[tokio::test]
    async fn decode_error_has_no_field() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let resp = BindRejection::from(BindError::from(json_err)).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "DECODE_FAILED");
        assert!(body["error"].get("field").is_none());
    }
}
