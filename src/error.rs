// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;
use crate::services::openai::UpstreamError;

pub const MISSING_API_KEY_DETAIL: &str = "OPENAI_API_KEY is not set";
pub const UPSTREAM_FAILURE_DETAIL: &str =
    "回答の生成に失敗しました（サーバー設定を確認してください）";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{detail}")]
    Validation { status: StatusCode, detail: String },

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("upstream call failed: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Renders an error followed by every `source()` beneath it, skipping
/// sources whose text the outer message already includes.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Upstream details stay in the server log.
        let (status, detail) = match self {
            AppError::Validation { status, detail } => (status, detail),
            AppError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                MISSING_API_KEY_DETAIL.to_string(),
            ),
            AppError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                UPSTREAM_FAILURE_DETAIL.to_string(),
            ),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_maps_to_bad_gateway() {
        let err = AppError::Upstream(UpstreamError::NoChoices);
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct Refused;

    #[derive(Debug, Error)]
    #[error("tcp connect error")]
    struct Connect(#[source] Refused);

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct SendRequest(#[source] Connect);

    #[test]
    fn error_chain_includes_every_source() {
        let err = SendRequest(Connect(Refused));
        assert_eq!(err.to_string(), "error sending request");
        assert_eq!(
            error_chain(&err),
            "error sending request: tcp connect error: connection refused"
        );
    }

    #[test]
    fn error_chain_skips_repeated_text() {
        // The wrapping variant already prints its inner error.
        let err = AppError::Upstream(UpstreamError::NoChoices);
        assert_eq!(
            error_chain(&err),
            "upstream call failed: upstream response contained no choices"
        );
    }

    #[test]
    fn missing_key_maps_to_internal_error() {
        let response = AppError::MissingApiKey.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
