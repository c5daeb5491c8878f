//! API error type and [`axum::response::IntoResponse`] implementation.

use alumnet_core::redirect::BlockReason;
use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Every variant renders as
/// `{ "error": message }`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  /// The profile resolved but may not proceed.
  #[error("blocked: {}", .0.message())]
  Blocked(BlockReason),

  /// Store failure on a path where the client should retry later.
  #[error("unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Like the `From` conversion, but store failures become
  /// [`ApiError::Unavailable`].
  pub fn retry_later(err: alumnet_core::Error) -> Self {
    match err {
      alumnet_core::Error::StoreUnavailable(e) => ApiError::Unavailable(e),
      other => other.into(),
    }
  }
}

impl From<alumnet_core::Error> for ApiError {
  fn from(err: alumnet_core::Error) -> Self {
    match err {
      alumnet_core::Error::InvalidIdentity(m) => ApiError::BadRequest(m),
      alumnet_core::Error::ProfileNotFound(id) => {
        ApiError::NotFound(format!("profile {id} not found"))
      }
      alumnet_core::Error::StoreUnavailable(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })))
            .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"alumnet\""),
        );
        return res;
      }
      ApiError::Blocked(reason) => (
        StatusCode::FORBIDDEN,
        json!({ "error": reason.message(), "reason": reason }),
      ),
      // Infrastructure details stay in the logs.
      ApiError::Unavailable(e) => {
        tracing::error!(error = %e, "profile store unavailable");
        (
          StatusCode::SERVICE_UNAVAILABLE,
          json!({ "error": "service temporarily unavailable, try again later" }),
        )
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "profile store error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": "profile store error" }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
