//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized: {0}")]
  Unauthorized(&'static str),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("password hashing failed: {0}")]
  Hash(String),
  #[error("token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_owned()),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
      e @ (Error::Hash(_) | Error::Token(_) | Error::Store(_)) => {
        tracing::error!(error = %e, "auth request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
