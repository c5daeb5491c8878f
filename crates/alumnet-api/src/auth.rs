//! HTTP Basic-auth for admin callers.
//!
//! Admin credentials mark a caller as trusted: they unlock the admin routes
//! and let `/profile` and `/session` honour status overrides and privileged
//! role claims.

use alumnet_core::{identity::Caller, store::ProfileStore};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{ApiState, error::ApiError};

/// Credentials accepted as the admin for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Verify admin credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  if username != config.username {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

/// Classify a request: no `Authorization` header is anonymous, valid admin
/// credentials are trusted, anything else is rejected.
pub fn caller_from_headers(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<Caller, ApiError> {
  if !headers.contains_key(header::AUTHORIZATION) {
    return Ok(Caller::Anonymous);
  }
  verify_auth(headers, config)?;
  Ok(Caller::Trusted)
}

/// Extractor: present in a handler means the request carried valid admin
/// credentials.
pub struct Admin;

impl<S> FromRequestParts<ApiState<S>> for Admin
where
  S: ProfileStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)?;
    Ok(Admin)
  }
}

/// Extractor yielding the [`Caller`] trust level of the request.
pub struct CallerTrust(pub Caller);

impl<S> FromRequestParts<ApiState<S>> for CallerTrust
where
  S: ProfileStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    caller_from_headers(&parts.headers, &state.auth).map(CallerTrust)
  }
}
