//! JSON REST API for Alumnet profile resolution.
//!
//! Exposes an axum [`Router`] backed by any [`ProfileStore`]. TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", alumnet_api::api_router(state))
//! ```

pub mod admin;
pub mod auth;
pub mod error;
pub mod profile;
pub mod session;

use std::sync::Arc;

use alumnet_core::{resolver::Resolver, store::ProfileStore};
use axum::{
  Router,
  routing::{get, post},
};

pub use auth::AuthConfig;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub resolver: Resolver<S>,
  pub auth:     Arc<AuthConfig>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { resolver: self.resolver.clone(), auth: Arc::clone(&self.auth) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ProfileStore + 'static,
{
  Router::new()
    // Resolution
    .route("/profile", post(profile::resolve::<S>))
    .route("/profile/{id}", get(profile::get_one::<S>))
    .route("/profile/{id}/display", get(profile::display::<S>))
    .route("/session", post(session::sign_in::<S>))
    // Verification workflow
    .route("/admin/profiles", get(admin::list::<S>))
    .route("/admin/profiles/{id}/approve", post(admin::approve::<S>))
    .with_state(state)
}
