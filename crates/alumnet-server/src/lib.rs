//! Alumnet server assembly: configuration, state construction, and the
//! top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use alumnet_api::{ApiState, AuthConfig};
use alumnet_core::{policy::RolePolicy, resolver::Resolver, store::ProfileStore};
use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered under
/// `ALUMNET_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                     String,
  #[serde(default = "default_port")]
  pub port:                     u16,
  pub store_path:               PathBuf,
  pub admin_username:           String,
  pub admin_password_hash:      String,
  /// Honour every role claim, including `ADMIN` claims and admin demotions.
  #[serde(default)]
  pub unrestricted_role_claims: bool,
  /// Custom allow-list; the built-in default applies when absent.
  #[serde(default)]
  pub role_policy:              Option<RolePolicy>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

impl ServerConfig {
  /// The role-claim policy this server runs with.
  pub fn role_policy(&self) -> RolePolicy {
    if self.unrestricted_role_claims {
      return RolePolicy::unrestricted();
    }
    self.role_policy.clone().unwrap_or_default()
  }

  /// `store_path` with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── State & router ───────────────────────────────────────────────────────────

/// Wire `store` into the API state described by `config`.
pub fn api_state<S: ProfileStore>(store: S, config: &ServerConfig) -> ApiState<S> {
  ApiState {
    resolver: Resolver::new(Arc::new(store), config.role_policy()),
    auth:     Arc::new(AuthConfig {
      username:      config.admin_username.clone(),
      password_hash: config.admin_password_hash.clone(),
    }),
  }
}

/// Build the top-level router: the JSON API under `/api` plus a liveness
/// probe, with request tracing.
pub fn router<S>(state: ApiState<S>) -> Router
where
  S: ProfileStore + 'static,
{
  Router::new()
    .route("/healthz", get(|| async { "ok" }))
    .nest("/api", alumnet_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}
