//! Handler for `POST /session` — the sign-in reconciliation.
//!
//! Resolves the identity, then applies the redirect policy. A pending
//! non-student gets `403 { error, reason }` and should have its session ended
//! by the view; store failures ask the client to retry later.

use alumnet_core::{
  profile::Profile,
  redirect::{Decision, Destination, decide},
  resolver::Outcome,
  store::ProfileStore,
};
use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::Serialize;

use crate::{
  ApiState,
  auth::CallerTrust,
  error::ApiError,
  profile::{ResolveBody, json_body},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
  pub profile:     Profile,
  pub outcome:     Outcome,
  pub destination: Destination,
  /// Application path for `destination`.
  pub redirect_to: &'static str,
}

/// `POST /session` — body as for `POST /profile`.
pub async fn sign_in<S>(
  State(state): State<ApiState<S>>,
  CallerTrust(caller): CallerTrust,
  body: Result<Json<ResolveBody>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError>
where
  S: ProfileStore + 'static,
{
  let request = json_body(body)?.into_request(caller)?;
  let resolution = state
    .resolver
    .resolve(request)
    .await
    .map_err(ApiError::retry_later)?;

  match decide(&resolution.profile) {
    Decision::Allowed(destination) => Ok(Json(SessionResponse {
      redirect_to: destination.path(),
      destination,
      outcome: resolution.outcome,
      profile: resolution.profile,
    })),
    Decision::Blocked(reason) => {
      tracing::info!(
        user_id = %resolution.profile.id,
        role = %resolution.profile.role,
        ?reason,
        "sign-in blocked"
      );
      Err(ApiError::Blocked(reason))
    }
  }
}
