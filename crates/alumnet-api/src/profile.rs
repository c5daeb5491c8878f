//! Handlers for `/profile` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/profile` | Body: `{"userId","email","role"?,"status"?,"name"?}`; 201 created, 200 otherwise |
//! | `GET`  | `/profile/{id}` | Admin only; 404 if not found |
//! | `GET`  | `/profile/{id}/display` | Public display fields; degrades on store failure |

use alumnet_core::{
  identity::Identity,
  profile::{DisplayProfile, Profile, ProfileStatus},
  resolver::{Outcome, ResolveRequest},
  role::Role,
  store::ProfileStore,
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
  ApiState,
  auth::{Admin, CallerTrust},
  error::ApiError,
};

// ─── Resolve ──────────────────────────────────────────────────────────────────

/// Identity fields posted by a view after sign-in or sign-up.
///
/// Every field is optional at the serde level so that missing values surface
/// as a `400 { error }` from identity validation rather than a bare
/// deserialisation rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveBody {
  pub user_id: Option<String>,
  pub email:   Option<String>,
  /// Role hint; unrecognised values (including non-strings) are ignored.
  pub role:    Option<Value>,
  /// Initial status; honoured for admin callers only.
  pub status:  Option<String>,
  /// Full name from provider metadata.
  pub name:    Option<String>,
}

impl ResolveBody {
  /// Parse the body into a resolve request for `caller`.
  pub fn into_request(
    self,
    caller: alumnet_core::identity::Caller,
  ) -> Result<ResolveRequest, ApiError> {
    let status = self
      .status
      .as_deref()
      .map(|raw| {
        ProfileStatus::parse(raw)
          .ok_or_else(|| ApiError::BadRequest(format!("invalid status: {raw:?}")))
      })
      .transpose()?;

    let identity = Identity::new(self.user_id.unwrap_or_default(), self.email.unwrap_or_default())
      .with_role_hint(self.role.as_ref().and_then(Value::as_str))
      .with_full_name(self.name);

    Ok(
      ResolveRequest::new(identity)
        .with_caller(caller)
        .with_status_override(status),
    )
  }
}

/// Unwrap a JSON body, turning extractor rejections into `400 { error }`.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  body
    .map(|Json(b)| b)
    .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// `POST /profile`
pub async fn resolve<S>(
  State(state): State<ApiState<S>>,
  CallerTrust(caller): CallerTrust,
  body: Result<Json<ResolveBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProfileStore + 'static,
{
  let request = json_body(body)?.into_request(caller)?;
  let resolution = state.resolver.resolve(request).await?;

  let status = match resolution.outcome {
    Outcome::Created => StatusCode::CREATED,
    Outcome::Updated | Outcome::Unchanged => StatusCode::OK,
  };
  Ok((status, Json(resolution.profile)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /profile/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  _admin: Admin,
  Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + 'static,
{
  let profile = state
    .resolver
    .get(&id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))?;
  Ok(Json(profile))
}

// ─── Display ──────────────────────────────────────────────────────────────────

/// The fields an unauthenticated viewer may see.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayFields<'a> {
  id:           &'a str,
  display_name: &'a str,
  role:         Role,
  status:       ProfileStatus,
}

impl<'a> From<&'a DisplayProfile> for DisplayFields<'a> {
  fn from(shown: &'a DisplayProfile) -> Self {
    match shown {
      DisplayProfile::Live(p) => Self {
        id:           &p.id,
        display_name: &p.display_name,
        role:         p.role,
        status:       p.status,
      },
      DisplayProfile::Degraded(p) => Self {
        id:           &p.id,
        display_name: &p.display_name,
        role:         p.role,
        status:       p.status,
      },
    }
  }
}

/// `GET /profile/{id}/display`
pub async fn display<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProfileStore + 'static,
{
  let shown = state
    .resolver
    .display(&id)
    .await
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))?;

  Ok(Json(json!({
    "profile": DisplayFields::from(&shown),
    "degraded": shown.is_degraded(),
  })))
}
