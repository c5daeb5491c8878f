//! Handlers for `/admin` endpoints. All require admin credentials.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/admin/profiles` | Optional `?status=pending\|approved` |
//! | `POST` | `/admin/profiles/{id}/approve` | Idempotent; 404 if not found |

use alumnet_core::{
  profile::{Profile, ProfileStatus},
  store::ProfileStore,
};
use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{ApiState, auth::Admin, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<String>,
}

/// `GET /admin/profiles[?status=<status>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  _admin: Admin,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: ProfileStore + 'static,
{
  let status = params
    .status
    .as_deref()
    .map(|raw| {
      ProfileStatus::parse(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid status: {raw:?}")))
    })
    .transpose()?;

  Ok(Json(state.resolver.list(status).await?))
}

/// `POST /admin/profiles/{id}/approve`
pub async fn approve<S>(
  State(state): State<ApiState<S>>,
  _admin: Admin,
  Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore + 'static,
{
  Ok(Json(state.resolver.approve(&id).await?))
}
