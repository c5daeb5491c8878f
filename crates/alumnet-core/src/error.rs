//! Error types for `alumnet-core`.

use thiserror::Error;

/// Failure modes of profile resolution.
///
/// A refused role claim is not an error: the resolver settles it by policy and
/// only logs it.
#[derive(Debug, Error)]
pub enum Error {
  /// The identity is missing a required field. Never retried.
  #[error("invalid identity: {0}")]
  InvalidIdentity(String),

  #[error("profile not found: {0}")]
  ProfileNotFound(String),

  /// The profile store could not be reached or the query failed.
  #[error("profile store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
