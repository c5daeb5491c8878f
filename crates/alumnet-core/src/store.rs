//! The `ProfileStore` trait.
//!
//! Implemented by storage backends (e.g. `alumnet-store-sqlite`). The resolver
//! and the HTTP layer depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{
  profile::{NewProfile, Profile, ProfileStatus, StoredProfile},
  role::Role,
};

/// Abstraction over the single `profiles` table.
///
/// Each method touches at most one row. There is no optimistic concurrency:
/// the last write observed wins.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up a profile by user id. Returns `None` if no row exists.
  fn get_profile<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<StoredProfile>, Self::Error>> + Send + 'a;

  /// Insert a new profile; `created_at`/`updated_at` are set by the store.
  ///
  /// Returns `None` when a row with the same id already exists. A concurrent
  /// first resolution for the same identity lands here and must not be
  /// reported as an error.
  fn insert_profile(
    &self,
    profile: NewProfile,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Overwrite the role of an existing profile with its canonical label.
  /// Returns `None` if the row does not exist.
  fn update_role<'a>(
    &'a self,
    id: &'a str,
    role: Role,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// Mark a profile approved. Idempotent. Returns `None` if the row does not
  /// exist. There is no way to move a profile back to pending.
  fn approve<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// List profiles in creation order, optionally filtered by status.
  fn list_profiles(
    &self,
    status: Option<ProfileStatus>,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;
}
