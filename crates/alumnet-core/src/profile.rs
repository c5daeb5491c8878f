//! Profile — one row per authenticated member.
//!
//! The profile holds what the application knows about an identity beyond what
//! the identity provider tells it: the canonical role and whether an admin has
//! approved the account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Approval state of an account. The only transition is `Pending → Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileStatus {
  Pending,
  Approved,
}

impl ProfileStatus {
  /// The status a freshly created profile gets for `role`.
  pub fn initial_for(role: Role) -> Self {
    if role.requires_approval() {
      Self::Pending
    } else {
      Self::Approved
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "PENDING",
      Self::Approved => "APPROVED",
    }
  }

  /// Parse a status label, ignoring surrounding whitespace and ASCII case.
  pub fn parse(raw: &str) -> Option<Self> {
    match raw.trim().to_ascii_uppercase().as_str() {
      "PENDING" => Some(Self::Pending),
      "APPROVED" => Some(Self::Approved),
      _ => None,
    }
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// A persisted member profile. `role` is always canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  /// Equal to the identity provider's user id; never changes.
  pub id:           String,
  pub display_name: String,
  pub email:        String,
  pub role:         Role,
  pub status:       ProfileStatus,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Profile {
  pub fn is_approved(&self) -> bool { self.status == ProfileStatus::Approved }
}

/// Input for [`ProfileStore::insert_profile`](crate::store::ProfileStore::insert_profile).
/// Timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
  pub id:           String,
  pub display_name: String,
  pub email:        String,
  pub role:         Role,
  pub status:       ProfileStatus,
}

/// A profile as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProfile {
  pub profile:     Profile,
  /// The row carries a non-canonical role label (e.g. `ALUMNI`). The
  /// `profile.role` field is already normalised.
  pub legacy_role: bool,
}

impl StoredProfile {
  pub fn canonical(profile: Profile) -> Self { Self { profile, legacy_role: false } }
}

// ─── Degraded display ────────────────────────────────────────────────────────

/// Placeholder shown when the store cannot be read.
///
/// This is intentionally not a [`Profile`]: it cannot be handed to
/// [`decide`](crate::redirect::decide) and must never gate access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackProfile {
  pub id:           String,
  pub display_name: String,
  pub role:         Role,
  pub status:       ProfileStatus,
}

impl FallbackProfile {
  pub const DISPLAY_NAME: &'static str = "User";

  pub fn for_user(id: impl Into<String>) -> Self {
    Self {
      id:           id.into(),
      display_name: Self::DISPLAY_NAME.to_owned(),
      role:         Role::Alumnus,
      status:       ProfileStatus::Approved,
    }
  }
}

/// Result of a display-only read. See
/// [`Resolver::display`](crate::resolver::Resolver::display).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", content = "profile", rename_all = "snake_case")]
pub enum DisplayProfile {
  Live(Profile),
  Degraded(FallbackProfile),
}

impl DisplayProfile {
  pub fn is_degraded(&self) -> bool { matches!(self, Self::Degraded(_)) }

  pub fn display_name(&self) -> &str {
    match self {
      Self::Live(p) => &p.display_name,
      Self::Degraded(p) => &p.display_name,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn initial_status_follows_role() {
    assert_eq!(ProfileStatus::initial_for(Role::Student), ProfileStatus::Approved);
    assert_eq!(ProfileStatus::initial_for(Role::Admin), ProfileStatus::Approved);
    assert_eq!(ProfileStatus::initial_for(Role::Alumnus), ProfileStatus::Pending);
    assert_eq!(ProfileStatus::initial_for(Role::Recruiter), ProfileStatus::Pending);
  }

  #[test]
  fn status_parse() {
    assert_eq!(ProfileStatus::parse(" pending"), Some(ProfileStatus::Pending));
    assert_eq!(ProfileStatus::parse("APPROVED"), Some(ProfileStatus::Approved));
    assert_eq!(ProfileStatus::parse("rejected"), None);
  }

  #[test]
  fn fallback_is_conservative_display_only() {
    let fallback = FallbackProfile::for_user("u9");
    assert_eq!(fallback.display_name, "User");
    assert_eq!(fallback.role, Role::Alumnus);
    assert_eq!(fallback.status, ProfileStatus::Approved);
    assert!(DisplayProfile::Degraded(fallback).is_degraded());
  }
}
