//! Redirect policy — where a resolved profile may go.
//!
//! Pure and total: every role, and every unrecognised role label, maps to
//! exactly one destination. Acting on a [`Decision::Blocked`] (denying the
//! page, ending the session) is the caller's job.

use serde::{Deserialize, Serialize};

use crate::{
  profile::{Profile, ProfileStatus},
  role::Role,
};

/// The area of the application a member lands in after sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
  AdminArea,
  RecruiterArea,
  StudentArea,
  GeneralArea,
}

impl Destination {
  pub fn for_role(role: Role) -> Self {
    match role {
      Role::Admin => Self::AdminArea,
      Role::Recruiter => Self::RecruiterArea,
      Role::Student => Self::StudentArea,
      _ => Self::GeneralArea,
    }
  }

  /// Map a raw role label; anything unrecognised goes to the general area.
  pub fn for_label(raw: &str) -> Self {
    Role::normalize(raw).map_or(Self::GeneralArea, Self::for_role)
  }

  /// Application path for the area.
  pub fn path(self) -> &'static str {
    match self {
      Self::AdminArea => "/admin",
      Self::RecruiterArea => "/recruiter",
      Self::StudentArea => "/student",
      Self::GeneralArea => "/dashboard",
    }
  }
}

/// Why a profile may not proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
  PendingApproval,
}

impl BlockReason {
  /// Message shown to the member.
  pub fn message(self) -> &'static str {
    match self {
      Self::PendingApproval => "your account is pending admin approval",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum Decision {
  Allowed(Destination),
  Blocked(BlockReason),
}

impl Decision {
  pub fn is_allowed(&self) -> bool { matches!(self, Self::Allowed(_)) }
}

/// Decide where `profile` goes. Pending non-students are blocked; students are
/// never gated on approval.
pub fn decide(profile: &Profile) -> Decision {
  if profile.status == ProfileStatus::Pending && profile.role != Role::Student {
    return Decision::Blocked(BlockReason::PendingApproval);
  }
  Decision::Allowed(Destination::for_role(profile.role))
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use strum::IntoEnumIterator;

  use super::*;

  fn profile(role: Role, status: ProfileStatus) -> Profile {
    let now = Utc::now();
    Profile {
      id: "u1".into(),
      display_name: "jane".into(),
      email: "jane@x.com".into(),
      role,
      status,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn approved_roles_map_to_their_area() {
    let cases = [
      (Role::Admin, Destination::AdminArea),
      (Role::Recruiter, Destination::RecruiterArea),
      (Role::Student, Destination::StudentArea),
      (Role::Alumnus, Destination::GeneralArea),
    ];
    for (role, dest) in cases {
      assert_eq!(
        decide(&profile(role, ProfileStatus::Approved)),
        Decision::Allowed(dest)
      );
    }
  }

  #[test]
  fn pending_non_students_are_blocked() {
    for role in Role::iter().filter(|r| *r != Role::Student) {
      assert_eq!(
        decide(&profile(role, ProfileStatus::Pending)),
        Decision::Blocked(BlockReason::PendingApproval),
        "{role}"
      );
    }
  }

  #[test]
  fn pending_students_are_allowed() {
    assert_eq!(
      decide(&profile(Role::Student, ProfileStatus::Pending)),
      Decision::Allowed(Destination::StudentArea)
    );
  }

  #[test]
  fn unknown_labels_fall_back_to_general_area() {
    assert_eq!(Destination::for_label("faculty"), Destination::GeneralArea);
    assert_eq!(Destination::for_label(""), Destination::GeneralArea);
    assert_eq!(Destination::for_label("alumni"), Destination::GeneralArea);
    assert_eq!(Destination::for_label("recruiter"), Destination::RecruiterArea);
  }

  #[test]
  fn every_destination_has_a_path() {
    for role in Role::iter() {
      assert!(Destination::for_role(role).path().starts_with('/'));
    }
  }
}
