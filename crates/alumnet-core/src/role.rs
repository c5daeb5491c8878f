//! The canonical role vocabulary.
//!
//! Role labels arrive from several places (identity-provider metadata, form
//! posts, rows written by older tools). All of them pass through
//! [`Role::normalize`] before any comparison or persistence, so the rest of
//! the system only ever sees one spelling per role.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The four portals a member can belong to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
  Student,
  /// Canonical spelling `ALUMNUS`; the legacy label `ALUMNI` is accepted on
  /// input and rewritten.
  #[default]
  #[serde(alias = "ALUMNI")]
  Alumnus,
  Recruiter,
  Admin,
}

impl Role {
  /// The legacy label some rows and clients still carry for [`Role::Alumnus`].
  pub const LEGACY_ALUMNUS: &'static str = "ALUMNI";

  /// The canonical label, as persisted and serialised.
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Student => "STUDENT",
      Role::Alumnus => "ALUMNUS",
      Role::Recruiter => "RECRUITER",
      Role::Admin => "ADMIN",
    }
  }

  /// Map a raw label onto a canonical role.
  ///
  /// Matching ignores surrounding whitespace and ASCII case. Unknown labels
  /// yield `None`; callers treat that as "no role claimed".
  pub fn normalize(raw: &str) -> Option<Role> {
    let label = raw.trim().to_ascii_uppercase();
    match label.as_str() {
      "STUDENT" => Some(Role::Student),
      "ALUMNUS" | Self::LEGACY_ALUMNUS => Some(Role::Alumnus),
      "RECRUITER" => Some(Role::Recruiter),
      "ADMIN" => Some(Role::Admin),
      _ => None,
    }
  }

  /// Whether `raw` names a role but not with its canonical spelling.
  pub fn is_legacy_label(raw: &str) -> bool {
    Role::normalize(raw).is_some_and(|role| role.as_str() != raw)
  }

  /// Students and admins never wait for approval.
  pub fn requires_approval(self) -> bool {
    !matches!(self, Role::Student | Role::Admin)
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn canonical_labels_normalize_to_themselves() {
    for role in Role::iter() {
      assert_eq!(Role::normalize(role.as_str()), Some(role));
      assert!(!Role::is_legacy_label(role.as_str()));
    }
  }

  #[test]
  fn legacy_alumni_maps_to_alumnus() {
    assert_eq!(Role::normalize("ALUMNI"), Some(Role::Alumnus));
    assert_eq!(Role::normalize("alumni"), Some(Role::Alumnus));
    assert!(Role::is_legacy_label("ALUMNI"));
  }

  #[test]
  fn normalization_is_idempotent() {
    for raw in ["ALUMNI", "alumnus", " Student ", "RECRUITER", "admin"] {
      let once = Role::normalize(raw).unwrap();
      let twice = Role::normalize(once.as_str()).unwrap();
      assert_eq!(once, twice, "{raw:?}");
    }
  }

  #[test]
  fn unknown_labels_are_ignored() {
    assert_eq!(Role::normalize(""), None);
    assert_eq!(Role::normalize("faculty"), None);
    assert_eq!(Role::normalize("STUDENTS"), None);
  }

  #[test]
  fn lowercase_canonical_is_a_legacy_spelling() {
    assert!(Role::is_legacy_label("student"));
    assert!(!Role::is_legacy_label("faculty"));
  }

  #[test]
  fn deserialize_accepts_legacy_alias() {
    use serde::de::{IntoDeserializer, value::Error as ValueError};

    let de: serde::de::value::StrDeserializer<'_, ValueError> =
      "ALUMNI".into_deserializer();
    assert_eq!(Role::deserialize(de).unwrap(), Role::Alumnus);
    assert_eq!(Role::Recruiter.to_string(), "RECRUITER");
  }

  #[test]
  fn approval_gating_by_role() {
    assert!(!Role::Student.requires_approval());
    assert!(!Role::Admin.requires_approval());
    assert!(Role::Alumnus.requires_approval());
    assert!(Role::Recruiter.requires_approval());
  }
}
