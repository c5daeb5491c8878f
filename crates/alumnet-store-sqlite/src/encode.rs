//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Roles and statuses are stored
//! as their canonical SCREAMING labels.

use alumnet_core::{
  profile::{Profile, ProfileStatus, StoredProfile},
  role::Role,
};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str { role.as_str() }

/// Decode a stored role label, reporting whether it was a legacy spelling.
pub fn decode_role(s: &str) -> Result<(Role, bool)> {
  let role = Role::normalize(s).ok_or_else(|| Error::UnknownRole(s.to_owned()))?;
  Ok((role, Role::is_legacy_label(s)))
}

// ─── ProfileStatus ───────────────────────────────────────────────────────────

pub fn encode_status(status: ProfileStatus) -> &'static str { status.as_str() }

pub fn decode_status(s: &str) -> Result<ProfileStatus> {
  match s {
    "PENDING" => Ok(ProfileStatus::Pending),
    "APPROVED" => Ok(ProfileStatus::Approved),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected for a profile, in this order.
pub const PROFILE_COLUMNS: &str =
  "id, name, email, role, status, created_at, updated_at";

/// A `profiles` row as read straight from SQLite.
pub struct RawProfile {
  pub id:         String,
  pub name:       String,
  pub email:      String,
  pub role:       String,
  pub status:     String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawProfile {
  /// Row mapper for queries selecting [`PROFILE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      role:       row.get(3)?,
      status:     row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_stored(self) -> Result<StoredProfile> {
    let (role, legacy_role) = decode_role(&self.role)?;
    Ok(StoredProfile {
      profile: Profile {
        id: self.id,
        display_name: self.name,
        email: self.email,
        role,
        status: decode_status(&self.status)?,
        created_at: decode_dt(&self.created_at)?,
        updated_at: decode_dt(&self.updated_at)?,
      },
      legacy_role,
    })
  }

  pub fn into_profile(self) -> Result<Profile> { Ok(self.into_stored()?.profile) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn legacy_role_decodes_with_flag() {
    assert_eq!(decode_role("ALUMNI").unwrap(), (Role::Alumnus, true));
    assert_eq!(decode_role("ALUMNUS").unwrap(), (Role::Alumnus, false));
    assert!(matches!(decode_role("DEAN"), Err(Error::UnknownRole(_))));
  }

  #[test]
  fn status_decoding_is_strict() {
    assert_eq!(decode_status("PENDING").unwrap(), ProfileStatus::Pending);
    assert!(decode_status("pending").is_err());
  }

  #[test]
  fn timestamps_roundtrip_through_rfc3339() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }
}
