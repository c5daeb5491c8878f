//! Identity — what the identity provider vouches for, and who is asking.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, role::Role};

/// An authenticated identity as issued by the identity provider.
///
/// Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub user_id:      String,
  pub email:        String,
  /// Full name from provider metadata, if any.
  pub full_name:    Option<String>,
  /// Already normalised; unknown hints never reach this field.
  pub claimed_role: Option<Role>,
}

impl Identity {
  pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      user_id:      user_id.into(),
      email:        email.into(),
      full_name:    None,
      claimed_role: None,
    }
  }

  pub fn with_claimed_role(mut self, role: Role) -> Self {
    self.claimed_role = Some(role);
    self
  }

  /// Attach a raw role hint from provider metadata or a form post.
  /// Unrecognised hints are dropped.
  pub fn with_role_hint(mut self, hint: Option<&str>) -> Self {
    self.claimed_role = hint.and_then(Role::normalize);
    self
  }

  pub fn with_full_name(mut self, name: Option<String>) -> Self {
    self.full_name = name;
    self
  }

  /// Reject identities missing a user id or email.
  pub fn validate(&self) -> Result<()> {
    if self.user_id.trim().is_empty() {
      return Err(Error::InvalidIdentity("user id is required".into()));
    }
    if self.email.trim().is_empty() {
      return Err(Error::InvalidIdentity("email is required".into()));
    }
    Ok(())
  }

  /// Name shown for a profile created from this identity: the full name if
  /// one was supplied, otherwise the email local part.
  pub fn display_name(&self) -> String {
    if let Some(name) = self.full_name.as_deref().map(str::trim)
      && !name.is_empty()
    {
      return name.to_owned();
    }
    let email = self.email.trim();
    let local = email.split_once('@').map_or(email, |(local, _)| local);
    if local.is_empty() {
      crate::profile::FallbackProfile::DISPLAY_NAME.to_owned()
    } else {
      local.to_owned()
    }
  }
}

/// How much the caller of a resolution is trusted.
///
/// Only trusted (admin-authenticated) callers may override the initial status
/// or claim roles outside the self-service allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Caller {
  #[default]
  Anonymous,
  Trusted,
}

impl Caller {
  pub fn is_trusted(self) -> bool { matches!(self, Self::Trusted) }
}
