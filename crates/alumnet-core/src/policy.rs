//! Which role claims an untrusted caller may make.
//!
//! Role hints come from client-controlled metadata. Honouring them blindly
//! would let anyone ask for `ADMIN`, or let a stale hint demote an admin. The
//! [`RolePolicy`] is an explicit allow-list consulted by the resolver; trusted
//! callers bypass it.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{identity::Caller, role::Role};

/// A permitted change of an existing profile's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTransition {
  pub from: Role,
  pub to:   Role,
}

impl RoleTransition {
  pub fn new(from: Role, to: Role) -> Self { Self { from, to } }
}

/// Allow-list applied to [`Caller::Anonymous`] role claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePolicy {
  /// Roles that may be claimed when a profile is first created.
  pub claimable:   Vec<Role>,
  /// Role changes that may be requested on an existing profile.
  pub transitions: Vec<RoleTransition>,
}

const SELF_SERVICE: [Role; 3] = [Role::Student, Role::Alumnus, Role::Recruiter];

impl Default for RolePolicy {
  /// Self-service among student, alumnus and recruiter; nothing into or out
  /// of admin.
  fn default() -> Self {
    Self {
      claimable:   SELF_SERVICE.to_vec(),
      transitions: all_transitions(&SELF_SERVICE),
    }
  }
}

impl RolePolicy {
  /// Honour every claim from every caller, including `ADMIN` claims and
  /// demotions of existing admins. Only for deployments that gate role hints
  /// before they reach this service.
  pub fn unrestricted() -> Self {
    let roles: Vec<Role> = Role::iter().collect();
    Self {
      transitions: all_transitions(&roles),
      claimable:   roles,
    }
  }

  pub fn may_claim(&self, caller: Caller, role: Role) -> bool {
    caller.is_trusted() || self.claimable.contains(&role)
  }

  pub fn may_transition(&self, caller: Caller, from: Role, to: Role) -> bool {
    from == to
      || caller.is_trusted()
      || self.transitions.contains(&RoleTransition::new(from, to))
  }
}

fn all_transitions(roles: &[Role]) -> Vec<RoleTransition> {
  let mut out = Vec::with_capacity(roles.len() * roles.len());
  for &from in roles {
    for &to in roles {
      if from != to {
        out.push(RoleTransition::new(from, to));
      }
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_policy_blocks_admin_claims() {
    let policy = RolePolicy::default();
    assert!(!policy.may_claim(Caller::Anonymous, Role::Admin));
    assert!(policy.may_claim(Caller::Anonymous, Role::Student));
    assert!(policy.may_claim(Caller::Trusted, Role::Admin));
  }

  #[test]
  fn default_policy_protects_existing_admins() {
    let policy = RolePolicy::default();
    assert!(!policy.may_transition(Caller::Anonymous, Role::Admin, Role::Student));
    assert!(!policy.may_transition(Caller::Anonymous, Role::Alumnus, Role::Admin));
    assert!(policy.may_transition(Caller::Anonymous, Role::Alumnus, Role::Student));
    assert!(policy.may_transition(Caller::Trusted, Role::Admin, Role::Student));
  }

  #[test]
  fn unrestricted_policy_allows_everything() {
    let policy = RolePolicy::unrestricted();
    for from in Role::iter() {
      assert!(policy.may_claim(Caller::Anonymous, from));
      for to in Role::iter() {
        assert!(policy.may_transition(Caller::Anonymous, from, to));
      }
    }
  }

  #[test]
  fn default_transition_count() {
    assert_eq!(RolePolicy::default().transitions.len(), 6);
    assert_eq!(RolePolicy::unrestricted().transitions.len(), 12);
  }
}
