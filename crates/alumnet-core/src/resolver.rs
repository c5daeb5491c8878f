//! The profile resolver.
//!
//! Turns an authenticated [`Identity`] into the canonical [`Profile`] for it,
//! creating the row on first sight and reconciling a claimed role against
//! the stored one. Every call touches at most one row with at most one write.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  identity::{Caller, Identity},
  policy::RolePolicy,
  profile::{
    DisplayProfile, FallbackProfile, NewProfile, Profile, ProfileStatus, StoredProfile,
  },
  role::Role,
  store::ProfileStore,
};

/// What a resolution did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
  Created,
  Updated,
  Unchanged,
}

/// Input to [`Resolver::resolve`].
#[derive(Debug, Clone)]
pub struct ResolveRequest {
  pub identity:        Identity,
  pub caller:          Caller,
  /// Initial status for a newly created profile. Honoured for trusted
  /// callers only.
  pub status_override: Option<ProfileStatus>,
}

impl ResolveRequest {
  pub fn new(identity: Identity) -> Self {
    Self { identity, caller: Caller::Anonymous, status_override: None }
  }

  pub fn with_caller(mut self, caller: Caller) -> Self {
    self.caller = caller;
    self
  }

  pub fn with_status_override(mut self, status: Option<ProfileStatus>) -> Self {
    self.status_override = status;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
  pub profile: Profile,
  pub outcome: Outcome,
}

/// Resolves identities against an injected [`ProfileStore`].
///
/// Constructed once at startup and shared; cloning is cheap.
pub struct Resolver<S> {
  store:  Arc<S>,
  policy: RolePolicy,
}

impl<S> Clone for Resolver<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), policy: self.policy.clone() }
  }
}

impl<S: ProfileStore> Resolver<S> {
  pub fn new(store: Arc<S>, policy: RolePolicy) -> Self { Self { store, policy } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn policy(&self) -> &RolePolicy { &self.policy }

  /// Produce the canonical profile for `request.identity`.
  ///
  /// - No row: create one and report [`Outcome::Created`].
  /// - Row exists and the claimed role differs (and the policy permits the
  ///   change), or the row carries a legacy role label: rewrite the role and
  ///   report [`Outcome::Updated`].
  /// - Otherwise report [`Outcome::Unchanged`].
  ///
  /// Losing an insert race to a concurrent first resolution is not an error:
  /// the winner's row is re-read and reconciled.
  pub async fn resolve(&self, request: ResolveRequest) -> Result<Resolution> {
    request.identity.validate()?;
    let ResolveRequest { identity, caller, status_override } = request;
    let user_id = identity.user_id.trim();

    debug!(user_id, claimed = ?identity.claimed_role, ?caller, "resolving profile");

    let stored = match self.store.get_profile(user_id).await.map_err(Error::store)? {
      Some(stored) => stored,
      None => {
        let new = self.new_profile(user_id, &identity, caller, status_override);
        match self.store.insert_profile(new).await.map_err(Error::store)? {
          Some(profile) => {
            info!(
              user_id,
              role = %profile.role,
              status = profile.status.as_str(),
              "created profile"
            );
            return Ok(Resolution { profile, outcome: Outcome::Created });
          }
          None => {
            debug!(user_id, "profile created concurrently; re-reading");
            self
              .store
              .get_profile(user_id)
              .await
              .map_err(Error::store)?
              .ok_or_else(|| vanished(user_id))?
          }
        }
      }
    };

    self.reconcile(stored, identity.claimed_role, caller).await
  }

  fn new_profile(
    &self,
    user_id: &str,
    identity: &Identity,
    caller: Caller,
    status_override: Option<ProfileStatus>,
  ) -> NewProfile {
    let role = match identity.claimed_role {
      Some(role) if self.policy.may_claim(caller, role) => role,
      Some(role) => {
        warn!(user_id, claimed = %role, "role claim refused at creation; using default");
        Role::default()
      }
      None => Role::default(),
    };

    let status = match status_override {
      Some(status) if caller.is_trusted() && role.requires_approval() => status,
      Some(status) if caller.is_trusted() => {
        warn!(user_id, status = status.as_str(), role = %role, "role is always approved; ignoring status override");
        ProfileStatus::initial_for(role)
      }
      Some(status) => {
        warn!(user_id, status = status.as_str(), "ignoring status override from untrusted caller");
        ProfileStatus::initial_for(role)
      }
      None => ProfileStatus::initial_for(role),
    };

    NewProfile {
      id: user_id.to_owned(),
      display_name: identity.display_name(),
      email: identity.email.trim().to_owned(),
      role,
      status,
    }
  }

  async fn reconcile(
    &self,
    stored: StoredProfile,
    claimed: Option<Role>,
    caller: Caller,
  ) -> Result<Resolution> {
    let StoredProfile { profile, legacy_role } = stored;

    let upgrade = match claimed {
      Some(role) if role != profile.role => {
        if bypasses_approval(&profile, role, caller) {
          warn!(
            user_id = %profile.id,
            stored = %profile.role,
            claimed = %role,
            "role change would skip approval; keeping stored role"
          );
          None
        } else if self.policy.may_transition(caller, profile.role, role) {
          Some(role)
        } else {
          warn!(
            user_id = %profile.id,
            stored = %profile.role,
            claimed = %role,
            "role change refused by policy; keeping stored role"
          );
          None
        }
      }
      _ => None,
    };

    let Some(role) = upgrade.or(legacy_role.then_some(profile.role)) else {
      return Ok(Resolution { profile, outcome: Outcome::Unchanged });
    };

    let updated = self
      .store
      .update_role(&profile.id, role)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| vanished(&profile.id))?;

    info!(user_id = %updated.id, from = %profile.role, to = %updated.role, "updated profile role");
    Ok(Resolution { profile: updated, outcome: Outcome::Updated })
  }

  /// Fetch a profile without resolving.
  pub async fn get(&self, user_id: &str) -> Result<Option<Profile>> {
    let stored = self.store.get_profile(user_id).await.map_err(Error::store)?;
    Ok(stored.map(|s| s.profile))
  }

  /// Read a profile for display purposes only.
  ///
  /// A store failure degrades to a [`FallbackProfile`] instead of an error.
  /// Returns `None` if the profile does not exist.
  pub async fn display(&self, user_id: &str) -> Option<DisplayProfile> {
    match self.store.get_profile(user_id).await {
      Ok(stored) => stored.map(|s| DisplayProfile::Live(s.profile)),
      Err(err) => {
        tracing::error!(user_id, error = %err, "profile store failed; showing fallback profile");
        Some(DisplayProfile::Degraded(FallbackProfile::for_user(user_id)))
      }
    }
  }

  /// Admin approval: `Pending → Approved`. Idempotent for approved profiles.
  pub async fn approve(&self, user_id: &str) -> Result<Profile> {
    let profile = self
      .store
      .approve(user_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::ProfileNotFound(user_id.to_owned()))?;
    info!(user_id, role = %profile.role, "approved profile");
    Ok(profile)
  }

  pub async fn list(&self, status: Option<ProfileStatus>) -> Result<Vec<Profile>> {
    self.store.list_profiles(status).await.map_err(Error::store)
  }
}

/// An approved profile moving into a role that needs approval would carry its
/// old approval over. Only trusted callers may do that.
fn bypasses_approval(profile: &Profile, to: Role, caller: Caller) -> bool {
  !caller.is_trusted() && profile.status == ProfileStatus::Approved && to.requires_approval()
}

fn vanished(user_id: &str) -> Error {
  Error::StoreUnavailable(format!("profile {user_id} disappeared during resolution").into())
}
