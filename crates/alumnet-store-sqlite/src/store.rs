//! [`SqliteStore`] — the SQLite implementation of [`ProfileStore`].

use std::path::Path;

use alumnet_core::{
  profile::{NewProfile, Profile, ProfileStatus, StoredProfile},
  role::Role,
  store::ProfileStore,
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{PROFILE_COLUMNS, RawProfile, encode_dt, encode_role, encode_status},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Alumnet profile store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the connection; lets tests plant rows this store
  /// would never write itself.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one row by id inside a connection call.
  fn select_one(
    conn: &rusqlite::Connection,
    id: &str,
  ) -> rusqlite::Result<Option<RawProfile>> {
    conn
      .query_row(
        &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
        rusqlite::params![id],
        RawProfile::from_row,
      )
      .optional()
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = crate::Error;

  async fn get_profile(&self, id: &str) -> Result<Option<StoredProfile>> {
    let id = id.to_owned();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| Ok(Self::select_one(conn, &id)?))
      .await?;

    raw.map(RawProfile::into_stored).transpose()
  }

  async fn insert_profile(&self, new: NewProfile) -> Result<Option<Profile>> {
    let now = Utc::now();
    let profile = Profile {
      id:           new.id,
      display_name: new.display_name,
      email:        new.email,
      role:         new.role,
      status:       new.status,
      created_at:   now,
      updated_at:   now,
    };

    let id_str     = profile.id.clone();
    let name       = profile.display_name.clone();
    let email      = profile.email.clone();
    let role_str   = encode_role(profile.role);
    let status_str = encode_status(profile.status);
    let at_str     = encode_dt(now);

    // The primary key is the only guard against two first resolutions racing;
    // the loser sees zero inserted rows.
    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT INTO profiles (id, name, email, role, status, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
           ON CONFLICT (id) DO NOTHING",
          rusqlite::params![id_str, name, email, role_str, status_str, at_str],
        )?;
        Ok(n)
      })
      .await?;

    if inserted == 0 {
      tracing::debug!(user_id = %profile.id, "insert skipped; profile already exists");
      return Ok(None);
    }
    Ok(Some(profile))
  }

  async fn update_role(&self, id: &str, role: Role) -> Result<Option<Profile>> {
    let id       = id.to_owned();
    let role_str = encode_role(role);
    let at_str   = encode_dt(Utc::now());

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE profiles SET role = ?2, updated_at = ?3 WHERE id = ?1",
          rusqlite::params![id, role_str, at_str],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(Self::select_one(conn, &id)?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn approve(&self, id: &str) -> Result<Option<Profile>> {
    let id     = id.to_owned();
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE profiles SET status = 'APPROVED', updated_at = ?2
           WHERE id = ?1 AND status = 'PENDING'",
          rusqlite::params![id, at_str],
        )?;
        Ok(Self::select_one(conn, &id)?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self, status: Option<ProfileStatus>) -> Result<Vec<Profile>> {
    let status_str = status.map(encode_status);

    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE status = ?1
             ORDER BY created_at, rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![s], RawProfile::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at, rowid"
          ))?;
          stmt
            .query_map([], RawProfile::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }
}
