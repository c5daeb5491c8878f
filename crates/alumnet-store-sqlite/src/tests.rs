//! Integration tests for `SqliteStore`, directly and behind the resolver.

use std::sync::Arc;

use alumnet_core::{
  identity::Identity,
  policy::RolePolicy,
  profile::{NewProfile, ProfileStatus},
  resolver::{Outcome, ResolveRequest, Resolver},
  role::Role,
  store::ProfileStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_profile(id: &str, role: Role) -> NewProfile {
  NewProfile {
    id:           id.into(),
    display_name: "jane".into(),
    email:        "jane@x.com".into(),
    role,
    status:       ProfileStatus::initial_for(role),
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_profile() {
  let s = store().await;

  let inserted = s.insert_profile(new_profile("u1", Role::Student)).await.unwrap();
  let inserted = inserted.expect("row inserted");
  assert_eq!(inserted.role, Role::Student);
  assert_eq!(inserted.status, ProfileStatus::Approved);

  let fetched = s.get_profile("u1").await.unwrap().expect("row present");
  assert!(!fetched.legacy_role);
  assert_eq!(fetched.profile, inserted);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get_profile("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_insert_returns_none() {
  let s = store().await;
  s.insert_profile(new_profile("u1", Role::Student)).await.unwrap();

  let second = s.insert_profile(new_profile("u1", Role::Recruiter)).await.unwrap();
  assert!(second.is_none());

  let fetched = s.get_profile("u1").await.unwrap().unwrap();
  assert_eq!(fetched.profile.role, Role::Student);
}

#[tokio::test]
async fn update_role_rewrites_and_bumps_timestamp() {
  let s = store().await;
  let original = s
    .insert_profile(new_profile("u1", Role::Alumnus))
    .await
    .unwrap()
    .unwrap();

  let updated = s.update_role("u1", Role::Student).await.unwrap().unwrap();
  assert_eq!(updated.role, Role::Student);
  assert_eq!(updated.created_at, original.created_at);
  assert!(updated.updated_at >= original.updated_at);
  // Status is untouched by a role change.
  assert_eq!(updated.status, ProfileStatus::Pending);

  assert!(s.update_role("nobody", Role::Student).await.unwrap().is_none());
}

#[tokio::test]
async fn approve_is_idempotent() {
  let s = store().await;
  s.insert_profile(new_profile("u2", Role::Recruiter)).await.unwrap();

  let first = s.approve("u2").await.unwrap().unwrap();
  assert_eq!(first.status, ProfileStatus::Approved);
  let second = s.approve("u2").await.unwrap().unwrap();
  assert_eq!(second.status, ProfileStatus::Approved);
  assert_eq!(second.updated_at, first.updated_at);

  assert!(s.approve("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn list_profiles_filters_by_status() {
  let s = store().await;
  s.insert_profile(new_profile("a", Role::Student)).await.unwrap();
  s.insert_profile(new_profile("b", Role::Recruiter)).await.unwrap();
  s.insert_profile(new_profile("c", Role::Alumnus)).await.unwrap();

  let all = s.list_profiles(None).await.unwrap();
  let ids: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, ["a", "b", "c"]);

  let pending = s.list_profiles(Some(ProfileStatus::Pending)).await.unwrap();
  assert_eq!(pending.len(), 2);
  assert!(pending.iter().all(|p| p.status == ProfileStatus::Pending));
}

#[tokio::test]
async fn legacy_role_rows_are_flagged() {
  let s = store().await;
  s.execute_raw(
    "INSERT INTO profiles (id, name, email, role, status, created_at, updated_at)
     VALUES ('old', 'old', 'old@x.com', 'ALUMNI', 'APPROVED',
             '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00');",
  )
  .await
  .unwrap();

  let fetched = s.get_profile("old").await.unwrap().unwrap();
  assert!(fetched.legacy_role);
  assert_eq!(fetched.profile.role, Role::Alumnus);
}

#[tokio::test]
async fn schema_rejects_unknown_labels() {
  let s = store().await;
  let err = s
    .execute_raw(
      "INSERT INTO profiles (id, name, email, role, status, created_at, updated_at)
       VALUES ('x', 'x', 'x@x.com', 'DEAN', 'PENDING',
               '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00');",
    )
    .await;
  assert!(err.is_err());
}

// ─── Resolver over SQLite ────────────────────────────────────────────────────

fn resolver(store: SqliteStore) -> Resolver<SqliteStore> {
  Resolver::new(Arc::new(store), RolePolicy::default())
}

fn request(id: &str, email: &str, role: Option<&str>) -> ResolveRequest {
  ResolveRequest::new(Identity::new(id, email).with_role_hint(role))
}

#[tokio::test]
async fn student_scenario_end_to_end() {
  let r = resolver(store().await);
  let res = r.resolve(request("u1", "jane@x.com", Some("STUDENT"))).await.unwrap();
  assert_eq!(res.outcome, Outcome::Created);
  assert_eq!(res.profile.display_name, "jane");
  assert_eq!(res.profile.status, ProfileStatus::Approved);

  let again = r.resolve(request("u1", "jane@x.com", Some("STUDENT"))).await.unwrap();
  assert_eq!(again.outcome, Outcome::Unchanged);
  assert_eq!(r.list(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn legacy_row_is_canonicalised_on_resolve() {
  let s = store().await;
  s.execute_raw(
    "INSERT INTO profiles (id, name, email, role, status, created_at, updated_at)
     VALUES ('old', 'old', 'old@x.com', 'ALUMNI', 'APPROVED',
             '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00');",
  )
  .await
  .unwrap();
  let r = resolver(s.clone());

  let res = r.resolve(request("old", "old@x.com", Some("alumni"))).await.unwrap();
  assert_eq!(res.outcome, Outcome::Updated);
  assert_eq!(res.profile.role, Role::Alumnus);

  let fetched = s.get_profile("old").await.unwrap().unwrap();
  assert!(!fetched.legacy_role);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_first_resolutions_create_one_row() {
  // Two connections to one file so the inserts genuinely race.
  let path = std::env::temp_dir().join(format!("alumnet-{}.db", Uuid::new_v4()));
  let a = resolver(SqliteStore::open(&path).await.unwrap());
  let b = resolver(SqliteStore::open(&path).await.unwrap());

  for i in 0..10 {
    let id = format!("race-{i}");
    let (ra, rb) = tokio::join!(
      a.resolve(request(&id, "racer@x.com", Some("RECRUITER"))),
      b.resolve(request(&id, "racer@x.com", Some("RECRUITER"))),
    );
    let (ra, rb) = (ra.unwrap(), rb.unwrap());
    assert_eq!(ra.profile.id, rb.profile.id);
    let created = [ra.outcome, rb.outcome]
      .iter()
      .filter(|o| **o == Outcome::Created)
      .count();
    assert_eq!(created, 1, "exactly one resolution creates {id}");
  }

  assert_eq!(a.list(None).await.unwrap().len(), 10);
  drop((a, b));
  remove_db_files(&path);
}

/// Remove a database file along with its WAL sidecars.
fn remove_db_files(path: &std::path::Path) {
  let _ = std::fs::remove_file(path);
  for suffix in ["-wal", "-shm"] {
    let mut sidecar = path.as_os_str().to_owned();
    sidecar.push(suffix);
    let _ = std::fs::remove_file(&sidecar);
  }
}
