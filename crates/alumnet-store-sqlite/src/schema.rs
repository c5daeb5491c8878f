//! SQL schema for the Alumnet SQLite store.
//!
//! Executed once per connection at startup.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;

-- One row per identity-provider user. The role column also admits the
-- legacy 'ALUMNI' label written by older tools; this store only ever writes
-- canonical labels.
CREATE TABLE IF NOT EXISTS profiles (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    role        TEXT NOT NULL
                CHECK (role IN ('STUDENT', 'ALUMNUS', 'RECRUITER', 'ADMIN', 'ALUMNI')),
    status      TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (status IN ('PENDING', 'APPROVED')),
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS profiles_status_idx ON profiles(status);

PRAGMA user_version = 1;
";
