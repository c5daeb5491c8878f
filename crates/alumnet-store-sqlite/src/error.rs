//! Error type for `alumnet-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row carries a role label that is neither canonical nor a known
  /// legacy synonym.
  #[error("unknown role label in store: {0:?}")]
  UnknownRole(String),

  #[error("unknown status label in store: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
