//! Core types and decision logic for Alumnet profile resolution.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the canonical role vocabulary, the profile resolver, and the redirect
//! policy; storage backends implement [`store::ProfileStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod identity;
pub mod policy;
pub mod profile;
pub mod redirect;
pub mod resolver;
pub mod role;
pub mod store;

pub use error::{Error, Result};
