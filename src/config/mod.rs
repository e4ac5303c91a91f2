//! Environment-driven configuration.
//!
//! Each submodule owns one concern and exposes a `from_env()` constructor
//! with sensible development defaults:
//!
//! - [`cors`]: allowed frontend origins
//! - [`database`]: PostgreSQL connection pool
//! - [`email`]: SMTP settings for outbound mail
//! - [`jwt`]: token secret and expiries
//! - [`rate_limit`]: request throttling for the auth endpoints

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod rate_limit;
