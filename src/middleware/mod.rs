//! Request middleware.
//!
//! - [`auth`]: bearer-token extractor producing [`auth::AuthUser`]
//! - [`role`]: claims-based role checks for handlers

pub mod auth;
pub mod role;
