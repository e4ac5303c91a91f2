//! Feature modules, each split into controller / service / model / router.

pub mod auth;
pub mod messages;
pub mod notifications;
pub mod progress;
pub mod resources;
pub mod students;
pub mod users;
