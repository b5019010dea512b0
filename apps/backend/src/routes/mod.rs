//! HTTP route handlers

pub mod analytics;
pub mod auth;
pub mod patients;
pub mod results;
pub mod sessions;
pub mod users;
