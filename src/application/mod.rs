//! Application services layer.

pub mod admin;
pub mod auth;
pub mod error;
pub mod markdown;
pub mod portfolio;
pub mod rate_limit;
pub mod repos;
pub mod stream;
