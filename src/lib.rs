//! Folio: a self-hosted personal portfolio with an authenticated admin.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
