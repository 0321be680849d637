//! Application services for the administrative surface.

pub mod audit;
pub mod chrome;
pub mod content;
pub mod dashboard;
