//! CSV upload feature slice

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{history_routes, upload_routes};
