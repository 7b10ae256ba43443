//! Dashboard read side: policy listings and renewal alerts

pub mod queries;
pub mod routes;

pub use routes::{autos_routes, renovaciones_routes};
