//! HTTP request boundary: routing, request/response shapes, CORS.

pub mod generate;
pub mod projects;
pub mod routes;
pub mod types;

pub use routes::{serve, AppState};
