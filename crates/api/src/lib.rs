//! HTTP API: router, services, request/response mapping.

pub mod app;
pub mod middleware;
