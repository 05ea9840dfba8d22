//! HTTP API: configuration, routing, guard middleware and error mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
