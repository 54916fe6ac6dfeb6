//! # Quill API Server
//!
//! Actix-web application: configuration, shared state, middleware and handlers.
//! The binary in `main.rs` wires them into an `HttpServer`.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
