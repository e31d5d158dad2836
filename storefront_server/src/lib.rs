//! # Storefront server
//!
//! This crate hosts the HTTP surface of the manufacturing storefront backend. It is responsible
//! for:
//! * verifying bearer credentials and attaching the caller's identity to requests,
//! * gating administrative operations behind the role authorizer,
//! * translating HTTP requests into engine API calls and engine errors into status codes.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! Route handlers live in [routes](routes/index.html); the wiring of handlers, guards and shared
//! state lives in [server](server/index.html).

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
