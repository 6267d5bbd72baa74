//! Server-side components of the Contoso Banking API.
//!
//! ## Submodules
//!
//! - [`config`] - CLI/environment configuration.
//! - [`service`] - Router, handlers and shared state.
//! - [`streaming`] - Per-request streaming sessions wired to response bodies.
//! - [`telemetry`] - Structured logging and optional OpenTelemetry export.

pub mod config;
pub mod service;
pub mod streaming;
pub mod telemetry;
