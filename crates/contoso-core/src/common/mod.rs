//! Shared types and error definitions used across the Contoso Banking service.
//!
//! ## Submodules
//!
//! - [`error`] - Centralized error type used by lookups, pacing validation and
//!   the HTTP layer.
//! - [`types`] - Profiles, accounts, balances and the request/response
//!   payloads exchanged over the wire.

pub mod error;
pub mod types;

pub use error::{Error, Result};
