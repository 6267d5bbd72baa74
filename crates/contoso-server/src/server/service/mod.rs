//! HTTP service: request routing, shared state and handlers.
//!
//! ## Structure
//!
//! - [`router`] - Route table and middleware (`create_router`).
//! - [`handler`] - Lookup and streaming handlers.
//! - [`state`] - `AppState`, the read-only bank plus shutdown signalling.

pub mod handler;
pub mod router;
pub mod state;
