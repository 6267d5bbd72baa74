//! Bridges [`StreamSession`](contoso_core::stream::StreamSession)s to chunked
//! HTTP bodies.
//!
//! - [`coordinator`] - Spawns a session per request and wires its sink to the
//!   response body.

pub mod coordinator;
