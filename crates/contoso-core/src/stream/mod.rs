//! Incremental text streaming.
//!
//! A body of text is split into words by the [`tokenizer`], then written one
//! word per chunk to a [`ChunkSink`] by a [`StreamSession`], which suspends
//! on its [`Pacer`] between writes and finishes with a `"."` terminator.
//!
//! ## Submodules
//!
//! - [`tokenizer`] - Whitespace tokenization.
//! - [`pacing`] - Cancellable inter-chunk delays and their bounds.
//! - [`session`] - The per-request emitter state machine.

pub mod pacing;
pub mod session;
pub mod tokenizer;

pub use pacing::{MAX_DELAY, Pacer, SleepProvider, TokioSleep, TokioYield, WaitOutcome};
pub use session::{ChunkSink, SessionOutcome, SessionState, SinkClosed, StreamSession, TERMINATOR};
pub use tokenizer::tokenize;
