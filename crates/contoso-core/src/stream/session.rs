//! The chunk emitter state machine.
//!
//! A [`StreamSession`] owns the words still to be sent, a [`Pacer`], the
//! output [`ChunkSink`] and a [`CancellationToken`]. Running it walks
//! through:
//!
//! ```text
//! Idle ──► Emitting ──► Draining ──► Closed
//!   │          │
//!   │          └──────► Cancelled ─► Closed
//!   └─(no tokens)─► Draining
//! ```
//!
//! - `Emitting`: write `token + " "`, then pace; the first write is
//!   immediate and two writes are always separated by a pacing step.
//! - `Draining`: every token was written and its pause completed; write the
//!   [`TERMINATOR`] and release the sink.
//! - `Cancelled`: the sink closed (the peer went away) or the token fired.
//!   Nothing else is written, not even the terminator.
//!
//! A cancelled session is a normal outcome, not an error, and is never
//! resumed.

use super::{pacing::{Pacer, WaitOutcome}, tokenizer::tokenize};
use bytes::Bytes;
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Final chunk of a session that ran to completion.
pub const TERMINATOR: &str = ".";

/// The receiving side of a sink is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkClosed;

/// A write-capable output channel for chunks.
pub trait ChunkSink: Send {
    /// Writes one chunk, failing once the peer stopped receiving.
    fn send(&mut self, chunk: Bytes) -> impl Future<Output = Result<(), SinkClosed>> + Send;

    /// Resolves once the peer stopped receiving.
    fn closed(&self) -> impl Future<Output = ()> + Send;
}

impl ChunkSink for mpsc::Sender<Bytes> {
    async fn send(&mut self, chunk: Bytes) -> Result<(), SinkClosed> {
        mpsc::Sender::send(self, chunk).await.map_err(|_| SinkClosed)
    }

    async fn closed(&self) {
        mpsc::Sender::closed(self).await;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Emitting,
    Draining,
    Cancelled,
    Closed,
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every token and the terminator were written. `chunks` counts both.
    Completed { chunks: usize },
    /// The peer left or the session was cancelled after `chunks_sent` chunks.
    Cancelled { chunks_sent: usize },
}

impl SessionOutcome {
    pub const fn chunks(&self) -> usize {
        match *self {
            SessionOutcome::Completed { chunks } => chunks,
            SessionOutcome::Cancelled { chunks_sent } => chunks_sent,
        }
    }
}

pub struct StreamSession<S> {
    remaining: VecDeque<String>,
    pacer: Pacer,
    sink: S,
    cancel: CancellationToken,
    state: SessionState,
    sent: usize,
}

impl<S: ChunkSink> StreamSession<S> {
    /// Tokenizes `text` and prepares a session in the `Idle` state.
    pub fn new(text: &str, pacer: Pacer, sink: S, cancel: CancellationToken) -> Self {
        Self::from_tokens(tokenize(text), pacer, sink, cancel)
    }

    pub fn from_tokens(
        tokens: Vec<String>,
        pacer: Pacer,
        sink: S,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            remaining: tokens.into(),
            pacer,
            sink,
            cancel,
            state: SessionState::Idle,
            sent: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of words not yet written.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Drives the session to `Closed`, releasing the sink on return.
    pub async fn run(mut self) -> SessionOutcome {
        let outcome = self.drive().await;
        self.transition(SessionState::Closed);
        outcome
    }

    async fn drive(&mut self) -> SessionOutcome {
        if !self.remaining.is_empty() {
            self.transition(SessionState::Emitting);
        }

        while let Some(mut word) = self.remaining.pop_front() {
            word.push(' ');
            if self.write(Bytes::from(word)).await.is_err() {
                return self.cancelled();
            }
            if self.pause().await == WaitOutcome::Cancelled {
                return self.cancelled();
            }
        }

        self.transition(SessionState::Draining);
        if self.write(Bytes::from_static(TERMINATOR.as_bytes())).await.is_err() {
            // The peer left between the last pause and the terminator.
            return SessionOutcome::Cancelled {
                chunks_sent: self.sent,
            };
        }
        SessionOutcome::Completed { chunks: self.sent }
    }

    async fn write(&mut self, chunk: Bytes) -> Result<(), SinkClosed> {
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(SinkClosed),
            result = self.sink.send(chunk) => result,
        };
        if result.is_ok() {
            self.sent += 1;
        }
        result
    }

    async fn pause(&self) -> WaitOutcome {
        tokio::select! {
            biased;
            () = self.sink.closed() => WaitOutcome::Cancelled,
            outcome = self.pacer.wait(&self.cancel) => outcome,
        }
    }

    fn cancelled(&mut self) -> SessionOutcome {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            chunks_sent = self.sent,
            remaining = self.remaining.len(),
            "stream session cancelled"
        );
        self.remaining.clear();
        self.transition(SessionState::Cancelled);
        SessionOutcome::Cancelled {
            chunks_sent: self.sent,
        }
    }

    fn transition(&mut self, next: SessionState) {
        #[cfg(feature = "tracing")]
        tracing::trace!(from = ?self.state, to = ?next, "stream session transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    const WORDS: &str = "Esta es una respuesta simulada como si fuera un LLM.";

    async fn collect(mut rx: mpsc::Receiver<Bytes>) -> Vec<String> {
        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(String::from_utf8(chunk.to_vec()).unwrap());
        }
        chunks
    }

    /// Accepts `budget` chunks, then reports the peer gone on the next write.
    struct LimitedSink {
        written: Arc<Mutex<Vec<Bytes>>>,
        budget: usize,
    }

    impl ChunkSink for LimitedSink {
        async fn send(&mut self, chunk: Bytes) -> Result<(), SinkClosed> {
            if self.budget == 0 {
                return Err(SinkClosed);
            }
            self.budget -= 1;
            self.written.lock().unwrap().push(chunk);
            Ok(())
        }

        async fn closed(&self) {
            std::future::pending::<()>().await;
        }
    }

    #[tokio::test]
    async fn emits_each_word_then_terminator() {
        let (tx, rx) = mpsc::channel(16);
        let session =
            StreamSession::new("Hola Mundo", Pacer::from_millis(0).unwrap(), tx, CancellationToken::new());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.remaining(), 2);

        let outcome = session.run().await;
        assert_eq!(outcome, SessionOutcome::Completed { chunks: 3 });
        assert_eq!(collect(rx).await, ["Hola ", "Mundo ", "."]);
    }

    #[tokio::test]
    async fn completed_session_preserves_order_and_count() {
        let (tx, rx) = mpsc::channel(1);
        let reader = tokio::spawn(collect(rx));
        let outcome = StreamSession::new(WORDS, Pacer::from_millis(0).unwrap(), tx, CancellationToken::new())
            .run()
            .await;

        let expected: Vec<String> = WORDS
            .split_whitespace()
            .map(|w| format!("{w} "))
            .chain([TERMINATOR.to_string()])
            .collect();
        assert_eq!(outcome.chunks(), expected.len());
        assert_eq!(reader.await.unwrap(), expected);
    }

    #[tokio::test]
    async fn blank_text_writes_only_the_terminator() {
        for text in ["", "   "] {
            let (tx, rx) = mpsc::channel(4);
            let outcome =
                StreamSession::new(text, Pacer::from_millis(0).unwrap(), tx, CancellationToken::new())
                    .run()
                    .await;
            assert_eq!(outcome, SessionOutcome::Completed { chunks: 1 });
            assert_eq!(collect(rx).await, ["."]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_chunk_is_immediate_and_each_word_is_paced() {
        let (tx, mut rx) = mpsc::channel(1);
        let start = Instant::now();
        tokio::spawn(
            StreamSession::new("uno dos tres", Pacer::from_millis(100).unwrap(), tx, CancellationToken::new())
                .run(),
        );

        let mut arrivals = Vec::new();
        while let Some(chunk) = rx.recv().await {
            arrivals.push((chunk, start.elapsed()));
        }

        let offsets: Vec<u128> = arrivals.iter().map(|(_, at)| at.as_millis() / 100).collect();
        assert_eq!(offsets, [0, 1, 2, 3]);
        assert_eq!(arrivals.last().unwrap().0, Bytes::from_static(b"."));
    }

    #[tokio::test(start_paused = true)]
    async fn peer_leaving_mid_stream_stops_emission() {
        let (tx, mut rx) = mpsc::channel(1);
        let session = tokio::spawn(
            StreamSession::new(WORDS, Pacer::from_millis(150).unwrap(), tx, CancellationToken::new()).run(),
        );

        let mut received = Vec::new();
        for _ in 0..3 {
            received.push(rx.recv().await.unwrap());
        }
        drop(rx);

        let outcome = session.await.unwrap();
        assert_eq!(outcome, SessionOutcome::Cancelled { chunks_sent: 3 });
        assert_eq!(received, ["Esta ", "es ", "una "]);
    }

    #[tokio::test]
    async fn failed_write_aborts_without_terminator() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = LimitedSink {
            written: Arc::clone(&written),
            budget: 2,
        };

        let outcome = StreamSession::new(WORDS, Pacer::from_millis(0).unwrap(), sink, CancellationToken::new())
            .run()
            .await;

        assert_eq!(outcome, SessionOutcome::Cancelled { chunks_sent: 2 });
        let written = written.lock().unwrap();
        assert_eq!(*written, [Bytes::from_static(b"Esta "), Bytes::from_static(b"es ")]);
    }

    #[tokio::test]
    async fn failed_terminator_counts_as_cancelled() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = LimitedSink {
            written: Arc::clone(&written),
            budget: 2,
        };

        let outcome = StreamSession::new("Hola Mundo", Pacer::from_millis(0).unwrap(), sink, CancellationToken::new())
            .run()
            .await;

        assert_eq!(outcome, SessionOutcome::Cancelled { chunks_sent: 2 });
        assert_eq!(written.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_token_aborts_a_paused_session() {
        let (tx, rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let session = tokio::spawn(
            StreamSession::new(WORDS, Pacer::from_millis(5000).unwrap(), tx, cancel.child_token()).run(),
        );

        tokio::time::sleep(Duration::from_millis(7500)).await;
        cancel.cancel();

        assert_eq!(session.await.unwrap(), SessionOutcome::Cancelled { chunks_sent: 2 });
        assert_eq!(collect(rx).await, ["Esta ", "es "]);
    }

    #[tokio::test]
    async fn pre_cancelled_session_writes_nothing() {
        let (tx, rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = StreamSession::new(WORDS, Pacer::from_millis(0).unwrap(), tx, cancel)
            .run()
            .await;

        assert_eq!(outcome, SessionOutcome::Cancelled { chunks_sent: 0 });
        assert!(collect(rx).await.is_empty());
    }
}
