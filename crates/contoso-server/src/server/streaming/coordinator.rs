use crate::server::{
    service::state::AppState,
    telemetry::{
        decrement_streams_inflight, increment_chunks_emitted, increment_streams_cancelled,
        increment_streams_inflight, record_stream_duration,
    },
};
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use contoso_core::stream::{Pacer, SessionOutcome, StreamSession};
use core::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};
use tracing::Instrument;

/// Asks reverse proxies (nginx and friends) not to buffer the response.
pub static X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Starts streaming `text` word by word and returns the response carrying it.
///
/// The session runs on its own task and writes into a bounded channel whose
/// receiving end is the response body. When the client disconnects, the body
/// is dropped, the channel closes, and the session notices at its next write
/// or pause. Shutdown cancels the session through its token.
///
/// The pacing delay must already be validated; nothing here can fail once the
/// response has started.
pub fn stream_words(state: &AppState, text: &str, pacer: Pacer) -> Response {
    let (tx, rx) = mpsc::channel::<Bytes>(state.config().stream_buffer_size);
    let session = StreamSession::new(text, pacer, tx, state.session_token());
    let words = session.remaining();

    increment_streams_inflight();
    let start = std::time::Instant::now();

    let fut = async move {
        let outcome = session.run().await;

        decrement_streams_inflight();
        record_stream_duration(start.elapsed().as_millis() as f64);
        increment_chunks_emitted(outcome.chunks() as u64);

        match outcome {
            SessionOutcome::Completed { chunks } => {
                tracing::debug!(chunks, "stream completed");
            }
            SessionOutcome::Cancelled { chunks_sent } => {
                increment_streams_cancelled();
                tracing::debug!(chunks_sent, "stream ended early: client gone or shutting down");
            }
        }
    };
    let span = tracing::info_span!(
        "stream_session",
        words,
        delay_ms = pacer.delay().as_millis() as u64
    );
    tokio::spawn(fut.instrument(span));

    let body = Body::from_stream(ReceiverStream::new(rx).map(Ok::<_, Infallible>));

    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (X_ACCEL_BUFFERING.clone(), HeaderValue::from_static("no")),
        ],
        body,
    )
        .into_response()
}
