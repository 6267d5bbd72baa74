use crate::server::config::ServerConfig;
use contoso_core::Bank;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio_util::sync::CancellationToken;

/// State shared by every handler.
///
/// The [`Bank`] is built once at startup and only ever read. Each streaming
/// session gets a child of `shutdown`, so cancelling it ends every session
/// still in flight.
#[derive(Clone)]
pub struct AppState {
    bank: Arc<Bank>,
    config: Arc<ServerConfig>,
    shutdown: CancellationToken,
    serving: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(bank: Bank, config: ServerConfig) -> Self {
        Self {
            bank: Arc::new(bank),
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
            serving: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// A token that fires when the service shuts down.
    pub fn session_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    pub fn is_serving(&self) -> bool {
        self.serving.load(Ordering::Acquire)
    }

    /// Marks the service as not serving and cancels every in-flight session.
    pub fn shutdown(&self) {
        self.serving.store(false, Ordering::Release);
        self.shutdown.cancel();
    }
}
