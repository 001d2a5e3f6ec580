//! In-memory connector for tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::client::{ConnectParams, MessageLevel, RemoteConnection, RemoteConnector};
use crate::errors::BoxError;

#[derive(Debug, Clone, Default)]
pub struct ConnState {
    pub autocommit: Option<bool>,
    pub message_level: Option<MessageLevel>,
}

enum Failure {
    Error(String),
    NotReady(String),
}

#[derive(Default)]
pub struct MockConnector {
    latency: Option<Duration>,
    handshakes: AtomicUsize,
    dropped: Arc<AtomicUsize>,
    failures: Mutex<VecDeque<Failure>>,
    params: Mutex<Vec<ConnectParams>>,
    states: Mutex<Vec<Arc<Mutex<ConnState>>>>,
}

impl MockConnector {
    /// Connector whose handshakes take `latency` to complete.
    pub fn with_latency(latency: Duration) -> Self {
        MockConnector {
            latency: Some(latency),
            ..Default::default()
        }
    }

    /// Make the next handshake fail outright.
    pub fn fail_next(&self, message: &str) {
        self.failures
            .lock()
            .push_back(Failure::Error(message.to_string()));
    }

    /// Make the next handshake return a connection that never became ready.
    pub fn fail_next_not_ready(&self, message: &str) {
        self.failures
            .lock()
            .push_back(Failure::NotReady(message.to_string()));
    }

    pub fn handshakes(&self) -> usize {
        self.handshakes.load(Ordering::SeqCst)
    }

    /// Number of connections closed so far.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<ConnectParams> {
        self.params.lock().last().cloned()
    }

    pub fn last_state(&self) -> Option<ConnState> {
        self.states.lock().last().map(|state| state.lock().clone())
    }
}

impl RemoteConnector for MockConnector {
    fn connect(&self, params: &ConnectParams) -> Result<Box<dyn RemoteConnection>, BoxError> {
        self.handshakes.fetch_add(1, Ordering::SeqCst);
        self.params.lock().push(params.clone());
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }

        let (ready, message) = match self.failures.lock().pop_front() {
            Some(Failure::Error(message)) => return Err(message.into()),
            Some(Failure::NotReady(message)) => (false, message),
            None => (true, String::new()),
        };

        let state = Arc::new(Mutex::new(ConnState::default()));
        self.states.lock().push(state.clone());

        Ok(Box::new(MockConnection {
            ready,
            message,
            state,
            dropped: self.dropped.clone(),
        }))
    }
}

struct MockConnection {
    ready: bool,
    message: String,
    state: Arc<Mutex<ConnState>>,
    dropped: Arc<AtomicUsize>,
}

impl RemoteConnection for MockConnection {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn error_message(&self) -> String {
        self.message.clone()
    }

    fn set_autocommit(&mut self, autocommit: bool) {
        self.state.lock().autocommit = Some(autocommit);
    }

    fn set_client_min_messages(&mut self, level: MessageLevel) {
        self.state.lock().message_level = Some(level);
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}
