//! Mock submit collaborator for testing.
//!
//! Records every payload it receives and can be configured to fail or to
//! block until released, so tests can observe the `Submitting` state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::handler::SubmitHandler;

/// Failure returned by a [`RecordingHandler`] configured to fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("submission rejected: {0}")]
pub struct MockRejection(pub String);

/// Handler that records payloads.
pub struct RecordingHandler<P> {
    payloads: Mutex<Vec<P>>,
    calls: AtomicUsize,
    failure: Option<String>,
    gate: Option<Notify>,
}

impl<P> RecordingHandler<P> {
    /// Accepts every payload immediately.
    pub fn new() -> Self {
        Self {
            payloads: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            failure: None,
            gate: None,
        }
    }

    /// Rejects every payload with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Blocks each call until [`release`](Self::release) is invoked.
    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::new()
        }
    }

    /// Let one blocked (or the next) call complete.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Number of times `submit` was entered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Payloads received so far.
    pub fn payloads(&self) -> Vec<P>
    where
        P: Clone,
    {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<P> Default for RecordingHandler<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<P: Send + 'static> SubmitHandler<P> for RecordingHandler<P> {
    type Error = MockRejection;

    async fn submit(&self, payload: P) -> Result<(), Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.failure {
            Some(message) => Err(MockRejection(message.clone())),
            None => Ok(()),
        }
    }
}
