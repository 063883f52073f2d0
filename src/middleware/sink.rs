//! Where the correlation middleware reports what it saw.
//!
//! The sink is handed to [`Correlation`](super::correlation::Correlation)
//! at construction, never looked up globally. [`TracingSink`] is the
//! production implementation; [`RecordingSink`] keeps events in memory
//! for tests and embedding applications that want to assert on them.

use std::sync::Mutex;

use axum::http::StatusCode;

use super::correlation::{CorrelationId, IdOrigin};

pub trait CorrelationSink: Send + Sync {
    /// Called once per request, as soon as the id is resolved.
    fn resolved(&self, id: &CorrelationId);

    /// Called once per request with the status of the response about to be sent.
    fn completed(&self, id: &CorrelationId, status: StatusCode);
}

/// Emits one structured `tracing` event per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl CorrelationSink for TracingSink {
    fn resolved(&self, id: &CorrelationId) {
        tracing::debug!(
            correlation_id = %id,
            origin = id.origin().as_str(),
            "correlation id resolved"
        );
    }

    fn completed(&self, id: &CorrelationId, status: StatusCode) {
        if status.is_server_error() {
            tracing::warn!(correlation_id = %id, status = status.as_u16(), "response sent");
        } else {
            tracing::info!(correlation_id = %id, status = status.as_u16(), "response sent");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Resolved {
        id: String,
        origin: IdOrigin,
    },
    Completed {
        id: String,
        status: StatusCode,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in call order.
    #[must_use]
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |events| events.clone())
    }

    /// Statuses passed to [`CorrelationSink::completed`], paired with their id.
    #[must_use]
    pub fn completions(&self) -> Vec<(String, StatusCode)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Completed { id, status } => Some((id, status)),
                SinkEvent::Resolved { .. } => None,
            })
            .collect()
    }

    fn push(&self, event: SinkEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl CorrelationSink for RecordingSink {
    fn resolved(&self, id: &CorrelationId) {
        self.push(SinkEvent::Resolved {
            id: id.to_string(),
            origin: id.origin(),
        });
    }

    fn completed(&self, id: &CorrelationId, status: StatusCode) {
        self.push(SinkEvent::Completed {
            id: id.to_string(),
            status,
        });
    }
}
