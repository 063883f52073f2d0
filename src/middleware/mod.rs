//! Tower middleware layers.
//!
//! [`correlation`] resolves the per-request correlation id and stamps it
//! on every response; [`sink`] is where it reports what it saw.

pub mod correlation;
pub mod sink;

pub use correlation::{correlation_middleware, Correlation, CorrelationId, IdOrigin};
pub use sink::{CorrelationSink, RecordingSink, SinkEvent, TracingSink};
