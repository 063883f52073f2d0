//! `GET /thing` endpoint handler.
//!
//! Asks the [`ThingProvider`](crate::provider::ThingProvider) held in
//! [`AppState`] for a payload and returns it as JSON. A provider fault
//! becomes a `500` carrying the correlation id so the caller can quote it.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::middleware::CorrelationId;
use crate::provider::{ProviderError, Thing};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ThingError {
    correlation_id: CorrelationId,
    source: ProviderError,
}

impl IntoResponse for ThingError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.source.to_string(),
            correlation_id: self.correlation_id.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub async fn thing_handler(
    State(state): State<Arc<AppState>>,
    correlation_id: CorrelationId,
) -> Result<Json<Thing>, ThingError> {
    tracing::debug!(provider = state.provider.name(), "generating thing");

    match state.provider.generate().await {
        Ok(thing) => Ok(Json(thing)),
        Err(source) => {
            tracing::error!(
                correlation_id = %correlation_id,
                provider = state.provider.name(),
                error = %source,
                "thing provider failed"
            );
            Err(ThingError {
                correlation_id,
                source,
            })
        }
    }
}
