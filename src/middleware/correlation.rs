//! Correlation id middleware.
//!
//! Every request gets a [`CorrelationId`]: the client's value when the
//! configured header carries a non-blank one, otherwise a fresh UUID v4.
//! The id is stored in the request extensions (see the
//! [`CorrelationId`] extractor), wraps downstream work in a `request`
//! span, and is set on the response under the same header name. The
//! final status is then reported to the injected [`CorrelationSink`].
//!
//! The request itself is passed on untouched: no header is added,
//! removed or rewritten.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

use super::sink::CorrelationSink;
use crate::config::model::CorrelationConfig;
use crate::error::{CalderaError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOrigin {
    /// Supplied by the caller in the correlation header.
    Client,
    /// Minted by the middleware because the header was absent or blank.
    Generated,
}

impl IdOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Generated => "generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    // Kept as raw header bytes so non-ASCII values round-trip unchanged.
    Client(HeaderValue),
    Generated(Uuid),
}

/// The correlation id resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(Repr);

impl CorrelationId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Repr::Generated(Uuid::new_v4()))
    }

    #[must_use]
    pub const fn from_client(value: HeaderValue) -> Self {
        Self(Repr::Client(value))
    }

    /// Resolve the id for a request: the first value of `header` unless it
    /// is missing or blank, in which case a new one is generated.
    #[must_use]
    pub fn resolve(headers: &HeaderMap, header: &HeaderName) -> Self {
        match headers.get(header) {
            Some(value) if !is_blank(value) => Self::from_client(value.clone()),
            _ => Self::generate(),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> IdOrigin {
        match self.0 {
            Repr::Client(_) => IdOrigin::Client,
            Repr::Generated(_) => IdOrigin::Generated,
        }
    }

    /// The id as text. Bytes that are not valid UTF-8 are replaced, so use
    /// this for logging only; the response header carries the raw value.
    #[must_use]
    pub fn as_str_lossy(&self) -> Cow<'_, str> {
        match &self.0 {
            Repr::Client(value) => String::from_utf8_lossy(value.as_bytes()),
            Repr::Generated(uuid) => Cow::Owned(uuid.hyphenated().to_string()),
        }
    }

    /// The value to put on the wire.
    #[must_use]
    pub fn to_header_value(&self) -> HeaderValue {
        match &self.0 {
            Repr::Client(value) => value.clone(),
            Repr::Generated(uuid) => {
                let mut buf = Uuid::encode_buffer();
                let text = uuid.hyphenated().encode_lower(&mut buf);
                // 36 bytes of lowercase hex and '-', always a legal header value.
                HeaderValue::from_str(text).expect("hyphenated uuid is visible ascii")
            }
        }
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str_lossy())
    }
}

fn is_blank(value: &HeaderValue) -> bool {
    value.as_bytes().iter().all(u8::is_ascii_whitespace)
}

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::error!(
                path = %parts.uri.path(),
                "correlation id missing; is the correlation middleware installed?"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

/// Middleware state: which header to read and write, and where to report.
#[derive(Clone)]
pub struct Correlation {
    header: HeaderName,
    sink: Arc<dyn CorrelationSink>,
}

impl fmt::Debug for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Correlation")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

impl Correlation {
    #[must_use]
    pub fn new(header: HeaderName, sink: Arc<dyn CorrelationSink>) -> Self {
        Self { header, sink }
    }

    pub fn from_config(
        config: &CorrelationConfig,
        sink: Arc<dyn CorrelationSink>,
    ) -> Result<Self, CalderaError> {
        let header = HeaderName::from_bytes(config.header.as_bytes()).map_err(|_| {
            CalderaError::ConfigValidation {
                errors: vec![ValidationError {
                    field: "correlation.header".into(),
                    message: format!("'{}' is not a valid HTTP header name", config.header),
                    suggestion: None,
                }],
            }
        })?;
        Ok(Self::new(header, sink))
    }

    #[must_use]
    pub const fn header(&self) -> &HeaderName {
        &self.header
    }
}

/// Resolve, expose, stamp and report the correlation id for one request.
///
/// Install with `axum::middleware::from_fn_with_state` as the outermost
/// layer so it sees every route and every response, including 404s and
/// errors produced by inner layers.
pub async fn correlation_middleware(
    State(correlation): State<Correlation>,
    mut request: Request,
    next: Next,
) -> Response {
    let id = CorrelationId::resolve(request.headers(), &correlation.header);
    correlation.sink.resolved(&id);

    let span = tracing::info_span!(
        "request",
        correlation_id = %id,
        method = %request.method(),
        path = %request.uri().path()
    );
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).instrument(span).await;

    // insert, not append: the response carries exactly one value.
    response
        .headers_mut()
        .insert(correlation.header.clone(), id.to_header_value());

    correlation.sink.completed(&id, response.status());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::sink::{RecordingSink, SinkEvent};
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const HEADER: &str = "RacCorrelationId";

    fn app(sink: Arc<RecordingSink>) -> Router {
        let correlation = Correlation::new(HeaderName::from_static("raccorrelationid"), sink);
        Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route(
                "/echo-id",
                get(|id: CorrelationId| async move { id.to_string() }),
            )
            .route(
                "/request-header",
                get(|headers: HeaderMap| async move {
                    headers
                        .get(HEADER)
                        .map_or_else(|| "<none>".to_string(), |v| format!("{v:?}"))
                }),
            )
            .route(
                "/sets-header",
                get(|| async { ([(HEADER, "from-handler"), ("x-other", "kept")], "ok") }),
            )
            .route(
                "/fails",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(axum::middleware::from_fn_with_state(
                correlation,
                correlation_middleware,
            ))
    }

    async fn send(app: Router, uri: &str, headers: &[(&str, HeaderValue)]) -> Response {
        let mut builder = axum::http::Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, value.clone());
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn response_id(response: &Response) -> String {
        response
            .headers()
            .get(HEADER)
            .expect("correlation header missing")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn generates_uuid_when_header_absent() {
        let sink = Arc::new(RecordingSink::new());
        let response = send(app(sink.clone()), "/ok", &[]).await;

        assert_eq!(response.status(), StatusCode::OK);
        let id = response_id(&response);
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(id, parsed.hyphenated().to_string());

        let events = sink.events();
        assert!(matches!(
            events[0],
            SinkEvent::Resolved { origin: IdOrigin::Generated, .. }
        ));
    }

    #[tokio::test]
    async fn echoes_client_value_exactly() {
        let sink = Arc::new(RecordingSink::new());
        let response = send(
            app(sink.clone()),
            "/ok",
            &[(HEADER, HeaderValue::from_static("abc-123"))],
        )
        .await;

        assert_eq!(response_id(&response), "abc-123");
        assert_eq!(
            sink.completions(),
            vec![("abc-123".to_string(), StatusCode::OK)]
        );
    }

    #[tokio::test]
    async fn header_name_is_case_insensitive() {
        let sink = Arc::new(RecordingSink::new());
        let response = send(
            app(sink),
            "/ok",
            &[("RACCORRELATIONID", HeaderValue::from_static("upper"))],
        )
        .await;
        assert_eq!(response_id(&response), "upper");
    }

    #[tokio::test]
    async fn blank_values_are_replaced() {
        for blank in ["", "   ", "\t"] {
            let sink = Arc::new(RecordingSink::new());
            let response = send(
                app(sink),
                "/ok",
                &[(HEADER, HeaderValue::from_str(blank).unwrap())],
            )
            .await;
            let id = response_id(&response);
            assert!(Uuid::parse_str(&id).is_ok(), "{blank:?} was not replaced");
        }
    }

    #[tokio::test]
    async fn first_of_multiple_values_wins() {
        let sink = Arc::new(RecordingSink::new());
        let response = send(
            app(sink),
            "/ok",
            &[
                (HEADER, HeaderValue::from_static("first")),
                (HEADER, HeaderValue::from_static("second")),
            ],
        )
        .await;
        let values: Vec<_> = response.headers().get_all(HEADER).iter().collect();
        assert_eq!(values, vec![&HeaderValue::from_static("first")]);
    }

    #[tokio::test]
    async fn non_ascii_value_passes_through_opaquely() {
        let raw = HeaderValue::from_bytes(b"caf\xc3\xa9-\xff").unwrap();
        let sink = Arc::new(RecordingSink::new());
        let response = send(app(sink), "/ok", &[(HEADER, raw.clone())]).await;
        assert_eq!(response.headers().get(HEADER), Some(&raw));
    }

    #[tokio::test]
    async fn long_value_is_not_truncated() {
        let long = "x".repeat(4096);
        let sink = Arc::new(RecordingSink::new());
        let response = send(
            app(sink),
            "/ok",
            &[(HEADER, HeaderValue::from_str(&long).unwrap())],
        )
        .await;
        assert_eq!(response_id(&response), long);
    }

    #[tokio::test]
    async fn handler_can_extract_the_resolved_id() {
        let sink = Arc::new(RecordingSink::new());
        let response = send(app(sink), "/echo-id", &[]).await;
        let id = response_id(&response);
        assert_eq!(body_text(response).await, id);
    }

    #[tokio::test]
    async fn request_headers_are_not_rewritten() {
        let sink = Arc::new(RecordingSink::new());
        let absent = send(app(sink.clone()), "/request-header", &[]).await;
        assert_eq!(body_text(absent).await, "<none>");

        let blank = send(
            app(sink),
            "/request-header",
            &[(HEADER, HeaderValue::from_static("  "))],
        )
        .await;
        assert_eq!(body_text(blank).await, "\"  \"");
    }

    #[tokio::test]
    async fn overrides_handler_value_and_keeps_other_headers() {
        let sink = Arc::new(RecordingSink::new());
        let response = send(
            app(sink),
            "/sets-header",
            &[(HEADER, HeaderValue::from_static("client-id"))],
        )
        .await;
        assert_eq!(response.headers().get_all(HEADER).iter().count(), 1);
        assert_eq!(response_id(&response), "client-id");
        assert_eq!(response.headers().get("x-other").unwrap(), "kept");
    }

    #[tokio::test]
    async fn error_responses_are_stamped_and_reported_unchanged() {
        let sink = Arc::new(RecordingSink::new());
        let response = send(app(sink.clone()), "/fails", &[]).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let id = response_id(&response);
        assert_eq!(body_text(response).await, "boom");
        assert_eq!(
            sink.completions(),
            vec![(id, StatusCode::INTERNAL_SERVER_ERROR)]
        );
    }

    #[tokio::test]
    async fn unmatched_routes_are_covered() {
        let sink = Arc::new(RecordingSink::new());
        let response = send(app(sink.clone()), "/nope", &[]).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let id = response_id(&response);
        assert_eq!(sink.completions(), vec![(id, StatusCode::NOT_FOUND)]);
    }

    #[tokio::test]
    async fn generated_ids_do_not_repeat() {
        let sink = Arc::new(RecordingSink::new());
        let router = app(sink);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let response = send(router.clone(), "/ok", &[]).await;
            assert!(seen.insert(response_id(&response)));
        }
    }

    #[test]
    fn header_value_matches_display() {
        let generated = CorrelationId::generate();
        let value = generated.to_header_value();
        assert_eq!(value.to_str().unwrap(), generated.to_string());
        assert!(Uuid::parse_str(value.to_str().unwrap()).is_ok());

        let raw = HeaderValue::from_bytes(b"caf\xe9").unwrap();
        let client = CorrelationId::from_client(raw.clone());
        assert_eq!(client.to_header_value(), raw);
    }

    #[test]
    fn from_config_rejects_invalid_header() {
        let config = CorrelationConfig {
            header: "not valid".into(),
        };
        let err = Correlation::from_config(&config, Arc::new(RecordingSink::new())).unwrap_err();
        assert!(matches!(err, CalderaError::ConfigValidation { .. }));
    }

    #[test]
    fn from_config_lowercases_header() {
        let correlation = Correlation::from_config(
            &CorrelationConfig::default(),
            Arc::new(RecordingSink::new()),
        )
        .unwrap();
        assert_eq!(correlation.header().as_str(), "raccorrelationid");
    }
}
