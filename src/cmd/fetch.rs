//! `caldera fetch` — call `GET /thing` on a running instance.
//!
//! Sends the request (optionally with a caller-chosen correlation id),
//! then prints the payload together with the correlation id the server
//! answered with.

use http_body_util::BodyExt;
use hyper::header::HeaderName;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::FetchArgs;
use crate::error::CalderaError;
use crate::server::THING_PATH;

#[derive(Debug)]
pub struct FetchOutcome {
    pub status: hyper::StatusCode,
    pub correlation_id: Option<String>,
    pub body: bytes::Bytes,
}

/// Perform the request without printing anything.
pub async fn fetch(
    base_url: &str,
    header: &str,
    correlation_id: Option<&str>,
) -> Result<FetchOutcome, CalderaError> {
    let url = format!("{}{THING_PATH}", base_url.trim_end_matches('/'));
    let uri: hyper::Uri =
        url.parse().map_err(
            |e: hyper::http::uri::InvalidUri| CalderaError::UriParse {
                source: Box::new(e),
            },
        )?;
    let header =
        HeaderName::from_bytes(header.as_bytes()).map_err(|e| CalderaError::HttpRequest {
            source: Box::new(e),
        })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let mut builder = hyper::Request::builder().uri(uri);
    if let Some(id) = correlation_id {
        builder = builder.header(&header, id);
    }
    let req = builder
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| CalderaError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| CalderaError::HttpRequest {
            source: "request timed out after 10s".into(),
        })?
        .map_err(|e| CalderaError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let correlation_id = response
        .headers()
        .get(&header)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| CalderaError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    Ok(FetchOutcome {
        status,
        correlation_id,
        body,
    })
}

pub async fn execute(args: FetchArgs) -> Result<(), CalderaError> {
    let outcome = fetch(&args.url, &args.header, args.correlation_id.as_deref()).await?;
    let correlation_id = outcome.correlation_id.as_deref().unwrap_or("(missing)");

    if !outcome.status.is_success() {
        eprintln!("{}: {correlation_id}", args.header);
        eprintln!("{}", String::from_utf8_lossy(&outcome.body));
        return Err(CalderaError::FetchFailed(outcome.status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&outcome.body));
        return Ok(());
    }

    println!("\u{2713} GET {}{THING_PATH} -> {}", args.url.trim_end_matches('/'), outcome.status);
    println!("  {}: {correlation_id}", args.header);
    match serde_json::from_slice::<serde_json::Value>(&outcome.body) {
        Ok(payload) => {
            let pretty = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|_| String::from_utf8_lossy(&outcome.body).into_owned());
            println!("{pretty}");
        }
        Err(e) => {
            eprintln!("Failed to parse response body: {e}");
            println!("{}", String::from_utf8_lossy(&outcome.body));
        }
    }

    Ok(())
}
