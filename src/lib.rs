//! Caldera is a single-endpoint HTTP service with request correlation.
//!
//! It serves `GET /thing`, returning a payload from a pluggable
//! [`ThingProvider`](provider::ThingProvider), behind a middleware that
//! gives every request/response pair a correlation id carried in the
//! `RacCorrelationId` header: echoed when the client sends one, minted
//! as a UUID v4 otherwise.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, fetch).
//! - [`config`] -- Configuration model, validation, and file sources via the
//!   [`ConfigSource`](config::ConfigSource) trait.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- The correlation id middleware and its observability sink.
//! - [`provider`] -- The [`Thing`](provider::Thing) payload and its providers.
//! - [`server`] -- Axum router, layer ordering, and graceful shutdown.
//! - [`thing`] -- `GET /thing` endpoint handler.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod provider;
pub mod server;
pub mod thing;
