//! Logging and span export.
//!
//! Everything in the crate logs through `tracing`. [`init_tracing`] installs the
//! subscriber used by the binary:
//!
//! ```text
//! tracing macros ─▶ EnvFilter ─┬─▶ fmt layer ─▶ stderr
//!                              └─▶ tracing-opentelemetry ─▶ SDK ─▶ JsonLinesExporter ─▶ file
//! ```
//!
//! The OpenTelemetry branch is only installed when a trace file is configured.
//!
//! # Filter Resolution
//!
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` configuration value
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`exporter`]: Span exporter writing one JSON object per finished span
//! - [`rotating_file`]: Size-capped append-only file with numbered backups

pub mod exporter;
mod init;
pub mod rotating_file;

pub use init::init_tracing;
