//! Tracing configuration for the `tyshape` binary.
//!
//! Supports three output formats controlled by `TYSHAPE_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Why is one type not contained by another?
//! TYSHAPE_LOG=tyshape_solver=trace TYSHAPE_LOG_FORMAT=tree tyshape check 'list<int>' 'array<string>'
//!
//! # Which declarations were skipped during stub generation
//! TYSHAPE_LOG=tyshape_emitter=trace tyshape stubs manifest.json
//!
//! # Manifest types that failed to parse
//! TYSHAPE_LOG=warn TYSHAPE_LOG_FORMAT=json tyshape stubs manifest.json
//! ```
//!
//! The subscriber is only initialised when `TYSHAPE_LOG` (or `RUST_LOG`) is
//! set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "TYSHAPE_LOG";
pub const LOG_FORMAT_ENV: &str = "TYSHAPE_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Unrecognized values fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `TYSHAPE_LOG`, falling back to `RUST_LOG`.
///
/// Values use the `RUST_LOG` syntax (`debug`, `tyshape_solver=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_ENV) {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TYSHAPE_LOG` nor `RUST_LOG` is set. All output
/// goes to stderr; stdout carries command results only.
pub fn init_tracing() {
    let has_tyshape_log = std::env::var(LOG_ENV).is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_tyshape_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tests;
