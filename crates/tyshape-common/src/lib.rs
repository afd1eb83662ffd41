//! Common types and utilities for the tyshape type core.
//!
//! This crate provides foundational types used across all tyshape crates:
//! - Byte spans for error locations (`ByteSpan`)
//! - Centralized recursion limits
//! - Fully-qualified name helpers (namespace splitting, relative rendering)

// Span - Source location tracking (byte offsets into a type annotation)
pub mod span;
pub use span::ByteSpan;

// Centralized limits and thresholds
pub mod limits;

// Fully-qualified name helpers
pub mod names;
pub use names::{FqName, normalize_name, split_namespace};
