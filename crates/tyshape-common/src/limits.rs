//! Centralized limits and thresholds for the type core.
//!
//! Types in this model are finite trees (recursive types are expressed by
//! name), so these limits only guard against pathological input such as
//! thousands of nested generic brackets.

/// Maximum nesting depth accepted by the type tree builder.
///
/// `array<array<array<...>>>` nested deeper than this is reported as a
/// syntax error instead of overflowing the stack.
pub const MAX_TYPE_NESTING_DEPTH: u32 = 256;

/// Maximum recursion depth for a single containment query.
///
/// Exceeding it yields "not contained" and a warning.
pub const MAX_CONTAINMENT_DEPTH: u32 = 128;

/// Maximum number of literal members produced when expanding `int-mask<...>`.
///
/// `int-mask<1, 2, 4, ...>` expands to every bitwise combination; twelve
/// flags already yield 4096 literals.
pub const MAX_INT_MASK_COMBINATIONS: usize = 4096;

/// Maximum depth followed when flattening a declared inheritance graph.
pub const MAX_ANCESTRY_DEPTH: u32 = 64;
