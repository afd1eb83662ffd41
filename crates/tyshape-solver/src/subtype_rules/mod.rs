//! Containment rule families.
//!
//! Each submodule adds methods to [`ContainmentChecker`](crate::subtype::ContainmentChecker)
//! for one group of atomic pairs.

mod arrays;
mod callables;
mod objects;
mod scalars;
