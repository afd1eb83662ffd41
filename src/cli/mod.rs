//! Command-line support for the tyshape binary.

pub mod args;
pub mod driver;
pub mod manifest;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/manifest_tests.rs"]
mod manifest_tests;
