//! Target language version for native type rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The language version a stub file is written for.
///
/// Ordering is by version, so `target >= NativeTarget::new(8, 1)` reads as
/// "8.1 or later".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NativeTarget {
    pub major: u8,
    pub minor: u8,
}

impl Default for NativeTarget {
    fn default() -> Self {
        NativeTarget::PHP_8_0
    }
}

impl NativeTarget {
    pub const PHP_7_4: NativeTarget = NativeTarget::new(7, 4);
    pub const PHP_8_0: NativeTarget = NativeTarget::new(8, 0);
    pub const PHP_8_1: NativeTarget = NativeTarget::new(8, 1);
    pub const PHP_8_2: NativeTarget = NativeTarget::new(8, 2);

    pub const fn new(major: u8, minor: u8) -> Self {
        NativeTarget { major, minor }
    }

    /// `A|B` declarations, `mixed` and `static` returns.
    pub fn supports_union_types(self) -> bool {
        self >= NativeTarget::PHP_8_0
    }

    pub fn supports_mixed(self) -> bool {
        self >= NativeTarget::PHP_8_0
    }

    pub fn supports_static_return(self) -> bool {
        self >= NativeTarget::PHP_8_0
    }

    pub fn supports_never(self) -> bool {
        self >= NativeTarget::PHP_8_1
    }

    pub fn supports_intersections(self) -> bool {
        self >= NativeTarget::PHP_8_1
    }

    /// `null`, `true` and `false` as complete declarations.
    pub fn supports_standalone_literals(self) -> bool {
        self >= NativeTarget::PHP_8_2
    }
}

impl fmt::Display for NativeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetParseError {
    pub input: String,
}

impl fmt::Display for TargetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid target version `{}` (expected MAJOR.MINOR, e.g. 8.1)",
            self.input
        )
    }
}

impl std::error::Error for TargetParseError {}

impl FromStr for NativeTarget {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TargetParseError {
            input: s.to_string(),
        };
        let (major, minor) = s.trim().split_once('.').ok_or_else(err)?;
        let major = major.parse().map_err(|_| err())?;
        let minor = minor.parse().map_err(|_| err())?;
        Ok(NativeTarget::new(major, minor))
    }
}

#[cfg(test)]
#[path = "tests/target_tests.rs"]
mod tests;
