//! Fully-qualified name helpers.
//!
//! Names are stored without a leading backslash (`Foo\Bar`). Class-like and
//! function names compare case-insensitively, so registries key on
//! [`normalize_name`].

/// Strip a leading `\` from a written name.
pub fn strip_leading_separator(name: &str) -> &str {
    name.strip_prefix('\\').unwrap_or(name)
}

/// Lowercased lookup key for a class-like or function name.
pub fn normalize_name(name: &str) -> String {
    strip_leading_separator(name).to_ascii_lowercase()
}

/// Split `A\B\c` into (`A\B`, `c`). The global namespace is the empty string.
pub fn split_namespace(fq_name: &str) -> (&str, &str) {
    let fq_name = strip_leading_separator(fq_name);
    match fq_name.rfind('\\') {
        Some(idx) => (&fq_name[..idx], &fq_name[idx + 1..]),
        None => ("", fq_name),
    }
}

/// A fully-qualified name that knows how to render itself relative to a
/// namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FqName<'a>(pub &'a str);

impl<'a> FqName<'a> {
    pub fn new(name: &'a str) -> Self {
        FqName(strip_leading_separator(name))
    }

    pub fn namespace(&self) -> &'a str {
        split_namespace(self.0).0
    }

    pub fn short_name(&self) -> &'a str {
        split_namespace(self.0).1
    }

    /// Render relative to `namespace`.
    ///
    /// Names inside `namespace` (or one of its sub-namespaces) lose the shared
    /// prefix; everything else is rendered fully qualified with a leading `\`.
    /// In the global namespace, names without a namespace render bare.
    pub fn relative_to(&self, namespace: &str) -> String {
        let namespace = strip_leading_separator(namespace);
        if namespace.is_empty() {
            if self.namespace().is_empty() {
                return self.0.to_string();
            }
            return format!("\\{}", self.0);
        }

        if self.0.len() > namespace.len() + 1
            && self.0.as_bytes()[namespace.len()] == b'\\'
            && self.0[..namespace.len()].eq_ignore_ascii_case(namespace)
        {
            return self.0[namespace.len() + 1..].to_string();
        }

        format!("\\{}", self.0)
    }

    /// Always-qualified rendering (`\A\B`).
    pub fn fully_qualified(&self) -> String {
        format!("\\{}", self.0)
    }
}

#[cfg(test)]
#[path = "tests/names_tests.rs"]
mod tests;
