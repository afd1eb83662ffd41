//! String refinement compatibility matrix and literal predicates.
//!
//! Refinements are not a chain. A literal may satisfy several independent
//! refinements at once, and bare-kind containment between refinements is
//! listed here pair by pair. The table is deliberately not closed under
//! transitivity: each row names every refinement the kind is contained by.

use crate::types::StringRefinement;

use StringRefinement as R;

/// Every refinement that a value of `child` is guaranteed to satisfy.
fn supersets(child: StringRefinement) -> &'static [StringRefinement] {
    match child {
        R::Plain => &[R::Plain],
        R::NonEmpty => &[R::NonEmpty, R::Plain],
        R::NonFalsy => &[R::NonFalsy, R::NonEmpty, R::Plain],
        R::Lowercase => &[R::Lowercase, R::Plain],
        R::NonEmptyLowercase => &[R::NonEmptyLowercase, R::Lowercase, R::NonEmpty, R::Plain],
        // "0" is numeric and falsy
        R::Numeric => &[R::Numeric, R::NonEmpty, R::Plain],
        // Function and method names resolve case-insensitively, so a
        // callable string is treated as its lowercase spelling.
        R::Callable => &[
            R::Callable,
            R::NonEmpty,
            R::NonFalsy,
            R::Lowercase,
            R::NonEmptyLowercase,
            R::Plain,
        ],
        R::Literal => &[R::Literal, R::Plain],
        R::NonEmptyLiteral => &[R::NonEmptyLiteral, R::Literal, R::NonEmpty, R::Plain],
        R::HtmlEscaped => &[R::HtmlEscaped, R::Plain],
        R::MysqlEscaped => &[R::MysqlEscaped, R::Plain],
        R::ClassString => &[R::ClassString, R::NonEmpty, R::NonFalsy, R::Plain],
        R::InterfaceString => &[
            R::InterfaceString,
            R::ClassString,
            R::NonEmpty,
            R::NonFalsy,
            R::Plain,
        ],
        R::EnumString => &[
            R::EnumString,
            R::ClassString,
            R::NonEmpty,
            R::NonFalsy,
            R::Plain,
        ],
        R::TraitString => &[R::TraitString, R::NonEmpty, R::NonFalsy, R::Plain],
    }
}

/// Whether every string of refinement `child` also has refinement `parent`.
pub fn is_refinement_contained_by(child: StringRefinement, parent: StringRefinement) -> bool {
    supersets(child).contains(&parent)
}

/// Whether the literal string `value` satisfies `refinement`.
///
/// Class-like refinements are never satisfied by a plain literal; only a
/// `Foo::class` literal is a class string.
pub fn literal_satisfies(value: &str, refinement: StringRefinement) -> bool {
    match refinement {
        R::Plain | R::Literal => true,
        R::NonEmpty | R::NonEmptyLiteral => !value.is_empty(),
        R::NonFalsy => !value.is_empty() && value != "0",
        R::Lowercase => is_lowercase(value),
        R::NonEmptyLowercase => !value.is_empty() && is_lowercase(value),
        R::Numeric => is_numeric_string(value),
        R::Callable => is_callable_string(value),
        R::HtmlEscaped => !value.contains(['<', '>', '&', '"', '\'']),
        R::MysqlEscaped => !value.contains(['\'', '"', '\0', '\n', '\r', '\x1a']),
        R::ClassString | R::InterfaceString | R::EnumString | R::TraitString => false,
    }
}

/// Refinements a `Foo::class` literal satisfies.
pub fn class_literal_satisfies(refinement: StringRefinement) -> bool {
    matches!(
        refinement,
        R::Plain | R::NonEmpty | R::NonFalsy | R::Literal | R::NonEmptyLiteral | R::ClassString
    )
}

fn is_lowercase(value: &str) -> bool {
    !value.chars().any(char::is_uppercase)
}

/// Numeric string in the runtime's sense: optional surrounding whitespace,
/// optional sign, digits with an optional fraction, optional exponent.
pub fn is_numeric_string(value: &str) -> bool {
    let trimmed = value.trim_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let bytes = trimmed.as_bytes();
    let mut idx = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }

    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let mut digits = idx - int_start;

    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        let frac_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        digits += idx - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if idx < bytes.len() && matches!(bytes[idx], b'e' | b'E') {
        idx += 1;
        if matches!(bytes.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        let exp_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == exp_start {
            return false;
        }
    }

    idx == bytes.len()
}

/// `name`, `Ns\name` or `Class::method`, each part a valid identifier.
pub fn is_callable_string(value: &str) -> bool {
    let (target, method) = match value.split_once("::") {
        Some((class, method)) => (class, Some(method)),
        None => (value, None),
    };

    let target = target.strip_prefix('\\').unwrap_or(target);
    if target.is_empty() || !target.split('\\').all(is_identifier) {
        return false;
    }
    method.is_none_or(is_identifier)
}

pub fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || !first.is_ascii() => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || !ch.is_ascii())
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/refinement_tests.rs"]
mod tests;
