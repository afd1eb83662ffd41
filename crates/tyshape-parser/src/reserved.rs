//! Reserved type keywords.
//!
//! The table is built once by the embedding host and passed to the parser by
//! reference inside a [`ParserConfig`](crate::ParserConfig). Lookups are
//! case-insensitive; names are stored lowercased with the canonical spelling
//! kept for display.

use rustc_hash::FxHashMap;

/// How many generic arguments a keyword takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenericArity {
    /// Never parameterized (`string`, `null`).
    None,
    /// Bare, or with `min..=max` arguments (`array`, `array<V>`, `array<K, V>`).
    Optional { min: usize, max: Option<usize> },
    /// Only meaningful with arguments (`key-of<T>`).
    Required { min: usize, max: Option<usize> },
}

impl GenericArity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            GenericArity::None => count == 0,
            GenericArity::Optional { min, max } | GenericArity::Required { min, max } => {
                count >= min && max.is_none_or(|max| count <= max)
            }
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, GenericArity::Required { .. })
    }

    /// Human readable argument count, for error messages.
    pub fn describe(self) -> String {
        match self {
            GenericArity::None => "no generic arguments".to_string(),
            GenericArity::Optional { min, max } | GenericArity::Required { min, max } => {
                match max {
                    Some(max) if max == min => format!("{min} generic argument(s)"),
                    Some(max) => format!("{min} to {max} generic arguments"),
                    None => format!("at least {min} generic argument(s)"),
                }
            }
        }
    }
}

/// Whether a keyword may or must be followed by a `(...)` signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureSupport {
    None,
    Optional,
    Required,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservedWord {
    /// Canonical spelling, e.g. `pure-Closure`.
    pub name: &'static str,
    pub arity: GenericArity,
    pub signature: SignatureSupport,
    /// Still understood, but analysis should no longer rely on it.
    pub deprecated: bool,
}

impl ReservedWord {
    const fn plain(name: &'static str) -> Self {
        ReservedWord {
            name,
            arity: GenericArity::None,
            signature: SignatureSupport::None,
            deprecated: false,
        }
    }

    const fn generic(name: &'static str, min: usize, max: usize) -> Self {
        ReservedWord {
            name,
            arity: GenericArity::Optional {
                min,
                max: Some(max),
            },
            signature: SignatureSupport::None,
            deprecated: false,
        }
    }

    const fn requires_generics(name: &'static str, min: usize, max: Option<usize>) -> Self {
        ReservedWord {
            name,
            arity: GenericArity::Required { min, max },
            signature: SignatureSupport::None,
            deprecated: false,
        }
    }

    const fn callable(name: &'static str, signature: SignatureSupport) -> Self {
        ReservedWord {
            name,
            arity: GenericArity::None,
            signature,
            deprecated: false,
        }
    }

    const fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Usable as a complete type on its own, with no generics or signature.
    pub fn is_standalone(&self) -> bool {
        !self.arity.is_required() && self.signature != SignatureSupport::Required
    }
}

/// Current revision of the keyword set. Bumped whenever a word is added or
/// its arity changes, so cached parse results can be invalidated.
pub const RESERVED_WORDS_REVISION: u32 = 3;

const STANDARD_WORDS: &[ReservedWord] = &[
    // scalars and aliases
    ReservedWord::plain("bool"),
    ReservedWord::plain("boolean"),
    ReservedWord::plain("true"),
    ReservedWord::plain("false"),
    ReservedWord::generic("int", 2, 2),
    ReservedWord::plain("integer"),
    ReservedWord::plain("positive-int"),
    ReservedWord::plain("negative-int"),
    ReservedWord::plain("non-positive-int"),
    ReservedWord::plain("non-negative-int"),
    ReservedWord::plain("literal-int"),
    ReservedWord::plain("float"),
    ReservedWord::plain("double"),
    ReservedWord::plain("real"),
    ReservedWord::plain("string"),
    ReservedWord::plain("non-empty-string"),
    ReservedWord::plain("non-falsy-string"),
    ReservedWord::plain("lowercase-string"),
    ReservedWord::plain("non-empty-lowercase-string"),
    ReservedWord::plain("numeric-string"),
    ReservedWord::plain("callable-string"),
    ReservedWord::plain("literal-string"),
    ReservedWord::plain("non-empty-literal-string"),
    ReservedWord::plain("html-escaped-string"),
    ReservedWord::plain("mysql-escaped-string").deprecated(),
    ReservedWord::generic("class-string", 1, 1),
    ReservedWord::generic("interface-string", 1, 1),
    ReservedWord::generic("enum-string", 1, 1),
    ReservedWord::generic("trait-string", 1, 1),
    ReservedWord::plain("array-key"),
    ReservedWord::plain("numeric"),
    ReservedWord::plain("scalar"),
    // singletons and top/bottom
    ReservedWord::plain("null"),
    ReservedWord::plain("void"),
    ReservedWord::plain("mixed"),
    ReservedWord::plain("never"),
    ReservedWord::plain("no-return"),
    ReservedWord::plain("never-return"),
    ReservedWord::plain("never-returns"),
    ReservedWord::plain("empty"),
    // collections
    ReservedWord::generic("array", 1, 2),
    ReservedWord::generic("non-empty-array", 1, 2),
    ReservedWord::generic("list", 1, 1),
    ReservedWord::generic("non-empty-list", 1, 1),
    ReservedWord::generic("iterable", 1, 2),
    ReservedWord::requires_generics("key-of", 1, Some(1)),
    ReservedWord::requires_generics("value-of", 1, Some(1)),
    ReservedWord::requires_generics("class-string-map", 2, Some(2)),
    ReservedWord::requires_generics("arraylike-object", 2, Some(2)),
    ReservedWord::requires_generics("int-mask", 1, None),
    ReservedWord::requires_generics("int-mask-of", 1, Some(1)),
    // objects
    ReservedWord::plain("object"),
    ReservedWord::plain("stringable-object"),
    ReservedWord::plain("non-empty-countable"),
    ReservedWord {
        name: "self",
        arity: GenericArity::Optional { min: 1, max: None },
        signature: SignatureSupport::None,
        deprecated: false,
    },
    ReservedWord {
        name: "static",
        arity: GenericArity::Optional { min: 1, max: None },
        signature: SignatureSupport::None,
        deprecated: false,
    },
    // callables
    ReservedWord::callable("callable", SignatureSupport::Optional),
    ReservedWord::callable("pure-callable", SignatureSupport::Optional),
    ReservedWord::callable("pure-Closure", SignatureSupport::Required),
    ReservedWord::plain("callable-array"),
    ReservedWord::plain("callable-object"),
    // resources
    ReservedWord::plain("resource"),
    ReservedWord::plain("open-resource"),
    ReservedWord::plain("closed-resource"),
];

#[derive(Clone, Debug)]
pub struct ReservedWordTable {
    revision: u32,
    words: FxHashMap<String, ReservedWord>,
}

impl Default for ReservedWordTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReservedWordTable {
    /// The full keyword set of the current revision.
    pub fn standard() -> Self {
        let words = STANDARD_WORDS
            .iter()
            .map(|word| (word.name.to_ascii_lowercase(), *word))
            .collect();
        ReservedWordTable {
            revision: RESERVED_WORDS_REVISION,
            words,
        }
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn get(&self, word: &str) -> Option<&ReservedWord> {
        if word.starts_with('\\') {
            return None;
        }
        self.words.get(&word.to_ascii_lowercase())
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// All words, sorted by canonical name.
    pub fn words(&self) -> Vec<&ReservedWord> {
        let mut words: Vec<&ReservedWord> = self.words.values().collect();
        words.sort_by_key(|word| word.name);
        words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/reserved_tests.rs"]
mod tests;
