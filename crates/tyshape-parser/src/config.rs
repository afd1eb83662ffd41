//! Parser configuration and per-declaration scope.
//!
//! `ParserConfig` is built once by the host and shared by reference across
//! every parse call (and thread). `TypeScope` is cheap and describes the
//! declaration an annotation belongs to: templates in scope and the class
//! that `self`/`static` refer to.

use rustc_hash::FxHashMap;
use tyshape_common::limits::MAX_TYPE_NESTING_DEPTH;
use tyshape_solver::{TGenericParam, TUnion};

use crate::reserved::ReservedWordTable;

#[derive(Clone, Debug)]
pub struct ParserConfig {
    pub reserved_words: ReservedWordTable,
    pub max_nesting_depth: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            reserved_words: ReservedWordTable::standard(),
            max_nesting_depth: MAX_TYPE_NESTING_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn new(reserved_words: ReservedWordTable) -> Self {
        ParserConfig {
            reserved_words,
            ..ParserConfig::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TypeScope {
    templates: FxHashMap<String, TGenericParam>,
    self_class: Option<String>,
}

impl TypeScope {
    pub fn new() -> Self {
        TypeScope::default()
    }

    /// Bring template `name`, declared by `defining_entity` with constraint
    /// `as_type`, into scope.
    pub fn with_template(
        mut self,
        name: impl Into<String>,
        defining_entity: impl Into<String>,
        as_type: TUnion,
    ) -> Self {
        let name = name.into();
        self.templates.insert(
            name.clone(),
            TGenericParam {
                name,
                defining_entity: defining_entity.into(),
                as_type,
            },
        );
        self
    }

    /// The class `self` and `static` resolve to.
    pub fn with_self_class(mut self, class_name: impl Into<String>) -> Self {
        self.self_class = Some(class_name.into());
        self
    }

    pub fn template(&self, name: &str) -> Option<&TGenericParam> {
        self.templates.get(name)
    }

    pub fn self_class(&self) -> Option<&str> {
        self.self_class.as_deref()
    }
}
