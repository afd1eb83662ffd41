//! Declaration registry.
//!
//! `CodebaseBuilder` collects class-likes, functions and constants, then
//! `build()` freezes them into an immutable `Codebase` with precomputed
//! transitive ancestry. The containment engine only ever sees the read-only
//! [`ClassLikeLookup`] view, so any number of threads may compare types
//! against one `Codebase` without synchronization.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};
use tyshape_common::limits::MAX_ANCESTRY_DEPTH;
use tyshape_common::names::normalize_name;

use crate::types::Variance;
use crate::union::TUnion;

// =============================================================================
// Lookup seam
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLikeKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl ClassLikeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassLikeKind::Class => "class",
            ClassLikeKind::Interface => "interface",
            ClassLikeKind::Trait => "trait",
            ClassLikeKind::Enum => "enum",
        }
    }
}

/// Read-only nominal information consumed by containment.
///
/// All names are compared case-insensitively. Unknown names have no
/// ancestors, covariant parameters and no enum cases.
pub trait ClassLikeLookup {
    fn kind(&self, name: &str) -> Option<ClassLikeKind>;

    /// Transitive parents and implemented interfaces, nearest first.
    fn ancestors(&self, name: &str) -> &[String];

    fn generic_variance(&self, name: &str, param_index: usize) -> Variance;

    /// Case names of an enum, in declaration order.
    fn enum_cases(&self, name: &str) -> Option<&[String]>;

    fn class_exists(&self, name: &str) -> bool {
        self.kind(name).is_some()
    }

    fn is_enum(&self, name: &str) -> bool {
        self.kind(name) == Some(ClassLikeKind::Enum)
    }

    /// `child` is `parent` or has it among its ancestors.
    fn is_subtype_of(&self, child: &str, parent: &str) -> bool {
        let child = child.trim_start_matches('\\');
        let parent = parent.trim_start_matches('\\');
        child.eq_ignore_ascii_case(parent)
            || self
                .ancestors(child)
                .iter()
                .any(|ancestor| ancestor.eq_ignore_ascii_case(parent))
    }
}

// =============================================================================
// Storage records
// =============================================================================

/// A template parameter declared on a class-like or function.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateDecl {
    pub name: String,
    pub as_type: TUnion,
    pub variance: Variance,
}

impl TemplateDecl {
    pub fn new(name: impl Into<String>, as_type: TUnion) -> Self {
        TemplateDecl {
            name: name.into(),
            as_type,
            variance: Variance::Covariant,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClassLikeStorage {
    /// Fully-qualified name as declared.
    pub name: String,
    pub kind: ClassLikeKind,
    pub parent: Option<String>,
    /// Implemented interfaces (for interfaces: extended interfaces).
    pub interfaces: Vec<String>,
    pub template_types: Vec<TemplateDecl>,
    pub enum_cases: Vec<String>,
    /// Declared by the analyzer's own stub sources.
    pub is_builtin: bool,
    /// Already covered by an external stub file.
    pub is_stubbed: bool,
}

impl ClassLikeStorage {
    pub fn new(name: impl Into<String>, kind: ClassLikeKind) -> Self {
        ClassLikeStorage {
            name: name.into(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            template_types: Vec::new(),
            enum_cases: Vec::new(),
            is_builtin: false,
            is_stubbed: false,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_interfaces<S: Into<String>>(mut self, interfaces: impl IntoIterator<Item = S>) -> Self {
        self.interfaces = interfaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_templates(mut self, templates: Vec<TemplateDecl>) -> Self {
        self.template_types = templates;
        self
    }

    pub fn with_cases<S: Into<String>>(mut self, cases: impl IntoIterator<Item = S>) -> Self {
        self.enum_cases = cases.into_iter().map(Into::into).collect();
        self
    }

    fn direct_parents(&self) -> impl Iterator<Item = &String> {
        self.parent.iter().chain(self.interfaces.iter())
    }
}

#[derive(Clone, Debug)]
pub struct FunctionParamStorage {
    pub name: String,
    /// Resolved declared type (docblock or native). `None` means untyped.
    pub ty: Option<TUnion>,
    /// Type of the default value, when the parameter has one.
    pub default_type: Option<TUnion>,
    pub by_ref: bool,
    pub is_variadic: bool,
}

impl FunctionParamStorage {
    pub fn new(name: impl Into<String>, ty: Option<TUnion>) -> Self {
        FunctionParamStorage {
            name: name.into(),
            ty,
            default_type: None,
            by_ref: false,
            is_variadic: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FunctionLikeStorage {
    /// Lowercased fully-qualified name used as the registry key.
    pub id: String,
    /// Name with original casing. Generation refuses to run without it.
    pub cased_name: Option<String>,
    pub params: Vec<FunctionParamStorage>,
    pub return_type: Option<TUnion>,
    pub template_types: Vec<TemplateDecl>,
    pub throws: Vec<String>,
    pub is_builtin: bool,
    pub is_stubbed: bool,
}

impl FunctionLikeStorage {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        FunctionLikeStorage {
            id: normalize_name(&name),
            cased_name: Some(name.trim_start_matches('\\').to_string()),
            params: Vec::new(),
            return_type: None,
            template_types: Vec::new(),
            throws: Vec::new(),
            is_builtin: false,
            is_stubbed: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConstantStorage {
    pub name: String,
    pub ty: TUnion,
    pub is_builtin: bool,
    pub is_stubbed: bool,
}

impl ConstantStorage {
    pub fn new(name: impl Into<String>, ty: TUnion) -> Self {
        ConstantStorage {
            name: name.into(),
            ty,
            is_builtin: false,
            is_stubbed: false,
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

#[derive(Default)]
pub struct CodebaseBuilder {
    classlikes: FxHashMap<String, ClassLikeStorage>,
    functions: Vec<FunctionLikeStorage>,
    constants: FxHashMap<String, ConstantStorage>,
}

impl CodebaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class-like. A later registration with the same name wins.
    pub fn add_classlike(&mut self, storage: ClassLikeStorage) -> &mut Self {
        self.classlikes.insert(normalize_name(&storage.name), storage);
        self
    }

    /// Register a function. Duplicates are kept here and resolved by `build`.
    pub fn add_function(&mut self, storage: FunctionLikeStorage) -> &mut Self {
        self.functions.push(storage);
        self
    }

    pub fn add_constant(&mut self, storage: ConstantStorage) -> &mut Self {
        self.constants.insert(normalize_name(&storage.name), storage);
        self
    }

    /// Freeze the registry and compute transitive ancestry.
    pub fn build(self) -> Codebase {
        let mut ancestors = FxHashMap::default();
        for key in self.classlikes.keys() {
            ancestors.insert(key.clone(), collect_ancestors(&self.classlikes, key));
        }

        // First registration of a function id wins.
        let mut functions: FxHashMap<String, FunctionLikeStorage> = FxHashMap::default();
        for function in self.functions {
            if functions.contains_key(&function.id) {
                debug!(function = %function.id, "duplicate function registration ignored");
                continue;
            }
            functions.insert(function.id.clone(), function);
        }

        Codebase {
            classlikes: self.classlikes,
            ancestors,
            functions,
            constants: self.constants,
        }
    }
}

fn collect_ancestors(classlikes: &FxHashMap<String, ClassLikeStorage>, key: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    seen.insert(key.to_string());

    let mut queue: VecDeque<(String, u32)> = VecDeque::new();
    if let Some(storage) = classlikes.get(key) {
        for parent in storage.direct_parents() {
            queue.push_back((parent.trim_start_matches('\\').to_string(), 1));
        }
    }

    while let Some((name, depth)) = queue.pop_front() {
        let normalized = normalize_name(&name);
        if !seen.insert(normalized.clone()) {
            continue;
        }
        if depth > MAX_ANCESTRY_DEPTH {
            warn!(class = key, "inheritance chain too deep, ancestry truncated");
            break;
        }
        // Unknown ancestors are still recorded by their written name.
        let storage = classlikes.get(&normalized);
        result.push(storage.map_or(name, |storage| storage.name.trim_start_matches('\\').to_string()));
        if let Some(storage) = storage {
            for parent in storage.direct_parents() {
                queue.push_back((parent.trim_start_matches('\\').to_string(), depth + 1));
            }
        }
    }
    result
}

// =============================================================================
// Codebase
// =============================================================================

/// Immutable declaration registry.
#[derive(Default)]
pub struct Codebase {
    classlikes: FxHashMap<String, ClassLikeStorage>,
    ancestors: FxHashMap<String, Vec<String>>,
    functions: FxHashMap<String, FunctionLikeStorage>,
    constants: FxHashMap<String, ConstantStorage>,
}

impl Codebase {
    /// A registry with no declarations.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get_classlike(&self, name: &str) -> Option<&ClassLikeStorage> {
        self.classlikes.get(&normalize_name(name))
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionLikeStorage> {
        self.functions.get(&normalize_name(name))
    }

    pub fn get_constant(&self, name: &str) -> Option<&ConstantStorage> {
        self.constants.get(&normalize_name(name))
    }

    pub fn classlikes(&self) -> impl Iterator<Item = &ClassLikeStorage> {
        self.classlikes.values()
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionLikeStorage> {
        self.functions.values()
    }

    pub fn constants(&self) -> impl Iterator<Item = &ConstantStorage> {
        self.constants.values()
    }
}

impl ClassLikeLookup for Codebase {
    fn kind(&self, name: &str) -> Option<ClassLikeKind> {
        self.get_classlike(name).map(|storage| storage.kind)
    }

    fn ancestors(&self, name: &str) -> &[String] {
        self.ancestors
            .get(&normalize_name(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn generic_variance(&self, name: &str, param_index: usize) -> Variance {
        self.get_classlike(name)
            .and_then(|storage| storage.template_types.get(param_index))
            .map_or(Variance::Covariant, |template| template.variance)
    }

    fn enum_cases(&self, name: &str) -> Option<&[String]> {
        self.get_classlike(name)
            .filter(|storage| storage.kind == ClassLikeKind::Enum)
            .map(|storage| storage.enum_cases.as_slice())
    }
}

#[cfg(test)]
#[path = "tests/codebase_tests.rs"]
mod tests;
