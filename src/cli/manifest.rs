//! Declaration manifests.
//!
//! A manifest is a JSON description of class-likes, functions and constants
//! with their types written as annotation strings:
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "App\\Collection", "kind": "interface",
//!       "templates": [{ "name": "T", "variance": "covariant" }] }
//!   ],
//!   "functions": [
//!     { "name": "App\\first",
//!       "templates": [{ "name": "T" }],
//!       "params": [{ "name": "items", "type": "list<T>" }],
//!       "return_type": "T|null" }
//!   ],
//!   "constants": [{ "name": "App\\VERSION", "type": "'1.0'" }]
//! }
//! ```
//!
//! Loading never fails on a bad annotation. The offending type degrades to
//! `mixed` flagged as a failed resolution, and a warning is logged.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};
use tyshape_common::names::normalize_name;
use tyshape_parser::{ParserConfig, TypeScope, parse_type_in_scope};
use tyshape_solver::{
    ClassLikeKind, ClassLikeStorage, Codebase, CodebaseBuilder, ConstantStorage,
    FunctionLikeStorage, FunctionParamStorage, TUnion, TemplateDecl, Variance,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub classes: Vec<ClassManifest>,
    #[serde(default)]
    pub functions: Vec<FunctionManifest>,
    #[serde(default)]
    pub constants: Vec<ConstantManifest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassManifest {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: ClassLikeKind,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub templates: Vec<TemplateManifest>,
    #[serde(default)]
    pub cases: Vec<String>,
    #[serde(default)]
    pub builtin: bool,
    #[serde(default)]
    pub stubbed: bool,
}

fn default_kind() -> ClassLikeKind {
    ClassLikeKind::Class
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateManifest {
    pub name: String,
    /// Upper bound; `mixed` when absent.
    #[serde(default, rename = "as")]
    pub bound: Option<String>,
    #[serde(default)]
    pub variance: Variance,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionManifest {
    pub name: String,
    #[serde(default)]
    pub templates: Vec<TemplateManifest>,
    #[serde(default)]
    pub params: Vec<ParamManifest>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub throws: Vec<String>,
    #[serde(default)]
    pub builtin: bool,
    #[serde(default)]
    pub stubbed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamManifest {
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Literal type of the default value, e.g. `false` or `'utf-8'`.
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub by_ref: bool,
    #[serde(default)]
    pub variadic: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub builtin: bool,
    #[serde(default)]
    pub stubbed: bool,
}

/// Parse manifest JSON.
pub fn parse_manifest(source: &str) -> Result<Manifest> {
    serde_json::from_str(source).context("invalid declaration manifest")
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    parse_manifest(&source).with_context(|| format!("in {}", path.display()))
}

impl Manifest {
    /// Resolve every annotation and freeze the declarations into a
    /// [`Codebase`].
    pub fn build_codebase(&self, config: &ParserConfig) -> Codebase {
        let mut builder = CodebaseBuilder::new();

        for class in &self.classes {
            builder.add_classlike(class_storage(class, config));
        }
        for function in &self.functions {
            builder.add_function(function_storage(function, config));
        }
        for constant in &self.constants {
            let mut storage = ConstantStorage::new(
                constant.name.clone(),
                resolve_or_mixed(&constant.ty, config, &TypeScope::default(), &constant.name),
            );
            storage.is_builtin = constant.builtin;
            storage.is_stubbed = constant.stubbed;
            builder.add_constant(storage);
        }

        debug!(
            classes = self.classes.len(),
            functions = self.functions.len(),
            constants = self.constants.len(),
            "manifest loaded"
        );
        builder.build()
    }
}

fn class_storage(class: &ClassManifest, config: &ParserConfig) -> ClassLikeStorage {
    let scope = TypeScope::new().with_self_class(class.name.clone());
    let (templates, _) = resolve_templates(&class.templates, &class.name, config, scope);

    let mut storage = ClassLikeStorage::new(class.name.clone(), class.kind)
        .with_interfaces(class.interfaces.iter().cloned())
        .with_templates(templates)
        .with_cases(class.cases.iter().cloned());
    if let Some(parent) = &class.parent {
        storage = storage.with_parent(parent.clone());
    }
    storage.is_builtin = class.builtin;
    storage.is_stubbed = class.stubbed;
    storage
}

fn function_storage(function: &FunctionManifest, config: &ParserConfig) -> FunctionLikeStorage {
    let defining_entity = format!("fn-{}", normalize_name(&function.name));
    let (templates, scope) =
        resolve_templates(&function.templates, &defining_entity, config, TypeScope::new());

    let mut storage = FunctionLikeStorage::new(function.name.clone());
    storage.template_types = templates;
    for param in &function.params {
        let context = format!("{}(${})", function.name, param.name);
        let ty = param
            .ty
            .as_deref()
            .map(|text| resolve_or_mixed(text, config, &scope, &context));
        let mut param_storage = FunctionParamStorage::new(param.name.clone(), ty);
        param_storage.default_type = param
            .default
            .as_deref()
            .map(|text| resolve_or_mixed(text, config, &scope, &context));
        param_storage.by_ref = param.by_ref;
        param_storage.is_variadic = param.variadic;
        storage.params.push(param_storage);
    }
    storage.return_type = function
        .return_type
        .as_deref()
        .map(|text| resolve_or_mixed(text, config, &scope, &function.name));
    storage.throws = function.throws.clone();
    storage.is_builtin = function.builtin;
    storage.is_stubbed = function.stubbed;
    storage
}

/// Resolve template bounds in declaration order; each bound may refer to the
/// templates declared before it.
fn resolve_templates(
    templates: &[TemplateManifest],
    defining_entity: &str,
    config: &ParserConfig,
    mut scope: TypeScope,
) -> (Vec<TemplateDecl>, TypeScope) {
    let mut decls = Vec::with_capacity(templates.len());
    for template in templates {
        let bound = match &template.bound {
            Some(text) => resolve_or_mixed(text, config, &scope, defining_entity),
            None => TUnion::mixed(),
        };
        scope = scope.with_template(template.name.clone(), defining_entity, bound.clone());
        let mut decl = TemplateDecl::new(template.name.clone(), bound);
        decl.variance = template.variance;
        decls.push(decl);
    }
    (decls, scope)
}

fn resolve_or_mixed(text: &str, config: &ParserConfig, scope: &TypeScope, context: &str) -> TUnion {
    match parse_type_in_scope(text, config, scope) {
        Ok(union) => union,
        Err(err) => {
            warn!(declaration = context, text, %err, "type annotation failed to parse, using mixed");
            TUnion::failed_resolution()
        }
    }
}
