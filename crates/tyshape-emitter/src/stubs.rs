//! Stub file generation.
//!
//! Emits one braced `namespace` block per namespace of a [`Codebase`] with
//! body-less declarations for every class-like, function and constant that
//! is not already covered by built-in or external stubs.
//!
//! ```text
//! <?php
//!
//! namespace App {
//!     class User extends Model
//!     {
//!     }
//!
//!     /**
//!      * @param list<int> $ids
//!      */
//!     function load(array $ids, bool $fresh = false): ?User
//!     {
//!     }
//! }
//! ```
//!
//! Namespaces are emitted in lexicographic order, and declarations within a
//! namespace by fully-qualified name, so regenerating from an unchanged
//! registry is byte-identical.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use tyshape_common::names::{normalize_name, split_namespace, strip_leading_separator};
use tyshape_common::FqName;
use tyshape_solver::{
    ClassLikeKind, ClassLikeStorage, Codebase, ConstantStorage, FunctionLikeStorage,
    FunctionParamStorage, TUnion,
};

use crate::docblock::{DocTag, Docblock};
use crate::literal::to_literal_expression;
use crate::native::{NativeTypePrinter, TypePosition};
use crate::target::NativeTarget;
use crate::writer::SourceWriter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StubGenerationError {
    /// A function record lost its cased name. Emitting it would produce a
    /// declaration under the wrong name, so generation stops.
    MissingFunctionName { id: String },
}

impl fmt::Display for StubGenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StubGenerationError::MissingFunctionName { id } => {
                write!(f, "function `{id}` has no cased name")
            }
        }
    }
}

impl std::error::Error for StubGenerationError {}

/// Tie-breaker when a class-like, function and constant share a name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DeclKind {
    ClassLike,
    Function,
    Constant,
}

enum StubDecl<'a> {
    ClassLike(&'a ClassLikeStorage),
    Function {
        storage: &'a FunctionLikeStorage,
        short_name: &'a str,
    },
    Constant {
        storage: &'a ConstantStorage,
        short_name: &'a str,
    },
}

type NamespaceDecls<'a> = BTreeMap<(&'a str, DeclKind), StubDecl<'a>>;

pub struct StubGenerator<'a> {
    codebase: &'a Codebase,
    target: NativeTarget,
}

impl<'a> StubGenerator<'a> {
    pub fn new(codebase: &'a Codebase) -> Self {
        StubGenerator {
            codebase,
            target: NativeTarget::default(),
        }
    }

    pub fn with_target(mut self, target: NativeTarget) -> Self {
        self.target = target;
        self
    }

    pub fn generate(&self) -> Result<String, StubGenerationError> {
        let namespaces = self.collect()?;

        let mut writer = SourceWriter::new();
        writer.write("<?php");
        writer.write_line();
        for (namespace, decls) in &namespaces {
            debug!(namespace, declarations = decls.len(), "emitting namespace");
            writer.write_line();
            self.write_namespace(&mut writer, namespace, decls);
        }
        Ok(writer.into_output())
    }

    fn collect(&self) -> Result<BTreeMap<&'a str, NamespaceDecls<'a>>, StubGenerationError> {
        let mut namespaces: BTreeMap<&'a str, NamespaceDecls<'a>> = BTreeMap::new();

        for classlike in self.codebase.classlikes() {
            if classlike.is_builtin || classlike.is_stubbed {
                trace!(class = %classlike.name, "already stubbed, skipped");
                continue;
            }
            let fq_name = strip_leading_separator(&classlike.name);
            let (namespace, _) = split_namespace(fq_name);
            namespaces
                .entry(namespace)
                .or_default()
                .insert((fq_name, DeclKind::ClassLike), StubDecl::ClassLike(classlike));
        }

        let mut functions: Vec<&FunctionLikeStorage> = self.codebase.functions().collect();
        functions.sort_by(|a, b| a.id.cmp(&b.id));
        let mut seen_functions: FxHashSet<String> = FxHashSet::default();
        for storage in functions {
            if storage.is_builtin || storage.is_stubbed {
                trace!(function = %storage.id, "already stubbed, skipped");
                continue;
            }
            let Some(cased_name) = storage.cased_name.as_deref() else {
                return Err(StubGenerationError::MissingFunctionName {
                    id: storage.id.clone(),
                });
            };
            if !seen_functions.insert(normalize_name(cased_name)) {
                continue;
            }
            let fq_name = strip_leading_separator(cased_name);
            let (namespace, short_name) = split_namespace(fq_name);
            namespaces.entry(namespace).or_default().insert(
                (fq_name, DeclKind::Function),
                StubDecl::Function {
                    storage,
                    short_name,
                },
            );
        }

        for storage in self.codebase.constants() {
            if storage.is_builtin || storage.is_stubbed {
                trace!(constant = %storage.name, "already stubbed, skipped");
                continue;
            }
            if storage.ty.is_mixed() {
                continue;
            }
            let fq_name = strip_leading_separator(&storage.name);
            let (namespace, short_name) = split_namespace(fq_name);
            namespaces.entry(namespace).or_default().insert(
                (fq_name, DeclKind::Constant),
                StubDecl::Constant {
                    storage,
                    short_name,
                },
            );
        }

        Ok(namespaces)
    }

    fn write_namespace(&self, writer: &mut SourceWriter, namespace: &str, decls: &NamespaceDecls<'_>) {
        if namespace.is_empty() {
            writer.write_indented_line("namespace {");
        } else {
            writer.write_indented_line(&format!("namespace {namespace} {{"));
        }
        writer.increase_indent();
        for (index, decl) in decls.values().enumerate() {
            if index > 0 {
                writer.write_line();
            }
            match decl {
                StubDecl::ClassLike(storage) => write_classlike(writer, namespace, storage),
                StubDecl::Function {
                    storage,
                    short_name,
                } => self.write_function(writer, namespace, short_name, storage),
                StubDecl::Constant {
                    storage,
                    short_name,
                } => {
                    let value = to_literal_expression(&storage.ty);
                    writer.write_indented_line(&format!("const {short_name} = {value};"));
                }
            }
        }
        writer.decrease_indent();
        writer.write_indented_line("}");
    }

    fn write_function(
        &self,
        writer: &mut SourceWriter,
        namespace: &str,
        short_name: &str,
        storage: &FunctionLikeStorage,
    ) {
        let printer = NativeTypePrinter::new(namespace, self.target);
        let mut docblock = Docblock::new();

        for template in &storage.template_types {
            docblock.push(DocTag::Template {
                name: template.name.clone(),
                bound: template.as_type.clone(),
            });
        }

        let mut params = Vec::with_capacity(storage.params.len());
        for param in &storage.params {
            let native = native_or_tag(
                &printer,
                param.ty.as_ref(),
                TypePosition::Parameter,
                &mut docblock,
                |ty| DocTag::Param {
                    name: param.name.clone(),
                    ty,
                },
            );
            params.push(param_text(param, native));
        }

        let return_native = native_or_tag(
            &printer,
            storage.return_type.as_ref(),
            TypePosition::Return,
            &mut docblock,
            DocTag::Return,
        );

        for exception in &storage.throws {
            docblock.push(DocTag::Throws(exception.clone()));
        }

        docblock.write_to(writer, namespace);
        let mut signature = format!("function {short_name}({})", params.join(", "));
        if let Some(return_native) = return_native {
            signature.push_str(": ");
            signature.push_str(&return_native);
        }
        writer.write_indented_line(&signature);
        writer.write_indented_line("{");
        writer.write_indented_line("}");
    }
}

/// Native declaration text for `ty`, adding a precise docblock tag when the
/// native form is lossy or missing.
fn native_or_tag(
    printer: &NativeTypePrinter<'_>,
    ty: Option<&TUnion>,
    position: TypePosition,
    docblock: &mut Docblock,
    tag: impl FnOnce(TUnion) -> DocTag,
) -> Option<String> {
    let ty = ty?;
    match printer.print(ty, position) {
        Ok(native) if native.exact => Some(native.text),
        Ok(native) => {
            docblock.push(tag(ty.clone()));
            Some(native.text)
        }
        Err(err) => {
            debug!(%err, "falling back to a docblock type");
            docblock.push(tag(ty.clone()));
            None
        }
    }
}

fn param_text(param: &FunctionParamStorage, native: Option<String>) -> String {
    let mut text = String::new();
    if let Some(native) = native {
        text.push_str(&native);
        text.push(' ');
    }
    if param.by_ref {
        text.push('&');
    }
    if param.is_variadic {
        text.push_str("...");
    }
    text.push('$');
    text.push_str(&param.name);
    if let Some(default) = param.default_type.as_ref().filter(|_| !param.is_variadic) {
        text.push_str(" = ");
        text.push_str(&to_literal_expression(default));
    }
    text
}

fn write_classlike(writer: &mut SourceWriter, namespace: &str, storage: &ClassLikeStorage) {
    let fq_name = strip_leading_separator(&storage.name);
    let (_, short_name) = split_namespace(fq_name);
    let relative = |name: &String| FqName::new(name).relative_to(namespace);

    let mut header = format!("{} {short_name}", storage.kind.keyword());
    match storage.kind {
        ClassLikeKind::Class => {
            if let Some(parent) = &storage.parent {
                header.push_str(&format!(" extends {}", relative(parent)));
            }
            if !storage.interfaces.is_empty() {
                let names: Vec<String> = storage.interfaces.iter().map(relative).collect();
                header.push_str(&format!(" implements {}", names.join(", ")));
            }
        }
        ClassLikeKind::Interface => {
            let names: Vec<String> = storage
                .parent
                .iter()
                .chain(storage.interfaces.iter())
                .map(relative)
                .collect();
            if !names.is_empty() {
                header.push_str(&format!(" extends {}", names.join(", ")));
            }
        }
        ClassLikeKind::Enum => {
            if !storage.interfaces.is_empty() {
                let names: Vec<String> = storage.interfaces.iter().map(relative).collect();
                header.push_str(&format!(" implements {}", names.join(", ")));
            }
        }
        ClassLikeKind::Trait => {}
    }

    writer.write_indented_line(&header);
    writer.write_indented_line("{");
    writer.write_indented_line("}");
}

/// Stub file for every declaration of `codebase` not already stubbed.
pub fn generate_stubs(codebase: &Codebase, target: NativeTarget) -> Result<String, StubGenerationError> {
    StubGenerator::new(codebase).with_target(target).generate()
}

#[cfg(test)]
#[path = "tests/stubs_tests.rs"]
mod tests;
