//! Documentation-comment tags for generated declarations.
//!
//! Only the tags the stub generator needs: templates, precise parameter and
//! return types, and thrown exceptions. Types render in annotation syntax
//! relative to the namespace of the declaration.

use tyshape_common::FqName;
use tyshape_solver::{TUnion, TypeFormatter};

use crate::writer::SourceWriter;

#[derive(Clone, Debug, PartialEq)]
pub enum DocTag {
    /// `@template T as Bound`
    Template { name: String, bound: TUnion },
    /// `@param Type $name`
    Param { name: String, ty: TUnion },
    /// `@return Type`
    Return(TUnion),
    /// `@throws Name`
    Throws(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Docblock {
    tags: Vec<DocTag>,
}

impl Docblock {
    pub fn new() -> Self {
        Docblock::default()
    }

    pub fn push(&mut self, tag: DocTag) {
        self.tags.push(tag);
    }

    pub fn tags(&self) -> &[DocTag] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tag lines in insertion order, without comment delimiters.
    pub fn tag_lines(&self, namespace: &str) -> Vec<String> {
        let formatter = TypeFormatter::with_namespace(namespace);
        let format = |ty: &TUnion| comment_safe_type(&formatter, ty);
        self.tags
            .iter()
            .map(|tag| match tag {
                DocTag::Template { name, bound } => {
                    format!("@template {name} as {}", format(bound))
                }
                DocTag::Param { name, ty } => format!("@param {} ${name}", format(ty)),
                DocTag::Return(ty) => format!("@return {}", format(ty)),
                DocTag::Throws(name) => {
                    format!("@throws {}", FqName::new(name).relative_to(namespace))
                }
            })
            .collect()
    }

    /// Write the comment at the writer's current indentation. Writes nothing
    /// for an empty docblock.
    pub(crate) fn write_to(&self, writer: &mut SourceWriter, namespace: &str) {
        if self.is_empty() {
            return;
        }
        writer.write_indented_line("/**");
        for line in self.tag_lines(namespace) {
            writer.write_indented_line(&format!(" * {line}"));
        }
        writer.write_indented_line(" */");
    }

    /// The comment as a standalone string, one line per tag.
    pub fn render(&self, namespace: &str) -> String {
        let mut writer = SourceWriter::new();
        self.write_to(&mut writer, namespace);
        writer.into_output()
    }
}

/// A literal containing `*/` would close the comment early; such types
/// widen to `mixed`.
fn comment_safe_type(formatter: &TypeFormatter<'_>, ty: &TUnion) -> String {
    let text = formatter.format_union(ty);
    if text.contains("*/") {
        return "mixed".to_string();
    }
    text
}

#[cfg(test)]
#[path = "tests/docblock_tests.rs"]
mod tests;
