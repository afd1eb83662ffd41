//! Type formatting for annotation syntax.
//!
//! `TypeFormatter` renders atomics and unions as annotation text that the
//! type parser reads back. Without a namespace, names render as stored; with
//! one, they render relative to it (fully qualified when outside of it).

use tyshape_common::names::FqName;

use crate::types::{
    ArrayKey, CallableKind, ResourceKind, StringRefinement, TAtomic, TCallable, TInt, TKeyedArray,
    TLiteral, TNamedObject, TScalar,
};
use crate::union::TUnion;

pub struct TypeFormatter<'a> {
    namespace: Option<&'a str>,
}

impl Default for TypeFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TypeFormatter<'a> {
    pub fn new() -> Self {
        TypeFormatter { namespace: None }
    }

    /// Render class names relative to `namespace`.
    pub fn with_namespace(namespace: &'a str) -> Self {
        TypeFormatter {
            namespace: Some(namespace),
        }
    }

    pub fn format_union(&self, union: &TUnion) -> String {
        union
            .iter()
            .map(|atomic| self.format_atomic(atomic))
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn format_atomic(&self, atomic: &TAtomic) -> String {
        match atomic {
            TAtomic::Scalar(scalar) => self.format_scalar(scalar),
            TAtomic::Literal(literal) => self.format_literal(literal),
            TAtomic::Null => "null".to_string(),
            TAtomic::True => "true".to_string(),
            TAtomic::False => "false".to_string(),
            TAtomic::Array(array) => format!(
                "{}<{}, {}>",
                if array.non_empty {
                    "non-empty-array"
                } else {
                    "array"
                },
                self.format_union(&array.key),
                self.format_union(&array.value)
            ),
            TAtomic::List(list) => format!(
                "{}<{}>",
                if list.non_empty {
                    "non-empty-list"
                } else {
                    "list"
                },
                self.format_union(&list.value)
            ),
            TAtomic::KeyedArray(keyed) => self.format_keyed_array(keyed),
            TAtomic::EmptyArray => "array<never, never>".to_string(),
            TAtomic::Iterable(iterable) => format!(
                "iterable<{}, {}>",
                self.format_union(&iterable.key),
                self.format_union(&iterable.value)
            ),
            TAtomic::Object => "object".to_string(),
            TAtomic::NamedObject(object) => self.format_named_object(object),
            TAtomic::EnumCase(case) => {
                format!("{}::{}", self.format_name(&case.enum_name), case.case_name)
            }
            TAtomic::Callable(callable) => self.format_callable(callable),
            TAtomic::GenericParam(param) => param.name.clone(),
            TAtomic::Resource(kind) => match kind {
                ResourceKind::Any => "resource",
                ResourceKind::Open => "open-resource",
                ResourceKind::Closed => "closed-resource",
            }
            .to_string(),
            TAtomic::Mixed => "mixed".to_string(),
            TAtomic::Never => "never".to_string(),
            TAtomic::Void => "void".to_string(),
        }
    }

    pub fn format_name(&self, name: &str) -> String {
        match self.namespace {
            Some(namespace) => FqName::new(name).relative_to(namespace),
            None => name.to_string(),
        }
    }

    fn format_scalar(&self, scalar: &TScalar) -> String {
        match scalar {
            TScalar::Bool => "bool".to_string(),
            TScalar::Int(range) => format_int_range(range),
            TScalar::LiteralInt => "literal-int".to_string(),
            TScalar::Float => "float".to_string(),
            TScalar::String(refinement) => string_keyword(*refinement).to_string(),
            TScalar::ClassString { kind, bound } => match bound {
                Some(bound) => format!("{}<{}>", kind.keyword(), self.format_atomic(bound)),
                None => kind.keyword().to_string(),
            },
            TScalar::ArrayKey => "array-key".to_string(),
            TScalar::Numeric => "numeric".to_string(),
            TScalar::Scalar => "scalar".to_string(),
        }
    }

    fn format_literal(&self, literal: &TLiteral) -> String {
        match literal {
            TLiteral::Int(value) => value.to_string(),
            TLiteral::Float(value) => format_float(value.0),
            TLiteral::String(value) => quote_string(value),
            TLiteral::ClassString(name) => format!("{}::class", self.format_name(name)),
        }
    }

    fn format_keyed_array(&self, keyed: &TKeyedArray) -> String {
        let positional = keyed.is_list
            && keyed
                .properties
                .iter()
                .enumerate()
                .all(|(idx, (key, prop))| *key == ArrayKey::Int(idx as i64) && !prop.optional);

        let mut entries: Vec<String> = keyed
            .properties
            .iter()
            .map(|(key, prop)| {
                let ty = self.format_union(&prop.ty);
                if positional {
                    ty
                } else {
                    format!(
                        "{}{}: {}",
                        format_key(key),
                        if prop.optional { "?" } else { "" },
                        ty
                    )
                }
            })
            .collect();

        if let Some((key, value)) = &keyed.fallback {
            if keyed.is_list {
                entries.push(format!("...<{}>", self.format_union(value)));
            } else {
                entries.push(format!(
                    "...<{}, {}>",
                    self.format_union(key),
                    self.format_union(value)
                ));
            }
        }

        let head = if keyed.is_list { "list" } else { "array" };
        format!("{head}{{{}}}", entries.join(", "))
    }

    fn format_named_object(&self, object: &TNamedObject) -> String {
        let mut out = if object.is_static {
            "static".to_string()
        } else {
            self.format_name(&object.name)
        };
        if !object.type_params.is_empty() {
            let params: Vec<String> = object
                .type_params
                .iter()
                .map(|param| self.format_union(param))
                .collect();
            out.push('<');
            out.push_str(&params.join(", "));
            out.push('>');
        }
        for extra in &object.extra_types {
            out.push('&');
            out.push_str(&self.format_atomic(extra));
        }
        out
    }

    fn format_callable(&self, callable: &TCallable) -> String {
        let base = match callable.kind {
            CallableKind::Callable => "callable".to_string(),
            CallableKind::Closure => self.format_name("Closure"),
            CallableKind::Array => "callable-array".to_string(),
            CallableKind::Object => "callable-object".to_string(),
        };
        let mut out = if callable.is_pure {
            format!("pure-{}", base.trim_start_matches('\\'))
        } else {
            base
        };

        let Some(signature) = &callable.signature else {
            return out;
        };

        let params: Vec<String> = signature
            .params
            .iter()
            .map(|param| {
                let mut text = match &param.ty {
                    Some(ty) => self.format_union(ty),
                    None => "mixed".to_string(),
                };
                if param.by_ref {
                    text.push('&');
                }
                if param.is_variadic {
                    text.push_str("...");
                } else if param.is_optional {
                    text.push('=');
                }
                text
            })
            .collect();
        out.push('(');
        out.push_str(&params.join(", "));
        out.push(')');

        if let Some(return_type) = &signature.return_type {
            let text = self.format_union(return_type);
            if return_type.is_single() && !text.contains('&') {
                out.push_str(&format!(": {text}"));
            } else {
                out.push_str(&format!(": ({text})"));
            }
        }
        out
    }
}

pub fn string_keyword(refinement: StringRefinement) -> &'static str {
    match refinement {
        StringRefinement::Plain => "string",
        StringRefinement::NonEmpty => "non-empty-string",
        StringRefinement::NonFalsy => "non-falsy-string",
        StringRefinement::Lowercase => "lowercase-string",
        StringRefinement::NonEmptyLowercase => "non-empty-lowercase-string",
        StringRefinement::Numeric => "numeric-string",
        StringRefinement::Callable => "callable-string",
        StringRefinement::Literal => "literal-string",
        StringRefinement::NonEmptyLiteral => "non-empty-literal-string",
        StringRefinement::HtmlEscaped => "html-escaped-string",
        StringRefinement::MysqlEscaped => "mysql-escaped-string",
        StringRefinement::ClassString => "class-string",
        StringRefinement::InterfaceString => "interface-string",
        StringRefinement::EnumString => "enum-string",
        StringRefinement::TraitString => "trait-string",
    }
}

fn format_int_range(range: &TInt) -> String {
    match *range {
        TInt::UNBOUNDED => "int".to_string(),
        TInt::POSITIVE => "positive-int".to_string(),
        TInt::NON_NEGATIVE => "non-negative-int".to_string(),
        TInt::NEGATIVE => "negative-int".to_string(),
        TInt::NON_POSITIVE => "non-positive-int".to_string(),
        TInt { min, max } => format!(
            "int<{}, {}>",
            min.map_or_else(|| "min".to_string(), |v| v.to_string()),
            max.map_or_else(|| "max".to_string(), |v| v.to_string())
        ),
    }
}

/// Float text that always reads back as a float (`1.0`, not `1`).
pub fn format_float(value: f64) -> String {
    let text = format!("{value:?}");
    if text.contains(['.', 'e', 'E']) || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

/// Single-quoted string with `\` and `'` escaped.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

fn format_key(key: &ArrayKey) -> String {
    match key {
        ArrayKey::Int(value) => value.to_string(),
        ArrayKey::String(value) if is_bare_key(value) => value.clone(),
        ArrayKey::String(value) => quote_string(value),
    }
}

fn is_bare_key(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
