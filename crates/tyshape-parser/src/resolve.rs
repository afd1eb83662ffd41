//! Parse tree resolution.
//!
//! Resolution runs bottom-up: generic arguments, shape properties and
//! callable parameters resolve before the node that owns them, so an error
//! always points at the innermost offending node.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::{debug, trace};
use tyshape_common::ByteSpan;
use tyshape_common::limits::MAX_INT_MASK_COMBINATIONS;
use tyshape_common::names::strip_leading_separator;
use tyshape_solver::refinement::is_identifier;
use tyshape_solver::{
    ArrayKey, CallableKind, CallableParam, CallableSignature, ClassStringKind, ResourceKind,
    StringRefinement, TArray, TAtomic, TCallable, TGenericParam, TInt, TIterable, TKeyedArray,
    TList, TLiteral, TNamedObject, TProperty, TScalar, TUnion, UnionFlags,
};
use tyshape_solver::{Codebase, is_atomic_contained_by};

use crate::config::{ParserConfig, TypeScope};
use crate::errors::TypeParseError;
use crate::parse_tree::{
    CallableParamNode, KeyedArrayProperty, LiteralNode, NodeKind, PropertyKeyNode, ShapeRest,
    TypeNode,
};
use crate::reserved::SignatureSupport;

/// Entity name recorded on templates introduced by `class-string-map`.
const CLASS_STRING_MAP_ENTITY: &str = "class-string-map";

pub struct TypeResolver<'a> {
    config: &'a ParserConfig,
    scope: &'a TypeScope,
    /// Templates introduced inside the annotation itself, innermost last.
    local_templates: Vec<TGenericParam>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(config: &'a ParserConfig, scope: &'a TypeScope) -> Self {
        TypeResolver {
            config,
            scope,
            local_templates: Vec::new(),
        }
    }

    pub fn resolve(&mut self, node: &TypeNode) -> Result<TUnion, TypeParseError> {
        match &node.kind {
            NodeKind::Value(word) => self.resolve_word(word, node.span),
            NodeKind::Literal(literal) => Ok(TUnion::from_atomic(resolve_literal(literal))),
            NodeKind::ClassConstant { class_name, member } => {
                self.resolve_class_constant(class_name, member, node.span)
            }
            NodeKind::Generic { name, args } => self.resolve_generic(name, args, node.span),
            NodeKind::Union(branches) => self.resolve_union(branches),
            NodeKind::Intersection(parts) => self.resolve_intersection(parts, node.span),
            NodeKind::Nullable(inner) => Ok(self
                .resolve(inner)?
                .as_nullable()
                .with_flags(UnionFlags::EXPLICIT_NULLABLE)),
            NodeKind::ArrayShorthand(inner) => {
                let value = self.resolve(inner)?;
                Ok(TUnion::from_atomic(TAtomic::array(TUnion::array_key(), value)))
            }
            NodeKind::KeyedArray {
                head,
                properties,
                rest,
            } => self.resolve_shape(head, properties, rest, node.span),
            NodeKind::Callable {
                name,
                params,
                return_type,
            } => self.resolve_callable(name, params, return_type.as_deref(), node.span),
            NodeKind::TemplateAs { name, .. } => Err(TypeParseError::syntax(
                node.span,
                format!("`{name} of ...` is only allowed as the first argument of class-string-map"),
            )),
        }
    }

    fn template(&self, name: &str) -> Option<&TGenericParam> {
        self.local_templates
            .iter()
            .rev()
            .find(|param| param.name == name)
            .or_else(|| self.scope.template(name))
    }

    // =========================================================================
    // Words
    // =========================================================================

    fn resolve_word(&self, word: &str, span: ByteSpan) -> Result<TUnion, TypeParseError> {
        if let Some(reserved) = self.config.reserved_words.get(word) {
            if reserved.arity.is_required() {
                return Err(TypeParseError::syntax(
                    span,
                    format!("`{}` requires {}", reserved.name, reserved.arity.describe()),
                ));
            }
            if reserved.signature == SignatureSupport::Required {
                return Err(TypeParseError::syntax(
                    span,
                    format!("`{}` requires a signature", reserved.name),
                ));
            }
            if reserved.deprecated {
                debug!(word = reserved.name, "deprecated type keyword");
            }
            return self.keyword_type(reserved.name, span);
        }

        if let Some(param) = self.template(word) {
            return Ok(TUnion::from_atomic(TAtomic::GenericParam(param.clone())));
        }

        if is_class_name(word) {
            return Ok(TUnion::from_atomic(TAtomic::named(strip_leading_separator(
                word,
            ))));
        }

        Err(TypeParseError::unknown_type(
            span,
            format!("`{word}` is not a known type"),
        ))
    }

    fn keyword_type(&self, keyword: &str, span: ByteSpan) -> Result<TUnion, TypeParseError> {
        let string = |refinement| TAtomic::Scalar(TScalar::String(refinement));
        let int = |range| TAtomic::Scalar(TScalar::Int(range));
        let class_string = |kind| TAtomic::Scalar(TScalar::ClassString { kind, bound: None });

        let atomic = match keyword {
            "bool" | "boolean" => TAtomic::bool(),
            "true" => TAtomic::True,
            "false" => TAtomic::False,
            "int" | "integer" => TAtomic::int(),
            "positive-int" => int(TInt::POSITIVE),
            "negative-int" => int(TInt::NEGATIVE),
            "non-positive-int" => int(TInt::NON_POSITIVE),
            "non-negative-int" => int(TInt::NON_NEGATIVE),
            "literal-int" => TAtomic::Scalar(TScalar::LiteralInt),
            "float" | "double" | "real" => TAtomic::float(),
            "string" => TAtomic::string(),
            "non-empty-string" => string(StringRefinement::NonEmpty),
            "non-falsy-string" => string(StringRefinement::NonFalsy),
            "lowercase-string" => string(StringRefinement::Lowercase),
            "non-empty-lowercase-string" => string(StringRefinement::NonEmptyLowercase),
            "numeric-string" => string(StringRefinement::Numeric),
            "callable-string" => string(StringRefinement::Callable),
            "literal-string" => string(StringRefinement::Literal),
            "non-empty-literal-string" => string(StringRefinement::NonEmptyLiteral),
            "html-escaped-string" => string(StringRefinement::HtmlEscaped),
            "mysql-escaped-string" => string(StringRefinement::MysqlEscaped),
            "class-string" => class_string(ClassStringKind::Class),
            "interface-string" => class_string(ClassStringKind::Interface),
            "enum-string" => class_string(ClassStringKind::Enum),
            "trait-string" => class_string(ClassStringKind::Trait),
            "array-key" => TAtomic::array_key(),
            "numeric" => TAtomic::Scalar(TScalar::Numeric),
            "scalar" => TAtomic::Scalar(TScalar::Scalar),
            "null" => TAtomic::Null,
            "void" => TAtomic::Void,
            "mixed" => TAtomic::Mixed,
            "never" | "no-return" | "never-return" | "never-returns" | "empty" => TAtomic::Never,
            "array" => TAtomic::array(TUnion::array_key(), TUnion::mixed()),
            "non-empty-array" => TAtomic::Array(TArray {
                key: TUnion::array_key(),
                value: TUnion::mixed(),
                non_empty: true,
            }),
            "list" => TAtomic::list(TUnion::mixed()),
            "non-empty-list" => TAtomic::List(TList {
                value: TUnion::mixed(),
                non_empty: true,
            }),
            "iterable" => TAtomic::Iterable(TIterable {
                key: TUnion::mixed(),
                value: TUnion::mixed(),
            }),
            "object" => TAtomic::Object,
            "stringable-object" => TAtomic::named("Stringable"),
            "non-empty-countable" => TAtomic::named("Countable"),
            "self" => TAtomic::NamedObject(self.self_object(false)),
            "static" => TAtomic::NamedObject(self.self_object(true)),
            "callable" => TAtomic::Callable(TCallable::plain(CallableKind::Callable)),
            "pure-callable" => TAtomic::Callable(TCallable {
                kind: CallableKind::Callable,
                is_pure: true,
                signature: None,
            }),
            "callable-array" => TAtomic::Callable(TCallable::plain(CallableKind::Array)),
            "callable-object" => TAtomic::Callable(TCallable::plain(CallableKind::Object)),
            "resource" => TAtomic::Resource(ResourceKind::Any),
            "open-resource" => TAtomic::Resource(ResourceKind::Open),
            "closed-resource" => TAtomic::Resource(ResourceKind::Closed),
            other => {
                return Err(TypeParseError::syntax(
                    span,
                    format!("`{other}` cannot be used as a type on its own"),
                ));
            }
        };
        Ok(TUnion::from_atomic(atomic))
    }

    fn self_object(&self, is_static: bool) -> TNamedObject {
        let fallback = if is_static { "static" } else { "self" };
        let mut object = TNamedObject::new(self.scope.self_class().unwrap_or(fallback));
        object.is_static = is_static;
        object
    }

    fn resolve_class_constant(
        &self,
        class_name: &str,
        member: &str,
        span: ByteSpan,
    ) -> Result<TUnion, TypeParseError> {
        let lowered = class_name.to_ascii_lowercase();
        let is_self = lowered == "self" || lowered == "static";

        if member.eq_ignore_ascii_case("class") {
            if let Some(param) = self.template(class_name) {
                return Ok(TUnion::from_atomic(TAtomic::Scalar(TScalar::ClassString {
                    kind: ClassStringKind::Class,
                    bound: Some(Box::new(TAtomic::GenericParam(param.clone()))),
                })));
            }
            if is_self {
                return Ok(TUnion::from_atomic(match self.scope.self_class() {
                    Some(self_class) => {
                        TAtomic::Literal(TLiteral::ClassString(self_class.to_string()))
                    }
                    None => TAtomic::Scalar(TScalar::ClassString {
                        kind: ClassStringKind::Class,
                        bound: Some(Box::new(TAtomic::NamedObject(
                            self.self_object(lowered == "static"),
                        ))),
                    }),
                }));
            }
            if is_class_name(class_name) && !self.config.reserved_words.is_reserved(class_name) {
                return Ok(TUnion::from_atomic(TAtomic::Literal(TLiteral::ClassString(
                    strip_leading_separator(class_name).to_string(),
                ))));
            }
            return Err(TypeParseError::unknown_type(
                span,
                format!("`{class_name}` is not a class name"),
            ));
        }

        let enum_name = match (is_self, self.scope.self_class()) {
            (true, Some(self_class)) => self_class,
            _ if is_class_name(class_name) && !self.config.reserved_words.is_reserved(class_name) => {
                strip_leading_separator(class_name)
            }
            _ => {
                return Err(TypeParseError::unknown_type(
                    span,
                    format!("`{class_name}` is not an enum name"),
                ));
            }
        };
        if !is_identifier(member) {
            return Err(TypeParseError::syntax(
                span,
                format!("`{member}` is not a valid case name"),
            ));
        }
        Ok(TUnion::from_atomic(TAtomic::enum_case(enum_name, member)))
    }

    // =========================================================================
    // Generics
    // =========================================================================

    fn resolve_generic(
        &mut self,
        name: &str,
        args: &[TypeNode],
        span: ByteSpan,
    ) -> Result<TUnion, TypeParseError> {
        let Some(reserved) = self.config.reserved_words.get(name).copied() else {
            if self.template(name).is_some() {
                return Err(TypeParseError::syntax(
                    span,
                    format!("template `{name}` cannot take generic arguments"),
                ));
            }
            if !is_class_name(name) {
                return Err(TypeParseError::unknown_type(
                    span,
                    format!("`{name}` is not a known type"),
                ));
            }
            let params = self.resolve_args(args)?;
            let object = TNamedObject::new(strip_leading_separator(name)).with_params(params);
            return Ok(TUnion::from_atomic(TAtomic::NamedObject(object)));
        };

        if !reserved.arity.accepts(args.len()) {
            return Err(TypeParseError::syntax(
                span,
                format!(
                    "`{}` takes {}, got {}",
                    reserved.name,
                    reserved.arity.describe(),
                    args.len()
                ),
            ));
        }

        match reserved.name {
            "int" => return resolve_int_range(&args[0], &args[1]),
            "class-string-map" => return self.resolve_class_string_map(args),
            _ => {}
        }

        let resolved = self.resolve_args(args)?;
        let atomic = match (reserved.name, resolved.as_slice()) {
            ("array" | "non-empty-array", [value]) => {
                collection(reserved.name, TUnion::array_key(), value.clone())
            }
            ("array" | "non-empty-array", [key, value]) => {
                collection(reserved.name, key.clone(), value.clone())
            }
            ("list" | "non-empty-list", [value]) => TAtomic::List(TList {
                value: value.clone(),
                non_empty: reserved.name == "non-empty-list",
            }),
            ("iterable", [value]) => TAtomic::Iterable(TIterable {
                key: TUnion::mixed(),
                value: value.clone(),
            }),
            ("iterable", [key, value]) => TAtomic::Iterable(TIterable {
                key: key.clone(),
                value: value.clone(),
            }),
            ("class-string" | "interface-string" | "enum-string" | "trait-string", [bound]) => {
                let kind = match reserved.name {
                    "interface-string" => ClassStringKind::Interface,
                    "enum-string" => ClassStringKind::Enum,
                    "trait-string" => ClassStringKind::Trait,
                    _ => ClassStringKind::Class,
                };
                return class_strings(kind, bound, args[0].span);
            }
            ("key-of", [arg]) => return collection_part(arg, CollectionPart::Key, args[0].span),
            ("value-of", [arg]) => {
                return collection_part(arg, CollectionPart::Value, args[0].span);
            }
            ("int-mask", values) => return int_mask(values.iter().zip(args), reserved.name, span),
            ("int-mask-of", [values]) => {
                return int_mask(std::iter::once((values, &args[0])), reserved.name, span);
            }
            ("arraylike-object", [key, value]) => {
                let params = [key.clone(), value.clone()];
                let mut object = TNamedObject::new("ArrayAccess").with_params(params.clone());
                object.extra_types.push(TAtomic::named("Countable"));
                object
                    .extra_types
                    .push(TAtomic::NamedObject(TNamedObject::new("Traversable").with_params(params)));
                TAtomic::NamedObject(object)
            }
            ("self" | "static", params) => {
                let mut object = self.self_object(reserved.name == "static");
                object.type_params = params.iter().cloned().collect();
                TAtomic::NamedObject(object)
            }
            _ => {
                return Err(TypeParseError::syntax(
                    span,
                    format!("`{}` does not take generic arguments", reserved.name),
                ));
            }
        };
        Ok(TUnion::from_atomic(atomic))
    }

    fn resolve_args(&mut self, args: &[TypeNode]) -> Result<Vec<TUnion>, TypeParseError> {
        args.iter().map(|arg| self.resolve(arg)).collect()
    }

    /// `class-string-map<T of Foo, V>` is modelled as
    /// `array<class-string<T>, V>` with `T` in scope for `V`.
    fn resolve_class_string_map(&mut self, args: &[TypeNode]) -> Result<TUnion, TypeParseError> {
        let (name, as_type) = match &args[0].kind {
            NodeKind::TemplateAs { name, bound } => (name.clone(), self.resolve(bound)?),
            NodeKind::Value(name) if !self.config.reserved_words.is_reserved(name) => {
                (name.clone(), TUnion::from_atomic(TAtomic::Object))
            }
            _ => {
                return Err(TypeParseError::syntax(
                    args[0].span,
                    "class-string-map expects `T of Bound` as its first argument",
                ));
            }
        };

        let param = TGenericParam {
            name,
            defining_entity: CLASS_STRING_MAP_ENTITY.to_string(),
            as_type,
        };
        self.local_templates.push(param.clone());
        let value = self.resolve(&args[1]);
        self.local_templates.pop();

        let key = TAtomic::Scalar(TScalar::ClassString {
            kind: ClassStringKind::Class,
            bound: Some(Box::new(TAtomic::GenericParam(param))),
        });
        Ok(TUnion::from_atomic(TAtomic::array(
            TUnion::from_atomic(key),
            value?,
        )))
    }

    // =========================================================================
    // Unions and intersections
    // =========================================================================

    fn resolve_union(&mut self, branches: &[TypeNode]) -> Result<TUnion, TypeParseError> {
        let mut types = Vec::new();
        let mut flags = UnionFlags::empty();
        for branch in branches {
            let resolved = self.resolve(branch)?;
            flags |= resolved.flags();
            types.extend(resolved.into_types());
        }
        if types.contains(&TAtomic::Null) && types.len() > 1 {
            flags |= UnionFlags::EXPLICIT_NULLABLE;
        }
        Ok(TUnion::new(types).with_flags(flags))
    }

    fn resolve_intersection(
        &mut self,
        parts: &[TypeNode],
        span: ByteSpan,
    ) -> Result<TUnion, TypeParseError> {
        let mut merged: Option<TAtomic> = None;
        for part in parts {
            let resolved = self.resolve(part)?;
            let Some(atomic) = resolved.get_single().cloned() else {
                return Err(TypeParseError::incompatible_intersection(
                    part.span,
                    format!("cannot intersect the union `{resolved}`"),
                ));
            };
            merged = Some(match merged {
                None => atomic,
                Some(acc) => intersect(acc, atomic, part.span)?,
            });
        }
        trace!(span = %span, "resolved intersection");
        Ok(TUnion::from_atomic(merged.unwrap_or(TAtomic::Mixed)))
    }

    // =========================================================================
    // Shapes
    // =========================================================================

    fn resolve_shape(
        &mut self,
        head: &str,
        properties: &[KeyedArrayProperty],
        rest: &ShapeRest,
        span: ByteSpan,
    ) -> Result<TUnion, TypeParseError> {
        let is_list = match head.to_ascii_lowercase().as_str() {
            "array" | "non-empty-array" => false,
            "list" | "non-empty-list" => true,
            _ => {
                return Err(TypeParseError::syntax(
                    span,
                    format!("`{head}` cannot be followed by a shape"),
                ));
            }
        };

        let mut resolved: IndexMap<ArrayKey, TProperty> = IndexMap::new();
        let mut implicit_count = 0usize;
        let mut explicit_count = 0usize;
        for property in properties {
            let key = match &property.key {
                PropertyKeyNode::Implicit => {
                    implicit_count += 1;
                    ArrayKey::Int(resolved.len() as i64)
                }
                written => {
                    explicit_count += 1;
                    normalize_key(written)
                }
            };
            if implicit_count > 0 && explicit_count > 0 {
                return Err(TypeParseError::syntax(
                    property.key_span,
                    "cannot mix positional and named entries in a shape",
                ));
            }
            if resolved.contains_key(&key) {
                return Err(TypeParseError::syntax(
                    property.key_span,
                    format!("duplicate key `{key}` in shape"),
                ));
            }
            let ty = match &property.value {
                Some(value) => self.resolve(value)?,
                None => TUnion::mixed(),
            };
            resolved.insert(
                key,
                TProperty {
                    ty,
                    optional: property.optional,
                },
            );
        }

        if is_list {
            let sequential = resolved
                .keys()
                .enumerate()
                .all(|(idx, key)| *key == ArrayKey::Int(idx as i64));
            if !sequential {
                return Err(TypeParseError::syntax(
                    span,
                    "list shape keys must be sequential integers starting at 0",
                ));
            }
        }
        let is_list = is_list || (explicit_count == 0 && !resolved.is_empty());

        let default_key = if is_list {
            TUnion::from_atomic(TAtomic::Scalar(TScalar::Int(TInt::NON_NEGATIVE)))
        } else {
            TUnion::array_key()
        };
        let fallback = match rest {
            ShapeRest::Sealed => None,
            ShapeRest::Open => Some((default_key, TUnion::mixed())),
            ShapeRest::OpenWith(args) => match self.resolve_args(args)?.as_slice() {
                [value] => Some((default_key, value.clone())),
                [key, value] => Some((key.clone(), value.clone())),
                _ => {
                    return Err(TypeParseError::syntax(
                        span,
                        "`...<>` takes 1 or 2 generic arguments",
                    ));
                }
            },
        };

        if resolved.is_empty() && fallback.is_none() {
            return Ok(TUnion::from_atomic(TAtomic::EmptyArray));
        }

        let mut keyed = TKeyedArray::new(resolved, is_list);
        keyed.fallback = fallback;
        Ok(TUnion::from_atomic(TAtomic::KeyedArray(keyed)))
    }

    // =========================================================================
    // Callables
    // =========================================================================

    fn resolve_callable(
        &mut self,
        name: &str,
        params: &[CallableParamNode],
        return_type: Option<&TypeNode>,
        span: ByteSpan,
    ) -> Result<TUnion, TypeParseError> {
        let lowered = strip_leading_separator(name).to_ascii_lowercase();
        let (kind, is_pure) = match lowered.as_str() {
            "callable" => (CallableKind::Callable, false),
            "pure-callable" => (CallableKind::Callable, true),
            "closure" => (CallableKind::Closure, false),
            "pure-closure" => (CallableKind::Closure, true),
            _ => {
                return Err(TypeParseError::syntax(
                    span,
                    format!("`{name}` cannot take a signature"),
                ));
            }
        };

        let mut resolved_params = Vec::with_capacity(params.len());
        for (idx, param) in params.iter().enumerate() {
            if param.is_variadic && idx + 1 != params.len() {
                return Err(TypeParseError::syntax(
                    param.ty.span,
                    "only the last parameter can be variadic",
                ));
            }
            resolved_params.push(CallableParam {
                ty: Some(self.resolve(&param.ty)?),
                is_optional: param.is_optional,
                is_variadic: param.is_variadic,
                by_ref: param.by_ref,
            });
        }

        let return_type = return_type.map(|node| self.resolve(node)).transpose()?;
        Ok(TUnion::from_atomic(TAtomic::Callable(TCallable {
            kind,
            is_pure,
            signature: Some(CallableSignature {
                params: resolved_params,
                return_type,
            }),
        })))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// `Foo`, `\Foo\Bar`: identifier segments separated by `\`.
pub fn is_class_name(word: &str) -> bool {
    let word = strip_leading_separator(word);
    !word.is_empty() && word.split('\\').all(is_identifier)
}

fn resolve_literal(literal: &LiteralNode) -> TAtomic {
    match literal {
        LiteralNode::Int(value) => TAtomic::literal_int(*value),
        LiteralNode::Float(value) => TAtomic::literal_float(*value),
        LiteralNode::String(value) => TAtomic::literal_string(value.clone()),
    }
}

/// Quoted keys holding a canonical decimal integer are integer keys.
fn normalize_key(key: &PropertyKeyNode) -> ArrayKey {
    match key {
        PropertyKeyNode::Int(value) => ArrayKey::Int(*value),
        PropertyKeyNode::Word(word) => ArrayKey::String(word.clone()),
        PropertyKeyNode::Quoted(text) => match text.parse::<i64>() {
            Ok(value) if value.to_string() == *text => ArrayKey::Int(value),
            _ => ArrayKey::String(text.clone()),
        },
        PropertyKeyNode::Implicit => ArrayKey::Int(0),
    }
}

fn collection(keyword: &str, key: TUnion, value: TUnion) -> TAtomic {
    let non_empty = keyword == "non-empty-array";
    if !non_empty && key.is_never() && value.is_never() {
        return TAtomic::EmptyArray;
    }
    TAtomic::Array(TArray {
        key,
        value,
        non_empty,
    })
}

fn class_strings(
    kind: ClassStringKind,
    bound: &TUnion,
    span: ByteSpan,
) -> Result<TUnion, TypeParseError> {
    let mut out = Vec::with_capacity(bound.len());
    for atomic in bound {
        let bound = match atomic {
            TAtomic::Object => None,
            TAtomic::NamedObject(_) | TAtomic::GenericParam(_) => Some(Box::new(atomic.clone())),
            other => {
                return Err(TypeParseError::syntax(
                    span,
                    format!("`{other}` cannot bound a {}", kind.keyword()),
                ));
            }
        };
        out.push(TAtomic::Scalar(TScalar::ClassString { kind, bound }));
    }
    Ok(TUnion::new(out))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CollectionPart {
    Key,
    Value,
}

/// Eager `key-of<T>` / `value-of<T>` over array-like members. Template
/// parameters are answered through their constraint.
fn collection_part(
    arg: &TUnion,
    part: CollectionPart,
    span: ByteSpan,
) -> Result<TUnion, TypeParseError> {
    let mut out: Vec<TAtomic> = Vec::new();
    for atomic in arg {
        let piece = match (atomic, part) {
            (TAtomic::Array(array), CollectionPart::Key) => array.key.clone(),
            (TAtomic::Array(array), CollectionPart::Value) => array.value.clone(),
            (TAtomic::List(_), CollectionPart::Key) => {
                TUnion::from_atomic(TAtomic::Scalar(TScalar::Int(TInt::NON_NEGATIVE)))
            }
            (TAtomic::List(list), CollectionPart::Value) => list.value.clone(),
            (TAtomic::Iterable(iterable), CollectionPart::Key) => iterable.key.clone(),
            (TAtomic::Iterable(iterable), CollectionPart::Value) => iterable.value.clone(),
            (TAtomic::EmptyArray, _) => TUnion::never(),
            (TAtomic::KeyedArray(keyed), CollectionPart::Key) => {
                let mut keys: Vec<TAtomic> =
                    keyed.properties.keys().map(ArrayKey::to_atomic).collect();
                if let Some((key, _)) = &keyed.fallback {
                    keys.extend(key.iter().cloned());
                }
                TUnion::new(keys)
            }
            (TAtomic::KeyedArray(keyed), CollectionPart::Value) => {
                let mut values: Vec<TAtomic> = keyed
                    .properties
                    .values()
                    .flat_map(|prop| prop.ty.iter().cloned())
                    .collect();
                if let Some((_, value)) = &keyed.fallback {
                    values.extend(value.iter().cloned());
                }
                TUnion::new(values)
            }
            (TAtomic::GenericParam(param), _) => collection_part(&param.as_type, part, span)?,
            (other, _) => {
                let keyword = match part {
                    CollectionPart::Key => "key-of",
                    CollectionPart::Value => "value-of",
                };
                return Err(TypeParseError::syntax(
                    span,
                    format!("{keyword} expects an array type, got `{other}`"),
                ));
            }
        };
        out.extend(piece.into_types());
    }
    Ok(TUnion::new(out))
}

/// `int<min, max>` bounds: integer literals or the words `min` / `max`.
fn resolve_int_range(lower: &TypeNode, upper: &TypeNode) -> Result<TUnion, TypeParseError> {
    let bound = |node: &TypeNode, open_word: &str| -> Result<Option<i64>, TypeParseError> {
        match &node.kind {
            NodeKind::Literal(LiteralNode::Int(value)) => Ok(Some(*value)),
            NodeKind::Value(word) if word.eq_ignore_ascii_case(open_word) => Ok(None),
            _ => Err(TypeParseError::syntax(
                node.span,
                format!("expected an integer or `{open_word}` as an int range bound"),
            )),
        }
    };
    let min = bound(lower, "min")?;
    let max = bound(upper, "max")?;
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(TypeParseError::syntax(
                lower.span.cover(upper.span),
                format!("empty int range: {min} is greater than {max}"),
            ));
        }
    }
    Ok(TUnion::from_atomic(TAtomic::Scalar(TScalar::Int(TInt::new(
        min, max,
    )))))
}

/// Every bitwise-or combination of the given flags, including `0`.
fn int_mask<'n>(
    args: impl Iterator<Item = (&'n TUnion, &'n TypeNode)>,
    keyword: &str,
    span: ByteSpan,
) -> Result<TUnion, TypeParseError> {
    let mut flags = Vec::new();
    for (union, node) in args {
        for atomic in union {
            match atomic {
                TAtomic::Literal(TLiteral::Int(value)) if *value >= 0 => flags.push(*value),
                other => {
                    return Err(TypeParseError::syntax(
                        node.span,
                        format!("{keyword} expects non-negative integer literals, got `{other}`"),
                    ));
                }
            }
        }
    }

    let mut combinations: BTreeSet<i64> = BTreeSet::from([0]);
    for flag in flags {
        let next: Vec<i64> = combinations.iter().map(|existing| existing | flag).collect();
        combinations.extend(next);
        if combinations.len() > MAX_INT_MASK_COMBINATIONS {
            return Err(TypeParseError::syntax(
                span,
                format!("{keyword} expands to more than {MAX_INT_MASK_COMBINATIONS} values"),
            ));
        }
    }
    Ok(combinations.into_iter().map(TAtomic::literal_int).collect())
}

/// Merge two intersection members into one atomic.
fn intersect(left: TAtomic, right: TAtomic, span: ByteSpan) -> Result<TAtomic, TypeParseError> {
    if left == right {
        return Ok(left);
    }
    match (left, right) {
        (TAtomic::Mixed, other) | (other, TAtomic::Mixed) => Ok(other),
        (TAtomic::Object, object @ TAtomic::NamedObject(_))
        | (object @ TAtomic::NamedObject(_), TAtomic::Object) => Ok(object),
        (TAtomic::NamedObject(mut left), TAtomic::NamedObject(right)) => {
            left.extra_types.extend(right.intersection_parts());
            Ok(TAtomic::NamedObject(left))
        }
        (TAtomic::NamedObject(mut object), param @ TAtomic::GenericParam(_))
        | (param @ TAtomic::GenericParam(_), TAtomic::NamedObject(mut object)) => {
            object.extra_types.push(param);
            Ok(TAtomic::NamedObject(object))
        }
        (TAtomic::KeyedArray(left), TAtomic::KeyedArray(right)) => {
            merge_shapes(left, right, span).map(TAtomic::KeyedArray)
        }
        (TAtomic::KeyedArray(mut keyed), TAtomic::Array(array))
        | (TAtomic::Array(array), TAtomic::KeyedArray(mut keyed)) => {
            let fallback = (array.key, array.value);
            match &keyed.fallback {
                None => keyed.fallback = Some(fallback),
                Some(existing) if *existing == fallback => {}
                Some(_) => {
                    return Err(TypeParseError::incompatible_intersection(
                        span,
                        "shape already has different types for its remaining entries",
                    ));
                }
            }
            Ok(TAtomic::KeyedArray(keyed))
        }
        (left, right) => {
            // Related members keep the narrower side: `int&positive-int`,
            // `array{}&array<string, mixed>`.
            let codebase = Codebase::empty();
            if is_atomic_contained_by(&codebase, &left, &right) {
                Ok(left)
            } else if is_atomic_contained_by(&codebase, &right, &left) {
                Ok(right)
            } else {
                Err(TypeParseError::incompatible_intersection(
                    span,
                    format!("`{left}` and `{right}` cannot be intersected"),
                ))
            }
        }
    }
}

fn merge_shapes(
    mut left: TKeyedArray,
    right: TKeyedArray,
    span: ByteSpan,
) -> Result<TKeyedArray, TypeParseError> {
    for (key, property) in right.properties {
        match left.properties.get(&key) {
            Some(existing) if *existing != property => {
                return Err(TypeParseError::incompatible_intersection(
                    span,
                    format!("conflicting types for key `{key}`"),
                ));
            }
            Some(_) => {}
            None => {
                left.properties.insert(key, property);
            }
        }
    }
    if left.is_list || right.is_list {
        make_list(&mut left, span)?;
    }
    left.fallback = match (left.fallback, right.fallback) {
        (None, other) | (other, None) => other,
        (Some(a), Some(b)) if a == b => Some(a),
        (Some(_), Some(_)) => {
            return Err(TypeParseError::incompatible_intersection(
                span,
                "shapes disagree on the types of their remaining entries",
            ));
        }
    };
    Ok(left)
}

/// A merged shape with a list member must still be a list: integer keys
/// `0..n` only, stored in index order.
fn make_list(keyed: &mut TKeyedArray, span: ByteSpan) -> Result<(), TypeParseError> {
    let len = keyed.properties.len() as i64;
    if let Some(key) = keyed
        .properties
        .keys()
        .find(|key| !matches!(key, ArrayKey::Int(index) if (0..len).contains(index)))
    {
        return Err(TypeParseError::incompatible_intersection(
            span,
            format!("key `{key}` cannot appear in a list"),
        ));
    }
    keyed.properties.sort_by(|a, _, b, _| a.cmp(b));
    keyed.is_list = true;
    Ok(())
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
