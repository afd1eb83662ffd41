//! Atomic type catalog.
//!
//! `TAtomic` is the closed set of elementary type alternatives. Every
//! containment rule, printer and resolver matches on it exhaustively, so a
//! new variant is a compile-time obligation everywhere it matters.
//!
//! Atomics own their payloads by value. There is no interning and no
//! sharing: a `TUnion` owns its atomics, a keyed array owns its property map,
//! a named object owns its type arguments. Recursive types only exist by name.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::union::TUnion;

// =============================================================================
// Scalars
// =============================================================================

/// Inclusive integer range. `None` bounds are unbounded (`min` / `max`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TInt {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl TInt {
    pub const UNBOUNDED: TInt = TInt {
        min: None,
        max: None,
    };
    pub const POSITIVE: TInt = TInt {
        min: Some(1),
        max: None,
    };
    pub const NON_NEGATIVE: TInt = TInt {
        min: Some(0),
        max: None,
    };
    pub const NEGATIVE: TInt = TInt {
        min: None,
        max: Some(-1),
    };
    pub const NON_POSITIVE: TInt = TInt {
        min: None,
        max: Some(0),
    };

    pub const fn new(min: Option<i64>, max: Option<i64>) -> Self {
        TInt { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains_value(&self, value: i64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Whether every value of `other` lies inside `self`.
    pub fn contains_range(&self, other: &TInt) -> bool {
        let lower_ok = match (self.min, other.min) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(outer), Some(inner)) => inner >= outer,
        };
        let upper_ok = match (self.max, other.max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(outer), Some(inner)) => inner <= outer,
        };
        lower_ok && upper_ok
    }
}

/// Named refinements of `string`.
///
/// Refinements are independent predicates rather than a chain: a value may
/// satisfy several at once. The allowed containments between them are listed
/// explicitly in [`crate::refinement`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StringRefinement {
    Plain,
    NonEmpty,
    NonFalsy,
    Lowercase,
    NonEmptyLowercase,
    Numeric,
    Callable,
    Literal,
    NonEmptyLiteral,
    HtmlEscaped,
    MysqlEscaped,
    ClassString,
    InterfaceString,
    EnumString,
    TraitString,
}

/// Which kind of class-like a `class-string` names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassStringKind {
    Class,
    Interface,
    Enum,
    Trait,
}

impl ClassStringKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassStringKind::Class => "class-string",
            ClassStringKind::Interface => "interface-string",
            ClassStringKind::Enum => "enum-string",
            ClassStringKind::Trait => "trait-string",
        }
    }

    pub fn refinement(self) -> StringRefinement {
        match self {
            ClassStringKind::Class => StringRefinement::ClassString,
            ClassStringKind::Interface => StringRefinement::InterfaceString,
            ClassStringKind::Enum => StringRefinement::EnumString,
            ClassStringKind::Trait => StringRefinement::TraitString,
        }
    }
}

/// Non-literal scalar kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TScalar {
    Bool,
    Int(TInt),
    /// `literal-int`: some integer written in source, value unknown.
    LiteralInt,
    Float,
    String(StringRefinement),
    /// `class-string<Bound>` and friends. The bound is a named object or a
    /// template parameter.
    ClassString {
        kind: ClassStringKind,
        bound: Option<Box<TAtomic>>,
    },
    /// `int|string`
    ArrayKey,
    /// `int|float|numeric-string`
    Numeric,
    /// `bool|int|float|string`
    Scalar,
}

impl TScalar {
    pub const INT: TScalar = TScalar::Int(TInt::UNBOUNDED);
    pub const STRING: TScalar = TScalar::String(StringRefinement::Plain);

    /// The string refinement this scalar behaves as, if it is string-like.
    pub fn string_refinement(&self) -> Option<StringRefinement> {
        match self {
            TScalar::String(refinement) => Some(*refinement),
            TScalar::ClassString { kind, .. } => Some(kind.refinement()),
            _ => None,
        }
    }
}

// =============================================================================
// Literals
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TLiteral {
    Int(i64),
    Float(OrderedFloat<f64>),
    String(String),
    /// `Foo::class`
    ClassString(String),
}

// =============================================================================
// Collections
// =============================================================================

/// Key of a keyed-array property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKey {
    Int(i64),
    String(String),
}

impl ArrayKey {
    /// The literal type of this key.
    pub fn to_atomic(&self) -> TAtomic {
        match self {
            ArrayKey::Int(value) => TAtomic::Literal(TLiteral::Int(*value)),
            ArrayKey::String(value) => TAtomic::Literal(TLiteral::String(value.clone())),
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(value) => write!(f, "{value}"),
            ArrayKey::String(value) => f.write_str(value),
        }
    }
}

/// `array<K, V>` / `non-empty-array<K, V>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TArray {
    pub key: TUnion,
    pub value: TUnion,
    pub non_empty: bool,
}

/// `list<V>` / `non-empty-list<V>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TList {
    pub value: TUnion,
    pub non_empty: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TProperty {
    pub ty: TUnion,
    pub optional: bool,
}

impl TProperty {
    pub fn required(ty: TUnion) -> Self {
        TProperty {
            ty,
            optional: false,
        }
    }

    pub fn optional(ty: TUnion) -> Self {
        TProperty { ty, optional: true }
    }
}

/// Fixed-shape structural record: `array{a: int, b?: string}`, `list{int, string}`.
///
/// A shape without `fallback` is sealed. `fallback` holds the key and value
/// types of any further entries (`...<K, V>`, or `&array<K, V>`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TKeyedArray {
    pub properties: IndexMap<ArrayKey, TProperty>,
    pub is_list: bool,
    pub fallback: Option<(TUnion, TUnion)>,
}

impl TKeyedArray {
    pub fn new(properties: IndexMap<ArrayKey, TProperty>, is_list: bool) -> Self {
        TKeyedArray {
            properties,
            is_list,
            fallback: None,
        }
    }

    /// Positional shape (`list{A, B}`) from the values in order.
    pub fn list(values: impl IntoIterator<Item = TUnion>) -> Self {
        let properties = values
            .into_iter()
            .enumerate()
            .map(|(idx, ty)| (ArrayKey::Int(idx as i64), TProperty::required(ty)))
            .collect();
        TKeyedArray::new(properties, true)
    }

    pub fn is_sealed(&self) -> bool {
        self.fallback.is_none()
    }

    pub fn all_optional(&self) -> bool {
        self.properties.values().all(|prop| prop.optional)
    }

    pub fn has_required(&self) -> bool {
        !self.all_optional()
    }
}

/// `iterable<K, V>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TIterable {
    pub key: TUnion,
    pub value: TUnion,
}

// =============================================================================
// Objects
// =============================================================================

/// Nominal object type, optionally parameterized and intersected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TNamedObject {
    /// Fully-qualified name without a leading backslash.
    pub name: String,
    pub type_params: SmallVec<[TUnion; 2]>,
    /// `static` (late static binding) rather than the named class itself.
    pub is_static: bool,
    /// Further intersection members (`A&B`): named objects or template params.
    pub extra_types: Vec<TAtomic>,
}

impl TNamedObject {
    pub fn new(name: impl Into<String>) -> Self {
        TNamedObject {
            name: name.into(),
            type_params: SmallVec::new(),
            is_static: false,
            extra_types: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = TUnion>) -> Self {
        self.type_params = params.into_iter().collect();
        self
    }

    /// This object without its intersection members.
    pub fn base(&self) -> TNamedObject {
        TNamedObject {
            name: self.name.clone(),
            type_params: self.type_params.clone(),
            is_static: self.is_static,
            extra_types: Vec::new(),
        }
    }

    /// All intersection members, the base first.
    pub fn intersection_parts(&self) -> Vec<TAtomic> {
        let mut parts = Vec::with_capacity(1 + self.extra_types.len());
        parts.push(TAtomic::NamedObject(self.base()));
        parts.extend(self.extra_types.iter().cloned());
        parts
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TEnumCase {
    pub enum_name: String,
    pub case_name: String,
}

// =============================================================================
// Callables
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallableKind {
    /// `callable`
    Callable,
    /// `Closure`
    Closure,
    /// `callable-array`
    Array,
    /// `callable-object`
    Object,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallableParam {
    /// `None` when the parameter type is omitted (treated as `mixed`).
    pub ty: Option<TUnion>,
    pub is_optional: bool,
    pub is_variadic: bool,
    pub by_ref: bool,
}

impl CallableParam {
    pub fn new(ty: TUnion) -> Self {
        CallableParam {
            ty: Some(ty),
            is_optional: false,
            is_variadic: false,
            by_ref: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallableSignature {
    pub params: Vec<CallableParam>,
    pub return_type: Option<TUnion>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TCallable {
    pub kind: CallableKind,
    pub is_pure: bool,
    pub signature: Option<CallableSignature>,
}

impl TCallable {
    pub fn plain(kind: CallableKind) -> Self {
        TCallable {
            kind,
            is_pure: false,
            signature: None,
        }
    }
}

// =============================================================================
// Templates and the rest
// =============================================================================

/// A template parameter in scope, e.g. `T` declared by `fn-foo` as `object`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TGenericParam {
    pub name: String,
    /// The class-like or function that declares the parameter.
    pub defining_entity: String,
    pub as_type: TUnion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Any,
    Open,
    Closed,
}

/// Declared variance of a class template parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    #[default]
    Covariant,
    Invariant,
    Contravariant,
}

// =============================================================================
// TAtomic
// =============================================================================

/// One elementary type alternative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TAtomic {
    Scalar(TScalar),
    Literal(TLiteral),
    Null,
    True,
    False,
    Array(TArray),
    List(TList),
    KeyedArray(TKeyedArray),
    /// `array<never, never>`: the empty collection.
    EmptyArray,
    Iterable(TIterable),
    Object,
    NamedObject(TNamedObject),
    EnumCase(TEnumCase),
    Callable(TCallable),
    GenericParam(TGenericParam),
    Resource(ResourceKind),
    Mixed,
    Never,
    Void,
}

impl TAtomic {
    pub fn int() -> Self {
        TAtomic::Scalar(TScalar::INT)
    }

    pub fn string() -> Self {
        TAtomic::Scalar(TScalar::STRING)
    }

    pub fn float() -> Self {
        TAtomic::Scalar(TScalar::Float)
    }

    pub fn bool() -> Self {
        TAtomic::Scalar(TScalar::Bool)
    }

    pub fn array_key() -> Self {
        TAtomic::Scalar(TScalar::ArrayKey)
    }

    pub fn literal_int(value: i64) -> Self {
        TAtomic::Literal(TLiteral::Int(value))
    }

    pub fn literal_string(value: impl Into<String>) -> Self {
        TAtomic::Literal(TLiteral::String(value.into()))
    }

    pub fn literal_float(value: f64) -> Self {
        TAtomic::Literal(TLiteral::Float(OrderedFloat(value)))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TAtomic::NamedObject(TNamedObject::new(name))
    }

    pub fn enum_case(enum_name: impl Into<String>, case_name: impl Into<String>) -> Self {
        TAtomic::EnumCase(TEnumCase {
            enum_name: enum_name.into(),
            case_name: case_name.into(),
        })
    }

    /// `array<K, V>`
    pub fn array(key: TUnion, value: TUnion) -> Self {
        TAtomic::Array(TArray {
            key,
            value,
            non_empty: false,
        })
    }

    /// `list<V>`
    pub fn list(value: TUnion) -> Self {
        TAtomic::List(TList {
            value,
            non_empty: false,
        })
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, TAtomic::Mixed)
    }

    pub fn is_never(&self) -> bool {
        matches!(self, TAtomic::Never)
    }

    /// Null-like atomics: `null` and `void`.
    pub fn is_null_like(&self) -> bool {
        matches!(self, TAtomic::Null | TAtomic::Void)
    }

    /// Array-shaped atomics (everything `array` accepts).
    pub fn is_array_like(&self) -> bool {
        matches!(
            self,
            TAtomic::Array(_) | TAtomic::List(_) | TAtomic::KeyedArray(_) | TAtomic::EmptyArray
        )
    }

    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            TAtomic::Object | TAtomic::NamedObject(_) | TAtomic::EnumCase(_)
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, TAtomic::Literal(_) | TAtomic::True | TAtomic::False)
    }

    pub fn has_template(&self) -> bool {
        match self {
            TAtomic::GenericParam(_) => true,
            TAtomic::Scalar(TScalar::ClassString {
                bound: Some(bound), ..
            }) => bound.has_template(),
            TAtomic::Array(array) => array.key.has_template() || array.value.has_template(),
            TAtomic::List(list) => list.value.has_template(),
            TAtomic::Iterable(iterable) => {
                iterable.key.has_template() || iterable.value.has_template()
            }
            TAtomic::KeyedArray(keyed) => {
                keyed.properties.values().any(|prop| prop.ty.has_template())
                    || keyed
                        .fallback
                        .as_ref()
                        .is_some_and(|(key, value)| key.has_template() || value.has_template())
            }
            TAtomic::NamedObject(object) => {
                object.type_params.iter().any(TUnion::has_template)
                    || object.extra_types.iter().any(TAtomic::has_template)
            }
            TAtomic::Callable(callable) => callable.signature.as_ref().is_some_and(|sig| {
                sig.params
                    .iter()
                    .any(|param| param.ty.as_ref().is_some_and(TUnion::has_template))
                    || sig.return_type.as_ref().is_some_and(TUnion::has_template)
            }),
            TAtomic::Scalar(_)
            | TAtomic::Literal(_)
            | TAtomic::Null
            | TAtomic::True
            | TAtomic::False
            | TAtomic::EmptyArray
            | TAtomic::Object
            | TAtomic::EnumCase(_)
            | TAtomic::Resource(_)
            | TAtomic::Mixed
            | TAtomic::Never
            | TAtomic::Void => false,
        }
    }

    /// Canonical identity string, also valid annotation syntax.
    pub fn get_id(&self) -> String {
        crate::format::TypeFormatter::new().format_atomic(self)
    }
}

impl fmt::Display for TAtomic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_id())
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
