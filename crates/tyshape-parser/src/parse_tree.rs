//! Intermediate parse tree.
//!
//! Built by the tree builder, consumed by the resolver in the same parse
//! call and then dropped. Nodes own their children directly.

use tyshape_common::ByteSpan;

#[derive(Clone, Debug, PartialEq)]
pub struct TypeNode {
    pub kind: NodeKind,
    pub span: ByteSpan,
}

impl TypeNode {
    pub fn new(kind: NodeKind, span: ByteSpan) -> Self {
        TypeNode { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralNode {
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A bare word: keyword, template name or class name.
    Value(String),
    Literal(LiteralNode),
    /// `Foo::class` or `Foo::CASE`.
    ClassConstant { class_name: String, member: String },
    /// `Name<A, B>`
    Generic { name: String, args: Vec<TypeNode> },
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    /// `?T`
    Nullable(Box<TypeNode>),
    /// `T[]`
    ArrayShorthand(Box<TypeNode>),
    /// `array{...}` / `list{...}`
    KeyedArray {
        head: String,
        properties: Vec<KeyedArrayProperty>,
        rest: ShapeRest,
    },
    /// `callable(A, B=): R`, `Closure(...)`
    Callable {
        name: String,
        params: Vec<CallableParamNode>,
        return_type: Option<Box<TypeNode>>,
    },
    /// `T of Bound` inside `class-string-map<...>`.
    TemplateAs { name: String, bound: Box<TypeNode> },
}

/// Written key of a shape property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyKeyNode {
    /// Positional entry; the key is its index.
    Implicit,
    Word(String),
    Quoted(String),
    Int(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyedArrayProperty {
    pub key: PropertyKeyNode,
    pub key_span: ByteSpan,
    /// `None` when the key is declared without a type (`array{a?:}`).
    pub value: Option<TypeNode>,
    pub optional: bool,
}

/// What follows the declared properties of a shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeRest {
    Sealed,
    /// `...`
    Open,
    /// `...<V>` or `...<K, V>`
    OpenWith(Vec<TypeNode>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallableParamNode {
    pub ty: TypeNode,
    pub by_ref: bool,
    pub is_variadic: bool,
    pub is_optional: bool,
    pub name: Option<String>,
}
