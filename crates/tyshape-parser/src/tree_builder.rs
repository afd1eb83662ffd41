//! Recursive-descent tree builder.
//!
//! Precedence, loosest first: union (`|`), intersection (`&`), nullable
//! prefix (`?`), array shorthand suffix (`[]`), primary. Parenthesised
//! groups restart at the union level.

use tracing::trace;
use tyshape_common::ByteSpan;
use tyshape_common::limits::MAX_TYPE_NESTING_DEPTH;

use crate::errors::TypeParseError;
use crate::parse_tree::{
    CallableParamNode, KeyedArrayProperty, LiteralNode, NodeKind, PropertyKeyNode, ShapeRest,
    TypeNode,
};
use crate::tokenizer::{Token, TokenKind};

pub struct TreeBuilder {
    tokens: Vec<Token>,
    pos: usize,
    depth: u32,
    max_depth: u32,
}

impl TreeBuilder {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|token| token.kind != TokenKind::EndOfInput) {
            let end = tokens.last().map_or(0, |token| token.span.end);
            tokens.push(Token {
                kind: TokenKind::EndOfInput,
                span: ByteSpan::at(end),
            });
        }
        TreeBuilder {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: MAX_TYPE_NESTING_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the tree for the whole token stream.
    pub fn build(mut self) -> Result<TypeNode, TypeParseError> {
        if self.is(&TokenKind::EndOfInput) {
            return Err(TypeParseError::syntax(
                self.current_span(),
                "empty type annotation",
            ));
        }
        let node = self.parse_union()?;
        if !self.is(&TokenKind::EndOfInput) {
            return Err(self.unexpected("end of type"));
        }
        Ok(node)
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    fn token(&self, ahead: usize) -> &Token {
        let idx = (self.pos + ahead).min(self.tokens.len().saturating_sub(1));
        &self.tokens[idx]
    }

    fn current(&self) -> &TokenKind {
        &self.token(0).kind
    }

    fn current_span(&self) -> ByteSpan {
        self.token(0).span
    }

    fn is(&self, kind: &TokenKind) -> bool {
        self.current() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.token(0).clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.is(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, TypeParseError> {
        if self.is(kind) {
            return Ok(self.advance());
        }
        Err(self.unexpected(what))
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_since(&self, start: ByteSpan) -> ByteSpan {
        let end = self
            .pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map_or(start.end, |token| token.span.end);
        ByteSpan::new(start.start, end.max(start.end))
    }

    fn unexpected(&self, expected: &str) -> TypeParseError {
        TypeParseError::syntax(
            self.current_span(),
            format!("expected {expected}, found {}", self.current().describe()),
        )
    }

    fn can_start_type(kind: &TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Word(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::String(_)
                | TokenKind::OpenParen
                | TokenKind::Question
        )
    }

    // =========================================================================
    // Unions and intersections
    // =========================================================================

    fn parse_union(&mut self) -> Result<TypeNode, TypeParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(TypeParseError::syntax(
                self.current_span(),
                "type is nested too deeply",
            ));
        }
        let result = self.parse_union_inner();
        self.depth -= 1;
        result
    }

    fn parse_union_inner(&mut self) -> Result<TypeNode, TypeParseError> {
        let start = self.current_span();
        if self.is(&TokenKind::Bar) {
            return Err(TypeParseError::syntax(start, "empty union branch"));
        }

        let first = self.parse_intersection()?;
        if !self.is(&TokenKind::Bar) {
            return Ok(first);
        }

        let mut branches = vec![first];
        while self.eat(&TokenKind::Bar) {
            if !Self::can_start_type(self.current()) {
                return Err(TypeParseError::syntax(
                    self.current_span(),
                    "empty union branch",
                ));
            }
            branches.push(self.parse_intersection()?);
        }
        Ok(TypeNode::new(NodeKind::Union(branches), self.span_since(start)))
    }

    fn parse_intersection(&mut self) -> Result<TypeNode, TypeParseError> {
        let start = self.current_span();
        let first = self.parse_nullable()?;

        let mut parts = vec![first];
        // A trailing `&` not followed by a type is a by-reference marker.
        while self.is(&TokenKind::Ampersand) && Self::can_start_type(&self.token(1).kind) {
            self.advance();
            parts.push(self.parse_nullable()?);
        }

        if parts.len() == 1 {
            return Ok(parts.remove(0));
        }
        Ok(TypeNode::new(
            NodeKind::Intersection(parts),
            self.span_since(start),
        ))
    }

    fn parse_nullable(&mut self) -> Result<TypeNode, TypeParseError> {
        let start = self.current_span();
        if self.eat(&TokenKind::Question) {
            let inner = self.parse_postfix()?;
            return Ok(TypeNode::new(
                NodeKind::Nullable(Box::new(inner)),
                self.span_since(start),
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<TypeNode, TypeParseError> {
        let start = self.current_span();
        let mut node = self.parse_primary()?;
        while self.is(&TokenKind::OpenBracket) {
            self.advance();
            self.expect(&TokenKind::CloseBracket, "`]`")?;
            node = TypeNode::new(
                NodeKind::ArrayShorthand(Box::new(node)),
                self.span_since(start),
            );
        }
        Ok(node)
    }

    // =========================================================================
    // Primaries
    // =========================================================================

    fn parse_primary(&mut self) -> Result<TypeNode, TypeParseError> {
        let start = self.current_span();
        match self.current().clone() {
            TokenKind::OpenParen => {
                self.advance();
                let inner = self.parse_union()?;
                self.expect(&TokenKind::CloseParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::Int(value) => {
                self.advance();
                Ok(TypeNode::new(NodeKind::Literal(LiteralNode::Int(value)), start))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(TypeNode::new(
                    NodeKind::Literal(LiteralNode::Float(value)),
                    start,
                ))
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(TypeNode::new(
                    NodeKind::Literal(LiteralNode::String(value)),
                    start,
                ))
            }
            TokenKind::Word(word) => {
                self.advance();
                self.parse_after_word(word, start)
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    fn parse_after_word(&mut self, word: String, start: ByteSpan) -> Result<TypeNode, TypeParseError> {
        match self.current() {
            TokenKind::DoubleColon => {
                self.advance();
                let TokenKind::Word(member) = self.current().clone() else {
                    return Err(self.unexpected("a constant or case name after `::`"));
                };
                self.advance();
                Ok(TypeNode::new(
                    NodeKind::ClassConstant {
                        class_name: word,
                        member,
                    },
                    self.span_since(start),
                ))
            }
            TokenKind::LessThan => {
                let args = self.parse_generic_args()?;
                Ok(TypeNode::new(
                    NodeKind::Generic { name: word, args },
                    self.span_since(start),
                ))
            }
            TokenKind::OpenBrace => self.parse_shape(word, start),
            TokenKind::OpenParen if is_callable_name(&word) => self.parse_callable(word, start),
            _ => Ok(TypeNode::new(NodeKind::Value(word), start)),
        }
    }

    /// `<A, B>`, including `T of Bound` arguments.
    fn parse_generic_args(&mut self) -> Result<Vec<TypeNode>, TypeParseError> {
        self.expect(&TokenKind::LessThan, "`<`")?;
        if self.is(&TokenKind::GreaterThan) {
            return Err(TypeParseError::syntax(
                self.current_span(),
                "empty generic argument list",
            ));
        }

        let mut args = Vec::new();
        loop {
            args.push(self.parse_generic_arg()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::GreaterThan, "`,` or `>`")?;
            return Ok(args);
        }
    }

    fn parse_generic_arg(&mut self) -> Result<TypeNode, TypeParseError> {
        let start = self.current_span();
        if let (TokenKind::Word(name), TokenKind::Word(keyword)) =
            (self.current().clone(), self.token(1).kind.clone())
        {
            if keyword.eq_ignore_ascii_case("of") || keyword.eq_ignore_ascii_case("as") {
                self.advance();
                self.advance();
                let bound = self.parse_union()?;
                return Ok(TypeNode::new(
                    NodeKind::TemplateAs {
                        name,
                        bound: Box::new(bound),
                    },
                    self.span_since(start),
                ));
            }
        }
        self.parse_union()
    }

    // =========================================================================
    // Shapes
    // =========================================================================

    fn parse_shape(&mut self, head: String, start: ByteSpan) -> Result<TypeNode, TypeParseError> {
        self.expect(&TokenKind::OpenBrace, "`{`")?;
        let mut properties = Vec::new();
        let mut rest = ShapeRest::Sealed;

        while !self.is(&TokenKind::CloseBrace) {
            if self.is(&TokenKind::Ellipsis) {
                self.advance();
                rest = if self.is(&TokenKind::LessThan) {
                    ShapeRest::OpenWith(self.parse_generic_args()?)
                } else {
                    ShapeRest::Open
                };
                self.eat(&TokenKind::Comma);
                if !self.is(&TokenKind::CloseBrace) {
                    return Err(self.unexpected("`}` after `...`"));
                }
                break;
            }

            properties.push(self.parse_shape_property()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::CloseBrace, "`,` or `}`")?;
        trace!(head = %head, properties = properties.len(), "parsed shape");

        Ok(TypeNode::new(
            NodeKind::KeyedArray {
                head,
                properties,
                rest,
            },
            self.span_since(start),
        ))
    }

    fn parse_shape_property(&mut self) -> Result<KeyedArrayProperty, TypeParseError> {
        let key_span = self.current_span();
        let key = match self.current() {
            TokenKind::Word(word) => Some(PropertyKeyNode::Word(word.clone())),
            TokenKind::String(value) => Some(PropertyKeyNode::Quoted(value.clone())),
            TokenKind::Int(value) => Some(PropertyKeyNode::Int(*value)),
            _ => None,
        };
        let next = &self.token(1).kind;
        let optional = *next == TokenKind::Question && self.token(2).kind == TokenKind::Colon;
        let keyed = *next == TokenKind::Colon || optional;

        if let (Some(key), true) = (key, keyed) {
            self.advance();
            if optional {
                self.advance();
            }
            self.advance();
            let value = if self.is(&TokenKind::Comma) || self.is(&TokenKind::CloseBrace) {
                None
            } else {
                Some(self.parse_union()?)
            };
            return Ok(KeyedArrayProperty {
                key,
                key_span,
                value,
                optional,
            });
        }

        let value = self.parse_union()?;
        Ok(KeyedArrayProperty {
            key: PropertyKeyNode::Implicit,
            key_span: value.span,
            value: Some(value),
            optional: false,
        })
    }

    // =========================================================================
    // Callables
    // =========================================================================

    fn parse_callable(&mut self, name: String, start: ByteSpan) -> Result<TypeNode, TypeParseError> {
        self.expect(&TokenKind::OpenParen, "`(`")?;
        let mut params = Vec::new();

        while !self.is(&TokenKind::CloseParen) {
            params.push(self.parse_callable_param()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::CloseParen, "`,` or `)`")?;

        let return_type = if self.eat(&TokenKind::Colon) {
            Some(Box::new(self.parse_nullable()?))
        } else {
            None
        };

        Ok(TypeNode::new(
            NodeKind::Callable {
                name,
                params,
                return_type,
            },
            self.span_since(start),
        ))
    }

    fn parse_callable_param(&mut self) -> Result<CallableParamNode, TypeParseError> {
        let ty = self.parse_union()?;
        let mut param = CallableParamNode {
            ty,
            by_ref: false,
            is_variadic: false,
            is_optional: false,
            name: None,
        };
        loop {
            match self.current().clone() {
                TokenKind::Ampersand => param.by_ref = true,
                TokenKind::Ellipsis => param.is_variadic = true,
                TokenKind::Equals => param.is_optional = true,
                TokenKind::Variable(name) => param.name = Some(name),
                _ => return Ok(param),
            }
            self.advance();
        }
    }
}

/// Words that take a `(...)` signature.
pub fn is_callable_name(word: &str) -> bool {
    let word = word.strip_prefix('\\').unwrap_or(word);
    ["callable", "pure-callable", "closure", "pure-closure"]
        .iter()
        .any(|name| word.eq_ignore_ascii_case(name))
}

#[cfg(test)]
#[path = "tests/tree_builder_tests.rs"]
mod tests;
