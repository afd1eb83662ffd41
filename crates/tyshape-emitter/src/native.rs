//! Native type declarations.
//!
//! Projects a [`TUnion`] onto the type syntax the target language accepts in
//! a parameter or return position. Most annotation types have a lossy native
//! form (`list<int>` becomes `array`); the result records whether the
//! rendering is exact so callers know when a docblock tag has to carry the
//! precise type. Unions with no native form at all are reported as
//! [`UnrepresentableTypeError`].

use std::fmt;

use tracing::trace;
use tyshape_common::FqName;
use tyshape_solver::{
    CallableKind, StringRefinement, TAtomic, TLiteral, TNamedObject, TScalar, TUnion,
};

use crate::target::NativeTarget;

/// Where the declaration appears. `void`, `never` and `static` are only
/// valid as return types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypePosition {
    Parameter,
    Return,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeType {
    pub text: String,
    /// The declaration accepts exactly the values of the union it came from.
    pub exact: bool,
}

impl NativeType {
    fn new(text: impl Into<String>, exact: bool) -> Self {
        NativeType {
            text: text.into(),
            exact,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnrepresentableTypeError {
    pub type_id: String,
    pub reason: String,
}

impl fmt::Display for UnrepresentableTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` has no native declaration: {}",
            self.type_id, self.reason
        )
    }
}

impl std::error::Error for UnrepresentableTypeError {}

/// Members collected from a union before they are joined.
#[derive(Default)]
struct Members {
    parts: Vec<String>,
    nullable: bool,
    exact: bool,
    intersection: bool,
}

impl Members {
    fn push(&mut self, text: impl Into<String>, exact: bool) {
        let text = text.into();
        if !self.parts.contains(&text) {
            self.parts.push(text);
        }
        self.exact &= exact;
    }
}

pub struct NativeTypePrinter<'a> {
    namespace: &'a str,
    target: NativeTarget,
}

impl<'a> NativeTypePrinter<'a> {
    /// Names render relative to `namespace` (the empty string is the global
    /// namespace).
    pub fn new(namespace: &'a str, target: NativeTarget) -> Self {
        NativeTypePrinter { namespace, target }
    }

    pub fn print(
        &self,
        union: &TUnion,
        position: TypePosition,
    ) -> Result<NativeType, UnrepresentableTypeError> {
        let result = self.print_inner(union, position).map_err(|reason| UnrepresentableTypeError {
            type_id: union.get_id(),
            reason,
        });
        trace!(ty = %union, ?position, ?result, "native rendering");
        result
    }

    fn print_inner(&self, union: &TUnion, position: TypePosition) -> Result<NativeType, String> {
        if let Some(single) = union.get_single() {
            match single {
                TAtomic::Mixed => {
                    self.require(self.target.supports_mixed(), "`mixed` needs 8.0")?;
                    return Ok(NativeType::new("mixed", true));
                }
                TAtomic::Void => {
                    if position != TypePosition::Return {
                        return Err("`void` is only valid as a return type".to_string());
                    }
                    return Ok(NativeType::new("void", true));
                }
                TAtomic::Never => {
                    if position != TypePosition::Return {
                        return Err("`never` is only valid as a return type".to_string());
                    }
                    self.require(self.target.supports_never(), "`never` needs 8.1")?;
                    return Ok(NativeType::new("never", true));
                }
                TAtomic::Null => {
                    self.require(
                        self.target.supports_standalone_literals(),
                        "standalone `null` needs 8.2",
                    )?;
                    return Ok(NativeType::new("null", true));
                }
                _ => {}
            }
        }

        let standalone = union.iter().filter(|atomic| **atomic != TAtomic::Null).count() == 1;
        let mut members = Members {
            exact: true,
            ..Members::default()
        };
        self.collect(union, position, standalone, &mut members)?;

        if members.parts.iter().any(|part| part == "mixed") {
            // A template bounded by `mixed` swallows the rest of the union.
            self.require(self.target.supports_mixed(), "`mixed` needs 8.0")?;
            return Ok(NativeType::new("mixed", false));
        }
        if members.parts.iter().any(|part| part == "bool") {
            members.parts.retain(|part| part != "true" && part != "false");
        }

        match members.parts.len() {
            0 => Err("no member has a native form".to_string()),
            1 if !members.nullable => Ok(NativeType::new(members.parts.remove(0), members.exact)),
            _ if members.intersection => {
                Err("intersections cannot be combined with other types".to_string())
            }
            1 => Ok(NativeType::new(format!("?{}", members.parts[0]), members.exact)),
            _ => {
                self.require(self.target.supports_union_types(), "union types need 8.0")?;
                if members.nullable {
                    members.parts.push("null".to_string());
                }
                Ok(NativeType::new(members.parts.join("|"), members.exact))
            }
        }
    }

    fn collect(
        &self,
        union: &TUnion,
        position: TypePosition,
        standalone: bool,
        members: &mut Members,
    ) -> Result<(), String> {
        for atomic in union.iter() {
            match atomic {
                TAtomic::Null => members.nullable = true,
                TAtomic::GenericParam(param) => {
                    members.exact = false;
                    if param.as_type.is_mixed() {
                        members.push("mixed", false);
                    } else {
                        self.collect(&param.as_type, position, standalone, members)?;
                    }
                }
                other => self.collect_atomic(other, position, standalone, members)?,
            }
        }
        Ok(())
    }

    fn collect_atomic(
        &self,
        atomic: &TAtomic,
        position: TypePosition,
        standalone: bool,
        members: &mut Members,
    ) -> Result<(), String> {
        match atomic {
            TAtomic::Scalar(scalar) => match scalar {
                TScalar::Bool => members.push("bool", true),
                TScalar::Int(range) => members.push("int", range.is_unbounded()),
                TScalar::LiteralInt => members.push("int", false),
                TScalar::Float => members.push("float", true),
                TScalar::String(refinement) => {
                    members.push("string", *refinement == StringRefinement::Plain)
                }
                TScalar::ClassString { .. } => members.push("string", false),
                TScalar::ArrayKey => {
                    members.push("int", true);
                    members.push("string", true);
                }
                TScalar::Numeric => {
                    members.push("int", false);
                    members.push("float", false);
                    members.push("string", false);
                }
                TScalar::Scalar => {
                    for part in ["bool", "int", "float", "string"] {
                        members.push(part, true);
                    }
                }
            },
            TAtomic::Literal(literal) => {
                let keyword = match literal {
                    TLiteral::Int(_) => "int",
                    TLiteral::Float(_) => "float",
                    TLiteral::String(_) | TLiteral::ClassString(_) => "string",
                };
                members.push(keyword, false);
            }
            TAtomic::True | TAtomic::False => {
                let keyword = if *atomic == TAtomic::True { "true" } else { "false" };
                // `false` joins unions from 8.0; `true` and standalone forms need 8.2.
                let allowed = self.target.supports_standalone_literals()
                    || (*atomic == TAtomic::False && !standalone);
                if allowed {
                    members.push(keyword, true);
                } else {
                    members.push("bool", false);
                }
            }
            TAtomic::Array(array) => {
                let exact =
                    !array.non_empty && array.key == TUnion::array_key() && array.value.is_mixed();
                members.push("array", exact);
            }
            TAtomic::List(_) | TAtomic::KeyedArray(_) | TAtomic::EmptyArray => {
                members.push("array", false)
            }
            TAtomic::Iterable(iterable) => {
                members.push("iterable", iterable.key.is_mixed() && iterable.value.is_mixed())
            }
            TAtomic::Object => members.push("object", true),
            TAtomic::NamedObject(object) => self.collect_object(object, position, members)?,
            TAtomic::EnumCase(case) => members.push(self.name(&case.enum_name), false),
            TAtomic::Callable(callable) => {
                let plain = callable.signature.is_none() && !callable.is_pure;
                match callable.kind {
                    CallableKind::Callable => members.push("callable", plain),
                    CallableKind::Closure => members.push(self.name("Closure"), plain),
                    CallableKind::Array => members.push("array", false),
                    CallableKind::Object => members.push("object", false),
                }
            }
            TAtomic::Resource(_) => return Err("resources have no native type".to_string()),
            TAtomic::Void | TAtomic::Never => {
                return Err(format!("`{}` cannot be part of a union", atomic.get_id()));
            }
            TAtomic::Mixed => members.push("mixed", true),
            TAtomic::Null | TAtomic::GenericParam(_) => {
                let nested = TUnion::from_atomic(atomic.clone());
                self.collect(&nested, position, standalone, members)?;
            }
        }
        Ok(())
    }

    fn collect_object(
        &self,
        object: &TNamedObject,
        position: TypePosition,
        members: &mut Members,
    ) -> Result<(), String> {
        let exact = object.type_params.is_empty();

        if object.is_static {
            if position != TypePosition::Return {
                return Err("`static` is only valid as a return type".to_string());
            }
            self.require(self.target.supports_static_return(), "`static` needs 8.0")?;
            members.push("static", exact && object.extra_types.is_empty());
            return Ok(());
        }

        if object.extra_types.is_empty() {
            members.push(self.class_name(&object.name), exact);
            return Ok(());
        }

        self.require(self.target.supports_intersections(), "intersection types need 8.1")?;
        let mut parts = Vec::new();
        let mut all_exact = exact;
        for part in object.intersection_parts() {
            match part {
                TAtomic::NamedObject(named) if !named.is_static => {
                    all_exact &= named.type_params.is_empty();
                    parts.push(self.class_name(&named.name));
                }
                other => {
                    return Err(format!(
                        "`{}` cannot appear in a native intersection",
                        other.get_id()
                    ));
                }
            }
        }
        members.intersection = true;
        members.push(parts.join("&"), all_exact);
        Ok(())
    }

    fn class_name(&self, name: &str) -> String {
        if name.eq_ignore_ascii_case("self") {
            return "self".to_string();
        }
        self.name(name)
    }

    fn name(&self, name: &str) -> String {
        FqName::new(name).relative_to(self.namespace)
    }

    fn require(&self, supported: bool, reason: &str) -> Result<(), String> {
        if supported {
            return Ok(());
        }
        Err(format!("{reason} (target is {})", self.target))
    }
}

/// Render `union` as a native parameter declaration for code in `namespace`.
pub fn to_native_syntax(
    union: &TUnion,
    namespace: &str,
    target: NativeTarget,
) -> Result<NativeType, UnrepresentableTypeError> {
    NativeTypePrinter::new(namespace, target).print(union, TypePosition::Parameter)
}

#[cfg(test)]
#[path = "tests/native_tests.rs"]
mod tests;
