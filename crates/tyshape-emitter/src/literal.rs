//! Literal value expressions for defaults and constants.
//!
//! The first member of the union with a concrete literal form wins. A union
//! with no such member (`mixed`, an unconstrained object) yields
//! [`UNKNOWN_VALUE_PLACEHOLDER`] instead of an error: a generated default
//! that reads as a string is still valid source.

use tyshape_common::names::strip_leading_separator;
use tyshape_solver::format::{format_float, quote_string};
use tyshape_solver::{ArrayKey, TAtomic, TKeyedArray, TLiteral, TUnion};

pub const UNKNOWN_VALUE_PLACEHOLDER: &str = "'could not infer this type'";

pub fn to_literal_expression(union: &TUnion) -> String {
    union
        .iter()
        .find_map(atomic_expression)
        .unwrap_or_else(|| UNKNOWN_VALUE_PLACEHOLDER.to_string())
}

fn atomic_expression(atomic: &TAtomic) -> Option<String> {
    let expression = match atomic {
        TAtomic::Literal(TLiteral::ClassString(name)) => {
            format!("\\{}::class", strip_leading_separator(name))
        }
        TAtomic::Literal(TLiteral::String(value)) => quote_string(value),
        TAtomic::Literal(TLiteral::Int(value)) => value.to_string(),
        TAtomic::Literal(TLiteral::Float(value)) => format_float(value.0),
        TAtomic::False => "false".to_string(),
        TAtomic::True => "true".to_string(),
        TAtomic::Null => "null".to_string(),
        TAtomic::Array(_) | TAtomic::List(_) | TAtomic::EmptyArray => "[]".to_string(),
        TAtomic::KeyedArray(keyed) => keyed_expression(keyed),
        TAtomic::EnumCase(case) => format!(
            "\\{}::{}",
            strip_leading_separator(&case.enum_name),
            case.case_name
        ),
        _ => return None,
    };
    Some(expression)
}

/// `['a', 'b']` for lists, `['x' => 1, 2 => null]` otherwise. Declared key
/// order is kept.
fn keyed_expression(keyed: &TKeyedArray) -> String {
    let items: Vec<String> = keyed
        .properties
        .iter()
        .map(|(key, property)| {
            let value = to_literal_expression(&property.ty);
            if keyed.is_list {
                return value;
            }
            match key {
                ArrayKey::Int(index) => format!("{index} => {value}"),
                ArrayKey::String(name) => format!("{} => {value}", quote_string(name)),
            }
        })
        .collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
#[path = "tests/literal_tests.rs"]
mod tests;
