/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Property values as the parser hands them over.

use crate::ogc::expression::{self, Expression};
use std::fmt;

/// The name of the `symbol(...)` graphic constructor.
pub const SYMBOL: &str = "symbol";
/// The name of the `url(...)` graphic constructor.
pub const URL: &str = "url";
/// The name of the `color-map-entry(...)` constructor.
pub const COLOR_MAP_ENTRY: &str = "color-map-entry";

/// A single cartographic property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A textual token: number, color, identifier, dimensioned quantity.
    Literal(String),
    /// A named constructor, e.g. `symbol(circle)` or `url(icon.png)`.
    Function(String, Vec<Value>),
    /// A comma- or space-separated list: repeated symbolizers, dash
    /// arrays, color maps, concatenated labels.
    MultiValue(Vec<Value>),
    /// An expression already promoted from literal form by the parser.
    Expression(Expression),
}

impl Value {
    /// A literal token value.
    pub fn literal<T: Into<String>>(token: T) -> Value {
        Value::Literal(token.into())
    }

    /// A function value.
    pub fn function<T: Into<String>>(name: T, parameters: Vec<Value>) -> Value {
        Value::Function(name.into(), parameters)
    }

    /// A multi-value.
    pub fn multi(values: Vec<Value>) -> Value {
        Value::MultiValue(values)
    }

    /// The textual projection of the value.
    pub fn to_literal(&self) -> String {
        match *self {
            Value::Literal(ref token) => token.clone(),
            Value::Function(ref name, ref parameters) => {
                let parameters: Vec<String> =
                    parameters.iter().map(Value::to_literal).collect();
                format!("{}({})", name, parameters.join(", "))
            },
            Value::MultiValue(ref values) => {
                let values: Vec<String> = values.iter().map(Value::to_literal).collect();
                values.join(" ")
            },
            Value::Expression(ref expression) => format!("{}", expression),
        }
    }

    /// The expression projection of the value, literal-wrapped when
    /// needed.
    pub fn to_expression(&self) -> Expression {
        match *self {
            Value::Expression(ref expression) => expression.clone(),
            ref other => expression::literal(other.to_literal()),
        }
    }

    /// The sub-values of a multi-value, or the value itself as a
    /// singleton list.
    pub fn flatten(&self) -> Vec<&Value> {
        match *self {
            Value::MultiValue(ref values) => values.iter().collect(),
            ref single => vec![single],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        dest.write_str(&self.to_literal())
    }
}

/// Strips the trailing default-unit suffix from a dimensioned literal.
///
/// `12px` with default `px` becomes `12`; any other suffix is preserved
/// verbatim so downstream unit-of-measure handling can see it.
pub fn strip_default_unit<'a>(literal: &'a str, default_unit: &str) -> &'a str {
    match literal.strip_suffix(default_unit) {
        Some(stripped) => stripped,
        None => literal,
    }
}

/// Parses a numeric literal, normalizing percentages to the `[0, 1]`
/// range.
pub fn parse_double(literal: &str) -> Option<f64> {
    match literal.strip_suffix('%') {
        Some(stripped) => stripped.trim().parse::<f64>().ok().map(|d| d / 100.0),
        None => literal.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogc::expression::property;

    #[test]
    fn literal_projections() {
        let value = Value::literal("#ff0000");
        assert_eq!(value.to_literal(), "#ff0000");
        assert_eq!(value.to_expression(), expression::literal("#ff0000"));
    }

    #[test]
    fn expression_projection_is_transparent() {
        let value = Value::Expression(property("name"));
        assert_eq!(value.to_expression(), property("name"));
    }

    #[test]
    fn function_literal_form() {
        let value = Value::function(
            SYMBOL,
            vec![Value::literal("circle")],
        );
        assert_eq!(value.to_literal(), "symbol(circle)");
    }

    #[test]
    fn unit_stripping() {
        assert_eq!(strip_default_unit("12px", "px"), "12");
        assert_eq!(strip_default_unit("30deg", "px"), "30deg");
        assert_eq!(strip_default_unit("12", "px"), "12");
    }

    #[test]
    fn percentage_normalization() {
        assert_eq!(parse_double("50%"), Some(0.5));
        assert_eq!(parse_double("0.5"), Some(0.5));
        assert_eq!(parse_double("12"), Some(12.0));
        assert_eq!(parse_double("bogus"), None);
    }
}
