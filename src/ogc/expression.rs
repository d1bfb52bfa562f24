/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! OGC expressions: literals, property references and function calls.

use crate::feature_type::{AttributeValue, Feature};
use std::fmt;

/// An OGC expression tree.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum Expression {
    /// A literal token, kept in its textual form until serialization.
    Literal(String),
    /// A reference to a feature attribute.
    Property(String),
    /// A named function over sub-expressions, e.g. `Concatenate`.
    Function(String, Vec<Expression>),
}

/// Wraps a textual token as a literal expression.
pub fn literal<T: Into<String>>(value: T) -> Expression {
    Expression::Literal(value.into())
}

/// References the named feature attribute.
pub fn property<T: Into<String>>(name: T) -> Expression {
    Expression::Property(name.into())
}

/// Builds a function call expression.
pub fn function<T: Into<String>>(name: T, parameters: Vec<Expression>) -> Expression {
    Expression::Function(name.into(), parameters)
}

impl Expression {
    /// Evaluates the expression against a feature.
    ///
    /// Function calls other than `Concatenate` evaluate to `None`; the
    /// translator only ever needs evaluation to check rule coverage, not to
    /// render.
    pub fn evaluate(&self, feature: &Feature) -> Option<AttributeValue> {
        match *self {
            Expression::Literal(ref token) => match token.parse::<f64>() {
                Ok(number) => Some(AttributeValue::Number(number)),
                Err(_) => Some(AttributeValue::String(token.clone())),
            },
            Expression::Property(ref name) => feature.get(name).cloned(),
            Expression::Function(ref name, ref parameters) => {
                if name == "Concatenate" {
                    let mut out = String::new();
                    for parameter in parameters {
                        out.push_str(&parameter.evaluate(feature)?.to_text());
                    }
                    Some(AttributeValue::String(out))
                } else {
                    None
                }
            },
        }
    }

    /// The attribute names this expression references, appended to `names`.
    pub fn collect_properties(&self, names: &mut Vec<String>) {
        let mut stack = vec![self];
        while let Some(expression) = stack.pop() {
            match *expression {
                Expression::Literal(_) => {},
                Expression::Property(ref name) => {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.clone());
                    }
                },
                Expression::Function(_, ref parameters) => {
                    stack.extend(parameters.iter());
                },
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Expression::Literal(ref token) => write!(dest, "'{}'", token),
            Expression::Property(ref name) => write!(dest, "[{}]", name),
            Expression::Function(ref name, ref parameters) => {
                write!(dest, "{}(", name)?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        dest.write_str(", ")?;
                    }
                    write!(dest, "{}", parameter)?;
                }
                dest.write_str(")")
            },
        }
    }
}
