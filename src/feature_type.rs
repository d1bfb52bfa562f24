/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Minimal feature-type descriptions, guessed from the stylesheet.
//!
//! The real feature-type introspection library lives outside the core;
//! what the translator needs is just enough typing information to simplify
//! attribute ranges, which [`FeatureTypeGuesser`] reconstructs from the
//! attribute references found in selectors and property expressions.

use crate::ogc::expression::Expression;
use crate::ogc::filter::Filter;
use crate::selectors::Selector;
use crate::stylesheets::CssRule;
use crate::values::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The coarse type of a feature attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeType {
    /// Textual attribute.
    String,
    /// Numeric attribute.
    Number,
    /// Geometry attribute.
    Geometry,
}

/// A minimal feature type: a name and the coarse type of each attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureType {
    /// The feature type name, when one is known.
    pub name: Option<String>,
    /// Attribute name to coarse type.
    pub attributes: BTreeMap<String, AttributeType>,
}

impl FeatureType {
    /// The declared type of `attribute`, if the guesser saw it.
    pub fn attribute_type(&self, attribute: &str) -> Option<AttributeType> {
        self.attributes.get(attribute).copied()
    }
}

/// A concrete attribute value, used when evaluating filters over features.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// Textual value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl AttributeValue {
    /// The value as a number, when it is one (or parses as one).
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            AttributeValue::Number(number) => Some(number),
            AttributeValue::String(ref text) => text.parse().ok(),
        }
    }

    /// The textual form of the value.
    pub fn to_text(&self) -> String {
        match *self {
            AttributeValue::Number(number) => {
                if number.fract() == 0.0 && number.is_finite() {
                    format!("{}", number as i64)
                } else {
                    format!("{}", number)
                }
            },
            AttributeValue::String(ref text) => text.clone(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        dest.write_str(&self.to_text())
    }
}

/// A flat feature sample: an optional id plus attribute values.
///
/// This is not a rendering feature model, just the minimum filter
/// evaluation needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feature {
    /// The feature id, used by id-set filters.
    pub id: Option<String>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Feature {
    /// An empty feature.
    pub fn new() -> Feature {
        Feature::default()
    }

    /// Sets an attribute value.
    pub fn set<T: Into<String>>(&mut self, name: T, value: AttributeValue) {
        self.attributes.insert(name.into(), value);
    }

    /// Reads an attribute value.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// Infers a minimal [`FeatureType`] from the rules that will be grouped
/// under it.
#[derive(Debug, Default)]
pub struct FeatureTypeGuesser {
    attributes: BTreeMap<String, AttributeType>,
}

impl FeatureTypeGuesser {
    /// A guesser with no attributes seen yet.
    pub fn new() -> FeatureTypeGuesser {
        FeatureTypeGuesser::default()
    }

    /// Harvests attribute references from a rule's selector and property
    /// expressions.
    pub fn add_rule(&mut self, rule: &CssRule) {
        rule.selector.for_each_atom(&mut |atom| {
            if let Selector::Data(ref filter) = *atom {
                self.add_filter(filter);
            }
        });
        for ((_, name), values) in rule.properties.iter() {
            let geometry = name.name().ends_with("-geometry");
            for value in values {
                self.add_value(value, geometry);
            }
        }
    }

    /// The guessed feature type, or `None` when no attribute was ever
    /// referenced.
    pub fn into_feature_type(self, name: Option<&str>) -> Option<FeatureType> {
        if self.attributes.is_empty() {
            return None;
        }
        Some(FeatureType {
            name: name.map(|n| n.to_owned()),
            attributes: self.attributes,
        })
    }

    fn add_filter(&mut self, filter: &Filter) {
        let mut stack = vec![filter];
        while let Some(filter) = stack.pop() {
            match *filter {
                Filter::Include | Filter::Exclude | Filter::Id(_) => {},
                Filter::And(ref children) | Filter::Or(ref children) => {
                    stack.extend(children.iter());
                },
                Filter::Not(ref child) => stack.push(child),
                Filter::Compare { ref left, ref right, .. } => {
                    self.add_comparison(left, right);
                    self.add_comparison(right, left);
                },
                Filter::Between { ref expression, ref lower, ref upper } => {
                    if let Expression::Property(ref name) = *expression {
                        self.record(name, AttributeType::Number);
                    }
                    self.add_expression(lower);
                    self.add_expression(upper);
                },
                Filter::Like { ref expression, .. } => {
                    if let Expression::Property(ref name) = *expression {
                        self.record(name, AttributeType::String);
                    }
                },
            }
        }
    }

    /// Types the property side of a comparison from its opposite operand.
    fn add_comparison(&mut self, side: &Expression, other: &Expression) {
        if let Expression::Property(ref name) = *side {
            let inferred = match *other {
                Expression::Literal(ref token) => {
                    if token.parse::<f64>().is_ok() {
                        AttributeType::Number
                    } else {
                        AttributeType::String
                    }
                },
                _ => AttributeType::String,
            };
            self.record(name, inferred);
        } else {
            self.add_expression(side);
        }
    }

    fn add_expression(&mut self, expression: &Expression) {
        let mut names = vec![];
        expression.collect_properties(&mut names);
        for name in names {
            self.record(&name, AttributeType::String);
        }
    }

    fn add_value(&mut self, value: &Value, geometry: bool) {
        match *value {
            Value::Literal(_) => {},
            Value::Function(_, ref parameters) | Value::MultiValue(ref parameters) => {
                for parameter in parameters {
                    self.add_value(parameter, geometry);
                }
            },
            Value::Expression(ref expression) => {
                let mut names = vec![];
                expression.collect_properties(&mut names);
                for name in names {
                    if geometry {
                        self.attributes.insert(name, AttributeType::Geometry);
                    } else {
                        self.record(&name, AttributeType::String);
                    }
                }
            },
        }
    }

    /// Records a sighting; conflicting numeric/string sightings widen to
    /// string, geometry is never overridden.
    fn record(&mut self, name: &str, inferred: AttributeType) {
        match self.attributes.get(name).copied() {
            None => {
                self.attributes.insert(name.to_owned(), inferred);
            },
            Some(AttributeType::Geometry) => {},
            Some(existing) if existing == inferred => {},
            Some(_) => {
                self.attributes.insert(name.to_owned(), AttributeType::String);
            },
        }
    }
}
