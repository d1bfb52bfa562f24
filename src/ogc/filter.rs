/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! OGC filters over feature attributes.
//!
//! `INCLUDE` and `EXCLUDE` are the identities of conjunction and
//! disjunction; the factory functions normalize as they build so that
//! degenerate trees collapse eagerly, the same way the selector algebra
//! does one level up.

use crate::feature_type::{AttributeType, AttributeValue, Feature, FeatureType};
use crate::ogc::expression::Expression;
use std::collections::BTreeSet;
use std::fmt;

/// A binary comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComparisonOp {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
}

/// An OGC filter tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Matches every feature.
    Include,
    /// Matches no feature.
    Exclude,
    /// Conjunction.
    And(Vec<Filter>),
    /// Disjunction.
    Or(Vec<Filter>),
    /// Negation.
    Not(Box<Filter>),
    /// Binary attribute comparison.
    Compare {
        /// The operator.
        op: ComparisonOp,
        /// Left operand.
        left: Expression,
        /// Right operand.
        right: Expression,
    },
    /// `BETWEEN` over a closed interval.
    Between {
        /// The tested expression.
        expression: Expression,
        /// Lower bound, inclusive.
        lower: Expression,
        /// Upper bound, inclusive.
        upper: Expression,
    },
    /// SQL `LIKE` pattern match (`%` and `_` wildcards).
    Like {
        /// The tested expression.
        expression: Expression,
        /// The pattern.
        pattern: String,
    },
    /// Feature-id set membership.
    Id(BTreeSet<String>),
}

/// Conjunction of two filters, normalized.
pub fn and(a: Filter, b: Filter) -> Filter {
    all(vec![a, b])
}

/// Disjunction of two filters, normalized.
pub fn or(a: Filter, b: Filter) -> Filter {
    any(vec![a, b])
}

/// Conjunction of any number of filters, normalized.
pub fn all(filters: Vec<Filter>) -> Filter {
    let mut children: Vec<Filter> = Vec::with_capacity(filters.len());
    let mut stack: Vec<Filter> = filters.into_iter().rev().collect();
    while let Some(filter) = stack.pop() {
        match filter {
            Filter::Include => {},
            Filter::Exclude => return Filter::Exclude,
            Filter::And(nested) => stack.extend(nested.into_iter().rev()),
            other => {
                if !children.contains(&other) {
                    children.push(other);
                }
            },
        }
    }
    if conjunction_excludes(&children) {
        return Filter::Exclude;
    }
    match children.len() {
        0 => Filter::Include,
        1 => children.pop().expect("len checked"),
        _ => Filter::And(children),
    }
}

/// Disjunction of any number of filters, normalized.
pub fn any(filters: Vec<Filter>) -> Filter {
    let mut children: Vec<Filter> = Vec::with_capacity(filters.len());
    let mut stack: Vec<Filter> = filters.into_iter().rev().collect();
    while let Some(filter) = stack.pop() {
        match filter {
            Filter::Exclude => {},
            Filter::Include => return Filter::Include,
            Filter::Or(nested) => stack.extend(nested.into_iter().rev()),
            other => {
                if !children.contains(&other) {
                    children.push(other);
                }
            },
        }
    }
    if disjunction_includes(&children) {
        return Filter::Include;
    }
    match children.len() {
        0 => Filter::Exclude,
        1 => children.pop().expect("len checked"),
        _ => Filter::Or(children),
    }
}

/// Negation, normalized.
pub fn not(filter: Filter) -> Filter {
    match filter {
        Filter::Include => Filter::Exclude,
        Filter::Exclude => Filter::Include,
        Filter::Not(inner) => *inner,
        other => Filter::Not(Box::new(other)),
    }
}

/// `left = right`.
pub fn equals(left: Expression, right: Expression) -> Filter {
    compare(ComparisonOp::Equal, left, right)
}

/// `left <> right`.
pub fn not_equals(left: Expression, right: Expression) -> Filter {
    compare(ComparisonOp::NotEqual, left, right)
}

/// `left < right`.
pub fn less(left: Expression, right: Expression) -> Filter {
    compare(ComparisonOp::Less, left, right)
}

/// `left <= right`.
pub fn less_or_equal(left: Expression, right: Expression) -> Filter {
    compare(ComparisonOp::LessOrEqual, left, right)
}

/// `left > right`.
pub fn greater(left: Expression, right: Expression) -> Filter {
    compare(ComparisonOp::Greater, left, right)
}

/// `left >= right`.
pub fn greater_or_equal(left: Expression, right: Expression) -> Filter {
    compare(ComparisonOp::GreaterOrEqual, left, right)
}

/// A binary comparison.
pub fn compare(op: ComparisonOp, left: Expression, right: Expression) -> Filter {
    Filter::Compare { op, left, right }
}

/// `expression BETWEEN lower AND upper`.
pub fn between(expression: Expression, lower: Expression, upper: Expression) -> Filter {
    Filter::Between { expression, lower, upper }
}

/// `expression LIKE pattern`.
pub fn like<T: Into<String>>(expression: Expression, pattern: T) -> Filter {
    Filter::Like { expression, pattern: pattern.into() }
}

/// Feature-id membership.
pub fn id<I>(ids: I) -> Filter
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    Filter::Id(ids.into_iter().map(Into::into).collect())
}

/// `x AND NOT x` made structural: the conjunction also excludes when a
/// negated conjunction has every conjunct already present (flattening
/// hides the direct pair), or a negated disjunction has any disjunct
/// present.
fn conjunction_excludes(children: &[Filter]) -> bool {
    children.iter().any(|child| {
        if let Filter::Not(ref inner) = *child {
            match **inner {
                Filter::And(ref parts) => parts.iter().all(|part| children.contains(part)),
                Filter::Or(ref parts) => parts.iter().any(|part| children.contains(part)),
                ref atom => children.iter().any(|other| other == atom),
            }
        } else {
            false
        }
    })
}

/// The dual of [`conjunction_excludes`]: `x OR NOT x` is everything.
fn disjunction_includes(children: &[Filter]) -> bool {
    children.iter().any(|child| {
        if let Filter::Not(ref inner) = *child {
            match **inner {
                Filter::Or(ref parts) => parts.iter().all(|part| children.contains(part)),
                Filter::And(ref parts) => parts.iter().any(|part| children.contains(part)),
                ref atom => children.iter().any(|other| other == atom),
            }
        } else {
            false
        }
    })
}

impl Filter {
    /// Structurally simplifies the filter, using `feature_type` (when
    /// available) to fold numeric attribute ranges that are empty or
    /// contradictory.
    pub fn simplify(&self, feature_type: Option<&FeatureType>) -> Filter {
        match *self {
            Filter::And(ref children) => {
                let simplified = all(
                    children.iter().map(|c| c.simplify(feature_type)).collect(),
                );
                if let Filter::And(ref conjuncts) = simplified {
                    if contradictory_ranges(conjuncts, feature_type) {
                        return Filter::Exclude;
                    }
                }
                simplified
            },
            Filter::Or(ref children) => any(
                children.iter().map(|c| c.simplify(feature_type)).collect(),
            ),
            Filter::Not(ref child) => not(child.simplify(feature_type)),
            ref leaf => leaf.clone(),
        }
    }

    /// Whether the filter matches `feature`.
    ///
    /// Unresolvable operands (missing attributes, non-numeric ordering
    /// comparisons) never match, mirroring filter-encoding semantics.
    pub fn matches(&self, feature: &Feature) -> bool {
        match *self {
            Filter::Include => true,
            Filter::Exclude => false,
            Filter::And(ref children) => children.iter().all(|c| c.matches(feature)),
            Filter::Or(ref children) => children.iter().any(|c| c.matches(feature)),
            Filter::Not(ref child) => !child.matches(feature),
            Filter::Compare { op, ref left, ref right } => {
                let (left, right) = match (left.evaluate(feature), right.evaluate(feature)) {
                    (Some(left), Some(right)) => (left, right),
                    _ => return false,
                };
                compare_values(op, &left, &right)
            },
            Filter::Between { ref expression, ref lower, ref upper } => {
                let value = expression.evaluate(feature).and_then(|v| v.as_number());
                let lower = lower.evaluate(feature).and_then(|v| v.as_number());
                let upper = upper.evaluate(feature).and_then(|v| v.as_number());
                match (value, lower, upper) {
                    (Some(v), Some(lo), Some(hi)) => lo <= v && v <= hi,
                    _ => false,
                }
            },
            Filter::Like { ref expression, ref pattern } => {
                match expression.evaluate(feature) {
                    Some(value) => like_matches(pattern, &value.to_text()),
                    None => false,
                }
            },
            Filter::Id(ref ids) => match feature.id {
                Some(ref id) => ids.contains(id),
                None => false,
            },
        }
    }
}

fn compare_values(op: ComparisonOp, left: &AttributeValue, right: &AttributeValue) -> bool {
    if let (Some(left), Some(right)) = (left.as_number(), right.as_number()) {
        return match op {
            ComparisonOp::Equal => left == right,
            ComparisonOp::NotEqual => left != right,
            ComparisonOp::Less => left < right,
            ComparisonOp::LessOrEqual => left <= right,
            ComparisonOp::Greater => left > right,
            ComparisonOp::GreaterOrEqual => left >= right,
        };
    }
    let (left, right) = (left.to_text(), right.to_text());
    match op {
        ComparisonOp::Equal => left == right,
        ComparisonOp::NotEqual => left != right,
        ComparisonOp::Less => left < right,
        ComparisonOp::LessOrEqual => left <= right,
        ComparisonOp::Greater => left > right,
        ComparisonOp::GreaterOrEqual => left >= right,
    }
}

/// SQL LIKE, anchored on both sides.
fn like_matches(pattern: &str, value: &str) -> bool {
    fn matches_at(pattern: &[char], value: &[char]) -> bool {
        match pattern.split_first() {
            None => value.is_empty(),
            Some((&'%', rest)) => {
                (0..=value.len()).any(|skip| matches_at(rest, &value[skip..]))
            },
            Some((&'_', rest)) => {
                !value.is_empty() && matches_at(rest, &value[1..])
            },
            Some((c, rest)) => match value.split_first() {
                Some((v, value_rest)) => c == v && matches_at(rest, value_rest),
                None => false,
            },
        }
    }
    let pattern: Vec<char> = pattern.chars().collect();
    let value: Vec<char> = value.chars().collect();
    matches_at(&pattern, &value)
}

/// A one-attribute numeric interval accumulated from comparison atoms.
#[derive(Clone, Copy, Debug)]
struct NumericRange {
    min: f64,
    min_inclusive: bool,
    max: f64,
    max_inclusive: bool,
}

impl NumericRange {
    fn full() -> NumericRange {
        NumericRange {
            min: f64::NEG_INFINITY,
            min_inclusive: false,
            max: f64::INFINITY,
            max_inclusive: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.min > self.max || (self.min == self.max && !(self.min_inclusive && self.max_inclusive))
    }

    fn clamp_min(&mut self, value: f64, inclusive: bool) {
        if value > self.min || (value == self.min && self.min_inclusive && !inclusive) {
            self.min = value;
            self.min_inclusive = inclusive;
        }
    }

    fn clamp_max(&mut self, value: f64, inclusive: bool) {
        if value < self.max || (value == self.max && self.max_inclusive && !inclusive) {
            self.max = value;
            self.max_inclusive = inclusive;
        }
    }
}

/// Detects `[a > 10] AND [a < 5]` style contradictions among the direct
/// conjuncts. Only attributes the feature type declares numeric are
/// folded; untyped attributes are left alone, string comparisons do not
/// order the same way.
fn contradictory_ranges(conjuncts: &[Filter], feature_type: Option<&FeatureType>) -> bool {
    let feature_type = match feature_type {
        Some(ft) => ft,
        None => return false,
    };
    let mut ranges: Vec<(String, NumericRange)> = vec![];
    for conjunct in conjuncts {
        let (op, name, bound) = match numeric_comparison(conjunct, feature_type) {
            Some(parts) => parts,
            None => continue,
        };
        let index = match ranges.iter().position(|(n, _)| *n == name) {
            Some(index) => index,
            None => {
                ranges.push((name, NumericRange::full()));
                ranges.len() - 1
            },
        };
        let range = &mut ranges[index].1;
        match op {
            ComparisonOp::Equal => {
                range.clamp_min(bound, true);
                range.clamp_max(bound, true);
            },
            ComparisonOp::Less => range.clamp_max(bound, false),
            ComparisonOp::LessOrEqual => range.clamp_max(bound, true),
            ComparisonOp::Greater => range.clamp_min(bound, false),
            ComparisonOp::GreaterOrEqual => range.clamp_min(bound, true),
            ComparisonOp::NotEqual => {},
        }
    }
    ranges.iter().any(|(_, range)| range.is_empty())
}

/// Extracts `property OP literal-number` (either side) from a comparison
/// over an attribute the feature type knows to be numeric.
fn numeric_comparison(
    filter: &Filter,
    feature_type: &FeatureType,
) -> Option<(ComparisonOp, String, f64)> {
    let (op, left, right) = match *filter {
        Filter::Compare { op, ref left, ref right } => (op, left, right),
        _ => return None,
    };
    let (op, name, literal) = match (left, right) {
        (&Expression::Property(ref name), &Expression::Literal(ref token)) => (op, name, token),
        (&Expression::Literal(ref token), &Expression::Property(ref name)) => {
            (flip(op), name, token)
        },
        _ => return None,
    };
    if feature_type.attribute_type(name) != Some(AttributeType::Number) {
        return None;
    }
    literal.parse::<f64>().ok().map(|bound| (op, name.clone(), bound))
}

fn flip(op: ComparisonOp) -> ComparisonOp {
    match op {
        ComparisonOp::Less => ComparisonOp::Greater,
        ComparisonOp::LessOrEqual => ComparisonOp::GreaterOrEqual,
        ComparisonOp::Greater => ComparisonOp::Less,
        ComparisonOp::GreaterOrEqual => ComparisonOp::LessOrEqual,
        other => other,
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Filter::Include => dest.write_str("INCLUDE"),
            Filter::Exclude => dest.write_str("EXCLUDE"),
            Filter::And(ref children) => write_joined(dest, children, " AND "),
            Filter::Or(ref children) => write_joined(dest, children, " OR "),
            Filter::Not(ref child) => write!(dest, "NOT ({})", child),
            Filter::Compare { op, ref left, ref right } => {
                let op = match op {
                    ComparisonOp::Equal => "=",
                    ComparisonOp::NotEqual => "<>",
                    ComparisonOp::Less => "<",
                    ComparisonOp::LessOrEqual => "<=",
                    ComparisonOp::Greater => ">",
                    ComparisonOp::GreaterOrEqual => ">=",
                };
                write!(dest, "{} {} {}", left, op, right)
            },
            Filter::Between { ref expression, ref lower, ref upper } => {
                write!(dest, "{} BETWEEN {} AND {}", expression, lower, upper)
            },
            Filter::Like { ref expression, ref pattern } => {
                write!(dest, "{} LIKE '{}'", expression, pattern)
            },
            Filter::Id(ref ids) => {
                dest.write_str("IN (")?;
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        dest.write_str(", ")?;
                    }
                    write!(dest, "'{}'", id)?;
                }
                dest.write_str(")")
            },
        }
    }
}

fn write_joined(dest: &mut fmt::Formatter, children: &[Filter], separator: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            dest.write_str(separator)?;
        }
        write!(dest, "({})", child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_type::FeatureTypeGuesser;
    use crate::ogc::expression::{literal, property};
    use crate::selectors::Selector;
    use crate::stylesheets::CssRule;

    fn numeric_feature_type(attribute: &str) -> FeatureType {
        let mut guesser = FeatureTypeGuesser::new();
        let rule = CssRule::new(
            Selector::Data(Box::new(greater(property(attribute), literal("0")))),
            Default::default(),
            None,
        );
        guesser.add_rule(&rule);
        guesser.into_feature_type(None).unwrap()
    }

    #[test]
    fn and_identities() {
        assert_eq!(and(Filter::Include, Filter::Include), Filter::Include);
        assert_eq!(and(Filter::Include, Filter::Exclude), Filter::Exclude);
        let atom = equals(property("a"), literal("1"));
        assert_eq!(and(Filter::Include, atom.clone()), atom);
    }

    #[test]
    fn or_identities() {
        assert_eq!(or(Filter::Exclude, Filter::Exclude), Filter::Exclude);
        assert_eq!(or(Filter::Include, Filter::Exclude), Filter::Include);
        let atom = equals(property("a"), literal("1"));
        assert_eq!(or(Filter::Exclude, atom.clone()), atom);
    }

    #[test]
    fn complement_collapses() {
        let atom = equals(property("a"), literal("1"));
        assert_eq!(and(atom.clone(), not(atom.clone())), Filter::Exclude);
        assert_eq!(or(atom.clone(), not(atom)), Filter::Include);
    }

    #[test]
    fn nested_conjunctions_flatten() {
        let a = equals(property("a"), literal("1"));
        let b = equals(property("b"), literal("2"));
        let c = equals(property("c"), literal("3"));
        let nested = and(a.clone(), and(b.clone(), c.clone()));
        assert_eq!(nested, Filter::And(vec![a, b, c]));
    }

    #[test]
    fn empty_numeric_range_simplifies_to_exclude() {
        let ft = numeric_feature_type("pop");
        let contradiction = and(
            greater(property("pop"), literal("10")),
            less(property("pop"), literal("5")),
        );
        assert_eq!(contradiction.simplify(Some(&ft)), Filter::Exclude);
        // Without typing information the conjunction is left alone.
        assert!(matches!(contradiction.simplify(None), Filter::And(_)));
    }

    #[test]
    fn satisfiable_range_is_preserved() {
        let ft = numeric_feature_type("pop");
        let band = and(
            greater(property("pop"), literal("5")),
            less(property("pop"), literal("10")),
        );
        assert!(matches!(band.simplify(Some(&ft)), Filter::And(_)));
    }

    #[test]
    fn evaluation() {
        let mut feature = Feature::new();
        feature.set("pop", AttributeValue::Number(250.0));
        feature.set("name", AttributeValue::String("Rome".to_owned()));
        feature.id = Some("cities.4".to_owned());

        assert!(greater(property("pop"), literal("100")).matches(&feature));
        assert!(!greater(property("pop"), literal("1000")).matches(&feature));
        assert!(equals(property("name"), literal("Rome")).matches(&feature));
        assert!(between(property("pop"), literal("200"), literal("300")).matches(&feature));
        assert!(like(property("name"), "Ro%").matches(&feature));
        assert!(!like(property("name"), "Ro_").matches(&feature));
        assert!(id(vec!["cities.4"]).matches(&feature));
        assert!(!id(vec!["cities.5"]).matches(&feature));
        // missing attribute never matches
        assert!(!greater(property("area"), literal("0")).matches(&feature));
    }
}
