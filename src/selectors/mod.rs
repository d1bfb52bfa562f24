/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The selector model and its boolean algebra.
//!
//! Selectors form a lattice with `Accept` on top and `Reject` at the
//! bottom; [`and`] and [`or`] normalize as they combine, so unsatisfiable
//! conjunctions collapse to `Reject` eagerly and the translator can treat
//! "combines to `Reject`" as the disjointness test.

pub mod extractors;
pub mod scale_range;
pub mod specificity;

pub use self::scale_range::ScaleRange;
pub use self::specificity::Specificity;

use crate::feature_type::FeatureType;
use crate::ogc::filter::{self, Filter};
use std::collections::BTreeSet;

/// A feature-type-name constraint; `TypeName::DEFAULT` is the wildcard.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(
    /// The name; `None` is the wildcard.
    pub Option<String>,
);

impl TypeName {
    /// The wildcard type name.
    pub const DEFAULT: TypeName = TypeName(None);

    /// A named feature type.
    pub fn new<T: Into<String>>(name: T) -> TypeName {
        TypeName(Some(name.into()))
    }

    /// Whether this is the wildcard.
    pub fn is_default(&self) -> bool {
        self.0.is_none()
    }

    /// The name, when not the wildcard.
    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// A selector over features, scales and drawing order.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector {
    /// Matches everything; the AND identity.
    Accept,
    /// Matches nothing; the OR identity.
    Reject,
    /// Constrains the feature type.
    TypeName(TypeName),
    /// Feature-id membership.
    Id(BTreeSet<String>),
    /// Scale-denominator constraint.
    ScaleRange(ScaleRange),
    /// Z-index pseudo-class.
    ZIndex(i32),
    /// Arbitrary feature-attribute predicate.
    Data(Box<Filter>),
    /// Conjunction.
    And(Vec<Selector>),
    /// Disjunction.
    Or(Vec<Selector>),
    /// Negation.
    Not(Box<Selector>),
}

/// A data selector over the given filter.
pub fn data(filter: Filter) -> Selector {
    Selector::Data(Box::new(filter))
}

/// An id selector over the given feature ids.
pub fn id<I>(ids: I) -> Selector
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    Selector::Id(ids.into_iter().map(Into::into).collect())
}

/// Conjunction of two selectors, normalized.
pub fn and(a: Selector, b: Selector) -> Selector {
    all(vec![a, b])
}

/// Disjunction of two selectors, normalized.
pub fn or(a: Selector, b: Selector) -> Selector {
    any(vec![a, b])
}

/// Conjunction of any number of selectors.
///
/// Flattens nested conjunctions, folds type names, intersects scale
/// ranges and id sets, and short-circuits to `Reject` on any
/// contradiction it can see structurally.
pub fn all(selectors: Vec<Selector>) -> Selector {
    let mut type_name: Option<TypeName> = None;
    let mut scale: Option<ScaleRange> = None;
    let mut ids: Option<BTreeSet<String>> = None;
    let mut others: Vec<Selector> = vec![];

    let mut stack: Vec<Selector> = selectors.into_iter().rev().collect();
    while let Some(selector) = stack.pop() {
        match selector {
            Selector::Accept => {},
            Selector::Reject => return Selector::Reject,
            Selector::And(children) => stack.extend(children.into_iter().rev()),
            Selector::TypeName(tn) => {
                if !tn.is_default() {
                    match type_name {
                        None => type_name = Some(tn),
                        Some(ref existing) if *existing == tn => {},
                        Some(_) => return Selector::Reject,
                    }
                }
            },
            Selector::ScaleRange(range) => {
                if range.is_empty() {
                    return Selector::Reject;
                }
                scale = match scale {
                    None => Some(range),
                    Some(previous) => match previous.intersection(&range) {
                        Some(intersection) => Some(intersection),
                        None => return Selector::Reject,
                    },
                };
            },
            Selector::Id(set) => {
                let combined: BTreeSet<String> = match ids {
                    None => set,
                    Some(previous) => previous.intersection(&set).cloned().collect(),
                };
                if combined.is_empty() {
                    return Selector::Reject;
                }
                ids = Some(combined);
            },
            other => {
                if !others.contains(&other) {
                    others.push(other);
                }
            },
        }
    }

    // Negated atoms against what the conjunction already pins down.
    let mut kept: Vec<Selector> = Vec::with_capacity(others.len());
    for other in others.iter() {
        if let Selector::Not(ref inner) = *other {
            if others.iter().any(|o| *o == **inner) {
                return Selector::Reject;
            }
            match **inner {
                Selector::TypeName(ref negated) => match type_name {
                    Some(ref tn) if tn == negated => return Selector::Reject,
                    Some(_) => continue,
                    None => {},
                },
                Selector::ScaleRange(ref negated) => match scale {
                    Some(ref range) if negated.contains_range(range) => return Selector::Reject,
                    Some(ref range) if !negated.overlaps(range) => continue,
                    _ => {},
                },
                Selector::Id(ref negated) => match ids {
                    Some(ref set) if set.iter().all(|i| negated.contains(i)) => {
                        return Selector::Reject
                    },
                    Some(ref set) if set.iter().all(|i| !negated.contains(i)) => continue,
                    _ => {},
                },
                _ => {},
            }
        }
        kept.push(other.clone());
    }

    let mut children: Vec<Selector> = vec![];
    if let Some(tn) = type_name {
        children.push(Selector::TypeName(tn));
    }
    match scale {
        Some(range) if !range.is_full() => children.push(Selector::ScaleRange(range)),
        _ => {},
    }
    if let Some(set) = ids {
        children.push(Selector::Id(set));
    }
    children.extend(kept);

    if conjunction_rejects(&children) {
        return Selector::Reject;
    }
    match children.len() {
        0 => Selector::Accept,
        1 => children.pop().expect("len checked"),
        _ => Selector::And(children),
    }
}

/// Spots complements the flattening hides: a negated conjunction whose
/// conjuncts are all implied by the present atoms, or a negated
/// disjunction with any disjunct implied.
fn conjunction_rejects(children: &[Selector]) -> bool {
    children.iter().any(|child| {
        if let Selector::Not(ref inner) = *child {
            match **inner {
                Selector::And(ref parts) => parts.iter().all(|part| implied_by(children, part)),
                Selector::Or(ref parts) => parts.iter().any(|part| implied_by(children, part)),
                ref atom => implied_by(children, atom),
            }
        } else {
            false
        }
    })
}

/// Whether some conjunct implies `part`: equal atoms, a scale range
/// inside `part`'s range, an id set inside `part`'s set.
fn implied_by(children: &[Selector], part: &Selector) -> bool {
    children.iter().any(|child| match (child, part) {
        (&Selector::ScaleRange(ref narrow), &Selector::ScaleRange(ref wide)) => {
            wide.contains_range(narrow)
        },
        (&Selector::Id(ref narrow), &Selector::Id(ref wide)) => narrow.is_subset(wide),
        _ => child == part,
    })
}

/// Disjunction of any number of selectors; flattens and short-circuits
/// on `Accept`.
pub fn any(selectors: Vec<Selector>) -> Selector {
    let mut children: Vec<Selector> = vec![];
    let mut stack: Vec<Selector> = selectors.into_iter().rev().collect();
    while let Some(selector) = stack.pop() {
        match selector {
            Selector::Reject => {},
            Selector::Accept => return Selector::Accept,
            Selector::Or(nested) => stack.extend(nested.into_iter().rev()),
            other => {
                if !children.contains(&other) {
                    children.push(other);
                }
            },
        }
    }
    let complementary = children.iter().any(|child| {
        if let Selector::Not(ref inner) = *child {
            match **inner {
                Selector::Or(ref parts) => parts.iter().all(|part| children.contains(part)),
                Selector::And(ref parts) => parts.iter().any(|part| children.contains(part)),
                ref atom => children.iter().any(|other| other == atom),
            }
        } else {
            false
        }
    });
    if complementary {
        return Selector::Accept;
    }
    match children.len() {
        0 => Selector::Reject,
        1 => children.pop().expect("len checked"),
        _ => Selector::Or(children),
    }
}

/// Negation, normalized.
pub fn not(selector: Selector) -> Selector {
    match selector {
        Selector::Accept => Selector::Reject,
        Selector::Reject => Selector::Accept,
        // the wildcard matches everything, so its negation matches nothing
        Selector::TypeName(ref tn) if tn.is_default() => Selector::Reject,
        Selector::Not(inner) => *inner,
        other => Selector::Not(Box::new(other)),
    }
}

impl Selector {
    /// The specificity of the selector: conjunctions add, disjunctions
    /// take the most specific branch, negations score their operand.
    pub fn specificity(&self) -> Specificity {
        match *self {
            Selector::Accept | Selector::Reject => Specificity::ZERO,
            Selector::TypeName(ref tn) => {
                if tn.is_default() {
                    Specificity::ZERO
                } else {
                    Specificity::new(1, 0, 0, 0, 0)
                }
            },
            Selector::Id(_) => Specificity::new(0, 1, 0, 0, 0),
            Selector::Data(_) => Specificity::new(0, 0, 1, 0, 0),
            Selector::ScaleRange(_) => Specificity::new(0, 0, 0, 1, 0),
            Selector::ZIndex(_) => Specificity::new(0, 0, 0, 0, 1),
            Selector::And(ref children) => children
                .iter()
                .fold(Specificity::ZERO, |sum, child| sum + child.specificity()),
            Selector::Or(ref children) => children
                .iter()
                .map(Selector::specificity)
                .max()
                .unwrap_or(Specificity::ZERO),
            Selector::Not(ref child) => child.specificity(),
        }
    }

    /// Simplifies the selector, consulting `feature_type` (when present)
    /// for attribute-range reasoning inside data predicates.
    pub fn simplify(&self, feature_type: Option<&FeatureType>) -> Selector {
        match *self {
            Selector::And(ref children) => {
                let normalized = all(
                    children
                        .iter()
                        .map(|child| child.simplify(feature_type))
                        .collect(),
                );
                if let Selector::And(ref conjuncts) = normalized {
                    if data_conjunction_excludes(conjuncts, feature_type) {
                        return Selector::Reject;
                    }
                }
                normalized
            },
            Selector::Or(ref children) => any(
                children
                    .iter()
                    .map(|child| child.simplify(feature_type))
                    .collect(),
            ),
            Selector::Not(ref child) => not(child.simplify(feature_type)),
            Selector::Data(ref predicate) => match predicate.simplify(feature_type) {
                Filter::Include => Selector::Accept,
                Filter::Exclude => Selector::Reject,
                simplified => Selector::Data(Box::new(simplified)),
            },
            Selector::ScaleRange(ref range) if range.is_empty() => Selector::Reject,
            ref leaf => leaf.clone(),
        }
    }

    /// Whether the selector cannot match anything, after simplification.
    pub fn is_unsatisfiable(&self, feature_type: Option<&FeatureType>) -> bool {
        matches!(self.simplify(feature_type), Selector::Reject)
    }

    /// Calls `visit` on every leaf atom, without recursion.
    pub fn for_each_atom(&self, visit: &mut dyn FnMut(&Selector)) {
        let mut stack = vec![self];
        while let Some(selector) = stack.pop() {
            match *selector {
                Selector::And(ref children) | Selector::Or(ref children) => {
                    stack.extend(children.iter());
                },
                Selector::Not(ref child) => stack.push(child),
                ref leaf => visit(leaf),
            }
        }
    }

    /// The z-index atoms mentioned anywhere in the selector.
    pub fn z_index_atoms(&self) -> Vec<i32> {
        let mut indexes = vec![];
        self.for_each_atom(&mut |atom| {
            if let Selector::ZIndex(z) = *atom {
                if !indexes.contains(&z) {
                    indexes.push(z);
                }
            }
        });
        indexes
    }

    /// The selector with all z-index atoms dropped (they are band
    /// markers, not per-feature constraints).
    pub fn without_z_index(&self) -> Selector {
        match *self {
            Selector::ZIndex(_) => Selector::Accept,
            Selector::And(ref children) => {
                all(children.iter().map(Selector::without_z_index).collect())
            },
            Selector::Or(ref children) => {
                any(children.iter().map(Selector::without_z_index).collect())
            },
            Selector::Not(ref child) => not(child.without_z_index()),
            ref other => other.clone(),
        }
    }
}

/// Merges every (possibly negated) data predicate among the conjuncts
/// and checks whether the combined filter is unsatisfiable.
fn data_conjunction_excludes(conjuncts: &[Selector], feature_type: Option<&FeatureType>) -> bool {
    let mut filters: Vec<Filter> = vec![];
    for conjunct in conjuncts {
        match *conjunct {
            Selector::Data(ref predicate) => filters.push((**predicate).clone()),
            Selector::Not(ref inner) => {
                if let Selector::Data(ref predicate) = **inner {
                    filters.push(filter::not((**predicate).clone()));
                }
            },
            _ => {},
        }
    }
    if filters.len() < 2 {
        return false;
    }
    filter::all(filters).simplify(feature_type) == Filter::Exclude
}
