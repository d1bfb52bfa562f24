/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Walks deriving type names and scale ranges from selectors.

use crate::selectors::{ScaleRange, Selector, TypeName};

/// Collects the set of type names referenced by the selectors it visits,
/// in first-sighting order.
#[derive(Debug, Default)]
pub struct TypeNameExtractor {
    names: Vec<TypeName>,
}

impl TypeNameExtractor {
    /// An empty extractor.
    pub fn new() -> TypeNameExtractor {
        TypeNameExtractor::default()
    }

    /// Collects the type names of `selector`; a selector referencing no
    /// type name contributes the wildcard.
    pub fn visit(&mut self, selector: &Selector) {
        let mut found = false;
        selector.for_each_atom(&mut |atom| {
            if let Selector::TypeName(ref tn) = *atom {
                found = true;
                if !self.names.contains(tn) {
                    self.names.push(tn.clone());
                }
            }
        });
        if !found && !self.names.contains(&TypeName::DEFAULT) {
            self.names.push(TypeName::DEFAULT);
        }
    }

    /// The collected names.
    pub fn into_type_names(self) -> Vec<TypeName> {
        self.names
    }
}

/// Derives the single scale range a selector admits.
///
/// Conjunctions intersect their children's ranges. Disjunctions are not
/// representable as one range and yield `None` here: the translator
/// flattens OR-of-scale-ranges into sibling rules before this extractor
/// runs on anything that matters.
#[derive(Debug, Default)]
pub struct ScaleRangeExtractor;

impl ScaleRangeExtractor {
    /// The range `selector` admits, `None` when unconstrained. The
    /// returned range can be empty when the conjunction is contradictory;
    /// callers skip such rules.
    pub fn scale_range(selector: &Selector) -> Option<ScaleRange> {
        match *selector {
            Selector::ScaleRange(range) => Some(range),
            Selector::And(ref children) => {
                let mut combined: Option<ScaleRange> = None;
                for child in children {
                    if let Some(range) = ScaleRangeExtractor::scale_range(child) {
                        combined = Some(match combined {
                            None => range,
                            Some(previous) => previous
                                .intersection(&range)
                                .unwrap_or(ScaleRange { min: 0.0, max: 0.0 }),
                        });
                    }
                }
                combined
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogc::expression::{literal, property};
    use crate::ogc::filter;
    use crate::selectors::{and, data, not, or};

    #[test]
    fn type_names_default_when_absent() {
        let mut extractor = TypeNameExtractor::new();
        extractor.visit(&data(filter::equals(property("a"), literal("1"))));
        assert_eq!(extractor.into_type_names(), vec![TypeName::DEFAULT]);
    }

    #[test]
    fn type_names_collected_across_rules() {
        let mut extractor = TypeNameExtractor::new();
        extractor.visit(&Selector::TypeName(TypeName::new("roads")));
        extractor.visit(&and(
            Selector::TypeName(TypeName::new("lakes")),
            data(filter::equals(property("a"), literal("1"))),
        ));
        extractor.visit(&Selector::Accept);
        assert_eq!(
            extractor.into_type_names(),
            vec![
                TypeName::new("roads"),
                TypeName::new("lakes"),
                TypeName::DEFAULT,
            ]
        );
    }

    #[test]
    fn scale_range_of_conjunction_intersects() {
        let selector = and(
            Selector::ScaleRange(ScaleRange::new(0.0, 10000.0)),
            Selector::ScaleRange(ScaleRange::new(5000.0, 20000.0)),
        );
        assert_eq!(
            ScaleRangeExtractor::scale_range(&selector),
            Some(ScaleRange::new(5000.0, 10000.0))
        );
    }

    #[test]
    fn scale_range_ignores_non_scale_atoms() {
        let selector = and(
            Selector::ScaleRange(ScaleRange::new(0.0, 10000.0)),
            data(filter::equals(property("a"), literal("1"))),
        );
        assert_eq!(
            ScaleRangeExtractor::scale_range(&selector),
            Some(ScaleRange::new(0.0, 10000.0))
        );
        assert_eq!(
            ScaleRangeExtractor::scale_range(&data(filter::equals(
                property("a"),
                literal("1")
            ))),
            None
        );
    }

    #[test]
    fn disjunctions_are_not_ranged_here() {
        let selector = or(
            Selector::ScaleRange(ScaleRange::new(0.0, 1000.0)),
            Selector::ScaleRange(ScaleRange::new(5000.0, 9000.0)),
        );
        assert_eq!(ScaleRangeExtractor::scale_range(&selector), None);
        assert_eq!(
            ScaleRangeExtractor::scale_range(&not(Selector::ScaleRange(ScaleRange::new(
                0.0, 1000.0
            )))),
            None
        );
    }
}
