/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Expands a band of cascading rules into the combinations that can
//! match simultaneously.
//!
//! For a subset `S` of the band, a feature can match exactly `S` only if
//! the conjunction of the selectors in `S` is satisfiable together with
//! the negation of every selector outside `S`. Each surviving subset
//! becomes one combined rule whose properties merge with
//! specificity-weighted precedence. Enumeration is capped: singletons
//! are always produced, larger subsets stream in deterministic order
//! until the cap is reached.

use crate::feature_type::FeatureType;
use crate::selectors::{self, Specificity};
use crate::stylesheets::{CssRule, PropertyMap};
use log::{debug, warn};
use smallvec::SmallVec;

/// Builds the combined rule set of one band.
pub struct RulePowerSetBuilder<'a> {
    /// The band, sorted specificity-descending.
    rules: &'a [CssRule],
    feature_type: Option<&'a FeatureType>,
    max_combinations: usize,
}

impl<'a> RulePowerSetBuilder<'a> {
    /// A builder over `rules`, which must already be sorted by
    /// specificity descending.
    pub fn new(
        rules: &'a [CssRule],
        feature_type: Option<&'a FeatureType>,
        max_combinations: usize,
    ) -> RulePowerSetBuilder<'a> {
        RulePowerSetBuilder { rules, feature_type, max_combinations }
    }

    /// Enumerates the satisfiable subsets: singletons first, then
    /// cardinality ascending, lexicographic position order within a
    /// cardinality. Stops (beyond the singletons) once the cap is
    /// reached.
    pub fn build_power_set(&self) -> Vec<CssRule> {
        let n = self.rules.len();
        if n == 0 {
            return vec![];
        }

        // pairs that cannot match together prune every superset
        let mut disjoint = vec![false; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let conjunction = selectors::and(
                    self.rules[i].selector.clone(),
                    self.rules[j].selector.clone(),
                );
                if conjunction.is_unsatisfiable(self.feature_type) {
                    disjoint[i * n + j] = true;
                }
            }
        }

        let specificities: Vec<Specificity> =
            self.rules.iter().map(CssRule::specificity).collect();

        let mut combined = vec![];
        let mut truncated = false;
        'enumeration: for cardinality in 1..=n {
            let mut subset: Vec<usize> = (0..cardinality).collect();
            loop {
                if cardinality > 1 && combined.len() >= self.max_combinations {
                    truncated = true;
                    break 'enumeration;
                }
                if let Some(rule) = self.combine(&subset, &disjoint, &specificities, n) {
                    combined.push(rule);
                }
                if !next_combination(&mut subset, n) {
                    break;
                }
            }
        }
        if truncated {
            warn!(
                "combination cap of {} reached over {} rules, remaining combinations dropped",
                self.max_combinations, n
            );
        }
        debug!("power set over {} rules produced {} combined rules", n, combined.len());
        combined
    }

    fn combine(
        &self,
        subset: &[usize],
        disjoint: &[bool],
        specificities: &[Specificity],
        n: usize,
    ) -> Option<CssRule> {
        for (position, &i) in subset.iter().enumerate() {
            for &j in &subset[position + 1..] {
                if disjoint[i * n + j] {
                    return None;
                }
            }
        }

        let conjunction = selectors::all(
            subset
                .iter()
                .map(|&i| self.rules[i].selector.clone())
                .collect(),
        );
        if conjunction.is_unsatisfiable(self.feature_type) {
            return None;
        }

        // a feature matching this subset must match nothing else
        let mut exactness = vec![conjunction.clone()];
        for i in 0..n {
            if !subset.contains(&i) {
                exactness.push(selectors::not(self.rules[i].selector.clone()));
            }
        }
        if selectors::all(exactness).is_unsatisfiable(self.feature_type) {
            return None;
        }

        // merge low specificity first so high specificity overwrites;
        // among equals the later source position wins, as in a cascade
        let mut order: SmallVec<[usize; 8]> = SmallVec::from_slice(subset);
        order.sort_by_key(|&i| specificities[i]);

        let mut properties = PropertyMap::new();
        let mut comments: Vec<&str> = vec![];
        for &i in &order {
            for (key, values) in self.rules[i].properties.iter() {
                properties.insert(key.clone(), values.clone());
            }
        }
        for &i in subset {
            if let Some(ref comment) = self.rules[i].comment {
                if !comment.is_empty() {
                    comments.push(comment);
                }
            }
        }
        let comment = if comments.is_empty() {
            None
        } else {
            Some(comments.join("\n"))
        };

        Some(CssRule::new(conjunction, properties, comment))
    }
}

/// Advances `subset` to the next lexicographic combination of `n`
/// positions; false when exhausted.
fn next_combination(subset: &mut [usize], n: usize) -> bool {
    let k = subset.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if subset[i] < n - k + i {
            subset[i] += 1;
            for j in (i + 1)..k {
                subset[j] = subset[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogc::expression::{literal, property};
    use crate::ogc::filter;
    use crate::selectors::{ScaleRange, Selector};
    use crate::stylesheets::{PropertyName, PseudoClass};
    use crate::values::Value;

    fn rule(selector: Selector, properties: &[(PropertyName, &str)]) -> CssRule {
        let mut map = PropertyMap::new();
        for (name, value) in properties {
            map.insert(
                (PseudoClass::Root, name.clone()),
                vec![Value::literal(*value)],
            );
        }
        CssRule::new(selector, map, None)
    }

    fn sorted_desc(mut rules: Vec<CssRule>) -> Vec<CssRule> {
        rules.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
        rules
    }

    #[test]
    fn combinations_advance_lexicographically() {
        let mut subset = vec![0, 1];
        let mut seen = vec![subset.clone()];
        while next_combination(&mut subset, 4) {
            seen.push(subset.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn overlapping_rules_combine_with_specificity_precedence() {
        let rules = sorted_desc(vec![
            rule(Selector::Accept, &[(PropertyName::Stroke, "black")]),
            rule(
                Selector::ScaleRange(ScaleRange::new(0.0, 10000.0)),
                &[(PropertyName::Stroke, "red")],
            ),
        ]);
        let builder = RulePowerSetBuilder::new(&rules, None, 100);
        let combined = builder.build_power_set();

        // {scale-rule} alone is impossible (anything matching it also
        // matches the catch-all), {catch-all} alone survives, the pair
        // survives with the more specific stroke winning
        assert_eq!(combined.len(), 2);
        let pair = combined
            .iter()
            .find(|r| matches!(r.selector, Selector::ScaleRange(_)))
            .expect("combined pair");
        assert_eq!(
            pair.property(&PseudoClass::Root, &PropertyName::Stroke),
            Some(&vec![Value::literal("red")])
        );
        let catch_all = combined
            .iter()
            .find(|r| r.selector == Selector::Accept)
            .expect("catch-all survivor");
        assert_eq!(
            catch_all.property(&PseudoClass::Root, &PropertyName::Stroke),
            Some(&vec![Value::literal("black")])
        );
    }

    #[test]
    fn disjoint_rules_never_pair() {
        let a = rule(
            selectors::data(filter::equals(property("kind"), literal("road"))),
            &[(PropertyName::Stroke, "black")],
        );
        let b = rule(
            selectors::not(selectors::data(filter::equals(
                property("kind"),
                literal("road"),
            ))),
            &[(PropertyName::Stroke, "red")],
        );
        let rules = vec![a, b];
        let builder = RulePowerSetBuilder::new(&rules, None, 100);
        let combined = builder.build_power_set();
        assert_eq!(combined.len(), 2);
        assert!(combined
            .iter()
            .all(|r| !matches!(r.selector, Selector::And(_))));
    }

    #[test]
    fn equal_specificity_later_source_wins() {
        let first = rule(
            selectors::data(filter::greater(property("pop"), literal("0"))),
            &[(PropertyName::Stroke, "black")],
        );
        let second = rule(
            selectors::data(filter::less(property("pop"), literal("100"))),
            &[(PropertyName::Stroke, "red")],
        );
        let rules = vec![first, second];
        let builder = RulePowerSetBuilder::new(&rules, None, 100);
        let combined = builder.build_power_set();
        let pair = combined
            .iter()
            .find(|r| matches!(r.selector, Selector::And(_)))
            .expect("combined pair");
        assert_eq!(
            pair.property(&PseudoClass::Root, &PropertyName::Stroke),
            Some(&vec![Value::literal("red")])
        );
    }

    #[test]
    fn cap_bounds_output_but_keeps_singletons() {
        let rules: Vec<CssRule> = (0..6)
            .map(|i| {
                rule(
                    selectors::data(filter::greater(
                        property("pop"),
                        literal(format!("{}", i * 10)),
                    )),
                    &[(PropertyName::Stroke, "black")],
                )
            })
            .collect();
        let builder = RulePowerSetBuilder::new(&rules, None, 6);
        let combined = builder.build_power_set();
        assert_eq!(combined.len(), 6);

        // a roomier cap lets pairs through
        let builder = RulePowerSetBuilder::new(&rules, None, 10);
        assert_eq!(builder.build_power_set().len(), 10);
    }

    #[test]
    fn comments_concatenate() {
        let mut a = rule(Selector::Accept, &[(PropertyName::Stroke, "black")]);
        a.comment = Some("@title base".to_owned());
        let mut b = rule(
            Selector::ScaleRange(ScaleRange::new(0.0, 10000.0)),
            &[(PropertyName::StrokeWidth, "2")],
        );
        b.comment = Some("@title detail".to_owned());
        let rules = sorted_desc(vec![a, b]);
        let builder = RulePowerSetBuilder::new(&rules, None, 100);
        let combined = builder.build_power_set();
        let pair = combined
            .iter()
            .find(|r| r.comment.as_deref() == Some("@title detail\n@title base"))
            .or_else(|| {
                combined
                    .iter()
                    .find(|r| r.comment.as_deref() == Some("@title base\n@title detail"))
            });
        assert!(pair.is_some(), "combined rule concatenates comments");
    }
}
