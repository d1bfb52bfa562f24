/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The parsed stylesheet model the translator consumes.

pub mod properties;

pub use self::properties::{PropertyName, SYMBOLIZER_TRIGGERS};

use crate::selectors::{Selector, Specificity};
use crate::values::Value;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// A named, optionally indexed property sub-namespace within a rule.
///
/// `Root` holds the top-level properties; `:mark(2)` style pseudo-classes
/// scope properties to one repeated symbolizer.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PseudoClass {
    /// The default container for top-level properties.
    Root,
    /// A named pseudo-class, optionally bound to a 1-based symbolizer
    /// index.
    Element {
        /// The pseudo-class name (`symbol`, `mark`, `stroke`, ...).
        name: String,
        /// The 1-based symbolizer index, when given.
        index: Option<u32>,
    },
}

impl PseudoClass {
    /// A named pseudo-class with no index.
    pub fn new<T: Into<String>>(name: T) -> PseudoClass {
        PseudoClass::Element { name: name.into(), index: None }
    }

    /// A named pseudo-class bound to a 1-based index.
    pub fn indexed<T: Into<String>>(name: T, index: u32) -> PseudoClass {
        PseudoClass::Element { name: name.into(), index: Some(index) }
    }
}

/// The property bag of a rule, keyed by pseudo-class and typed property
/// name. `BTreeMap` keeps iteration deterministic, which the output
/// ordering invariants rely on.
pub type PropertyMap = BTreeMap<(PseudoClass, PropertyName), Vec<Value>>;

/// A single cascading rule: a selector, a property bag, and the source
/// comment preceding the rule.
#[derive(Clone, Debug, PartialEq)]
pub struct CssRule {
    /// The rule selector.
    pub selector: Selector,
    /// The rule properties.
    pub properties: PropertyMap,
    /// The comment found before the rule, when any.
    pub comment: Option<String>,
}

/// An ordered list of rules, as produced by the external parser.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    /// The rules, in source order.
    pub rules: Vec<CssRule>,
}

impl Stylesheet {
    /// A stylesheet over the given rules.
    pub fn new(rules: Vec<CssRule>) -> Stylesheet {
        Stylesheet { rules }
    }
}

lazy_static! {
    static ref TITLE_PATTERN: Regex = Regex::new(r"^.*@title\s*(?::\s*)?(.+)\s*$").unwrap();
    static ref ABSTRACT_PATTERN: Regex = Regex::new(r"^.*@abstract\s*(?::\s*)?(.+)\s*$").unwrap();
}

impl CssRule {
    /// A rule from its parts.
    pub fn new(selector: Selector, properties: PropertyMap, comment: Option<String>) -> CssRule {
        CssRule { selector, properties, comment }
    }

    /// The rule specificity: the selector score plus one pseudo-class
    /// point per distinct non-root pseudo-class carrying properties.
    pub fn specificity(&self) -> Specificity {
        let mut pseudo_classes: Vec<&PseudoClass> = vec![];
        for (ps, _) in self.properties.keys() {
            if *ps != PseudoClass::Root && !pseudo_classes.contains(&ps) {
                pseudo_classes.push(ps);
            }
        }
        self.selector.specificity()
            + Specificity::new(0, 0, 0, 0, pseudo_classes.len() as u32)
    }

    /// Whether the rule holds `name` in `pseudo_class`.
    pub fn has_property(&self, pseudo_class: &PseudoClass, name: &PropertyName) -> bool {
        self.properties
            .contains_key(&(pseudo_class.clone(), name.clone()))
    }

    /// Whether the rule holds any of `names` in `pseudo_class`.
    pub fn has_any_property(&self, pseudo_class: &PseudoClass, names: &[PropertyName]) -> bool {
        names.iter().any(|name| self.has_property(pseudo_class, name))
    }

    /// The values of `name` in `pseudo_class`.
    pub fn property(&self, pseudo_class: &PseudoClass, name: &PropertyName) -> Option<&Vec<Value>> {
        self.properties.get(&(pseudo_class.clone(), name.clone()))
    }

    /// The properties of `pseudo_class` whose canonical name contains any
    /// of the `groups` fragments.
    ///
    /// Substring containment is what routes `-gt-fill-random` into the
    /// `fill` group while still requiring `-gt-graphic-margin` to be
    /// requested explicitly.
    pub fn property_values(
        &self,
        pseudo_class: &PseudoClass,
        groups: &[&str],
    ) -> BTreeMap<PropertyName, Vec<Value>> {
        self.properties
            .iter()
            .filter(|((ps, name), _)| {
                ps == pseudo_class && groups.iter().any(|group| name.name().contains(group))
            })
            .map(|((_, name), values)| (name.clone(), values.clone()))
            .collect()
    }

    /// All properties of `pseudo_class`.
    pub fn pseudo_class_values(&self, pseudo_class: &PseudoClass) -> BTreeMap<PropertyName, Vec<Value>> {
        self.properties
            .iter()
            .filter(|((ps, _), _)| ps == pseudo_class)
            .map(|((_, name), values)| (name.clone(), values.clone()))
            .collect()
    }

    /// Whether the root pseudo-class holds at least one property that
    /// will produce a symbolizer.
    pub fn has_symbolizer_property(&self) -> bool {
        self.has_any_property(&PseudoClass::Root, SYMBOLIZER_TRIGGERS)
    }

    /// The z-index values of the root `z-index` property, in source
    /// order.
    fn z_index_property_values(&self) -> Vec<i32> {
        match self.property(&PseudoClass::Root, &PropertyName::ZIndex) {
            Some(values) => values
                .iter()
                .filter_map(|value| value.to_literal().trim().parse().ok())
                .collect(),
            None => vec![],
        }
    }

    /// The distinct z-indexes this rule draws at, from the `z-index`
    /// property and any z-index selector atoms. Empty means the rule
    /// participates in every band.
    pub fn z_indexes(&self) -> Vec<i32> {
        let mut indexes = self.selector.z_index_atoms();
        for z in self.z_index_property_values() {
            if !indexes.contains(&z) {
                indexes.push(z);
            }
        }
        indexes.sort_unstable();
        indexes
    }

    /// The restriction of this rule to one z-index: the painter's-model
    /// slice of each property value list at the positions where `z-index`
    /// equals `z`, with singleton values broadcast. Returns `None` when
    /// the rule does not draw at `z`.
    pub fn sub_rule_by_z_index(&self, z: i32) -> Option<CssRule> {
        let selector_atoms = self.selector.z_index_atoms();
        if !selector_atoms.is_empty() && !selector_atoms.contains(&z) {
            return None;
        }
        let selector = self.selector.without_z_index();

        let z_values = self.z_index_property_values();
        if z_values.is_empty() {
            let properties = self
                .properties
                .iter()
                .filter(|((_, name), _)| *name != PropertyName::ZIndex)
                .map(|(key, values)| (key.clone(), values.clone()))
                .collect();
            return Some(CssRule::new(selector, properties, self.comment.clone()));
        }

        let positions: Vec<usize> = z_values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == z)
            .map(|(i, _)| i)
            .collect();
        if positions.is_empty() {
            return None;
        }

        let mut properties = PropertyMap::new();
        for ((ps, name), values) in self.properties.iter() {
            if *name == PropertyName::ZIndex {
                continue;
            }
            let sliced: Vec<Value> = if values.len() == 1 {
                values.clone()
            } else {
                positions
                    .iter()
                    .filter_map(|&i| values.get(i))
                    .cloned()
                    .collect()
            };
            if !sliced.is_empty() {
                properties.insert((ps.clone(), name.clone()), sliced);
            }
        }
        Some(CssRule::new(selector, properties, self.comment.clone()))
    }

    /// The `@title` tag contents of the rule comment, comma-joined.
    pub fn title(&self) -> Option<String> {
        self.combined_tag(&TITLE_PATTERN, ", ")
    }

    /// The `@abstract` tag contents of the rule comment, newline-joined.
    pub fn abstract_text(&self) -> Option<String> {
        self.combined_tag(&ABSTRACT_PATTERN, "\n")
    }

    fn combined_tag(&self, pattern: &Regex, separator: &str) -> Option<String> {
        let comment = match self.comment {
            Some(ref comment) if !comment.is_empty() => comment,
            _ => return None,
        };
        let mut combined = String::new();
        for line in comment.lines() {
            if let Some(captures) = pattern.captures(line) {
                let text = captures.get(1).map_or("", |m| m.as_str()).trim();
                if !text.is_empty() {
                    if !combined.is_empty() {
                        combined.push_str(separator);
                    }
                    combined.push_str(text);
                }
            }
        }
        if combined.is_empty() {
            None
        } else {
            Some(combined)
        }
    }
}
