/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The translation pipeline.
//!
//! A translation is a pure function of the input stylesheet and the
//! combination cap: rules are split into z-index bands, partitioned per
//! feature type name, flattened, expanded through the power set,
//! made mutually exclusive by domain-coverage subtraction, and finally
//! projected onto SLD rules and symbolizers.

pub mod coverage;
pub mod filter_builder;
pub mod power_set;
pub mod symbolizers;

use crate::feature_type::{FeatureType, FeatureTypeGuesser};
use crate::ogc::filter::Filter;
use crate::selectors::extractors::{ScaleRangeExtractor, TypeNameExtractor};
use crate::selectors::{self, Selector, TypeName};
use crate::sld::{FeatureTypeStyle, Rule, Style};
use crate::stylesheets::{CssRule, PropertyName, PseudoClass, Stylesheet};
use crate::translator::coverage::DomainCoverage;
use crate::translator::filter_builder::build_filter;
use crate::translator::power_set::RulePowerSetBuilder;
use fxhash::FxHashSet;
use log::debug;
use std::env;
use std::error::Error;
use std::fmt;

/// The default combination cap.
pub const DEFAULT_MAX_COMBINATIONS: usize = 10_000;

/// The environment variable [`CssTranslator::from_env`] reads the cap
/// from.
pub const MAX_COMBINATIONS_VAR: &str = "GEOCSS_MAX_COMBINATIONS";

/// A translation failure. The translator reports errors synchronously
/// and produces no partial style.
#[derive(Clone, Debug, PartialEq)]
pub enum TranslationError {
    /// A graphic-valued property whose value is not `symbol(...)` or
    /// `url(...)`.
    InvalidGraphic {
        /// The offending property.
        property: String,
        /// Its textual value.
        value: String,
    },
    /// A `label-anchor` that is not exactly two numbers.
    InvalidAnchor {
        /// The textual value.
        value: String,
    },
    /// A `label-offset` that is neither one number (line placement) nor
    /// two (point displacement).
    InvalidOffset {
        /// The textual value.
        value: String,
    },
    /// `raster-channels` with two or more than three names.
    InvalidChannelCount {
        /// The number of channel names given.
        count: usize,
    },
    /// A `raster-color-map` entry that is not a well-formed
    /// `color-map-entry(...)` function.
    InvalidColorMapEntry {
        /// The textual value.
        value: String,
    },
    /// An unknown `raster-color-map-type`.
    InvalidColorMapType {
        /// The textual value.
        value: String,
    },
    /// An unknown `raster-contrast-enhancement`.
    InvalidContrastEnhancement {
        /// The textual value.
        value: String,
    },
    /// A property that needs a number but got something else.
    InvalidNumber {
        /// The offending property.
        property: String,
        /// Its textual value.
        value: String,
    },
}

impl fmt::Display for TranslationError {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TranslationError::InvalidGraphic { ref property, ref value } => write!(
                dest,
                "the value of '{}' must be a symbol or a url, got: {}",
                property, value
            ),
            TranslationError::InvalidAnchor { ref value } => write!(
                dest,
                "invalid anchor specification, should be two floats between 0 and 1 \
                 with a space in between, instead it is: {}",
                value
            ),
            TranslationError::InvalidOffset { ref value } => write!(
                dest,
                "invalid offset specification, should be two floats (or one for line \
                 placement with a certain offset), instead it is: {}",
                value
            ),
            TranslationError::InvalidChannelCount { count } => write!(
                dest,
                "raster-channels can accept the name of one or three bands, not {}",
                count
            ),
            TranslationError::InvalidColorMapEntry { ref value } => write!(
                dest,
                "invalid color map content, it must be a color-map-entry function with \
                 either 2 parameters (color and value) or 3 parameters (color, value \
                 and opacity): {}",
                value
            ),
            TranslationError::InvalidColorMapType { ref value } => {
                write!(dest, "invalid color map type: {}", value)
            },
            TranslationError::InvalidContrastEnhancement { ref value } => write!(
                dest,
                "invalid contrast enhancement name {}, valid values are 'none', \
                 'histogram', 'normalize'",
                value
            ),
            TranslationError::InvalidNumber { ref property, ref value } => {
                write!(dest, "the value of '{}' is not a number: {}", property, value)
            },
        }
    }
}

impl Error for TranslationError {}

/// Translates cartographic stylesheets into SLD styles.
#[derive(Clone, Debug)]
pub struct CssTranslator {
    max_combinations: usize,
}

impl Default for CssTranslator {
    fn default() -> CssTranslator {
        CssTranslator { max_combinations: DEFAULT_MAX_COMBINATIONS }
    }
}

impl CssTranslator {
    /// A translator with the default combination cap.
    pub fn new() -> CssTranslator {
        CssTranslator::default()
    }

    /// A translator with an explicit combination cap.
    pub fn with_max_combinations(max_combinations: usize) -> CssTranslator {
        CssTranslator { max_combinations }
    }

    /// A translator whose cap is read from `GEOCSS_MAX_COMBINATIONS`,
    /// once, at construction. There is no process-wide state: the value
    /// is captured in the returned translator.
    pub fn from_env() -> CssTranslator {
        let max_combinations = env::var(MAX_COMBINATIONS_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_COMBINATIONS);
        CssTranslator { max_combinations }
    }

    /// Translates `stylesheet` into an SLD style.
    pub fn translate(&self, stylesheet: &Stylesheet) -> Result<Style, TranslationError> {
        let mut style = Style {
            name: "Default Styler".to_owned(),
            feature_type_styles: vec![],
        };

        let bands = organize_by_z_index(&stylesheet.rules);
        debug!("split {} rules into {} z-index bands", stylesheet.rules.len(), bands.len());

        for mut band in bands {
            // stable: equal specificity keeps source order
            band.sort_by(|a, b| b.specificity().cmp(&a.specificity()));

            for (type_name, group) in organize_by_type_name(&band) {
                debug!(
                    "type name {:?}: {} rules in group",
                    type_name.name().unwrap_or("*"),
                    group.len()
                );
                let feature_type = target_feature_type(&type_name, &group);
                let feature_type = feature_type.as_ref();

                let mut flattened = flatten_scale_ranges(group);
                flattened.sort_by(|a, b| b.specificity().cmp(&a.specificity()));

                let mut combined =
                    RulePowerSetBuilder::new(&flattened, feature_type, self.max_combinations)
                        .build_power_set();
                combined.sort_by(|a, b| b.specificity().cmp(&a.specificity()));

                let mut rules = vec![];
                let mut coverage = DomainCoverage::new(feature_type);
                for rule in &combined {
                    if !rule.has_symbolizer_property() {
                        continue;
                    }
                    for derived in coverage.add_rule(rule) {
                        if let Some(rule) = build_sld_rule(&derived, feature_type)? {
                            rules.push(rule);
                        }
                    }
                }

                if !rules.is_empty() {
                    let feature_type_names = match type_name.name() {
                        Some(name) => vec![name.to_owned()],
                        None => vec![],
                    };
                    style
                        .feature_type_styles
                        .push(FeatureTypeStyle { feature_type_names, rules });
                }
            }
        }

        Ok(style)
    }
}

/// Splits the rules into bands by ascending z-index. A band is kept only
/// when at least one of its sub-rules can produce a symbolizer.
fn organize_by_z_index(rules: &[CssRule]) -> Vec<Vec<CssRule>> {
    let mut seen = FxHashSet::default();
    for rule in rules {
        seen.extend(rule.z_indexes());
    }
    let mut indexes: Vec<i32> = seen.into_iter().collect();
    indexes.sort_unstable();
    if indexes.is_empty() {
        indexes.push(0);
    }

    let mut bands = vec![];
    for z in indexes {
        let band: Vec<CssRule> = rules
            .iter()
            .filter_map(|rule| rule.sub_rule_by_z_index(z))
            .collect();
        if band.iter().any(CssRule::has_symbolizer_property) {
            bands.push(band);
        }
    }
    bands
}

/// Splits a band into per-type-name groups, conjoining the type name
/// into each rule's selector. The wildcard group exists only when no
/// explicit type name is referenced anywhere, otherwise wildcard rules
/// fold into every named group (drawing them separately too would
/// double-paint).
fn organize_by_type_name(band: &[CssRule]) -> Vec<(TypeName, Vec<CssRule>)> {
    let mut extractor = TypeNameExtractor::new();
    for rule in band {
        extractor.visit(&rule.selector);
    }
    let names = extractor.into_type_names();

    if names == [TypeName::DEFAULT] {
        return vec![(TypeName::DEFAULT, band.to_vec())];
    }

    let mut groups = vec![];
    for type_name in names {
        if type_name.is_default() {
            continue;
        }
        let rules: Vec<CssRule> = band
            .iter()
            .filter_map(|rule| {
                let combined = selectors::and(
                    Selector::TypeName(type_name.clone()),
                    rule.selector.clone(),
                );
                if combined == Selector::Reject {
                    None
                } else {
                    Some(CssRule::new(combined, rule.properties.clone(), rule.comment.clone()))
                }
            })
            .collect();
        groups.push((type_name, rules));
    }
    groups
}

/// Guesses the target feature type for a group of rules.
fn target_feature_type(type_name: &TypeName, rules: &[CssRule]) -> Option<FeatureType> {
    let mut guesser = FeatureTypeGuesser::new();
    for rule in rules {
        guesser.add_rule(rule);
    }
    guesser.into_feature_type(type_name.name())
}

/// Rewrites rules whose selector ORs scale-bearing branches into one
/// sibling rule per scale-bearing branch: a single SLD rule cannot hold
/// a disjunction of scale ranges. When the OR mixes scale-bearing and
/// plain branches this shifts selectivity slightly, the plain branches
/// stay combined; that trade-off is deliberate.
fn flatten_scale_ranges(rules: Vec<CssRule>) -> Vec<CssRule> {
    let mut flattened = vec![];
    for rule in rules {
        let children = match rule.selector {
            Selector::Or(ref children) => children,
            _ => {
                flattened.push(rule);
                continue;
            },
        };
        let mut plain = vec![];
        for child in children {
            if ScaleRangeExtractor::scale_range(child).is_some() {
                flattened.push(CssRule::new(
                    child.clone(),
                    rule.properties.clone(),
                    rule.comment.clone(),
                ));
            } else {
                plain.push(child.clone());
            }
        }
        if !plain.is_empty() {
            flattened.push(CssRule::new(
                selectors::any(plain),
                rule.properties.clone(),
                rule.comment.clone(),
            ));
        }
    }
    flattened
}

/// Projects a derived rule onto an SLD rule: filter, scale bounds,
/// title/abstract, and the symbolizers its properties call for. Returns
/// `None` when the rule's domain turns out empty.
fn build_sld_rule(
    rule: &CssRule,
    feature_type: Option<&FeatureType>,
) -> Result<Option<Rule>, TranslationError> {
    let scale_range = ScaleRangeExtractor::scale_range(&rule.selector);
    if let Some(range) = scale_range {
        if range.is_empty() {
            return Ok(None);
        }
    }
    let filter = build_filter(&rule.selector, feature_type);
    if filter == Filter::Exclude {
        return Ok(None);
    }

    let mut sld_rule = Rule {
        title: rule.title(),
        abstract_text: rule.abstract_text(),
        filter: match filter {
            Filter::Include => None,
            other => Some(other),
        },
        ..Rule::default()
    };
    if let Some(range) = scale_range {
        if range.min > 0.0 {
            sld_rule.min_scale_denominator = Some(range.min);
        }
        if range.max < f64::INFINITY {
            sld_rule.max_scale_denominator = Some(range.max);
        }
    }

    let generate_stroke = rule.has_property(&PseudoClass::Root, &PropertyName::Stroke);
    let line_specific = rule.has_any_property(
        &PseudoClass::Root,
        &[PropertyName::StrokeLabelObstacle],
    );
    let fold_stroke = generate_stroke && !line_specific;
    let generate_polygon = rule.has_property(&PseudoClass::Root, &PropertyName::Fill);

    if generate_polygon {
        sld_rule
            .symbolizers
            .extend(symbolizers::polygon_symbolizers(rule, fold_stroke)?);
    }
    if generate_stroke && !(generate_polygon && fold_stroke) {
        sld_rule
            .symbolizers
            .extend(symbolizers::line_symbolizers(rule)?);
    }
    if rule.has_property(&PseudoClass::Root, &PropertyName::Mark) {
        sld_rule
            .symbolizers
            .extend(symbolizers::point_symbolizers(rule)?);
    }
    if rule.has_property(&PseudoClass::Root, &PropertyName::Label) {
        sld_rule
            .symbolizers
            .extend(symbolizers::text_symbolizers(rule)?);
    }
    if rule.has_property(&PseudoClass::Root, &PropertyName::RasterChannels) {
        sld_rule
            .symbolizers
            .extend(symbolizers::raster_symbolizers(rule)?);
    }

    Ok(Some(sld_rule))
}
