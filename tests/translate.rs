/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! End-to-end translation scenarios and cascade invariants.

use geocss::feature_type::{AttributeValue, Feature};
use geocss::ogc::expression;
use geocss::ogc::filter;
use geocss::selectors::{self, ScaleRange, Selector, TypeName};
use geocss::sld::{LabelPlacement, Rule, Style, Symbolizer};
use geocss::stylesheets::{CssRule, PropertyMap, PropertyName, PseudoClass, Stylesheet};
use geocss::values::Value;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn rule(selector: Selector, properties: &[(PropertyName, &[&str])]) -> CssRule {
    let mut map = PropertyMap::new();
    for (name, tokens) in properties {
        map.insert(
            (PseudoClass::Root, name.clone()),
            tokens.iter().map(|t| Value::literal(*t)).collect(),
        );
    }
    CssRule::new(selector, map, None)
}

fn scale_below(max: f64) -> Selector {
    Selector::ScaleRange(ScaleRange::below(max))
}

fn rule_matches(rule: &Rule, feature: &Feature, scale: f64) -> bool {
    if let Some(min) = rule.min_scale_denominator {
        if scale < min {
            return false;
        }
    }
    if let Some(max) = rule.max_scale_denominator {
        if scale >= max {
            return false;
        }
    }
    match rule.filter {
        Some(ref filter) => filter.matches(feature),
        None => true,
    }
}

fn line_stroke_color(rule: &Rule) -> Option<String> {
    rule.symbolizers.iter().find_map(|symbolizer| match *symbolizer {
        Symbolizer::Line(ref line) => match line.stroke.color {
            Some(expression::Expression::Literal(ref color)) => Some(color.clone()),
            _ => None,
        },
        _ => None,
    })
}

#[test]
fn single_polygon() {
    let stylesheet = Stylesheet::new(vec![rule(
        Selector::Accept,
        &[
            (PropertyName::Fill, &["#ff0000"]),
            (PropertyName::FillOpacity, &["0.5"]),
        ],
    )]);
    let style = geocss::translate(&stylesheet).unwrap();

    assert_eq!(style.name, "Default Styler");
    assert_eq!(style.feature_type_styles.len(), 1);
    let fts = &style.feature_type_styles[0];
    assert!(fts.feature_type_names.is_empty());
    assert_eq!(fts.rules.len(), 1);

    let rule = &fts.rules[0];
    assert_eq!(rule.filter, None);
    assert_eq!(rule.min_scale_denominator, None);
    assert_eq!(rule.max_scale_denominator, None);
    assert_eq!(rule.symbolizers.len(), 1);
    match rule.symbolizers[0] {
        Symbolizer::Polygon(ref polygon) => {
            assert_eq!(polygon.fill.color, Some(expression::literal("#ff0000")));
            assert_eq!(polygon.fill.opacity, Some(expression::literal("0.5")));
        },
        ref other => panic!("expected a polygon symbolizer, got {:?}", other),
    }
}

#[test]
fn scale_cascade_subtraction() {
    let stylesheet = Stylesheet::new(vec![
        rule(Selector::Accept, &[(PropertyName::Stroke, &["black"])]),
        rule(scale_below(10000.0), &[(PropertyName::Stroke, &["red"])]),
    ]);
    let style = geocss::translate(&stylesheet).unwrap();

    assert_eq!(style.feature_type_styles.len(), 1);
    let rules = &style.feature_type_styles[0].rules;
    assert_eq!(rules.len(), 2);

    // the more specific scale-bound rule comes first, in red
    assert_eq!(rules[0].max_scale_denominator, Some(10000.0));
    assert_eq!(rules[0].min_scale_denominator, None);
    assert_eq!(line_stroke_color(&rules[0]).as_deref(), Some("red"));

    // the catch-all survives only above the subtracted domain
    assert_eq!(rules[1].min_scale_denominator, Some(10000.0));
    assert_eq!(rules[1].max_scale_denominator, None);
    assert_eq!(line_stroke_color(&rules[1]).as_deref(), Some("black"));
}

#[test]
fn z_order_makes_feature_type_styles() {
    let stylesheet = Stylesheet::new(vec![
        rule(
            Selector::Accept,
            &[(PropertyName::Stroke, &["black"]), (PropertyName::ZIndex, &["0"])],
        ),
        rule(
            Selector::Accept,
            &[
                (PropertyName::Stroke, &["white"]),
                (PropertyName::ZIndex, &["1"]),
                (PropertyName::StrokeWidth, &["3"]),
            ],
        ),
    ]);
    let style = geocss::translate(&stylesheet).unwrap();

    assert_eq!(style.feature_type_styles.len(), 2);
    let z0 = &style.feature_type_styles[0].rules[0];
    assert_eq!(line_stroke_color(z0).as_deref(), Some("black"));
    let z1 = &style.feature_type_styles[1].rules[0];
    assert_eq!(line_stroke_color(z1).as_deref(), Some("white"));
    match z1.symbolizers[0] {
        Symbolizer::Line(ref line) => {
            assert_eq!(line.stroke.width, Some(expression::literal("3")))
        },
        ref other => panic!("expected a line symbolizer, got {:?}", other),
    }
}

#[test]
fn repeated_symbolizers() {
    let stylesheet = Stylesheet::new(vec![rule(
        Selector::Accept,
        &[
            (PropertyName::Stroke, &["red", "blue"]),
            (PropertyName::StrokeWidth, &["2", "6"]),
        ],
    )]);
    let style = geocss::translate(&stylesheet).unwrap();

    let rule = &style.feature_type_styles[0].rules[0];
    assert_eq!(rule.symbolizers.len(), 2);
    match (&rule.symbolizers[0], &rule.symbolizers[1]) {
        (Symbolizer::Line(first), Symbolizer::Line(second)) => {
            assert_eq!(first.stroke.color, Some(expression::literal("red")));
            assert_eq!(first.stroke.width, Some(expression::literal("2")));
            assert_eq!(second.stroke.color, Some(expression::literal("blue")));
            assert_eq!(second.stroke.width, Some(expression::literal("6")));
        },
        other => panic!("expected two line symbolizers, got {:?}", other),
    }
}

#[test]
fn label_with_multi_value_and_anchor() {
    let mut properties = PropertyMap::new();
    properties.insert(
        (PseudoClass::Root, PropertyName::Label),
        vec![Value::multi(vec![
            Value::Expression(expression::property("name")),
            Value::literal(" ("),
            Value::Expression(expression::property("pop")),
            Value::literal(")"),
        ])],
    );
    properties.insert(
        (PseudoClass::Root, PropertyName::LabelAnchor),
        vec![Value::multi(vec![Value::literal("0.5"), Value::literal("0.5")])],
    );
    let stylesheet = Stylesheet::new(vec![CssRule::new(Selector::Accept, properties, None)]);
    let style = geocss::translate(&stylesheet).unwrap();

    let rule = &style.feature_type_styles[0].rules[0];
    match rule.symbolizers[0] {
        Symbolizer::Text(ref text) => {
            assert_eq!(
                text.label,
                Some(expression::function(
                    "Concatenate",
                    vec![
                        expression::property("name"),
                        expression::literal(" ("),
                        expression::property("pop"),
                        expression::literal(")"),
                    ],
                ))
            );
            assert_eq!(
                text.placement,
                Some(LabelPlacement::Point {
                    anchor: Some((0.5, 0.5)),
                    displacement: None,
                    rotation: None,
                })
            );
        },
        ref other => panic!("expected a text symbolizer, got {:?}", other),
    }
}

#[test]
fn raster_with_color_map() {
    let mut properties = PropertyMap::new();
    properties.insert(
        (PseudoClass::Root, PropertyName::RasterChannels),
        vec![Value::literal("auto")],
    );
    properties.insert(
        (PseudoClass::Root, PropertyName::RasterColorMap),
        vec![Value::multi(vec![
            Value::function(
                "color-map-entry",
                vec![Value::literal("#000"), Value::literal("0")],
            ),
            Value::function(
                "color-map-entry",
                vec![Value::literal("#fff"), Value::literal("100")],
            ),
        ])],
    );
    properties.insert(
        (PseudoClass::Root, PropertyName::RasterColorMapType),
        vec![Value::literal("ramp")],
    );
    let stylesheet = Stylesheet::new(vec![CssRule::new(Selector::Accept, properties, None)]);
    let style = geocss::translate(&stylesheet).unwrap();

    let rule = &style.feature_type_styles[0].rules[0];
    match rule.symbolizers[0] {
        Symbolizer::Raster(ref raster) => {
            assert!(raster.channel_selection.is_none());
            assert!(raster.contrast_enhancement.is_none());
            let color_map = raster.color_map.as_ref().expect("color map");
            assert_eq!(color_map.kind, geocss::sld::ColorMapType::Ramp);
            assert_eq!(color_map.entries.len(), 2);
            assert_eq!(color_map.entries[0].color, expression::literal("#000"));
            assert_eq!(color_map.entries[1].color, expression::literal("#fff"));
        },
        ref other => panic!("expected a raster symbolizer, got {:?}", other),
    }
}

#[test]
fn type_names_split_feature_type_styles() {
    let stylesheet = Stylesheet::new(vec![
        rule(
            Selector::TypeName(TypeName::new("roads")),
            &[(PropertyName::Stroke, &["black"])],
        ),
        rule(
            Selector::TypeName(TypeName::new("lakes")),
            &[(PropertyName::Fill, &["blue"])],
        ),
        rule(Selector::Accept, &[(PropertyName::StrokeWidth, &["2"])]),
    ]);
    let style = geocss::translate(&stylesheet).unwrap();

    assert_eq!(style.feature_type_styles.len(), 2);
    assert_eq!(style.feature_type_styles[0].feature_type_names, vec!["roads".to_owned()]);
    assert_eq!(style.feature_type_styles[1].feature_type_names, vec!["lakes".to_owned()]);

    // the wildcard stroke-width folds into the roads stroke
    let roads_rule = &style.feature_type_styles[0].rules[0];
    match roads_rule.symbolizers[0] {
        Symbolizer::Line(ref line) => {
            assert_eq!(line.stroke.color, Some(expression::literal("black")));
            assert_eq!(line.stroke.width, Some(expression::literal("2")));
        },
        ref other => panic!("expected a line symbolizer, got {:?}", other),
    }
}

#[test]
fn comment_tags_reach_the_rule() {
    let mut styled = rule(Selector::Accept, &[(PropertyName::Fill, &["#ff0000"])]);
    styled.comment = Some("@title Parcels\n@title By zone\n@abstract All parcels".to_owned());
    let style = geocss::translate(&Stylesheet::new(vec![styled])).unwrap();

    let rule = &style.feature_type_styles[0].rules[0];
    assert_eq!(rule.title.as_deref(), Some("Parcels, By zone"));
    assert_eq!(rule.abstract_text.as_deref(), Some("All parcels"));
}

/// The cascade used by the randomized invariants below: overlapping
/// scale, attribute and catch-all rules with distinct strokes.
fn overlapping_stylesheet() -> Stylesheet {
    Stylesheet::new(vec![
        rule(
            Selector::Accept,
            &[(PropertyName::Stroke, &["black"]), (PropertyName::StrokeWidth, &["1"])],
        ),
        rule(
            selectors::data(filter::equals(
                expression::property("kind"),
                expression::literal("highway"),
            )),
            &[(PropertyName::Stroke, &["red"])],
        ),
        rule(
            selectors::data(filter::greater(
                expression::property("pop"),
                expression::literal("100000"),
            )),
            &[(PropertyName::Stroke, &["yellow"])],
        ),
        rule(scale_below(10000.0), &[(PropertyName::StrokeWidth, &["3"])]),
    ])
}

fn sample_feature(rng: &mut SmallRng) -> Feature {
    let kinds = ["highway", "street", "path"];
    let mut feature = Feature::new();
    feature.set(
        "kind",
        AttributeValue::String(kinds[rng.gen_range(0..kinds.len())].to_owned()),
    );
    feature.set("pop", AttributeValue::Number(rng.gen_range(0.0..200000.0)));
    feature
}

/// What the cascade itself would paint: every matching source rule
/// applies, higher specificity (then later source position) winning
/// key by key.
fn expected_stroke(feature: &Feature, scale: f64) -> (String, String) {
    let mut color = "black".to_owned();
    let mut width = "1".to_owned();
    if feature.get("kind") == Some(&AttributeValue::String("highway".to_owned())) {
        color = "red".to_owned();
    }
    // same specificity as the highway rule but later in the sheet
    if feature.get("pop").and_then(AttributeValue::as_number).unwrap_or(0.0) > 100000.0 {
        color = "yellow".to_owned();
    }
    if scale < 10000.0 {
        width = "3".to_owned();
    }
    (color, width)
}

#[test]
fn emitted_rules_are_mutually_exclusive() {
    let style = geocss::translate(&overlapping_stylesheet()).unwrap();
    assert_eq!(style.feature_type_styles.len(), 1);
    let rules = &style.feature_type_styles[0].rules;

    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..500 {
        let feature = sample_feature(&mut rng);
        let scale = rng.gen_range(0.0..50000.0);
        let matching: Vec<&Rule> =
            rules.iter().filter(|rule| rule_matches(rule, &feature, scale)).collect();
        assert!(
            matching.len() <= 1,
            "{} rules match feature {:?} at scale {}",
            matching.len(),
            feature,
            scale
        );
    }
}

#[test]
fn visual_equivalence_with_the_cascade() {
    let style = geocss::translate(&overlapping_stylesheet()).unwrap();
    let rules = &style.feature_type_styles[0].rules;

    let mut rng = SmallRng::seed_from_u64(0xcafe);
    for _ in 0..500 {
        let feature = sample_feature(&mut rng);
        let scale = rng.gen_range(0.0..50000.0);
        let matching: Vec<&Rule> =
            rules.iter().filter(|rule| rule_matches(rule, &feature, scale)).collect();
        // the cascade always paints something, so exactly one SLD rule
        // must take over
        assert_eq!(matching.len(), 1, "feature {:?} at scale {}", feature, scale);

        let (color, width) = expected_stroke(&feature, scale);
        match matching[0].symbolizers[0] {
            Symbolizer::Line(ref line) => {
                assert_eq!(line.stroke.color, Some(expression::literal(color)));
                assert_eq!(line.stroke.width, Some(expression::literal(width)));
            },
            ref other => panic!("expected a line symbolizer, got {:?}", other),
        }
    }
}

#[test]
fn specificity_orders_emitted_rules() {
    let style = geocss::translate(&overlapping_stylesheet()).unwrap();
    let rules = &style.feature_type_styles[0].rules;
    assert!(rules.len() > 2);
    // the fully unconstrained remainder of the catch-all comes last
    let last = rules.last().unwrap();
    assert_eq!(line_stroke_color(last).as_deref(), Some("black"));
}

#[test]
fn combination_cap_bounds_rule_count() {
    let stylesheet = Stylesheet::new(vec![
        rule(
            selectors::data(filter::greater(
                expression::property("a"),
                expression::literal("1"),
            )),
            &[(PropertyName::Stroke, &["#111111"])],
        ),
        rule(
            selectors::data(filter::greater(
                expression::property("b"),
                expression::literal("2"),
            )),
            &[(PropertyName::Stroke, &["#222222"])],
        ),
        rule(
            selectors::data(filter::greater(
                expression::property("c"),
                expression::literal("3"),
            )),
            &[(PropertyName::Stroke, &["#333333"])],
        ),
        rule(
            selectors::data(filter::greater(
                expression::property("d"),
                expression::literal("4"),
            )),
            &[(PropertyName::Stroke, &["#444444"])],
        ),
    ]);

    let capped = geocss::translate_with_max_combinations(&stylesheet, 5).unwrap();
    assert!(capped.feature_type_styles[0].rules.len() <= 5);

    let roomy = geocss::translate_with_max_combinations(&stylesheet, 10_000).unwrap();
    assert!(roomy.feature_type_styles[0].rules.len() > 5);
}

#[test]
fn scale_flattening_splits_or_branches() {
    let stylesheet = Stylesheet::new(vec![rule(
        selectors::or(
            Selector::ScaleRange(ScaleRange::below(1000.0)),
            Selector::ScaleRange(ScaleRange::new(20000.0, 50000.0)),
        ),
        &[(PropertyName::Stroke, &["black"])],
    )]);
    let style = geocss::translate(&stylesheet).unwrap();
    let rules = &style.feature_type_styles[0].rules;
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].max_scale_denominator, Some(1000.0));
    assert_eq!(rules[1].min_scale_denominator, Some(20000.0));
    assert_eq!(rules[1].max_scale_denominator, Some(50000.0));
}

#[test]
fn unsatisfiable_combinations_are_dropped() {
    // the two data rules are mutually exclusive by construction
    let stylesheet = Stylesheet::new(vec![
        rule(
            selectors::data(filter::equals(
                expression::property("kind"),
                expression::literal("highway"),
            )),
            &[(PropertyName::Stroke, &["red"])],
        ),
        rule(
            selectors::not(selectors::data(filter::equals(
                expression::property("kind"),
                expression::literal("highway"),
            ))),
            &[(PropertyName::Stroke, &["gray"])],
        ),
    ]);
    let style = geocss::translate(&stylesheet).unwrap();
    let rules = &style.feature_type_styles[0].rules;
    assert_eq!(rules.len(), 2);

    let mut highway = Feature::new();
    highway.set("kind", AttributeValue::String("highway".to_owned()));
    let mut path = Feature::new();
    path.set("kind", AttributeValue::String("path".to_owned()));
    for feature in [&highway, &path] {
        let matching: Vec<&Rule> = rules
            .iter()
            .filter(|rule| rule_matches(rule, feature, 1000.0))
            .collect();
        assert_eq!(matching.len(), 1);
    }
}

#[test]
fn empty_stylesheet_translates_to_empty_style() {
    let style: Style = geocss::translate(&Stylesheet::new(vec![])).unwrap();
    assert!(style.feature_type_styles.is_empty());
}
