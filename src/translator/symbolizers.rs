/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Projects merged property bags onto SLD symbolizers.
//!
//! Each synthesizer runs once per repetition index: the i-th value of
//! every property feeds the i-th symbolizer, with singleton values
//! broadcast across all repetitions.

use crate::ogc::expression::{self, Expression};
use crate::sld::{
    Channel, ChannelSelection, ColorMap, ColorMapEntry, ColorMapType, ContrastEnhancement,
    ContrastMethod, ExternalGraphic, Fill, Font, Graphic, Halo, LabelPlacement, LineSymbolizer,
    Mark, PointSymbolizer, PolygonSymbolizer, RasterSymbolizer, Stroke, Symbolizer,
    TextSymbolizer, VendorOptions,
};
use crate::stylesheets::{CssRule, PropertyName, PseudoClass};
use crate::translator::TranslationError;
use crate::values::{self, Value};
use std::collections::BTreeMap;

/// The property slice a synthesizer works from.
type PropertyValues = BTreeMap<PropertyName, Vec<Value>>;

static POLYGON_VENDOR_OPTIONS: &[(PropertyName, &str)] = &[
    (PropertyName::GraphicMargin, "graphic-margin"),
    (PropertyName::FillLabelObstacle, "labelObstacle"),
    (PropertyName::FillRandom, "random"),
    (PropertyName::FillRandomSeed, "random-seed"),
    (PropertyName::FillRandomTileSize, "random-tile-size"),
    (PropertyName::FillRandomSymbolCount, "random-symbol-count"),
    (PropertyName::FillRandomSpaceAround, "random-space-around"),
    (PropertyName::FillRandomRotation, "random-rotation"),
];

static LINE_VENDOR_OPTIONS: &[(PropertyName, &str)] = &[
    (PropertyName::StrokeLabelObstacle, "labelObstacle"),
];

static POINT_VENDOR_OPTIONS: &[(PropertyName, &str)] = &[
    (PropertyName::MarkLabelObstacle, "labelObstacle"),
];

static TEXT_VENDOR_OPTIONS: &[(PropertyName, &str)] = &[
    (PropertyName::LabelPadding, "spaceAround"),
    (PropertyName::LabelGroup, "group"),
    (PropertyName::LabelMaxDisplacement, "maxDisplacement"),
    (PropertyName::LabelMinGroupDistance, "minGroupDistance"),
    (PropertyName::LabelRepeat, "repeat"),
    (PropertyName::LabelAllGroup, "allGroup"),
    (PropertyName::LabelRemoveOverlaps, "removeOverlaps"),
    (PropertyName::LabelAllowOverruns, "allowOverrun"),
    (PropertyName::LabelFollowLine, "followLine"),
    (PropertyName::LabelMaxAngleDelta, "maxAngleDelta"),
    (PropertyName::LabelAutoWrap, "autoWrap"),
    (PropertyName::LabelForceLtr, "forceLeftToRight"),
    (PropertyName::LabelConflictResolution, "conflictResolution"),
    (PropertyName::LabelFitGoodness, "goodnessOfFit"),
    (PropertyName::ShieldResize, "graphic-resize"),
    (PropertyName::ShieldMargin, "graphic-margin"),
];

/// Polygon symbolizers for a rule carrying `fill`. The stroke folds into
/// the polygon when `fold_stroke` is set.
pub fn polygon_symbolizers(
    rule: &CssRule,
    fold_stroke: bool,
) -> Result<Vec<Symbolizer>, TranslationError> {
    let groups: &[&str] = if fold_stroke {
        &["fill", "-gt-graphic-margin", "stroke"]
    } else {
        &["fill", "-gt-graphic-margin"]
    };
    let values = rule.property_values(&PseudoClass::Root, groups);
    if values.is_empty() {
        return Ok(vec![]);
    }
    let mut symbolizers = vec![];
    for i in 0..max_repeat_count(&values) {
        let mut symbolizer = PolygonSymbolizer {
            geometry: expression_at(&values, &PropertyName::FillGeometry, i),
            ..PolygonSymbolizer::default()
        };
        build_fill(rule, &mut symbolizer.fill, &values, i)?;
        if fold_stroke {
            let mut stroke = Stroke::default();
            build_stroke(rule, &mut stroke, &values, i)?;
            symbolizer.stroke = Some(stroke);
        }
        symbolizer.vendor_options = vendor_options(POLYGON_VENDOR_OPTIONS, &values, i);
        symbolizers.push(Symbolizer::Polygon(symbolizer));
    }
    Ok(symbolizers)
}

/// Line symbolizers for a rule carrying `stroke` (not folded into a
/// polygon). Repetition indices without a stroke value produce nothing.
pub fn line_symbolizers(rule: &CssRule) -> Result<Vec<Symbolizer>, TranslationError> {
    let values = rule.property_values(&PseudoClass::Root, &["stroke"]);
    if values.is_empty() {
        return Ok(vec![]);
    }
    let mut symbolizers = vec![];
    for i in 0..max_repeat_count(&values) {
        if value_at(&values, &PropertyName::Stroke, i).is_none() {
            continue;
        }
        let mut symbolizer = LineSymbolizer {
            geometry: expression_at(&values, &PropertyName::StrokeGeometry, i),
            ..LineSymbolizer::default()
        };
        build_stroke(rule, &mut symbolizer.stroke, &values, i)?;
        symbolizer.vendor_options = vendor_options(LINE_VENDOR_OPTIONS, &values, i);
        symbolizers.push(Symbolizer::Line(symbolizer));
    }
    Ok(symbolizers)
}

/// Point symbolizers for a rule carrying `mark`.
pub fn point_symbolizers(rule: &CssRule) -> Result<Vec<Symbolizer>, TranslationError> {
    let values = rule.property_values(&PseudoClass::Root, &["mark"]);
    if values.is_empty() {
        return Ok(vec![]);
    }
    let mut symbolizers = vec![];
    for i in 0..max_repeat_count(&values) {
        let mut symbolizer = PointSymbolizer {
            geometry: expression_at(&values, &PropertyName::MarkGeometry, i),
            ..PointSymbolizer::default()
        };
        for mark_value in multi_value(&values, &PropertyName::Mark, i) {
            symbolizer.graphic = build_graphic("mark", mark_value, &values, rule, i)?;
        }
        symbolizer.vendor_options = vendor_options(POINT_VENDOR_OPTIONS, &values, i);
        symbolizers.push(Symbolizer::Point(symbolizer));
    }
    Ok(symbolizers)
}

/// Text symbolizers for a rule carrying `label`.
pub fn text_symbolizers(rule: &CssRule) -> Result<Vec<Symbolizer>, TranslationError> {
    let values = rule.property_values(&PseudoClass::Root, &["label", "font", "shield", "halo"]);
    if values.is_empty() {
        return Ok(vec![]);
    }
    let mut symbolizers = vec![];
    for i in 0..max_repeat_count(&values) {
        let mut symbolizer = TextSymbolizer {
            geometry: expression_at(&values, &PropertyName::LabelGeometry, i),
            ..TextSymbolizer::default()
        };

        // a multi-valued label concatenates its parts
        symbolizer.label = match value_at(&values, &PropertyName::Label, i) {
            Some(&Value::MultiValue(ref parts)) => Some(expression::function(
                "Concatenate",
                parts.iter().map(Value::to_expression).collect(),
            )),
            Some(value) => Some(value.to_expression()),
            None => None,
        };

        let anchor = double_array(&values, &PropertyName::LabelAnchor, i)?;
        let offsets = double_array(&values, &PropertyName::LabelOffset, i)?;
        // a single offset means line placement and wins over any anchor
        symbolizer.placement = match (anchor, offsets) {
            (_, Some(ref offsets)) if offsets.len() == 1 => {
                Some(LabelPlacement::Line { offset: offsets[0] })
            },
            (None, None) => None,
            (anchor, offsets) => {
                let anchor = match anchor {
                    Some(anchor) if anchor.len() == 2 => Some((anchor[0], anchor[1])),
                    Some(_) => {
                        return Err(TranslationError::InvalidAnchor {
                            value: literal_at(&values, &PropertyName::LabelAnchor, i)
                                .unwrap_or_default(),
                        })
                    },
                    None => None,
                };
                let displacement = match offsets {
                    Some(offsets) if offsets.len() == 2 => Some((offsets[0], offsets[1])),
                    Some(_) => {
                        return Err(TranslationError::InvalidOffset {
                            value: literal_at(&values, &PropertyName::LabelOffset, i)
                                .unwrap_or_default(),
                        })
                    },
                    None => None,
                };
                Some(LabelPlacement::Point { anchor, displacement, rotation: None })
            },
        };

        if let Some(rotation) = measure_at(&values, &PropertyName::LabelRotation, i, "deg") {
            match symbolizer.placement {
                Some(LabelPlacement::Line { .. }) => {},
                Some(LabelPlacement::Point { rotation: ref mut slot, .. }) => {
                    *slot = Some(rotation);
                },
                None => {
                    symbolizer.placement = Some(LabelPlacement::Point {
                        anchor: None,
                        displacement: None,
                        rotation: Some(rotation),
                    });
                },
            }
        }

        for shield_value in multi_value(&values, &PropertyName::Shield, i) {
            symbolizer.shield = Some(build_graphic("shield", shield_value, &values, rule, i)?);
        }

        symbolizer.fill.color = expression_at(&values, &PropertyName::FontFill, i);
        symbolizer.fill.opacity = expression_at(&values, &PropertyName::FontOpacity, i);

        // any font-group key other than a lone font-fill brings a font
        // block, even an otherwise empty one
        let font_group = rule.property_values(&PseudoClass::Root, &["font"]);
        let has_font = !font_group.is_empty()
            && (font_group.len() > 1 || !font_group.contains_key(&PropertyName::FontFill));
        if has_font {
            symbolizer.font = Some(Font {
                family: expression_at(&values, &PropertyName::FontFamily, i),
                style: expression_at(&values, &PropertyName::FontStyle, i),
                weight: expression_at(&values, &PropertyName::FontWeight, i),
                size: measure_at(&values, &PropertyName::FontSize, i, "px"),
            });
        }

        if !rule.property_values(&PseudoClass::Root, &["halo"]).is_empty() {
            let mut halo = Halo {
                radius: measure_at(&values, &PropertyName::HaloRadius, i, "px"),
                ..Halo::default()
            };
            halo.fill.color = expression_at(&values, &PropertyName::HaloColor, i);
            halo.fill.opacity = expression_at(&values, &PropertyName::HaloOpacity, i);
            symbolizer.halo = Some(halo);
        }

        symbolizer.priority = expression_at(&values, &PropertyName::LabelPriority, i);
        symbolizer.vendor_options = vendor_options(TEXT_VENDOR_OPTIONS, &values, i);
        symbolizers.push(Symbolizer::Text(symbolizer));
    }
    Ok(symbolizers)
}

/// Raster symbolizers for a rule carrying `raster-channels`.
pub fn raster_symbolizers(rule: &CssRule) -> Result<Vec<Symbolizer>, TranslationError> {
    let values = rule.property_values(&PseudoClass::Root, &["raster"]);
    if values.is_empty() {
        return Ok(vec![]);
    }
    let mut symbolizers = vec![];
    for i in 0..max_repeat_count(&values) {
        let channels = match string_array(&values, &PropertyName::RasterChannels, i) {
            Some(channels) if !channels.is_empty() => channels,
            _ => continue,
        };
        let enhancements = string_array(&values, &PropertyName::RasterContrastEnhancement, i);
        let gammas = double_array(&values, &PropertyName::RasterGamma, i)?;

        let mut symbolizer = RasterSymbolizer::default();
        if channels[0] == "auto" {
            symbolizer.contrast_enhancement = contrast_enhancement(&enhancements, &gammas, 0)?;
        } else {
            symbolizer.channel_selection = Some(match channels.len() {
                1 => ChannelSelection::Gray(Channel {
                    name: channels[0].clone(),
                    contrast_enhancement: contrast_enhancement(&enhancements, &gammas, 0)?,
                }),
                3 => ChannelSelection::Rgb(
                    Box::new(Channel {
                        name: channels[0].clone(),
                        contrast_enhancement: contrast_enhancement(&enhancements, &gammas, 0)?,
                    }),
                    Box::new(Channel {
                        name: channels[1].clone(),
                        contrast_enhancement: contrast_enhancement(&enhancements, &gammas, 1)?,
                    }),
                    Box::new(Channel {
                        name: channels[2].clone(),
                        contrast_enhancement: contrast_enhancement(&enhancements, &gammas, 2)?,
                    }),
                ),
                count => return Err(TranslationError::InvalidChannelCount { count }),
            });
        }

        symbolizer.opacity = expression_at(&values, &PropertyName::RasterOpacity, i);
        symbolizer.geometry = expression_at(&values, &PropertyName::RasterGeometry, i);

        if let Some(value) = value_at(&values, &PropertyName::RasterColorMap, i) {
            let entries: Vec<&Value> = match *value {
                Value::Function(..) => vec![value],
                Value::MultiValue(ref entries) => entries.iter().collect(),
                _ => {
                    return Err(TranslationError::InvalidColorMapEntry {
                        value: value.to_literal(),
                    })
                },
            };
            let mut color_map = ColorMap { kind: ColorMapType::Ramp, entries: vec![] };
            for entry in entries {
                let parameters = match *entry {
                    Value::Function(ref name, ref parameters)
                        if name == values::COLOR_MAP_ENTRY
                            && (2..=3).contains(&parameters.len()) =>
                    {
                        parameters
                    },
                    _ => {
                        return Err(TranslationError::InvalidColorMapEntry {
                            value: entry.to_literal(),
                        })
                    },
                };
                color_map.entries.push(ColorMapEntry {
                    color: parameters[0].to_expression(),
                    quantity: parameters[1].to_expression(),
                    opacity: parameters.get(2).map(Value::to_expression),
                });
            }
            if let Some(kind) = literal_at(&values, &PropertyName::RasterColorMapType, i) {
                color_map.kind = match kind.as_str() {
                    "ramp" => ColorMapType::Ramp,
                    "intervals" => ColorMapType::Intervals,
                    "values" => ColorMapType::Values,
                    _ => return Err(TranslationError::InvalidColorMapType { value: kind }),
                };
            }
            symbolizer.color_map = Some(color_map);
        }

        symbolizers.push(Symbolizer::Raster(symbolizer));
    }
    Ok(symbolizers)
}

/// Contrast enhancement for the i-th band, with broadcast semantics: a
/// shorter array falls back to its first element.
fn contrast_enhancement(
    enhancements: &Option<Vec<String>>,
    gammas: &Option<Vec<f64>>,
    i: usize,
) -> Result<Option<ContrastEnhancement>, TranslationError> {
    let mut enhancement = ContrastEnhancement::default();
    if let Some(ref names) = *enhancements {
        if !names.is_empty() {
            let name = if i < names.len() { &names[i] } else { &names[0] };
            enhancement.method = match name.as_str() {
                "histogram" => Some(ContrastMethod::Histogram),
                "normalize" => Some(ContrastMethod::Normalize),
                "none" => None,
                _ => {
                    return Err(TranslationError::InvalidContrastEnhancement {
                        value: name.clone(),
                    })
                },
            };
        }
    }
    if let Some(ref gammas) = *gammas {
        if !gammas.is_empty() {
            enhancement.gamma = Some(if i < gammas.len() { gammas[i] } else { gammas[0] });
        }
    }
    Ok(if enhancement.is_unset() { None } else { Some(enhancement) })
}

/// Builds a graphic from a `symbol(...)` or `url(...)` value, then
/// applies `<root>-rotation`, `<root>-size` and (for marks) opacity.
fn build_graphic(
    root: &str,
    value: &Value,
    values: &PropertyValues,
    rule: &CssRule,
    i: usize,
) -> Result<Graphic, TranslationError> {
    let (function, parameters) = match *value {
        Value::Function(ref function, ref parameters) => (function, parameters),
        _ => {
            return Err(TranslationError::InvalidGraphic {
                property: root.to_owned(),
                value: value.to_literal(),
            })
        },
    };

    let mut graphic = Graphic::default();
    if function == values::SYMBOL {
        let name = parameters.first().ok_or_else(|| TranslationError::InvalidGraphic {
            property: root.to_owned(),
            value: value.to_literal(),
        })?;
        build_mark(name, rule, root, i, &mut graphic)?;
    } else if function == values::URL {
        let location = parameters
            .first()
            .map(Value::to_literal)
            .ok_or_else(|| TranslationError::InvalidGraphic {
                property: root.to_owned(),
                value: value.to_literal(),
            })?;
        let mime_key = PropertyName::parse(&format!("{}-mime", root));
        let mime_type =
            literal_at(values, &mime_key, i).unwrap_or_else(|| "image/jpeg".to_owned());
        graphic.external_graphic = Some(ExternalGraphic { location, mime_type });
    } else {
        return Err(TranslationError::InvalidGraphic {
            property: root.to_owned(),
            value: value.to_literal(),
        });
    }

    let rotation_key = PropertyName::parse(&format!("{}-rotation", root));
    if let Some(rotation) = measure_at(values, &rotation_key, i, "deg") {
        graphic.rotation = Some(rotation);
    }
    let size_key = PropertyName::parse(&format!("{}-size", root));
    if let Some(size) = measure_at(values, &size_key, i, "px") {
        graphic.size = Some(size);
    }
    if root == "mark" {
        if let Some(opacity) = expression_at(values, &PropertyName::MarkOpacity, i) {
            graphic.opacity = Some(opacity);
        }
    }
    Ok(graphic)
}

/// Builds a well-known mark, pulling fill and stroke from the matching
/// indexed pseudo-classes. Without pseudo-class properties the mark gets
/// the default SLD fill and stroke; `fill: none` / `stroke: none`
/// suppress them.
fn build_mark(
    name: &Value,
    rule: &CssRule,
    root: &str,
    i: usize,
    graphic: &mut Graphic,
) -> Result<(), TranslationError> {
    let mut mark = Mark {
        name: Some(name.to_expression()),
        ..Mark::default()
    };
    let pseudo = indexed_pseudo_class_values(rule, root, i);
    if pseudo.is_empty() {
        mark.fill = Some(Fill::default());
        mark.stroke = Some(Stroke::default());
    } else {
        if !is_none(&pseudo, &PropertyName::Fill, i) {
            let mut fill = Fill::default();
            if pseudo.contains_key(&PropertyName::Fill) {
                build_fill(rule, &mut fill, &pseudo, i)?;
            }
            mark.fill = Some(fill);
        }
        if !is_none(&pseudo, &PropertyName::Stroke, i) {
            let mut stroke = Stroke::default();
            if pseudo.contains_key(&PropertyName::Stroke) {
                build_stroke(rule, &mut stroke, &pseudo, i)?;
            }
            mark.stroke = Some(stroke);
        }
        if let Some(size) = measure_at(&pseudo, &PropertyName::Size, i, "px") {
            graphic.size = Some(size);
        }
        if let Some(rotation) = measure_at(&pseudo, &PropertyName::Rotation, i, "deg") {
            graphic.rotation = Some(rotation);
        }
    }
    graphic.mark = Some(Box::new(mark));
    Ok(())
}

/// Fills `fill` from the i-th values: a function value becomes a graphic
/// fill, anything else the fill color.
fn build_fill(
    rule: &CssRule,
    fill: &mut Fill,
    values: &PropertyValues,
    i: usize,
) -> Result<(), TranslationError> {
    for fill_value in multi_value(values, &PropertyName::Fill, i) {
        if let Value::Function(..) = *fill_value {
            fill.graphic = Some(build_graphic("fill", fill_value, values, rule, i)?);
        } else {
            fill.color = Some(fill_value.to_expression());
        }
    }
    if let Some(opacity) = expression_at(values, &PropertyName::FillOpacity, i) {
        fill.opacity = Some(opacity);
    }
    Ok(())
}

/// Fills `stroke` from the i-th values. A graphic stroke repeats along
/// the line by default; `stroke-repeat: stipple` turns it into a
/// graphic fill of the stroked area.
fn build_stroke(
    rule: &CssRule,
    stroke: &mut Stroke,
    values: &PropertyValues,
    i: usize,
) -> Result<(), TranslationError> {
    for stroke_value in multi_value(values, &PropertyName::Stroke, i) {
        if let Value::Function(..) = *stroke_value {
            let graphic = build_graphic("stroke", stroke_value, values, rule, i)?;
            let repeat = literal_at(values, &PropertyName::StrokeRepeat, i)
                .unwrap_or_else(|| "repeat".to_owned());
            if repeat == "repeat" {
                stroke.graphic_stroke = Some(graphic);
            } else {
                stroke.graphic_fill = Some(graphic);
            }
        } else {
            stroke.color = Some(stroke_value.to_expression());
        }
    }
    if let Some(opacity) = expression_at(values, &PropertyName::StrokeOpacity, i) {
        stroke.opacity = Some(opacity);
    }
    if let Some(width) = measure_at(values, &PropertyName::StrokeWidth, i, "px") {
        stroke.width = Some(width);
    }
    if let Some(line_cap) = expression_at(values, &PropertyName::StrokeLineCap, i) {
        stroke.line_cap = Some(line_cap);
    }
    if let Some(line_join) = expression_at(values, &PropertyName::StrokeLineJoin, i) {
        stroke.line_join = Some(line_join);
    }
    if let Some(dashes) = float_array(values, &PropertyName::StrokeDashArray, i)? {
        stroke.dash_array = Some(dashes);
    }
    if let Some(offset) = measure_at(values, &PropertyName::StrokeDashOffset, i, "px") {
        stroke.dash_offset = Some(offset);
    }
    Ok(())
}

/// The values of the i-th pseudo-class of `name`, merged in precedence
/// order: `symbol`, `symbol:nth(i)`, `name`, `name:nth(i)` (later
/// entries override earlier ones).
fn indexed_pseudo_class_values(rule: &CssRule, name: &str, i: usize) -> PropertyValues {
    let index = (i + 1) as u32;
    let mut combined = rule.pseudo_class_values(&PseudoClass::new("symbol"));
    combined.extend(rule.pseudo_class_values(&PseudoClass::indexed("symbol", index)));
    combined.extend(rule.pseudo_class_values(&PseudoClass::new(name)));
    combined.extend(rule.pseudo_class_values(&PseudoClass::indexed(name, index)));
    combined
}

/// The largest value-list length in the slice; drives the repetition
/// count.
fn max_repeat_count(values: &PropertyValues) -> usize {
    values.values().map(Vec::len).max().unwrap_or(0).max(1)
}

/// The i-th value of a property, or the broadcast singleton.
fn value_at<'a>(values: &'a PropertyValues, name: &PropertyName, i: usize) -> Option<&'a Value> {
    let list = values.get(name)?;
    match list.len() {
        0 => None,
        1 => Some(&list[0]),
        _ => list.get(i),
    }
}

/// The sub-values of the i-th value, unwrapping a multi-value.
fn multi_value<'a>(values: &'a PropertyValues, name: &PropertyName, i: usize) -> Vec<&'a Value> {
    match value_at(values, name, i) {
        Some(value) => value.flatten(),
        None => vec![],
    }
}

/// The i-th value as an expression; a multi-value contributes its first
/// entry.
fn expression_at(values: &PropertyValues, name: &PropertyName, i: usize) -> Option<Expression> {
    match value_at(values, name, i)? {
        &Value::MultiValue(ref parts) => parts.first().map(Value::to_expression),
        value => Some(value.to_expression()),
    }
}

/// The i-th value as a measure: a literal has the default unit suffix
/// stripped, anything else projects to its expression.
fn measure_at(
    values: &PropertyValues,
    name: &PropertyName,
    i: usize,
    default_unit: &str,
) -> Option<Expression> {
    match value_at(values, name, i)? {
        &Value::Literal(ref token) => Some(expression::literal(values::strip_default_unit(
            token,
            default_unit,
        ))),
        value => Some(value.to_expression()),
    }
}

/// The i-th value in textual form.
fn literal_at(values: &PropertyValues, name: &PropertyName, i: usize) -> Option<String> {
    value_at(values, name, i).map(Value::to_literal)
}

/// The i-th value as a list of doubles; percentages normalize to
/// `[0, 1]`.
fn double_array(
    values: &PropertyValues,
    name: &PropertyName,
    i: usize,
) -> Result<Option<Vec<f64>>, TranslationError> {
    let value = match value_at(values, name, i) {
        Some(value) => value,
        None => return Ok(None),
    };
    let mut doubles = vec![];
    for part in value.flatten() {
        let token = part.to_literal();
        match values::parse_double(&token) {
            Some(double) => doubles.push(double),
            None => {
                return Err(TranslationError::InvalidNumber {
                    property: name.name().to_owned(),
                    value: token,
                })
            },
        }
    }
    if doubles.is_empty() {
        Ok(None)
    } else {
        Ok(Some(doubles))
    }
}

/// The i-th value as a list of floats.
fn float_array(
    values: &PropertyValues,
    name: &PropertyName,
    i: usize,
) -> Result<Option<Vec<f32>>, TranslationError> {
    Ok(double_array(values, name, i)?
        .map(|doubles| doubles.into_iter().map(|d| d as f32).collect()))
}

/// The i-th value as a list of strings.
fn string_array(values: &PropertyValues, name: &PropertyName, i: usize) -> Option<Vec<String>> {
    let value = value_at(values, name, i)?;
    let strings: Vec<String> = value.flatten().iter().map(|v| v.to_literal()).collect();
    if strings.is_empty() {
        None
    } else {
        Some(strings)
    }
}

/// Whether the i-th value of a property is the `none` keyword.
fn is_none(values: &PropertyValues, name: &PropertyName, i: usize) -> bool {
    matches!(
        value_at(values, name, i),
        Some(&Value::Literal(ref token)) if token == "none"
    )
}

/// The vendor options a translation table finds in the slice.
fn vendor_options(
    table: &[(PropertyName, &str)],
    values: &PropertyValues,
    i: usize,
) -> VendorOptions {
    let mut options = VendorOptions::new();
    for (key, sld_key) in table {
        if let Some(value) = literal_at(values, key, i) {
            options.insert((*sld_key).to_owned(), value);
        }
    }
    options
}
