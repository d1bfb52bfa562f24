/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The SLD 1.0 style tree the translator emits.
//!
//! Plain data, shaped for the external XML serializer. Optional fields
//! are `None` when the source stylesheet left them unset, so the
//! serializer can omit the corresponding elements.

use crate::ogc::expression::Expression;
use crate::ogc::filter::Filter;
use std::collections::BTreeMap;

/// A complete SLD style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// The style name.
    pub name: String,
    /// Feature type styles, z-index ascending then type-name insertion
    /// order.
    pub feature_type_styles: Vec<FeatureTypeStyle>,
}

/// A group of rules bound to one feature type name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureTypeStyle {
    /// The feature type names this style applies to; empty means any.
    pub feature_type_names: Vec<String>,
    /// The rules, specificity descending.
    pub rules: Vec<Rule>,
}

/// A selection + action pair: filter, scale bounds, symbolizers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rule {
    /// Rule title, from `@title` comment tags.
    pub title: Option<String>,
    /// Rule abstract, from `@abstract` comment tags.
    pub abstract_text: Option<String>,
    /// The feature filter; `None` stands for `INCLUDE`.
    pub filter: Option<Filter>,
    /// Minimum scale denominator, inclusive.
    pub min_scale_denominator: Option<f64>,
    /// Maximum scale denominator, exclusive.
    pub max_scale_denominator: Option<f64>,
    /// The symbolizers, in polygon / line / point / text / raster order.
    pub symbolizers: Vec<Symbolizer>,
}

/// Vendor options attached to a symbolizer.
pub type VendorOptions = BTreeMap<String, String>;

/// One symbolizer of any kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbolizer {
    /// Polygon fill (and optionally folded stroke).
    Polygon(PolygonSymbolizer),
    /// Line stroke.
    Line(LineSymbolizer),
    /// Point graphic.
    Point(PointSymbolizer),
    /// Text label.
    Text(TextSymbolizer),
    /// Raster rendering.
    Raster(RasterSymbolizer),
}

/// A polygon symbolizer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolygonSymbolizer {
    /// Alternative geometry attribute.
    pub geometry: Option<Expression>,
    /// The fill.
    pub fill: Fill,
    /// The stroke, when folded into the polygon.
    pub stroke: Option<Stroke>,
    /// Vendor options.
    pub vendor_options: VendorOptions,
}

/// A line symbolizer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSymbolizer {
    /// Alternative geometry attribute.
    pub geometry: Option<Expression>,
    /// The stroke.
    pub stroke: Stroke,
    /// Vendor options.
    pub vendor_options: VendorOptions,
}

/// A point symbolizer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSymbolizer {
    /// Alternative geometry attribute.
    pub geometry: Option<Expression>,
    /// The graphic to draw.
    pub graphic: Graphic,
    /// Vendor options.
    pub vendor_options: VendorOptions,
}

/// A text symbolizer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextSymbolizer {
    /// Alternative geometry attribute.
    pub geometry: Option<Expression>,
    /// The label expression.
    pub label: Option<Expression>,
    /// Label placement.
    pub placement: Option<LabelPlacement>,
    /// The shield graphic behind the label.
    pub shield: Option<Graphic>,
    /// Text fill.
    pub fill: Fill,
    /// The font, when font properties are present.
    pub font: Option<Font>,
    /// The halo, when halo properties are present.
    pub halo: Option<Halo>,
    /// Label priority expression.
    pub priority: Option<Expression>,
    /// Vendor options.
    pub vendor_options: VendorOptions,
}

/// A raster symbolizer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RasterSymbolizer {
    /// Alternative geometry attribute.
    pub geometry: Option<Expression>,
    /// Overall opacity.
    pub opacity: Option<Expression>,
    /// Channel bindings; `None` with `auto` channels.
    pub channel_selection: Option<ChannelSelection>,
    /// Symbolizer-level contrast enhancement (the `auto` channel case).
    pub contrast_enhancement: Option<ContrastEnhancement>,
    /// The color map.
    pub color_map: Option<ColorMap>,
}

/// A fill: flat color or graphic fill.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fill {
    /// Fill color.
    pub color: Option<Expression>,
    /// Fill opacity.
    pub opacity: Option<Expression>,
    /// Graphic fill, when the fill value is a `symbol()`/`url()`.
    pub graphic: Option<Graphic>,
}

impl Fill {
    /// Whether nothing was ever set on the fill.
    pub fn is_unset(&self) -> bool {
        self.color.is_none() && self.opacity.is_none() && self.graphic.is_none()
    }
}

/// A stroke: color or graphic, plus line styling.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Option<Expression>,
    /// Stroke opacity.
    pub opacity: Option<Expression>,
    /// Stroke width.
    pub width: Option<Expression>,
    /// Line cap.
    pub line_cap: Option<Expression>,
    /// Line join.
    pub line_join: Option<Expression>,
    /// Dash array.
    pub dash_array: Option<Vec<f32>>,
    /// Dash offset.
    pub dash_offset: Option<Expression>,
    /// Graphic repeated along the line.
    pub graphic_stroke: Option<Graphic>,
    /// Graphic used as a stipple fill of the stroke area.
    pub graphic_fill: Option<Graphic>,
}

impl Stroke {
    /// Whether nothing was ever set on the stroke.
    pub fn is_unset(&self) -> bool {
        *self == Stroke::default()
    }
}

/// A graphic: either a well-known mark or an external image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graphic {
    /// The well-known mark, for `symbol(...)` values.
    pub mark: Option<Box<Mark>>,
    /// The external graphic, for `url(...)` values.
    pub external_graphic: Option<ExternalGraphic>,
    /// Graphic size.
    pub size: Option<Expression>,
    /// Graphic rotation.
    pub rotation: Option<Expression>,
    /// Graphic opacity (marks only).
    pub opacity: Option<Expression>,
}

/// A well-known mark with its own fill and stroke.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mark {
    /// The well-known name (`circle`, `square`, ...).
    pub name: Option<Expression>,
    /// Mark fill; `None` suppresses the default fill.
    pub fill: Option<Fill>,
    /// Mark stroke; `None` suppresses the default stroke.
    pub stroke: Option<Stroke>,
}

/// An external graphic by location and mime type.
#[derive(Clone, Debug, PartialEq)]
pub struct ExternalGraphic {
    /// The image location.
    pub location: String,
    /// The image mime type.
    pub mime_type: String,
}

/// Label placement.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelPlacement {
    /// Point placement with anchor, displacement and rotation.
    Point {
        /// Anchor point, in `[0, 1]` label fractions.
        anchor: Option<(f64, f64)>,
        /// Displacement in pixels.
        displacement: Option<(f64, f64)>,
        /// Rotation in degrees.
        rotation: Option<Expression>,
    },
    /// Line placement with a perpendicular offset.
    Line {
        /// The offset from the line.
        offset: f64,
    },
}

/// A font block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Font {
    /// Font family.
    pub family: Option<Expression>,
    /// Font style.
    pub style: Option<Expression>,
    /// Font weight.
    pub weight: Option<Expression>,
    /// Font size.
    pub size: Option<Expression>,
}

/// A halo block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Halo {
    /// Halo radius.
    pub radius: Option<Expression>,
    /// Halo fill.
    pub fill: Fill,
}

/// Raster channel bindings.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelSelection {
    /// A single grayscale channel.
    Gray(Channel),
    /// Red, green and blue channels.
    Rgb(Box<Channel>, Box<Channel>, Box<Channel>),
}

/// One bound raster channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Channel {
    /// The source channel name.
    pub name: String,
    /// Per-channel contrast enhancement.
    pub contrast_enhancement: Option<ContrastEnhancement>,
}

/// A contrast enhancement: method and gamma.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContrastEnhancement {
    /// The enhancement method; `None` is plain gamma adjustment.
    pub method: Option<ContrastMethod>,
    /// Gamma correction.
    pub gamma: Option<f64>,
}

impl ContrastEnhancement {
    /// Whether nothing was ever set.
    pub fn is_unset(&self) -> bool {
        self.method.is_none() && self.gamma.is_none()
    }
}

/// A contrast enhancement method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContrastMethod {
    /// Histogram equalization.
    Histogram,
    /// Min-max normalization.
    Normalize,
}

/// A color map.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMap {
    /// The color map type.
    pub kind: ColorMapType,
    /// The entries, in source order.
    pub entries: Vec<ColorMapEntry>,
}

/// The color map interpolation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMapType {
    /// Linear interpolation between entries.
    #[default]
    Ramp,
    /// Discrete intervals.
    Intervals,
    /// Exact values.
    Values,
}

/// One color map entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMapEntry {
    /// The entry color.
    pub color: Expression,
    /// The quantity the color applies to.
    pub quantity: Expression,
    /// The entry opacity.
    pub opacity: Option<Expression>,
}
