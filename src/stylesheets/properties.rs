/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The recognized cartographic property namespace.
//!
//! Property keys are a closed enumeration so that lookups are typo-proof
//! in the translator; unrecognized keys survive as `Other` and flow
//! through untouched.

macro_rules! property_names {
    ( $( $variant: ident => $css: literal, )+ ) => {
        /// A cartographic property key.
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum PropertyName {
            $(
                #[doc = $css]
                $variant,
            )+
            /// An unrecognized or extension key, kept verbatim.
            Other(String),
        }

        impl PropertyName {
            /// Maps a source token onto the typed key.
            pub fn parse(name: &str) -> PropertyName {
                match name {
                    $( $css => PropertyName::$variant, )+
                    _ => PropertyName::Other(name.to_owned()),
                }
            }

            /// The canonical dashed name.
            pub fn name(&self) -> &str {
                match *self {
                    $( PropertyName::$variant => $css, )+
                    PropertyName::Other(ref name) => name,
                }
            }
        }
    }
}

property_names! {
    Fill => "fill",
    FillOpacity => "fill-opacity",
    FillGeometry => "fill-geometry",
    FillSize => "fill-size",
    FillRotation => "fill-rotation",
    FillMime => "fill-mime",
    Stroke => "stroke",
    StrokeOpacity => "stroke-opacity",
    StrokeWidth => "stroke-width",
    StrokeLineCap => "stroke-linecap",
    StrokeLineJoin => "stroke-linejoin",
    StrokeDashArray => "stroke-dasharray",
    StrokeDashOffset => "stroke-dashoffset",
    StrokeGeometry => "stroke-geometry",
    StrokeRepeat => "stroke-repeat",
    StrokeSize => "stroke-size",
    StrokeRotation => "stroke-rotation",
    StrokeMime => "stroke-mime",
    Mark => "mark",
    MarkSize => "mark-size",
    MarkRotation => "mark-rotation",
    MarkOpacity => "mark-opacity",
    MarkGeometry => "mark-geometry",
    MarkMime => "mark-mime",
    Label => "label",
    LabelGeometry => "label-geometry",
    LabelAnchor => "label-anchor",
    LabelOffset => "label-offset",
    LabelRotation => "label-rotation",
    Shield => "shield",
    ShieldMime => "shield-mime",
    ShieldSize => "shield-size",
    ShieldRotation => "shield-rotation",
    FontFamily => "font-family",
    FontStyle => "font-style",
    FontWeight => "font-weight",
    FontSize => "font-size",
    FontFill => "font-fill",
    FontOpacity => "font-opacity",
    HaloRadius => "halo-radius",
    HaloColor => "halo-color",
    HaloOpacity => "halo-opacity",
    RasterChannels => "raster-channels",
    RasterOpacity => "raster-opacity",
    RasterGeometry => "raster-geometry",
    RasterGamma => "raster-gamma",
    RasterContrastEnhancement => "raster-contrast-enhancement",
    RasterColorMap => "raster-color-map",
    RasterColorMapType => "raster-color-map-type",
    Size => "size",
    Rotation => "rotation",
    ZIndex => "z-index",
    GraphicMargin => "-gt-graphic-margin",
    FillLabelObstacle => "-gt-fill-label-obstacle",
    FillRandom => "-gt-fill-random",
    FillRandomSeed => "-gt-fill-random-seed",
    FillRandomTileSize => "-gt-fill-random-tile-size",
    FillRandomSymbolCount => "-gt-fill-random-symbol-count",
    FillRandomSpaceAround => "-gt-fill-random-space-around",
    FillRandomRotation => "-gt-fill-random-rotation",
    StrokeLabelObstacle => "-gt-stroke-label-obstacle",
    MarkLabelObstacle => "-gt-mark-label-obstacle",
    LabelPriority => "-gt-label-priority",
    LabelPadding => "-gt-label-padding",
    LabelGroup => "-gt-label-group",
    LabelMaxDisplacement => "-gt-label-max-displacement",
    LabelMinGroupDistance => "-gt-label-min-group-distance",
    LabelRepeat => "-gt-label-repeat",
    LabelAllGroup => "-gt-label-all-group",
    LabelRemoveOverlaps => "-gt-label-remove-overlaps",
    LabelAllowOverruns => "-gt-label-allow-overruns",
    LabelFollowLine => "-gt-label-follow-line",
    LabelMaxAngleDelta => "-gt-label-max-angle-delta",
    LabelAutoWrap => "-gt-label-auto-wrap",
    LabelForceLtr => "-gt-label-force-ltr",
    LabelConflictResolution => "-gt-label-conflict-resolution",
    LabelFitGoodness => "-gt-label-fit-goodness",
    ShieldResize => "-gt-shield-resize",
    ShieldMargin => "-gt-shield-margin",
}

/// The keys that trigger a symbolizer when present at the root
/// pseudo-class.
pub static SYMBOLIZER_TRIGGERS: &[PropertyName] = &[
    PropertyName::Fill,
    PropertyName::Stroke,
    PropertyName::Mark,
    PropertyName::Label,
    PropertyName::RasterChannels,
];
