/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Translates cartographic stylesheets into OGC SLD styles.
//!
//! The input is a parsed [`Stylesheet`](stylesheets::Stylesheet): an
//! ordered list of cascading rules whose selectors constrain features,
//! scales and drawing order. The output is a [`Style`](sld::Style) tree
//! shaped by the SLD 1.0 model, in which rules are flat, mutually
//! exclusive selection+action pairs. The heavy lifting between the two —
//! cascade resolution, selector algebra, power-set combination, domain
//! coverage subtraction, symbolizer synthesis — lives in
//! [`translator`].
//!
//! ```
//! use geocss::selectors::Selector;
//! use geocss::stylesheets::{CssRule, PropertyName, PseudoClass, Stylesheet};
//! use geocss::values::Value;
//!
//! let mut rule = CssRule::new(Selector::Accept, Default::default(), None);
//! rule.properties.insert(
//!     (PseudoClass::Root, PropertyName::Fill),
//!     vec![Value::literal("#ff0000")],
//! );
//! let style = geocss::translate(&Stylesheet::new(vec![rule])).unwrap();
//! assert_eq!(style.feature_type_styles.len(), 1);
//! ```
//!
//! The stylesheet parser, the XML serializer and the command line live
//! outside this crate; the [`ogc`] and [`sld`] trees are the interfaces
//! they meet this crate at.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod feature_type;
pub mod ogc;
pub mod selectors;
pub mod sld;
pub mod stylesheets;
pub mod translator;
pub mod values;

pub use crate::sld::Style;
pub use crate::stylesheets::Stylesheet;
pub use crate::translator::{CssTranslator, TranslationError, DEFAULT_MAX_COMBINATIONS};

/// Translates `stylesheet` with the default combination cap.
pub fn translate(stylesheet: &Stylesheet) -> Result<Style, TranslationError> {
    CssTranslator::new().translate(stylesheet)
}

/// Translates `stylesheet` with an explicit combination cap.
pub fn translate_with_max_combinations(
    stylesheet: &Stylesheet,
    max_combinations: usize,
) -> Result<Style, TranslationError> {
    CssTranslator::with_max_combinations(max_combinations).translate(stylesheet)
}
