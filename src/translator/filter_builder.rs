/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Compiles the feature-predicate residue of a selector into an OGC
//! filter.
//!
//! Type names are stripped (the feature-type-style grouping already
//! encodes them), scale ranges are stripped (they become rule scale
//! bounds), z-index atoms are band markers. What remains is data
//! predicates, id sets and the logic connecting them.

use crate::feature_type::FeatureType;
use crate::ogc::filter::{self, Filter};
use crate::selectors::Selector;

/// Compiles `selector` to a filter, simplifying against `feature_type`
/// first. `Accept` compiles to `INCLUDE`, `Reject` to `EXCLUDE`.
pub fn build_filter(selector: &Selector, feature_type: Option<&FeatureType>) -> Filter {
    compile(&selector.simplify(feature_type)).simplify(feature_type)
}

fn compile(selector: &Selector) -> Filter {
    match *selector {
        Selector::Accept => Filter::Include,
        Selector::Reject => Filter::Exclude,
        Selector::TypeName(_) => Filter::Include,
        Selector::ScaleRange(_) => Filter::Include,
        Selector::ZIndex(_) => Filter::Include,
        Selector::Id(ref ids) => Filter::Id(ids.clone()),
        Selector::Data(ref predicate) => (**predicate).clone(),
        Selector::And(ref children) => filter::all(children.iter().map(compile).collect()),
        Selector::Or(ref children) => filter::any(children.iter().map(compile).collect()),
        // A negated structural atom (scale range, type name) has no
        // feature-predicate residue; dropping it keeps the filter sound,
        // the structural side is handled by scale bounds and grouping.
        Selector::Not(ref child) => match compile(child) {
            Filter::Include => Filter::Include,
            inner => filter::not(inner),
        },
    }
}
