/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Selector specificity.

use std::ops::Add;

/// A lexicographic selector-complexity score.
///
/// The field order is the comparison order: type names weigh more than
/// ids, ids more than data predicates, and so on. Derived `Ord` compares
/// fields in declaration order, which is exactly the lexicographic rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    /// Number of type-name constraints.
    pub type_names: u32,
    /// Number of feature-id sets.
    pub ids: u32,
    /// Number of data predicates.
    pub data: u32,
    /// Number of scale-range constraints.
    pub scale_ranges: u32,
    /// Number of pseudo-classes carrying properties.
    pub pseudo_classes: u32,
}

impl Specificity {
    /// The zero score.
    pub const ZERO: Specificity = Specificity {
        type_names: 0,
        ids: 0,
        data: 0,
        scale_ranges: 0,
        pseudo_classes: 0,
    };

    /// A score from raw counts, in field order.
    pub fn new(type_names: u32, ids: u32, data: u32, scale_ranges: u32, pseudo_classes: u32) -> Specificity {
        Specificity { type_names, ids, data, scale_ranges, pseudo_classes }
    }
}

impl Add for Specificity {
    type Output = Specificity;

    fn add(self, other: Specificity) -> Specificity {
        Specificity {
            type_names: self.type_names + other.type_names,
            ids: self.ids + other.ids,
            data: self.data + other.data,
            scale_ranges: self.scale_ranges + other.scale_ranges,
            pseudo_classes: self.pseudo_classes + other.pseudo_classes,
        }
    }
}
