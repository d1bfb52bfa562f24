/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Semi-open scale-denominator intervals.

use std::fmt;

/// A semi-open interval `[min, max)` on the scale denominator.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ScaleRange {
    /// Lower bound, inclusive.
    pub min: f64,
    /// Upper bound, exclusive.
    pub max: f64,
}

impl ScaleRange {
    /// The full scale axis.
    pub const FULL: ScaleRange = ScaleRange { min: 0.0, max: f64::INFINITY };

    /// A new range; `min` must not exceed `max`.
    pub fn new(min: f64, max: f64) -> ScaleRange {
        debug_assert!(min <= max, "inverted scale range {}..{}", min, max);
        ScaleRange { min, max }
    }

    /// Everything below `max`.
    pub fn below(max: f64) -> ScaleRange {
        ScaleRange::new(0.0, max)
    }

    /// Everything from `min` up.
    pub fn above(min: f64) -> ScaleRange {
        ScaleRange::new(min, f64::INFINITY)
    }

    /// Whether no denominator falls in the range.
    pub fn is_empty(&self) -> bool {
        !(self.min < self.max)
    }

    /// Whether the range admits every denominator.
    pub fn is_full(&self) -> bool {
        self.min <= 0.0 && self.max == f64::INFINITY
    }

    /// Whether `scale` falls in the range.
    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.min && scale < self.max
    }

    /// Whether `other` is entirely inside this range.
    pub fn contains_range(&self, other: &ScaleRange) -> bool {
        other.is_empty() || (self.min <= other.min && other.max <= self.max)
    }

    /// Whether the two ranges share any denominator.
    pub fn overlaps(&self, other: &ScaleRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.min < other.max && other.min < self.max
    }

    /// The intersection, or `None` when the ranges are disjoint.
    pub fn intersection(&self, other: &ScaleRange) -> Option<ScaleRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min < max {
            Some(ScaleRange::new(min, max))
        } else {
            None
        }
    }
}

impl fmt::Display for ScaleRange {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        if self.max == f64::INFINITY {
            write!(dest, "[{}, \u{221e})", self.min)
        } else {
            write!(dest, "[{}, {})", self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_semi_open() {
        let range = ScaleRange::new(1000.0, 10000.0);
        assert!(range.contains(1000.0));
        assert!(range.contains(9999.9));
        assert!(!range.contains(10000.0));
        assert!(!range.contains(999.9));
    }

    #[test]
    fn intersection() {
        let a = ScaleRange::new(0.0, 10000.0);
        let b = ScaleRange::new(5000.0, 20000.0);
        assert_eq!(a.intersection(&b), Some(ScaleRange::new(5000.0, 10000.0)));
        assert_eq!(b.intersection(&a), Some(ScaleRange::new(5000.0, 10000.0)));

        let c = ScaleRange::new(20000.0, 30000.0);
        assert_eq!(a.intersection(&c), None);
        // adjacent semi-open ranges do not intersect
        let d = ScaleRange::new(10000.0, 20000.0);
        assert_eq!(a.intersection(&d), None);
    }

    #[test]
    fn full_and_empty() {
        assert!(ScaleRange::FULL.is_full());
        assert!(!ScaleRange::FULL.is_empty());
        assert!(ScaleRange::new(5.0, 5.0).is_empty());
        assert!(ScaleRange::FULL.contains_range(&ScaleRange::new(1.0, 2.0)));
        assert!(!ScaleRange::new(1.0, 2.0).contains_range(&ScaleRange::FULL));
    }

    #[test]
    fn overlap_needs_shared_denominators() {
        let a = ScaleRange::new(0.0, 10000.0);
        let b = ScaleRange::new(10000.0, 20000.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&ScaleRange::new(9999.0, 20000.0)));
    }
}
