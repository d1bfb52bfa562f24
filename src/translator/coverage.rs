/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Makes rules mutually exclusive by subtracting already-covered domain.
//!
//! A rule's domain is the pair (scale range, feature filter). As rules
//! are emitted in specificity-descending order, the coverage accumulates
//! their domains; each new rule is split at every scale boundary already
//! seen, and within each surviving scale slice its filter is conjoined
//! with the negation of the filters already covering that slice. The
//! result: at any (scale, feature) pair at most one emitted rule
//! matches.

use crate::feature_type::FeatureType;
use crate::ogc::filter::{self, Filter};
use crate::selectors::extractors::ScaleRangeExtractor;
use crate::selectors::{self, ScaleRange, Selector};
use crate::stylesheets::CssRule;
use crate::translator::filter_builder::build_filter;
use log::debug;
use smallvec::SmallVec;

/// The visual footprint of one emitted rule.
#[derive(Clone, Debug)]
struct Domain {
    scale: ScaleRange,
    filter: Filter,
}

/// Accumulates the union of emitted domains and derives the visible
/// remainder of each new rule.
pub struct DomainCoverage<'a> {
    feature_type: Option<&'a FeatureType>,
    domains: Vec<Domain>,
}

impl<'a> DomainCoverage<'a> {
    /// An empty coverage.
    pub fn new(feature_type: Option<&'a FeatureType>) -> DomainCoverage<'a> {
        DomainCoverage { feature_type, domains: vec![] }
    }

    /// Subtracts the covered domain from `rule`, returning one derived
    /// rule per non-empty sub-domain, and then adds the rule's own
    /// domain to the coverage.
    pub fn add_rule(&mut self, rule: &CssRule) -> Vec<CssRule> {
        let scale = ScaleRangeExtractor::scale_range(&rule.selector).unwrap_or(ScaleRange::FULL);
        if scale.is_empty() {
            return vec![];
        }
        let filter = build_filter(&rule.selector, self.feature_type);
        if filter == Filter::Exclude {
            return vec![];
        }

        let mut derived = vec![];
        for slice in self.split(&scale) {
            let covering: Vec<Filter> = self
                .domains
                .iter()
                .filter(|domain| domain.scale.contains_range(&slice))
                .map(|domain| domain.filter.clone())
                .collect();
            let visible = filter::and(filter.clone(), filter::not(filter::any(covering)))
                .simplify(self.feature_type);
            if visible == Filter::Exclude {
                continue;
            }

            let mut parts = vec![];
            if !slice.is_full() {
                parts.push(Selector::ScaleRange(slice));
            }
            if visible != Filter::Include {
                parts.push(selectors::data(visible));
            }
            derived.push(CssRule::new(
                selectors::all(parts),
                rule.properties.clone(),
                rule.comment.clone(),
            ));
        }

        debug!(
            "coverage: rule domain {} split into {} visible sub-domains",
            scale,
            derived.len()
        );
        self.domains.push(Domain { scale, filter });
        derived
    }

    /// Splits `scale` at every covered boundary falling strictly inside
    /// it, yielding adjacent semi-open slices.
    fn split(&self, scale: &ScaleRange) -> Vec<ScaleRange> {
        let mut cuts: SmallVec<[f64; 8]> = SmallVec::new();
        cuts.push(scale.min);
        cuts.push(scale.max);
        for domain in &self.domains {
            for boundary in [domain.scale.min, domain.scale.max] {
                if boundary > scale.min && boundary < scale.max {
                    cuts.push(boundary);
                }
            }
        }
        cuts.sort_by(f64::total_cmp);
        cuts.dedup();
        cuts.windows(2)
            .map(|pair| ScaleRange::new(pair[0], pair[1]))
            .filter(|slice| !slice.is_empty())
            .collect()
    }
}
