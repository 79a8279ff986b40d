//! Corpus-level rule and link counters.
//!
//! A [`CorpusStats`] accumulates over every sentence a parser has seen. The
//! derived fractions divide pooled counts, so two sentences with 1/2 and 1/4
//! null links yield 2/6, not the mean 3/8.

use std::ops::AddAssign;

use crate::alignment::Link;
use crate::error::{ItgError, Result};
use crate::span::Orientation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusStats {
    /// Binary rule applications in reconstructed derivations.
    pub rules: u64,
    pub direct_rules: u64,
    pub inverted_rules: u64,
    /// Alignment links emitted.
    pub links: u64,
    /// Links `(t, 0)`: a source word aligned to nothing.
    pub source_null_links: u64,
    /// Links `(0, v)`: a target word aligned to nothing.
    pub target_null_links: u64,
}

impl CorpusStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_rule(&mut self, orientation: Orientation) {
        self.rules += 1;
        match orientation {
            Orientation::Direct => self.direct_rules += 1,
            Orientation::Inverted => self.inverted_rules += 1,
        }
    }

    #[inline]
    pub fn record_link(&mut self, link: Link) {
        self.links += 1;
        match link {
            (0, _) => self.target_null_links += 1,
            (_, 0) => self.source_null_links += 1,
            _ => {}
        }
    }

    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &CorpusStats) {
        self.rules += other.rules;
        self.direct_rules += other.direct_rules;
        self.inverted_rules += other.inverted_rules;
        self.links += other.links;
        self.source_null_links += other.source_null_links;
        self.target_null_links += other.target_null_links;
    }

    /// Share of links in which a source word has no target counterpart.
    pub fn fraction_source_null(&self) -> Result<f64> {
        ratio(
            self.source_null_links,
            self.links,
            "fraction_source_null",
            "alignment links",
        )
    }

    /// Share of links in which a target word has no source counterpart.
    pub fn fraction_target_null(&self) -> Result<f64> {
        ratio(
            self.target_null_links,
            self.links,
            "fraction_target_null",
            "alignment links",
        )
    }

    pub fn fraction_direct_rules(&self) -> Result<f64> {
        ratio(
            self.direct_rules,
            self.rules,
            "fraction_direct_rules",
            "rule applications",
        )
    }

    pub fn fraction_inverted_rules(&self) -> Result<f64> {
        ratio(
            self.inverted_rules,
            self.rules,
            "fraction_inverted_rules",
            "rule applications",
        )
    }
}

impl AddAssign<&CorpusStats> for CorpusStats {
    fn add_assign(&mut self, rhs: &CorpusStats) {
        self.merge(rhs);
    }
}

impl std::iter::Sum for CorpusStats {
    fn sum<I: Iterator<Item = CorpusStats>>(iter: I) -> Self {
        iter.fold(CorpusStats::new(), |mut acc, s| {
            acc.merge(&s);
            acc
        })
    }
}

fn ratio(
    count: u64,
    total: u64,
    statistic: &'static str,
    denominator: &'static str,
) -> Result<f64> {
    if total == 0 {
        return Err(ItgError::ZeroTotal {
            statistic,
            denominator,
        });
    }
    Ok(count as f64 / total as f64)
}
