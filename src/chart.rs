//! Dense span-indexed DP tables.
//!
//! The four tables (`delta`, `theta`, `sigma`, `upsilon`) are stored as flat
//! vectors addressed by a packed span index. `delta` holds log scores, with
//! `-inf` for spans that have no derivation. Source ranges `s..t` with
//! `s <= t` are packed triangularly (`t(t+1)/2 + s`), target ranges likewise,
//! so a sentence pair of lengths `T` and `V` needs
//! `(T+1)(T+2)/2 * (V+1)(V+2)/2` cells.

use crate::span::{Orientation, Span, Split};

/// Best split decision recorded for a non-terminal span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub score: f64,
    pub orientation: Orientation,
    pub split: Split,
}

/// DP tables for one sentence pair.
#[derive(Debug, Clone)]
pub struct Chart {
    source_len: usize,
    target_len: usize,
    target_ranges: usize,
    delta: Vec<f64>,
    theta: Vec<Option<Orientation>>,
    sigma: Vec<usize>,
    upsilon: Vec<usize>,
}

#[inline]
fn packed_range(start: usize, end: usize) -> usize {
    end * (end + 1) / 2 + start
}

impl Chart {
    /// Allocate empty tables covering every span of a `source_len` ×
    /// `target_len` sentence pair.
    pub fn new(source_len: usize, target_len: usize) -> Self {
        let source_ranges = (source_len + 1) * (source_len + 2) / 2;
        let target_ranges = (target_len + 1) * (target_len + 2) / 2;
        let cells = source_ranges * target_ranges;
        Self {
            source_len,
            target_len,
            target_ranges,
            delta: vec![f64::NEG_INFINITY; cells],
            theta: vec![None; cells],
            sigma: vec![0; cells],
            upsilon: vec![0; cells],
        }
    }

    #[inline]
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    #[inline]
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// The span covering both whole sentences.
    #[inline]
    pub fn root(&self) -> Span {
        Span::new(0, self.source_len, 0, self.target_len)
    }

    /// Number of cells per table.
    #[inline]
    pub fn cells(&self) -> usize {
        self.delta.len()
    }

    #[inline]
    fn index(&self, q: &Span) -> usize {
        debug_assert!(
            q.s <= q.t && q.t <= self.source_len && q.u <= q.v && q.v <= self.target_len,
            "span {q} out of bounds for chart {}x{}",
            self.source_len,
            self.target_len
        );
        packed_range(q.s, q.t) * self.target_ranges + packed_range(q.u, q.v)
    }

    /// Best derivation log score of `q`; `-inf` for spans nothing was
    /// written to.
    #[inline]
    pub fn delta(&self, q: &Span) -> f64 {
        self.delta[self.index(q)]
    }

    #[inline]
    pub fn set_delta(&mut self, q: &Span, value: f64) {
        let idx = self.index(q);
        self.delta[idx] = value;
    }

    /// Store the winning split of a non-terminal span.
    #[inline]
    pub fn record(&mut self, q: &Span, decision: Decision) {
        debug_assert!(!q.is_terminal(), "terminal span {q} must not carry a split");
        let idx = self.index(q);
        self.delta[idx] = decision.score;
        self.theta[idx] = Some(decision.orientation);
        self.sigma[idx] = decision.split.source;
        self.upsilon[idx] = decision.split.target;
    }

    /// The recorded decision, or `None` for terminals and for spans that
    /// admit no derivation with a finite score.
    #[inline]
    pub fn decision(&self, q: &Span) -> Option<Decision> {
        let idx = self.index(q);
        self.theta[idx].map(|orientation| Decision {
            score: self.delta[idx],
            orientation,
            split: Split::new(self.sigma[idx], self.upsilon[idx]),
        })
    }
}
