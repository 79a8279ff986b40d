//! Span coordinates shared by the chart, the solver and the derivation tree.
//!
//! A [`Span`] pairs a half-open source range `s..t` with a half-open target
//! range `u..v`. It stands for "source tokens `s..t` align, as a unit, with
//! target tokens `u..v`".

use std::fmt;

/// A pair of half-open ranges over the source and target sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Inclusive source start.
    pub s: usize,
    /// Exclusive source end.
    pub t: usize,
    /// Inclusive target start.
    pub u: usize,
    /// Exclusive target end.
    pub v: usize,
}

impl Span {
    #[inline]
    pub const fn new(s: usize, t: usize, u: usize, v: usize) -> Self {
        Self { s, t, u, v }
    }

    /// Number of source tokens covered.
    #[inline]
    pub fn source_len(&self) -> usize {
        self.t.saturating_sub(self.s)
    }

    /// Number of target tokens covered.
    #[inline]
    pub fn target_len(&self) -> usize {
        self.v.saturating_sub(self.u)
    }

    /// `(t - s) + (v - u)`.
    #[inline]
    pub fn width(&self) -> usize {
        self.source_len() + self.target_len()
    }

    /// Spans of width ≤ 2 are seeded directly and never split.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.width() <= 2
    }

    /// Sub-spans produced by splitting at `split` in the given orientation,
    /// returned as `(left, right)`.
    #[inline]
    pub fn children(&self, orientation: Orientation, split: Split) -> (Span, Span) {
        let Split { source: cs, target: cu } = split;
        match orientation {
            Orientation::Direct => (
                Span::new(self.s, cs, self.u, cu),
                Span::new(cs, self.t, cu, self.v),
            ),
            Orientation::Inverted => (
                Span::new(self.s, cs, cu, self.v),
                Span::new(cs, self.t, self.u, cu),
            ),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.s, self.t, self.u, self.v)
    }
}

/// Binary rule orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Both sides keep their order: `[A B]`.
    Direct,
    /// The target side is swapped: `<A B>`.
    Inverted,
}

/// Interior split coordinates `(S, U)` of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Split {
    pub source: usize,
    pub target: usize,
}

impl Split {
    #[inline]
    pub const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }

    /// A split is degenerate when both resulting halves would repeat the
    /// parent on one side and be empty on the other, i.e.
    /// `(S-s)(t-S) + (U-u)(v-U) == 0`.
    #[inline]
    pub fn is_degenerate_for(&self, span: &Span) -> bool {
        let src = (self.source - span.s) * (span.t - self.source);
        let tgt = (self.target - span.u) * (span.v - self.target);
        src + tgt == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_both_sides() {
        let q = Span::new(1, 3, 0, 4);
        assert_eq!(q.source_len(), 2);
        assert_eq!(q.target_len(), 4);
        assert_eq!(q.width(), 6);
        assert!(!q.is_terminal());
        assert!(Span::new(0, 1, 2, 3).is_terminal());
        assert!(Span::new(2, 2, 1, 1).is_terminal());
    }

    #[test]
    fn direct_children_keep_order() {
        let q = Span::new(0, 3, 0, 4);
        let (l, r) = q.children(Orientation::Direct, Split::new(1, 2));
        assert_eq!(l, Span::new(0, 1, 0, 2));
        assert_eq!(r, Span::new(1, 3, 2, 4));
    }

    #[test]
    fn inverted_children_cross_targets() {
        let q = Span::new(0, 3, 0, 4);
        let (l, r) = q.children(Orientation::Inverted, Split::new(1, 2));
        assert_eq!(l, Span::new(0, 1, 2, 4));
        assert_eq!(r, Span::new(1, 3, 0, 2));
    }

    #[test]
    fn corner_splits_are_degenerate() {
        let q = Span::new(0, 2, 0, 2);
        assert!(Split::new(0, 0).is_degenerate_for(&q));
        assert!(Split::new(2, 2).is_degenerate_for(&q));
        assert!(Split::new(0, 2).is_degenerate_for(&q));
        assert!(Split::new(2, 0).is_degenerate_for(&q));
        assert!(!Split::new(1, 1).is_degenerate_for(&q));
        assert!(!Split::new(0, 1).is_degenerate_for(&q));
    }
}
