//! Derivation trees and the backtracer that rebuilds them from a solved
//! [`Chart`].

use crate::chart::Chart;
use crate::config::ExpansionPolicy;
use crate::span::{Orientation, Span};
use crate::stats::CorpusStats;

/// A node of the optimal ITG derivation.
#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    /// A span emitted as one alignment link.
    Leaf(Span),
    /// A binary rule application.
    Internal {
        span: Span,
        orientation: Orientation,
        left: Box<Derivation>,
        right: Box<Derivation>,
    },
    /// A subtree abandoned because it exceeded the depth guard or its span
    /// has no finite-score derivation.
    Truncated(Span),
}

impl Derivation {
    pub fn span(&self) -> Span {
        match self {
            Derivation::Leaf(span) | Derivation::Truncated(span) => *span,
            Derivation::Internal { span, .. } => *span,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Derivation::Leaf(_) => 1,
            Derivation::Truncated(_) => 0,
            Derivation::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        match self {
            Derivation::Leaf(_) => false,
            Derivation::Truncated(_) => true,
            Derivation::Internal { left, right, .. } => left.is_truncated() || right.is_truncated(),
        }
    }

    /// Longest root-to-node path, counting the root as depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Derivation::Leaf(_) | Derivation::Truncated(_) => 0,
            Derivation::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Orientations of all internal nodes, pre-order.
    pub fn orientations(&self) -> Vec<Orientation> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Derivation::Internal {
                orientation,
                left,
                right,
                ..
            } = node
            {
                out.push(*orientation);
                stack.push(right.as_ref());
                stack.push(left.as_ref());
            }
        }
        out
    }
}

/// Rebuilds the derivation rooted at the chart's root span, counting every
/// rule application into `stats`.
pub struct Backtracer<'a> {
    chart: &'a Chart,
    expansion: ExpansionPolicy,
    max_depth: usize,
}

impl<'a> Backtracer<'a> {
    pub fn new(chart: &'a Chart, expansion: ExpansionPolicy, max_depth: usize) -> Self {
        Self {
            chart,
            expansion,
            max_depth,
        }
    }

    pub fn run(&self, stats: &mut CorpusStats) -> Derivation {
        self.expand(self.chart.root(), 0, stats)
    }

    fn expand(&self, q: Span, depth: usize, stats: &mut CorpusStats) -> Derivation {
        if depth > self.max_depth {
            #[cfg(feature = "tracing")]
            tracing::warn!(span = %q, depth, "derivation exceeds depth guard, dropping subtree");
            return Derivation::Truncated(q);
        }
        if q.is_terminal() {
            return Derivation::Leaf(q);
        }
        let Some(decision) = self.chart.decision(&q) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(span = %q, "span has no finite-score derivation");
            return Derivation::Truncated(q);
        };
        if decision.orientation == Orientation::Direct
            && q.width() < self.expansion.min_direct_width()
        {
            return Derivation::Leaf(q);
        }

        stats.record_rule(decision.orientation);
        let (left, right) = q.children(decision.orientation, decision.split);
        Derivation::Internal {
            span: q,
            orientation: decision.orientation,
            left: Box::new(self.expand(left, depth + 1, stats)),
            right: Box::new(self.expand(right, depth + 1, stats)),
        }
    }
}
