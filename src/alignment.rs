//! Flattening a derivation into word alignment links.

use std::collections::VecDeque;

use crate::derivation::Derivation;
use crate::span::Span;
use crate::stats::CorpusStats;

/// `(source_index, target_index)`, 1-based; 0 means "aligned to nothing".
pub type Link = (usize, usize);

/// The link a leaf span stands for.
#[inline]
pub fn leaf_link(q: &Span) -> Link {
    if q.s == q.t {
        (0, q.v)
    } else if q.u == q.v {
        (q.t, 0)
    } else {
        (q.t, q.v)
    }
}

/// Breadth-first walk over the derivation, left child before right, emitting
/// one link per leaf and counting each into `stats`. Truncated subtrees
/// contribute nothing.
pub fn extract_links(root: &Derivation, stats: &mut CorpusStats) -> Vec<Link> {
    let mut links = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        match node {
            Derivation::Leaf(q) => {
                let link = leaf_link(q);
                stats.record_link(link);
                links.push(link);
            }
            Derivation::Internal { left, right, .. } => {
                queue.push_back(left.as_ref());
                queue.push_back(right.as_ref());
            }
            Derivation::Truncated(_) => {}
        }
    }
    links
}

/// Links for a pair where one side is empty: every word of the other side is
/// aligned to nothing.
pub fn null_links(source_len: usize, target_len: usize, stats: &mut CorpusStats) -> Vec<Link> {
    let links: Vec<Link> = if source_len == 0 {
        (1..=target_len).map(|v| (0, v)).collect()
    } else {
        debug_assert_eq!(target_len, 0);
        (1..=source_len).map(|t| (t, 0)).collect()
    };
    for &link in &links {
        stats.record_link(link);
    }
    links
}
