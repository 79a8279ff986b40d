//! Span initializer and bottom-up recurrence solver.
//!
//! Terminal spans (width ≤ 2) are seeded from the lexicon and the null
//! weights. All scores stay in log space, so a candidate is the sum of its
//! rule weight and the scores of its two halves. Every wider span is then filled in order of increasing source
//! length and, within that, increasing target length, which guarantees that
//! both halves of any non-degenerate split are final before they are read.

use crate::chart::{Chart, Decision};
use crate::config::RuleWeights;
use crate::span::{Orientation, Span, Split};
use crate::traits::TranslationTable;

/// Seed lexical and null terminal spans.
pub fn initialize<L, S, T>(
    chart: &mut Chart,
    source: &[S],
    target: &[T],
    lexicon: &L,
    weights: &RuleWeights,
) where
    L: TranslationTable + ?Sized,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let n_src = source.len();
    let n_tgt = target.len();
    debug_assert_eq!((n_src, n_tgt), (chart.source_len(), chart.target_len()));

    for (t, src_word) in source.iter().enumerate().map(|(i, w)| (i + 1, w.as_ref())) {
        for (v, tgt_word) in target.iter().enumerate().map(|(i, w)| (i + 1, w.as_ref())) {
            let score = lexicon
                .log_score(src_word, tgt_word)
                .unwrap_or(weights.unknown_pair);
            chart.set_delta(&Span::new(t - 1, t, v - 1, v), score);
        }
    }

    let source_null = weights.source_null;
    for t in 1..=n_src {
        for v in 0..=n_tgt {
            chart.set_delta(&Span::new(t - 1, t, v, v), source_null);
        }
    }

    let target_null = weights.target_null;
    for t in 0..=n_src {
        for v in 1..=n_tgt {
            chart.set_delta(&Span::new(t, t, v - 1, v), target_null);
        }
    }
}

/// Fill every span of width > 2 with its best split.
///
/// Spans with no finite candidate are left without a decision.
pub fn solve(chart: &mut Chart, weights: &RuleWeights, inverted_rules: bool) {
    let n_src = chart.source_len();
    let n_tgt = chart.target_len();
    let direct_weight = weights.direct;
    let inverted_weight = weights.inverted;

    for src_width in 0..=n_src {
        for tgt_width in 0..=n_tgt {
            if src_width + tgt_width <= 2 {
                continue;
            }
            for s in 0..=(n_src - src_width) {
                for u in 0..=(n_tgt - tgt_width) {
                    let q = Span::new(s, s + src_width, u, u + tgt_width);
                    if let Some(decision) =
                        best_decision(chart, &q, direct_weight, inverted_weight, inverted_rules)
                    {
                        chart.record(&q, decision);
                    }
                }
            }
        }
    }
}

/// Best direct and (optionally) inverted candidate for `q`; ties go to direct.
pub(crate) fn best_decision(
    chart: &Chart,
    q: &Span,
    direct_weight: f64,
    inverted_weight: f64,
    inverted_rules: bool,
) -> Option<Decision> {
    let direct = best_split(chart, q, Orientation::Direct, direct_weight);
    let inverted = if inverted_rules {
        best_split(chart, q, Orientation::Inverted, inverted_weight)
    } else {
        None
    };

    let (orientation, (score, split)) = match (direct, inverted) {
        (d, Some(i)) if i.0 > d.map_or(f64::NEG_INFINITY, |d| d.0) => (Orientation::Inverted, i),
        (Some(d), _) => (Orientation::Direct, d),
        (None, _) => return None,
    };
    Some(Decision {
        score,
        orientation,
        split,
    })
}

/// Strict maximum over all non-degenerate splits; the first split reaching
/// the maximum wins. Returns `None` when every candidate is `-inf`.
fn best_split(
    chart: &Chart,
    q: &Span,
    orientation: Orientation,
    weight: f64,
) -> Option<(f64, Split)> {
    let mut best: Option<(f64, Split)> = None;
    let mut best_score = f64::NEG_INFINITY;
    for cs in q.s..=q.t {
        for cu in q.u..=q.v {
            let split = Split::new(cs, cu);
            if split.is_degenerate_for(q) {
                continue;
            }
            let (left, right) = q.children(orientation, split);
            let score = weight + chart.delta(&left) + chart.delta(&right);
            if score > best_score {
                best_score = score;
                best = Some((score, split));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;

    fn lexicon() -> Lexicon {
        [("the", "die", -1.0), ("dog", "hund", -1.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn initializer_seeds_all_three_terminal_families() {
        let w = RuleWeights::default();
        let mut chart = Chart::new(2, 2);
        initialize(&mut chart, &["the", "dog"], &["die", "hund"], &lexicon(), &w);

        assert_eq!(chart.delta(&Span::new(0, 1, 0, 1)), -1.0);
        assert_eq!(chart.delta(&Span::new(0, 1, 1, 2)), w.unknown_pair);
        for v in 0..=2 {
            assert_eq!(chart.delta(&Span::new(1, 2, v, v)), w.source_null);
        }
        for t in 0..=2 {
            assert_eq!(chart.delta(&Span::new(t, t, 0, 1)), w.target_null);
        }
        // Two-word one-sided spans are not seeded.
        assert_eq!(chart.delta(&Span::new(0, 2, 1, 1)), f64::NEG_INFINITY);
        assert_eq!(chart.delta(&Span::new(1, 1, 0, 2)), f64::NEG_INFINITY);
    }

    #[test]
    fn root_of_parallel_pair_splits_directly_in_the_middle() {
        let w = RuleWeights::default();
        let mut chart = Chart::new(2, 2);
        initialize(&mut chart, &["the", "dog"], &["die", "hund"], &lexicon(), &w);
        solve(&mut chart, &w, true);

        let root = chart.decision(&chart.root()).unwrap();
        assert_eq!(root.orientation, Orientation::Direct);
        assert_eq!(root.split, Split::new(1, 1));
        assert_eq!(root.score, w.direct - 1.0 - 1.0);
    }

    #[test]
    fn swapped_pair_prefers_inversion() {
        let w = RuleWeights::default();
        let mut chart = Chart::new(2, 2);
        initialize(&mut chart, &["the", "dog"], &["hund", "die"], &lexicon(), &w);
        solve(&mut chart, &w, true);
        let root = chart.decision(&chart.root()).unwrap();
        assert_eq!(root.orientation, Orientation::Inverted);
        assert_eq!(root.split, Split::new(1, 1));

        let mut chart = Chart::new(2, 2);
        initialize(&mut chart, &["the", "dog"], &["hund", "die"], &lexicon(), &w);
        solve(&mut chart, &w, false);
        let root = chart.decision(&chart.root()).unwrap();
        assert_eq!(root.orientation, Orientation::Direct);
    }

    #[test]
    fn terminals_never_get_a_decision() {
        let w = RuleWeights::default();
        let mut chart = Chart::new(2, 3);
        initialize(&mut chart, &["a", "b"], &["x", "y", "z"], &Lexicon::new(), &w);
        solve(&mut chart, &w, true);
        for s in 0..=2 {
            for t in s..=2 {
                for u in 0..=3 {
                    for v in u..=3 {
                        let q = Span::new(s, t, u, v);
                        if q.is_terminal() {
                            assert!(chart.decision(&q).is_none(), "terminal {q} has a split");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn spans_with_both_sides_present_are_always_reachable() {
        let w = RuleWeights::default();
        let mut chart = Chart::new(3, 3);
        initialize(&mut chart, &["a", "b", "c"], &["x", "y", "z"], &Lexicon::new(), &w);
        solve(&mut chart, &w, true);
        for s in 0..3 {
            for t in (s + 1)..=3 {
                for u in 0..3 {
                    for v in (u + 1)..=3 {
                        let q = Span::new(s, t, u, v);
                        assert!(chart.delta(&q).is_finite(), "{q} unreachable");
                    }
                }
            }
        }
    }

    #[test]
    fn long_unknown_pairs_keep_a_finite_root() {
        let w = RuleWeights::default();
        let n = 30;
        let src: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
        let tgt: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
        let mut chart = Chart::new(n, n);
        initialize(&mut chart, &src, &tgt, &Lexicon::new(), &w);
        solve(&mut chart, &w, true);
        let root = chart.decision(&chart.root()).expect("root is solved");
        assert!(root.score.is_finite());
        // 30 unknown pairs joined by 29 direct rules.
        let expected = 30.0 * w.unknown_pair + 29.0 * w.direct;
        assert!((root.score - expected).abs() < 1e-9);
        assert_eq!(root.orientation, Orientation::Direct);
    }
}
