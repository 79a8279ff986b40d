//! Compare the packed-chart parser against a memoised, HashMap-keyed
//! transcription of the recurrence.

use std::collections::{HashMap, VecDeque};

use itg_align::{CorpusStats, ItgParser, Lexicon, RuleWeights};
use rand::{rngs::StdRng, Rng, SeedableRng};

type Key = (usize, usize, usize, usize);

struct Reference<'a> {
    src: &'a [String],
    tgt: &'a [String],
    lex: &'a HashMap<(String, String), f64>,
    inverted: bool,
    w: RuleWeights,
    memo: HashMap<Key, (f64, Option<(bool, usize, usize)>)>,
}

impl<'a> Reference<'a> {
    fn terminal(&self, (s, t, u, v): Key) -> f64 {
        match (t - s, v - u) {
            (1, 1) => {
                let key = (self.src[s].clone(), self.tgt[u].clone());
                let score = match self.lex.get(&key) {
                    Some(&x) if x != 0.0 => x,
                    _ => self.w.unknown_pair,
                };
                score
            }
            (1, 0) => self.w.source_null,
            (0, 1) => self.w.target_null,
            _ => f64::NEG_INFINITY,
        }
    }

    fn delta(&mut self, q: Key) -> f64 {
        self.entry(q).0
    }

    fn entry(&mut self, q: Key) -> (f64, Option<(bool, usize, usize)>) {
        let (s, t, u, v) = q;
        if (t - s) + (v - u) <= 2 {
            return (self.terminal(q), None);
        }
        if let Some(&e) = self.memo.get(&q) {
            return e;
        }
        let mut best_dir = (f64::NEG_INFINITY, None);
        let mut best_inv = (f64::NEG_INFINITY, None);
        for cs in s..=t {
            for cu in u..=v {
                if (cs - s) * (t - cs) + (cu - u) * (v - cu) == 0 {
                    continue;
                }
                let d = self.w.direct + self.delta((s, cs, u, cu)) + self.delta((cs, t, cu, v));
                if d > best_dir.0 {
                    best_dir = (d, Some((false, cs, cu)));
                }
                if self.inverted {
                    let d = self.w.inverted
                        + self.delta((s, cs, cu, v))
                        + self.delta((cs, t, u, cu));
                    if d > best_inv.0 {
                        best_inv = (d, Some((true, cs, cu)));
                    }
                }
            }
        }
        let e = if best_dir.0 >= best_inv.0 { best_dir } else { best_inv };
        self.memo.insert(q, e);
        e
    }

    /// Reference backtrace (direct expands above width 3) + breadth-first links.
    fn align(&mut self, stats: &mut CorpusStats) -> Vec<(usize, usize)> {
        let root = (0, self.src.len(), 0, self.tgt.len());
        let mut out = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(q) = queue.pop_front() {
            let (s, t, u, v) = q;
            let width = (t - s) + (v - u);
            let split = if width <= 2 { None } else { self.entry(q).1 };
            match split {
                Some((true, cs, cu)) => {
                    stats.rules += 1;
                    stats.inverted_rules += 1;
                    queue.push_back((s, cs, cu, v));
                    queue.push_back((cs, t, u, cu));
                }
                Some((false, cs, cu)) if width > 3 => {
                    stats.rules += 1;
                    stats.direct_rules += 1;
                    queue.push_back((s, cs, u, cu));
                    queue.push_back((cs, t, cu, v));
                }
                _ => {
                    let link = if s == t {
                        (0, v)
                    } else if u == v {
                        (t, 0)
                    } else {
                        (t, v)
                    };
                    stats.record_link(link);
                    out.push(link);
                }
            }
        }
        out
    }
}

fn random_sentence(rng: &mut StdRng, vocab: &[&str], max_len: usize) -> Vec<String> {
    let len = rng.gen_range(1..=max_len);
    (0..len)
        .map(|_| vocab[rng.gen_range(0..vocab.len())].to_string())
        .collect()
}

const SRC_VOCAB: &[&str] = &["a", "b", "c", "d", "e"];
const TGT_VOCAB: &[&str] = &["v", "w", "x", "y", "z"];

fn random_lexicon(rng: &mut StdRng) -> HashMap<(String, String), f64> {
    let mut lex = HashMap::new();
    for s in SRC_VOCAB {
        for t in TGT_VOCAB {
            if rng.gen_bool(0.4) {
                lex.insert((s.to_string(), t.to_string()), rng.gen_range(-12.0..-0.25));
            }
        }
    }
    lex
}

fn check_against_reference(seed: u64, inverted: bool) {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..60 {
        let lex = random_lexicon(&mut rng);
        let src = random_sentence(&mut rng, SRC_VOCAB, 4);
        let tgt = random_sentence(&mut rng, TGT_VOCAB, 4);

        let lexicon: Lexicon = lex
            .iter()
            .map(|((s, t), &score)| (s.clone(), t.clone(), score))
            .collect();
        let mut parser = ItgParser::new(lexicon);
        parser.enable_inverted_rules(inverted);
        let out = parser.parse_detailed(&src, &tgt);

        let mut reference = Reference {
            src: &src,
            tgt: &tgt,
            lex: &lex,
            inverted,
            w: RuleWeights::default(),
            memo: HashMap::new(),
        };
        let expected_score = reference.delta((0, src.len(), 0, tgt.len()));
        let mut expected_stats = CorpusStats::new();
        let expected_links = reference.align(&mut expected_stats);

        assert_eq!(out.log_score, expected_score, "score mismatch for {src:?} / {tgt:?}");
        assert_eq!(out.links, expected_links, "links mismatch for {src:?} / {tgt:?}");
        assert_eq!(out.stats, expected_stats, "counter mismatch for {src:?} / {tgt:?}");
        assert!(!out.truncated);
    }
}

#[test]
fn matches_reference_with_inversion() {
    check_against_reference(7, true);
}

#[test]
fn matches_reference_direct_only() {
    check_against_reference(11, false);
}
