//! The ITG biparser.
//!
//! [`ItgParser`] runs four phases per sentence pair:
//! 1. seed terminal spans ([`recurrence::initialize`]),
//! 2. fill the chart bottom-up ([`recurrence::solve`]),
//! 3. rebuild the best derivation ([`Backtracer`]),
//! 4. flatten it into links ([`extract_links`]).
//!
//! Rule and link counters accumulate on the parser across calls.

use crate::alignment::{extract_links, null_links, Link};
use crate::chart::Chart;
use crate::config::ParserConfig;
use crate::corpus::SentencePair;
use crate::derivation::{Backtracer, Derivation};
use crate::error::Result;
use crate::grammar::Grammar;
use crate::lexicon::Lexicon;
use crate::recurrence;
use crate::stats::CorpusStats;
use crate::traits::TranslationTable;

/// Everything one sentence pair produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// Links in breadth-first derivation order.
    pub links: Vec<Link>,
    /// `None` when either sentence is empty; no chart is built then.
    pub derivation: Option<Derivation>,
    /// Root log score. For a pair with an empty side this is the sum of the
    /// null weights of the other side's words.
    pub log_score: f64,
    /// `log_score` in probability space. Underflows to 0 for long pairs; the
    /// alignment itself is unaffected.
    pub score: f64,
    /// Whether part of the derivation was dropped.
    pub truncated: bool,
    /// Counters contributed by this pair alone.
    pub stats: CorpusStats,
}

/// ITG biparser with corpus-level statistics.
///
/// ```
/// use itg_align::{ItgParser, Lexicon};
///
/// let lexicon: Lexicon = [("the", "die", -1.0), ("dog", "hund", -1.0)]
///     .into_iter()
///     .collect();
/// let mut parser = ItgParser::new(lexicon);
/// let links = parser.parse(&["the", "dog"], &["die", "hund"]);
/// assert_eq!(links, vec![(1, 1), (2, 2)]);
/// assert_eq!(parser.fraction_direct_rules().unwrap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct ItgParser<L = Lexicon> {
    lexicon: L,
    grammar: Option<Grammar>,
    config: ParserConfig,
    stats: CorpusStats,
}

impl<L: TranslationTable> ItgParser<L> {
    /// Parser with the default configuration and no grammar.
    pub fn new(lexicon: L) -> Self {
        Self::with_grammar(lexicon, None)
    }

    /// Parser with the default configuration. The grammar is retained but
    /// not used for scoring.
    pub fn with_grammar(lexicon: L, grammar: Option<Grammar>) -> Self {
        Self {
            lexicon,
            grammar,
            config: ParserConfig::default(),
            stats: CorpusStats::new(),
        }
    }

    /// Parser with an explicit configuration; fails if it does not validate.
    pub fn with_config(lexicon: L, grammar: Option<Grammar>, config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            lexicon,
            grammar,
            config,
            stats: CorpusStats::new(),
        })
    }

    /// Whether later parses consider inverted splits.
    pub fn enable_inverted_rules(&mut self, enabled: bool) {
        self.config.inverted_rules = enabled;
    }

    pub fn inverted_rules_enabled(&self) -> bool {
        self.config.inverted_rules
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &L {
        &self.lexicon
    }

    pub fn grammar(&self) -> Option<&Grammar> {
        self.grammar.as_ref()
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    pub fn reset_statistics(&mut self) {
        self.stats = CorpusStats::new();
    }

    /// Align one sentence pair and fold its counts into the running totals.
    pub fn parse<S, T>(&mut self, source: &[S], target: &[T]) -> Vec<Link>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        self.parse_detailed(source, target).links
    }

    /// Like [`parse`](Self::parse) but also returns the derivation and score.
    pub fn parse_detailed<S, T>(&mut self, source: &[S], target: &[T]) -> ParseOutcome
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let outcome = self.biparse(source, target);
        self.stats.merge(&outcome.stats);
        outcome
    }

    /// Align one pair without touching the running counters.
    ///
    /// This is the unit of work for corpus alignment: outcomes can be
    /// computed independently and their `stats` reduced afterwards.
    pub fn biparse<S, T>(&self, source: &[S], target: &[T]) -> ParseOutcome
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "itg_parse",
            source_len = source.len(),
            target_len = target.len()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let weights = &self.config.weights;
        let mut stats = CorpusStats::new();

        if source.is_empty() || target.is_empty() {
            let links = null_links(source.len(), target.len(), &mut stats);
            let log_score = weights.source_null * source.len() as f64
                + weights.target_null * target.len() as f64;
            return ParseOutcome {
                links,
                derivation: None,
                log_score,
                score: log_score.exp(),
                truncated: false,
                stats,
            };
        }

        let mut chart = Chart::new(source.len(), target.len());
        {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("initialize", cells = chart.cells());
            #[cfg(feature = "tracing")]
            let _enter = span.enter();
            recurrence::initialize(&mut chart, source, target, &self.lexicon, weights);
        }
        {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("solve", inverted = self.config.inverted_rules);
            #[cfg(feature = "tracing")]
            let _enter = span.enter();
            recurrence::solve(&mut chart, weights, self.config.inverted_rules);
        }

        let derivation = {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("backtrace");
            #[cfg(feature = "tracing")]
            let _enter = span.enter();
            Backtracer::new(&chart, self.config.expansion, self.config.max_depth).run(&mut stats)
        };
        let links = extract_links(&derivation, &mut stats);
        let truncated = derivation.is_truncated();

        #[cfg(feature = "tracing")]
        if truncated {
            tracing::warn!(
                links = links.len(),
                expected_at_least = source.len().max(target.len()),
                "derivation was truncated, alignment is incomplete"
            );
        }

        let log_score = chart.delta(&chart.root());
        ParseOutcome {
            links,
            log_score,
            score: log_score.exp(),
            derivation: Some(derivation),
            truncated,
            stats,
        }
    }

    /// Fraction of links in which a source word is aligned to nothing.
    pub fn fraction_source_null(&self) -> Result<f64> {
        self.stats.fraction_source_null()
    }

    /// Fraction of links in which a target word is aligned to nothing.
    pub fn fraction_target_null(&self) -> Result<f64> {
        self.stats.fraction_target_null()
    }

    pub fn fraction_direct_rules(&self) -> Result<f64> {
        self.stats.fraction_direct_rules()
    }

    pub fn fraction_inverted_rules(&self) -> Result<f64> {
        self.stats.fraction_inverted_rules()
    }

    fn absorb(&mut self, outcomes: Vec<ParseOutcome>) -> Vec<Vec<Link>> {
        outcomes
            .into_iter()
            .map(|outcome| {
                self.stats.merge(&outcome.stats);
                outcome.links
            })
            .collect()
    }
}

#[cfg(feature = "parallel")]
impl<L: TranslationTable + Sync> ItgParser<L> {
    /// Align every pair, in parallel across pairs, then fold all counts into
    /// the running totals in corpus order.
    pub fn align_corpus(&mut self, pairs: &[SentencePair]) -> Vec<Vec<Link>> {
        use rayon::prelude::*;

        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("align_corpus", pairs = pairs.len(), parallel = true);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let outcomes: Vec<ParseOutcome> = pairs
            .par_iter()
            .map(|pair| self.biparse(&pair.source, &pair.target))
            .collect();
        self.absorb(outcomes)
    }
}

#[cfg(not(feature = "parallel"))]
impl<L: TranslationTable> ItgParser<L> {
    /// Align every pair in order, folding counts into the running totals.
    pub fn align_corpus(&mut self, pairs: &[SentencePair]) -> Vec<Vec<Link>> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("align_corpus", pairs = pairs.len(), parallel = false);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let outcomes: Vec<ParseOutcome> = pairs
            .iter()
            .map(|pair| self.biparse(&pair.source, &pair.target))
            .collect();
        self.absorb(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpansionPolicy;
    use crate::span::{Orientation, Span};

    fn dog_lexicon() -> Lexicon {
        [("the", "die", -1.0), ("dog", "hund", -1.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn single_pair_is_one_link_whatever_the_lexicon() {
        for lexicon in [Lexicon::new(), dog_lexicon()] {
            let mut p = ItgParser::new(lexicon);
            assert_eq!(p.parse(&["the"], &["hund"]), vec![(1, 1)]);
            assert_eq!(p.parse(&["the"], &["die"]), vec![(1, 1)]);
            assert_eq!(p.stats().rules, 0);
            assert_eq!(p.stats().links, 2);
        }
    }

    #[test]
    fn detailed_parse_exposes_tree_and_score() {
        let mut p = ItgParser::new(dog_lexicon());
        let out = p.parse_detailed(&["the", "dog"], &["die", "hund"]);
        let tree = out.derivation.expect("non-empty pair has a derivation");
        match &tree {
            Derivation::Internal {
                span,
                orientation,
                left,
                right,
            } => {
                assert_eq!(*span, Span::new(0, 2, 0, 2));
                assert_eq!(*orientation, Orientation::Direct);
                assert_eq!(left.span(), Span::new(0, 1, 0, 1));
                assert_eq!(right.span(), Span::new(1, 2, 1, 2));
            }
            other => panic!("unexpected derivation {other:?}"),
        }
        assert!(!out.truncated);
        assert_eq!(out.log_score, -3.0);
        assert!((out.score - (-3.0f64).exp()).abs() < 1e-15);
        assert_eq!(out.stats, *p.stats());
    }

    #[test]
    fn biparse_leaves_counters_alone() {
        let p = ItgParser::new(dog_lexicon());
        let out = p.biparse(&["the", "dog"], &["die", "hund"]);
        assert_eq!(out.stats.rules, 1);
        assert_eq!(p.stats(), &CorpusStats::new());
    }

    #[test]
    fn empty_side_yields_null_links_only() {
        let mut p = ItgParser::new(dog_lexicon());
        assert_eq!(p.parse::<&str, &str>(&[], &["die", "hund"]), vec![(0, 1), (0, 2)]);
        assert_eq!(p.parse::<&str, &str>(&["the", "dog", "barks"], &[]), vec![(1, 0), (2, 0), (3, 0)]);
        assert!(p.parse::<&str, &str>(&[], &[]).is_empty());
        assert_eq!(p.fraction_target_null().unwrap(), 0.4);
        assert_eq!(p.fraction_source_null().unwrap(), 0.6);
        assert!(p.fraction_direct_rules().is_err());
    }

    #[test]
    fn toggling_inversion_changes_later_parses() {
        let mut p = ItgParser::new(dog_lexicon());
        assert!(p.inverted_rules_enabled());
        p.parse(&["the", "dog"], &["hund", "die"]);
        assert_eq!(p.stats().inverted_rules, 1);

        p.enable_inverted_rules(false);
        assert!(!p.inverted_rules_enabled());
        p.reset_statistics();
        p.parse(&["the", "dog"], &["hund", "die"]);
        assert_eq!(p.stats().inverted_rules, 0);
        assert_eq!(p.fraction_inverted_rules().unwrap(), 0.0);
    }

    #[test]
    fn grammar_is_kept_but_not_consulted() {
        let mut g = Grammar::new();
        g.add_rule(
            "A",
            crate::grammar::GrammarRule {
                weight: -100.0,
                inverted: false,
                children: vec!["A".into(), "A".into()],
            },
        );
        let mut with = ItgParser::with_grammar(dog_lexicon(), Some(g));
        let mut without = ItgParser::new(dog_lexicon());
        assert_eq!(with.grammar().map(Grammar::len), Some(1));
        assert!(without.grammar().is_none());
        let a = with.parse_detailed(&["the", "dog"], &["hund", "die"]);
        let b = without.parse_detailed(&["the", "dog"], &["hund", "die"]);
        assert_eq!(a, b);
    }

    #[test]
    fn corpus_alignment_matches_sequential_parses() {
        let pairs = vec![
            SentencePair::from_text("the dog", "die hund"),
            SentencePair::from_text("the dog", "hund die"),
            SentencePair::from_text("", "die"),
            SentencePair::from_text("dog", "hund"),
        ];
        let mut batch = ItgParser::new(dog_lexicon());
        let links = batch.align_corpus(&pairs);

        let mut seq = ItgParser::new(dog_lexicon());
        let expected: Vec<Vec<Link>> = pairs
            .iter()
            .map(|p| seq.parse(&p.source, &p.target))
            .collect();
        assert_eq!(links, expected);
        assert_eq!(batch.stats(), seq.stats());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = ParserConfig {
            max_depth: 0,
            ..ParserConfig::default()
        };
        assert!(ItgParser::with_config(Lexicon::new(), None, cfg).is_err());
        let cfg = ParserConfig {
            expansion: ExpansionPolicy::Symmetric,
            ..ParserConfig::default()
        };
        let p = ItgParser::with_config(Lexicon::new(), None, cfg).unwrap();
        assert_eq!(p.config().expansion, ExpansionPolicy::Symmetric);
    }
}
