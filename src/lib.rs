//! Inversion Transduction Grammar (ITG) word alignment.
//!
//! This crate biparses a source sentence and a target sentence together under
//! a bracketing ITG: every binary split of a span pair either keeps the order
//! of both halves ("direct") or swaps the target halves ("inverted"). The
//! best derivation under a lexical translation table is flattened into a
//! list of word alignment links, the kind of training alignment statistical
//! machine translation pipelines consume.
//!
//! ## Core idea
//! 1. Seed every terminal span pair (one word each, or one word against
//!    nothing) with its lexical or null score.
//! 2. Fill a span-indexed chart bottom-up, keeping the best direct or
//!    inverted split of every wider span pair.
//! 3. Backtrace from the root span into a [`Derivation`] tree.
//! 4. Walk the tree breadth-first to emit `(source, target)` links, 1-based,
//!    with 0 meaning "aligned to nothing".
//!
//! The chart costs O(T²V²) space and the recurrence O(T³V³) time for
//! sentences of lengths T and V.
//!
//! ## Quick start
//! ```
//! use itg_align::{ItgParser, Lexicon};
//!
//! let lexicon: Lexicon = [("the", "die", -1.0), ("dog", "hund", -1.0)]
//!     .into_iter()
//!     .collect();
//! let mut parser = ItgParser::new(lexicon);
//! assert_eq!(parser.parse(&["the", "dog"], &["die", "hund"]), vec![(1, 1), (2, 2)]);
//! assert_eq!(parser.fraction_inverted_rules().unwrap(), 0.0);
//! ```
//!
//! ## Statistics
//! The parser counts rule applications and null links over every sentence it
//! has seen. The `fraction_*` accessors return
//! [`ItgError::ZeroTotal`] rather than a silent 0 or NaN while a denominator
//! is still empty.
//!
//! ## Features
//! - `tracing` (default): spans around each phase, warnings on truncated
//!   derivations.
//! - `parallel`: [`ItgParser::align_corpus`] biparses pairs on the rayon pool.

pub mod alignment;
pub mod builder;
pub mod chart;
pub mod config;
pub mod corpus;
pub mod derivation;
pub mod error;
pub mod grammar;
pub mod lexicon;
pub mod parser;
pub mod recurrence;
pub mod span;
pub mod stats;
pub mod traits;

pub use crate::alignment::Link;
pub use crate::builder::ItgParserBuilder;
pub use crate::config::{ExpansionPolicy, ParserConfig, RuleWeights};
pub use crate::corpus::{Sentence, SentencePair};
pub use crate::derivation::Derivation;
pub use crate::error::{ItgError, Result};
pub use crate::grammar::{Grammar, GrammarRule};
pub use crate::lexicon::Lexicon;
pub use crate::parser::{ItgParser, ParseOutcome};
pub use crate::span::{Orientation, Span, Split};
pub use crate::stats::CorpusStats;
pub use crate::traits::TranslationTable;
