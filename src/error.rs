//! Error type shared by the loaders, the parser configuration and the
//! corpus statistics.

use std::path::PathBuf;

/// Result alias defaulting to [`ItgError`].
pub type Result<T, E = ItgError> = std::result::Result<T, E>;

/// Every failure the crate can report.
#[derive(Debug, thiserror::Error)]
pub enum ItgError {
    /// Reading an input file failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A lexicon line did not have the `source\ttarget\tscore` shape.
    #[error("malformed lexicon entry on line {line}: {reason}")]
    MalformedLexiconEntry { line: usize, reason: String },

    /// A grammar line did not have the `weight\tparent\tinverted\tchildren...` shape.
    #[error("malformed grammar rule on line {line}: {reason}")]
    MalformedGrammarRule { line: usize, reason: String },

    /// The two sides of a parallel corpus hold different sentence counts.
    #[error("parallel corpus mismatch: {source_sentences} source sentences vs {target_sentences} target sentences")]
    ParallelCorpusMismatch {
        source_sentences: usize,
        target_sentences: usize,
    },

    /// A corpus statistic was requested while its denominator is still zero.
    #[error("cannot compute {statistic}: no {denominator} have been counted yet")]
    ZeroTotal {
        statistic: &'static str,
        denominator: &'static str,
    },

    /// The parser builder was handed an unusable value.
    #[error("invalid parser configuration: {0}")]
    InvalidConfig(String),
}

impl ItgError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ItgError::Io {
            path: path.into(),
            source,
        }
    }
}
