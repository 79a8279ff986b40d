//! Lexical translation table loaded from a tab-separated file.
//!
//! Each non-blank line reads `source\ttarget\tscore`, where `score` is a
//! log-probability. Later lines overwrite earlier ones for the same pair.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;

use crate::error::{ItgError, Result};
use crate::traits::TranslationTable;

/// Source word → target word → log score.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, HashMap<String, f64>>,
    len: usize,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a pair, returning the previous score.
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        score: f64,
    ) -> Option<f64> {
        let previous = self
            .entries
            .entry(source.into())
            .or_default()
            .insert(target.into(), score);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Raw stored score, without any unknown-pair handling.
    pub fn get(&self, source: &str, target: &str) -> Option<f64> {
        self.entries.get(source)?.get(target).copied()
    }

    /// Number of distinct (source, target) pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Parse a lexicon from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lexicon = Lexicon::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| ItgError::io("<lexicon>", e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut fields = trimmed.split('\t');
            let (Some(source), Some(target), Some(score)) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(ItgError::MalformedLexiconEntry {
                    line: line_no,
                    reason: "expected three tab-separated fields".to_string(),
                });
            };
            let score: f64 =
                score
                    .trim()
                    .parse()
                    .map_err(|e| ItgError::MalformedLexiconEntry {
                        line: line_no,
                        reason: format!("bad score '{score}': {e}"),
                    })?;
            lexicon.insert(source, target, score);
        }
        Ok(lexicon)
    }

    /// Load a lexicon file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ItgError::io(path, e))?;
        let lexicon = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            ItgError::Io { source, .. } => ItgError::io(path, source),
            other => other,
        })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), pairs = lexicon.len(), "loaded lexicon");
        Ok(lexicon)
    }
}

impl TranslationTable for Lexicon {
    /// A stored score of exactly `0.0` is reported as unknown.
    #[inline]
    fn log_score(&self, source: &str, target: &str) -> Option<f64> {
        self.get(source, target).filter(|&score| score != 0.0)
    }
}

impl<S, T> FromIterator<(S, T, f64)> for Lexicon
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, T, f64)>>(iter: I) -> Self {
        let mut lexicon = Lexicon::new();
        for (source, target, score) in iter {
            lexicon.insert(source, target, score);
        }
        lexicon
    }
}
