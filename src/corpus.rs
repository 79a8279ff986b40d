//! Line-oriented sentence files.
//!
//! One sentence per line, tokens separated by whitespace. A blank line is an
//! empty sentence and is kept so that both sides of a parallel corpus stay
//! in step.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ItgError, Result};

/// A whitespace-tokenized sentence.
pub type Sentence = Vec<String>;

/// A source sentence and its translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentencePair {
    pub source: Sentence,
    pub target: Sentence,
}

impl SentencePair {
    pub fn new(source: Sentence, target: Sentence) -> Self {
        Self { source, target }
    }

    /// Build a pair from two whitespace-separated strings.
    pub fn from_text(source: &str, target: &str) -> Self {
        Self::new(tokenize(source), tokenize(target))
    }
}

#[inline]
pub fn tokenize(line: &str) -> Sentence {
    line.split_whitespace().map(str::to_string).collect()
}

pub fn read_sentences<R: BufRead>(reader: R) -> Result<Vec<Sentence>> {
    reader
        .lines()
        .map(|line| {
            line.map(|l| tokenize(&l))
                .map_err(|e| ItgError::io("<sentences>", e))
        })
        .collect()
}

pub fn load_sentences(path: impl AsRef<Path>) -> Result<Vec<Sentence>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ItgError::io(path, e))?;
    read_sentences(BufReader::new(file)).map_err(|e| match e {
        ItgError::Io { source, .. } => ItgError::io(path, source),
        other => other,
    })
}

/// Zip two sentence lists into pairs; both sides must have the same length.
pub fn zip_parallel(source: Vec<Sentence>, target: Vec<Sentence>) -> Result<Vec<SentencePair>> {
    if source.len() != target.len() {
        return Err(ItgError::ParallelCorpusMismatch {
            source_sentences: source.len(),
            target_sentences: target.len(),
        });
    }
    Ok(source
        .into_iter()
        .zip(target)
        .map(|(s, t)| SentencePair::new(s, t))
        .collect())
}

pub fn load_parallel(
    source_path: impl AsRef<Path>,
    target_path: impl AsRef<Path>,
) -> Result<Vec<SentencePair>> {
    let source = load_sentences(source_path)?;
    let target = load_sentences(target_path)?;
    zip_parallel(source, target)
}
