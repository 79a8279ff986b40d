//! Seam between the biparser and the lexical translation model.
//!
//! The parser only ever asks one question of its lexicon: "what is the
//! log-probability score of translating this source word as that target
//! word?". Implement [`TranslationTable`] to plug a different store (an
//! interned vocabulary, a memory-mapped table, ...) into
//! [`ItgParser`](crate::ItgParser).

/// Lookup of log-space lexical translation scores.
pub trait TranslationTable {
    /// Log-probability score for the pair, or `None` when the pair is
    /// unknown. Unknown pairs are scored with
    /// [`RuleWeights::unknown_pair`](crate::config::RuleWeights::unknown_pair)
    /// by the span initializer.
    fn log_score(&self, source: &str, target: &str) -> Option<f64>;
}

impl<T: TranslationTable + ?Sized> TranslationTable for &T {
    #[inline]
    fn log_score(&self, source: &str, target: &str) -> Option<f64> {
        (**self).log_score(source, target)
    }
}

impl<T: TranslationTable + ?Sized> TranslationTable for std::sync::Arc<T> {
    #[inline]
    fn log_score(&self, source: &str, target: &str) -> Option<f64> {
        (**self).log_score(source, target)
    }
}
