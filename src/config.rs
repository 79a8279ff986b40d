//! Parser configuration: the five log-space grammar constants, the
//! inverted-rule switch, the backtrace depth guard and the expansion policy.

use crate::error::{ItgError, Result};

/// Log-space scores of the unweighted bracketing grammar.
///
/// These do not depend on word identity or span size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleWeights {
    /// Straight rule `[A B]`.
    pub direct: f64,
    /// Inverted rule `<A B>`.
    pub inverted: f64,
    /// A source word aligned to nothing on the target side.
    pub source_null: f64,
    /// A target word aligned to nothing on the source side.
    pub target_null: f64,
    /// Lexical pair missing from the translation table.
    pub unknown_pair: f64,
}

impl RuleWeights {
    pub const DIRECT: f64 = -1.0;
    pub const INVERTED: f64 = -2.0;
    pub const SOURCE_NULL: f64 = -20.0;
    pub const TARGET_NULL: f64 = -21.0;
    pub const UNKNOWN_PAIR: f64 = -30.0;
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            direct: Self::DIRECT,
            inverted: Self::INVERTED,
            source_null: Self::SOURCE_NULL,
            target_null: Self::TARGET_NULL,
            unknown_pair: Self::UNKNOWN_PAIR,
        }
    }
}

/// When the backtracer turns a span with a stored split into an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionPolicy {
    /// Inverted spans expand above width 2, direct spans only above width 3.
    /// A direct span of width exactly 3 becomes a single leaf.
    #[default]
    Asymmetric,
    /// Both orientations expand above width 2.
    Symmetric,
}

impl ExpansionPolicy {
    /// Smallest width at which a direct span is expanded.
    #[inline]
    pub fn min_direct_width(self) -> usize {
        match self {
            ExpansionPolicy::Asymmetric => 4,
            ExpansionPolicy::Symmetric => 3,
        }
    }
}

/// Default recursion bound for the backtracer.
pub const DEFAULT_MAX_DEPTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserConfig {
    pub weights: RuleWeights,
    /// Whether the solver considers inverted splits.
    pub inverted_rules: bool,
    /// Nodes deeper than this are replaced by a truncation marker.
    pub max_depth: usize,
    pub expansion: ExpansionPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            weights: RuleWeights::default(),
            inverted_rules: true,
            max_depth: DEFAULT_MAX_DEPTH,
            expansion: ExpansionPolicy::default(),
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ItgError::InvalidConfig(
                "max_depth must be positive".to_string(),
            ));
        }
        let w = &self.weights;
        for (name, value) in [
            ("direct", w.direct),
            ("inverted", w.inverted),
            ("source_null", w.source_null),
            ("target_null", w.target_null),
            ("unknown_pair", w.unknown_pair),
        ] {
            if !value.is_finite() {
                return Err(ItgError::InvalidConfig(format!(
                    "rule weight '{name}' must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_grammar_constants() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.weights.direct, -1.0);
        assert_eq!(cfg.weights.inverted, -2.0);
        assert_eq!(cfg.weights.source_null, -20.0);
        assert_eq!(cfg.weights.target_null, -21.0);
        assert_eq!(cfg.weights.unknown_pair, -30.0);
        assert!(cfg.inverted_rules);
        assert_eq!(cfg.max_depth, 50);
        assert_eq!(cfg.expansion, ExpansionPolicy::Asymmetric);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_depth_and_non_finite_weights() {
        let mut cfg = ParserConfig {
            max_depth: 0,
            ..ParserConfig::default()
        };
        assert!(cfg.validate().is_err());
        cfg.max_depth = 10;
        cfg.weights.unknown_pair = f64::NEG_INFINITY;
        assert!(cfg.validate().is_err());
    }
}
