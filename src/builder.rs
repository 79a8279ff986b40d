use crate::config::{ExpansionPolicy, ParserConfig, RuleWeights};
use crate::error::Result;
use crate::grammar::Grammar;
use crate::traits::TranslationTable;
use crate::ItgParser;

pub struct ItgParserBuilder<L: TranslationTable> {
    lexicon: L,
    grammar: Option<Grammar>,
    config: ParserConfig,
}

impl<L: TranslationTable> ItgParserBuilder<L> {
    pub fn new(lexicon: L) -> Self {
        Self {
            lexicon,
            grammar: None,
            config: ParserConfig::default(),
        }
    }
    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = Some(grammar);
        self
    }
    pub fn with_weights(mut self, weights: RuleWeights) -> Self {
        self.config.weights = weights;
        self
    }
    pub fn with_inverted_rules(mut self, enabled: bool) -> Self {
        self.config.inverted_rules = enabled;
        self
    }
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }
    pub fn with_expansion(mut self, expansion: ExpansionPolicy) -> Self {
        self.config.expansion = expansion;
        self
    }
    pub fn build(self) -> Result<ItgParser<L>> {
        ItgParser::with_config(self.lexicon, self.grammar, self.config)
    }
}
