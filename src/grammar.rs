//! Weighted per-rule grammar.
//!
//! A grammar maps a parent symbol to its ordered list of rules. The parser
//! accepts one as configuration and hands it back through
//! [`ItgParser::grammar`](crate::ItgParser::grammar), but the recurrence
//! scores every split with the fixed [`RuleWeights`](crate::config::RuleWeights)
//! and does not read it.
//!
//! File format, one rule per line, `#` starts a comment line:
//!
//! ```text
//! # weight  parent  inverted  children...
//! -1.0	A	0	A	A
//! -2.0	A	1	A	A
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;

use crate::error::{ItgError, Result};

/// One weighted production `parent -> children`.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarRule {
    pub weight: f64,
    pub inverted: bool,
    pub children: Vec<String>,
}

/// Rules grouped by parent symbol, in file order.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: HashMap<String, Vec<GrammarRule>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, parent: impl Into<String>, rule: GrammarRule) {
        self.rules.entry(parent.into()).or_default().push(rule);
    }

    pub fn rules_for(&self, parent: &str) -> &[GrammarRule] {
        self.rules.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Total number of rules across all parents.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut grammar = Grammar::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| ItgError::io("<grammar>", e))?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.trim().split('\t').collect();
            if fields.len() < 3 {
                return Err(ItgError::MalformedGrammarRule {
                    line: line_no,
                    reason: format!("expected at least 3 fields, found {}", fields.len()),
                });
            }
            let weight: f64 = fields[0]
                .parse()
                .map_err(|e| ItgError::MalformedGrammarRule {
                    line: line_no,
                    reason: format!("bad weight '{}': {e}", fields[0]),
                })?;
            let inverted = match fields[2] {
                "0" => false,
                "1" => true,
                other => {
                    return Err(ItgError::MalformedGrammarRule {
                        line: line_no,
                        reason: format!("inverted flag must be 0 or 1, found '{other}'"),
                    })
                }
            };
            let children = fields[3..].iter().map(|c| c.to_string()).collect();
            grammar.add_rule(
                fields[1],
                GrammarRule {
                    weight,
                    inverted,
                    children,
                },
            );
        }
        Ok(grammar)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ItgError::io(path, e))?;
        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            ItgError::Io { source, .. } => ItgError::io(path, source),
            other => other,
        })
    }
}
