//! Path rewriting
//!
//! A [`Rewriter`] is an ordered chain of regex substitutions compiled once
//! from configuration. Every rule is applied in order to the output of the
//! previous one, so prefix remaps compose. Input that no rule matches is
//! returned unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::error::{RescanError, Result};
use crate::models::RewriteRule;

#[derive(Debug)]
struct CompiledRule {
    from: Regex,
    to: String,
}

/// Compiled, immutable rewrite chain
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    rules: Arc<Vec<CompiledRule>>,
}

impl Rewriter {
    /// Compile an ordered list of rules
    ///
    /// Fails with a `Config` error naming the offending pattern if any rule
    /// is not a valid regular expression.
    pub fn new(rules: &[RewriteRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let from = Regex::new(&rule.from).map_err(|e| {
                    RescanError::config_error(format!("invalid rewrite pattern {:?}: {}", rule.from, e))
                })?;
                Ok(CompiledRule {
                    from,
                    to: rule.to.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules: Arc::new(rules),
        })
    }

    /// A rewriter without rules
    pub fn identity() -> Self {
        Self::default()
    }

    /// Number of compiled rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the chain has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every matching rule in sequence
    pub fn rewrite(&self, input: &str) -> String {
        let mut output = input.to_string();
        for rule in self.rules.iter() {
            if rule.from.is_match(&output) {
                output = rule.from.replace_all(&output, rule.to.as_str()).into_owned();
            }
        }
        output
    }
}

/// Per-drive rewriters with a global fallback
///
/// A registered drive uses its own rules followed by the global rules. An
/// unknown drive (or none at all) uses only the global rules.
#[derive(Debug, Clone, Default)]
pub struct DriveRewriter {
    drives: HashMap<String, Rewriter>,
    global: Rewriter,
}

impl DriveRewriter {
    /// Compile the global chain and one chain per drive
    pub fn new<'a, I>(drives: I, global: &[RewriteRule]) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [RewriteRule])>,
    {
        let mut compiled = HashMap::new();
        for (id, rules) in drives {
            let chain: Vec<RewriteRule> = rules.iter().chain(global.iter()).cloned().collect();
            compiled.insert(id.to_string(), Rewriter::new(&chain)?);
        }

        Ok(Self {
            drives: compiled,
            global: Rewriter::new(global)?,
        })
    }

    /// Whether a drive has its own rules registered
    pub fn has_drive(&self, drive: &str) -> bool {
        self.drives.contains_key(drive)
    }

    /// Rewrite a path coming from the given drive
    pub fn rewrite(&self, drive: Option<&str>, input: &str) -> String {
        drive
            .and_then(|id| self.drives.get(id))
            .unwrap_or(&self.global)
            .rewrite(input)
    }
}
