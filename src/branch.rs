// src/branch.rs

use regex::Regex;

/// One canonical branch name and the patterns that map onto it.
#[derive(Clone, Debug)]
pub struct BranchRule {
    name: String,
    patterns: Vec<Regex>,
}

impl BranchRule {
    pub fn new(name: impl Into<String>, patterns: Vec<Regex>) -> Self {
        Self {
            name: name.into(),
            patterns,
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// Maps raw sourcestamp branches to canonical names.
///
/// Rules are tried in registration order and the first rule with a matching
/// pattern wins, regardless of how specific a later rule might be. Input that
/// matches nothing comes back lower-cased.
#[derive(Clone, Debug, Default)]
pub struct BranchNormalizer {
    rules: Vec<BranchRule>,
}

impl BranchNormalizer {
    pub fn new(rules: Vec<BranchRule>) -> Self {
        Self { rules }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let text = raw.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&text))
            .map(|rule| rule.name.clone())
            .unwrap_or(text)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }
}
