//! Prompt Templates
//!
//! `{{ name }}` placeholder substitution. A name is any run of characters
//! other than braces; whitespace around it inside the braces is ignored, so
//! `{{ station id }}` binds the key `station id`. Placeholders without a
//! binding stay in the output verbatim, and substituted values are inserted
//! as-is with no escaping.

use regex::{Captures, Regex};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::OnceLock;

/// Compiled once and shared by every template.
static PLACEHOLDER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER_PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}\s](?:[^{}]*[^{}\s])?)\s*\}\}")
            .expect("Invalid placeholder pattern")
    })
}

/// A template string with its placeholder names resolved up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    placeholders: Vec<String>,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut placeholders: Vec<String> = Vec::new();
        for caps in placeholder_pattern().captures_iter(&source) {
            let name = &caps[1];
            if !placeholders.iter().any(|p| p == name) {
                placeholders.push(name.to_string());
            }
        }
        Self {
            source,
            placeholders,
        }
    }

    /// The original template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct placeholder names in order of first appearance
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Substitute every bound placeholder; unbound ones pass through literally.
    pub fn format<K, V>(&self, variables: &HashMap<K, V>) -> String
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
    {
        if self.placeholders.is_empty() {
            return self.source.clone();
        }

        placeholder_pattern()
            .replace_all(&self.source, |caps: &Captures<'_>| {
                match variables.get(&caps[1]) {
                    Some(value) => value.as_ref().to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

impl From<&str> for PromptTemplate {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for PromptTemplate {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}
