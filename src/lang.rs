//! Language-specific heading patterns.
//!
//! Numbered-heading detection ("1.2 Scope", "一、背景") depends on the
//! document language. Patterns are loaded once per run into a
//! [`LanguageRegistry`] and shared read-only across all documents; an
//! unknown language code falls back to a default pattern with numbering
//! detection disabled rather than failing the run.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A compiled per-language heading pattern.
#[derive(Debug, Clone)]
pub struct LanguagePattern {
    /// ISO language code ("en", "zh", ...)
    pub language_code: String,

    /// Pattern matching numbered-heading prefixes, `None` when detection
    /// is disabled for this language.
    numbered_heading: Option<Regex>,
}

impl LanguagePattern {
    /// Compile a pattern for a language.
    pub fn new(language_code: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::Config(format!("invalid heading pattern: {}", e)))?;
        Ok(Self {
            language_code: language_code.into(),
            numbered_heading: Some(regex),
        })
    }

    /// A pattern with numbered-heading detection disabled.
    pub fn disabled(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            numbered_heading: None,
        }
    }

    /// Check whether a line's leading text looks like a numbered heading.
    ///
    /// Always `false` when detection is disabled.
    pub fn matches_numbered(&self, text: &str) -> bool {
        match &self.numbered_heading {
            Some(regex) => regex.is_match(text),
            None => false,
        }
    }

    /// Whether numbered-heading detection is active.
    pub fn is_enabled(&self) -> bool {
        self.numbered_heading.is_some()
    }
}

/// On-disk shape of one language entry in a pattern file.
#[derive(Debug, Deserialize)]
struct PatternEntry {
    numbered_heading_regex: String,
}

/// Read-only mapping from language code to compiled pattern.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    patterns: HashMap<String, LanguagePattern>,
    fallback: LanguagePattern,
}

impl LanguageRegistry {
    /// Registry with the built-in patterns for English, Chinese, and
    /// Japanese heading numbering.
    pub fn builtin() -> Self {
        let mut patterns = HashMap::new();

        // Decimal ("1.", "2.3"), roman ("IV."), and alpha ("A.") prefixes.
        let en = LanguagePattern::new(
            "en",
            r"^\s*(?:\d+(?:\.\d+)*[.)]?|[IVXLCDM]+[.)]|[A-Z][.)])\s+\S",
        )
        .expect("builtin en pattern");

        // CJK numerals with enumeration comma ("一、"), chapter markers
        // ("第三章"), or decimal prefixes.
        let zh = LanguagePattern::new(
            "zh",
            r"^\s*(?:[一二三四五六七八九十百]+[、.．]|第[一二三四五六七八九十百0-9]+[章节部分篇]|\d+(?:\.\d+)*[.)]?\s)",
        )
        .expect("builtin zh pattern");

        let ja = LanguagePattern::new(
            "ja",
            r"^\s*(?:第[一二三四五六七八九十0-9]+[章節部]|[一二三四五六七八九十]+[、.．]|\d+(?:\.\d+)*[.)]?\s)",
        )
        .expect("builtin ja pattern");

        patterns.insert("en".to_string(), en);
        patterns.insert("zh".to_string(), zh);
        patterns.insert("ja".to_string(), ja);

        Self {
            patterns,
            fallback: LanguagePattern::disabled("default"),
        }
    }

    /// An empty registry: every lookup resolves to the disabled fallback.
    pub fn empty() -> Self {
        Self {
            patterns: HashMap::new(),
            fallback: LanguagePattern::disabled("default"),
        }
    }

    /// Load a registry from a JSON mapping of language code to
    /// `{ "numbered_heading_regex": "..." }`, layered over the builtins.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, PatternEntry> = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid language file: {}", e)))?;

        let mut registry = Self::builtin();
        for (code, entry) in entries {
            let pattern = LanguagePattern::new(code.clone(), &entry.numbered_heading_regex)?;
            registry.patterns.insert(code, pattern);
        }
        Ok(registry)
    }

    /// Load a registry from a JSON file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Register or replace a pattern.
    pub fn insert(&mut self, pattern: LanguagePattern) {
        self.patterns.insert(pattern.language_code.clone(), pattern);
    }

    /// Look up the pattern for a language code.
    ///
    /// Unknown codes fall back to the disabled default pattern; the run
    /// continues with numbered-heading detection off for that document.
    pub fn get(&self, code: &str) -> &LanguagePattern {
        match self.patterns.get(code) {
            Some(pattern) => pattern,
            None => {
                log::warn!(
                    "unknown language code '{}', numbered-heading detection disabled",
                    code
                );
                &self.fallback
            }
        }
    }

    /// Language codes with a registered pattern.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(|s| s.as_str())
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
