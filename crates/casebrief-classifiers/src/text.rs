//! Text normalization and keyword lookup

use aho_corasick::AhoCorasick;
use casebrief_core::{Error, Result};

/// Document text prepared for case-insensitive search
#[derive(Debug, Clone)]
pub struct DocumentText<'a> {
    raw: &'a str,
    lower: String,
}

impl<'a> DocumentText<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    /// The text exactly as supplied
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Lower-cased text
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Empty or whitespace-only
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Case-insensitive substring test; `needle` must already be lower-case
    pub fn contains(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }
}

/// A fixed list of keywords matched as substrings in one pass
///
/// Keywords keep their declared order, and every query reports in that
/// order regardless of where matches fall in the text.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    matcher: AhoCorasick,
}

impl KeywordSet {
    /// Build a keyword set; keywords are lower-cased
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();

        let matcher = AhoCorasick::new(&keywords)
            .map_err(|e| Error::classifier(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self { keywords, matcher })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Presence of each keyword, indexed like [`Self::keywords`]
    pub fn presence(&self, text: &DocumentText<'_>) -> Vec<bool> {
        let mut seen = vec![false; self.keywords.len()];
        for m in self.matcher.find_overlapping_iter(text.lower()) {
            seen[m.pattern().as_usize()] = true;
        }
        seen
    }

    /// Keywords that occur in the text
    pub fn found(&self, text: &DocumentText<'_>) -> Vec<&str> {
        self.select(text, true)
    }

    /// Keywords that do not occur in the text
    pub fn missing(&self, text: &DocumentText<'_>) -> Vec<&str> {
        self.select(text, false)
    }

    /// At least one keyword occurs
    pub fn any(&self, text: &DocumentText<'_>) -> bool {
        self.matcher.is_match(text.lower())
    }

    /// Every keyword occurs
    pub fn all(&self, text: &DocumentText<'_>) -> bool {
        self.presence(text).into_iter().all(|present| present)
    }

    fn select(&self, text: &DocumentText<'_>, wanted: bool) -> Vec<&str> {
        self.keywords
            .iter()
            .zip(self.presence(text))
            .filter(|(_, present)| *present == wanted)
            .map(|(keyword, _)| keyword.as_str())
            .collect()
    }
}
