use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

lazy_static::lazy_static! {
    /// Classic default English stopword list.
    static ref STOPWORDS: HashSet<&'static str> = {
        [
            "a", "an", "and", "are", "as", "at", "be", "but", "by", "for",
            "if", "in", "into", "is", "it", "no", "not", "of", "on", "or",
            "such", "that", "the", "their", "then", "there", "these", "they",
            "this", "to", "was", "will", "with",
        ]
        .iter()
        .copied()
        .collect()
    };
}

/// Tokenization strategy, bound once per index and never changed
/// mid-ingestion.
///
/// - `Keyword` keeps the whole trimmed field value as a single token:
///   no splitting, no case folding, no stopword removal.
/// - `Standard` splits on word boundaries (whitespace and punctuation),
///   lowercases, and removes stopwords. No stemming.
/// - `Simple` splits on word boundaries and lowercases.
/// - `Stop` splits on whitespace, lowercases for stopword matching, and
///   removes stopwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Analyzer {
    Keyword,
    Standard,
    Simple,
    Stop,
}

impl Analyzer {
    /// All variants, in report order.
    pub const ALL: [Analyzer; 4] = [
        Analyzer::Standard,
        Analyzer::Keyword,
        Analyzer::Simple,
        Analyzer::Stop,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Analyzer::Keyword => "Keyword",
            Analyzer::Standard => "Standard",
            Analyzer::Simple => "Simple",
            Analyzer::Stop => "Stop",
        }
    }

    /// Map raw field text to its token sequence. Deterministic: the
    /// same input always yields the same tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        match self {
            Analyzer::Keyword => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Vec::new()
                } else {
                    vec![trimmed.to_string()]
                }
            }
            Analyzer::Standard => word_tokens(text)
                .filter(|t| !STOPWORDS.contains(t.as_str()))
                .collect(),
            Analyzer::Simple => word_tokens(text).collect(),
            Analyzer::Stop => text
                .split_whitespace()
                .map(str::to_lowercase)
                .filter(|t| !STOPWORDS.contains(t.as_str()))
                .collect(),
        }
    }
}

/// Unicode word-boundary split plus lowercasing.
fn word_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words().map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_never_splits() {
        let tokens = Analyzer::Keyword.tokenize("  New York Times  ");
        assert_eq!(tokens, vec!["New York Times"]);
    }

    #[test]
    fn test_keyword_empty_text_yields_no_token() {
        assert!(Analyzer::Keyword.tokenize("   ").is_empty());
    }

    #[test]
    fn test_standard_splits_lowercases_and_drops_stopwords() {
        let tokens = Analyzer::Standard.tokenize("The Quick, Brown Fox!");
        assert_eq!(tokens, vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_simple_keeps_stopwords() {
        let tokens = Analyzer::Simple.tokenize("The Quick, Brown Fox!");
        assert_eq!(tokens, vec!["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn test_stop_splits_on_whitespace_only() {
        let tokens = Analyzer::Stop.tokenize("The quick-brown fox");
        // Punctuation stays attached under whitespace splitting.
        assert_eq!(tokens, vec!["quick-brown", "fox"]);
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "Some Repeated Input, with 42 numbers.";
        for analyzer in Analyzer::ALL {
            assert_eq!(analyzer.tokenize(text), analyzer.tokenize(text));
        }
    }
}
