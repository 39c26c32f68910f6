use crate::analyzer::Analyzer;
use crate::record::FieldAllowlist;
use serde::{Deserialize, Serialize};

/// How a field's text is turned into index terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Identifier field indexed as one verbatim token, whatever
    /// analyzer the index is bound to.
    Keyword,
    /// Free text run through the index's bound analyzer.
    Analyzed,
}

/// One indexed field: tag name, tokenization kind, and whether the raw
/// value is kept retrievable in storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub stored: bool,
}

impl FieldSpec {
    pub fn keyword(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Keyword,
            stored: true,
        }
    }

    pub fn analyzed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Analyzed,
            stored: true,
        }
    }

    /// The analyzer actually applied to this field for an index bound
    /// to `bound`.
    pub fn analyzer(&self, bound: Analyzer) -> Analyzer {
        match self.kind {
            FieldKind::Keyword => Analyzer::Keyword,
            FieldKind::Analyzed => bound,
        }
    }
}

/// The ordered field layout of one index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSchema {
    fields: Vec<FieldSpec>,
}

impl IndexSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// The standard newswire layout: document number as identifier,
    /// plus headline, byline, dateline and body text.
    pub fn newswire() -> Self {
        Self::new(vec![
            FieldSpec::keyword("DOCNO"),
            FieldSpec::analyzed("HEAD"),
            FieldSpec::analyzed("BYLINE"),
            FieldSpec::analyzed("DATELINE"),
            FieldSpec::analyzed("TEXT"),
        ])
    }

    /// A single analyzed field, as used by the analyzer comparison.
    pub fn single_text(name: &str) -> Self {
        Self::new(vec![FieldSpec::analyzed(name)])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn allowlist(&self) -> FieldAllowlist {
        FieldAllowlist::new(self.fields.iter().map(|f| f.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_field_ignores_bound_analyzer() {
        let spec = FieldSpec::keyword("DOCNO");
        assert_eq!(spec.analyzer(Analyzer::Standard), Analyzer::Keyword);
        let spec = FieldSpec::analyzed("TEXT");
        assert_eq!(spec.analyzer(Analyzer::Standard), Analyzer::Standard);
    }

    #[test]
    fn test_newswire_allowlist() {
        let allowlist = IndexSchema::newswire().allowlist();
        for name in ["DOCNO", "HEAD", "BYLINE", "DATELINE", "TEXT"] {
            assert!(allowlist.contains(name));
        }
        assert!(!allowlist.contains("NOTE"));
    }
}
