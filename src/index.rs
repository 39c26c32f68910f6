use crate::analyzer::Analyzer;
use crate::record::Record;
use crate::schema::IndexSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Documents accumulated per in-memory segment before it is sealed.
const SEGMENT_DOC_LIMIT: u64 = 1024;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index builder is already finalized")]
    AlreadyFinalized,
}

/// Aggregate frequencies for one (field, term) pair across the corpus.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TermEntry {
    /// Number of documents containing the term.
    pub doc_freq: u64,
    /// Total occurrences of the term across all documents.
    pub total_term_freq: u64,
}

/// Term aggregates for one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldIndex {
    terms: HashMap<String, TermEntry>,
    /// Documents with at least one term for this field.
    docs_with_terms: u64,
}

/// One batch of ingested documents. Sealed segments are merged into a
/// single consolidated view at finalize time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Segment {
    doc_count: u64,
    fields: HashMap<String, FieldIndex>,
}

impl Segment {
    fn merge_from(&mut self, other: Segment) {
        self.doc_count += other.doc_count;
        for (field, src) in other.fields {
            let dst = self.fields.entry(field).or_default();
            dst.docs_with_terms += src.docs_with_terms;
            for (term, entry) in src.terms {
                let merged = dst.terms.entry(term).or_default();
                merged.doc_freq += entry.doc_freq;
                merged.total_term_freq += entry.total_term_freq;
            }
        }
    }
}

/// Accumulates term statistics for one corpus under one analyzer.
///
/// Not thread-safe: one builder exclusively owns the index it is
/// constructing. Each ingested record counts toward the document total,
/// whether or not it carries any recognized field.
pub struct IndexBuilder {
    analyzer: Analyzer,
    schema: IndexSchema,
    current: Segment,
    sealed: Vec<Segment>,
    finalized: bool,
}

impl IndexBuilder {
    pub fn new(analyzer: Analyzer, schema: IndexSchema) -> Self {
        Self {
            analyzer,
            schema,
            current: Segment::default(),
            sealed: Vec::new(),
            finalized: false,
        }
    }

    pub fn analyzer(&self) -> Analyzer {
        self.analyzer
    }

    /// Tokenize each schema field present on the record and fold the
    /// counts into the current segment.
    pub fn ingest(&mut self, record: &Record) -> Result<(), IndexError> {
        if self.finalized {
            return Err(IndexError::AlreadyFinalized);
        }
        if self.current.doc_count >= SEGMENT_DOC_LIMIT {
            self.seal_segment();
        }

        let bound = self.analyzer;
        let Self {
            schema, current, ..
        } = self;

        current.doc_count += 1;
        for spec in schema.fields() {
            let Some(value) = record.get(&spec.name) else {
                continue;
            };
            let tokens = spec.analyzer(bound).tokenize(value);
            if tokens.is_empty() {
                continue;
            }

            let mut counts: HashMap<String, u64> = HashMap::new();
            for token in tokens {
                *counts.entry(token).or_insert(0) += 1;
            }

            let field = current.fields.entry(spec.name.clone()).or_default();
            field.docs_with_terms += 1;
            for (term, count) in counts {
                let entry = field.terms.entry(term).or_default();
                entry.doc_freq += 1;
                entry.total_term_freq += count;
            }
        }
        Ok(())
    }

    /// Seal the current segment at a batch boundary. Called internally
    /// when a segment fills up; callers may also invoke it between
    /// corpus files.
    pub fn seal_segment(&mut self) {
        if self.current.doc_count > 0 {
            self.sealed.push(std::mem::take(&mut self.current));
        }
    }

    /// Merge all segments into one consolidated, read-only index. The
    /// builder accepts no further documents afterwards.
    pub fn finalize(&mut self) -> Result<BuiltIndex, IndexError> {
        if self.finalized {
            return Err(IndexError::AlreadyFinalized);
        }
        self.finalized = true;
        self.seal_segment();

        let mut merged = Segment::default();
        for segment in self.sealed.drain(..) {
            merged.merge_from(segment);
        }
        Ok(BuiltIndex {
            analyzer: self.analyzer,
            doc_count: merged.doc_count,
            fields: merged.fields,
        })
    }
}

/// Read-only term statistics for one corpus under one analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltIndex {
    analyzer: Analyzer,
    doc_count: u64,
    fields: HashMap<String, FieldIndex>,
}

impl BuiltIndex {
    pub fn analyzer(&self) -> Analyzer {
        self.analyzer
    }

    /// Total number of documents ingested.
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    /// Number of documents containing `term` in `field`.
    pub fn doc_freq(&self, field: &str, term: &str) -> u64 {
        self.term_entry(field, term).map_or(0, |e| e.doc_freq)
    }

    /// Total occurrences of `term` in `field` across all documents.
    pub fn total_term_freq(&self, field: &str, term: &str) -> u64 {
        self.term_entry(field, term).map_or(0, |e| e.total_term_freq)
    }

    /// Number of distinct terms in `field`.
    pub fn vocabulary_size(&self, field: &str) -> u64 {
        self.fields.get(field).map_or(0, |f| f.terms.len() as u64)
    }

    /// Sum of total term frequencies in `field` (token count).
    pub fn token_count(&self, field: &str) -> u64 {
        self.fields.get(field).map_or(0, |f| {
            f.terms.values().map(|e| e.total_term_freq).sum()
        })
    }

    /// Sum of document frequencies in `field` (posting count).
    pub fn posting_count(&self, field: &str) -> u64 {
        self.fields
            .get(field)
            .map_or(0, |f| f.terms.values().map(|e| e.doc_freq).sum())
    }

    /// Number of documents with at least one term in `field`.
    pub fn docs_with_field(&self, field: &str) -> u64 {
        self.fields.get(field).map_or(0, |f| f.docs_with_terms)
    }

    /// Iterate the vocabulary of `field`.
    pub fn terms(&self, field: &str) -> impl Iterator<Item = (&str, &TermEntry)> {
        self.fields
            .get(field)
            .into_iter()
            .flat_map(|f| f.terms.iter().map(|(t, e)| (t.as_str(), e)))
    }

    fn term_entry(&self, field: &str, term: &str) -> Option<&TermEntry> {
        self.fields.get(field).and_then(|f| f.terms.get(term))
    }
}
