use crate::index::BuiltIndex;
use serde::Serialize;

/// Corpus statistics for one field of one finalized index.
#[derive(Debug, Clone, Serialize)]
pub struct VariantStats {
    pub analyzer: String,
    pub doc_count: u64,
    pub term_doc_freq: u64,
    pub term_total_freq: u64,
    pub vocabulary_size: u64,
    pub token_count: u64,
    pub posting_count: u64,
    pub docs_with_field: u64,
}

impl VariantStats {
    /// Read every reported statistic for `field` (plus the probe term)
    /// out of a finalized index. Read-only.
    pub fn collect(index: &BuiltIndex, field: &str, term: &str) -> Self {
        Self {
            analyzer: index.analyzer().label().to_string(),
            doc_count: index.doc_count(),
            term_doc_freq: index.doc_freq(field, term),
            term_total_freq: index.total_term_freq(field, term),
            vocabulary_size: index.vocabulary_size(field),
            token_count: index.token_count(field),
            posting_count: index.posting_count(field),
            docs_with_field: index.docs_with_field(field),
        }
    }
}

/// Side-by-side statistics for the same corpus under several analyzers.
///
/// Rendering is line-oriented, one metric per line, grouped per metric
/// across the variants.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub field: String,
    pub term: String,
    pub variants: Vec<VariantStats>,
}

impl ComparisonReport {
    pub fn new(indexes: &[BuiltIndex], field: &str, term: &str) -> Self {
        Self {
            field: field.to_string(),
            term: term.to_string(),
            variants: indexes
                .iter()
                .map(|index| VariantStats::collect(index, field, term))
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        let field = &self.field;
        let term = &self.term;
        let mut out = String::new();

        self.metric_block(&mut out, |v| {
            format!(
                "Total number of documents in the corpus with {} analyzer: {}",
                v.analyzer, v.doc_count
            )
        });
        self.metric_block(&mut out, |v| {
            format!(
                "Number of documents containing the term \"{}\" for the field \"{}\" with {} analyzer: {}",
                term, field, v.analyzer, v.term_doc_freq
            )
        });
        self.metric_block(&mut out, |v| {
            format!(
                "Number of occurrences of \"{}\" in the field \"{}\" with {} analyzer: {}",
                term, field, v.analyzer, v.term_total_freq
            )
        });
        self.metric_block(&mut out, |v| {
            format!(
                "Number of terms in the dictionary for the field \"{}\" with {} analyzer: {}",
                field, v.analyzer, v.vocabulary_size
            )
        });
        self.metric_block(&mut out, |v| {
            format!(
                "Number of tokens for the field \"{}\" with {} analyzer: {}",
                field, v.analyzer, v.token_count
            )
        });
        self.metric_block(&mut out, |v| {
            format!(
                "Number of postings for the field \"{}\" with {} analyzer: {}",
                field, v.analyzer, v.posting_count
            )
        });
        self.metric_block(&mut out, |v| {
            format!(
                "Number of documents that have at least one term for the field \"{}\" with {} analyzer: {}",
                field, v.analyzer, v.docs_with_field
            )
        });

        out
    }

    fn metric_block(&self, out: &mut String, line: impl Fn(&VariantStats) -> String) {
        if !out.is_empty() {
            out.push('\n');
        }
        for variant in &self.variants {
            out.push_str(&line(variant));
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::index::IndexBuilder;
    use crate::record::Record;
    use crate::schema::IndexSchema;

    fn build_indexes() -> Vec<BuiltIndex> {
        let schema = IndexSchema::single_text("TEXT");
        Analyzer::ALL
            .iter()
            .map(|&analyzer| {
                let mut builder = IndexBuilder::new(analyzer, schema.clone());
                let mut record = Record::new();
                record.append_field("TEXT", "the new year brought new markets");
                builder.ingest(&record).unwrap();
                builder.finalize().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_collect_reads_index_statistics() {
        let indexes = build_indexes();
        let stats = VariantStats::collect(&indexes[0], "TEXT", "new");
        assert_eq!(stats.analyzer, "Standard");
        assert_eq!(stats.doc_count, 1);
        assert_eq!(stats.term_doc_freq, 1);
        assert_eq!(stats.term_total_freq, 2);
        assert_eq!(stats.docs_with_field, 1);
    }

    #[test]
    fn test_render_reports_every_metric_once_per_variant() {
        let report = ComparisonReport::new(&build_indexes(), "TEXT", "new");
        let rendered = report.render();

        for label in ["Standard", "Keyword", "Simple", "Stop"] {
            let marker = format!("with {label} analyzer:");
            let occurrences = rendered.matches(&marker).count();
            assert_eq!(occurrences, 7, "expected 7 metrics for {label}");
        }
        assert!(rendered.contains("Number of postings for the field \"TEXT\""));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = ComparisonReport::new(&build_indexes(), "TEXT", "new");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"vocabulary_size\""));
        assert!(json.contains("\"Keyword\""));
    }
}
