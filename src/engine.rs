use crate::analyzer::Analyzer;
use crate::corpus::CorpusReader;
use crate::index::{BuiltIndex, IndexBuilder};
use crate::parser::RecordParser;
use crate::record::Record;
use crate::schema::IndexSchema;
use crate::storage::Storage;
use anyhow::Result;
use std::collections::HashMap;

/// Drives the corpus through the parser into one or more index
/// builders in a single sequential pass.
///
/// Error policy: an unreadable corpus file is logged and skipped, and a
/// malformed file is abandoned from the point of the error on. The
/// rest of the batch is still processed either way.
pub struct Engine {
    corpus: CorpusReader,
    storage: Option<Storage>,
}

impl Engine {
    pub fn new(corpus: CorpusReader) -> Self {
        Self {
            corpus,
            storage: None,
        }
    }

    /// Attach durable storage for finalized indexes and stored fields.
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Build a single index over the schema's fields.
    pub fn build(&self, schema: &IndexSchema, analyzer: Analyzer) -> Result<BuiltIndex> {
        let mut builder = IndexBuilder::new(analyzer, schema.clone());
        self.ingest_corpus(schema, std::slice::from_mut(&mut builder))?;
        let index = builder.finalize()?;
        self.persist(&index)?;
        Ok(index)
    }

    /// Build one index per analyzer variant over the same single pass
    /// of the corpus. Every variant sees the identical record stream.
    pub fn compare(&self, field: &str) -> Result<Vec<BuiltIndex>> {
        let schema = IndexSchema::single_text(field);
        let mut builders: Vec<IndexBuilder> = Analyzer::ALL
            .iter()
            .map(|&analyzer| IndexBuilder::new(analyzer, schema.clone()))
            .collect();
        self.ingest_corpus(&schema, &mut builders)?;

        let mut indexes = Vec::with_capacity(builders.len());
        for mut builder in builders {
            let index = builder.finalize()?;
            self.persist(&index)?;
            indexes.push(index);
        }
        Ok(indexes)
    }

    fn ingest_corpus(&self, schema: &IndexSchema, builders: &mut [IndexBuilder]) -> Result<()> {
        let allowlist = schema.allowlist();
        let mut ordinal: u64 = 0;

        for path in self.corpus.files()? {
            let reader = match CorpusReader::open(&path) {
                Ok(reader) => reader,
                Err(err) => {
                    tracing::warn!(
                        file = %path.display(),
                        error = %err,
                        "skipping unreadable corpus file"
                    );
                    continue;
                }
            };

            tracing::info!(file = %path.display(), "indexing corpus file");
            let parser = RecordParser::new(reader, &allowlist);
            let mut file_docs: u64 = 0;
            for parsed in parser {
                match parsed {
                    Ok(record) => {
                        self.store_record(schema, ordinal, &record)?;
                        ordinal += 1;
                        file_docs += 1;
                        for builder in builders.iter_mut() {
                            builder.ingest(&record)?;
                        }
                    }
                    Err(err) => {
                        // Malformed input is local to one file: log the
                        // position and move on to the next file.
                        tracing::warn!(
                            file = %path.display(),
                            error = %err,
                            "abandoning malformed corpus file"
                        );
                        break;
                    }
                }
            }
            tracing::debug!(file = %path.display(), documents = file_docs, "file done");

            // A file boundary is a natural segment boundary.
            for builder in builders.iter_mut() {
                builder.seal_segment();
            }
        }
        Ok(())
    }

    fn persist(&self, index: &BuiltIndex) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        storage.save_index(index.analyzer().label(), index)?;
        storage.flush()?;
        Ok(())
    }

    fn store_record(&self, schema: &IndexSchema, ordinal: u64, record: &Record) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let mut stored = HashMap::new();
        for spec in schema.fields() {
            if !spec.stored {
                continue;
            }
            if let Some(value) = record.get(&spec.name) {
                stored.insert(spec.name.clone(), value.to_string());
            }
        }
        if !stored.is_empty() {
            storage.save_stored_fields(ordinal, &stored)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::path::Path;

    const FILE_ONE: &str = "\
<DOC>
<DOCNO> AP890101-0001 </DOCNO>
<TEXT>
new year celebrations ushered in the new decade
</TEXT>
</DOC>
<DOC>
<DOCNO> AP890101-0002 </DOCNO>
<TEXT>quiet day on the markets</TEXT>
</DOC>
";

    const FILE_TWO: &str = "\
<DOC>
<DOCNO> AP890102-0001 </DOCNO>
<TEXT>storms swept the new coast</TEXT>
</DOC>
";

    fn write_corpus(dir: &Path) -> Result<()> {
        std::fs::write(dir.join("ap890101.trectext"), FILE_ONE)?;
        std::fs::write(dir.join("ap890102.trectext"), FILE_TWO)?;
        Ok(())
    }

    #[test]
    fn test_build_over_newswire_schema() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_corpus(dir.path())?;

        let engine = Engine::new(CorpusReader::new(dir.path())?)
            .with_storage(Storage::in_memory()?);
        let index = engine.build(&IndexSchema::newswire(), Analyzer::Standard)?;

        assert_eq!(index.doc_count(), 3);
        assert_eq!(index.doc_freq("TEXT", "new"), 2);
        assert_eq!(index.total_term_freq("TEXT", "new"), 3);
        assert_eq!(index.doc_freq("DOCNO", "AP890101-0002"), 1);
        Ok(())
    }

    #[test]
    fn test_compare_feeds_every_variant_the_same_stream() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_corpus(dir.path())?;

        let engine = Engine::new(CorpusReader::new(dir.path())?);
        let indexes = engine.compare("TEXT")?;

        assert_eq!(indexes.len(), 4);
        for index in &indexes {
            assert_eq!(index.doc_count(), 3);
        }
        let standard = &indexes[0];
        assert_eq!(standard.analyzer(), Analyzer::Standard);
        assert_eq!(standard.doc_freq("TEXT", "new"), 2);
        // Keyword keeps each document body as one token.
        let keyword = &indexes[1];
        assert_eq!(keyword.vocabulary_size("TEXT"), 3);
        assert_eq!(keyword.token_count("TEXT"), 3);
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_abandoned_but_batch_continues() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_corpus(dir.path())?;
        // One good document, then a block that never closes.
        std::fs::write(
            dir.path().join("ap890103.trectext"),
            "<DOC>\n<TEXT>salvaged</TEXT>\n</DOC>\n<DOC>\n<TEXT>lost\n",
        )?;

        let engine = Engine::new(CorpusReader::new(dir.path())?);
        let index = engine.build(&IndexSchema::newswire(), Analyzer::Standard)?;

        // 3 documents from the clean files + 1 before the error.
        assert_eq!(index.doc_count(), 4);
        assert_eq!(index.doc_freq("TEXT", "salvaged"), 1);
        assert_eq!(index.doc_freq("TEXT", "lost"), 0);
        Ok(())
    }

    #[test]
    fn test_build_persists_index_and_stored_fields() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_corpus(dir.path())?;

        let storage_dir = tempfile::tempdir()?;
        let engine = Engine::new(CorpusReader::new(dir.path())?)
            .with_storage(Storage::open(storage_dir.path().join("indexes"))?);
        engine.build(&IndexSchema::newswire(), Analyzer::Standard)?;
        // Release the directory lock before reopening.
        drop(engine);

        let storage = Storage::open(storage_dir.path().join("indexes"))?;
        let loaded = storage.load_index("Standard")?.expect("index persisted");
        assert_eq!(loaded.doc_count(), 3);

        let first = storage.stored_fields(0)?.expect("stored fields persisted");
        assert_eq!(first.get("DOCNO").map(String::as_str), Some("AP890101-0001"));
        Ok(())
    }
}
