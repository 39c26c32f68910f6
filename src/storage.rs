use crate::index::BuiltIndex;
use anyhow::{Context, Result};
use sled::Db;
use std::collections::HashMap;
use std::path::Path;

const INDEXES_TREE: &str = "indexes";
const DOCS_TREE: &str = "stored_docs";

/// Durable home for finalized indexes and stored field values.
///
/// One database per output directory; each finalized index lives under
/// its analyzer label, stored field values under the document's
/// ingestion ordinal.
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Open or create a storage database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path).context("Failed to open index storage")?;
        Ok(Self { db })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config
            .open()
            .context("Failed to create in-memory storage")?;
        Ok(Self { db })
    }

    /// Persist a finalized index under the given label.
    pub fn save_index(&self, label: &str, index: &BuiltIndex) -> Result<()> {
        let tree = self.db.open_tree(INDEXES_TREE)?;
        let serialized = bincode::serialize(index)?;
        tree.insert(label.as_bytes(), serialized)?;
        Ok(())
    }

    /// Load a previously saved index by label.
    pub fn load_index(&self, label: &str) -> Result<Option<BuiltIndex>> {
        let tree = self.db.open_tree(INDEXES_TREE)?;
        if let Some(data) = tree.get(label.as_bytes())? {
            let index: BuiltIndex = bincode::deserialize(&data)?;
            Ok(Some(index))
        } else {
            Ok(None)
        }
    }

    /// Persist the raw values of one document's stored fields.
    pub fn save_stored_fields(
        &self,
        ordinal: u64,
        fields: &HashMap<String, String>,
    ) -> Result<()> {
        let tree = self.db.open_tree(DOCS_TREE)?;
        let serialized = bincode::serialize(fields)?;
        tree.insert(ordinal.to_be_bytes(), serialized)?;
        Ok(())
    }

    /// Retrieve the stored field values of one document.
    pub fn stored_fields(&self, ordinal: u64) -> Result<Option<HashMap<String, String>>> {
        let tree = self.db.open_tree(DOCS_TREE)?;
        if let Some(data) = tree.get(ordinal.to_be_bytes())? {
            let fields: HashMap<String, String> = bincode::deserialize(&data)?;
            Ok(Some(fields))
        } else {
            Ok(None)
        }
    }

    /// Count documents with stored fields.
    pub fn stored_doc_count(&self) -> Result<usize> {
        let tree = self.db.open_tree(DOCS_TREE)?;
        Ok(tree.len())
    }

    /// Flush all changes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}
