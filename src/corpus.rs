use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// File suffix recognized as corpus input.
pub const CORPUS_SUFFIX: &str = ".trectext";

/// Suffix for gzip-compressed corpus files.
pub const CORPUS_SUFFIX_GZ: &str = ".trectext.gz";

/// Enumerates and opens the files of a corpus directory.
pub struct CorpusReader {
    dir: PathBuf,
}

impl CorpusReader {
    /// The directory must exist up front: a bad corpus path is a
    /// configuration error, not a per-file failure.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            anyhow::bail!("corpus path {} is not a directory", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Corpus files in sorted order, so runs over the same directory
    /// are deterministic. Plain and gzip-compressed files are both
    /// recognized.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("reading corpus directory {}", self.dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(CORPUS_SUFFIX) || name.ends_with(CORPUS_SUFFIX_GZ) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Open one corpus file as a buffered line stream, transparently
    /// decompressing gzip input.
    pub fn open(path: &Path) -> Result<Box<dyn BufRead>> {
        let file = File::open(path)
            .with_context(|| format!("opening corpus file {}", path.display()))?;
        if path.extension().is_some_and(|ext| ext == "gz") {
            Ok(Box::new(BufReader::new(GzDecoder::new(file))))
        } else {
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Read, Write};

    #[test]
    fn test_lists_only_corpus_files_sorted() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("b.trectext"), "b")?;
        std::fs::write(dir.path().join("a.trectext"), "a")?;
        std::fs::write(dir.path().join("notes.txt"), "ignored")?;

        let reader = CorpusReader::new(dir.path())?;
        let names: Vec<_> = reader
            .files()?
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.trectext", "b.trectext"]);
        Ok(())
    }

    #[test]
    fn test_opens_gzip_compressed_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("c.trectext.gz");
        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"<DOC>\n</DOC>\n")?;
        encoder.finish()?;

        let reader = CorpusReader::new(dir.path())?;
        assert_eq!(reader.files()?.len(), 1);

        let mut content = String::new();
        CorpusReader::open(&path)?.read_to_string(&mut content)?;
        assert_eq!(content, "<DOC>\n</DOC>\n");
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(CorpusReader::new(missing).is_err());
    }
}
