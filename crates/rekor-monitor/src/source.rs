//! Log data read from saved API responses

use rekor_types::{Checkpoint, ConsistencyProof, LogEntry};
use rekor_verify::LogSource;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("no {0} file given")]
    Missing(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: rekor_types::Error,
    },
}

/// A [`LogSource`] backed by JSON files on disk
///
/// Each file holds the body of the matching Rekor v1 API response.
#[derive(Debug, Default)]
pub struct FileSource {
    entry: Option<PathBuf>,
    checkpoint: Option<PathBuf>,
    proof: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response of `GET /api/v1/log/entries?logIndex=N`
    pub fn with_entry(mut self, path: impl Into<PathBuf>) -> Self {
        self.entry = Some(path.into());
        self
    }

    /// Response of `GET /api/v1/log`
    pub fn with_checkpoint(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint = Some(path.into());
        self
    }

    /// Response of `GET /api/v1/log/proof`
    pub fn with_proof(mut self, path: impl Into<PathBuf>) -> Self {
        self.proof = Some(path.into());
        self
    }

    /// The saved entry, whatever its index
    pub fn entry(&self) -> Result<LogEntry, SourceError> {
        let (text, path) = read(&self.entry, "entry")?;
        let entry = LogEntry::from_response_json(&text).map_err(parse_error(path))?;
        tracing::debug!(uuid = %entry.uuid, path = %path.display(), "loaded entry");
        Ok(entry)
    }
}

fn read<'a>(
    path: &'a Option<PathBuf>,
    what: &'static str,
) -> Result<(String, &'a Path), SourceError> {
    let path = path.as_deref().ok_or(SourceError::Missing(what))?;
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((text, path))
}

fn parse_error(path: &Path) -> impl FnOnce(rekor_types::Error) -> SourceError + '_ {
    move |source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

impl LogSource for FileSource {
    type Error = SourceError;

    /// The file holds a single entry; whether it is the requested one is
    /// left to the verifier
    fn entry_by_index(&self, index: u64) -> Result<LogEntry, SourceError> {
        tracing::debug!(index, "loading entry");
        self.entry()
    }

    fn latest_checkpoint(&self) -> Result<Checkpoint, SourceError> {
        let (text, path) = read(&self.checkpoint, "checkpoint")?;
        Checkpoint::from_json(&text).map_err(parse_error(path))
    }

    fn consistency_proof(
        &self,
        first_size: u64,
        last_size: u64,
        tree_id: &str,
    ) -> Result<ConsistencyProof, SourceError> {
        let (text, path) = read(&self.proof, "proof")?;
        tracing::debug!(first_size, last_size, tree_id, path = %path.display(), "loading proof");
        ConsistencyProof::from_json(&text).map_err(parse_error(path))
    }

    fn is_malformed(error: &SourceError) -> bool {
        matches!(error, SourceError::Parse { .. })
    }
}
