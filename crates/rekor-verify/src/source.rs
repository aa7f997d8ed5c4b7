//! The collaborator that supplies log data to the verifier

use rekor_types::{Checkpoint, ConsistencyProof, LogEntry};

/// A supplier of already-fetched Rekor log data
///
/// Implementations may read saved API responses, query a live log, or serve
/// fixtures. The verifier never retries a failed call. An error becomes
/// [`Error::InputUnavailable`](crate::Error::InputUnavailable) unless
/// [`LogSource::is_malformed`] says the data arrived but could not be decoded,
/// in which case it is reported as malformed data of the requested kind.
pub trait LogSource {
    /// Error reported when data cannot be supplied
    type Error: std::error::Error + Send + Sync + 'static;

    /// The entry at global log index `index`
    fn entry_by_index(&self, index: u64) -> Result<LogEntry, Self::Error>;

    /// The latest checkpoint of the log
    fn latest_checkpoint(&self) -> Result<Checkpoint, Self::Error>;

    /// A consistency proof from `first_size` to `last_size` for tree `tree_id`
    fn consistency_proof(
        &self,
        first_size: u64,
        last_size: u64,
        tree_id: &str,
    ) -> Result<ConsistencyProof, Self::Error>;

    /// Whether `error` means the data was supplied but is not well formed
    fn is_malformed(error: &Self::Error) -> bool {
        let _ = error;
        false
    }
}
