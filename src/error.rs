//! Error types for active-site clustering.

use thiserror::Error;

/// Errors surfaced by the clustering core and its TSV layer.
///
/// Every variant is recoverable by the caller; nothing here aborts the process.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// Cluster count (or another argument) outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Similarity is undefined because a site has no residue types
    #[error("Active site '{site}' has no residues; similarity is undefined")]
    EmptyComposition { site: String },

    /// Partition refinement hit the iteration cap without reaching a fixed point
    #[error("Partition clustering did not converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    /// Quality index requested on a clustering it cannot score
    #[error("Degenerate clustering: {0}")]
    DegenerateClustering(String),

    /// Input table row that cannot be turned into a residue
    #[error("Malformed input at record {record}: {message}")]
    MalformedInput { record: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ClusterError {
    /// Creates an invalid-parameter error.
    pub fn invalid(message: impl Into<String>) -> Self {
        ClusterError::InvalidParameter(message.into())
    }

    /// Creates a degenerate-clustering error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        ClusterError::DegenerateClustering(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Check `1 <= k <= n`, the precondition shared by every clustering method.
pub(crate) fn check_cluster_count(k: usize, n: usize) -> Result<()> {
    if k == 0 {
        return Err(ClusterError::invalid("cluster count must be at least 1"));
    }
    if k > n {
        return Err(ClusterError::invalid(format!(
            "Not enough active sites ({}) for {} clusters",
            n, k
        )));
    }
    Ok(())
}
