//! Cluster protein active sites by the residue types they contain.
//!
//! Sites are compared by the Jaccard similarity of their residue-type sets and
//! grouped by partition clustering (exemplar relocation), average-linkage
//! hierarchical clustering, or random assignment as a control. The quality
//! index scores a clustering; sweeps over k and best-match overlap compare
//! the methods.
//!
//! All clustering code refers to sites by [`SiteId`], their index in the
//! slice passed in, so identical compositions at different positions are
//! never confused.

pub mod clustering;
pub mod compare;
pub mod error;
pub mod hierarchical;
pub mod io;
pub mod method;
pub mod partition;
pub mod quality;
pub mod random;
pub mod similarity;
pub mod site;
pub mod sweep;

pub use clustering::Clustering;
pub use compare::{best_overlap, overlap_fraction, MAX_MATCHED_CLUSTERS};
pub use error::{ClusterError, Result};
pub use hierarchical::{agglomerate, hierarchical_cluster, ClusterNode, Dendrogram, Merge};
pub use method::Method;
pub use partition::{partition_cluster, partition_from_centers, DEFAULT_MAX_ITERATIONS};
pub use quality::{cluster_scores, quality_index};
pub use random::random_cluster;
pub use similarity::{similarity, SimilarityMatrix};
pub use site::{ActiveSite, Residue, SiteId};
pub use sweep::{elbow_point, mean_quality_by_k, sweep, SweepConfig, SweepPoint};
