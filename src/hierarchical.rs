//! Agglomerative clustering with average linkage.
//!
//! Starts from singletons and repeatedly merges the two most similar clusters
//! until the requested number remains. Every merge is kept as a binary node,
//! so the dendrogram can be walked after the fact.

use tracing::{debug, info};

use crate::clustering::Clustering;
use crate::error::{check_cluster_count, Result};
use crate::similarity::SimilarityMatrix;
use crate::site::{ActiveSite, SiteId};

/// A node of the merge tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterNode {
    Leaf(SiteId),
    Merge(Box<ClusterNode>, Box<ClusterNode>),
}

impl ClusterNode {
    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<SiteId> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<SiteId>) {
        match self {
            ClusterNode::Leaf(site) => out.push(*site),
            ClusterNode::Merge(left, right) => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }

    pub fn size(&self) -> usize {
        match self {
            ClusterNode::Leaf(_) => 1,
            ClusterNode::Merge(left, right) => left.size() + right.size(),
        }
    }

    /// Number of merges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            ClusterNode::Leaf(_) => 0,
            ClusterNode::Merge(left, right) => 1 + left.depth().max(right.depth()),
        }
    }
}

/// One agglomeration step.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    /// Positions of the merged nodes in the node list at the time of the merge (`left < right`)
    pub left: usize,
    pub right: usize,
    /// Average similarity between the two merged clusters
    pub linkage: f64,
    /// Number of sites in the new cluster
    pub size: usize,
}

/// Result of agglomeration: the remaining top-level trees and how they were built.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    pub roots: Vec<ClusterNode>,
    pub merges: Vec<Merge>,
}

impl Dendrogram {
    /// Flatten every top-level tree into one cluster.
    pub fn into_clustering(self) -> Clustering {
        Clustering::new(self.roots.iter().map(ClusterNode::leaves).collect())
    }

    /// The clustering after every step of the merge history.
    ///
    /// Starts with one singleton per site and ends with the top-level trees,
    /// so the clustering at index `i` has `n - i` clusters.
    pub fn levels(&self) -> Vec<Clustering> {
        let n: usize = self.roots.iter().map(ClusterNode::size).sum();
        let mut clusters: Vec<Vec<SiteId>> = (0..n).map(|s| vec![s]).collect();
        let mut levels = Vec::with_capacity(self.merges.len() + 1);
        levels.push(Clustering::new(clusters.clone()));

        for merge in &self.merges {
            let right = clusters.remove(merge.right);
            let mut merged = clusters.remove(merge.left);
            merged.extend(right);
            clusters.push(merged);
            levels.push(Clustering::new(clusters.clone()));
        }
        levels
    }
}

/// The first pair `(i, j)`, `i < j` in row-major order with maximal linkage.
fn most_similar_pair(matrix: &SimilarityMatrix, leaves: &[Vec<SiteId>]) -> (usize, usize, f64) {
    let mut best = (0, 1, f64::NEG_INFINITY);
    for i in 0..leaves.len() {
        for j in (i + 1)..leaves.len() {
            let linkage = matrix.mean_between(&leaves[i], &leaves[j]);
            if linkage > best.2 {
                best = (i, j, linkage);
            }
        }
    }
    best
}

/// Agglomerate `sites` down to `k` top-level clusters, keeping the merge history.
pub fn agglomerate(sites: &[ActiveSite], k: usize) -> Result<Dendrogram> {
    check_cluster_count(k, sites.len())?;
    let matrix = SimilarityMatrix::build(sites)?;

    let mut nodes: Vec<ClusterNode> = (0..sites.len()).map(ClusterNode::Leaf).collect();
    // leaves[i] mirrors nodes[i].leaves()
    let mut leaves: Vec<Vec<SiteId>> = (0..sites.len()).map(|s| vec![s]).collect();
    let mut merges = Vec::with_capacity(sites.len() - k);

    while nodes.len() > k {
        let (i, j, linkage) = most_similar_pair(&matrix, &leaves);

        // j > i, so removing j first leaves i in place
        let right = nodes.remove(j);
        let left = nodes.remove(i);
        let mut merged_leaves = leaves.remove(i);
        merged_leaves.extend(leaves.remove(j - 1));

        debug!(left = i, right = j, linkage, size = merged_leaves.len(), "merging clusters");
        merges.push(Merge {
            left: i,
            right: j,
            linkage,
            size: merged_leaves.len(),
        });

        nodes.push(ClusterNode::Merge(Box::new(left), Box::new(right)));
        leaves.push(merged_leaves);
    }
    info!(k, merges = merges.len(), "hierarchical clustering done");

    Ok(Dendrogram {
        roots: nodes,
        merges,
    })
}

/// Average-linkage hierarchical clustering into exactly `k` non-empty clusters.
pub fn hierarchical_cluster(sites: &[ActiveSite], k: usize) -> Result<Clustering> {
    Ok(agglomerate(sites, k)?.into_clustering())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;
    use approx::assert_relative_eq;

    fn fixtures() -> Vec<ActiveSite> {
        vec![
            ActiveSite::from_kinds("276", ["ASP", "CYS"]),
            ActiveSite::from_kinds(
                "4629",
                ["ASP", "GLU", "HIS", "LYS", "ARG", "SER", "THR"],
            ),
            ActiveSite::from_kinds("10701", ["HIS", "ASP", "GLU", "ASP"]),
        ]
    }

    #[test]
    fn test_most_similar_pair_merges_first() {
        let c = hierarchical_cluster(&fixtures(), 2).unwrap();
        assert_eq!(c.clusters(), &[vec![0], vec![1, 2]]);
    }

    #[test]
    fn test_k_equals_n_is_singletons() {
        let c = hierarchical_cluster(&fixtures(), 3).unwrap();
        assert_eq!(c.clusters(), &[vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_single_cluster_and_history() {
        let d = agglomerate(&fixtures(), 1).unwrap();
        assert_eq!(d.roots.len(), 1);
        assert_eq!(d.merges.len(), 2);

        assert_eq!((d.merges[0].left, d.merges[0].right), (1, 2));
        assert_relative_eq!(d.merges[0].linkage, 3.0 / 7.0);
        // second merge: 276 against {4629, 10701}
        assert_eq!((d.merges[1].left, d.merges[1].right), (0, 1));
        assert_relative_eq!(d.merges[1].linkage, (0.125 + 0.25) / 2.0);
        assert_eq!(d.merges[1].size, 3);

        let root = &d.roots[0];
        assert_eq!(root.size(), 3);
        assert_eq!(root.depth(), 2);
        assert_eq!(root.leaves(), vec![0, 1, 2]);
        assert_eq!(
            root,
            &ClusterNode::Merge(
                Box::new(ClusterNode::Leaf(0)),
                Box::new(ClusterNode::Merge(
                    Box::new(ClusterNode::Leaf(1)),
                    Box::new(ClusterNode::Leaf(2)),
                )),
            )
        );
    }

    #[test]
    fn test_levels_replay_history() {
        let d = agglomerate(&fixtures(), 1).unwrap();
        let levels = d.levels();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].clusters(), &[vec![0], vec![1], vec![2]]);
        assert_eq!(levels[1].clusters(), &[vec![0], vec![1, 2]]);
        assert_eq!(levels[2].clusters(), &[vec![0, 1, 2]]);
        assert_eq!(levels.last(), Some(&d.into_clustering()));
    }

    #[test]
    fn test_levels_match_direct_clustering() {
        let sites = vec![
            ActiveSite::from_kinds("a1", ["ASP", "GLU", "HIS"]),
            ActiveSite::from_kinds("b1", ["CYS", "TRP", "PHE"]),
            ActiveSite::from_kinds("a2", ["ASP", "GLU", "HIS", "LYS"]),
            ActiveSite::from_kinds("b2", ["CYS", "TRP", "PHE", "TYR"]),
            ActiveSite::from_kinds("a3", ["ASP", "HIS", "LYS"]),
        ];
        let d = agglomerate(&sites, 2).unwrap();
        let levels = d.levels();
        assert_eq!(levels.len(), 4);
        for level in &levels {
            assert_eq!(level, &hierarchical_cluster(&sites, level.len()).unwrap());
        }
    }

    #[test]
    fn test_ties_resolve_row_major() {
        // all pairs have similarity 0: the first pair (0, 1) merges
        let sites = vec![
            ActiveSite::from_kinds("a", ["ALA"]),
            ActiveSite::from_kinds("b", ["GLY"]),
            ActiveSite::from_kinds("c", ["PRO"]),
        ];
        let c = hierarchical_cluster(&sites, 2).unwrap();
        assert_eq!(c.clusters(), &[vec![2], vec![0, 1]]);
    }

    #[test]
    fn test_identical_sites_stay_distinct() {
        let sites = vec![
            ActiveSite::from_kinds("x", ["SER", "HIS"]),
            ActiveSite::from_kinds("y", ["SER", "HIS"]),
            ActiveSite::from_kinds("z", ["CYS"]),
        ];
        let c = hierarchical_cluster(&sites, 2).unwrap();
        assert_eq!(c.clusters(), &[vec![2], vec![0, 1]]);
        assert!(c.is_partition_of(3));
    }

    #[test]
    fn test_clusters_are_non_empty_partitions() {
        let sites = vec![
            ActiveSite::from_kinds("a1", ["ASP", "GLU", "HIS"]),
            ActiveSite::from_kinds("b1", ["CYS", "TRP", "PHE"]),
            ActiveSite::from_kinds("a2", ["ASP", "GLU", "HIS", "LYS"]),
            ActiveSite::from_kinds("b2", ["CYS", "TRP", "PHE", "TYR"]),
            ActiveSite::from_kinds("a3", ["ASP", "HIS", "LYS"]),
        ];
        for k in 1..=sites.len() {
            let c = hierarchical_cluster(&sites, k).unwrap();
            assert_eq!(c.len(), k);
            assert!(c.is_partition_of(sites.len()));
            assert!(c.iter().all(|cluster| !cluster.is_empty()));
        }
    }

    #[test]
    fn test_invalid_cluster_count() {
        assert!(matches!(
            hierarchical_cluster(&fixtures(), 0),
            Err(ClusterError::InvalidParameter(_))
        ));
        assert!(matches!(
            hierarchical_cluster(&fixtures(), 4),
            Err(ClusterError::InvalidParameter(_))
        ));
    }
}
