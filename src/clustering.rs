//! The result type shared by every clustering method.

use crate::error::{ClusterError, Result};
use crate::site::{ActiveSite, SiteId};

/// A list of clusters, each a list of site handles.
///
/// A valid clustering partitions the site slice it was built from: every
/// handle appears in exactly one cluster. Clusters may be empty (random
/// control) and keep their members in a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering {
    clusters: Vec<Vec<SiteId>>,
}

impl Clustering {
    pub fn new(clusters: Vec<Vec<SiteId>>) -> Self {
        Clustering { clusters }
    }

    /// Group sites by label; cluster `c` lists the sites labelled `c` in index order.
    pub fn from_labels(labels: &[usize], k: usize) -> Self {
        let mut clusters = vec![Vec::new(); k];
        for (site, &label) in labels.iter().enumerate() {
            clusters[label].push(site);
        }
        Clustering { clusters }
    }

    /// Number of clusters, empty ones included.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn clusters(&self) -> &[Vec<SiteId>] {
        &self.clusters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<SiteId>> {
        self.clusters.iter()
    }

    pub fn into_inner(self) -> Vec<Vec<SiteId>> {
        self.clusters
    }

    /// Total number of memberships over all clusters.
    pub fn total_sites(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Vec::len).collect()
    }

    /// Per-site cluster label; fails unless this is a partition of `0..n`.
    pub fn labels(&self, n: usize) -> Result<Vec<usize>> {
        let mut labels: Vec<Option<usize>> = vec![None; n];
        for (c, cluster) in self.clusters.iter().enumerate() {
            for &site in cluster {
                match labels.get_mut(site) {
                    None => {
                        return Err(ClusterError::invalid(format!(
                            "site {} is out of range for {} sites",
                            site, n
                        )))
                    }
                    Some(Some(_)) => {
                        return Err(ClusterError::invalid(format!(
                            "site {} appears in more than one cluster",
                            site
                        )))
                    }
                    Some(slot) => *slot = Some(c),
                }
            }
        }
        labels
            .into_iter()
            .enumerate()
            .map(|(site, label)| {
                label.ok_or_else(|| {
                    ClusterError::invalid(format!("site {} is not in any cluster", site))
                })
            })
            .collect()
    }

    /// True when every site in `0..n` appears in exactly one cluster.
    pub fn is_partition_of(&self, n: usize) -> bool {
        self.labels(n).is_ok()
    }

    /// Resolve handles to site names, cluster by cluster.
    ///
    /// Fails unless this clustering partitions `sites`.
    pub fn names<'a>(&self, sites: &'a [ActiveSite]) -> Result<Vec<Vec<&'a str>>> {
        self.labels(sites.len())?;
        Ok(self
            .clusters
            .iter()
            .map(|c| c.iter().map(|&id| sites[id].name.as_str()).collect())
            .collect())
    }
}

impl<'a> IntoIterator for &'a Clustering {
    type Item = &'a Vec<SiteId>;
    type IntoIter = std::slice::Iter<'a, Vec<SiteId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_labels() {
        let c = Clustering::from_labels(&[1, 0, 1, 2], 4);
        assert_eq!(c.clusters(), &[vec![1], vec![0, 2], vec![3], vec![]]);
        assert_eq!(c.len(), 4);
        assert_eq!(c.total_sites(), 4);
        assert_eq!(c.sizes(), vec![1, 2, 1, 0]);
    }

    #[test]
    fn test_labels_roundtrip() {
        let c = Clustering::new(vec![vec![2, 0], vec![1]]);
        assert_eq!(c.labels(3).unwrap(), vec![0, 1, 0]);
        assert!(c.is_partition_of(3));
    }

    #[test]
    fn test_partition_violations() {
        let duplicated = Clustering::new(vec![vec![0, 1], vec![1]]);
        assert!(!duplicated.is_partition_of(2));

        let missing = Clustering::new(vec![vec![0], vec![]]);
        assert!(!missing.is_partition_of(2));

        let out_of_range = Clustering::new(vec![vec![0, 5]]);
        assert!(!out_of_range.is_partition_of(2));
    }

    #[test]
    fn test_names() {
        let sites = vec![
            ActiveSite::from_kinds("276", ["ASP"]),
            ActiveSite::from_kinds("4629", ["HIS"]),
        ];
        let c = Clustering::new(vec![vec![1], vec![0]]);
        assert_eq!(c.names(&sites).unwrap(), vec![vec!["4629"], vec!["276"]]);

        // built for a larger site list
        let c = Clustering::new(vec![vec![0, 2], vec![1]]);
        assert!(matches!(
            c.names(&sites),
            Err(ClusterError::InvalidParameter(_))
        ));
    }
}
