//! Jaccard similarity of residue-type composition.
//!
//! Only the set of residue types matters: how often a type occurs within a
//! site, and where the residues sit, are ignored.

use std::collections::BTreeSet;

use ndarray::Array2;
use tracing::debug;

use crate::error::{ClusterError, Result};
use crate::site::{ActiveSite, SiteId};

/// `|A ∩ B| / |A ∪ B|` for two non-empty-union sets.
#[inline]
fn jaccard(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Similarity of two active sites in `[0, 1]`.
///
/// Fails with [`ClusterError::EmptyComposition`] when neither site has any
/// residues, since the ratio is then undefined.
pub fn similarity(a: &ActiveSite, b: &ActiveSite) -> Result<f64> {
    let types_a = a.residue_types();
    let types_b = b.residue_types();
    if types_a.is_empty() && types_b.is_empty() {
        return Err(ClusterError::EmptyComposition {
            site: a.name.clone(),
        });
    }
    Ok(jaccard(&types_a, &types_b))
}

/// All pairwise similarities of a site slice, indexed by [`SiteId`].
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    values: Array2<f64>,
}

impl SimilarityMatrix {
    /// Compute every pair once.
    ///
    /// A site without residues has no defined self-similarity, so any such
    /// site makes the whole build fail.
    pub fn build(sites: &[ActiveSite]) -> Result<Self> {
        let n = sites.len();
        if let Some(empty) = sites.iter().find(|s| s.is_empty()) {
            return Err(ClusterError::EmptyComposition {
                site: empty.name.clone(),
            });
        }

        let types: Vec<BTreeSet<&str>> = sites.iter().map(ActiveSite::residue_types).collect();
        let mut values = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            values[[i, i]] = 1.0;
            for j in (i + 1)..n {
                let s = jaccard(&types[i], &types[j]);
                values[[i, j]] = s;
                values[[j, i]] = s;
            }
        }
        debug!(sites = n, "built similarity matrix");

        Ok(SimilarityMatrix { values })
    }

    #[inline]
    pub fn get(&self, a: SiteId, b: SiteId) -> f64 {
        self.values[[a, b]]
    }

    /// Number of sites covered.
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// Mean similarity over every cross pair of two disjoint member lists.
    pub fn mean_between(&self, a: &[SiteId], b: &[SiteId]) -> f64 {
        let mut sum = 0.0;
        for &x in a {
            for &y in b {
                sum += self.get(x, y);
            }
        }
        sum / (a.len() * b.len()) as f64
    }
}
