//! Quality index: how much more similar clusters are inside than outside.

use tracing::debug;

use crate::clustering::Clustering;
use crate::error::{ClusterError, Result};
use crate::similarity::SimilarityMatrix;
use crate::site::{ActiveSite, SiteId};

/// Mean similarity over all unordered pairs of distinct members (`members.len() > 1`).
fn intra_similarity(matrix: &SimilarityMatrix, members: &[SiteId]) -> f64 {
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            sum += matrix.get(a, b);
            pairs += 1;
        }
    }
    sum / pairs as f64
}

/// `intra / extra` for each cluster.
///
/// `None` for clusters of size 0 or 1, and for clusters that share no residue
/// type with any site outside them (the ratio would be infinite). Fails when
/// a cluster of size > 1 holds every site, since there is no outside.
pub fn cluster_scores(sites: &[ActiveSite], clustering: &Clustering) -> Result<Vec<Option<f64>>> {
    let n = sites.len();
    let labels = clustering.labels(n)?;
    let matrix = SimilarityMatrix::build(sites)?;

    clustering
        .iter()
        .enumerate()
        .map(|(c, members)| {
            if members.len() <= 1 {
                return Ok(None);
            }
            let outside: Vec<SiteId> = (0..n).filter(|&s| labels[s] != c).collect();
            if outside.is_empty() {
                return Err(ClusterError::degenerate(format!(
                    "cluster {} holds every site; nothing to compare against",
                    c
                )));
            }
            let intra = intra_similarity(&matrix, members);
            let extra = matrix.mean_between(members, &outside);
            if extra == 0.0 {
                debug!(cluster = c, "cluster shares nothing with the rest; not scored");
                return Ok(None);
            }
            Ok(Some(intra / extra))
        })
        .collect()
}

/// Size-weighted mean of the per-cluster scores.
///
/// Unscored clusters (singletons, and clusters fully separated from the rest)
/// still count their sites in the denominator. Fails with
/// [`ClusterError::DegenerateClustering`] when no cluster can be scored.
pub fn quality_index(sites: &[ActiveSite], clustering: &Clustering) -> Result<f64> {
    let scores = cluster_scores(sites, clustering)?;

    let mut weighted = 0.0;
    let mut scored = 0usize;
    for (members, score) in clustering.iter().zip(&scores) {
        if let Some(score) = score {
            weighted += score * members.len() as f64;
            scored += 1;
        }
    }
    if scored == 0 {
        return Err(ClusterError::degenerate(
            "no cluster has more than one member and similarity to the rest",
        ));
    }

    Ok(weighted / clustering.total_sites() as f64)
}
