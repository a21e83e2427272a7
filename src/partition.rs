//! Partition clustering: random-seeded exemplar relocation.
//!
//! A k-medoids variant that maximises similarity. Centers are always real
//! sites (exemplars), since residue composition has no meaningful average.

use rand::prelude::*;
use tracing::{debug, info};

use crate::clustering::Clustering;
use crate::error::{check_cluster_count, ClusterError, Result};
use crate::similarity::SimilarityMatrix;
use crate::site::{ActiveSite, SiteId};

/// Iteration cap used when the caller has no preference.
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// One refinement state: the centers and the member lists they induce.
///
/// Member lists keep assignment order, which is the order exemplar ties are
/// broken in on the next update.
#[derive(Debug, Clone, PartialEq)]
struct Partition {
    centers: Vec<SiteId>,
    clusters: Vec<Vec<SiteId>>,
}

impl Partition {
    /// Assign the sites of `order` to their most similar center, appending in
    /// that order.
    ///
    /// A center always lands in its own cluster without being compared.
    fn assign<I>(matrix: &SimilarityMatrix, centers: Vec<SiteId>, order: I) -> Self
    where
        I: IntoIterator<Item = SiteId>,
    {
        let mut clusters: Vec<Vec<SiteId>> = vec![Vec::new(); centers.len()];
        for site in order {
            if let Some(own) = centers.iter().position(|&c| c == site) {
                clusters[own].push(site);
                continue;
            }
            let mut best_cluster = 0;
            let mut best_sim = f64::NEG_INFINITY;
            for (ci, &center) in centers.iter().enumerate() {
                let sim = matrix.get(site, center);
                if sim > best_sim {
                    best_sim = sim;
                    best_cluster = ci;
                }
            }
            clusters[best_cluster].push(site);
        }

        Partition { centers, clusters }
    }

    /// Move each center to its cluster's exemplar, then reassign every site,
    /// walking the current clusters one after another.
    fn update(&self, matrix: &SimilarityMatrix) -> Self {
        let centers = self
            .clusters
            .iter()
            .zip(&self.centers)
            .map(|(members, &previous)| exemplar(matrix, members).unwrap_or(previous))
            .collect();

        Self::assign(matrix, centers, self.clusters.iter().flatten().copied())
    }
}

/// The member with the highest mean similarity to its whole cluster, itself
/// included.
///
/// The first member in list order wins ties; a singleton is its own exemplar.
/// `None` only for an empty cluster.
fn exemplar(matrix: &SimilarityMatrix, members: &[SiteId]) -> Option<SiteId> {
    let mut best: Option<(SiteId, f64)> = None;
    for &site in members {
        let mut sum = 0.0;
        for &other in members {
            sum += matrix.get(site, other);
        }
        let mean = sum / members.len() as f64;
        match best {
            Some((_, best_mean)) if mean <= best_mean => {}
            _ => best = Some((site, mean)),
        }
    }
    best.map(|(site, _)| site)
}

/// Apply `step` from `seed` until the member lists stop changing.
///
/// A state that comes back after two steps (a 2-cycle) is accepted as
/// converged too. After `max_iter` steps without either, the run fails.
fn refine<F>(seed: Partition, max_iter: usize, step: F) -> Result<Partition>
where
    F: Fn(&Partition) -> Partition,
{
    let mut current = seed;
    let mut next = step(&current);

    for iteration in 1..=max_iter {
        if next.clusters == current.clusters {
            debug!(iteration, "partition reached a fixed point");
            return Ok(current);
        }
        let after = step(&next);
        if after.clusters == current.clusters {
            debug!(iteration, "partition settled into a 2-cycle");
            return Ok(current);
        }
        debug!(iteration, centers = ?next.centers, "partition moved");
        current = next;
        next = after;
    }

    Err(ClusterError::ConvergenceFailure {
        iterations: max_iter,
    })
}

/// Partition clustering from explicitly chosen initial centers.
///
/// `centers` must be distinct, in range, and give `1 <= k <= sites.len()`.
pub fn partition_from_centers(
    sites: &[ActiveSite],
    centers: &[SiteId],
    max_iter: usize,
) -> Result<Clustering> {
    let n = sites.len();
    let k = centers.len();
    check_cluster_count(k, n)?;
    if max_iter == 0 {
        return Err(ClusterError::invalid("max_iter must be at least 1"));
    }
    for (i, &c) in centers.iter().enumerate() {
        if c >= n {
            return Err(ClusterError::invalid(format!(
                "center {} is out of range for {} sites",
                c, n
            )));
        }
        if centers[..i].contains(&c) {
            return Err(ClusterError::invalid(format!("center {} chosen twice", c)));
        }
    }

    let matrix = SimilarityMatrix::build(sites)?;
    let seed = Partition::assign(&matrix, centers.to_vec(), 0..n);
    let converged = refine(seed, max_iter, |p| p.update(&matrix))?;
    info!(k, exemplars = ?converged.centers, "partition clustering done");

    Ok(Clustering::new(converged.clusters))
}

/// Partition clustering seeded with `k` distinct random centers.
pub fn partition_cluster<R: Rng + ?Sized>(
    sites: &[ActiveSite],
    k: usize,
    max_iter: usize,
    rng: &mut R,
) -> Result<Clustering> {
    check_cluster_count(k, sites.len())?;

    // Randomly select k initial centers
    let mut indices: Vec<SiteId> = (0..sites.len()).collect();
    indices.shuffle(rng);
    indices.truncate(k);

    partition_from_centers(sites, &indices, max_iter)
}
