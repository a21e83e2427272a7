//! Random clustering, the control baseline for the quality index.

use rand::prelude::*;
use tracing::debug;

use crate::clustering::Clustering;
use crate::error::{check_cluster_count, Result};
use crate::site::ActiveSite;

/// Give each site a uniformly random label in `0..k`.
///
/// Clusters may come out empty; the result still has exactly `k` of them.
pub fn random_cluster<R: Rng + ?Sized>(
    sites: &[ActiveSite],
    k: usize,
    rng: &mut R,
) -> Result<Clustering> {
    check_cluster_count(k, sites.len())?;
    let labels: Vec<usize> = (0..sites.len()).map(|_| rng.gen_range(0..k)).collect();
    debug!(k, ?labels, "random clustering");
    Ok(Clustering::from_labels(&labels, k))
}
