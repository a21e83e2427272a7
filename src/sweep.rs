//! Quality-versus-k sweeps used to pick the number of clusters.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{info, warn};

use crate::error::{ClusterError, Result};
use crate::method::Method;
use crate::partition::DEFAULT_MAX_ITERATIONS;
use crate::quality::quality_index;
use crate::site::ActiveSite;

/// Range of cluster counts and repetitions for a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Smallest k tried (default: 2)
    pub k_min: usize,
    /// Largest k tried, clamped to the number of sites (default: 20)
    pub k_max: usize,
    /// Runs per k (default: 5)
    pub trials: usize,
    /// Iteration cap handed to partition clustering (default: 300)
    pub max_iter: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            k_min: 2,
            k_max: 20,
            trials: 5,
            max_iter: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// One scored run of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub method: Method,
    pub k: usize,
    pub trial: usize,
    pub quality: f64,
}

/// Cluster `sites` with `method` for every k and trial in `config` and score each run.
///
/// Runs whose quality is undefined (no cluster could be scored), or partition
/// runs that do not converge, are logged and left out; any other error ends
/// the sweep.
pub fn sweep<R: Rng + ?Sized>(
    method: Method,
    sites: &[ActiveSite],
    config: &SweepConfig,
    rng: &mut R,
) -> Result<Vec<SweepPoint>> {
    if config.k_min == 0 || config.k_min > config.k_max {
        return Err(ClusterError::invalid(format!(
            "k range {}..={} is empty or starts at 0",
            config.k_min, config.k_max
        )));
    }
    if config.trials == 0 {
        return Err(ClusterError::invalid("sweep needs at least one trial"));
    }

    let k_max = config.k_max.min(sites.len());
    let mut points = Vec::new();
    for k in config.k_min..=k_max {
        for trial in 0..config.trials {
            let scored = method
                .cluster(sites, k, config.max_iter, rng)
                .and_then(|clustering| quality_index(sites, &clustering));
            match scored {
                Ok(quality) => points.push(SweepPoint {
                    method,
                    k,
                    trial,
                    quality,
                }),
                Err(
                    e @ (ClusterError::DegenerateClustering(_)
                    | ClusterError::ConvergenceFailure { .. }),
                ) => {
                    warn!(%method, k, trial, "skipping run: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
    }
    info!(%method, points = points.len(), "sweep done");

    Ok(points)
}

/// Mean quality per k, in increasing k.
pub fn mean_quality_by_k(points: &[SweepPoint]) -> Vec<(usize, f64)> {
    let mut by_k: BTreeMap<usize, (f64, usize)> = BTreeMap::new();
    for p in points {
        let entry = by_k.entry(p.k).or_insert((0.0, 0));
        entry.0 += p.quality;
        entry.1 += 1;
    }
    by_k
        .into_iter()
        .map(|(k, (sum, count))| (k, sum / count as f64))
        .collect()
}

/// The k after which adding clusters stops paying off.
///
/// Takes the mean quality per k and returns the first k, at or after the
/// steepest rise, whose next step gains less than half of that rise. `None`
/// when there are fewer than three k values or quality never rises.
pub fn elbow_point(points: &[SweepPoint]) -> Option<usize> {
    let curve = mean_quality_by_k(points);
    if curve.len() < 3 {
        return None;
    }
    let gains: Vec<f64> = curve.windows(2).map(|w| w[1].1 - w[0].1).collect();

    let (steepest, max_gain) = gains
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, g)| {
            if g > best.1 {
                (i, g)
            } else {
                best
            }
        });
    if max_gain <= 0.0 {
        return None;
    }

    gains[steepest..]
        .iter()
        .position(|&g| g < max_gain / 2.0)
        .map(|offset| curve[steepest + offset].0)
}
