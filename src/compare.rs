//! Agreement between two clusterings of the same sites.
//!
//! Cluster labels are arbitrary, so the overlap is taken under the label
//! matching that agrees best. The matching is found by trying every
//! permutation, which limits this to small cluster counts.

use ndarray::Array2;

use crate::clustering::Clustering;
use crate::error::{ClusterError, Result};

/// Largest cluster count accepted for exhaustive matching.
pub const MAX_MATCHED_CLUSTERS: usize = 10;

/// `table[[i, j]]` counts sites in cluster `i` of `a` and cluster `j` of `b`.
pub fn contingency_table(a: &Clustering, b: &Clustering) -> Result<Array2<usize>> {
    let n = a.total_sites();
    let labels_a = a.labels(n)?;
    let labels_b = b.labels(n)?;

    let mut table = Array2::<usize>::zeros((a.len(), b.len()));
    for (&la, &lb) in labels_a.iter().zip(&labels_b) {
        table[[la, lb]] += 1;
    }
    Ok(table)
}

fn best_assignment(table: &Array2<usize>, row: usize, used: &mut [bool]) -> usize {
    if row == table.nrows() {
        return 0;
    }
    let mut best = 0;
    for col in 0..table.ncols() {
        if used[col] {
            continue;
        }
        used[col] = true;
        best = best.max(table[[row, col]] + best_assignment(table, row + 1, used));
        used[col] = false;
    }
    best
}

/// Most sites two clusterings can agree on under any relabelling of `b`.
///
/// Both must partition the same sites into the same number of clusters.
pub fn best_overlap(a: &Clustering, b: &Clustering) -> Result<usize> {
    if a.len() != b.len() {
        return Err(ClusterError::invalid(format!(
            "cannot match {} clusters against {}",
            a.len(),
            b.len()
        )));
    }
    if a.len() > MAX_MATCHED_CLUSTERS {
        return Err(ClusterError::invalid(format!(
            "{} clusters is too many for exhaustive matching (max {})",
            a.len(),
            MAX_MATCHED_CLUSTERS
        )));
    }

    let table = contingency_table(a, b)?;
    let mut used = vec![false; table.ncols()];
    Ok(best_assignment(&table, 0, &mut used))
}

/// [`best_overlap`] as a fraction of the number of sites.
pub fn overlap_fraction(a: &Clustering, b: &Clustering) -> Result<f64> {
    let total = a.total_sites();
    if total == 0 {
        return Err(ClusterError::invalid("clusterings hold no sites"));
    }
    Ok(best_overlap(a, b)? as f64 / total as f64)
}
