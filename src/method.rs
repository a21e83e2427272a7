//! Selection between the three clustering methods.

use std::fmt;

use clap::ValueEnum;
use rand::Rng;

use crate::clustering::Clustering;
use crate::error::Result;
use crate::hierarchical::hierarchical_cluster;
use crate::partition::partition_cluster;
use crate::random::random_cluster;
use crate::site::ActiveSite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Method {
    /// Exemplar relocation from random centers
    Partition,
    /// Average-linkage agglomeration
    Hierarchical,
    /// Uniform random labels (control)
    Random,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Partition, Method::Hierarchical, Method::Random];

    /// Cluster `sites` into `k` groups with this method.
    ///
    /// `max_iter` only applies to partition clustering; `rng` is not touched
    /// by hierarchical clustering.
    pub fn cluster<R: Rng + ?Sized>(
        self,
        sites: &[ActiveSite],
        k: usize,
        max_iter: usize,
        rng: &mut R,
    ) -> Result<Clustering> {
        match self {
            Method::Partition => partition_cluster(sites, k, max_iter, rng),
            Method::Hierarchical => hierarchical_cluster(sites, k),
            Method::Random => random_cluster(sites, k, rng),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::Partition => "partition",
            Method::Hierarchical => "hierarchical",
            Method::Random => "random",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
