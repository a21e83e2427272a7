use rand::rngs::StdRng;
use rand::SeedableRng;

use site_cluster::io::read_active_sites_from;
use site_cluster::{
    agglomerate, hierarchical_cluster, partition_cluster, quality_index, random_cluster, similarity,
    ActiveSite, ClusterError, Clustering, DEFAULT_MAX_ITERATIONS,
};

/// Residue tables for the sites 276, 4629 and 10701.
const FIXTURE: &str = "site\tresidue\tnumber\tchain\n\
    276\tASP\t105\tA\n\
    276\tCYS\t165\tA\n\
    4629\tASP\t18\tA\n\
    4629\tGLU\t21\tA\n\
    4629\tHIS\t59\tA\n\
    4629\tLYS\t64\tA\n\
    4629\tARG\t88\tA\n\
    4629\tSER\t92\tA\n\
    4629\tTHR\t120\tA\n\
    10701\tHIS\t57\tB\n\
    10701\tASP\t102\tB\n\
    10701\tGLU\t189\tB\n\
    10701\tASP\t194\tB\n";

fn load() -> Vec<ActiveSite> {
    read_active_sites_from(FIXTURE.as_bytes()).unwrap()
}

fn assert_partition(c: &Clustering, n: usize) {
    let mut seen: Vec<usize> = c.iter().flatten().copied().collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..n).collect::<Vec<_>>(), "not a partition: {:?}", c);
}

#[test]
fn similarity_of_known_sites() {
    let s = load();
    assert_eq!(similarity(&s[0], &s[1]).unwrap(), 0.125);
    assert_eq!(similarity(&s[1], &s[2]).unwrap(), 3.0 / 7.0);
    assert_eq!(similarity(&s[0], &s[2]).unwrap(), 0.25);

    assert_eq!(similarity(&s[0], &s[0]).unwrap(), 1.0);
    assert_eq!(
        similarity(&s[0], &s[1]).unwrap(),
        similarity(&s[1], &s[0]).unwrap()
    );
    assert!(
        similarity(&s[0], &s[1]).unwrap() + similarity(&s[1], &s[2]).unwrap()
            >= similarity(&s[0], &s[2]).unwrap()
    );
}

#[test]
fn partition_cluster_counts() {
    let s = load();
    let mut rng = StdRng::seed_from_u64(2024);
    for k in [2, 3] {
        let c = partition_cluster(&s, k, DEFAULT_MAX_ITERATIONS, &mut rng).unwrap();
        assert_eq!(c.len(), k);
        assert_partition(&c, s.len());
    }
}

#[test]
fn partition_reproducible() {
    let s = load();
    for seed in 0..10 {
        let a = partition_cluster(&s, 2, DEFAULT_MAX_ITERATIONS, &mut StdRng::seed_from_u64(seed));
        let b = partition_cluster(&s, 2, DEFAULT_MAX_ITERATIONS, &mut StdRng::seed_from_u64(seed));
        assert_eq!(a.unwrap(), b.unwrap());
    }
}

#[test]
fn hierarchical_groups_most_similar_pair() {
    let s = load();
    let c = hierarchical_cluster(&s, 2).unwrap();
    assert_eq!(c.clusters(), &[vec![0], vec![1, 2]]);
    assert_eq!(c.names(&s).unwrap(), vec![vec!["276"], vec!["4629", "10701"]]);
}

#[test]
fn hierarchy_levels_from_singletons_to_one() {
    let s = load();
    let levels = agglomerate(&s, 1).unwrap().levels();
    let ks: Vec<usize> = levels.iter().map(|c| c.len()).collect();
    assert_eq!(ks, vec![3, 2, 1]);
    assert_eq!(levels[1], hierarchical_cluster(&s, 2).unwrap());
    for level in &levels {
        assert_partition(level, s.len());
    }
}

#[test]
fn every_method_partitions() {
    let s = load();
    let mut rng = StdRng::seed_from_u64(1);
    for k in 1..=3 {
        let p = partition_cluster(&s, k, DEFAULT_MAX_ITERATIONS, &mut rng).unwrap();
        let h = hierarchical_cluster(&s, k).unwrap();
        let r = random_cluster(&s, k, &mut rng).unwrap();
        for c in [&p, &h, &r] {
            assert_eq!(c.len(), k);
            assert_partition(c, s.len());
        }
        assert!(h.iter().all(|cluster| !cluster.is_empty()));
    }
}

#[test]
fn quality_on_all_singletons_is_an_error() {
    let s = load();
    let c = hierarchical_cluster(&s, 3).unwrap();
    assert!(matches!(
        quality_index(&s, &c),
        Err(ClusterError::DegenerateClustering(_))
    ));
}

#[test]
fn quality_is_repeatable() {
    let s = load();
    let c = hierarchical_cluster(&s, 2).unwrap();
    let q1 = quality_index(&s, &c).unwrap();
    let q2 = quality_index(&s, &c).unwrap();
    assert_eq!(q1, q2);
    assert!(q1 > 0.0);
}
