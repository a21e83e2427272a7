//main.rs
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use site_cluster::io::{read_active_sites, write_clustering, write_levels, write_sweep};
use site_cluster::{
    agglomerate, elbow_point, mean_quality_by_k, overlap_fraction, quality_index, sweep, ClusterError, Method,
    SweepConfig, DEFAULT_MAX_ITERATIONS,
};

#[derive(Parser)]
#[clap(version, about = "Cluster protein active sites by residue composition")]
struct Opts {
    /// Seed for center selection and random clustering (default: from entropy)
    #[clap(long, global = true)]
    seed: Option<u64>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cluster once and report the quality index
    Cluster {
        /// Residue table (site, residue, number, chain)
        #[clap(short, long)]
        input: PathBuf,

        #[clap(short, long, value_enum, default_value_t = Method::Partition)]
        method: Method,

        #[clap(short)]
        k: usize,

        /// Clustering table to write (default: stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,

        #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iter: usize,
    },
    /// Score every method over a range of k
    Sweep {
        #[clap(short, long)]
        input: PathBuf,

        /// Methods to sweep (default: all)
        #[clap(short, long, value_enum)]
        method: Vec<Method>,

        #[clap(long, default_value_t = 2)]
        k_min: usize,

        #[clap(long, default_value_t = 20)]
        k_max: usize,

        #[clap(long, default_value_t = 5)]
        trials: usize,

        #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iter: usize,

        /// Sweep table to write (default: stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Hierarchical clustering at every k from one cluster per site down to k_min
    Levels {
        #[clap(short, long)]
        input: PathBuf,

        #[clap(long, default_value_t = 1)]
        k_min: usize,

        /// Levels table to write (default: stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Best-match overlap between methods at a fixed k
    Compare {
        #[clap(short, long)]
        input: PathBuf,

        #[clap(short)]
        k: usize,

        #[clap(long, default_value_t = 5)]
        trials: usize,

        #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iter: usize,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn output_writer(path: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(File::create(p)?),
        None => Box::new(std::io::stdout().lock()),
    })
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match opts.command {
        Command::Cluster {
            input,
            method,
            k,
            output,
            max_iter,
        } => {
            let sites = read_active_sites(&input)?;
            let clustering = method.cluster(&sites, k, max_iter, &mut rng)?;
            info!(%method, k, sizes = ?clustering.sizes(), "clustered {} sites", sites.len());

            match quality_index(&sites, &clustering) {
                Ok(q) => eprintln!("{} k={} quality index: {:.4}", method, k, q),
                Err(e @ ClusterError::DegenerateClustering(_)) => warn!("no quality index: {}", e),
                Err(e) => return Err(e.into()),
            }

            write_clustering(output_writer(&output)?, &sites, &clustering)?;
        }
        Command::Sweep {
            input,
            method,
            k_min,
            k_max,
            trials,
            max_iter,
            output,
        } => {
            let sites = read_active_sites(&input)?;
            let config = SweepConfig {
                k_min,
                k_max,
                trials,
                max_iter,
            };
            let methods = if method.is_empty() {
                Method::ALL.to_vec()
            } else {
                method
            };

            let mut points = Vec::new();
            for m in methods {
                let swept = sweep(m, &sites, &config, &mut rng)?;
                for (k, q) in mean_quality_by_k(&swept) {
                    eprintln!("{}\tk={}\tmean quality {:.4}", m, k, q);
                }
                match elbow_point(&swept) {
                    Some(k) => eprintln!("{}: elbow at k={}", m, k),
                    None => eprintln!("{}: no elbow found", m),
                }
                points.extend(swept);
            }

            write_sweep(output_writer(&output)?, &points)?;
        }
        Command::Levels {
            input,
            k_min,
            output,
        } => {
            let sites = read_active_sites(&input)?;
            let levels = agglomerate(&sites, k_min)?.levels();
            info!(levels = levels.len(), "replayed merge history");
            write_levels(output_writer(&output)?, &sites, &levels)?;
        }
        Command::Compare {
            input,
            k,
            trials,
            max_iter,
        } => {
            let sites = read_active_sites(&input)?;
            let methods = Method::ALL;

            for (i, &a) in methods.iter().enumerate() {
                for &b in &methods[i + 1..] {
                    let mut total = 0.0;
                    for _ in 0..trials {
                        let ca = a.cluster(&sites, k, max_iter, &mut rng)?;
                        let cb = b.cluster(&sites, k, max_iter, &mut rng)?;
                        total += overlap_fraction(&ca, &cb)?;
                    }
                    println!(
                        "{} vs {}: mean overlap {:.4} over {} trials",
                        a,
                        b,
                        total / trials.max(1) as f64,
                        trials
                    );
                }
            }
        }
    }

    Ok(())
}
