//! TSV input and output around the clustering core.
//!
//! Input is a residue table (`site`, `residue`, optionally `number` and
//! `chain`), one row per residue. Output tables are written with the same
//! tab delimiter.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::clustering::Clustering;
use crate::error::{ClusterError, Result};
use crate::site::{ActiveSite, Residue};
use crate::sweep::SweepPoint;

/// Column positions resolved from the header line.
struct Columns {
    site: usize,
    residue: usize,
    number: Option<usize>,
    chain: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let missing = |name: &str| ClusterError::MalformedInput {
            record: 0,
            message: format!("missing '{}' column", name),
        };
        Ok(Columns {
            site: find("site").ok_or_else(|| missing("site"))?,
            residue: find("residue").ok_or_else(|| missing("residue"))?,
            number: find("number"),
            chain: find("chain"),
        })
    }
}

/// Read active sites from any TSV source.
///
/// Rows are grouped by `site`; sites keep the order of their first row and
/// residues keep row order.
pub fn read_active_sites_from<R: Read>(reader: R) -> Result<Vec<ActiveSite>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut sites: Vec<ActiveSite> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let record_no = i + 1;
        let field = |col: usize| record.get(col).map(str::trim).unwrap_or("");

        let name = field(columns.site);
        let kind = field(columns.residue);
        if name.is_empty() || kind.is_empty() {
            return Err(ClusterError::MalformedInput {
                record: record_no,
                message: "empty site or residue field".to_string(),
            });
        }

        let number = match columns.number.map(field).filter(|s| !s.is_empty()) {
            Some(s) => Some(s.parse::<i32>().map_err(|e| ClusterError::MalformedInput {
                record: record_no,
                message: format!("bad residue number '{}': {}", s, e),
            })?),
            None => None,
        };
        let chain = columns
            .chain
            .map(field)
            .and_then(|s| s.chars().next());

        let slot = *index.entry(name.to_string()).or_insert_with(|| {
            sites.push(ActiveSite::new(name, Vec::new()));
            sites.len() - 1
        });
        sites[slot].residues.push(Residue {
            kind: kind.to_string(),
            number,
            chain,
        });
    }

    Ok(sites)
}

/// Read active sites from a TSV file.
pub fn read_active_sites<P: AsRef<Path>>(path: P) -> Result<Vec<ActiveSite>> {
    let file = File::open(&path)?;
    let sites = read_active_sites_from(file)?;
    if sites.is_empty() {
        return Err(ClusterError::MalformedInput {
            record: 0,
            message: format!("no residues found in {:?}", path.as_ref()),
        });
    }
    info!(sites = sites.len(), path = ?path.as_ref(), "loaded active sites");
    Ok(sites)
}

/// Write one `cluster<TAB>site` row per site.
///
/// Fails before writing anything unless `clustering` partitions `sites`.
pub fn write_clustering<W: Write>(
    writer: W,
    sites: &[ActiveSite],
    clustering: &Clustering,
) -> Result<()> {
    clustering.labels(sites.len())?;
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    wtr.write_record(["cluster", "site"])?;
    for (c, members) in clustering.iter().enumerate() {
        for &site in members {
            wtr.write_record([c.to_string().as_str(), sites[site].name.as_str()])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Write several clusterings of the same sites as `k<TAB>cluster<TAB>site` rows,
/// where `k` is the number of clusters in that clustering.
pub fn write_levels<W: Write>(
    writer: W,
    sites: &[ActiveSite],
    levels: &[Clustering],
) -> Result<()> {
    for clustering in levels {
        clustering.labels(sites.len())?;
    }
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    wtr.write_record(["k", "cluster", "site"])?;
    for clustering in levels {
        let k = clustering.len().to_string();
        for (c, members) in clustering.iter().enumerate() {
            for &site in members {
                wtr.write_record([k.as_str(), c.to_string().as_str(), sites[site].name.as_str()])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Write sweep results as `method<TAB>k<TAB>trial<TAB>quality` rows.
pub fn write_sweep<W: Write>(writer: W, points: &[SweepPoint]) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    wtr.write_record(["method", "k", "trial", "quality"])?;
    for p in points {
        wtr.write_record([
            p.method.name().to_string(),
            p.k.to_string(),
            p.trial.to_string(),
            p.quality.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
