//! Active-site records as handed over by a loader.

use std::collections::BTreeSet;

/// Handle of an active site: its index in the site slice a run works on.
///
/// Clustering code only ever stores these handles, so two sites with the same
/// residues at different positions stay distinct.
pub type SiteId = usize;

/// A single residue of an active site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Amino-acid type, e.g. `ASP`
    pub kind: String,
    /// Sequence number, if the loader knew it
    pub number: Option<i32>,
    /// Chain identifier, if the loader knew it
    pub chain: Option<char>,
}

impl Residue {
    pub fn new(kind: impl Into<String>) -> Self {
        Residue {
            kind: kind.into(),
            number: None,
            chain: None,
        }
    }

    pub fn with_position(kind: impl Into<String>, number: i32, chain: char) -> Self {
        Residue {
            kind: kind.into(),
            number: Some(number),
            chain: Some(chain),
        }
    }
}

/// An active site: a name plus its residues in loader order.
#[derive(Debug, Clone)]
pub struct ActiveSite {
    pub name: String,
    pub residues: Vec<Residue>,
}

impl ActiveSite {
    pub fn new(name: impl Into<String>, residues: Vec<Residue>) -> Self {
        ActiveSite {
            name: name.into(),
            residues,
        }
    }

    /// Convenience constructor from bare residue type labels.
    pub fn from_kinds<I, S>(name: impl Into<String>, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, kinds.into_iter().map(Residue::new).collect())
    }

    /// The set of residue types present; repeated types count once.
    pub fn residue_types(&self) -> BTreeSet<&str> {
        self.residues.iter().map(|r| r.kind.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_residue_types_collapse_duplicates() {
        let site = ActiveSite::from_kinds("10701", ["ASP", "HIS", "ASP", "SER", "HIS"]);
        let types: Vec<&str> = site.residue_types().into_iter().collect();
        assert_eq!(types, vec!["ASP", "HIS", "SER"]);
        assert_eq!(site.residues.len(), 5);
    }

    #[test]
    fn test_positional_attributes_kept() {
        let r = Residue::with_position("GLU", 42, 'A');
        assert_eq!(r.number, Some(42));
        assert_eq!(r.chain, Some('A'));
        assert_eq!(Residue::new("GLU").number, None);
    }
}
