//! Acid-site detection.
//!
//! Finds the hydroxyl oxygens of carboxylic, sulfonic, and phosphonic
//! acid groups. Each family is matched independently and the site list is
//! the union of hydroxyl atoms across families, deduplicated and sorted
//! ascending so deprotonation consumes sites in a deterministic order.

use std::sync::LazyLock;

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
use crate::smarts::{self, AtomExpr, BondExpr};

/// The recognized acid families, in detection order. The hydroxyl oxygen
/// is the last atom written in every pattern.
pub const ACID_SMARTS: [(&str, &str); 3] = [
    ("carboxylic", "[CX3](=O)[OX2H1]"),
    ("sulfonic", "[SX4](=O)(=O)[OX2H1]"),
    ("phosphonic", "[PX4](=O)[OX2H1]"),
];

static ACID_PATTERNS: LazyLock<Vec<(&'static str, Mol<AtomExpr, BondExpr>)>> =
    LazyLock::new(|| {
        ACID_SMARTS
            .iter()
            .map(|&(family, pattern)| {
                let query = smarts::from_smarts(pattern).expect("acid pattern table is valid");
                (family, query)
            })
            .collect()
    });

/// Hydroxyl oxygen indices of every detected acid group, ascending.
///
/// An oxygen matched by more than one family is reported once. Matching
/// expects a sanitized molecule so aromaticity flags are current.
pub fn detect_acid_sites(mol: &Mol<Atom, Bond>) -> Vec<NodeIndex> {
    let mut sites: Vec<NodeIndex> = Vec::new();
    for (family, query) in ACID_PATTERNS.iter() {
        let matches = smarts::get_smarts_matches(mol, query);
        if !matches.is_empty() {
            debug!(family, count = matches.len(), "acid groups matched");
        }
        for m in &matches {
            if let Some(&hydroxyl) = m.last() {
                sites.push(hydroxyl);
            }
        }
    }
    sites.sort_unstable();
    sites.dedup();
    sites
}
