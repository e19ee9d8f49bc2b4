use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::element::Element;
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount};

/// One atom whose bond order sum plus hydrogens is not an allowed valence
/// for its element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "atom {} ({}): valence {} not in {:?}",
    atom_idx.index(),
    element_symbol(*atomic_num),
    actual_valence,
    allowed_valences
)]
pub struct ValenceError {
    pub atom_idx: NodeIndex,
    pub atomic_num: u8,
    pub actual_valence: u8,
    pub allowed_valences: Vec<u8>,
}

fn element_symbol(atomic_num: u8) -> &'static str {
    Element::from_atomic_num(atomic_num)
        .map(|e| e.symbol())
        .unwrap_or("?")
}

pub fn total_valence<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    A: HasHydrogenCount,
    B: HasBondOrder,
{
    let bond_sum: u8 = mol
        .bonds_of(atom)
        .map(|ei| mol.bond(ei).bond_order().valence_contribution())
        .sum();
    bond_sum + mol.atom(atom).hydrogen_count()
}

/// Validate valences across the molecule. Charged atoms are skipped, so a
/// deprotonated carboxylate oxygen never trips the check. Elements without a
/// known valence list (metals) are also skipped.
pub fn check_valence<A, B>(mol: &Mol<A, B>) -> Result<(), Vec<ValenceError>>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let errors: Vec<ValenceError> = mol
        .atoms()
        .filter_map(|idx| {
            let atom = mol.atom(idx);
            if atom.formal_charge() != 0 {
                return None;
            }
            let elem = Element::from_atomic_num(atom.atomic_num())?;
            let allowed = elem.default_valences();
            if allowed.is_empty() {
                return None;
            }
            let v = total_valence(mol, idx);
            if allowed.contains(&v) {
                return None;
            }
            Some(ValenceError {
                atom_idx: idx,
                atomic_num: atom.atomic_num(),
                actual_valence: v,
                allowed_valences: allowed.to_vec(),
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
