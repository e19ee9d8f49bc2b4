//! Huckel-style aromaticity perception over SSSR rings.
//!
//! Perception runs as part of sanitization so that a Kekule input
//! (`C1=CC=CC=C1`) and an aromatic input (`c1ccccc1`) converge on the same
//! flags before canonical output.

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::Mol;
use crate::rings::RingInfo;
use crate::traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount};

const SP2_CAPABLE: [u8; 9] = [
    5,  // B
    6,  // C
    7,  // N
    8,  // O
    15, // P
    16, // S
    33, // As
    34, // Se
    52, // Te
];

/// Recompute every atom's aromatic flag from ring membership and pi counts.
/// Flags are overwritten, not OR-ed, so stale flags from input never survive.
pub fn perceive_aromaticity(mol: &mut Mol<Atom, Bond>) {
    let aromatic = find_aromatic_atoms(mol);
    let indices: Vec<_> = mol.atoms().collect();
    for idx in indices {
        mol.atom_mut(idx).is_aromatic = aromatic[idx.index()];
    }
}

pub fn find_aromatic_atoms<A, B>(mol: &Mol<A, B>) -> Vec<bool>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let n = mol.atom_count();
    let mut aromatic = vec![false; n];

    let ring_info = RingInfo::sssr(mol);

    for ring in ring_info.rings() {
        if is_aromatic_ring(mol, ring) {
            for &atom_idx in ring {
                aromatic[atom_idx.index()] = true;
            }
        }
    }

    aromatic
}

fn is_aromatic_ring<A, B>(mol: &Mol<A, B>, ring: &[NodeIndex]) -> bool
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    if ring.len() < 3 {
        return false;
    }

    for &atom_idx in ring {
        if !SP2_CAPABLE.contains(&mol.atom(atom_idx).atomic_num()) {
            return false;
        }
    }

    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        if let Some(edge) = mol.bond_between(a, b) {
            if mol.bond(edge).bond_order() == BondOrder::Triple {
                return false;
            }
        }
    }

    let mut pi_total: u8 = 0;
    for (i, &atom_idx) in ring.iter().enumerate() {
        match pi_electrons(mol, atom_idx, ring, i) {
            Some(e) => pi_total = pi_total.saturating_add(e),
            None => return false,
        }
    }

    is_huckel(pi_total)
}

/// Pi electron contribution of one ring atom, or None if the atom cannot sit
/// in an aromatic ring at all (which disqualifies the whole ring).
fn pi_electrons<A, B>(
    mol: &Mol<A, B>,
    atom_idx: NodeIndex,
    ring: &[NodeIndex],
    pos_in_ring: usize,
) -> Option<u8>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let atom = mol.atom(atom_idx);
    let anum = atom.atomic_num();
    let charge = atom.formal_charge();

    let has_double = has_any_double_bond(mol, atom_idx);
    let has_double_in_ring = has_double_to_ring_neighbor(mol, atom_idx, ring, pos_in_ring);

    let total_degree = mol.neighbors(atom_idx).count() as u8 + atom.hydrogen_count();
    let ring_degree = ring_neighbor_count(ring);

    match anum {
        6 => match charge {
            0 => {
                if has_double {
                    Some(1)
                } else {
                    None
                }
            }
            -1 => Some(2),
            1 => {
                if has_double {
                    Some(1)
                } else {
                    Some(0)
                }
            }
            _ => None,
        },
        7 => match charge {
            0 => {
                if has_double {
                    Some(1)
                } else if ring_degree == 2 && total_degree <= 3 {
                    // Pyrrole-type nitrogen donates its lone pair.
                    Some(2)
                } else {
                    None
                }
            }
            1 => {
                if has_double_in_ring {
                    Some(1)
                } else {
                    None
                }
            }
            _ => None,
        },
        8 | 16 | 34 | 52 => {
            if has_double_in_ring {
                Some(1)
            } else if ring_degree == 2 {
                Some(2)
            } else {
                None
            }
        }
        5 => {
            if has_double {
                Some(1)
            } else {
                Some(0)
            }
        }
        15 | 33 => {
            if has_double {
                Some(1)
            } else if ring_degree == 2 && total_degree <= 3 {
                Some(2)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn has_any_double_bond<A, B>(mol: &Mol<A, B>, atom_idx: NodeIndex) -> bool
where
    B: HasBondOrder,
{
    mol.bonds_of(atom_idx)
        .any(|e| mol.bond(e).bond_order() == BondOrder::Double)
}

fn has_double_to_ring_neighbor<A, B>(
    mol: &Mol<A, B>,
    atom_idx: NodeIndex,
    ring: &[NodeIndex],
    pos_in_ring: usize,
) -> bool
where
    B: HasBondOrder,
{
    let len = ring.len();
    let prev = ring[(pos_in_ring + len - 1) % len];
    let next = ring[(pos_in_ring + 1) % len];

    for neighbor in [prev, next] {
        if let Some(edge) = mol.bond_between(atom_idx, neighbor) {
            if mol.bond(edge).bond_order() == BondOrder::Double {
                return true;
            }
        }
    }
    false
}

fn ring_neighbor_count(ring: &[NodeIndex]) -> u8 {
    if ring.len() > 1 { 2 } else { 0 }
}

fn is_huckel(pi_electrons: u8) -> bool {
    if pi_electrons < 2 {
        return false;
    }
    (pi_electrons - 2).is_multiple_of(4)
}
