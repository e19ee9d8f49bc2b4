use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{SmilesBond, SmilesBondOrder};
use crate::mol::Mol;
use crate::smiles::parse_tree::{ParseAtom, ParseTree};
use crate::smiles::tokenizer::BondToken;

pub fn build_mol(tree: &ParseTree) -> Mol<Atom, SmilesBond> {
    let mut mol = Mol::new();
    let mut node_indices: Vec<NodeIndex> = Vec::with_capacity(tree.atoms.len());

    for parse_atom in &tree.atoms {
        let atom = Atom {
            atomic_num: parse_atom.element.atomic_num(),
            formal_charge: parse_atom.charge,
            isotope: parse_atom.isotope,
            hydrogen_count: 0,
            is_aromatic: parse_atom.is_aromatic,
        };
        node_indices.push(mol.add_atom(atom));
    }

    let mut added_edges: Vec<Vec<usize>> = vec![Vec::new(); tree.atoms.len()];

    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        for neighbor in &parse_atom.neighbors {
            let j = neighbor.atom_idx;
            if !added_edges[i].contains(&j) {
                let order = resolve_bond_order(
                    &neighbor.bond,
                    parse_atom.is_aromatic,
                    tree.atoms[j].is_aromatic,
                );
                mol.add_bond(node_indices[i], node_indices[j], SmilesBond { order });
                added_edges[i].push(j);
                added_edges[j].push(i);
            }
        }
    }

    resolve_hydrogen_counts(&mut mol, tree, &node_indices);

    mol
}

fn resolve_bond_order(
    bond_tok: &Option<BondToken>,
    from_aromatic: bool,
    to_aromatic: bool,
) -> SmilesBondOrder {
    match bond_tok {
        Some(BondToken::Single) => SmilesBondOrder::Single,
        Some(BondToken::Double) => SmilesBondOrder::Double,
        Some(BondToken::Triple) => SmilesBondOrder::Triple,
        Some(BondToken::Aromatic) => SmilesBondOrder::Aromatic,
        None => {
            if from_aromatic && to_aromatic {
                SmilesBondOrder::Aromatic
            } else {
                SmilesBondOrder::Implicit
            }
        }
    }
}

fn resolve_hydrogen_counts(
    mol: &mut Mol<Atom, SmilesBond>,
    tree: &ParseTree,
    indices: &[NodeIndex],
) {
    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        let h_count = if parse_atom.is_bracket {
            parse_atom.hcount.unwrap_or(0)
        } else {
            compute_implicit_h(mol, indices[i], parse_atom)
        };
        mol.atom_mut(indices[i]).hydrogen_count = h_count;
    }
}

/// Implicit H for a bare (organic-subset) atom: fill up to the smallest
/// default valence that covers the explicit bond order sum. Aromatic atoms
/// reserve one valence slot for the delocalized system.
fn compute_implicit_h(
    mol: &Mol<Atom, SmilesBond>,
    node: NodeIndex,
    parse_atom: &ParseAtom,
) -> u8 {
    let valences = parse_atom.element.default_valences();
    if valences.is_empty() {
        return 0;
    }

    let bond_order_sum = bond_order_sum(mol, node);

    let target = valences
        .iter()
        .find(|&&v| v >= bond_order_sum)
        .copied()
        .unwrap_or(0);

    if target < bond_order_sum {
        return 0;
    }

    let mut h = target - bond_order_sum;

    if parse_atom.is_aromatic && h > 0 {
        h -= 1;
    }

    h
}

fn bond_order_sum(mol: &Mol<Atom, SmilesBond>, node: NodeIndex) -> u8 {
    let mut sum: u8 = 0;
    for edge_idx in mol.bonds_of(node) {
        let order = match mol.bond(edge_idx).order {
            SmilesBondOrder::Single => 1,
            SmilesBondOrder::Double => 2,
            SmilesBondOrder::Triple => 3,
            SmilesBondOrder::Aromatic => 1,
            SmilesBondOrder::Implicit => 1,
        };
        sum = sum.saturating_add(order);
    }
    sum
}
