use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::canonical::canonical_ordering;
use crate::element::Element;
use crate::graph_ops::connected_components;
use crate::mol::Mol;

/// Write SMILES in graph order. Output depends on how the molecule was
/// assembled; use [`to_canonical_smiles`] for a stable form.
pub fn to_smiles(mol: &Mol<Atom, Bond>) -> String {
    let components = connected_components(mol);
    let mut parts = Vec::with_capacity(components.len());
    for component in &components {
        parts.push(write_fragment(mol, component, None));
    }
    parts.join(".")
}

/// Write SMILES with atoms visited in canonical rank order, so any two
/// graphs of the same molecule produce the same string. Fragments are
/// emitted in sorted order, making salts input-order invariant too.
pub fn to_canonical_smiles(mol: &Mol<Atom, Bond>) -> String {
    let ranks = canonical_ordering(mol);
    let components = connected_components(mol);
    let mut parts = Vec::with_capacity(components.len());
    for component in &components {
        parts.push(write_fragment(mol, component, Some(&ranks)));
    }
    parts.sort_unstable();
    parts.join(".")
}

struct RingClosure {
    ring_id: usize,
    order: BondOrder,
    other: NodeIndex,
}

fn write_fragment(
    mol: &Mol<Atom, Bond>,
    component: &[NodeIndex],
    ranks: Option<&[usize]>,
) -> String {
    let n = mol.atom_count();
    let start = match ranks {
        Some(r) => *component.iter().min_by_key(|&&node| r[node.index()]).unwrap(),
        None => component[0],
    };

    let mut visited = vec![false; n];
    let mut parent = vec![None::<NodeIndex>; n];
    let mut ring_opens: Vec<Vec<RingClosure>> = (0..n).map(|_| Vec::new()).collect();
    let mut ring_closes: Vec<Vec<RingClosure>> = (0..n).map(|_| Vec::new()).collect();
    let mut next_ring_id: usize = 1;
    let mut children: Vec<Vec<NodeIndex>> = (0..n).map(|_| Vec::new()).collect();

    let neighbor_lists: Vec<Vec<NodeIndex>> = (0..n)
        .map(|i| {
            let mut neighbors: Vec<NodeIndex> = mol.neighbors(NodeIndex::new(i)).collect();
            if let Some(r) = ranks {
                neighbors.sort_by_key(|nb| r[nb.index()]);
            }
            neighbors
        })
        .collect();

    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();
    visited[start.index()] = true;
    stack.push((start, 0));

    loop {
        let Some(&mut (node, ref mut ni)) = stack.last_mut() else {
            break;
        };
        let neighbors = &neighbor_lists[node.index()];
        if *ni >= neighbors.len() {
            stack.pop();
            continue;
        }
        let neighbor = neighbors[*ni];
        *ni += 1;

        if !visited[neighbor.index()] {
            visited[neighbor.index()] = true;
            parent[neighbor.index()] = Some(node);
            children[node.index()].push(neighbor);
            stack.push((neighbor, 0));
        } else if parent[node.index()] != Some(neighbor) {
            // Back edge: open a ring closure at the earlier atom unless this
            // pair is already paired up.
            let already = ring_opens[neighbor.index()]
                .iter()
                .any(|rc| ring_closes[node.index()].iter().any(|rc2| rc2.ring_id == rc.ring_id))
                || ring_opens[node.index()]
                    .iter()
                    .any(|rc| {
                        ring_closes[neighbor.index()]
                            .iter()
                            .any(|rc2| rc2.ring_id == rc.ring_id)
                    });
            if !already {
                let edge = mol.bond_between(node, neighbor).unwrap();
                let order = mol.bond(edge).order;
                let ring_id = next_ring_id;
                next_ring_id += 1;
                ring_opens[neighbor.index()].push(RingClosure {
                    ring_id,
                    order,
                    other: node,
                });
                ring_closes[node.index()].push(RingClosure {
                    ring_id,
                    order,
                    other: neighbor,
                });
            }
        }
    }

    let ctx = DfsContext {
        children,
        ring_opens,
        ring_closes,
    };

    let mut out = String::new();
    write_node(mol, start, &ctx, &mut out);
    out
}

struct DfsContext {
    children: Vec<Vec<NodeIndex>>,
    ring_opens: Vec<Vec<RingClosure>>,
    ring_closes: Vec<Vec<RingClosure>>,
}

fn write_node(mol: &Mol<Atom, Bond>, node: NodeIndex, ctx: &DfsContext, out: &mut String) {
    write_atom_symbol(mol, node, out);

    for rc in &ctx.ring_opens[node.index()] {
        write_bond_symbol(mol, rc.order, node, rc.other, out);
        write_ring_digit(rc.ring_id, out);
    }

    for rc in &ctx.ring_closes[node.index()] {
        write_bond_symbol(mol, rc.order, node, rc.other, out);
        write_ring_digit(rc.ring_id, out);
    }

    let kids = &ctx.children[node.index()];
    if kids.is_empty() {
        return;
    }

    let last = kids.len() - 1;
    for (i, &child) in kids.iter().enumerate() {
        let is_branch = i < last;
        if is_branch {
            out.push('(');
        }
        let edge = mol.bond_between(node, child).unwrap();
        write_bond_symbol(mol, mol.bond(edge).order, node, child, out);
        write_node(mol, child, ctx, out);
        if is_branch {
            out.push(')');
        }
    }
}

fn write_bond_symbol(
    mol: &Mol<Atom, Bond>,
    order: BondOrder,
    from: NodeIndex,
    to: NodeIndex,
    out: &mut String,
) {
    let from_atom = mol.atom(from);
    let to_atom = mol.atom(to);
    if from_atom.is_aromatic && to_atom.is_aromatic {
        return;
    }
    match order {
        BondOrder::Single => {}
        BondOrder::Double => out.push('='),
        BondOrder::Triple => out.push('#'),
    }
}

fn write_ring_digit(id: usize, out: &mut String) {
    assert!(id <= 99, "ring id {id} exceeds SMILES maximum of 99");
    if id <= 9 {
        out.push(char::from(b'0' + id as u8));
    } else {
        out.push('%');
        out.push(char::from(b'0' + (id / 10) as u8));
        out.push(char::from(b'0' + (id % 10) as u8));
    }
}

fn write_atom_symbol(mol: &Mol<Atom, Bond>, node: NodeIndex, out: &mut String) {
    let atom = mol.atom(node);
    let elem = Element::from_atomic_num(atom.atomic_num);

    if can_write_bare(mol, node) {
        let symbol = elem.unwrap().symbol();
        if atom.is_aromatic {
            for c in symbol.chars() {
                out.push(c.to_ascii_lowercase());
            }
        } else {
            out.push_str(symbol);
        }
    } else {
        write_bracket_atom(atom, elem, out);
    }
}

fn can_write_bare(mol: &Mol<Atom, Bond>, node: NodeIndex) -> bool {
    let atom = mol.atom(node);

    let elem = match Element::from_atomic_num(atom.atomic_num) {
        Some(e) => e,
        None => return false,
    };

    if !elem.is_organic_subset() {
        return false;
    }
    if atom.isotope != 0 || atom.formal_charge != 0 {
        return false;
    }

    let expected_h =
        implicit_h_for_bare_atom(elem, atom.is_aromatic, reader_bond_order_sum(mol, node));
    atom.hydrogen_count == expected_h
}

/// Mirrors `compute_implicit_h` in the parser's builder: given what the reader
/// would see for a bare atom, compute the implicit hydrogen count.
fn implicit_h_for_bare_atom(elem: Element, is_aromatic: bool, bos: u8) -> u8 {
    let valences = elem.default_valences();
    if valences.is_empty() {
        return 0;
    }
    let target = valences.iter().find(|&&v| v >= bos).copied().unwrap_or(0);
    if target < bos {
        return 0;
    }
    let mut h = target - bos;
    if is_aromatic && h > 0 {
        h -= 1;
    }
    h
}

/// Bond order sum as the reader would compute it for a bare atom: bonds between
/// two aromatic atoms count as 1 (aromatic/implicit), others use actual order.
fn reader_bond_order_sum(mol: &Mol<Atom, Bond>, node: NodeIndex) -> u8 {
    let atom = mol.atom(node);
    let mut sum: u8 = 0;
    for edge_idx in mol.bonds_of(node) {
        let (a, b) = mol.bond_endpoints(edge_idx).unwrap();
        let neighbor = mol.atom(if a == node { b } else { a });

        let contribution = if atom.is_aromatic && neighbor.is_aromatic {
            1
        } else {
            mol.bond(edge_idx).order.valence_contribution()
        };
        sum = sum.saturating_add(contribution);
    }
    sum
}

fn write_bracket_atom(atom: &Atom, elem: Option<Element>, out: &mut String) {
    out.push('[');

    if atom.isotope != 0 {
        out.push_str(&atom.isotope.to_string());
    }

    match elem {
        Some(e) => {
            let symbol = e.symbol();
            if atom.is_aromatic {
                for c in symbol.chars() {
                    out.push(c.to_ascii_lowercase());
                }
            } else {
                out.push_str(symbol);
            }
        }
        None => out.push('*'),
    }

    if atom.hydrogen_count > 0 {
        out.push('H');
        if atom.hydrogen_count > 1 {
            out.push_str(&atom.hydrogen_count.to_string());
        }
    }

    if atom.formal_charge > 0 {
        out.push('+');
        if atom.formal_charge > 1 {
            out.push_str(&atom.formal_charge.to_string());
        }
    } else if atom.formal_charge < 0 {
        out.push('-');
        if atom.formal_charge < -1 {
            out.push_str(&atom.formal_charge.abs().to_string());
        }
    }

    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::from_smiles;

    fn round_trip(smiles: &str) -> (Mol<Atom, Bond>, Mol<Atom, Bond>, String) {
        let mol1 = from_smiles(smiles).unwrap();
        let written = to_smiles(&mol1);
        let mol2 = from_smiles(&written).unwrap_or_else(|e| {
            panic!("Failed to re-parse '{written}' (from '{smiles}'): {e}");
        });
        (mol1, mol2, written)
    }

    fn assert_same_structure(mol1: &Mol<Atom, Bond>, mol2: &Mol<Atom, Bond>, ctx: &str) {
        assert_eq!(mol1.atom_count(), mol2.atom_count(), "{ctx}: atom count");
        assert_eq!(mol1.bond_count(), mol2.bond_count(), "{ctx}: bond count");

        let mut e1: Vec<u8> = mol1.atoms().map(|n| mol1.atom(n).atomic_num).collect();
        let mut e2: Vec<u8> = mol2.atoms().map(|n| mol2.atom(n).atomic_num).collect();
        e1.sort();
        e2.sort();
        assert_eq!(e1, e2, "{ctx}: elements");
    }

    #[test]
    fn methane() {
        let (m1, m2, s) = round_trip("C");
        assert_eq!(s, "C");
        assert_same_structure(&m1, &m2, "methane");
    }

    #[test]
    fn ethane() {
        let (m1, m2, s) = round_trip("CC");
        assert_eq!(s, "CC");
        assert_same_structure(&m1, &m2, "ethane");
    }

    #[test]
    fn ethene() {
        let (m1, m2, s) = round_trip("C=C");
        assert!(s.contains('='));
        assert_same_structure(&m1, &m2, "ethene");
    }

    #[test]
    fn triple_bond() {
        let (m1, m2, s) = round_trip("C#C");
        assert!(s.contains('#'));
        assert_same_structure(&m1, &m2, "ethyne");
    }

    #[test]
    fn cyclohexane() {
        let (m1, m2, s) = round_trip("C1CCCCC1");
        assert!(s.contains('1'));
        assert_same_structure(&m1, &m2, "cyclohexane");
    }

    #[test]
    fn benzene() {
        let (m1, m2, s) = round_trip("c1ccccc1");
        assert_same_structure(&m1, &m2, "benzene");
        assert!(s.contains('c'), "expected lowercase aromatic: {s}");
    }

    #[test]
    fn water() {
        let (m1, m2, s) = round_trip("O");
        assert_eq!(s, "O");
        assert_same_structure(&m1, &m2, "water");
    }

    #[test]
    fn acetic_acid() {
        let (m1, m2, s) = round_trip("CC(=O)O");
        assert_same_structure(&m1, &m2, "acetic acid");
        assert!(s.contains('='));
    }

    #[test]
    fn acetate_keeps_bracket_anion() {
        let (m1, m2, s) = round_trip("CC(=O)[O-]");
        assert_same_structure(&m1, &m2, "acetate");
        assert!(s.contains("[O-]"), "expected bracket anion in '{s}'");
    }

    #[test]
    fn sodium_chloride() {
        let (m1, m2, s) = round_trip("[Na+].[Cl-]");
        assert_same_structure(&m1, &m2, "NaCl");
        assert!(s.contains('.'));
    }

    #[test]
    fn canonical_fragments_are_sorted() {
        let a = to_canonical_smiles(&from_smiles("[Na+].[Cl-]").unwrap());
        let b = to_canonical_smiles(&from_smiles("[Cl-].[Na+]").unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn iron() {
        let (m1, m2, s) = round_trip("[Fe]");
        assert_eq!(s, "[Fe]");
        assert_same_structure(&m1, &m2, "iron");
    }

    #[test]
    fn carbon_13() {
        let (m1, m2, s) = round_trip("[13C]");
        assert!(s.contains("13"));
        assert_same_structure(&m1, &m2, "13C");
    }

    #[test]
    fn ammonium() {
        let (m1, m2, s) = round_trip("[NH4+]");
        assert!(s.contains('+'));
        assert_same_structure(&m1, &m2, "NH4+");
    }

    #[test]
    fn pyridine() {
        let (m1, m2, _) = round_trip("c1ccncc1");
        assert_same_structure(&m1, &m2, "pyridine");
    }

    #[test]
    fn naphthalene() {
        let (m1, m2, _) = round_trip("c1ccc2ccccc2c1");
        assert_same_structure(&m1, &m2, "naphthalene");
    }

    #[test]
    fn empty_mol() {
        let mol = Mol::<Atom, Bond>::new();
        assert_eq!(to_smiles(&mol), "");
    }

    #[test]
    fn phenol() {
        let (m1, m2, _) = round_trip("Oc1ccccc1");
        assert_same_structure(&m1, &m2, "phenol");
    }

    #[test]
    fn three_fragments() {
        let (m1, m2, s) = round_trip("[Na+].[Cl-].O");
        assert_same_structure(&m1, &m2, "three fragments");
        assert_eq!(s.matches('.').count(), 2);
    }

    fn canonical(smiles: &str) -> String {
        let mol = from_smiles(smiles).unwrap();
        to_canonical_smiles(&mol)
    }

    fn canonical_round_trip(smiles: &str) -> (Mol<Atom, Bond>, Mol<Atom, Bond>, String) {
        let mol1 = from_smiles(smiles).unwrap();
        let written = to_canonical_smiles(&mol1);
        let mol2 = from_smiles(&written).unwrap_or_else(|e| {
            panic!("Failed to re-parse canonical '{written}' (from '{smiles}'): {e}");
        });
        (mol1, mol2, written)
    }

    // -- Determinism: same molecule from different SMILES -> same canonical SMILES --

    #[test]
    fn canonical_ethanol_determinism() {
        assert_eq!(canonical("OCC"), canonical("CCO"));
    }

    #[test]
    fn canonical_acetic_acid_determinism() {
        assert_eq!(canonical("C(=O)(O)CC"), canonical("CCC(O)=O"));
    }

    #[test]
    fn canonical_propanol_orderings() {
        let a = canonical("CCCO");
        let b = canonical("OCCC");
        let c = canonical("C(CC)O");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn canonical_phenol_orderings() {
        let a = canonical("Oc1ccccc1");
        let b = canonical("c1ccccc1O");
        let c = canonical("c1ccc(O)cc1");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn canonical_terephthalate_orderings() {
        let a = canonical("OC(=O)c1ccc(C(O)=O)cc1");
        let b = canonical("C(O)(=O)c1ccc(cc1)C(=O)O");
        assert_eq!(a, b);
    }

    // -- Uniqueness: different molecules -> different canonical SMILES --

    #[test]
    fn canonical_ethanol_vs_methanol() {
        assert_ne!(canonical("CCO"), canonical("CO"));
    }

    #[test]
    fn canonical_benzene_vs_cyclohexane() {
        assert_ne!(canonical("c1ccccc1"), canonical("C1CCCCC1"));
    }

    #[test]
    fn canonical_acid_vs_carboxylate() {
        assert_ne!(canonical("CC(=O)O"), canonical("CC(=O)[O-]"));
    }

    // -- Edge cases --

    #[test]
    fn canonical_single_atom_c() {
        assert_eq!(canonical("C"), "C");
    }

    #[test]
    fn canonical_single_atom_na() {
        let s = canonical("[Na+]");
        assert!(s.contains("Na"));
        assert!(s.contains('+'));
    }

    #[test]
    fn canonical_disconnected() {
        let s = canonical("[Na+].[Cl-]");
        assert!(s.contains('.'));
        let mol = from_smiles(&s).unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
    }

    #[test]
    fn canonical_charged_atoms() {
        let s = canonical("[NH4+]");
        let mol = from_smiles(&s).unwrap();
        assert_eq!(mol.atom(NodeIndex::new(0)).formal_charge, 1);
    }

    #[test]
    fn canonical_isotope() {
        let s = canonical("[13C]");
        assert!(s.contains("13"));
        let mol = from_smiles(&s).unwrap();
        assert_eq!(mol.atom(NodeIndex::new(0)).isotope, 13);
    }

    #[test]
    fn canonical_empty_mol() {
        let mol = Mol::<Atom, Bond>::new();
        assert_eq!(to_canonical_smiles(&mol), "");
    }

    #[test]
    fn canonical_round_trip_structure_preservation() {
        let cases = [
            "CC",
            "C=C",
            "C#C",
            "C1CCCCC1",
            "c1ccccc1",
            "CC(=O)O",
            "CC(=O)[O-]",
            "c1ccncc1",
            "c1ccc2ccccc2c1",
            "[Fe]",
            "[Na+].[Cl-]",
            "OC(=O)c1ccc(C(O)=O)cc1",
        ];
        for smiles in &cases {
            let (m1, m2, _) = canonical_round_trip(smiles);
            assert_same_structure(&m1, &m2, smiles);
        }
    }

    #[test]
    fn canonical_idempotent() {
        let cases = [
            "CCO",
            "c1ccccc1",
            "CC(=O)O",
            "[Na+].[Cl-]",
            "c1ccncc1",
            "OC(=O)c1ccc(C(O)=O)cc1",
        ];
        for smiles in &cases {
            let first = canonical(smiles);
            let second = canonical(&first);
            assert_eq!(first, second, "canonical not idempotent for {smiles}");
        }
    }

    #[test]
    fn canonical_naphthalene_determinism() {
        let a = canonical("c1ccc2ccccc2c1");
        let b = canonical("c1cccc2ccccc12");
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_toluene_orderings() {
        let a = canonical("Cc1ccccc1");
        let b = canonical("c1ccccc1C");
        let c = canonical("c1ccc(C)cc1");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }
}
