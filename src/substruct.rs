//! Substructure matching via VF2-style backtracking.
//!
//! The `_with` variants take match predicates over node and edge indices so
//! callers can test anything about the candidate pairing, including
//! properties that need graph context such as degree. The plain variants
//! apply the default molecule-to-molecule rules: equal atomic number, query
//! aromaticity implies target aromaticity, and equal bond order outside
//! aromatic systems.

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;
use crate::traits::{HasAromaticity, HasAtomicNum, HasBondOrder};

/// Pairs of (query atom, target atom), ordered by query atom index.
pub type AtomMapping = Vec<(NodeIndex, NodeIndex)>;

pub fn has_substruct_match<A, B>(target: &Mol<A, B>, query: &Mol<A, B>) -> bool
where
    A: HasAtomicNum + HasAromaticity,
    B: HasBondOrder,
{
    get_substruct_match(target, query).is_some()
}

pub fn get_substruct_match<A, B>(target: &Mol<A, B>, query: &Mol<A, B>) -> Option<AtomMapping>
where
    A: HasAtomicNum + HasAromaticity,
    B: HasBondOrder,
{
    let (atom_ok, bond_ok) = default_matchers(target, query);
    Vf2::new(target, query, atom_ok, bond_ok).find_first()
}

pub fn get_substruct_matches<A, B>(target: &Mol<A, B>, query: &Mol<A, B>) -> Vec<AtomMapping>
where
    A: HasAtomicNum + HasAromaticity,
    B: HasBondOrder,
{
    let (atom_ok, bond_ok) = default_matchers(target, query);
    Vf2::new(target, query, atom_ok, bond_ok).find_all()
}

pub fn has_substruct_match_with<A1, B1, A2, B2>(
    target: &Mol<A1, B1>,
    query: &Mol<A2, B2>,
    atom_ok: impl Fn(NodeIndex, NodeIndex) -> bool,
    bond_ok: impl Fn(EdgeIndex, EdgeIndex) -> bool,
) -> bool {
    get_substruct_match_with(target, query, atom_ok, bond_ok).is_some()
}

/// First match found, or None. Predicates receive (target index, query index).
pub fn get_substruct_match_with<A1, B1, A2, B2>(
    target: &Mol<A1, B1>,
    query: &Mol<A2, B2>,
    atom_ok: impl Fn(NodeIndex, NodeIndex) -> bool,
    bond_ok: impl Fn(EdgeIndex, EdgeIndex) -> bool,
) -> Option<AtomMapping> {
    Vf2::new(target, query, atom_ok, bond_ok).find_first()
}

/// All matches, including symmetry-equivalent ones. Predicates receive
/// (target index, query index).
pub fn get_substruct_matches_with<A1, B1, A2, B2>(
    target: &Mol<A1, B1>,
    query: &Mol<A2, B2>,
    atom_ok: impl Fn(NodeIndex, NodeIndex) -> bool,
    bond_ok: impl Fn(EdgeIndex, EdgeIndex) -> bool,
) -> Vec<AtomMapping> {
    Vf2::new(target, query, atom_ok, bond_ok).find_all()
}

type Matchers<'m> = (
    Box<dyn Fn(NodeIndex, NodeIndex) -> bool + 'm>,
    Box<dyn Fn(EdgeIndex, EdgeIndex) -> bool + 'm>,
);

fn default_matchers<'m, A, B>(target: &'m Mol<A, B>, query: &'m Mol<A, B>) -> Matchers<'m>
where
    A: HasAtomicNum + HasAromaticity,
    B: HasBondOrder,
{
    let atom_ok = move |t: NodeIndex, q: NodeIndex| {
        let ta = target.atom(t);
        let qa = query.atom(q);
        ta.atomic_num() == qa.atomic_num() && (!qa.is_aromatic() || ta.is_aromatic())
    };
    let bond_ok = move |te: EdgeIndex, qe: EdgeIndex| {
        let (qa, qb) = query.bond_endpoints(qe).expect("query edge is valid");
        let (ta, tb) = target.bond_endpoints(te).expect("target edge is valid");
        let query_aromatic = query.atom(qa).is_aromatic() && query.atom(qb).is_aromatic();
        let target_aromatic = target.atom(ta).is_aromatic() && target.atom(tb).is_aromatic();
        if query_aromatic && target_aromatic {
            return true;
        }
        target.bond(te).bond_order() == query.bond(qe).bond_order()
    };
    (Box::new(atom_ok), Box::new(bond_ok))
}

struct Vf2<'a, A1, B1, A2, B2, FA, FB> {
    target: &'a Mol<A1, B1>,
    query: &'a Mol<A2, B2>,
    atom_ok: FA,
    bond_ok: FB,
    query_order: Vec<NodeIndex>,
    query_map: Vec<Option<NodeIndex>>,
    target_used: Vec<bool>,
}

impl<'a, A1, B1, A2, B2, FA, FB> Vf2<'a, A1, B1, A2, B2, FA, FB>
where
    FA: Fn(NodeIndex, NodeIndex) -> bool,
    FB: Fn(EdgeIndex, EdgeIndex) -> bool,
{
    fn new(target: &'a Mol<A1, B1>, query: &'a Mol<A2, B2>, atom_ok: FA, bond_ok: FB) -> Self {
        // High-degree query atoms first prunes the search tree earlier.
        let mut query_order: Vec<NodeIndex> = query.atoms().collect();
        query_order
            .sort_by(|&a, &b| query.neighbors(b).count().cmp(&query.neighbors(a).count()));
        Self {
            target,
            query,
            atom_ok,
            bond_ok,
            query_order,
            query_map: vec![None; query.atom_count()],
            target_used: vec![false; target.atom_count()],
        }
    }

    fn find_first(&mut self) -> Option<AtomMapping> {
        let mut results = Vec::new();
        self.recurse(0, &mut results, true);
        results.into_iter().next()
    }

    fn find_all(&mut self) -> Vec<AtomMapping> {
        let mut results = Vec::new();
        self.recurse(0, &mut results, false);
        results
    }

    fn recurse(&mut self, depth: usize, results: &mut Vec<AtomMapping>, first_only: bool) {
        if depth == self.query_order.len() {
            let mapping = (0..self.query_map.len())
                .map(|i| (NodeIndex::new(i), self.query_map[i].unwrap()))
                .collect();
            results.push(mapping);
            return;
        }

        if first_only && !results.is_empty() {
            return;
        }

        let query_node = self.query_order[depth];

        for t_idx in 0..self.target_used.len() {
            if self.target_used[t_idx] {
                continue;
            }

            let target_node = NodeIndex::new(t_idx);

            if !self.is_feasible(query_node, target_node) {
                continue;
            }

            self.query_map[query_node.index()] = Some(target_node);
            self.target_used[t_idx] = true;

            self.recurse(depth + 1, results, first_only);

            if first_only && !results.is_empty() {
                return;
            }

            self.query_map[query_node.index()] = None;
            self.target_used[t_idx] = false;
        }
    }

    fn is_feasible(&self, query_node: NodeIndex, target_node: NodeIndex) -> bool {
        if !(self.atom_ok)(target_node, query_node) {
            return false;
        }

        for q_neighbor in self.query.neighbors(query_node) {
            if let Some(t_mapped) = self.query_map[q_neighbor.index()] {
                let q_edge = self
                    .query
                    .bond_between(query_node, q_neighbor)
                    .expect("bond must exist between neighbors");
                match self.target.bond_between(target_node, t_mapped) {
                    Some(t_edge) => {
                        if !(self.bond_ok)(t_edge, q_edge) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
        }

        true
    }
}
