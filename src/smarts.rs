//! A small SMARTS dialect for substructure queries.
//!
//! Covers the primitives acid-site detection needs: element symbols with
//! case-encoded aromaticity, the `*` wildcard, connectivity `X<n>`, total
//! hydrogen count `H<n>`, formal charge `+<n>`/`-<n>`, and the bond
//! symbols `- = # ~ :`. Primitives inside a bracket atom are AND-ed.
//! Matching runs against kekulized molecules with aromaticity flags on
//! atoms, so `-` and `=` only match outside aromatic systems while the
//! default bond accepts a single bond or an aromatic pair.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

use crate::bond::BondOrder;
use crate::element::Element;
use crate::mol::Mol;
use crate::substruct;
use crate::traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmartsError {
    #[error("empty pattern")]
    EmptyInput,
    #[error("unexpected character {ch:?} at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },
    #[error("ring closure {digit} never closed")]
    UnclosedRing { digit: u16 },
    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
    #[error("invalid pattern at position {pos}: {msg}")]
    InvalidSmarts { pos: usize, msg: String },
}

/// Predicate on a target atom. `And` holds the primitives of one bracket
/// atom in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomExpr {
    True,
    Element { atomic_num: u8, aromatic: bool },
    Connectivity(u8),
    TotalHCount(u8),
    Charge(i8),
    And(Vec<AtomExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondExpr {
    True,
    Single,
    Double,
    Triple,
    Aromatic,
    /// Default when no bond symbol is written.
    SingleOrAromatic,
}

impl AtomExpr {
    pub fn matches<A, B>(&self, mol: &Mol<A, B>, idx: NodeIndex) -> bool
    where
        A: HasAtomicNum + HasAromaticity + HasFormalCharge + HasHydrogenCount,
    {
        let atom = mol.atom(idx);
        match self {
            AtomExpr::True => true,
            AtomExpr::Element {
                atomic_num,
                aromatic,
            } => atom.atomic_num() == *atomic_num && atom.is_aromatic() == *aromatic,
            // Connectivity counts suppressed hydrogens along with graph
            // neighbors, so X2 sees a hydroxyl oxygen as two connections.
            AtomExpr::Connectivity(n) => mol.degree(idx) as u8 + atom.hydrogen_count() == *n,
            AtomExpr::TotalHCount(n) => atom.hydrogen_count() == *n,
            AtomExpr::Charge(c) => atom.formal_charge() == *c,
            AtomExpr::And(parts) => parts.iter().all(|p| p.matches(mol, idx)),
        }
    }
}

impl BondExpr {
    pub fn matches<A, B>(&self, mol: &Mol<A, B>, edge: EdgeIndex) -> bool
    where
        A: HasAromaticity,
        B: HasBondOrder,
    {
        let order = mol.bond(edge).bond_order();
        let (a, b) = mol.bond_endpoints(edge).expect("target edge is valid");
        let aromatic = mol.atom(a).is_aromatic() && mol.atom(b).is_aromatic();
        match self {
            BondExpr::True => true,
            BondExpr::Single => order == BondOrder::Single && !aromatic,
            BondExpr::Double => order == BondOrder::Double && !aromatic,
            BondExpr::Triple => order == BondOrder::Triple,
            BondExpr::Aromatic => aromatic,
            BondExpr::SingleOrAromatic => order == BondOrder::Single || aromatic,
        }
    }
}

pub fn from_smarts(input: &str) -> Result<Mol<AtomExpr, BondExpr>, SmartsError> {
    if input.is_empty() {
        return Err(SmartsError::EmptyInput);
    }
    Parser::new(input).parse_smarts()
}

pub fn has_smarts_match<A, B>(target: &Mol<A, B>, query: &Mol<AtomExpr, BondExpr>) -> bool
where
    A: HasAtomicNum + HasAromaticity + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    get_smarts_match(target, query).is_some()
}

/// First match found, as target atom indices ordered like the pattern's
/// atoms. The pattern's last-written atom maps to the last entry.
pub fn get_smarts_match<A, B>(
    target: &Mol<A, B>,
    query: &Mol<AtomExpr, BondExpr>,
) -> Option<Vec<NodeIndex>>
where
    A: HasAtomicNum + HasAromaticity + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    substruct::get_substruct_match_with(
        target,
        query,
        |t, q| query.atom(q).matches(target, t),
        |te, qe| query.bond(qe).matches(target, te),
    )
    .map(target_atoms)
}

/// All matches, including symmetry-equivalent ones, each ordered like the
/// pattern's atoms.
pub fn get_smarts_matches<A, B>(
    target: &Mol<A, B>,
    query: &Mol<AtomExpr, BondExpr>,
) -> Vec<Vec<NodeIndex>>
where
    A: HasAtomicNum + HasAromaticity + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    substruct::get_substruct_matches_with(
        target,
        query,
        |t, q| query.atom(q).matches(target, t),
        |te, qe| query.bond(qe).matches(target, te),
    )
    .into_iter()
    .map(target_atoms)
    .collect()
}

fn target_atoms(mapping: substruct::AtomMapping) -> Vec<NodeIndex> {
    mapping.into_iter().map(|(_, t)| t).collect()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Parser {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse_smarts(&mut self) -> Result<Mol<AtomExpr, BondExpr>, SmartsError> {
        let mut mol = Mol::new();
        let mut stack = Vec::new();
        let mut current: Option<NodeIndex> = None;
        let mut pending_bond: Option<BondExpr> = None;
        let mut ring_map: std::collections::HashMap<u16, (NodeIndex, BondExpr)> =
            std::collections::HashMap::new();

        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];

            match ch {
                '[' => {
                    let atom_expr = self.parse_bracket_atom()?;
                    let idx = mol.add_atom(atom_expr);
                    if let Some(prev) = current {
                        let bond = pending_bond.take().unwrap_or(BondExpr::SingleOrAromatic);
                        mol.add_bond(prev, idx, bond);
                    }
                    current = Some(idx);
                }
                '(' => {
                    self.pos += 1;
                    if let Some(cur) = current {
                        stack.push((cur, pending_bond.take()));
                    } else {
                        return Err(SmartsError::UnmatchedParen { pos: self.pos - 1 });
                    }
                }
                ')' => {
                    self.pos += 1;
                    if let Some((prev, saved_bond)) = stack.pop() {
                        current = Some(prev);
                        pending_bond = saved_bond;
                    } else {
                        return Err(SmartsError::UnmatchedParen { pos: self.pos - 1 });
                    }
                }
                '.' => {
                    self.pos += 1;
                    current = None;
                    pending_bond = None;
                }
                '-' | '=' | '#' | '~' | ':' => {
                    if pending_bond.is_some() {
                        return Err(SmartsError::InvalidSmarts {
                            pos: self.pos,
                            msg: "consecutive bond expressions".into(),
                        });
                    }
                    pending_bond = Some(self.parse_bond_expr()?);
                }
                '0'..='9' | '%' => {
                    let digit = self.parse_ring_closure()?;
                    if let Some(cur) = current {
                        if let Some((other, saved_bond)) = ring_map.remove(&digit) {
                            let bond = pending_bond
                                .take()
                                .or(Some(saved_bond))
                                .unwrap_or(BondExpr::SingleOrAromatic);
                            mol.add_bond(cur, other, bond);
                        } else {
                            ring_map.insert(
                                digit,
                                (cur, pending_bond.take().unwrap_or(BondExpr::SingleOrAromatic)),
                            );
                        }
                    } else {
                        return Err(SmartsError::InvalidSmarts {
                            pos: self.pos,
                            msg: "ring closure without preceding atom".into(),
                        });
                    }
                }
                _ => {
                    let atom_expr = self.parse_bare_atom()?;
                    let idx = mol.add_atom(atom_expr);
                    if let Some(prev) = current {
                        let bond = pending_bond.take().unwrap_or(BondExpr::SingleOrAromatic);
                        mol.add_bond(prev, idx, bond);
                    }
                    current = Some(idx);
                }
            }
        }

        if !stack.is_empty() {
            return Err(SmartsError::UnmatchedParen { pos: self.pos });
        }
        if let Some((&digit, _)) = ring_map.iter().next() {
            return Err(SmartsError::UnclosedRing { digit });
        }

        Ok(mol)
    }

    fn parse_bond_expr(&mut self) -> Result<BondExpr, SmartsError> {
        let ch = self.chars[self.pos];
        self.pos += 1;
        match ch {
            '-' => Ok(BondExpr::Single),
            '=' => Ok(BondExpr::Double),
            '#' => Ok(BondExpr::Triple),
            '~' => Ok(BondExpr::True),
            ':' => Ok(BondExpr::Aromatic),
            _ => Err(SmartsError::UnexpectedChar {
                pos: self.pos - 1,
                ch,
            }),
        }
    }

    fn parse_ring_closure(&mut self) -> Result<u16, SmartsError> {
        let start = self.pos;
        if self.chars[self.pos] == '%' {
            self.pos += 1;
            if self.pos + 1 < self.chars.len()
                && self.chars[self.pos].is_ascii_digit()
                && self.chars[self.pos + 1].is_ascii_digit()
            {
                let d1 = self.chars[self.pos].to_digit(10).unwrap() as u16;
                let d2 = self.chars[self.pos + 1].to_digit(10).unwrap() as u16;
                self.pos += 2;
                Ok(d1 * 10 + d2)
            } else {
                Err(SmartsError::InvalidSmarts {
                    pos: start,
                    msg: "expected two digits after %".into(),
                })
            }
        } else {
            let d = self.chars[self.pos].to_digit(10).unwrap() as u16;
            self.pos += 1;
            Ok(d)
        }
    }

    fn parse_bare_atom(&mut self) -> Result<AtomExpr, SmartsError> {
        let start = self.pos;
        let ch = self.chars[self.pos];

        if ch == '*' {
            self.pos += 1;
            return Ok(AtomExpr::True);
        }

        self.parse_element()
            .map_err(|_| SmartsError::UnexpectedChar { pos: start, ch })
    }

    fn parse_bracket_atom(&mut self) -> Result<AtomExpr, SmartsError> {
        let bracket_start = self.pos;
        self.pos += 1;

        let mut parts = Vec::new();
        loop {
            if self.pos >= self.chars.len() {
                return Err(SmartsError::UnclosedBracket { pos: bracket_start });
            }
            let ch = self.chars[self.pos];
            if ch == ']' {
                self.pos += 1;
                break;
            }
            if ch == '&' {
                self.pos += 1;
                continue;
            }
            let first = parts.is_empty();
            parts.push(self.parse_primitive(first)?);
        }

        if parts.is_empty() {
            return Err(SmartsError::InvalidSmarts {
                pos: bracket_start,
                msg: "empty bracket atom".into(),
            });
        }
        Ok(flatten_and(parts))
    }

    fn parse_primitive(&mut self, first: bool) -> Result<AtomExpr, SmartsError> {
        let ch = self.chars[self.pos];

        match ch {
            '*' => {
                self.pos += 1;
                Ok(AtomExpr::True)
            }
            'X' => {
                self.pos += 1;
                let n = self.parse_number().unwrap_or(1);
                Ok(AtomExpr::Connectivity(n as u8))
            }
            'H' => {
                // [H] alone names the hydrogen element; anywhere else H
                // is the total hydrogen count.
                if first && self.chars.get(self.pos + 1) == Some(&']') {
                    self.pos += 1;
                    Ok(AtomExpr::Element {
                        atomic_num: 1,
                        aromatic: false,
                    })
                } else {
                    self.pos += 1;
                    let n = self.parse_number().unwrap_or(1);
                    Ok(AtomExpr::TotalHCount(n as u8))
                }
            }
            '+' => {
                self.pos += 1;
                let n = self.parse_number().unwrap_or(1);
                Ok(AtomExpr::Charge(n as i8))
            }
            '-' => {
                self.pos += 1;
                let n = self.parse_number().unwrap_or(1);
                Ok(AtomExpr::Charge(-(n as i8)))
            }
            'D' | 'v' | 'h' | 'R' | 'r' | 'x' | '@' | '$' | '!' | ',' | ';' | '#' => {
                Err(SmartsError::InvalidSmarts {
                    pos: self.pos,
                    msg: format!("unsupported SMARTS primitive {ch:?}"),
                })
            }
            _ if ch.is_ascii_alphabetic() => self.parse_element(),
            _ => Err(SmartsError::UnexpectedChar { pos: self.pos, ch }),
        }
    }

    fn parse_element(&mut self) -> Result<AtomExpr, SmartsError> {
        let start = self.pos;
        let ch = self.chars[self.pos];

        if ch.is_ascii_lowercase() {
            // Longest symbols first so [se] is not read as sulfur.
            let aromatic_symbols = [
                ("se", 34u8),
                ("te", 52),
                ("as", 33),
                ("c", 6),
                ("n", 7),
                ("o", 8),
                ("s", 16),
                ("p", 15),
            ];
            for &(sym, num) in &aromatic_symbols {
                if self.matches_str(sym) {
                    self.pos += sym.len();
                    return Ok(AtomExpr::Element {
                        atomic_num: num,
                        aromatic: true,
                    });
                }
            }
            return Err(SmartsError::UnexpectedChar { pos: start, ch });
        }

        let mut symbol = String::new();
        symbol.push(ch);
        self.pos += 1;

        if self.pos < self.chars.len() && self.chars[self.pos].is_ascii_lowercase() {
            symbol.push(self.chars[self.pos]);
            if let Some(elem) = Element::from_symbol(&symbol) {
                self.pos += 1;
                return Ok(AtomExpr::Element {
                    atomic_num: elem.atomic_num(),
                    aromatic: false,
                });
            }
            symbol.pop();
        }

        if let Some(elem) = Element::from_symbol(&symbol) {
            return Ok(AtomExpr::Element {
                atomic_num: elem.atomic_num(),
                aromatic: false,
            });
        }

        self.pos = start;
        Err(SmartsError::UnexpectedChar { pos: start, ch })
    }

    fn matches_str(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    fn parse_number(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.pos < self.chars.len() && self.chars[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos > start {
            let s: String = self.chars[start..self.pos].iter().collect();
            s.parse().ok()
        } else {
            None
        }
    }
}

fn flatten_and(mut parts: Vec<AtomExpr>) -> AtomExpr {
    if parts.len() == 1 {
        parts.pop().unwrap()
    } else {
        AtomExpr::And(parts)
    }
}
