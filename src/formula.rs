//! Molecular formula and molecular weight calculations.
//!
//! [`mol_formula`] produces a Hill system string from a molecule,
//! [`parse_composition`] and [`write_composition`] convert between such
//! strings and element-count maps, [`strip_charge_suffix`] drops a
//! trailing charge annotation, [`average_mol_weight`] gives the average
//! molecular weight in daltons, and [`exact_mol_weight`] gives the
//! monoisotopic exact mass.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::element::isotope_exact_mass;
use crate::element::Element;
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasFormalCharge, HasHydrogenCount, HasIsotope};

/// Compute the average molecular weight in daltons (Da).
///
/// Uses standard atomic weights averaged over natural isotopic abundance.
/// Atoms with an explicit isotope label use that isotope's exact mass
/// instead.
pub fn average_mol_weight<A: HasAtomicNum + HasHydrogenCount + HasIsotope, B>(
    mol: &Mol<A, B>,
) -> f64 {
    let h_weight = Element::H.atomic_weight();
    mol.atoms().fold(0.0, |acc, idx| {
        let a = mol.atom(idx);
        let elem = Element::from_atomic_num(a.atomic_num());
        let iso = a.isotope();
        let mass = if iso > 0 {
            isotope_exact_mass(a.atomic_num(), iso)
                .or_else(|| elem.map(|e| e.atomic_weight()))
                .unwrap_or(0.0)
        } else {
            elem.map_or(0.0, |e| e.atomic_weight())
        };
        acc + mass + a.hydrogen_count() as f64 * h_weight
    })
}

/// Compute the monoisotopic exact mass.
///
/// Uses the mass of the most abundant isotope of each element. Atoms
/// with an explicit isotope label use that isotope's exact mass.
pub fn exact_mol_weight<A: HasAtomicNum + HasHydrogenCount + HasIsotope, B>(
    mol: &Mol<A, B>,
) -> f64 {
    let h_mass = Element::H.exact_mass();
    mol.atoms().fold(0.0, |acc, idx| {
        let a = mol.atom(idx);
        let elem = Element::from_atomic_num(a.atomic_num());
        let iso = a.isotope();
        let mass = if iso > 0 {
            isotope_exact_mass(a.atomic_num(), iso)
                .or_else(|| elem.map(|e| e.exact_mass()))
                .unwrap_or(0.0)
        } else {
            elem.map_or(0.0, |e| e.exact_mass())
        };
        acc + mass + a.hydrogen_count() as f64 * h_mass
    })
}

/// Compute the molecular formula as a Hill system string.
///
/// The Hill system lists C first, then H, then remaining elements
/// alphabetically; molecules without carbon list all elements
/// alphabetically. With `include_charge`, a nonzero net charge is
/// appended sign first with the magnitude omitted at plus or minus one,
/// the display convention of mainstream toolkits: `+`, `-`, `+2`, `-2`.
pub fn mol_formula<A: HasAtomicNum + HasHydrogenCount + HasFormalCharge, B>(
    mol: &Mol<A, B>,
    include_charge: bool,
) -> String {
    let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
    let mut net_charge: i32 = 0;

    for idx in mol.atoms() {
        let a = mol.atom(idx);
        if let Some(elem) = Element::from_atomic_num(a.atomic_num()) {
            *counts.entry(elem.symbol()).or_default() += 1;
        }
        let hc = a.hydrogen_count() as u32;
        if hc > 0 {
            *counts.entry("H").or_default() += hc;
        }
        net_charge += a.formal_charge() as i32;
    }

    let mut result = String::new();

    let has_carbon = counts.contains_key("C");
    if has_carbon {
        append_element(&mut result, "C", counts.remove("C").unwrap());
        if let Some(h) = counts.remove("H") {
            append_element(&mut result, "H", h);
        }
    }

    for (sym, count) in &counts {
        append_element(&mut result, sym, *count);
    }

    if include_charge {
        match net_charge.cmp(&0) {
            std::cmp::Ordering::Greater => {
                result.push('+');
                if net_charge > 1 {
                    write!(result, "{net_charge}").unwrap();
                }
            }
            std::cmp::Ordering::Less => {
                result.push('-');
                if net_charge < -1 {
                    write!(result, "{}", net_charge.unsigned_abs()).unwrap();
                }
            }
            std::cmp::Ordering::Equal => {}
        }
    }

    result
}

/// Serialize element counts as a Hill system string.
///
/// Zero counts drop the element entirely, a count of one is written
/// without digits. With `include_charge` and a nonzero `net_charge` the
/// suffix keeps its digits even at magnitude one: `+1`, `-1`, `+2`, `-2`.
pub fn write_composition(
    counts: &BTreeMap<String, u32>,
    include_charge: bool,
    net_charge: i32,
) -> String {
    let mut result = String::new();

    let has_carbon = counts.get("C").is_some_and(|&c| c > 0);
    if has_carbon {
        append_element(&mut result, "C", counts["C"]);
        if let Some(&h) = counts.get("H") {
            if h > 0 {
                append_element(&mut result, "H", h);
            }
        }
    }

    for (sym, &count) in counts {
        if count == 0 || (has_carbon && (sym == "C" || sym == "H")) {
            continue;
        }
        append_element(&mut result, sym, count);
    }

    if include_charge && net_charge != 0 {
        if net_charge > 0 {
            write!(result, "+{net_charge}").unwrap();
        } else {
            write!(result, "{net_charge}").unwrap();
        }
    }

    result
}

fn append_element(buf: &mut String, symbol: &str, count: u32) {
    buf.push_str(symbol);
    if count > 1 {
        write!(buf, "{count}").unwrap();
    }
}

/// Parse element counts out of a composition string.
///
/// Scans for element tokens (an uppercase letter, an optional lowercase
/// letter, optional digits) and accumulates their counts. Anything else,
/// including a trailing charge suffix like `-2` or a bare `-`, is
/// skipped.
pub fn parse_composition(formula: &str) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut chars = formula.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_ascii_uppercase() {
            continue;
        }
        let mut symbol = String::from(c);
        if let Some(&lc) = chars.peek() {
            if lc.is_ascii_lowercase() {
                symbol.push(lc);
                chars.next();
            }
        }
        let mut count: u32 = 0;
        let mut has_digits = false;
        while let Some(d) = chars.peek().and_then(|ch| ch.to_digit(10)) {
            count = count.saturating_mul(10).saturating_add(d);
            has_digits = true;
            chars.next();
        }
        if !has_digits {
            count = 1;
        }
        *counts.entry(symbol).or_default() += count;
    }

    counts
}

/// Strip a trailing charge annotation from a formula string.
///
/// Handles both suffix shapes that turn up in formula output: a sign
/// followed by digits (`C8H4O4-2`) and a bare sign (`C2H3O2-`). Trailing
/// digits that are not preceded by a sign belong to an element count and
/// are left alone.
pub fn strip_charge_suffix(formula: &str) -> &str {
    let bytes = formula.as_bytes();
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1].is_ascii_digit() {
        end -= 1;
    }
    if end > 0 && (bytes[end - 1] == b'+' || bytes[end - 1] == b'-') {
        &formula[..end - 1]
    } else {
        formula
    }
}
