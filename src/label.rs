//! Symbolic core labels for deprotonated linkers.
//!
//! Both labelers model the structure as an aryl core carrying `m = O/2`
//! deprotonated carboxylate groups; each group accounts for two oxygens
//! and one carbon out of the elemental composition. The aggregated
//! notation states the leftover core as one flat count,
//! `[(C14H8)(CO2)2]`, while the ring-factored notation expresses it as
//! repeated benzene rings with a per-ring extra-carbon count `b`,
//! `[(C6H4C)_2(CO2)2]`. Unit counts collapse in the aggregated core
//! (`C1` is written `C`), but a ring head always spells out its hydrogen
//! count.

use std::collections::BTreeMap;
use std::fmt::Write;

use tracing::debug;

/// Elements a composition may contain and still be eligible for labeling.
pub const ALLOWED_ELEMENTS: [&str; 6] = ["C", "H", "O", "N", "S", "P"];

/// Ring-multiplicity candidates, in search order. A fixed heuristic set
/// covering common linker topologies, not general ring perception.
pub const RING_MULTIPLICITIES: [u32; 4] = [2, 3, 1, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    #[default]
    Auto,
    Aggregated,
    Ring,
}

/// The carboxylate split shared by both labelers.
struct CoreSplit {
    co2_groups: u32,
    core_carbons: i64,
    core_hydrogens: u32,
    hetero: String,
}

fn split_carboxylates(counts: &BTreeMap<String, u32>) -> Option<CoreSplit> {
    if counts
        .keys()
        .any(|el| !ALLOWED_ELEMENTS.contains(&el.as_str()))
    {
        return None;
    }
    let c = counts.get("C").copied().unwrap_or(0) as i64;
    let h = counts.get("H").copied().unwrap_or(0);
    let o = counts.get("O").copied().unwrap_or(0);
    // A carboxylate pair needs exactly two oxygens.
    if o % 2 != 0 {
        return None;
    }
    let m = o / 2;
    Some(CoreSplit {
        co2_groups: m,
        core_carbons: c - m as i64,
        core_hydrogens: h,
        hetero: hetero_tokens(counts),
    })
}

fn element_token(el: &str, n: u32) -> String {
    match n {
        0 => String::new(),
        1 => el.to_string(),
        _ => format!("{el}{n}"),
    }
}

/// The aromatic core always names its hydrogen count, even at zero.
fn hydrogen_token(n: u32) -> String {
    if n == 1 {
        "H".to_string()
    } else {
        format!("H{n}")
    }
}

fn hetero_tokens(counts: &BTreeMap<String, u32>) -> String {
    counts
        .iter()
        .filter(|(el, _)| !matches!(el.as_str(), "C" | "H" | "O"))
        .map(|(el, &n)| element_token(el, n))
        .collect()
}

fn co2_token(m: u32) -> String {
    if m == 1 {
        "(CO2)".to_string()
    } else {
        format!("(CO2){m}")
    }
}

/// Aggregated label `[(C{C'}H{H'}{hetero})(CO2){m}]`.
///
/// None when the composition is ineligible: a disallowed element, an odd
/// oxygen count, or no carbon left for the core after the carboxylate
/// split.
pub fn aggregated_label(counts: &BTreeMap<String, u32>) -> Option<String> {
    let split = split_carboxylates(counts)?;
    if split.core_carbons <= 0 {
        return None;
    }
    let core_c = element_token("C", split.core_carbons as u32);
    let core_h = hydrogen_token(split.core_hydrogens);
    let co2 = co2_token(split.co2_groups);
    Some(format!("[({core_c}{core_h}{}){co2}]", split.hetero))
}

/// Ring-factored label and its per-ring extra carbon count `b`.
///
/// Tries every multiplicity in [`RING_MULTIPLICITIES`] and keeps the
/// candidate with the strictly greatest `b`; on equal scores the earlier
/// candidate stands. None when no multiplicity fits the composition.
pub fn ring_factored_label(counts: &BTreeMap<String, u32>) -> Option<(String, u32)> {
    let split = split_carboxylates(counts)?;
    let extras = if split.hetero.is_empty() {
        String::new()
    } else {
        format!("({})", split.hetero)
    };
    let co2 = co2_token(split.co2_groups);

    let mut best: Option<(String, u32)> = None;
    for r in RING_MULTIPLICITIES {
        let ring_carbons = 6 * r as i64;
        if split.core_carbons < ring_carbons || split.core_hydrogens % r != 0 {
            continue;
        }
        let k = split.core_hydrogens / r;
        if k > 6 {
            // A benzene ring cannot bear more than six hydrogens.
            continue;
        }
        let b_numerator = split.core_carbons - ring_carbons;
        if b_numerator % r as i64 != 0 {
            continue;
        }
        let b = (b_numerator / r as i64) as u32;

        let mut head = format!("C6H{k}");
        if b == 1 {
            head.push('C');
        } else if b > 1 {
            write!(head, "C{b}").unwrap();
        }
        let group = if r == 1 {
            format!("({head})")
        } else {
            format!("({head})_{r}")
        };
        let label = format!("[{group}{extras}{co2}]");
        if best.as_ref().is_none_or(|(_, best_b)| b > *best_b) {
            best = Some((label, b));
        }
    }
    best
}

/// Pick the core label for the requested mode.
///
/// `auto` prefers the ring-factored label only when it exists and carries
/// extra carbon information (`b > 0`); a ring label with `b == 0` says
/// nothing the aggregated label does not.
pub fn choose_core_label(counts: &BTreeMap<String, u32>, mode: LabelMode) -> Option<String> {
    let aggregated = aggregated_label(counts);
    let ring = ring_factored_label(counts);
    debug!(
        aggregated = aggregated.as_deref(),
        ring = ?ring,
        "label candidates"
    );
    match mode {
        LabelMode::Aggregated => aggregated,
        LabelMode::Ring => ring.map(|(label, _)| label),
        LabelMode::Auto => match ring {
            Some((label, b)) if b > 0 => Some(label),
            _ => aggregated,
        },
    }
}
