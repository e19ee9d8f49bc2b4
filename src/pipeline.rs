//! End-to-end normalization: one SMILES string in, one identified
//! anion record out.

use serde::Serialize;
use tracing::info;

use crate::deprotonate::deprotonate;
use crate::error::NormalizeError;
use crate::formula::{parse_composition, strip_charge_suffix};
use crate::identifier;
use crate::label::{self, LabelMode};
use crate::linker::Linker;

/// Normalized description of one linker.
///
/// Field order is the wire order; `removed_H` keeps its historical
/// spelling in serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkerRecord {
    #[serde(rename = "removed_H")]
    pub removed_h: usize,
    pub structure: String,
    pub standard_id: String,
    pub hashed_id: String,
    pub formula: String,
    pub exact_mass: f64,
    pub core_label: Option<String>,
}

/// Parse, sanitize, deprotonate, and identify one linker.
///
/// `remove_k` bounds proton removal as in [`deprotonate`]; the core
/// label is derived from the charge-stripped formula and is None when
/// the composition fits neither labeling model. Everything before the
/// label either succeeds completely or fails the whole run.
pub fn normalize(
    input: &str,
    remove_k: Option<usize>,
    label_mode: LabelMode,
) -> Result<LinkerRecord, NormalizeError> {
    let mut linker = Linker::from_smiles(input)?;
    linker.sanitize()?;
    let removed_h = deprotonate(&mut linker, remove_k)?;

    let structure = identifier::canonical_structure(&linker)?;
    let standard_id = identifier::structure_key(&linker)?;
    let hashed_id = identifier::hashed_key(&standard_id);
    let formula = identifier::formula_with_charge(&linker)?;
    let exact_mass = identifier::exact_mass(&linker)?;

    let counts = parse_composition(strip_charge_suffix(&formula));
    let core_label = label::choose_core_label(&counts, label_mode);

    info!(
        structure = structure.as_str(),
        formula = formula.as_str(),
        removed_h,
        "linker normalized"
    );

    Ok(LinkerRecord {
        removed_h,
        structure,
        standard_id,
        hashed_id,
        formula,
        exact_mass,
        core_label,
    })
}
