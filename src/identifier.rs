//! Identifier derivation for sanitized structures.
//!
//! Every function here refuses to run on an unsanitized [`Linker`] and
//! never returns a partial value. The standardized exchange identifier is
//! a layered key: `MS1/<formula>/c<canonical SMILES>` with a `/q<charge>`
//! layer appended only when the net charge is nonzero. The hashed
//! identifier is the SHA-256 of that key, truncated for compact storage.

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::error::NormalizeError;
use crate::formula::{exact_mol_weight, mol_formula, strip_charge_suffix};
use crate::linker::Linker;
use crate::smiles::to_canonical_smiles;

/// Canonical SMILES of the structure. Stereo-free by construction.
pub fn canonical_structure(linker: &Linker) -> Result<String, NormalizeError> {
    ensure_sanitized(linker)?;
    Ok(to_canonical_smiles(linker.mol()))
}

/// Layered exchange identifier for the structure.
pub fn structure_key(linker: &Linker) -> Result<String, NormalizeError> {
    ensure_sanitized(linker)?;
    let formula = mol_formula(linker.mol(), false);
    let canonical = to_canonical_smiles(linker.mol());
    let mut key = format!("MS1/{formula}/c{canonical}");
    let net = linker.net_charge();
    if net != 0 {
        write!(key, "/q{net:+}").unwrap();
    }
    Ok(key)
}

/// Lowercase hex SHA-256 of a structure key, truncated to 16 characters.
pub fn hashed_key(structure_key: &str) -> String {
    let digest = Sha256::digest(structure_key.as_bytes());
    let mut hex = String::with_capacity(2 * digest.len());
    for byte in digest {
        write!(hex, "{byte:02x}").unwrap();
    }
    hex.truncate(16);
    hex
}

/// Hill formula with the net charge re-appended in normalized form.
///
/// The toolkit-style formula omits the charge magnitude at plus or minus
/// one, so the suffix is stripped and rebuilt with digits always present:
/// `C8H4O4-2`, `C2H3O2-1`.
pub fn formula_with_charge(linker: &Linker) -> Result<String, NormalizeError> {
    ensure_sanitized(linker)?;
    let raw = mol_formula(linker.mol(), true);
    let base = strip_charge_suffix(&raw);
    let net = linker.net_charge();
    if net == 0 {
        Ok(base.to_string())
    } else {
        Ok(format!("{base}{net:+}"))
    }
}

/// Monoisotopic exact mass in daltons.
pub fn exact_mass(linker: &Linker) -> Result<f64, NormalizeError> {
    ensure_sanitized(linker)?;
    Ok(exact_mol_weight(linker.mol()))
}

fn ensure_sanitized(linker: &Linker) -> Result<(), NormalizeError> {
    if linker.is_sanitized() {
        Ok(())
    } else {
        Err(NormalizeError::UnsanitizedStructure)
    }
}
