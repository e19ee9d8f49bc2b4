//! The pipeline's working structure: a molecule plus its sanitization
//! state.
//!
//! Identifier computations are only meaningful on a sanitized structure,
//! so [`Linker`] tracks whether the molecule has been sanitized since its
//! last mutation. The mutators used by deprotonation clear the flag and
//! [`Linker::sanitize`] sets it again after re-validation.

use petgraph::graph::NodeIndex;

use crate::aromaticity::perceive_aromaticity;
use crate::atom::Atom;
use crate::bond::Bond;
use crate::error::SanitizeError;
use crate::mol::Mol;
use crate::smiles::{self, SmilesError};
use crate::valence::check_valence;

pub struct Linker {
    mol: Mol<Atom, Bond>,
    sanitized: bool,
}

impl Linker {
    /// Parse a structure from SMILES. The result is not yet sanitized.
    pub fn from_smiles(input: &str) -> Result<Linker, SmilesError> {
        Ok(Linker {
            mol: smiles::from_smiles(input)?,
            sanitized: false,
        })
    }

    pub fn new(mol: Mol<Atom, Bond>) -> Linker {
        Linker {
            mol,
            sanitized: false,
        }
    }

    /// Aromaticity perception followed by valence validation.
    ///
    /// Sets the sanitized flag on success and leaves it clear on failure.
    /// Atoms carrying a formal charge are exempt from the valence check,
    /// so a deprotonated carboxylate oxygen re-validates cleanly.
    pub fn sanitize(&mut self) -> Result<(), SanitizeError> {
        self.sanitized = false;
        perceive_aromaticity(&mut self.mol);
        check_valence(&self.mol).map_err(|violations| SanitizeError { violations })?;
        self.sanitized = true;
        Ok(())
    }

    pub fn is_sanitized(&self) -> bool {
        self.sanitized
    }

    pub fn mol(&self) -> &Mol<Atom, Bond> {
        &self.mol
    }

    /// Set an atom's formal charge. Clears the sanitized flag.
    pub fn set_formal_charge(&mut self, idx: NodeIndex, charge: i8) {
        self.mol.atom_mut(idx).formal_charge = charge;
        self.sanitized = false;
    }

    /// Set an atom's stored hydrogen count. Clears the sanitized flag.
    ///
    /// Hydrogens are stored as per-atom counts rather than graph nodes,
    /// so zeroing the count is how a proton is removed.
    pub fn set_hydrogen_count(&mut self, idx: NodeIndex, count: u8) {
        self.mol.atom_mut(idx).hydrogen_count = count;
        self.sanitized = false;
    }

    /// Sum of formal charges over all atoms.
    pub fn net_charge(&self) -> i32 {
        self.mol
            .atoms()
            .map(|i| self.mol.atom(i).formal_charge as i32)
            .sum()
    }
}
