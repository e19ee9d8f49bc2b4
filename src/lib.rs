pub mod acid;
pub mod aromaticity;
pub mod atom;
pub mod bond;
pub mod canonical;
pub mod deprotonate;
pub mod element;
pub mod error;
pub mod formula;
pub mod graph_ops;
pub mod identifier;
pub mod kekulize;
pub mod label;
pub mod linker;
pub mod mol;
pub mod pipeline;
pub mod rings;
pub mod smarts;
pub mod smiles;
pub mod substruct;
pub mod traits;
pub mod valence;

pub use acid::{ACID_SMARTS, detect_acid_sites};
pub use aromaticity::perceive_aromaticity;
pub use atom::Atom;
pub use bond::{Bond, BondOrder, SmilesBond, SmilesBondOrder};
pub use deprotonate::deprotonate;
pub use element::Element;
pub use error::{NormalizeError, SanitizeError};
pub use formula::{average_mol_weight, exact_mol_weight, mol_formula};
pub use kekulize::{KekulizeError, kekulize};
pub use label::{LabelMode, aggregated_label, choose_core_label, ring_factored_label};
pub use linker::Linker;
pub use mol::Mol;
pub use pipeline::{LinkerRecord, normalize};
pub use smarts::{
    SmartsError, from_smarts, get_smarts_match, get_smarts_matches, has_smarts_match,
};
pub use smiles::{SmilesError, from_smiles, parse_smiles, to_canonical_smiles, to_smiles};
pub use traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount, HasIsotope,
};
pub use valence::{ValenceError, check_valence, total_valence};
