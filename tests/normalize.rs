use linkernorm::formula::{parse_composition, strip_charge_suffix};
use linkernorm::{
    LabelMode, Linker, NormalizeError, deprotonate, detect_acid_sites, normalize,
    ring_factored_label,
};

const ACETIC: &str = "CC(=O)O";
const BENZOIC: &str = "OC(=O)c1ccccc1";
const TEREPHTHALIC: &str = "OC(=O)c1ccc(C(=O)O)cc1";
const ETHYNE_DIBENZOIC: &str = "OC(=O)c1ccc(C#Cc2ccc(C(=O)O)cc2)cc1";
const SULFOBENZOIC: &str = "OC(=O)c1ccc(S(O)(=O)=O)cc1";
const DISULFONIC: &str = "OS(=O)(=O)c1ccc(S(=O)(=O)O)cc1";
const PHENYLPHOSPHONIC: &str = "OP(=O)(O)c1ccccc1";

fn sanitized(smiles: &str) -> Linker {
    let mut linker = Linker::from_smiles(smiles).unwrap();
    linker.sanitize().unwrap();
    linker
}

#[test]
fn full_deprotonation_with_aggregated_label() {
    let record = normalize(ETHYNE_DIBENZOIC, None, LabelMode::Aggregated).unwrap();
    assert_eq!(record.removed_h, 2);
    assert_eq!(record.formula, "C16H8O4-2");
    assert_eq!(record.core_label.as_deref(), Some("[(C14H8)(CO2)2]"));
}

#[test]
fn auto_mode_prefers_the_ring_factored_label() {
    let record = normalize(ETHYNE_DIBENZOIC, None, LabelMode::Auto).unwrap();
    assert_eq!(record.core_label.as_deref(), Some("[(C6H4C)_2(CO2)2]"));
}

#[test]
fn odd_oxygen_count_leaves_identifiers_intact() {
    // 4-formylbenzoic acid: the aldehyde oxygen makes the total odd.
    let record = normalize("O=Cc1ccc(C(=O)O)cc1", None, LabelMode::Auto).unwrap();
    assert_eq!(record.removed_h, 1);
    assert_eq!(record.formula, "C8H5O3-1");
    assert_eq!(record.core_label, None);
    assert!(record.standard_id.starts_with("MS1/C8H5O3/c"));
    assert!(record.standard_id.ends_with("/q-1"));
    assert_eq!(record.hashed_id.len(), 16);
}

#[test]
fn disallowed_element_yields_null_label() {
    let record = normalize("OC(=O)c1ccc(B(O)O)cc1", None, LabelMode::Auto).unwrap();
    assert_eq!(record.core_label, None);
    assert_eq!(record.formula, "C7H6BO4-1");
    assert!(record.standard_id.starts_with("MS1/C7H6BO4/c"));
    assert!(!record.structure.is_empty());
}

#[test]
fn bounded_removal_consumes_one_site() {
    let record = normalize(TEREPHTHALIC, Some(1), LabelMode::Auto).unwrap();
    assert_eq!(record.removed_h, 1);
    assert_eq!(record.formula, "C8H5O4-1");
    assert_eq!(record.structure.matches("[O-]").count(), 1);
    assert!(record.standard_id.ends_with("/q-1"));
}

#[test]
fn unparsable_input_fails_with_invalid_structure() {
    for bad in ["not a molecule", "C1CC", "", "C(C"] {
        let err = normalize(bad, None, LabelMode::Auto).unwrap_err();
        assert!(
            matches!(err, NormalizeError::InvalidStructure(_)),
            "input {bad:?} gave {err:?}"
        );
    }
}

#[test]
fn zero_bound_yields_a_neutral_record() {
    let record = normalize(TEREPHTHALIC, Some(0), LabelMode::Auto).unwrap();
    assert_eq!(record.removed_h, 0);
    assert_eq!(record.formula, "C8H6O4");
    assert!(!record.standard_id.contains("/q"));
}

#[test]
fn deprotonation_bound_invariant() {
    let inputs = [ACETIC, BENZOIC, TEREPHTHALIC, SULFOBENZOIC, "c1ccccc1"];
    for smiles in inputs {
        let available = detect_acid_sites(sanitized(smiles).mol()).len();
        for k in [None, Some(0), Some(1), Some(2), Some(5)] {
            let mut linker = sanitized(smiles);
            let removed = deprotonate(&mut linker, k).unwrap();
            let bound = k.unwrap_or(available).min(available);
            assert_eq!(removed, bound, "input {smiles}, k {k:?}");
            if k.is_none() {
                assert_eq!(removed, available, "input {smiles}");
            }
        }
    }
}

#[test]
fn charge_conservation() {
    let inputs = [ACETIC, BENZOIC, TEREPHTHALIC, ETHYNE_DIBENZOIC, DISULFONIC];
    for smiles in inputs {
        for k in [None, Some(1)] {
            let mut linker = sanitized(smiles);
            let removed = deprotonate(&mut linker, k).unwrap();
            assert_eq!(
                linker.net_charge(),
                -(removed as i32),
                "input {smiles}, k {k:?}"
            );
        }
    }
}

#[test]
fn selector_consistency_in_auto_mode() {
    let inputs = [ACETIC, BENZOIC, TEREPHTHALIC, ETHYNE_DIBENZOIC, SULFOBENZOIC];
    for smiles in inputs {
        let record = normalize(smiles, None, LabelMode::Auto).unwrap();
        let counts = parse_composition(strip_charge_suffix(&record.formula));
        if let Some((ring_label, b)) = ring_factored_label(&counts) {
            if b > 0 {
                assert_eq!(
                    record.core_label.as_deref(),
                    Some(ring_label.as_str()),
                    "input {smiles}"
                );
            }
        }
    }
}

#[test]
fn sulfonic_sites_are_consumed() {
    let record = normalize(DISULFONIC, None, LabelMode::Auto).unwrap();
    assert_eq!(record.removed_h, 2);
    assert_eq!(record.formula, "C6H4O6S2-2");
    // The labeling model only sees counts; sulfur rides along as a
    // hetero token.
    assert_eq!(record.core_label.as_deref(), Some("[(C3H4S2)(CO2)3]"));
}

#[test]
fn phosphonic_sites_are_consumed() {
    let record = normalize(PHENYLPHOSPHONIC, None, LabelMode::Auto).unwrap();
    assert_eq!(record.removed_h, 2);
    assert_eq!(record.formula, "C6H5O3P-2");
    // Odd oxygen count: no label.
    assert_eq!(record.core_label, None);
}

#[test]
fn mixed_acid_families_are_unioned() {
    let record = normalize(SULFOBENZOIC, None, LabelMode::Auto).unwrap();
    assert_eq!(record.removed_h, 2);
    assert!(record.standard_id.ends_with("/q-2"));
}

#[test]
fn identifier_shape_is_stable() {
    let inputs = [ACETIC, TEREPHTHALIC, ETHYNE_DIBENZOIC, DISULFONIC];
    for smiles in inputs {
        let record = normalize(smiles, None, LabelMode::Auto).unwrap();
        assert!(record.standard_id.starts_with("MS1/"), "input {smiles}");
        assert_eq!(record.hashed_id.len(), 16, "input {smiles}");
        assert!(
            record
                .hashed_id
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "input {smiles}"
        );
        assert!(record.exact_mass > 0.0, "input {smiles}");
    }
}

#[test]
fn records_are_input_spelling_invariant() {
    let a = normalize("OC(=O)c1ccc(C(=O)O)cc1", None, LabelMode::Auto).unwrap();
    let b = normalize("c1cc(C(O)=O)ccc1C(O)=O", None, LabelMode::Auto).unwrap();
    assert_eq!(a, b);
}
