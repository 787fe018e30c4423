use crate::Calculators::calculator_api::Calculator;
use crate::Calculators::titration::*;
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, ErrorKind};
use approx::assert_relative_eq;

fn acetic_acid() -> TitrationSetup {
    TitrationSetup::new(TitrationKind::WeakAcidStrongBase, 0.100, 25.0, 0.100, Some(1.8e-5)).unwrap()
}

#[test]
fn acetic_acid_with_sodium_hydroxide() {
    let setup = acetic_acid();
    assert_relative_eq!(setup.initial_ph(), 2.87, epsilon = 0.005);
    assert_relative_eq!(setup.equivalence_volume(), 25.0, epsilon = 1e-12);
    assert_relative_eq!(setup.equivalence_ph(), 8.72, epsilon = 0.005);
    assert_relative_eq!(setup.half_equivalence_ph().unwrap(), 4.74, epsilon = 0.01);
    // the buffer formula reproduces pKa at half-equivalence
    assert_relative_eq!(
        setup.ph_at(12.5).unwrap(),
        setup.half_equivalence_ph().unwrap(),
        epsilon = 1e-9
    );
}

#[test]
fn acetic_acid_scenario_through_the_form() {
    let form = FormState::from_pairs(&[
        ("acid_conc", "0.100"),
        ("acid_volume", "25.0"),
        ("base_conc", "0.100"),
        ("base_volume", "0"),
        ("ka", "1.8e-5"),
    ]);
    let result = TitrationCalculator.calculate("weak_strong", &form).unwrap();
    assert_relative_eq!(result.value("Initial pH").unwrap(), 2.87, epsilon = 0.005);
    assert_relative_eq!(result.value("Equivalence volume").unwrap(), 25.0, epsilon = 1e-9);
    assert_relative_eq!(result.value("pH at equivalence").unwrap(), 8.72, epsilon = 0.005);
    assert_relative_eq!(result.value("pH at half-equivalence").unwrap(), 4.74, epsilon = 0.01);
    assert_relative_eq!(result.value("pH at titrant volume").unwrap(), 2.87, epsilon = 0.005);
    assert_eq!(
        result.interpretation[0],
        "Basic equivalence point: the conjugate base hydrolyses"
    );
}

#[test]
fn strong_acid_strong_base() {
    let setup =
        TitrationSetup::new(TitrationKind::StrongAcidStrongBase, 0.1, 25.0, 0.1, None).unwrap();
    assert_relative_eq!(setup.initial_ph(), 1.0, epsilon = 1e-12);
    assert_eq!(setup.equivalence_ph(), 7.0);
    assert_eq!(setup.half_equivalence_ph(), None);
    assert_eq!(setup.ph_at(25.0).unwrap(), 7.0);
    // 5 mL excess of 0.1 M base in 55 mL
    assert_relative_eq!(setup.ph_at(30.0).unwrap(), 14.0 + (0.5_f64 / 55.0).log10(), epsilon = 1e-9);
    let curve = setup.curve(10).unwrap();
    assert_eq!(curve.len(), 11);
    assert!(curve.windows(2).all(|w| w[1].1 > w[0].1));
}

#[test]
fn weak_base_with_strong_acid() {
    let setup =
        TitrationSetup::new(TitrationKind::StrongAcidWeakBase, 0.1, 25.0, 0.1, Some(1.8e-5)).unwrap();
    assert_relative_eq!(setup.initial_ph(), 11.13, epsilon = 0.005);
    assert_relative_eq!(setup.half_equivalence_ph().unwrap(), 9.26, epsilon = 0.005);
    assert_relative_eq!(setup.equivalence_ph(), 5.28, epsilon = 0.005);
    assert!(setup.ph_at(30.0).unwrap() < 3.0);

    let form = FormState::from_pairs(&[
        ("acid_conc", "0.1"),
        ("acid_volume", "12.5"),
        ("base_conc", "0.1"),
        ("base_volume", "25"),
        ("kb", "1.8e-5"),
    ]);
    let result = TitrationCalculator.calculate("strong_weak", &form).unwrap();
    assert_relative_eq!(result.value("pH at titrant volume").unwrap(), 9.255, epsilon = 0.005);
}

#[test]
fn missing_or_invalid_constants() {
    let err = TitrationSetup::new(TitrationKind::WeakAcidStrongBase, 0.1, 25.0, 0.1, None).unwrap_err();
    assert_eq!(err, CalcError::Missing { field: "Ka".to_string() });
    let err =
        TitrationSetup::new(TitrationKind::StrongAcidWeakBase, 0.1, 25.0, 0.1, Some(0.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert!(TitrationSetup::new(TitrationKind::StrongAcidStrongBase, 0.1, 0.0, 0.1, None).is_err());
    assert!(acetic_acid().ph_at(-1.0).is_err());
}
