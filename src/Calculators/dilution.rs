use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DilutionMode {
    /// V2 from M1, V1, M2
    FinalVolume,
    /// M2 from M1, V1, V2
    FinalConcentration,
}

impl FromStr for DilutionMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v2" => Ok(DilutionMode::FinalVolume),
            "m2" => Ok(DilutionMode::FinalConcentration),
            _ => Err(s.to_string()),
        }
    }
}

/// Both sides of M1·V1 = M2·V2. Volumes keep whatever unit the user entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dilution {
    pub m1: f64,
    pub v1: f64,
    pub m2: f64,
    pub v2: f64,
}

impl Dilution {
    /// V2 / V1 = M1 / M2
    pub fn dilution_factor(&self) -> f64 {
        self.v2 / self.v1
    }
    pub fn solvent_added(&self) -> f64 {
        self.v2 - self.v1
    }
}

fn check_positive(m1: f64, v1: f64, other: f64) -> Result<(), CalcError> {
    ensure(m1 > 0.0 && v1 > 0.0 && other > 0.0, "All values must be positive")
}

/// V2 = M1·V1/M2. A dilution never concentrates, so M2 > M1 is rejected.
pub fn final_volume(m1: f64, v1: f64, m2: f64) -> Result<Dilution, CalcError> {
    check_positive(m1, v1, m2)?;
    ensure(
        m2 <= m1,
        "Final concentration (M2) cannot be greater than initial concentration (M1)",
    )?;
    Ok(Dilution {
        m1,
        v1,
        m2,
        v2: m1 * v1 / m2,
    })
}

/// M2 = M1·V1/V2; V2 < V1 is rejected.
pub fn final_concentration(m1: f64, v1: f64, v2: f64) -> Result<Dilution, CalcError> {
    check_positive(m1, v1, v2)?;
    ensure(
        v2 >= v1,
        "Final volume (V2) must be greater than initial volume (V1)",
    )?;
    Ok(Dilution {
        m1,
        v1,
        m2: m1 * v1 / v2,
        v2,
    })
}

#[derive(Debug, Clone, Default)]
pub struct DilutionCalculator;

const NAME: &str = "Dilution Calculator";

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "v2",
        label: "Final volume (V2)",
        formula: "V2 = M1·V1 / M2",
        fields: &[
            FieldSpec::required("m1", "Initial concentration M1", "M"),
            FieldSpec::required("v1", "Initial volume V1", "mL"),
            FieldSpec::required("m2", "Final concentration M2", "M"),
        ],
    },
    ModeSpec {
        key: "m2",
        label: "Final concentration (M2)",
        formula: "M2 = M1·V1 / V2",
        fields: &[
            FieldSpec::required("m1", "Initial concentration M1", "M"),
            FieldSpec::required("v1", "Initial volume V1", "mL"),
            FieldSpec::required("v2", "Final volume V2", "mL"),
        ],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Stock solution to working solution",
        mode: "v2",
        inputs: &[("m1", "5.0"), ("v1", "10"), ("m2", "1.0")],
        reference: Some(Reference {
            label: "V2",
            value: 50.0,
            unit: "mL",
        }),
        description: "Dilute 10 mL of 5.0 M stock down to 1.0 M",
    },
    ExamplePreset {
        name: "Concentrated HCl",
        mode: "m2",
        inputs: &[("m1", "12.0"), ("v1", "25"), ("v2", "500")],
        reference: Some(Reference {
            label: "M2",
            value: 0.6,
            unit: "M",
        }),
        description: "25 mL of 12 M HCl made up to 500 mL",
    },
];

impl Calculator for DilutionCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "dilution"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: DilutionMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let m1 = v.number("m1", "M1")?;
        let v1 = v.number("v1", "V1")?;
        let dilution = match parsed {
            DilutionMode::FinalVolume => final_volume(m1, v1, v.number("m2", "M2")?)?,
            DilutionMode::FinalConcentration => {
                final_concentration(m1, v1, v.number("v2", "V2")?)?
            }
        };
        debug!("dilution {:?}", dilution);
        let mut result = CalcResult::new(NAME, mode);
        match parsed {
            DilutionMode::FinalVolume => result.push_value("V2", dilution.v2, "mL"),
            DilutionMode::FinalConcentration => result.push_value("M2", dilution.m2, "M"),
        }
        Ok(result
            .with_value("Dilution factor", dilution.dilution_factor(), "")
            .with_value("Solvent to add", dilution.solvent_added(), "mL")
            .with_interpretation(format!(
                "Moles of solute are conserved: M1·V1 = {:.4} = M2·V2",
                dilution.m1 * dilution.v1
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::validation::ErrorKind;
    use approx::assert_relative_eq;

    #[test]
    fn stock_to_working_solution() {
        let d = final_volume(5.0, 10.0, 1.0).unwrap();
        assert_relative_eq!(d.v2, 50.0);
        assert_relative_eq!(d.dilution_factor(), 5.0);
        assert_relative_eq!(d.solvent_added(), 40.0);
    }

    #[test]
    fn dilution_never_concentrates() {
        for &(m1, v1, m2) in &[(1.0, 1.0, 1.0), (2.0, 3.5, 0.7), (0.1, 250.0, 0.001)] {
            let d = final_volume(m1, v1, m2).unwrap();
            assert_relative_eq!(d.v2, m1 * v1 / m2);
            assert!(d.v2 >= d.v1);
        }
        let err = final_volume(1.0, 10.0, 2.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn final_concentration_mode() {
        let d = final_concentration(12.0, 25.0, 500.0).unwrap();
        assert_relative_eq!(d.m2, 0.6);
        assert!(final_concentration(1.0, 100.0, 50.0).is_err());
        assert!(final_concentration(0.0, 10.0, 50.0).is_err());
    }

    #[test]
    fn form_calculation() {
        let form = FormState::from_pairs(&[("m1", "5.0"), ("v1", "10"), ("m2", "1.0")]);
        let result = DilutionCalculator.calculate("v2", &form).unwrap();
        assert_relative_eq!(result.value("V2").unwrap(), 50.0);

        let form = FormState::from_pairs(&[("m1", "5.0"), ("v1", "ten"), ("m2", "1.0")]);
        let err = DilutionCalculator.calculate("v2", &form).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let form = FormState::from_pairs(&[("m1", "5.0"), ("v1", "10")]);
        let err = DilutionCalculator.calculate("v2", &form).unwrap_err();
        assert_eq!(err.to_string(), "M2 is required");
    }

    #[test]
    fn overflowing_volume_is_refused() {
        let form = FormState::from_pairs(&[("m1", "1e308"), ("v1", "10"), ("m2", "1e-10")]);
        let err = DilutionCalculator.calculate("v2", &form).unwrap_err();
        assert_eq!(err.kind(), crate::Utils::validation::ErrorKind::Derived);
    }
}
