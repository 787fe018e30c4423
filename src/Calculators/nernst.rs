use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Calculators::interpretation::{Band, ThresholdTable};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure};
use log::debug;
use std::str::FromStr;

/// J/(mol·K)
const R: f64 = 8.314;
/// Faraday constant, C/mol
pub const F: f64 = 96485.0;
pub const STANDARD_TEMPERATURE: f64 = 298.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NernstMode {
    Potential,
    Quotient,
}

impl FromStr for NernstMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "potential" => Ok(NernstMode::Potential),
            "quotient" => Ok(NernstMode::Quotient),
            _ => Err(s.to_string()),
        }
    }
}

fn check_cell(n: f64, t: f64) -> Result<(), CalcError> {
    ensure(n != 0.0, "Electrons transferred must be non-zero")?;
    ensure(t > 0.0, "Temperature must be positive")
}

/// E = E° - (RT/nF)·ln Q
pub fn cell_potential(e0: f64, n: f64, q: f64, t: f64) -> Result<f64, CalcError> {
    check_cell(n, t)?;
    ensure(q > 0.0, "Reaction quotient must be positive.")?;
    Ok(e0 - (R * t) / (n * F) * q.ln())
}

/// inverse form, Q = exp(nF(E° - E)/RT)
pub fn reaction_quotient(e0: f64, e: f64, n: f64, t: f64) -> Result<f64, CalcError> {
    check_cell(n, t)?;
    Ok((n * F * (e0 - e) / (R * t)).exp())
}

/// ΔG = -nFE in kJ/mol
pub fn gibbs_from_potential(n: f64, e: f64) -> f64 {
    -n * F * e / 1000.0
}

const CELL: ThresholdTable = ThresholdTable::new(
    &[
        Band::gt(0.0, "Positive cell potential: the reaction is spontaneous (galvanic cell)"),
        Band::lt(0.0, "Negative cell potential: the reaction is non-spontaneous (electrolytic cell)"),
    ],
    "Zero cell potential: the cell is at equilibrium",
);

#[derive(Debug, Clone, Default)]
pub struct NernstCalculator;

const NAME: &str = "Nernst Equation Calculator";

const E0: FieldSpec = FieldSpec::required("e0", "Standard cell potential E°", "V");
const N: FieldSpec = FieldSpec::required("n", "Electrons transferred n", "");
const T: FieldSpec = FieldSpec::optional("temperature", "Temperature (default 298.15)", "K");

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "potential",
        label: "Cell potential E",
        formula: "E = E° - (RT/nF)·ln Q",
        fields: &[E0, N, FieldSpec::required("q", "Reaction quotient Q", ""), T],
    },
    ModeSpec {
        key: "quotient",
        label: "Reaction quotient Q",
        formula: "Q = exp(nF(E° - E)/RT)",
        fields: &[E0, N, FieldSpec::required("e", "Measured cell potential E", "V"), T],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Daniell cell",
        mode: "potential",
        inputs: &[("e0", "1.10"), ("n", "2"), ("q", "0.01"), ("temperature", "298.15")],
        reference: Some(Reference {
            label: "E",
            value: 1.159,
            unit: "V",
        }),
        description: "Zn | Zn2+ (0.01 M) || Cu2+ (1 M) | Cu",
    },
    ExamplePreset {
        name: "Concentration cell",
        mode: "potential",
        inputs: &[("e0", "0"), ("n", "2"), ("q", "0.001")],
        reference: None,
        description: "Same electrodes, thousandfold concentration ratio",
    },
    ExamplePreset {
        name: "Quotient from a measured potential",
        mode: "quotient",
        inputs: &[("e0", "1.10"), ("n", "2"), ("e", "1.04")],
        reference: None,
        description: "Daniell cell reading 60 mV below standard",
    },
];

impl Calculator for NernstCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "nernst"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: NernstMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let e0 = v.number("e0", "Standard potential")?;
        let n = v.non_zero("n", "Electrons transferred")?;
        let t = v
            .optional_number("temperature", "Temperature")?
            .unwrap_or(STANDARD_TEMPERATURE);
        let result = CalcResult::new(NAME, mode);
        let (result, e) = match parsed {
            NernstMode::Potential => {
                let e = cell_potential(e0, n, v.number("q", "Reaction quotient")?, t)?;
                (result.with_value("E", e, "V"), e)
            }
            NernstMode::Quotient => {
                let e = v.number("e", "Cell potential")?;
                let q = reaction_quotient(e0, e, n, t)?;
                (result.with_value("Q", q, ""), e)
            }
        };
        debug!("nernst: E = {} V at {} K", e, t);
        Ok(result
            .with_value("ΔE = E - E°", e - e0, "V")
            .with_value("ΔG", gibbs_from_potential(n, e), "kJ/mol")
            .with_interpretation(CELL.classify(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn daniell_cell() {
        let e = cell_potential(1.10, 2.0, 0.01, 298.15).unwrap();
        assert_relative_eq!(e, 1.1592, epsilon = 1e-4);
        assert_relative_eq!(cell_potential(1.10, 2.0, 1.0, 298.15).unwrap(), 1.10);
        assert_relative_eq!(gibbs_from_potential(2.0, 1.10), -212.267, epsilon = 1e-3);
    }

    #[test]
    fn quotient_inverts_potential() {
        let e = cell_potential(0.8, 1.0, 42.0, 310.0).unwrap();
        assert_relative_eq!(reaction_quotient(0.8, e, 1.0, 310.0).unwrap(), 42.0, max_relative = 1e-10);
    }

    #[test]
    fn invalid_cells() {
        assert_eq!(
            cell_potential(1.1, 2.0, 0.0, 298.15).unwrap_err().to_string(),
            "Reaction quotient must be positive."
        );
        assert!(cell_potential(1.1, 0.0, 1.0, 298.15).is_err());
        assert!(cell_potential(1.1, 2.0, 1.0, 0.0).is_err());
        let form = FormState::from_pairs(&[("e0", "1.1"), ("n", "0"), ("q", "1")]);
        assert!(NernstCalculator.calculate("potential", &form).is_err());
    }

    #[test]
    fn default_temperature_and_spontaneity() {
        let result = NernstCalculator
            .calculate("potential", &EXAMPLES[1].to_form())
            .unwrap();
        assert!(result.value("E").unwrap() > 0.0);
        assert!(result.value("ΔG").unwrap() < 0.0);
        assert!(result.interpretation[0].contains("spontaneous (galvanic"));
    }

    #[test]
    fn overflowing_quotient_is_refused() {
        let form = FormState::from_pairs(&[("e0", "10"), ("n", "100"), ("e", "-10")]);
        let err = NernstCalculator.calculate("quotient", &form).unwrap_err();
        assert!(err.to_string().starts_with("Result is out of numeric range: Q"));
    }
}
