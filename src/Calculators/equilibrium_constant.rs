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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquilibriumMode {
    Concentrations,
    Gibbs,
}

impl FromStr for EquilibriumMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concentrations" => Ok(EquilibriumMode::Concentrations),
            "gibbs" => Ok(EquilibriumMode::Gibbs),
            _ => Err(s.to_string()),
        }
    }
}

pub const POSITION: ThresholdTable = ThresholdTable::new(
    &[
        Band::gt(1000.0, "Strongly favors products (forward reaction)"),
        Band::gt(10.0, "Favors products"),
        Band::ge(0.1, "Significant amounts of both reactants and products"),
        Band::ge(0.001, "Favors reactants"),
    ],
    "Strongly favors reactants (reverse reaction)",
);

/// K = [products]/[reactants], the concentration products already multiplied out
pub fn k_from_concentrations(products: f64, reactants: f64) -> Result<f64, CalcError> {
    ensure(
        products >= 0.0 && reactants > 0.0,
        "Concentrations must be non-negative. Reactant concentrations must be positive.",
    )?;
    Ok(products / reactants)
}

/// K = exp(-ΔG°/RT), ΔG° in kJ/mol
pub fn k_from_gibbs(dg_kj: f64, t: f64) -> Result<f64, CalcError> {
    ensure(t > 0.0, "Temperature must be positive")?;
    Ok((-dg_kj * 1000.0 / (R * t)).exp())
}

/// ΔG° = -RT·ln K in kJ/mol
pub fn gibbs_from_k(k: f64, t: f64) -> f64 {
    -R * t * k.ln() / 1000.0
}

#[derive(Debug, Clone, Default)]
pub struct EquilibriumConstantCalculator;

const NAME: &str = "Equilibrium Constant Calculator";

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "concentrations",
        label: "From equilibrium concentrations",
        formula: "K = [products] / [reactants]",
        fields: &[
            FieldSpec::required("products", "Product of product concentrations", "M^n"),
            FieldSpec::required("reactants", "Product of reactant concentrations", "M^n"),
            FieldSpec::optional("temperature", "Temperature (for ΔG°)", "K"),
        ],
    },
    ModeSpec {
        key: "gibbs",
        label: "From standard Gibbs energy",
        formula: "K = exp(-ΔG°/RT)",
        fields: &[
            FieldSpec::required("gibbs", "Standard Gibbs energy ΔG°", "kJ/mol"),
            FieldSpec::required("temperature", "Temperature T", "K"),
        ],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Hydrogen iodide equilibrium",
        mode: "concentrations",
        inputs: &[("products", "0.0244"), ("reactants", "4.6e-4")],
        reference: Some(Reference {
            label: "K",
            value: 53.0,
            unit: "",
        }),
        description: "[HI]² / ([H2][I2]) at 731 K",
    },
    ExamplePreset {
        name: "Ammonia synthesis from ΔG°",
        mode: "gibbs",
        inputs: &[("gibbs", "-32.9"), ("temperature", "298")],
        reference: None,
        description: "Large K at room temperature",
    },
];

impl Calculator for EquilibriumConstantCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "equilibrium_constant"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: EquilibriumMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let mut result = CalcResult::new(NAME, mode);
        let k = match parsed {
            EquilibriumMode::Concentrations => {
                let k = k_from_concentrations(
                    v.number("products", "Product concentrations")?,
                    v.number("reactants", "Reactant concentrations")?,
                )?;
                result.push_value("K", k, "");
                if let Some(t) = v.optional_number("temperature", "Temperature")? {
                    ensure(t > 0.0, "Temperature must be positive")?;
                    if k > 0.0 {
                        result.push_value("ΔG°", gibbs_from_k(k, t), "kJ/mol");
                    }
                }
                k
            }
            EquilibriumMode::Gibbs => {
                let k = k_from_gibbs(v.number("gibbs", "ΔG°")?, v.number("temperature", "Temperature")?)?;
                result.push_value("K", k, "");
                result.push_value("log10 K", k.log10(), "");
                k
            }
        };
        debug!("equilibrium constant {}", k);
        Ok(result.with_interpretation(POSITION.classify(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn position_bands() {
        assert_eq!(POSITION.classify(5000.0), "Strongly favors products (forward reaction)");
        assert_eq!(POSITION.classify(53.0), "Favors products");
        assert_eq!(POSITION.classify(0.1), "Significant amounts of both reactants and products");
        assert_eq!(POSITION.classify(0.001), "Favors reactants");
        assert_eq!(POSITION.classify(0.0), "Strongly favors reactants (reverse reaction)");
    }

    #[test]
    fn gibbs_round_trip() {
        let k = k_from_gibbs(-32.9, 298.0).unwrap();
        assert!(k > 1e5);
        assert_relative_eq!(gibbs_from_k(k, 298.0), -32.9, epsilon = 1e-9);
        assert_relative_eq!(k_from_gibbs(0.0, 298.0).unwrap(), 1.0);
    }

    #[test]
    fn reactants_must_be_present() {
        assert!(k_from_concentrations(1.0, 0.0).is_err());
        assert!(k_from_concentrations(-1.0, 1.0).is_err());
        let form = FormState::from_pairs(&[("products", "0.0244"), ("reactants", "4.6e-4"), ("temperature", "731")]);
        let result = EquilibriumConstantCalculator.calculate("concentrations", &form).unwrap();
        assert_relative_eq!(result.value("K").unwrap(), 53.04, epsilon = 0.01);
        assert!(result.value("ΔG°").unwrap() < 0.0);
    }

    #[test]
    fn extreme_gibbs_energy_is_out_of_range() {
        for dg in ["-2500", "2000"] {
            let form = FormState::from_pairs(&[("gibbs", dg), ("temperature", "298")]);
            let err = EquilibriumConstantCalculator.calculate("gibbs", &form).unwrap_err();
            assert_eq!(err.kind(), crate::Utils::validation::ErrorKind::Derived, "ΔG° = {}", dg);
        }
    }
}
