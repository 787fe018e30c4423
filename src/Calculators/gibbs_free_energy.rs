use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Calculators::interpretation::{Band, ThresholdTable};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure, ensure_derived};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GibbsMode {
    Gibbs,
    Crossover,
}

impl FromStr for GibbsMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gibbs" => Ok(GibbsMode::Gibbs),
            "crossover" => Ok(GibbsMode::Crossover),
            _ => Err(s.to_string()),
        }
    }
}

/// ΔG = ΔH - TΔS; ΔH in kJ/mol, ΔS in J/(mol·K)
pub fn gibbs_energy(dh_kj: f64, ds_j: f64, t: f64) -> f64 {
    dh_kj - t * ds_j / 1000.0
}

/// temperature where ΔG changes sign, T = 1000·ΔH/ΔS
pub fn crossover_temperature(dh_kj: f64, ds_j: f64) -> Result<f64, CalcError> {
    ensure(ds_j != 0.0, "Entropy change must be non-zero")?;
    let t = 1000.0 * dh_kj / ds_j;
    ensure_derived(
        t > 0.0,
        "ΔH and ΔS have opposite signs: the sign of ΔG does not change with temperature",
    )?;
    Ok(t)
}

pub const SPONTANEITY: ThresholdTable = ThresholdTable::new(
    &[
        Band::lt(0.0, "Spontaneous (thermodynamically favorable)"),
        Band::gt(0.0, "Non-spontaneous (thermodynamically unfavorable)"),
    ],
    "At equilibrium",
);

/// what the signs of ΔH and ΔS imply for every temperature
pub fn temperature_dependence(dh: f64, ds: f64) -> &'static str {
    match (dh < 0.0, ds > 0.0) {
        (true, true) => "ΔH < 0 and ΔS > 0: spontaneous at all temperatures",
        (false, false) => "ΔH > 0 and ΔS < 0: non-spontaneous at all temperatures",
        (true, false) => "ΔH < 0 and ΔS < 0: spontaneous below the crossover temperature",
        (false, true) => "ΔH > 0 and ΔS > 0: spontaneous above the crossover temperature",
    }
}

#[derive(Debug, Clone, Default)]
pub struct GibbsFreeEnergyCalculator;

const NAME: &str = "Gibbs Free Energy Calculator";

const DH: FieldSpec = FieldSpec::required("enthalpy", "Enthalpy change ΔH", "kJ/mol");
const DS: FieldSpec = FieldSpec::required("entropy", "Entropy change ΔS", "J/(mol·K)");

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "gibbs",
        label: "ΔG at temperature T",
        formula: "ΔG = ΔH - TΔS",
        fields: &[DH, DS, FieldSpec::required("temperature", "Temperature T", "K")],
    },
    ModeSpec {
        key: "crossover",
        label: "Crossover temperature",
        formula: "T = ΔH / ΔS",
        fields: &[DH, DS],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Ammonia synthesis at 298 K",
        mode: "gibbs",
        inputs: &[("enthalpy", "-92.2"), ("entropy", "-198.7"), ("temperature", "298")],
        reference: Some(Reference {
            label: "ΔG",
            value: -33.0,
            unit: "kJ/mol",
        }),
        description: "N2 + 3H2 -> 2NH3",
    },
    ExamplePreset {
        name: "Limestone decomposition",
        mode: "crossover",
        inputs: &[("enthalpy", "178.3"), ("entropy", "160.5")],
        reference: Some(Reference {
            label: "Crossover temperature",
            value: 1111.0,
            unit: "K",
        }),
        description: "CaCO3 -> CaO + CO2 becomes spontaneous above about 1111 K",
    },
    ExamplePreset {
        name: "Ice melting at 263 K",
        mode: "gibbs",
        inputs: &[("enthalpy", "6.01"), ("entropy", "22.0"), ("temperature", "263")],
        reference: None,
        description: "Below the melting point",
    },
];

impl Calculator for GibbsFreeEnergyCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "gibbs_free_energy"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: GibbsMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let dh = v.number("enthalpy", "ΔH")?;
        let ds = v.number("entropy", "ΔS")?;
        let result = CalcResult::new(NAME, mode);
        let result = match parsed {
            GibbsMode::Gibbs => {
                let t = v.positive("temperature", "Temperature")?;
                let dg = gibbs_energy(dh, ds, t);
                debug!("ΔG = {} kJ/mol at {} K", dg, t);
                result
                    .with_value("ΔG", dg, "kJ/mol")
                    .with_value("TΔS", t * ds / 1000.0, "kJ/mol")
                    .with_interpretation(SPONTANEITY.classify(dg))
            }
            GibbsMode::Crossover => {
                let t = crossover_temperature(dh, ds)?;
                result
                    .with_value("Crossover temperature", t, "K")
                    .with_value("Crossover temperature (Celsius)", t - 273.15, "°C")
            }
        };
        Ok(result.with_interpretation(temperature_dependence(dh, ds)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ammonia_synthesis() {
        let dg = gibbs_energy(-92.2, -198.7, 298.0);
        assert_relative_eq!(dg, -32.9874, epsilon = 1e-4);
        assert_eq!(SPONTANEITY.classify(dg), "Spontaneous (thermodynamically favorable)");
        assert_eq!(SPONTANEITY.classify(0.0), "At equilibrium");
    }

    #[test]
    fn crossover_makes_gibbs_vanish() {
        let t = crossover_temperature(178.3, 160.5).unwrap();
        assert_relative_eq!(gibbs_energy(178.3, 160.5, t), 0.0, epsilon = 1e-9);
        assert!(crossover_temperature(-50.0, 10.0).is_err());
        assert!(crossover_temperature(10.0, 0.0).is_err());
    }

    #[test]
    fn sign_quadrants() {
        let result = GibbsFreeEnergyCalculator
            .calculate("gibbs", &EXAMPLES[2].to_form())
            .unwrap();
        assert_eq!(
            result.interpretation,
            vec![
                "Non-spontaneous (thermodynamically unfavorable)".to_string(),
                "ΔH > 0 and ΔS > 0: spontaneous above the crossover temperature".to_string()
            ]
        );
    }
}
