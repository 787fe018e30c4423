use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure};
use log::debug;
use std::str::FromStr;

/// J/(mol·K)
pub const R: f64 = 8.314;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrheniusMode {
    K,
    Ea,
    Temperature,
    A,
    TwoTemperature,
}

impl FromStr for ArrheniusMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "k" => Ok(ArrheniusMode::K),
            "ea" => Ok(ArrheniusMode::Ea),
            "temperature" => Ok(ArrheniusMode::Temperature),
            "a" => Ok(ArrheniusMode::A),
            "two_temperature" => Ok(ArrheniusMode::TwoTemperature),
            _ => Err(s.to_string()),
        }
    }
}

/// k = A·exp(-Ea/RT), Ea in kJ/mol
pub fn rate_constant(a: f64, ea_kj: f64, t: f64) -> f64 {
    a * (-(ea_kj * 1000.0) / (R * t)).exp()
}

fn check_k_below_a(k: f64, a: f64) -> Result<(), CalcError> {
    ensure(k <= a, "Rate constant k cannot exceed frequency factor A")
}

/// Ea = -RT·ln(k/A), kJ/mol
pub fn activation_energy(k: f64, a: f64, t: f64) -> Result<f64, CalcError> {
    check_k_below_a(k, a)?;
    Ok(-(R * t * (k / a).ln()) / 1000.0)
}

/// T = -Ea/(R·ln(k/A)); k = A has no finite temperature
pub fn temperature(k: f64, a: f64, ea_kj: f64) -> Result<f64, CalcError> {
    check_k_below_a(k, a)?;
    ensure(k < a, "k equal to A corresponds to an infinite temperature")?;
    Ok(-(ea_kj * 1000.0) / (R * (k / a).ln()))
}

/// A = k / exp(-Ea/RT)
pub fn frequency_factor(k: f64, ea_kj: f64, t: f64) -> f64 {
    k / (-(ea_kj * 1000.0) / (R * t)).exp()
}

/// k2 = k1·exp(-Ea/R·(1/T2 - 1/T1))
pub fn rate_constant_at(k1: f64, t1: f64, t2: f64, ea_kj: f64) -> f64 {
    k1 * (-(ea_kj * 1000.0) / R * (1.0 / t2 - 1.0 / t1)).exp()
}

#[derive(Debug, Clone, Default)]
pub struct ArrheniusCalculator;

const NAME: &str = "Arrhenius Equation Calculator";

const K: FieldSpec = FieldSpec::required("k", "Rate constant k", "");
const A: FieldSpec = FieldSpec::required("a", "Frequency factor A", "");
const EA: FieldSpec = FieldSpec::required("ea", "Activation energy Ea", "kJ/mol");
const T: FieldSpec = FieldSpec::required("temperature", "Temperature T", "K");

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "k",
        label: "Rate constant k",
        formula: "k = A·exp(-Ea/RT)",
        fields: &[A, EA, T],
    },
    ModeSpec {
        key: "ea",
        label: "Activation energy Ea",
        formula: "Ea = -RT·ln(k/A)",
        fields: &[K, A, T],
    },
    ModeSpec {
        key: "temperature",
        label: "Temperature T",
        formula: "T = -Ea / (R·ln(k/A))",
        fields: &[K, A, EA],
    },
    ModeSpec {
        key: "a",
        label: "Frequency factor A",
        formula: "A = k / exp(-Ea/RT)",
        fields: &[K, EA, T],
    },
    ModeSpec {
        key: "two_temperature",
        label: "k at a second temperature",
        formula: "ln(k2/k1) = -Ea/R·(1/T2 - 1/T1)",
        fields: &[
            FieldSpec::required("k1", "Rate constant k1", ""),
            FieldSpec::required("t1", "Temperature T1", "K"),
            FieldSpec::required("t2", "Temperature T2", "K"),
            EA,
        ],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Typical reaction at room temperature",
        mode: "k",
        inputs: &[("a", "1e13"), ("ea", "75"), ("temperature", "298")],
        reference: None,
        description: "Ea = 75 kJ/mol",
    },
    ExamplePreset {
        name: "Activation energy from k",
        mode: "ea",
        inputs: &[("k", "3.5e-3"), ("a", "1.2e11"), ("temperature", "350")],
        reference: None,
        description: "Measured rate constant at 350 K",
    },
    ExamplePreset {
        name: "Rule of thumb: +10 K doubles the rate",
        mode: "two_temperature",
        inputs: &[("k1", "1.0"), ("t1", "298"), ("t2", "308"), ("ea", "52.9")],
        reference: Some(Reference {
            label: "k2",
            value: 2.0,
            unit: "",
        }),
        description: "Ea near 53 kJ/mol doubles k between 25 and 35 °C",
    },
];

impl Calculator for ArrheniusCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "arrhenius"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: ArrheniusMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let result = CalcResult::new(NAME, mode);
        let result = match parsed {
            ArrheniusMode::K => {
                let a = v.positive("a", "A")?;
                let ea = v.positive("ea", "Ea")?;
                let t = v.positive("temperature", "T")?;
                let k = rate_constant(a, ea, t);
                result
                    .with_value("k", k, "")
                    .with_value("Fraction of successful collisions", k / a, "")
            }
            ArrheniusMode::Ea => {
                let k = v.positive("k", "k")?;
                let a = v.positive("a", "A")?;
                let t = v.positive("temperature", "T")?;
                let ea = activation_energy(k, a, t)?;
                result.with_value("Ea", ea, "kJ/mol").with_interpretation(
                    if ea > 100.0 {
                        "High activation barrier: strongly temperature dependent"
                    } else if ea < 40.0 {
                        "Low activation barrier: fast at room temperature"
                    } else {
                        "Moderate activation barrier"
                    },
                )
            }
            ArrheniusMode::Temperature => {
                let k = v.positive("k", "k")?;
                let a = v.positive("a", "A")?;
                let ea = v.positive("ea", "Ea")?;
                let t = temperature(k, a, ea)?;
                result
                    .with_value("T", t, "K")
                    .with_value("T (Celsius)", t - 273.15, "°C")
            }
            ArrheniusMode::A => {
                let k = v.positive("k", "k")?;
                let ea = v.positive("ea", "Ea")?;
                let t = v.positive("temperature", "T")?;
                result.with_value("A", frequency_factor(k, ea, t), "")
            }
            ArrheniusMode::TwoTemperature => {
                let k1 = v.positive("k1", "k1")?;
                let t1 = v.positive("t1", "T1")?;
                let t2 = v.positive("t2", "T2")?;
                let ea = v.positive("ea", "Ea")?;
                let k2 = rate_constant_at(k1, t1, t2, ea);
                result
                    .with_value("k2", k2, "")
                    .with_value("k2/k1", k2 / k1, "")
            }
        };
        debug!("arrhenius {}: {:?}", mode, result.values);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn four_forms_are_consistent() {
        let (a, ea, t) = (1e13, 75.0, 298.0);
        let k = rate_constant(a, ea, t);
        assert_relative_eq!(activation_energy(k, a, t).unwrap(), ea, epsilon = 1e-9);
        assert_relative_eq!(temperature(k, a, ea).unwrap(), t, epsilon = 1e-9);
        assert_relative_eq!(frequency_factor(k, ea, t), a, max_relative = 1e-12);
    }

    #[test]
    fn ten_kelvin_rule() {
        let k2 = rate_constant_at(1.0, 298.0, 308.0, 52.9);
        assert_relative_eq!(k2, 2.0, epsilon = 0.01);
    }

    #[test]
    fn k_cannot_exceed_a() {
        assert!(activation_energy(10.0, 1.0, 300.0).is_err());
        assert!(temperature(1.0, 1.0, 50.0).is_err());
        let form = FormState::from_pairs(&[("k", "5"), ("a", "1"), ("temperature", "300")]);
        let err = ArrheniusCalculator.calculate("ea", &form).unwrap_err();
        assert_eq!(err.to_string(), "Rate constant k cannot exceed frequency factor A");
    }

    #[test]
    fn overflowing_second_rate_constant_is_refused() {
        let form = FormState::from_pairs(&[("k1", "1"), ("t1", "1"), ("t2", "1000"), ("ea", "1000")]);
        let err = ArrheniusCalculator.calculate("two_temperature", &form).unwrap_err();
        assert_eq!(err.kind(), crate::Utils::validation::ErrorKind::Derived);
    }
}
