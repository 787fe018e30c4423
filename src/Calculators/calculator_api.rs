//! # Calculator API
//!
//! Every calculator implements the same contract: it publishes its calculation modes
//! (which fields each mode needs), a static dataset of example presets, and one
//! `calculate(mode, form)` entry point that validates the raw form text, evaluates the
//! closed-form formula of the chosen mode and interprets the number.
//!
//! `CalculatorEnum` collects all calculators behind `enum_dispatch`, so the menu and the
//! form session can hold "some calculator" without boxing.
//!
//! ```rust, ignore
//! let calc = calculator_by_slug("dilution")?;
//! let form = FormState::from_pairs(&[("m1", "5.0"), ("v1", "10"), ("m2", "1.0")]);
//! let result = calc.calculate("v2", &form)?;
//! assert_eq!(result.value("V2"), Some(50.0));
//! ```
use crate::Calculators::arrhenius::ArrheniusCalculator;
use crate::Calculators::atomic_mass::AtomicMassCalculator;
use crate::Calculators::dilution::DilutionCalculator;
use crate::Calculators::equation_balancer::EquationBalancer;
use crate::Calculators::equilibrium_constant::EquilibriumConstantCalculator;
use crate::Calculators::gibbs_free_energy::GibbsFreeEnergyCalculator;
use crate::Calculators::half_life::HalfLifeCalculator;
use crate::Calculators::henderson_hasselbalch::HendersonHasselbalchCalculator;
use crate::Calculators::ideal_gas::IdealGasCalculator;
use crate::Calculators::lattice_energy::LatticeEnergyCalculator;
use crate::Calculators::molar_mass::MolarMassCalculator;
use crate::Calculators::nernst::NernstCalculator;
use crate::Calculators::percent_yield::PercentYieldCalculator;
use crate::Calculators::ph::PhCalculator;
use crate::Calculators::reaction_rate::ReactionRateCalculator;
use crate::Calculators::stoichiometry::StoichiometryCalculator;
use crate::Calculators::titration::TitrationCalculator;
use crate::Utils::form_state::FormState;
use crate::Utils::validation::CalcError;
use enum_dispatch::enum_dispatch;
use serde::Serialize;
use std::str::FromStr;

/// one input field of a calculation mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(key: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self {
            key,
            label,
            unit,
            required: true,
        }
    }
    pub const fn optional(key: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self {
            key,
            label,
            unit,
            required: false,
        }
    }
}

/// a calculation mode: which formula variant is evaluated and what it needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModeSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub formula: &'static str,
    pub fields: &'static [FieldSpec],
}

pub fn find_mode<'a>(modes: &'a [ModeSpec], key: &str) -> Option<&'a ModeSpec> {
    modes.iter().find(|mode| mode.key == key)
}

/// Parses a mode key into the calculator's mode enum, reporting unknown keys uniformly.
pub fn parse_mode<M: FromStr>(calculator: &str, mode: &str) -> Result<M, CalcError> {
    mode.trim()
        .parse::<M>()
        .map_err(|_| CalcError::UnknownMode {
            calculator: calculator.to_string(),
            mode: mode.to_string(),
        })
}

/// reference output stored with an example (textbook or experimental value)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reference {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

/// hard-coded example used to prefill a form
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExamplePreset {
    pub name: &'static str,
    pub mode: &'static str,
    pub inputs: &'static [(&'static str, &'static str)],
    pub reference: Option<Reference>,
    pub description: &'static str,
}

impl ExamplePreset {
    pub fn to_form(&self) -> FormState {
        FormState::from_pairs(self.inputs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultValue {
    pub label: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultText {
    pub label: String,
    pub text: String,
}

/// Outcome of one successful calculation: numbers, textual findings (a limiting
/// reagent, a balanced equation) and interpretation lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcResult {
    pub calculator: String,
    pub mode: String,
    pub values: Vec<ResultValue>,
    pub texts: Vec<ResultText>,
    pub interpretation: Vec<String>,
}

impl CalcResult {
    pub fn new(calculator: &str, mode: &str) -> Self {
        Self {
            calculator: calculator.to_string(),
            mode: mode.to_string(),
            values: Vec::new(),
            texts: Vec::new(),
            interpretation: Vec::new(),
        }
    }

    pub fn with_value(mut self, label: &str, value: f64, unit: &str) -> Self {
        self.push_value(label, value, unit);
        self
    }

    pub fn push_value(&mut self, label: &str, value: f64, unit: &str) {
        self.values.push(ResultValue {
            label: label.to_string(),
            value,
            unit: unit.to_string(),
        });
    }

    pub fn with_text(mut self, label: &str, text: impl Into<String>) -> Self {
        self.push_text(label, text);
        self
    }

    pub fn push_text(&mut self, label: &str, text: impl Into<String>) {
        self.texts.push(ResultText {
            label: label.to_string(),
            text: text.into(),
        });
    }

    pub fn with_interpretation(mut self, line: impl Into<String>) -> Self {
        self.interpretation.push(line.into());
        self
    }

    pub fn value(&self, label: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.value)
    }

    pub fn text(&self, label: &str) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.text.as_str())
    }

    /// an overflowing exponential or a vanishing denominator surfaces here as inf or NaN
    pub fn ensure_finite(self) -> Result<Self, CalcError> {
        match self.values.iter().find(|v| !v.value.is_finite()) {
            Some(bad) => Err(CalcError::impossible(format!(
                "Result is out of numeric range: {} cannot be represented. Check the magnitude of the inputs.",
                bad.label
            ))),
            None => Ok(self),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[enum_dispatch]
pub trait Calculator {
    /// display name, e.g. "Dilution Calculator"
    fn name(&self) -> &'static str;
    /// stable identifier used for lookup, e.g. "dilution"
    fn slug(&self) -> &'static str;
    fn modes(&self) -> &'static [ModeSpec];
    fn examples(&self) -> &'static [ExamplePreset];
    /// validate -> evaluate -> interpret for one mode
    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError>;
    /// `evaluate` followed by the range check of every reported number.
    /// Any failure aborts with a single error and no partial result.
    fn calculate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        self.evaluate(mode, form)?.ensure_finite()
    }
}

#[derive(Debug, Clone)]
#[enum_dispatch(Calculator)]
pub enum CalculatorEnum {
    Dilution(DilutionCalculator),
    ReactionRate(ReactionRateCalculator),
    LatticeEnergy(LatticeEnergyCalculator),
    Titration(TitrationCalculator),
    Stoichiometry(StoichiometryCalculator),
    AtomicMass(AtomicMassCalculator),
    MolarMass(MolarMassCalculator),
    EquationBalancer(EquationBalancer),
    Ph(PhCalculator),
    IdealGas(IdealGasCalculator),
    HendersonHasselbalch(HendersonHasselbalchCalculator),
    HalfLife(HalfLifeCalculator),
    Arrhenius(ArrheniusCalculator),
    GibbsFreeEnergy(GibbsFreeEnergyCalculator),
    EquilibriumConstant(EquilibriumConstantCalculator),
    Nernst(NernstCalculator),
    PercentYield(PercentYieldCalculator),
}

/// all calculators in menu order
pub fn all_calculators() -> Vec<CalculatorEnum> {
    vec![
        CalculatorEnum::Dilution(DilutionCalculator),
        CalculatorEnum::ReactionRate(ReactionRateCalculator),
        CalculatorEnum::LatticeEnergy(LatticeEnergyCalculator),
        CalculatorEnum::Titration(TitrationCalculator),
        CalculatorEnum::Stoichiometry(StoichiometryCalculator),
        CalculatorEnum::AtomicMass(AtomicMassCalculator),
        CalculatorEnum::MolarMass(MolarMassCalculator),
        CalculatorEnum::EquationBalancer(EquationBalancer),
        CalculatorEnum::Ph(PhCalculator),
        CalculatorEnum::IdealGas(IdealGasCalculator),
        CalculatorEnum::HendersonHasselbalch(HendersonHasselbalchCalculator),
        CalculatorEnum::HalfLife(HalfLifeCalculator),
        CalculatorEnum::Arrhenius(ArrheniusCalculator),
        CalculatorEnum::GibbsFreeEnergy(GibbsFreeEnergyCalculator),
        CalculatorEnum::EquilibriumConstant(EquilibriumConstantCalculator),
        CalculatorEnum::Nernst(NernstCalculator),
        CalculatorEnum::PercentYield(PercentYieldCalculator),
    ]
}

pub fn calculator_by_slug(slug: &str) -> Result<CalculatorEnum, CalcError> {
    let wanted = slug.trim().to_lowercase().replace('-', "_");
    all_calculators()
        .into_iter()
        .find(|calc| calc.slug() == wanted)
        .ok_or_else(|| CalcError::UnknownCalculator(slug.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugs_are_unique_and_resolvable() {
        let calcs = all_calculators();
        let slugs: HashSet<&str> = calcs.iter().map(|c| c.slug()).collect();
        assert_eq!(slugs.len(), calcs.len());
        for slug in slugs {
            assert_eq!(calculator_by_slug(slug).unwrap().slug(), slug);
        }
        assert!(calculator_by_slug("Reaction-Rate").is_ok());
        assert!(matches!(
            calculator_by_slug("alchemy"),
            Err(CalcError::UnknownCalculator(_))
        ));
    }

    #[test]
    fn every_mode_has_fields_and_unique_keys() {
        for calc in all_calculators() {
            let modes = calc.modes();
            assert!(!modes.is_empty(), "{} has no modes", calc.name());
            let keys: HashSet<&str> = modes.iter().map(|m| m.key).collect();
            assert_eq!(keys.len(), modes.len(), "{} repeats a mode", calc.name());
            for mode in modes {
                assert!(!mode.fields.is_empty(), "{}/{}", calc.slug(), mode.key);
            }
        }
    }

    /// Every preset must name a mode of its calculator and compute without error.
    #[test]
    fn every_example_preset_calculates() {
        for calc in all_calculators() {
            for example in calc.examples() {
                assert!(
                    find_mode(calc.modes(), example.mode).is_some(),
                    "{}: example '{}' uses unknown mode {}",
                    calc.slug(),
                    example.name,
                    example.mode
                );
                let result = calc.calculate(example.mode, &example.to_form());
                assert!(
                    result.is_ok(),
                    "{}: example '{}' failed: {:?}",
                    calc.slug(),
                    example.name,
                    result
                );
            }
        }
    }

    #[test]
    fn unknown_mode_is_a_selection_error() {
        let calc = calculator_by_slug("dilution").unwrap();
        let err = calc.calculate("sideways", &FormState::new()).unwrap_err();
        assert_eq!(err.kind(), crate::Utils::validation::ErrorKind::Selection);
    }

    #[test]
    fn result_builder_and_json() {
        let result = CalcResult::new("Test", "mode")
            .with_value("x", 1.5, "M")
            .with_text("verdict", "fine")
            .with_interpretation("all good");
        assert_eq!(result.value("x"), Some(1.5));
        assert_eq!(result.value("y"), None);
        assert_eq!(result.text("verdict"), Some("fine"));
        let json = result.to_json().unwrap();
        assert!(json.contains("\"calculator\": \"Test\""));
        assert!(json.contains("all good"));
    }

    #[test]
    fn non_finite_values_abort_the_result() {
        let overflow = CalcResult::new("Test", "mode")
            .with_value("x", 1.0, "")
            .with_value("y", f64::INFINITY, "M");
        let err = overflow.ensure_finite().unwrap_err();
        assert_eq!(err.kind(), crate::Utils::validation::ErrorKind::Derived);
        assert!(err.to_string().starts_with("Result is out of numeric range: y"));
        let nan = CalcResult::new("Test", "mode").with_value("z", f64::NAN, "");
        assert!(nan.ensure_finite().is_err());
        assert!(CalcResult::new("Test", "mode").with_value("x", 0.0, "").ensure_finite().is_ok());
    }
}
