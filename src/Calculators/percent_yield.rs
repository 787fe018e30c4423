use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Calculators::interpretation::{Band, ThresholdTable};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldMode {
    PercentYield,
    ActualYield,
}

impl FromStr for YieldMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percent_yield" => Ok(YieldMode::PercentYield),
            "actual_yield" => Ok(YieldMode::ActualYield),
            _ => Err(s.to_string()),
        }
    }
}

pub const QUALITY: ThresholdTable = ThresholdTable::new(
    &[
        Band::ge(90.0, "Excellent yield!"),
        Band::ge(70.0, "Good yield"),
    ],
    "Consider optimizing reaction conditions",
);

pub fn percent_yield(actual: f64, theoretical: f64) -> Result<f64, CalcError> {
    ensure(
        actual >= 0.0 && theoretical > 0.0,
        "Yields must be non-negative and theoretical yield must be positive",
    )?;
    ensure(actual <= theoretical, "Actual yield cannot exceed theoretical yield")?;
    Ok(actual / theoretical * 100.0)
}

/// expected product for a known percent yield
pub fn actual_yield(theoretical: f64, percent: f64) -> Result<f64, CalcError> {
    ensure(theoretical > 0.0, "Theoretical yield must be positive")?;
    ensure(
        (0.0..=100.0).contains(&percent),
        "Percent yield must be between 0 and 100",
    )?;
    Ok(theoretical * percent / 100.0)
}

#[derive(Debug, Clone, Default)]
pub struct PercentYieldCalculator;

const NAME: &str = "Percent Yield Calculator";

const THEORETICAL: FieldSpec = FieldSpec::required("theoretical", "Theoretical yield", "g");

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "percent_yield",
        label: "Percent yield",
        formula: "% yield = actual / theoretical × 100",
        fields: &[FieldSpec::required("actual", "Actual yield", "g"), THEORETICAL],
    },
    ModeSpec {
        key: "actual_yield",
        label: "Expected actual yield",
        formula: "actual = theoretical × % yield / 100",
        fields: &[THEORETICAL, FieldSpec::required("percent", "Percent yield", "%")],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Aspirin synthesis",
        mode: "percent_yield",
        inputs: &[("actual", "2.1"), ("theoretical", "2.5")],
        reference: Some(Reference {
            label: "Percent yield",
            value: 84.0,
            unit: "%",
        }),
        description: "Recrystallised product from salicylic acid",
    },
    ExamplePreset {
        name: "Ammonia from 28 g nitrogen",
        mode: "actual_yield",
        inputs: &[("theoretical", "34.06"), ("percent", "15")],
        reference: None,
        description: "Single pass through a Haber reactor",
    },
];

impl Calculator for PercentYieldCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "percent_yield"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: YieldMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let theoretical = v.number("theoretical", "Theoretical yield")?;
        let (actual, percent) = match parsed {
            YieldMode::PercentYield => {
                let actual = v.number("actual", "Actual yield")?;
                (actual, percent_yield(actual, theoretical)?)
            }
            YieldMode::ActualYield => {
                let percent = v.number("percent", "Percent yield")?;
                (actual_yield(theoretical, percent)?, percent)
            }
        };
        debug!("yield {} of {} ({}%)", actual, theoretical, percent);
        let result = CalcResult::new(NAME, mode);
        let result = match parsed {
            YieldMode::PercentYield => result.with_value("Percent yield", percent, "%"),
            YieldMode::ActualYield => result.with_value("Actual yield", actual, "g"),
        };
        Ok(result
            .with_value("Product lost", theoretical - actual, "g")
            .with_interpretation(QUALITY.classify(percent)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quality_bands() {
        assert_relative_eq!(percent_yield(2.1, 2.5).unwrap(), 84.0, epsilon = 1e-12);
        assert_eq!(QUALITY.classify(95.0), "Excellent yield!");
        assert_eq!(QUALITY.classify(90.0), "Excellent yield!");
        assert_eq!(QUALITY.classify(84.0), "Good yield");
        assert_eq!(QUALITY.classify(12.0), "Consider optimizing reaction conditions");
    }

    #[test]
    fn yield_limits() {
        assert_eq!(
            percent_yield(3.0, 2.5).unwrap_err().to_string(),
            "Actual yield cannot exceed theoretical yield"
        );
        assert!(percent_yield(-1.0, 2.5).is_err());
        assert!(percent_yield(1.0, 0.0).is_err());
        assert_relative_eq!(percent_yield(0.0, 2.5).unwrap(), 0.0);
        assert!(actual_yield(10.0, 120.0).is_err());
    }

    #[test]
    fn expected_product() {
        let result = PercentYieldCalculator
            .calculate("actual_yield", &EXAMPLES[1].to_form())
            .unwrap();
        assert_relative_eq!(result.value("Actual yield").unwrap(), 5.109, epsilon = 1e-9);
        assert_eq!(result.interpretation[0], "Consider optimizing reaction conditions");
    }
}
