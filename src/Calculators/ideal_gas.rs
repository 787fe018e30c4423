use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasMode {
    Pressure,
    Volume,
    Moles,
    Temperature,
}

impl FromStr for GasMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pressure" => Ok(GasMode::Pressure),
            "volume" => Ok(GasMode::Volume),
            "moles" => Ok(GasMode::Moles),
            "temperature" => Ok(GasMode::Temperature),
            _ => Err(s.to_string()),
        }
    }
}

/// pressure unit, which fixes the value of R (volume in L, temperature in K)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressureUnit {
    #[default]
    Atm,
    KPa,
    MmHg,
}

impl PressureUnit {
    pub fn gas_constant(&self) -> f64 {
        match self {
            PressureUnit::Atm => 0.082057,
            PressureUnit::KPa => 8.314,
            PressureUnit::MmHg => 62.364,
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            PressureUnit::Atm => "atm",
            PressureUnit::KPa => "kPa",
            PressureUnit::MmHg => "mmHg",
        }
    }
}

impl FromStr for PressureUnit {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atm" => Ok(PressureUnit::Atm),
            "kpa" => Ok(PressureUnit::KPa),
            "mmhg" | "torr" => Ok(PressureUnit::MmHg),
            other => Err(CalcError::domain(format!(
                "Unknown pressure unit '{}' (use atm, kpa or mmhg)",
                other
            ))),
        }
    }
}

/// PV = nRT solved for the variable named by `mode`; the other three are > 0
pub fn solve_ideal_gas(mode: GasMode, a: f64, b: f64, c: f64, r: f64) -> f64 {
    match mode {
        // a = n, b = T, c = V
        GasMode::Pressure => a * r * b / c,
        // a = n, b = T, c = P
        GasMode::Volume => a * r * b / c,
        // a = P, b = V, c = T
        GasMode::Moles => a * b / (r * c),
        // a = P, b = V, c = n
        GasMode::Temperature => a * b / (c * r),
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdealGasCalculator;

const NAME: &str = "Ideal Gas Law Calculator";

const R_UNIT: FieldSpec = FieldSpec::optional("r_unit", "Pressure unit (atm, kpa, mmhg)", "");
const P: FieldSpec = FieldSpec::required("pressure", "Pressure P", "atm|kPa|mmHg");
const V: FieldSpec = FieldSpec::required("volume", "Volume V", "L");
const N: FieldSpec = FieldSpec::required("moles", "Amount n", "mol");
const T: FieldSpec = FieldSpec::required("temperature", "Temperature T", "K");

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "pressure",
        label: "Pressure",
        formula: "P = nRT / V",
        fields: &[V, N, T, R_UNIT],
    },
    ModeSpec {
        key: "volume",
        label: "Volume",
        formula: "V = nRT / P",
        fields: &[P, N, T, R_UNIT],
    },
    ModeSpec {
        key: "moles",
        label: "Moles",
        formula: "n = PV / RT",
        fields: &[P, V, T, R_UNIT],
    },
    ModeSpec {
        key: "temperature",
        label: "Temperature",
        formula: "T = PV / nR",
        fields: &[P, V, N, R_UNIT],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Molar volume at STP",
        mode: "volume",
        inputs: &[("pressure", "1"), ("moles", "1"), ("temperature", "273.15")],
        reference: Some(Reference {
            label: "V",
            value: 22.414,
            unit: "L",
        }),
        description: "One mole at 0 °C and 1 atm",
    },
    ExamplePreset {
        name: "Gas cylinder",
        mode: "pressure",
        inputs: &[("volume", "10"), ("moles", "2"), ("temperature", "298"), ("r_unit", "kpa")],
        reference: Some(Reference {
            label: "P",
            value: 495.5,
            unit: "kPa",
        }),
        description: "2 mol in a 10 L cylinder at room temperature",
    },
    ExamplePreset {
        name: "Balloon",
        mode: "moles",
        inputs: &[("pressure", "760"), ("volume", "5"), ("temperature", "300"), ("r_unit", "mmhg")],
        reference: Some(Reference {
            label: "n",
            value: 0.203,
            unit: "mol",
        }),
        description: "5 L balloon at 1 atm (760 mmHg)",
    },
];

impl Calculator for IdealGasCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "ideal_gas"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: GasMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let unit = match v.optional_text("r_unit") {
            Some(raw) => raw.parse::<PressureUnit>()?,
            None => PressureUnit::default(),
        };
        let r = unit.gas_constant();
        let (label, value, value_unit) = match parsed {
            GasMode::Pressure => {
                let n = v.positive("moles", "Moles")?;
                let t = v.positive("temperature", "Temperature")?;
                let vol = v.positive("volume", "Volume")?;
                ("P", solve_ideal_gas(parsed, n, t, vol, r), unit.label())
            }
            GasMode::Volume => {
                let n = v.positive("moles", "Moles")?;
                let t = v.positive("temperature", "Temperature")?;
                let p = v.positive("pressure", "Pressure")?;
                ("V", solve_ideal_gas(parsed, n, t, p, r), "L")
            }
            GasMode::Moles => {
                let p = v.positive("pressure", "Pressure")?;
                let vol = v.positive("volume", "Volume")?;
                let t = v.positive("temperature", "Temperature")?;
                ("n", solve_ideal_gas(parsed, p, vol, t, r), "mol")
            }
            GasMode::Temperature => {
                let p = v.positive("pressure", "Pressure")?;
                let vol = v.positive("volume", "Volume")?;
                let n = v.positive("moles", "Moles")?;
                ("T", solve_ideal_gas(parsed, p, vol, n, r), "K")
            }
        };
        debug!("ideal gas {} = {} {} (R = {})", label, value, value_unit, r);
        let mut result = CalcResult::new(NAME, mode)
            .with_value(label, value, value_unit)
            .with_value("R", r, &format!("L·{}/(mol·K)", unit.label()));
        if parsed == GasMode::Temperature {
            result.push_value("T (Celsius)", value - 273.15, "°C");
        }
        Ok(result.with_interpretation(
            "Ideal behaviour assumed: accurate at low pressure and high temperature",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn molar_volume_at_stp() {
        let result = IdealGasCalculator
            .calculate("volume", &EXAMPLES[0].to_form())
            .unwrap();
        assert_relative_eq!(result.value("V").unwrap(), 22.414, epsilon = 1e-3);
    }

    #[test]
    fn every_variable_round_trips() {
        let r = PressureUnit::KPa.gas_constant();
        let (v, n, t) = (24.0, 0.98, 298.0);
        assert_relative_eq!(solve_ideal_gas(GasMode::Pressure, n, t, v, r), n * r * t / v);
        let p2 = solve_ideal_gas(GasMode::Pressure, n, t, v, r);
        assert_relative_eq!(solve_ideal_gas(GasMode::Volume, n, t, p2, r), v, epsilon = 1e-9);
        assert_relative_eq!(solve_ideal_gas(GasMode::Moles, p2, v, t, r), n, epsilon = 1e-9);
        assert_relative_eq!(solve_ideal_gas(GasMode::Temperature, p2, v, n, r), t, epsilon = 1e-9);
    }

    #[test]
    fn units_and_domain() {
        assert!("bar".parse::<PressureUnit>().is_err());
        assert_eq!("Torr".parse::<PressureUnit>().unwrap(), PressureUnit::MmHg);
        let form = FormState::from_pairs(&[("pressure", "1"), ("volume", "-2"), ("temperature", "300")]);
        let err = IdealGasCalculator.calculate("moles", &form).unwrap_err();
        assert_eq!(err.to_string(), "Volume must be positive");
    }
}
