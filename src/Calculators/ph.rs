use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Calculators::interpretation::{Band, ThresholdTable};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator};
use log::debug;
use std::str::FromStr;

/// pKw at 25 °C
pub const PKW: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhMode {
    HConcentration,
    OhConcentration,
    Ph,
    Poh,
}

impl FromStr for PhMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h_concentration" => Ok(PhMode::HConcentration),
            "oh_concentration" => Ok(PhMode::OhConcentration),
            "ph" => Ok(PhMode::Ph),
            "poh" => Ok(PhMode::Poh),
            _ => Err(s.to_string()),
        }
    }
}

/// the four linked quantities of an aqueous solution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcidityState {
    pub ph: f64,
    pub poh: f64,
    pub h: f64,
    pub oh: f64,
}

impl AcidityState {
    pub fn from_ph(ph: f64) -> Self {
        let poh = PKW - ph;
        Self {
            ph,
            poh,
            h: 10f64.powf(-ph),
            oh: 10f64.powf(-poh),
        }
    }
    pub fn from_poh(poh: f64) -> Self {
        Self::from_ph(PKW - poh)
    }
}

/// pH = -log[H+]
pub fn ph_from_h(h: f64) -> f64 {
    -h.log10()
}

pub const ACIDITY: ThresholdTable = ThresholdTable::new(
    &[
        Band::lt(3.0, "Strongly acidic"),
        Band::lt(7.0, "Acidic"),
        Band::le(7.0, "Neutral"),
        Band::lt(11.0, "Basic"),
    ],
    "Strongly basic",
);

#[derive(Debug, Clone, Default)]
pub struct PhCalculator;

const NAME: &str = "pH Calculator";

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "h_concentration",
        label: "From [H+]",
        formula: "pH = -log[H+]",
        fields: &[FieldSpec::required("h", "Hydrogen ion concentration [H+]", "M")],
    },
    ModeSpec {
        key: "oh_concentration",
        label: "From [OH-]",
        formula: "pOH = -log[OH-]; pH = 14 - pOH",
        fields: &[FieldSpec::required("oh", "Hydroxide concentration [OH-]", "M")],
    },
    ModeSpec {
        key: "ph",
        label: "From pH",
        formula: "[H+] = 10^-pH",
        fields: &[FieldSpec::required("ph", "pH", "")],
    },
    ModeSpec {
        key: "poh",
        label: "From pOH",
        formula: "pH = 14 - pOH",
        fields: &[FieldSpec::required("poh", "pOH", "")],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "0.01 M HCl",
        mode: "h_concentration",
        inputs: &[("h", "0.01")],
        reference: Some(Reference {
            label: "pH",
            value: 2.0,
            unit: "",
        }),
        description: "Strong acid, fully dissociated",
    },
    ExamplePreset {
        name: "Pure water",
        mode: "h_concentration",
        inputs: &[("h", "1e-7")],
        reference: Some(Reference {
            label: "pH",
            value: 7.0,
            unit: "",
        }),
        description: "Neutral at 25 °C",
    },
    ExamplePreset {
        name: "0.001 M NaOH",
        mode: "oh_concentration",
        inputs: &[("oh", "0.001")],
        reference: Some(Reference {
            label: "pH",
            value: 11.0,
            unit: "",
        }),
        description: "Strong base",
    },
    ExamplePreset {
        name: "Blood",
        mode: "ph",
        inputs: &[("ph", "7.4")],
        reference: None,
        description: "Slightly basic",
    },
];

impl Calculator for PhCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "ph"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: PhMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let state = match parsed {
            PhMode::HConcentration => {
                AcidityState::from_ph(ph_from_h(v.positive("h", "H+ concentration")?))
            }
            PhMode::OhConcentration => {
                AcidityState::from_poh(ph_from_h(v.positive("oh", "OH- concentration")?))
            }
            PhMode::Ph => AcidityState::from_ph(v.number("ph", "pH")?),
            PhMode::Poh => AcidityState::from_poh(v.number("poh", "pOH")?),
        };
        debug!("acidity {:?}", state);
        Ok(CalcResult::new(NAME, mode)
            .with_value("pH", state.ph, "")
            .with_value("pOH", state.poh, "")
            .with_value("[H+]", state.h, "M")
            .with_value("[OH-]", state.oh, "M")
            .with_interpretation(ACIDITY.classify(state.ph)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hydrochloric_acid() {
        let result = PhCalculator
            .calculate("h_concentration", &FormState::from_pairs(&[("h", "0.01")]))
            .unwrap();
        assert_relative_eq!(result.value("pH").unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(result.value("pOH").unwrap(), 12.0, epsilon = 1e-12);
        assert_eq!(result.interpretation[0], "Strongly acidic");
    }

    #[test]
    fn ph_and_poh_add_to_fourteen() {
        for ph in [0.5, 4.2, 7.0, 9.9, 13.1] {
            let s = AcidityState::from_ph(ph);
            assert_relative_eq!(s.ph + s.poh, PKW);
            assert_relative_eq!(s.h * s.oh, 1e-14, max_relative = 1e-9);
        }
    }

    #[test]
    fn acidity_bands() {
        assert_eq!(ACIDITY.classify(7.0), "Neutral");
        assert_eq!(ACIDITY.classify(6.5), "Acidic");
        assert_eq!(ACIDITY.classify(8.0), "Basic");
        assert_eq!(ACIDITY.classify(12.5), "Strongly basic");
    }

    #[test]
    fn concentration_must_be_positive() {
        let err = PhCalculator
            .calculate("h_concentration", &FormState::from_pairs(&[("h", "0")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "H+ concentration must be positive");
    }
}
