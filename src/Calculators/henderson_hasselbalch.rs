use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Calculators::interpretation::{Band, ThresholdTable};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMode {
    Ph,
    Pka,
    Base,
    Acid,
}

impl FromStr for BufferMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ph" => Ok(BufferMode::Ph),
            "pka" => Ok(BufferMode::Pka),
            "base" => Ok(BufferMode::Base),
            "acid" => Ok(BufferMode::Acid),
            _ => Err(s.to_string()),
        }
    }
}

/// A weak acid / conjugate base pair obeying pH = pKa + log([A-]/[HA]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buffer {
    pub ph: f64,
    pub pka: f64,
    /// [A-], M
    pub base: f64,
    /// [HA], M
    pub acid: f64,
}

impl Buffer {
    pub fn solve_ph(pka: f64, base: f64, acid: f64) -> Self {
        Self {
            ph: pka + (base / acid).log10(),
            pka,
            base,
            acid,
        }
    }
    pub fn solve_pka(ph: f64, base: f64, acid: f64) -> Self {
        Self {
            ph,
            pka: ph - (base / acid).log10(),
            base,
            acid,
        }
    }
    pub fn solve_base(ph: f64, pka: f64, acid: f64) -> Self {
        Self {
            ph,
            pka,
            base: acid * 10f64.powf(ph - pka),
            acid,
        }
    }
    pub fn solve_acid(ph: f64, pka: f64, base: f64) -> Self {
        Self {
            ph,
            pka,
            base,
            acid: base / 10f64.powf(ph - pka),
        }
    }

    pub fn ratio(&self) -> f64 {
        self.base / self.acid
    }
}

/// |pH - pKa|
const BUFFER_REGION: ThresholdTable = ThresholdTable::new(
    &[
        Band::le(1.0, "Effective buffer region (pH within ±1 of pKa)"),
        Band::le(2.0, "Acceptable buffer range (pH within ±2 of pKa)"),
    ],
    "Outside optimal buffer range (pH differs from pKa by more than 2 units)",
);

#[derive(Debug, Clone, Default)]
pub struct HendersonHasselbalchCalculator;

const NAME: &str = "Henderson-Hasselbalch Calculator";

const PH: FieldSpec = FieldSpec::required("ph", "pH", "");
const PKA: FieldSpec = FieldSpec::required("pka", "pKa", "");
const BASE: FieldSpec = FieldSpec::required("base", "Conjugate base [A-]", "M");
const ACID: FieldSpec = FieldSpec::required("acid", "Weak acid [HA]", "M");

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "ph",
        label: "pH",
        formula: "pH = pKa + log([A-]/[HA])",
        fields: &[PKA, BASE, ACID],
    },
    ModeSpec {
        key: "pka",
        label: "pKa",
        formula: "pKa = pH - log([A-]/[HA])",
        fields: &[PH, BASE, ACID],
    },
    ModeSpec {
        key: "base",
        label: "[A-] (conjugate base concentration)",
        formula: "[A-] = [HA]·10^(pH - pKa)",
        fields: &[PH, PKA, ACID],
    },
    ModeSpec {
        key: "acid",
        label: "[HA] (weak acid concentration)",
        formula: "[HA] = [A-] / 10^(pH - pKa)",
        fields: &[PH, PKA, BASE],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Acetate buffer",
        mode: "ph",
        inputs: &[("pka", "4.76"), ("base", "0.15"), ("acid", "0.10")],
        reference: Some(Reference {
            label: "pH",
            value: 4.94,
            unit: "",
        }),
        description: "Acetic acid / sodium acetate",
    },
    ExamplePreset {
        name: "Phosphate buffer at pH 7.4",
        mode: "base",
        inputs: &[("ph", "7.4"), ("pka", "7.21"), ("acid", "0.05")],
        reference: None,
        description: "H2PO4- / HPO4 2-",
    },
    ExamplePreset {
        name: "Ammonium buffer",
        mode: "pka",
        inputs: &[("ph", "9.25"), ("base", "0.2"), ("acid", "0.2")],
        reference: Some(Reference {
            label: "pKa",
            value: 9.25,
            unit: "",
        }),
        description: "Equal amounts of NH3 and NH4+",
    },
];

impl Calculator for HendersonHasselbalchCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "henderson_hasselbalch"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: BufferMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let buffer = match parsed {
            BufferMode::Ph => Buffer::solve_ph(
                v.number("pka", "pKa")?,
                v.positive("base", "Base concentration")?,
                v.positive("acid", "Acid concentration")?,
            ),
            BufferMode::Pka => Buffer::solve_pka(
                v.number("ph", "pH")?,
                v.positive("base", "Base concentration")?,
                v.positive("acid", "Acid concentration")?,
            ),
            BufferMode::Base => Buffer::solve_base(
                v.number("ph", "pH")?,
                v.number("pka", "pKa")?,
                v.positive("acid", "Acid concentration")?,
            ),
            BufferMode::Acid => Buffer::solve_acid(
                v.number("ph", "pH")?,
                v.number("pka", "pKa")?,
                v.positive("base", "Base concentration")?,
            ),
        };
        debug!("buffer {:?}", buffer);
        let mut result = CalcResult::new(NAME, mode);
        match parsed {
            BufferMode::Ph => result.push_value("pH", buffer.ph, ""),
            BufferMode::Pka => result.push_value("pKa", buffer.pka, ""),
            BufferMode::Base => result.push_value("[A-]", buffer.base, "M"),
            BufferMode::Acid => result.push_value("[HA]", buffer.acid, "M"),
        }
        let side = if buffer.ph > buffer.pka {
            "pH above pKa: the conjugate base predominates"
        } else if buffer.ph < buffer.pka {
            "pH below pKa: the weak acid predominates"
        } else {
            "pH equals pKa: equal concentrations of acid and conjugate base (optimal buffer)"
        };
        Ok(result
            .with_value("[A-]/[HA]", buffer.ratio(), "")
            .with_interpretation(BUFFER_REGION.classify((buffer.ph - buffer.pka).abs()))
            .with_interpretation(side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn acetate_buffer() {
        let b = Buffer::solve_ph(4.76, 0.15, 0.10);
        assert_relative_eq!(b.ph, 4.936, epsilon = 1e-3);
    }

    #[test]
    fn all_four_forms_agree() {
        let b = Buffer::solve_ph(7.21, 0.031, 0.05);
        assert_relative_eq!(Buffer::solve_pka(b.ph, 0.031, 0.05).pka, 7.21, epsilon = 1e-12);
        assert_relative_eq!(Buffer::solve_base(b.ph, 7.21, 0.05).base, 0.031, epsilon = 1e-12);
        assert_relative_eq!(Buffer::solve_acid(b.ph, 7.21, 0.031).acid, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn buffer_region_commentary() {
        let result = HendersonHasselbalchCalculator
            .calculate("pka", &EXAMPLES[2].to_form())
            .unwrap();
        assert_eq!(
            result.interpretation[0],
            "Effective buffer region (pH within ±1 of pKa)"
        );
        let form = FormState::from_pairs(&[("pka", "4.76"), ("base", "0.5"), ("acid", "0.0001")]);
        let result = HendersonHasselbalchCalculator.calculate("ph", &form).unwrap();
        assert!(result.interpretation[0].starts_with("Outside optimal"));
        let form = FormState::from_pairs(&[("pka", "4.76"), ("base", "0"), ("acid", "0.1")]);
        assert!(HendersonHasselbalchCalculator.calculate("ph", &form).is_err());
    }

    #[test]
    fn unreachable_ratio_is_refused() {
        let form = FormState::from_pairs(&[("ph", "400"), ("pka", "0"), ("acid", "1")]);
        assert!(HendersonHasselbalchCalculator.calculate("base", &form).is_err());
        let form = FormState::from_pairs(&[("ph", "-400"), ("pka", "0"), ("base", "1")]);
        let err = HendersonHasselbalchCalculator.calculate("acid", &form).unwrap_err();
        assert_eq!(err.kind(), crate::Utils::validation::ErrorKind::Derived);
    }
}
