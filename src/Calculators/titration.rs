//! Acid-base titration of an analyte of known volume by a titrant of known concentration.
//!
//! `strong_strong` and `weak_strong`: the acid is in the flask and the base is added, so the
//! base volume is the titrant volume added so far (0 at the start).
//! `strong_weak`: the weak base is in the flask and the strong acid is added, so the acid
//! volume is the titrant volume.
//!
//! Volumes are in mL and amounts in mmol, so C = n/V comes out in mol/L directly.
//! Weak species use the x << C approximation, [H+] = sqrt(Ka·C).
use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure};
use log::{debug, info};
use std::str::FromStr;

/// ionic product of water at 25 °C
pub const KW: f64 = 1e-14;
const PKW: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitrationKind {
    StrongAcidStrongBase,
    WeakAcidStrongBase,
    StrongAcidWeakBase,
}

impl FromStr for TitrationKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong_strong" => Ok(TitrationKind::StrongAcidStrongBase),
            "weak_strong" => Ok(TitrationKind::WeakAcidStrongBase),
            "strong_weak" => Ok(TitrationKind::StrongAcidWeakBase),
            _ => Err(s.to_string()),
        }
    }
}

fn p(x: f64) -> f64 {
    -x.log10()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitrationSetup {
    pub kind: TitrationKind,
    /// M
    pub analyte_conc: f64,
    /// mL
    pub analyte_volume: f64,
    /// M
    pub titrant_conc: f64,
    /// Ka of the weak acid or Kb of the weak base; unused for strong_strong
    pub k: f64,
}

impl TitrationSetup {
    pub fn new(
        kind: TitrationKind,
        analyte_conc: f64,
        analyte_volume: f64,
        titrant_conc: f64,
        k: Option<f64>,
    ) -> Result<Self, CalcError> {
        ensure(
            analyte_conc > 0.0 && analyte_volume > 0.0 && titrant_conc > 0.0,
            "All concentrations and volumes must be positive",
        )?;
        let k = match kind {
            TitrationKind::StrongAcidStrongBase => 0.0,
            TitrationKind::WeakAcidStrongBase => {
                let ka = k.ok_or_else(|| CalcError::Missing {
                    field: "Ka".to_string(),
                })?;
                ensure(ka > 0.0, "Ka must be positive")?;
                ka
            }
            TitrationKind::StrongAcidWeakBase => {
                let kb = k.ok_or_else(|| CalcError::Missing {
                    field: "Kb".to_string(),
                })?;
                ensure(kb > 0.0, "Kb must be positive")?;
                kb
            }
        };
        Ok(Self {
            kind,
            analyte_conc,
            analyte_volume,
            titrant_conc,
            k,
        })
    }

    /// mmol of analyte in the flask
    pub fn analyte_amount(&self) -> f64 {
        self.analyte_conc * self.analyte_volume
    }

    /// titrant volume (mL) that neutralises the analyte
    pub fn equivalence_volume(&self) -> f64 {
        self.analyte_amount() / self.titrant_conc
    }

    pub fn initial_ph(&self) -> f64 {
        match self.kind {
            TitrationKind::StrongAcidStrongBase => p(self.analyte_conc),
            TitrationKind::WeakAcidStrongBase => p((self.k * self.analyte_conc).sqrt()),
            TitrationKind::StrongAcidWeakBase => PKW - p((self.k * self.analyte_conc).sqrt()),
        }
    }

    /// pH = pKa of the weak species at half-equivalence, None for strong_strong
    pub fn half_equivalence_ph(&self) -> Option<f64> {
        match self.kind {
            TitrationKind::StrongAcidStrongBase => None,
            TitrationKind::WeakAcidStrongBase => Some(p(self.k)),
            TitrationKind::StrongAcidWeakBase => Some(PKW - p(self.k)),
        }
    }

    pub fn equivalence_ph(&self) -> f64 {
        let total_volume = self.analyte_volume + self.equivalence_volume();
        let conjugate = self.analyte_amount() / total_volume;
        match self.kind {
            TitrationKind::StrongAcidStrongBase => 7.0,
            TitrationKind::WeakAcidStrongBase => {
                let kb = KW / self.k;
                PKW - p((kb * conjugate).sqrt())
            }
            TitrationKind::StrongAcidWeakBase => {
                let ka = KW / self.k;
                p((ka * conjugate).sqrt())
            }
        }
    }

    /// pH after `added` mL of titrant
    pub fn ph_at(&self, added: f64) -> Result<f64, CalcError> {
        ensure(added >= 0.0, "Titrant volume must be non-negative")?;
        if added == 0.0 {
            return Ok(self.initial_ph());
        }
        let veq = self.equivalence_volume();
        if (added - veq).abs() <= 1e-9 * veq {
            return Ok(self.equivalence_ph());
        }
        let analyte = self.analyte_amount();
        let titrant = self.titrant_conc * added;
        let total_volume = self.analyte_volume + added;
        let ph = if added < veq {
            match self.kind {
                TitrationKind::StrongAcidStrongBase => p((analyte - titrant) / total_volume),
                // buffer HA / A-
                TitrationKind::WeakAcidStrongBase => p(self.k) + (titrant / (analyte - titrant)).log10(),
                // buffer B / BH+
                TitrationKind::StrongAcidWeakBase => {
                    PKW - p(self.k) + ((analyte - titrant) / titrant).log10()
                }
            }
        } else {
            let excess = (titrant - analyte) / total_volume;
            match self.kind {
                TitrationKind::StrongAcidWeakBase => p(excess),
                _ => PKW + excess.log10(),
            }
        };
        Ok(ph)
    }

    /// (titrant volume, pH) points from 0 to twice the equivalence volume
    pub fn curve(&self, steps: usize) -> Result<Vec<(f64, f64)>, CalcError> {
        let end = 2.0 * self.equivalence_volume();
        let steps = steps.max(1);
        (0..=steps)
            .map(|i| {
                let volume = end * i as f64 / steps as f64;
                self.ph_at(volume).map(|ph| (volume, ph))
            })
            .collect()
    }

    pub fn indicator(&self) -> &'static str {
        match self.kind {
            TitrationKind::StrongAcidStrongBase => {
                "Bromothymol blue (pH 6.0-7.6); phenolphthalein also works on the steep jump"
            }
            TitrationKind::WeakAcidStrongBase => "Phenolphthalein (pH 8.2-10.0)",
            TitrationKind::StrongAcidWeakBase => "Methyl orange (pH 3.1-4.4) or methyl red",
        }
    }
}

pub fn equivalence_character(ph: f64) -> &'static str {
    if ph > 7.0 + 1e-9 {
        "Basic equivalence point: the conjugate base hydrolyses"
    } else if ph < 7.0 - 1e-9 {
        "Acidic equivalence point: the conjugate acid hydrolyses"
    } else {
        "Neutral equivalence point"
    }
}

#[derive(Debug, Clone, Default)]
pub struct TitrationCalculator;

const NAME: &str = "Titration Calculator";

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "strong_strong",
        label: "Strong acid - strong base",
        formula: "Veq = Ca·Va / Cb; pH(eq) = 7",
        fields: &[
            FieldSpec::required("acid_conc", "Acid concentration Ca", "M"),
            FieldSpec::required("acid_volume", "Acid volume Va", "mL"),
            FieldSpec::required("base_conc", "Base concentration Cb", "M"),
            FieldSpec::required("base_volume", "Base added Vb", "mL"),
        ],
    },
    ModeSpec {
        key: "weak_strong",
        label: "Weak acid - strong base",
        formula: "pH0 = -log sqrt(Ka·Ca); pH(½eq) = pKa; pH(eq) from Kb = Kw/Ka",
        fields: &[
            FieldSpec::required("acid_conc", "Acid concentration Ca", "M"),
            FieldSpec::required("acid_volume", "Acid volume Va", "mL"),
            FieldSpec::required("base_conc", "Base concentration Cb", "M"),
            FieldSpec::required("base_volume", "Base added Vb", "mL"),
            FieldSpec::required("ka", "Acid dissociation constant Ka", ""),
        ],
    },
    ModeSpec {
        key: "strong_weak",
        label: "Strong acid - weak base",
        formula: "Veq = Cb·Vb / Ca; pH0 = 14 - pOH, [OH-] = sqrt(Kb·Cb)",
        fields: &[
            FieldSpec::required("acid_conc", "Acid concentration Ca", "M"),
            FieldSpec::required("acid_volume", "Acid added Va", "mL"),
            FieldSpec::required("base_conc", "Base concentration Cb", "M"),
            FieldSpec::required("base_volume", "Base volume Vb", "mL"),
            FieldSpec::required("kb", "Base dissociation constant Kb", ""),
        ],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "HCl with NaOH",
        mode: "strong_strong",
        inputs: &[
            ("acid_conc", "0.1"),
            ("acid_volume", "25"),
            ("base_conc", "0.1"),
            ("base_volume", "0"),
        ],
        reference: Some(Reference {
            label: "Equivalence volume",
            value: 25.0,
            unit: "mL",
        }),
        description: "Strong acid - strong base",
    },
    ExamplePreset {
        name: "Acetic acid with NaOH",
        mode: "weak_strong",
        inputs: &[
            ("acid_conc", "0.1"),
            ("acid_volume", "25"),
            ("base_conc", "0.1"),
            ("base_volume", "0"),
            ("ka", "1.8e-5"),
        ],
        reference: Some(Reference {
            label: "pH at equivalence",
            value: 8.72,
            unit: "",
        }),
        description: "CH3COOH, Ka = 1.8e-5",
    },
    ExamplePreset {
        name: "Ammonia with HCl",
        mode: "strong_weak",
        inputs: &[
            ("acid_conc", "0.1"),
            ("acid_volume", "0"),
            ("base_conc", "0.1"),
            ("base_volume", "25"),
            ("kb", "1.8e-5"),
        ],
        reference: Some(Reference {
            label: "pH at equivalence",
            value: 5.28,
            unit: "",
        }),
        description: "NH3, Kb = 1.8e-5",
    },
];

impl Calculator for TitrationCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "titration"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let kind: TitrationKind = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let ca = v.number("acid_conc", "Acid concentration")?;
        let va = v.number("acid_volume", "Acid volume")?;
        let cb = v.number("base_conc", "Base concentration")?;
        let vb = v.number("base_volume", "Base volume")?;
        let (setup, added) = match kind {
            TitrationKind::StrongAcidStrongBase => (TitrationSetup::new(kind, ca, va, cb, None)?, vb),
            TitrationKind::WeakAcidStrongBase => {
                let ka = v.number("ka", "Ka")?;
                (TitrationSetup::new(kind, ca, va, cb, Some(ka))?, vb)
            }
            TitrationKind::StrongAcidWeakBase => {
                let kb = v.number("kb", "Kb")?;
                (TitrationSetup::new(kind, cb, vb, ca, Some(kb))?, va)
            }
        };
        debug!("titration setup {:?}, titrant added {} mL", setup, added);
        let current = setup.ph_at(added)?;
        let eq_ph = setup.equivalence_ph();
        info!(
            "titration {}: Veq = {:.3} mL, pH(eq) = {:.3}",
            mode,
            setup.equivalence_volume(),
            eq_ph
        );

        let mut result = CalcResult::new(NAME, mode)
            .with_value("Initial pH", setup.initial_ph(), "")
            .with_value("Equivalence volume", setup.equivalence_volume(), "mL");
        if let Some(half) = setup.half_equivalence_ph() {
            result.push_value("pH at half-equivalence", half, "");
        }
        Ok(result
            .with_value("pH at equivalence", eq_ph, "")
            .with_value("pH at titrant volume", current, "")
            .with_text("Suggested indicator", setup.indicator())
            .with_interpretation(equivalence_character(eq_ph)))
    }
}
