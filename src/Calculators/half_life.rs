use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure, ensure_derived};
use log::debug;
use std::f64::consts::LN_2;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfLifeMode {
    HalfLife,
    Concentration,
    RateConstant,
}

impl FromStr for HalfLifeMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "half_life" => Ok(HalfLifeMode::HalfLife),
            "concentration" => Ok(HalfLifeMode::Concentration),
            "rate_constant" => Ok(HalfLifeMode::RateConstant),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionOrder {
    Zero,
    #[default]
    First,
    Second,
}

impl FromStr for ReactionOrder {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "zero" => Ok(ReactionOrder::Zero),
            "1" | "first" => Ok(ReactionOrder::First),
            "2" | "second" => Ok(ReactionOrder::Second),
            other => Err(CalcError::domain(format!(
                "Unknown reaction order '{}' (use zero, first or second)",
                other
            ))),
        }
    }
}

impl ReactionOrder {
    pub fn label(&self) -> &'static str {
        match self {
            ReactionOrder::Zero => "zero",
            ReactionOrder::First => "first",
            ReactionOrder::Second => "second",
        }
    }
    pub fn rate_constant_unit(&self) -> &'static str {
        match self {
            ReactionOrder::Zero => "M/s",
            ReactionOrder::First => "1/s",
            ReactionOrder::Second => "1/(M·s)",
        }
    }
}

fn initial_required(c0: Option<f64>, order: ReactionOrder) -> Result<f64, CalcError> {
    let c0 = c0.ok_or_else(|| CalcError::Missing {
        field: format!("Initial concentration ({}-order reaction)", order.label()),
    })?;
    ensure(c0 > 0.0, "Initial concentration must be positive")?;
    Ok(c0)
}

/// t½: [A]0/2k, ln2/k, 1/(k[A]0). `c0` is only needed for zero and second order.
pub fn half_life(order: ReactionOrder, k: f64, c0: Option<f64>) -> Result<f64, CalcError> {
    ensure(k > 0.0, "Rate constant must be positive")?;
    Ok(match order {
        ReactionOrder::Zero => initial_required(c0, order)? / (2.0 * k),
        ReactionOrder::First => LN_2 / k,
        ReactionOrder::Second => 1.0 / (k * initial_required(c0, order)?),
    })
}

/// integrated rate laws
pub fn concentration_at(order: ReactionOrder, c0: f64, k: f64, t: f64) -> Result<f64, CalcError> {
    ensure(
        c0 > 0.0 && t >= 0.0,
        "Concentration must be positive and time non-negative",
    )?;
    ensure(k > 0.0, "Rate constant must be positive")?;
    match order {
        ReactionOrder::Zero => {
            let ct = c0 - k * t;
            ensure_derived(
                ct >= 0.0,
                "Concentration cannot be negative. Reaction is complete before this time.",
            )?;
            Ok(ct)
        }
        ReactionOrder::First => Ok(c0 * (-k * t).exp()),
        ReactionOrder::Second => Ok(c0 / (1.0 + k * t * c0)),
    }
}

/// k from the drop [A]0 -> [A]t over time t
pub fn rate_constant(order: ReactionOrder, c0: f64, ct: f64, t: f64) -> Result<f64, CalcError> {
    ensure(c0 > 0.0, "Initial concentration must be positive")?;
    ensure(
        ct >= 0.0 && t > 0.0,
        "Concentration must be non-negative and time must be positive",
    )?;
    ensure(ct <= c0, "Final concentration cannot exceed initial concentration")?;
    match order {
        ReactionOrder::Zero => Ok((c0 - ct) / t),
        ReactionOrder::First => {
            ensure(ct > 0.0, "Final concentration cannot be zero for first-order calculation")?;
            Ok((c0 / ct).ln() / t)
        }
        ReactionOrder::Second => {
            ensure(ct > 0.0, "Final concentration cannot be zero for second-order calculation")?;
            Ok((1.0 / ct - 1.0 / c0) / t)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HalfLifeCalculator;

const NAME: &str = "Half-Life Calculator";

const ORDER: FieldSpec = FieldSpec::optional("order", "Reaction order (zero, first, second)", "");

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "half_life",
        label: "Half-life",
        formula: "t½ = [A]0/2k | ln2/k | 1/(k[A]0)",
        fields: &[
            ORDER,
            FieldSpec::required("k", "Rate constant k", ""),
            FieldSpec::optional("c0", "Initial concentration [A]0", "M"),
        ],
    },
    ModeSpec {
        key: "concentration",
        label: "Concentration after time t",
        formula: "[A]t = [A]0 - kt | [A]0·e^(-kt) | [A]0/(1 + kt[A]0)",
        fields: &[
            ORDER,
            FieldSpec::required("c0", "Initial concentration [A]0", "M"),
            FieldSpec::required("k", "Rate constant k", ""),
            FieldSpec::required("time", "Time t", "s"),
        ],
    },
    ModeSpec {
        key: "rate_constant",
        label: "Rate constant",
        formula: "k = ([A]0 - [A]t)/t | ln([A]0/[A]t)/t | (1/[A]t - 1/[A]0)/t",
        fields: &[
            ORDER,
            FieldSpec::required("c0", "Initial concentration [A]0", "M"),
            FieldSpec::optional("ct", "Final concentration [A]t", "M"),
            FieldSpec::optional("time", "Time t", "s"),
            FieldSpec::optional("half_life", "Half-life (first order)", "s"),
        ],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "First-order decay",
        mode: "half_life",
        inputs: &[("order", "first"), ("k", "1.21e-4")],
        reference: Some(Reference {
            label: "Half-life",
            value: 5730.0,
            unit: "s",
        }),
        description: "k = 1.21e-4 1/s",
    },
    ExamplePreset {
        name: "Second-order dimerisation",
        mode: "concentration",
        inputs: &[("order", "second"), ("c0", "0.5"), ("k", "0.2"), ("time", "10")],
        reference: Some(Reference {
            label: "[A]t",
            value: 0.25,
            unit: "M",
        }),
        description: "After exactly one half-life",
    },
    ExamplePreset {
        name: "First-order from a measurement",
        mode: "rate_constant",
        inputs: &[("order", "first"), ("c0", "1.0"), ("ct", "0.25"), ("time", "20")],
        reference: None,
        description: "Two half-lives in 20 s",
    },
];

impl Calculator for HalfLifeCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "half_life"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: HalfLifeMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let order = match v.optional_text("order") {
            Some(raw) => raw.parse::<ReactionOrder>()?,
            None => ReactionOrder::default(),
        };
        let result = CalcResult::new(NAME, mode).with_text("Order", order.label());
        match parsed {
            HalfLifeMode::HalfLife => {
                let k = v.number("k", "Rate constant")?;
                let c0 = v.optional_number("c0", "Initial concentration")?;
                let t_half = half_life(order, k, c0)?;
                debug!("half-life {} for k = {}", t_half, k);
                Ok(result
                    .with_value("Half-life", t_half, "s")
                    .with_interpretation(match order {
                        ReactionOrder::First => {
                            "First order: the half-life does not depend on concentration"
                        }
                        ReactionOrder::Zero => {
                            "Zero order: each successive half-life is half as long"
                        }
                        ReactionOrder::Second => {
                            "Second order: each successive half-life is twice as long"
                        }
                    }))
            }
            HalfLifeMode::Concentration => {
                let c0 = v.number("c0", "Initial concentration")?;
                let k = v.number("k", "Rate constant")?;
                let t = v.number("time", "Time")?;
                let ct = concentration_at(order, c0, k, t)?;
                let mut result = result
                    .with_value("[A]t", ct, "M")
                    .with_value("Remaining", 100.0 * ct / c0, "%");
                if order == ReactionOrder::First {
                    result.push_value("Half-lives elapsed", t * k / LN_2, "");
                }
                Ok(result)
            }
            HalfLifeMode::RateConstant => {
                let c0 = v.number("c0", "Initial concentration")?;
                ensure(c0 > 0.0, "Initial concentration must be positive")?;
                let known_half_life = match order {
                    ReactionOrder::First => v
                        .optional_number("half_life", "Half-life")?
                        .filter(|t| *t > 0.0),
                    _ => None,
                };
                let k = match known_half_life {
                    Some(t_half) => LN_2 / t_half,
                    None => rate_constant(
                        order,
                        c0,
                        v.number("ct", "Final concentration")?,
                        v.number("time", "Time")?,
                    )?,
                };
                Ok(result
                    .with_value("Rate constant", k, order.rate_constant_unit())
                    .with_value("Half-life", half_life(order, k, Some(c0))?, "s"))
            }
        }
    }
}
