use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure, ensure_derived, ensure_ordered};
use log::debug;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateMode {
    Average,
    Instantaneous,
    Concentration,
}

impl FromStr for RateMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(RateMode::Average),
            "instantaneous" => Ok(RateMode::Instantaneous),
            "concentration" => Ok(RateMode::Concentration),
            _ => Err(s.to_string()),
        }
    }
}

/// Time unit is only a label: no conversion is applied, rates come out in M per that unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[default]
    Second,
    Minute,
    Hour,
    Day,
    Year,
}

impl FromStr for TimeUnit {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "sec" | "seconds" => Ok(TimeUnit::Second),
            "min" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hr" | "hours" => Ok(TimeUnit::Hour),
            "day" | "days" | "d" => Ok(TimeUnit::Day),
            "year" | "years" | "yr" => Ok(TimeUnit::Year),
            other => Err(CalcError::domain(format!(
                "Unknown time unit '{}' (use s, min, h, day or year)",
                other
            ))),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "min",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "day",
            TimeUnit::Year => "year",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageRate {
    /// M per time unit, positive when the concentration falls
    pub rate: f64,
    pub delta_c: f64,
    pub delta_t: f64,
    /// None when the initial concentration is zero
    pub percent_change: Option<f64>,
}

/// rate = -(C2 - C1)/(t2 - t1)
pub fn average_rate(c1: f64, c2: f64, t1: f64, t2: f64) -> Result<AverageRate, CalcError> {
    ensure(c1 >= 0.0 && c2 >= 0.0, "Concentrations must be non-negative")?;
    ensure(t1 >= 0.0, "Initial time must be non-negative")?;
    ensure_ordered(t1, t2, "Final time must be greater than initial time")?;
    let delta_c = c2 - c1;
    let delta_t = t2 - t1;
    let percent_change = if c1 > 0.0 {
        Some(delta_c / c1 * 100.0)
    } else {
        None
    };
    Ok(AverageRate {
        rate: -delta_c / delta_t,
        delta_c,
        delta_t,
        percent_change,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcentrationAfter {
    pub concentration: f64,
    pub consumed: f64,
    pub percent_reacted: f64,
}

/// [A] = [A]0 - rate·t under a constant (average) rate
pub fn concentration_after(c0: f64, rate: f64, t: f64) -> Result<ConcentrationAfter, CalcError> {
    ensure(c0 >= 0.0, "Initial concentration must be non-negative")?;
    ensure(rate >= 0.0, "Rate must be non-negative")?;
    ensure(t >= 0.0, "Time must be non-negative")?;
    let consumed = rate * t;
    let concentration = c0 - consumed;
    ensure_derived(
        concentration >= 0.0,
        "Calculated concentration is negative. Reaction may have gone to completion.",
    )?;
    let percent_reacted = if c0 > 0.0 { consumed / c0 * 100.0 } else { 0.0 };
    Ok(ConcentrationAfter {
        concentration,
        consumed,
        percent_reacted,
    })
}

fn direction(rate: f64) -> &'static str {
    if rate > 0.0 {
        "Concentration decreases: the species is consumed as a reactant"
    } else if rate < 0.0 {
        "Concentration increases: the species is formed as a product (rate of formation is the absolute value)"
    } else {
        "No net change in concentration over the interval"
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReactionRateCalculator;

const NAME: &str = "Reaction Rate Calculator";

const TIME_UNIT: FieldSpec = FieldSpec::optional("time_unit", "Time unit (s, min, h, day, year)", "");

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "average",
        label: "Average rate",
        formula: "rate = -([A]2 - [A]1) / (t2 - t1)",
        fields: &[
            FieldSpec::required("c1", "Initial concentration [A]1", "M"),
            FieldSpec::required("c2", "Final concentration [A]2", "M"),
            FieldSpec::required("t1", "Initial time t1", "time"),
            FieldSpec::required("t2", "Final time t2", "time"),
            TIME_UNIT,
        ],
    },
    ModeSpec {
        key: "instantaneous",
        label: "Instantaneous rate",
        formula: "rate = -d[A]/dt at time t",
        fields: &[
            FieldSpec::required("rate", "Instantaneous rate", "M/time"),
            FieldSpec::required("time", "Time t", "time"),
            TIME_UNIT,
        ],
    },
    ModeSpec {
        key: "concentration",
        label: "Concentration from rate and time",
        formula: "[A] = [A]0 - rate·t",
        fields: &[
            FieldSpec::required("c0", "Initial concentration [A]0", "M"),
            FieldSpec::required("rate", "Average rate", "M/time"),
            FieldSpec::required("time", "Time t", "time"),
            TIME_UNIT,
        ],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Average Rate: Decomposition",
        mode: "average",
        inputs: &[("c1", "1.00"), ("c2", "0.40"), ("t1", "0"), ("t2", "10")],
        reference: Some(Reference {
            label: "Average rate",
            value: 0.06,
            unit: "M/s",
        }),
        description: "Calculate average rate over 10 seconds",
    },
    ExamplePreset {
        name: "Concentration Change",
        mode: "concentration",
        inputs: &[("c0", "2.00"), ("rate", "0.15"), ("time", "5.0")],
        reference: Some(Reference {
            label: "[A]",
            value: 1.25,
            unit: "M",
        }),
        description: "Find concentration after 5 seconds",
    },
    ExamplePreset {
        name: "Fast Reaction Rate",
        mode: "average",
        inputs: &[("c1", "0.50"), ("c2", "0.10"), ("t1", "0"), ("t2", "2")],
        reference: Some(Reference {
            label: "Average rate",
            value: 0.2,
            unit: "M/s",
        }),
        description: "High rate reaction",
    },
];

impl Calculator for ReactionRateCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "reaction_rate"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: RateMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let unit = match v.optional_text("time_unit") {
            Some(raw) => raw.parse::<TimeUnit>()?,
            None => TimeUnit::default(),
        };
        let rate_unit = format!("M/{}", unit);
        let time_unit = unit.to_string();
        let result = CalcResult::new(NAME, mode);
        match parsed {
            RateMode::Average => {
                let c1 = v.number("c1", "Initial concentration")?;
                let c2 = v.number("c2", "Final concentration")?;
                let t1 = v.number("t1", "Initial time")?;
                let t2 = v.number("t2", "Final time")?;
                let avg = average_rate(c1, c2, t1, t2)?;
                debug!("average rate {:?}", avg);
                let mut result = result
                    .with_value("Average rate", avg.rate, &rate_unit)
                    .with_value("|Δ[A]|", avg.delta_c.abs(), "M")
                    .with_value("Δt", avg.delta_t, &time_unit);
                if let Some(percent) = avg.percent_change {
                    result.push_value("Percent change", percent, "%");
                }
                Ok(result.with_interpretation(direction(avg.rate)))
            }
            RateMode::Instantaneous => {
                let rate = v.non_negative("rate", "Rate")?;
                let time = v.non_negative("time", "Time")?;
                Ok(result
                    .with_value("Instantaneous rate", rate, &rate_unit)
                    .with_value("Time", time, &time_unit)
                    .with_interpretation(
                        "Slope of the tangent to the concentration vs. time curve at this moment",
                    ))
            }
            RateMode::Concentration => {
                let c0 = v.number("c0", "Initial concentration")?;
                let rate = v.number("rate", "Rate")?;
                let time = v.number("time", "Time")?;
                let after = concentration_after(c0, rate, time)?;
                debug!("concentration after t {:?}", after);
                Ok(result
                    .with_value("[A]", after.concentration, "M")
                    .with_value("Consumed", after.consumed, "M")
                    .with_value("Percent reacted", after.percent_reacted, "%")
                    .with_interpretation("Assumes the rate stays constant over the interval"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::validation::ErrorKind;
    use approx::assert_relative_eq;

    #[test]
    fn average_rate_is_negative_slope() {
        let avg = average_rate(1.0, 0.4, 0.0, 10.0).unwrap();
        assert_relative_eq!(avg.rate, 0.06, epsilon = 1e-12);
        assert_relative_eq!(avg.percent_change.unwrap(), -60.0, epsilon = 1e-9);
        for &(c1, c2, t1, t2) in &[(0.5, 0.1, 0.0, 2.0), (0.2, 0.9, 3.0, 4.5), (2.0, 2.0, 1.0, 7.0)] {
            let avg = average_rate(c1, c2, t1, t2).unwrap();
            assert_relative_eq!(avg.rate, -(c2 - c1) / (t2 - t1));
            if c2 < c1 {
                assert!(avg.rate > 0.0);
            }
        }
    }

    #[test]
    fn time_must_advance() {
        let err = average_rate(1.0, 0.5, 10.0, 10.0).unwrap_err();
        assert_eq!(err.to_string(), "Final time must be greater than initial time");
        assert!(average_rate(1.0, 0.5, 10.0, 5.0).is_err());
        assert!(average_rate(-1.0, 0.5, 0.0, 5.0).is_err());
    }

    #[test]
    fn percent_change_needs_initial_concentration() {
        let avg = average_rate(0.0, 0.3, 0.0, 3.0).unwrap();
        assert_eq!(avg.percent_change, None);
        assert_relative_eq!(avg.rate, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn concentration_after_time() {
        let after = concentration_after(2.0, 0.15, 5.0).unwrap();
        assert_relative_eq!(after.concentration, 1.25, epsilon = 1e-12);
        assert_relative_eq!(after.percent_reacted, 37.5, epsilon = 1e-9);
        let err = concentration_after(1.0, 0.5, 3.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Derived);
    }

    #[test]
    fn time_unit_labels_the_result() {
        let form = FormState::from_pairs(&[
            ("c1", "1.0"),
            ("c2", "0.5"),
            ("t1", "0"),
            ("t2", "5"),
            ("time_unit", "min"),
        ]);
        let result = ReactionRateCalculator.calculate("average", &form).unwrap();
        assert_eq!(result.values[0].unit, "M/min");
        assert_relative_eq!(result.value("Average rate").unwrap(), 0.1, epsilon = 1e-12);

        let form = FormState::from_pairs(&[("rate", "0.1"), ("time", "1"), ("time_unit", "fortnight")]);
        assert!(ReactionRateCalculator.calculate("instantaneous", &form).is_err());
    }
}
