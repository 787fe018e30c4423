use crate::Utils::form_state::FormState;
use thiserror::Error;

/// The class an error belongs to. All classes are handled identically by the form
/// (calculation aborted, one message shown), the class is kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// empty required field, non numeric text, unreadable formula
    Parse,
    /// value outside the physically valid range
    Domain,
    /// valid-looking inputs that give an impossible result
    Derived,
    /// unknown calculator or calculation mode
    Selection,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{field} is required")]
    Missing { field: String },
    #[error("{field} must be a valid number (got '{raw}')")]
    NotANumber { field: String, raw: String },
    #[error("{0}")]
    Domain(String),
    #[error("{0}")]
    Impossible(String),
    #[error("Invalid chemical formula: {0}")]
    Formula(String),
    #[error("Unknown calculation mode '{mode}' for {calculator}")]
    UnknownMode { calculator: String, mode: String },
    #[error("Unknown calculator '{0}'")]
    UnknownCalculator(String),
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::Missing { .. } | CalcError::NotANumber { .. } | CalcError::Formula(_) => {
                ErrorKind::Parse
            }
            CalcError::Domain(_) => ErrorKind::Domain,
            CalcError::Impossible(_) => ErrorKind::Derived,
            CalcError::UnknownMode { .. } | CalcError::UnknownCalculator(_) => {
                ErrorKind::Selection
            }
        }
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        CalcError::Domain(msg.into())
    }

    pub fn impossible(msg: impl Into<String>) -> Self {
        CalcError::Impossible(msg.into())
    }
}

/// Parses user text into a finite f64. Accepts surrounding whitespace, exponent notation
/// (1.8e-5) and the typographic minus sign.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('\u{2212}', "-");
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// domain check: `Err(Domain(msg))` when the condition fails
pub fn ensure(condition: bool, msg: impl Into<String>) -> Result<(), CalcError> {
    if condition {
        Ok(())
    } else {
        Err(CalcError::domain(msg))
    }
}

/// check of a computed value: `Err(Impossible(msg))` when the condition fails
pub fn ensure_derived(condition: bool, msg: impl Into<String>) -> Result<(), CalcError> {
    if condition {
        Ok(())
    } else {
        Err(CalcError::impossible(msg))
    }
}

/// paired values (times, volumes) where the second must be strictly greater
pub fn ensure_ordered(lower: f64, upper: f64, msg: impl Into<String>) -> Result<(), CalcError> {
    ensure(upper > lower, msg)
}

/// Reads checked numbers and text out of a form snapshot.
/// `key` is the form field, `label` is what the user sees in the message.
pub struct Validator<'a> {
    form: &'a FormState,
}

impl<'a> Validator<'a> {
    pub fn new(form: &'a FormState) -> Self {
        Self { form }
    }

    pub fn text(&self, key: &str, label: &str) -> Result<&'a str, CalcError> {
        self.form.get(key).ok_or_else(|| CalcError::Missing {
            field: label.to_string(),
        })
    }

    pub fn optional_text(&self, key: &str) -> Option<&'a str> {
        self.form.get(key)
    }

    pub fn number(&self, key: &str, label: &str) -> Result<f64, CalcError> {
        let raw = self.text(key, label)?;
        parse_number(raw).ok_or_else(|| CalcError::NotANumber {
            field: label.to_string(),
            raw: raw.to_string(),
        })
    }

    /// absent field -> `Ok(None)`, present but unreadable -> error
    pub fn optional_number(&self, key: &str, label: &str) -> Result<Option<f64>, CalcError> {
        match self.form.get(key) {
            None => Ok(None),
            Some(_) => self.number(key, label).map(Some),
        }
    }

    pub fn non_negative(&self, key: &str, label: &str) -> Result<f64, CalcError> {
        let value = self.number(key, label)?;
        ensure(value >= 0.0, format!("{} must be non-negative", label))?;
        Ok(value)
    }

    pub fn positive(&self, key: &str, label: &str) -> Result<f64, CalcError> {
        let value = self.number(key, label)?;
        ensure(value > 0.0, format!("{} must be positive", label))?;
        Ok(value)
    }

    pub fn non_zero(&self, key: &str, label: &str) -> Result<f64, CalcError> {
        let value = self.number(key, label)?;
        ensure(value != 0.0, format!("{} must be non-zero", label))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_common_notations() {
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_number("1.8e-5"), Some(1.8e-5));
        assert_eq!(parse_number("\u{2212}411"), Some(-411.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn validator_reports_missing_and_unparseable_fields() {
        let form = FormState::from_pairs(&[("a", "x1"), ("b", "-3"), ("c", "0")]);
        let v = Validator::new(&form);
        let err = v.number("missing", "Volume").unwrap_err();
        assert_eq!(err.to_string(), "Volume is required");
        assert_eq!(err.kind(), ErrorKind::Parse);
        let err = v.number("a", "Mass").unwrap_err();
        assert_eq!(err.to_string(), "Mass must be a valid number (got 'x1')");
        let err = v.non_negative("b", "Concentration").unwrap_err();
        assert_eq!(err.to_string(), "Concentration must be non-negative");
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert!(v.positive("c", "Volume").is_err());
        assert!(v.non_zero("c", "n").is_err());
        assert_eq!(v.non_negative("c", "x").unwrap(), 0.0);
        assert_eq!(v.optional_number("missing", "x").unwrap(), None);
        assert!(v.optional_number("a", "x").is_err());
    }

    #[test]
    fn ensure_helpers_map_to_error_classes() {
        assert!(ensure(true, "never").is_ok());
        assert_eq!(
            ensure_ordered(10.0, 10.0, "Final time must be greater than initial time")
                .unwrap_err()
                .kind(),
            ErrorKind::Domain
        );
        assert_eq!(
            ensure_derived(false, "negative").unwrap_err().kind(),
            ErrorKind::Derived
        );
    }
}
