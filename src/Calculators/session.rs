use crate::Calculators::calculator_api::{
    CalcResult, Calculator, CalculatorEnum, ExamplePreset, ModeSpec, find_mode,
};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::CalcError;
use log::{info, warn};

/// One open calculator form.
///
/// The session owns the raw field text and the outcome of the last Calculate press.
/// A result and an error are never held at the same time.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    pub calculator: CalculatorEnum,
    pub mode: String,
    pub form: FormState,
    pub result: Option<CalcResult>,
    pub error: Option<CalcError>,
}

impl CalculatorSession {
    /// opens the calculator in its first mode with an empty form
    pub fn new(calculator: CalculatorEnum) -> Self {
        let mode = calculator
            .modes()
            .first()
            .map(|m| m.key.to_string())
            .unwrap_or_default();
        Self {
            calculator,
            mode,
            form: FormState::new(),
            result: None,
            error: None,
        }
    }

    pub fn mode_spec(&self) -> Option<&'static ModeSpec> {
        find_mode(self.calculator.modes(), &self.mode)
    }

    /// switches mode; fields typed so far are kept so shared inputs survive the switch
    pub fn select_mode(&mut self, mode: &str) -> Result<(), CalcError> {
        let spec = find_mode(self.calculator.modes(), mode).ok_or_else(|| {
            CalcError::UnknownMode {
                calculator: self.calculator.name().to_string(),
                mode: mode.to_string(),
            }
        })?;
        self.mode = spec.key.to_string();
        self.clear_outcome();
        Ok(())
    }

    pub fn set_field(&mut self, field: &str, value: &str) {
        self.form.set(field, value);
    }

    /// replaces the form by a preset and switches to the preset's mode
    pub fn load_example(&mut self, index: usize) -> Result<&'static ExamplePreset, CalcError> {
        let examples = self.calculator.examples();
        let example = examples.get(index).ok_or_else(|| {
            CalcError::domain(format!(
                "Example {} does not exist ({} available)",
                index + 1,
                examples.len()
            ))
        })?;
        self.mode = example.mode.to_string();
        self.form = example.to_form();
        self.clear_outcome();
        info!("{}: loaded example '{}'", self.calculator.slug(), example.name);
        Ok(example)
    }

    /// runs the current mode over the current form, replacing the previous outcome
    pub fn calculate(&mut self) -> Result<&CalcResult, &CalcError> {
        self.clear_outcome();
        match self.calculator.calculate(&self.mode, &self.form) {
            Ok(result) => {
                info!(
                    "{} [{}]: {} values",
                    self.calculator.slug(),
                    self.mode,
                    result.values.len()
                );
                Ok(self.result.insert(result))
            }
            Err(err) => {
                warn!("{} [{}] rejected: {}", self.calculator.slug(), self.mode, err);
                Err(self.error.insert(err))
            }
        }
    }

    /// clears fields and outcome, the mode stays selected
    pub fn reset(&mut self) {
        self.form.clear();
        self.clear_outcome();
    }

    fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Calculators::calculator_api::calculator_by_slug;
    use crate::Utils::validation::ErrorKind;
    use approx::assert_relative_eq;

    fn dilution() -> CalculatorSession {
        CalculatorSession::new(calculator_by_slug("dilution").unwrap())
    }

    #[test]
    fn starts_in_first_mode() {
        let session = dilution();
        assert_eq!(session.mode, "v2");
        assert!(session.form.is_empty());
        assert!(session.result.is_none() && session.error.is_none());
        assert_eq!(session.mode_spec().unwrap().key, "v2");
    }

    #[test]
    fn calculate_then_fail_keeps_only_the_error() {
        let mut session = dilution();
        session.set_field("m1", "5.0");
        session.set_field("v1", "10");
        session.set_field("m2", "1.0");
        let v2 = session.calculate().unwrap().value("V2").unwrap();
        assert_relative_eq!(v2, 50.0);

        session.set_field("m2", "abc");
        let err = session.calculate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(session.result.is_none());
        assert!(session.error.is_some());

        session.set_field("m2", "1.0");
        assert!(session.calculate().is_ok());
        assert!(session.error.is_none());
    }

    #[test]
    fn example_switches_mode_and_reset_keeps_it() {
        let mut session = CalculatorSession::new(calculator_by_slug("titration").unwrap());
        let index = session
            .calculator
            .examples()
            .iter()
            .position(|e| e.mode == "weak_strong")
            .unwrap();
        session.load_example(index).unwrap();
        assert_eq!(session.mode, "weak_strong");
        assert!(session.calculate().is_ok());

        session.reset();
        assert_eq!(session.mode, "weak_strong");
        assert!(session.form.is_empty());
        assert!(session.result.is_none());
        assert!(session.load_example(99).is_err());
    }

    #[test]
    fn unknown_mode_is_refused() {
        let mut session = dilution();
        let err = session.select_mode("m3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Selection);
        assert_eq!(session.mode, "v2");
        session.select_mode("m2").unwrap();
        assert_eq!(session.mode, "m2");
    }
}
