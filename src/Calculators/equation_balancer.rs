use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, parse_mode,
};
use crate::Chemistry::balance::balance_coefficients;
use crate::Chemistry::molmass::Composition;
use crate::Chemistry::reaction_equation::{ReactionEquation, Species};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator};
use log::info;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalancerMode {
    Balance,
    Verify,
}

impl FromStr for BalancerMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance" => Ok(BalancerMode::Balance),
            "verify" => Ok(BalancerMode::Verify),
            _ => Err(s.to_string()),
        }
    }
}

/// Balances "CH4 + O2" -> "CO2 + H2O". Coefficients already written in the input are ignored.
pub fn balance_equation(reactants: &str, products: &str) -> Result<ReactionEquation, CalcError> {
    let skeleton = ReactionEquation::from_sides(reactants, products)?;
    let compositions: Vec<Composition> = skeleton
        .species()
        .map(|(_, s)| s.composition.clone())
        .collect();
    let coefficients = balance_coefficients(&compositions, skeleton.reactants.len())?;
    let (left, right) = coefficients.split_at(skeleton.reactants.len());
    let rebuild = |list: &[Species], coefs: &[u64]| -> Vec<Species> {
        list.iter()
            .zip(coefs)
            .map(|(s, &c)| Species {
                coefficient: c as f64,
                ..s.clone()
            })
            .collect()
    };
    Ok(ReactionEquation {
        reactants: rebuild(&skeleton.reactants, left),
        products: rebuild(&skeleton.products, right),
    })
}

#[derive(Debug, Clone, Default)]
pub struct EquationBalancer;

const NAME: &str = "Chemical Equation Balancer";

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "balance",
        label: "Balance an equation",
        formula: "A·x = 0 (element balance), smallest positive integers x",
        fields: &[
            FieldSpec::required("reactants", "Reactants (A + B)", ""),
            FieldSpec::required("products", "Products (C + D)", ""),
        ],
    },
    ModeSpec {
        key: "verify",
        label: "Check an equation",
        formula: "Σ ν·n(element) left = right",
        fields: &[FieldSpec::required("equation", "Equation with coefficients", "")],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Methane combustion",
        mode: "balance",
        inputs: &[("reactants", "CH4 + O2"), ("products", "CO2 + H2O")],
        reference: None,
        description: "CH4 + 2O2 -> CO2 + 2H2O",
    },
    ExamplePreset {
        name: "Rusting of iron",
        mode: "balance",
        inputs: &[("reactants", "Fe + O2"), ("products", "Fe2O3")],
        reference: None,
        description: "4Fe + 3O2 -> 2Fe2O3",
    },
    ExamplePreset {
        name: "Permanganate and hydrochloric acid",
        mode: "balance",
        inputs: &[("reactants", "KMnO4 + HCl"), ("products", "KCl + MnCl2 + H2O + Cl2")],
        reference: None,
        description: "Redox reaction with six species",
    },
    ExamplePreset {
        name: "Photosynthesis check",
        mode: "verify",
        inputs: &[("equation", "6CO2 + 6H2O -> C6H12O6 + 6O2")],
        reference: None,
        description: "Already balanced",
    },
];

impl Calculator for EquationBalancer {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "equation_balancer"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: BalancerMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let equation = match parsed {
            BalancerMode::Balance => {
                let balanced =
                    balance_equation(v.text("reactants", "Reactants")?, v.text("products", "Products")?)?;
                info!("balanced: {}", balanced);
                balanced
            }
            BalancerMode::Verify => ReactionEquation::parse(v.text("equation", "Equation")?)?,
        };
        let mut result = CalcResult::new(NAME, mode).with_text("Equation", equation.to_string());
        for species in equation.reactants.iter().chain(equation.products.iter()) {
            result.push_value(
                &format!("Coefficient of {}", species.formula),
                species.coefficient,
                "",
            );
        }
        for (element, left, right) in equation.element_balance() {
            result.push_text(
                &format!("{} atoms", element),
                format!("{} left, {} right", left, right),
            );
        }
        let verdict = if equation.is_balanced() {
            "Balanced: every element has the same number of atoms on both sides"
        } else {
            "Not balanced: atom counts differ between the sides"
        };
        Ok(result.with_interpretation(verdict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balances_methane_combustion() {
        let eq = balance_equation("CH4 + O2", "CO2 + H2O").unwrap();
        assert_eq!(eq.to_string(), "CH4 + 2O2 -> CO2 + 2H2O");
        assert!(eq.is_balanced());
    }

    #[test]
    fn written_coefficients_are_ignored() {
        let eq = balance_equation("5Fe + O2", "Fe2O3").unwrap();
        assert_eq!(eq.to_string(), "4Fe + 3O2 -> 2Fe2O3");
    }

    #[test]
    fn verify_reports_per_element_counts() {
        let form = FormState::from_pairs(&[("equation", "H2 + O2 -> H2O")]);
        let result = EquationBalancer.calculate("verify", &form).unwrap();
        assert_eq!(result.text("O atoms"), Some("2 left, 1 right"));
        assert!(result.interpretation[0].starts_with("Not balanced"));
    }

    #[test]
    fn impossible_balance_is_an_error() {
        let form = FormState::from_pairs(&[("reactants", "NaCl"), ("products", "KBr")]);
        let err = EquationBalancer.calculate("balance", &form).unwrap_err();
        assert_eq!(err.kind(), crate::Utils::validation::ErrorKind::Derived);
    }
}
