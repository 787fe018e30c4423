use crate::Chemistry::molmass::{Composition, molar_mass_of_composition, normalize_formula, parse_formula};
use crate::Utils::validation::CalcError;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reactant,
    Product,
}

/// one substance of a reaction equation
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub formula: String,
    pub coefficient: f64,
    pub composition: Composition,
    /// g/mol
    pub molar_mass: f64,
}

impl Species {
    pub fn new(formula: &str, coefficient: f64) -> Result<Self, CalcError> {
        if !(coefficient > 0.0 && coefficient.is_finite()) {
            return Err(CalcError::Formula(format!(
                "coefficient of {} must be positive",
                formula
            )));
        }
        let composition = parse_formula(formula)?;
        Ok(Self {
            formula: normalize_formula(formula),
            coefficient,
            molar_mass: molar_mass_of_composition(&composition),
            composition,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReactionEquation {
    pub reactants: Vec<Species>,
    pub products: Vec<Species>,
}

fn split_terms(side: &str) -> Result<Vec<(f64, String)>, CalcError> {
    let term_re = Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)?\s*(.+)$")
        .map_err(|e| CalcError::Formula(e.to_string()))?;
    let mut terms = Vec::new();
    for raw in side.split('+') {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CalcError::Formula(format!(
                "empty term in '{}'",
                side.trim()
            )));
        }
        let caps = term_re
            .captures(raw)
            .ok_or_else(|| CalcError::Formula(format!("cannot read term '{}'", raw)))?;
        let coefficient = match caps.get(1) {
            Some(c) => c
                .as_str()
                .parse::<f64>()
                .map_err(|_| CalcError::Formula(format!("bad coefficient in '{}'", raw)))?,
            None => 1.0,
        };
        let formula = caps.get(2).map(|f| f.as_str()).unwrap_or_default();
        terms.push((coefficient, formula.to_string()));
    }
    Ok(terms)
}

/// reactant and product sides of an equation text; accepts ->, →, =, =>, <=>, ⇌
pub fn split_sides(equation: &str) -> Result<(String, String), CalcError> {
    let arrow_re = Regex::new(r"<=>|<->|->|=>|\u{21CC}|\u{2192}|=")
        .map_err(|e| CalcError::Formula(e.to_string()))?;
    let sides: Vec<&str> = arrow_re.split(equation).collect();
    if sides.len() != 2 {
        return Err(CalcError::Formula(format!(
            "equation '{}' must have exactly one arrow",
            equation.trim()
        )));
    }
    Ok((sides[0].to_string(), sides[1].to_string()))
}

impl ReactionEquation {
    /// "N2 + 3H2 -> 2NH3"; missing coefficients mean 1
    pub fn parse(equation: &str) -> Result<Self, CalcError> {
        let (left, right) = split_sides(equation)?;
        Self::from_sides(&left, &right)
    }

    /// "CH4 + O2", "CO2 + H2O"
    pub fn from_sides(reactants: &str, products: &str) -> Result<Self, CalcError> {
        let build = |side: &str| -> Result<Vec<Species>, CalcError> {
            split_terms(side)?
                .into_iter()
                .map(|(coefficient, formula)| Species::new(&formula, coefficient))
                .collect()
        };
        Ok(Self {
            reactants: build(reactants)?,
            products: build(products)?,
        })
    }

    pub fn species(&self) -> impl Iterator<Item = (Side, &Species)> {
        self.reactants
            .iter()
            .map(|s| (Side::Reactant, s))
            .chain(self.products.iter().map(|s| (Side::Product, s)))
    }

    /// Finds a species by formula text; if no formula matches literally, a species with the
    /// same atomic composition is accepted (OH2 finds H2O).
    pub fn find(&self, formula: &str) -> Result<(Side, &Species), CalcError> {
        let wanted = normalize_formula(formula);
        if let Some(found) = self.species().find(|(_, s)| s.formula == wanted) {
            return Ok(found);
        }
        let composition = parse_formula(formula)?;
        self.species()
            .find(|(_, s)| s.composition == composition)
            .ok_or_else(|| {
                CalcError::domain(format!("{} does not appear in the equation", formula.trim()))
            })
    }

    pub fn elements(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self
            .species()
            .flat_map(|(_, s)| s.composition.keys())
            .collect();
        set.into_iter().cloned().collect()
    }

    /// element -> (atoms on the left, atoms on the right), coefficients included
    pub fn element_balance(&self) -> Vec<(String, f64, f64)> {
        let count = |list: &[Species], element: &str| -> f64 {
            list.iter()
                .map(|s| s.coefficient * *s.composition.get(element).unwrap_or(&0) as f64)
                .sum()
        };
        self.elements()
            .into_iter()
            .map(|element| {
                let left = count(&self.reactants, &element);
                let right = count(&self.products, &element);
                (element, left, right)
            })
            .collect()
    }

    pub fn is_balanced(&self) -> bool {
        self.element_balance()
            .iter()
            .all(|(_, left, right)| (left - right).abs() <= 1e-9 * left.abs().max(1.0))
    }
}

fn format_side(list: &[Species]) -> String {
    list.iter()
        .map(|s| {
            if (s.coefficient - 1.0).abs() < 1e-12 {
                s.formula.clone()
            } else {
                format!("{}{}", s.coefficient, s.formula)
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

impl fmt::Display for ReactionEquation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            format_side(&self.reactants),
            format_side(&self.products)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_coefficients_and_arrows() {
        for text in ["N2 + 3H2 -> 2NH3", "N₂ + 3H₂ → 2NH₃", "N2+3 H2=2NH3", "N2 + 3H2 <=> 2NH3"] {
            let eq = ReactionEquation::parse(text).unwrap();
            assert_eq!(eq.reactants.len(), 2);
            assert_eq!(eq.products.len(), 1);
            assert_eq!(eq.reactants[1].formula, "H2");
            assert_eq!(eq.reactants[1].coefficient, 3.0);
            assert_eq!(eq.products[0].coefficient, 2.0);
            assert!(eq.is_balanced(), "{}", text);
        }
    }

    #[test]
    fn molar_masses_are_attached() {
        let eq = ReactionEquation::parse("N2 + 3H2 -> 2NH3").unwrap();
        assert_relative_eq!(eq.reactants[0].molar_mass, 28.014, epsilon = 1e-3);
        assert_relative_eq!(eq.products[0].molar_mass, 17.031, epsilon = 1e-3);
    }

    #[test]
    fn unbalanced_equation_is_detected() {
        let eq = ReactionEquation::parse("H2 + O2 -> H2O").unwrap();
        assert!(!eq.is_balanced());
        let balance = eq.element_balance();
        assert_eq!(balance[1], ("O".to_string(), 2.0, 1.0));
    }

    #[test]
    fn find_by_formula_or_composition() {
        let eq = ReactionEquation::parse("2H2 + O2 -> 2H2O").unwrap();
        assert_eq!(eq.find("H2O").unwrap().0, Side::Product);
        assert_eq!(eq.find("OH2").unwrap().1.formula, "H2O");
        assert_eq!(eq.find(" O₂ ").unwrap().0, Side::Reactant);
        assert!(eq.find("CO2").is_err());
    }

    #[test]
    fn malformed_equations() {
        assert!(ReactionEquation::parse("H2 + O2").is_err());
        assert!(ReactionEquation::parse("H2 -> O2 -> H2O").is_err());
        assert!(ReactionEquation::parse("H2 + -> H2O").is_err());
        assert!(ReactionEquation::parse("0H2 + O2 -> H2O").is_err());
    }

    #[test]
    fn display_round_trips() {
        let eq = ReactionEquation::parse("2H2 + O2 -> 2H2O").unwrap();
        assert_eq!(eq.to_string(), "2H2 + O2 -> 2H2O");
    }
}
