use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Chemistry::molmass::normalize_formula;
use crate::Chemistry::reaction_equation::{ReactionEquation, Side};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure, parse_number};
use log::{debug, info};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoichiometryMode {
    MassToMass,
    Limiting,
}

impl FromStr for StoichiometryMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mass_to_mass" => Ok(StoichiometryMode::MassToMass),
            "limiting" => Ok(StoichiometryMode::Limiting),
            _ => Err(s.to_string()),
        }
    }
}

fn balanced_equation(text: &str) -> Result<ReactionEquation, CalcError> {
    let equation = ReactionEquation::parse(text)?;
    if !equation.is_balanced() {
        let off: Vec<String> = equation
            .element_balance()
            .into_iter()
            .filter(|(_, left, right)| (left - right).abs() > 1e-9)
            .map(|(el, left, right)| format!("{} {}/{}", el, left, right))
            .collect();
        return Err(CalcError::domain(format!(
            "Equation is not balanced ({}); balance it first",
            off.join(", ")
        )));
    }
    Ok(equation)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MassConversion {
    pub given_moles: f64,
    pub target_moles: f64,
    /// g
    pub target_mass: f64,
    /// target coefficient / given coefficient
    pub mole_ratio: f64,
}

/// grams of one species -> grams of another through the mole ratio of the equation
pub fn mass_to_mass(
    equation: &ReactionEquation,
    given: &str,
    given_mass: f64,
    target: &str,
) -> Result<MassConversion, CalcError> {
    ensure(given_mass >= 0.0, "Mass must be non-negative")?;
    let (_, given_species) = equation.find(given)?;
    let (_, target_species) = equation.find(target)?;
    let given_moles = given_mass / given_species.molar_mass;
    let mole_ratio = target_species.coefficient / given_species.coefficient;
    let target_moles = given_moles * mole_ratio;
    Ok(MassConversion {
        given_moles,
        target_moles,
        target_mass: target_moles * target_species.molar_mass,
        mole_ratio,
    })
}

/// "N2=28, H2 = 10" -> [("N2", 28.0), ("H2", 10.0)]
pub fn parse_mass_list(text: &str) -> Result<Vec<(String, f64)>, CalcError> {
    let mut masses: Vec<(String, f64)> = Vec::new();
    for item in text.split([',', ';']) {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let (formula, raw) = item.split_once('=').ok_or_else(|| {
            CalcError::domain(format!("'{}' must look like Formula=grams", item))
        })?;
        let formula = formula.trim();
        let field = format!("Mass of {}", formula);
        let mass = parse_number(raw).ok_or_else(|| CalcError::NotANumber {
            field: field.clone(),
            raw: raw.trim().to_string(),
        })?;
        ensure(mass >= 0.0, format!("{} must be non-negative", field))?;
        let key = normalize_formula(formula);
        ensure(
            !masses.iter().any(|(known, _)| normalize_formula(known) == key),
            format!("{} is listed more than once", formula),
        )?;
        masses.push((formula.to_string(), mass));
    }
    ensure(!masses.is_empty(), "Enter at least one reactant mass")?;
    Ok(masses)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductYield {
    pub formula: String,
    pub moles: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leftover {
    pub formula: String,
    pub mass: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimitingReagent {
    pub limiting: String,
    /// moles of reaction events, n/ν of the limiting reactant
    pub extent: f64,
    pub theoretical_yields: Vec<ProductYield>,
    pub leftovers: Vec<Leftover>,
}

/// The limiting reactant is the one with the smallest moles/coefficient.
pub fn limiting_reagent(
    equation: &ReactionEquation,
    masses: &[(String, f64)],
) -> Result<LimitingReagent, CalcError> {
    let mut candidates = Vec::new();
    for (formula, mass) in masses {
        let (side, species) = equation.find(formula)?;
        ensure(
            side == Side::Reactant,
            format!("{} is a product; enter reactant masses only", formula),
        )?;
        let moles = mass / species.molar_mass;
        candidates.push((species, moles, moles / species.coefficient));
    }
    let (limiting, _, extent) = candidates
        .iter()
        .cloned()
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .ok_or_else(|| CalcError::domain("Enter at least one reactant mass"))?;
    debug!("limiting reactant {} with extent {}", limiting.formula, extent);
    let theoretical_yields = equation
        .products
        .iter()
        .map(|p| ProductYield {
            formula: p.formula.clone(),
            moles: extent * p.coefficient,
            mass: extent * p.coefficient * p.molar_mass,
        })
        .collect();
    let leftovers = candidates
        .iter()
        .filter(|(s, _, _)| s.formula != limiting.formula)
        .map(|(s, moles, _)| Leftover {
            formula: s.formula.clone(),
            mass: (moles - extent * s.coefficient) * s.molar_mass,
        })
        .collect();
    Ok(LimitingReagent {
        limiting: limiting.formula.clone(),
        extent,
        theoretical_yields,
        leftovers,
    })
}

#[derive(Debug, Clone, Default)]
pub struct StoichiometryCalculator;

const NAME: &str = "Stoichiometry Calculator";

const MODES: &[ModeSpec] = &[
    ModeSpec {
        key: "mass_to_mass",
        label: "Mass to mass",
        formula: "m(target) = m(given)/M(given) · ν(target)/ν(given) · M(target)",
        fields: &[
            FieldSpec::required("equation", "Balanced equation", ""),
            FieldSpec::required("given", "Given species", ""),
            FieldSpec::required("given_mass", "Mass of given species", "g"),
            FieldSpec::required("target", "Target species", ""),
        ],
    },
    ModeSpec {
        key: "limiting",
        label: "Limiting reagent and theoretical yield",
        formula: "limiting = min(n/ν); yield = n/ν(limiting) · ν(product) · M(product)",
        fields: &[
            FieldSpec::required("equation", "Balanced equation", ""),
            FieldSpec::required("masses", "Reactant masses (Formula=g, ...)", "g"),
        ],
    },
];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Ammonia synthesis",
        mode: "mass_to_mass",
        inputs: &[
            ("equation", "N2 + 3H2 -> 2NH3"),
            ("given", "N2"),
            ("given_mass", "28"),
            ("target", "NH3"),
        ],
        reference: Some(Reference {
            label: "Mass of target",
            value: 34.0,
            unit: "g",
        }),
        description: "28 g of nitrogen gives 34 g of ammonia",
    },
    ExamplePreset {
        name: "Water from hydrogen and oxygen",
        mode: "limiting",
        inputs: &[("equation", "2H2 + O2 -> 2H2O"), ("masses", "H2=4, O2=16")],
        reference: Some(Reference {
            label: "Theoretical yield of H2O",
            value: 18.0,
            unit: "g",
        }),
        description: "Oxygen runs out first",
    },
    ExamplePreset {
        name: "Methane combustion",
        mode: "mass_to_mass",
        inputs: &[
            ("equation", "CH4 + 2O2 -> CO2 + 2H2O"),
            ("given", "CH4"),
            ("given_mass", "16"),
            ("target", "O2"),
        ],
        reference: Some(Reference {
            label: "Mass of target",
            value: 64.0,
            unit: "g",
        }),
        description: "Oxygen needed to burn one mole of methane",
    },
];

impl Calculator for StoichiometryCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "stoichiometry"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let parsed: StoichiometryMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let equation = balanced_equation(v.text("equation", "Equation")?)?;
        let result = CalcResult::new(NAME, mode).with_text("Equation", equation.to_string());
        match parsed {
            StoichiometryMode::MassToMass => {
                let given = v.text("given", "Given species")?;
                let given_mass = v.number("given_mass", "Mass of given species")?;
                let target = v.text("target", "Target species")?;
                let conversion = mass_to_mass(&equation, given, given_mass, target)?;
                info!(
                    "{} g {} -> {:.4} g {}",
                    given_mass, given, conversion.target_mass, target
                );
                Ok(result
                    .with_value("Moles of given", conversion.given_moles, "mol")
                    .with_value("Mole ratio", conversion.mole_ratio, "")
                    .with_value("Moles of target", conversion.target_moles, "mol")
                    .with_value("Mass of target", conversion.target_mass, "g"))
            }
            StoichiometryMode::Limiting => {
                let masses = parse_mass_list(v.text("masses", "Reactant masses")?)?;
                let found = limiting_reagent(&equation, &masses)?;
                info!("limiting reactant {}", found.limiting);
                let mut result = result.with_text("Limiting reagent", found.limiting.clone());
                result.push_value("Reaction extent", found.extent, "mol");
                for product in &found.theoretical_yields {
                    result.push_value(
                        &format!("Theoretical yield of {}", product.formula),
                        product.mass,
                        "g",
                    );
                }
                for leftover in &found.leftovers {
                    result.push_value(&format!("{} left over", leftover.formula), leftover.mass, "g");
                }
                let listed: Vec<&str> = masses
                    .iter()
                    .filter_map(|(f, _)| equation.find(f).ok())
                    .map(|(_, s)| s.formula.as_str())
                    .collect();
                let unlisted: Vec<&str> = equation
                    .reactants
                    .iter()
                    .map(|r| r.formula.as_str())
                    .filter(|f| !listed.contains(f))
                    .collect();
                if !unlisted.is_empty() {
                    result = result.with_interpretation(format!(
                        "Assumed in excess: {}",
                        unlisted.join(", ")
                    ));
                }
                Ok(result.with_interpretation(format!(
                    "{} is consumed completely; the reaction stops when it runs out",
                    found.limiting
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nitrogen_to_ammonia() {
        let eq = ReactionEquation::parse("N2 + 3H2 -> 2NH3").unwrap();
        let c = mass_to_mass(&eq, "N2", 28.0, "NH3").unwrap();
        assert_relative_eq!(c.target_mass, 34.0, epsilon = 0.1);
        assert_relative_eq!(c.mole_ratio, 2.0);
        let back = mass_to_mass(&eq, "NH3", c.target_mass, "N2").unwrap();
        assert_relative_eq!(back.target_mass, 28.0, epsilon = 1e-9);
    }

    #[test]
    fn species_must_be_in_the_equation() {
        let eq = ReactionEquation::parse("N2 + 3H2 -> 2NH3").unwrap();
        assert!(mass_to_mass(&eq, "O2", 10.0, "NH3").is_err());
        assert!(mass_to_mass(&eq, "N2", -1.0, "NH3").is_err());
    }

    #[test]
    fn unbalanced_equation_is_refused() {
        let form = FormState::from_pairs(&[
            ("equation", "H2 + O2 -> H2O"),
            ("given", "H2"),
            ("given_mass", "2"),
            ("target", "H2O"),
        ]);
        let err = StoichiometryCalculator.calculate("mass_to_mass", &form).unwrap_err();
        assert!(err.to_string().contains("not balanced"));
    }

    #[test]
    fn limiting_reagent_and_yield() {
        let eq = ReactionEquation::parse("2H2 + O2 -> 2H2O").unwrap();
        let masses = parse_mass_list("H2=4, O2=16").unwrap();
        let found = limiting_reagent(&eq, &masses).unwrap();
        assert_eq!(found.limiting, "O2");
        assert_relative_eq!(found.theoretical_yields[0].mass, 18.015, epsilon = 0.01);
        assert_eq!(found.leftovers[0].formula, "H2");
        assert_relative_eq!(found.leftovers[0].mass, 4.0 - 2.016, epsilon = 0.01);
    }

    #[test]
    fn mass_list_parsing() {
        assert_eq!(
            parse_mass_list(" N2 = 28 ; H2=6,").unwrap(),
            vec![("N2".to_string(), 28.0), ("H2".to_string(), 6.0)]
        );
        assert!(parse_mass_list("N2 28").is_err());
        assert!(parse_mass_list("N2=lots").is_err());
        assert!(parse_mass_list("N2=-1").is_err());
        assert!(parse_mass_list("  ").is_err());
        let eq = ReactionEquation::parse("2H2 + O2 -> 2H2O").unwrap();
        assert!(limiting_reagent(&eq, &[("H2O".to_string(), 5.0)]).is_err());
    }

    #[test]
    fn unlisted_reactants_are_reported() {
        let form = FormState::from_pairs(&[("equation", "N2 + 3H2 -> 2NH3"), ("masses", "N2=28")]);
        let result = StoichiometryCalculator.calculate("limiting", &form).unwrap();
        assert_eq!(result.text("Limiting reagent"), Some("N2"));
        assert_eq!(result.interpretation[0], "Assumed in excess: H2");
    }

    #[test]
    fn repeated_reactant_is_refused() {
        let err = parse_mass_list("N2=28, N2=10").unwrap_err();
        assert_eq!(err.to_string(), "N2 is listed more than once");
        assert!(parse_mass_list("N₂=28; N2 = 10").is_err());
        let form = FormState::from_pairs(&[("equation", "N2 + 3H2 -> 2NH3"), ("masses", "N2=28, H2=6, N2=10")]);
        assert!(StoichiometryCalculator.calculate("limiting", &form).is_err());
    }
}
