use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Chemistry::molmass::{ELEMENTS, Element};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, ensure, parse_number};
use log::{debug, info};
use std::str::FromStr;

pub const MAX_ISOTOPES: usize = 6;
const ABUNDANCE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicMassMode {
    WeightedAverage,
}

impl FromStr for AtomicMassMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted_average" => Ok(AtomicMassMode::WeightedAverage),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isotope {
    /// u
    pub mass: f64,
    /// %
    pub abundance: f64,
}

/// Σ mass·abundance/100 over at least two isotopes whose abundances add up to 100 %
pub fn average_atomic_mass(isotopes: &[Isotope]) -> Result<f64, CalcError> {
    ensure(isotopes.len() >= 2, "Please enter at least 2 valid isotopes")?;
    let total: f64 = isotopes.iter().map(|i| i.abundance).sum();
    ensure(
        (total - 100.0).abs() <= ABUNDANCE_TOLERANCE,
        format!("Abundances must sum to 100%. Current sum: {:.2}%", total),
    )?;
    Ok(isotopes.iter().map(|i| i.mass * i.abundance / 100.0).sum())
}

/// Isotope slots of the form. Slots with a missing or unreadable field, a non-positive
/// mass or a negative abundance are not counted.
pub fn isotopes_from_form(form: &FormState) -> Vec<Isotope> {
    (1..=MAX_ISOTOPES)
        .filter_map(|i| {
            let mass = form.get(&format!("mass_{}", i)).and_then(parse_number)?;
            let abundance = form.get(&format!("abundance_{}", i)).and_then(parse_number)?;
            (mass > 0.0 && abundance >= 0.0).then_some(Isotope { mass, abundance })
        })
        .collect()
}

/// element whose standard atomic weight is nearest, if within 0.5 u
pub fn closest_element(mass: f64) -> Option<&'static Element> {
    ELEMENTS
        .iter()
        .min_by(|a, b| {
            (a.atomic_mass - mass)
                .abs()
                .total_cmp(&(b.atomic_mass - mass).abs())
        })
        .filter(|e| (e.atomic_mass - mass).abs() < 0.5)
}

#[derive(Debug, Clone, Default)]
pub struct AtomicMassCalculator;

const NAME: &str = "Atomic Mass Calculator";

const MODES: &[ModeSpec] = &[ModeSpec {
    key: "weighted_average",
    label: "Average atomic mass from isotopes",
    formula: "A = Σ mass_i · abundance_i / 100",
    fields: &[
        FieldSpec::optional("mass_1", "Isotope 1 mass", "u"),
        FieldSpec::optional("abundance_1", "Isotope 1 abundance", "%"),
        FieldSpec::optional("mass_2", "Isotope 2 mass", "u"),
        FieldSpec::optional("abundance_2", "Isotope 2 abundance", "%"),
        FieldSpec::optional("mass_3", "Isotope 3 mass", "u"),
        FieldSpec::optional("abundance_3", "Isotope 3 abundance", "%"),
        FieldSpec::optional("mass_4", "Isotope 4 mass", "u"),
        FieldSpec::optional("abundance_4", "Isotope 4 abundance", "%"),
        FieldSpec::optional("mass_5", "Isotope 5 mass", "u"),
        FieldSpec::optional("abundance_5", "Isotope 5 abundance", "%"),
        FieldSpec::optional("mass_6", "Isotope 6 mass", "u"),
        FieldSpec::optional("abundance_6", "Isotope 6 abundance", "%"),
    ],
}];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Chlorine",
        mode: "weighted_average",
        inputs: &[
            ("mass_1", "34.969"),
            ("abundance_1", "75.78"),
            ("mass_2", "36.966"),
            ("abundance_2", "24.22"),
        ],
        reference: Some(Reference {
            label: "Average atomic mass",
            value: 35.45,
            unit: "u",
        }),
        description: "Cl-35 and Cl-37",
    },
    ExamplePreset {
        name: "Copper",
        mode: "weighted_average",
        inputs: &[
            ("mass_1", "62.9296"),
            ("abundance_1", "69.15"),
            ("mass_2", "64.9278"),
            ("abundance_2", "30.85"),
        ],
        reference: Some(Reference {
            label: "Average atomic mass",
            value: 63.546,
            unit: "u",
        }),
        description: "Cu-63 and Cu-65",
    },
    ExamplePreset {
        name: "Magnesium",
        mode: "weighted_average",
        inputs: &[
            ("mass_1", "23.985"),
            ("abundance_1", "78.99"),
            ("mass_2", "24.986"),
            ("abundance_2", "10.00"),
            ("mass_3", "25.983"),
            ("abundance_3", "11.01"),
        ],
        reference: Some(Reference {
            label: "Average atomic mass",
            value: 24.305,
            unit: "u",
        }),
        description: "Three stable isotopes",
    },
];

impl Calculator for AtomicMassCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "atomic_mass"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let _: AtomicMassMode = parse_mode(NAME, mode)?;
        let isotopes = isotopes_from_form(form);
        debug!("isotopes {:?}", isotopes);
        let average = average_atomic_mass(&isotopes)?;
        info!("average atomic mass {:.4} u", average);
        let mut result = CalcResult::new(NAME, mode)
            .with_value("Average atomic mass", average, "u")
            .with_value("Isotopes counted", isotopes.len() as f64, "");
        if let Some(element) = closest_element(average) {
            result = result.with_interpretation(format!(
                "Closest element: {} (Z = {}, standard atomic weight {})",
                element.symbol, element.number, element.atomic_mass
            ));
        }
        Ok(result)
    }
}
