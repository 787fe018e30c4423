use crate::Calculators::calculator_api::{
    CalcResult, Calculator, ExamplePreset, FieldSpec, ModeSpec, Reference, parse_mode,
};
use crate::Chemistry::molmass::{Groups, mass_breakdown, parse_formula};
use crate::Utils::form_state::FormState;
use crate::Utils::validation::{CalcError, Validator, ensure};
use log::info;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MolarMassMode {
    Formula,
}

impl FromStr for MolarMassMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "formula" => Ok(MolarMassMode::Formula),
            _ => Err(s.to_string()),
        }
    }
}

/// "Me=CH3, Ph=C6H5" -> groups usable inside formulas
pub fn parse_groups(text: &str) -> Result<Groups, CalcError> {
    let mut groups = Groups::new();
    for item in text.split([',', ';']).map(str::trim).filter(|s| !s.is_empty()) {
        let (name, formula) = item
            .split_once('=')
            .ok_or_else(|| CalcError::Formula(format!("group '{}' must look like Name=Formula", item)))?;
        let name = name.trim();
        ensure(
            name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
                && name.chars().all(|c| c.is_ascii_alphabetic()),
            format!("Group name '{}' must start with a capital letter", name),
        )?;
        let composition: HashMap<String, usize> = parse_formula(formula)?.into_iter().collect();
        groups.insert(name.to_string(), composition);
    }
    Ok(groups)
}

#[derive(Debug, Clone, Default)]
pub struct MolarMassCalculator;

const NAME: &str = "Molar Mass Calculator";

const MODES: &[ModeSpec] = &[ModeSpec {
    key: "formula",
    label: "Molar mass of a formula",
    formula: "M = Σ n_i · A_i",
    fields: &[
        FieldSpec::required("formula", "Chemical formula", ""),
        FieldSpec::optional("groups", "Groups (Name=Formula, ...)", ""),
        FieldSpec::optional("mass", "Sample mass", "g"),
    ],
}];

const EXAMPLES: &[ExamplePreset] = &[
    ExamplePreset {
        name: "Glucose",
        mode: "formula",
        inputs: &[("formula", "C6H12O6")],
        reference: Some(Reference {
            label: "Molar mass",
            value: 180.156,
            unit: "g/mol",
        }),
        description: "Simple molecular formula",
    },
    ExamplePreset {
        name: "Copper(II) sulfate pentahydrate",
        mode: "formula",
        inputs: &[("formula", "CuSO4·5H2O"), ("mass", "25")],
        reference: Some(Reference {
            label: "Molar mass",
            value: 249.69,
            unit: "g/mol",
        }),
        description: "Hydrate with a dot",
    },
    ExamplePreset {
        name: "Calcium nitrate",
        mode: "formula",
        inputs: &[("formula", "Ca(NO3)2")],
        reference: Some(Reference {
            label: "Molar mass",
            value: 164.088,
            unit: "g/mol",
        }),
        description: "Brackets",
    },
    ExamplePreset {
        name: "Toluene with a methyl group",
        mode: "formula",
        inputs: &[("formula", "C6H5Me"), ("groups", "Me=CH3")],
        reference: Some(Reference {
            label: "Molar mass",
            value: 92.141,
            unit: "g/mol",
        }),
        description: "User-defined group",
    },
];

impl Calculator for MolarMassCalculator {
    fn name(&self) -> &'static str {
        NAME
    }
    fn slug(&self) -> &'static str {
        "molar_mass"
    }
    fn modes(&self) -> &'static [ModeSpec] {
        MODES
    }
    fn examples(&self) -> &'static [ExamplePreset] {
        EXAMPLES
    }

    fn evaluate(&self, mode: &str, form: &FormState) -> Result<CalcResult, CalcError> {
        let _: MolarMassMode = parse_mode(NAME, mode)?;
        let v = Validator::new(form);
        let formula = v.text("formula", "Formula")?;
        let groups = v.optional_text("groups").map(parse_groups).transpose()?;
        let sample = v.optional_number("mass", "Sample mass")?;
        if let Some(mass) = sample {
            ensure(mass >= 0.0, "Sample mass must be non-negative")?;
        }
        let (total, shares) = mass_breakdown(formula, groups.as_ref())?;
        info!("molar mass of {} = {:.4} g/mol", formula, total);
        let mut result = CalcResult::new(NAME, mode).with_value("Molar mass", total, "g/mol");
        for share in &shares {
            result.push_value(&format!("{} ({} atoms)", share.symbol, share.count), share.mass, "g/mol");
        }
        for share in &shares {
            result.push_value(&format!("{} mass percent", share.symbol), share.mass_percent, "%");
        }
        if let Some(mass) = sample {
            result.push_value("Amount in sample", mass / total, "mol");
        }
        let heaviest = shares
            .iter()
            .max_by(|a, b| a.mass_percent.total_cmp(&b.mass_percent));
        if let Some(share) = heaviest {
            result = result.with_interpretation(format!(
                "{} contributes most of the mass ({:.1} %)",
                share.symbol, share.mass_percent
            ));
        }
        Ok(result)
    }
}
