use crate::Calculators::calculator_api::{Calculator, all_calculators, calculator_by_slug};
use crate::Calculators::lattice_energy::{COMPOUNDS, kapustinskii};
use crate::Calculators::stoichiometry::{limiting_reagent, mass_to_mass};
use crate::Calculators::titration::{TitrationKind, TitrationSetup};
use crate::Chemistry::reaction_equation::ReactionEquation;
use crate::Utils::form_state::FormState;
use crate::Utils::formatting::{format_number, print_result};
use crate::Utils::validation::CalcError;
use crate::settings::Settings;
use prettytable::{Table, row};

pub fn calculator_examples(task: usize, settings: &Settings) -> Result<(), CalcError> {
    match task {
        0 => {
            // 5 M stock, 10 mL, diluted to 1 M
            let calc = calculator_by_slug("dilution")?;
            let form = FormState::from_pairs(&[("m1", "5.0"), ("v1", "10"), ("m2", "1.0")]);
            print_result(&calc.calculate("v2", &form)?, settings);
        }
        1 => {
            // 25.0 mL of 0.100 M acetic acid against 0.100 M NaOH
            let setup = TitrationSetup::new(
                TitrationKind::WeakAcidStrongBase,
                0.100,
                25.0,
                0.100,
                Some(1.8e-5),
            )?;
            println!("Equivalence volume: {} mL", format_number(setup.equivalence_volume(), settings));
            println!("Suggested indicator: {}", setup.indicator());
            let mut table = Table::new();
            table.set_titles(row!["NaOH added, mL", "pH"]);
            for (volume, ph) in setup.curve(20)? {
                table.add_row(row![format_number(volume, settings), format_number(ph, settings)]);
            }
            table.printstd();
        }
        2 => {
            let mut table = Table::new();
            table.set_titles(row!["Compound", "Kapustinskii, kJ/mol", "Experimental, kJ/mol", "Deviation, %"]);
            for compound in COMPOUNDS {
                let estimate = kapustinskii(
                    compound.ions_per_formula,
                    compound.cation_charge,
                    compound.anion_charge,
                    compound.cation_radius,
                    compound.anion_radius,
                )?;
                let deviation = 100.0 * (estimate.lattice_energy - compound.experimental) / compound.experimental;
                table.add_row(row![
                    compound.formula,
                    format_number(estimate.lattice_energy, settings),
                    format_number(compound.experimental, settings),
                    format_number(deviation, settings)
                ]);
            }
            table.printstd();
        }
        3 => {
            let equation = ReactionEquation::parse("N2 + 3H2 -> 2NH3")?;
            let conversion = mass_to_mass(&equation, "N2", 28.0, "NH3")?;
            println!(
                "{}: 28 g N2 gives {} g NH3 ({} mol)",
                equation,
                format_number(conversion.target_mass, settings),
                format_number(conversion.target_moles, settings)
            );
            let masses = vec![("N2".to_string(), 28.0), ("H2".to_string(), 4.0)];
            let limiting = limiting_reagent(&equation, &masses)?;
            println!("With 4 g H2 the limiting reagent is {}", limiting.limiting);
            for product in &limiting.theoretical_yields {
                println!("  theoretical yield of {}: {} g", product.formula, format_number(product.mass, settings));
            }
            for leftover in &limiting.leftovers {
                println!("  {} left over: {} g", leftover.formula, format_number(leftover.mass, settings));
            }
        }
        4 => {
            // every preset of every calculator next to its stored reference value
            let mut table = Table::new();
            table.set_titles(row!["Calculator", "Example", "Quantity", "Computed", "Reference"]);
            for calc in all_calculators() {
                for example in calc.examples() {
                    let result = calc.calculate(example.mode, &example.to_form())?;
                    if let Some(reference) = example.reference {
                        let computed = result
                            .value(reference.label)
                            .map(|v| format_number(v, settings))
                            .unwrap_or_default();
                        table.add_row(row![
                            calc.name(),
                            example.name,
                            reference.label,
                            computed,
                            format!("{} {}", reference.value, reference.unit)
                        ]);
                    }
                }
            }
            table.printstd();
        }
        _ => println!("No example with number {}", task),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_worked_examples_run() {
        let settings = Settings::default();
        for task in 0..=5 {
            assert!(calculator_examples(task, &settings).is_ok(), "task {}", task);
        }
    }
}
