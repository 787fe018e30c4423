use super::cli_calculator::calculator_menu;
use super::cli_examples::examples_menu;
use crate::Calculators::calculator_api::{Calculator, all_calculators};
use crate::settings::SettingsManager;
use std::io::{self, Write};

pub fn run_interactive_menu(manager: &mut SettingsManager) {
    let calculators = all_calculators();
    loop {
        show_main_menu();
        for (i, calc) in calculators.iter().enumerate() {
            println!("\x1b[33m{:>2}. {}\x1b[0m", i + 1, calc.name());
        }
        println!("\x1b[33m e. Worked examples\x1b[0m");
        println!("\x1b[33m s. Settings\x1b[0m");
        println!("\x1b[33m 0. Exit\x1b[0m");
        let choice = prompt("Enter your choice: ");

        match choice.trim() {
            "0" => {
                println!("Goodbye!");
                break;
            }
            "e" | "E" => examples_menu(manager.settings()),
            "s" | "S" => settings_menu(manager),
            other => match other.parse::<usize>() {
                Ok(n) if (1..=calculators.len()).contains(&n) => {
                    calculator_menu(calculators[n - 1].clone(), manager.settings())
                }
                _ => println!("Invalid choice. Please try again."),
            },
        }
    }
}
/* colors
Blue (\x1b[34m) - header
Yellow (\x1b[33m) - menu options
Cyan (\x1b[36m) - prompts
Red (\x1b[31m) - errors
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n ChemCalc: calculators for general and physical chemistry \n
    concentrations, kinetics, equilibria, electrochemistry, stoichiometry \n \x1b[0m"
    );
}

fn settings_menu(manager: &mut SettingsManager) {
    loop {
        let settings = manager.settings();
        println!("\n=== Settings ({}) ===", manager.config_file());
        println!("1. Precision: {}", settings.precision);
        println!(
            "2. Scientific notation below {} and above {}",
            settings.scientific_below, settings.scientific_above
        );
        println!("3. Show interpretation: {}", settings.show_interpretation);
        println!("4. Log level: {}", settings.log_level);
        println!("5. Save");
        println!("6. Reset to defaults");
        println!("0. Back to main menu");
        let choice = prompt("Enter your choice: ");
        match choice.trim() {
            "1" => match prompt("Decimals: ").trim().parse::<usize>() {
                Ok(precision) => manager.settings_mut().precision = precision,
                Err(_) => println!("\x1b[31mPrecision must be a whole number\x1b[0m"),
            },
            "2" => {
                let below = prompt("Scientific below: ").trim().parse::<f64>();
                let above = prompt("Scientific above: ").trim().parse::<f64>();
                match (below, above) {
                    (Ok(below), Ok(above)) if below < above => {
                        manager.settings_mut().scientific_below = below;
                        manager.settings_mut().scientific_above = above;
                    }
                    _ => println!("\x1b[31mTwo numbers are needed, the first one smaller\x1b[0m"),
                }
            }
            "3" => {
                let s = manager.settings_mut();
                s.show_interpretation = !s.show_interpretation;
            }
            "4" => {
                let level = prompt("Log level (error, warn, info, debug, trace): ");
                manager.settings_mut().log_level = level.trim().to_lowercase();
                println!("The new level applies after restart");
            }
            "5" => {
                if let Err(e) = manager.save() {
                    println!("\x1b[31mError: {}\x1b[0m", e);
                }
            }
            "6" => {
                if let Err(e) = manager.reset_to_defaults() {
                    println!("\x1b[31mError: {}\x1b[0m", e);
                }
            }
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

pub(crate) fn prompt(text: &str) -> String {
    print!("\x1b[36m{}\x1b[0m", text);
    io::stdout().flush().unwrap();
    get_user_input()
}

pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .expect("Failed to read input");
    input
}
