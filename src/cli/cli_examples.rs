use super::cli_main::prompt;
use crate::Examples::calculator_examples::calculator_examples;
use crate::settings::Settings;

pub fn examples_menu(settings: &Settings) {
    loop {
        println!("\n=== Examples ===");
        println!("1. Dilution of a 5 M stock solution");
        println!("2. Titration curve of acetic acid with NaOH");
        println!("3. Kapustinskii lattice energies against experiment");
        println!("4. Ammonia synthesis: mass conversion and limiting reagent");
        println!("5. All example presets against their reference values");
        println!("0. Back to main menu");
        let choice = prompt("Enter your choice: ");
        let task = match choice.trim().parse::<usize>() {
            Ok(0) => break,
            Ok(n) if n <= 5 => n - 1,
            _ => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };
        if let Err(e) = calculator_examples(task, settings) {
            println!("\x1b[31mError: {}\x1b[0m", e);
        }
    }
}
