use super::cli_main::prompt;
use crate::Calculators::calculator_api::{Calculator, CalculatorEnum};
use crate::Calculators::session::CalculatorSession;
use crate::Utils::formatting::{examples_table, modes_table, print_result};
use crate::settings::Settings;

pub fn calculator_menu(calculator: CalculatorEnum, settings: &Settings) {
    let mut session = CalculatorSession::new(calculator);
    loop {
        show_form(&session);
        println!("1. Choose mode");
        println!("2. Edit fields");
        println!("3. Calculate");
        println!("4. Reset");
        println!("5. Show examples");
        println!("6. Load example");
        println!("0. Back to main menu");
        let choice = prompt("Enter your choice: ");
        match choice.trim() {
            "1" => choose_mode(&mut session),
            "2" => edit_fields(&mut session),
            "3" => match session.calculate() {
                Ok(result) => print_result(result, settings),
                Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
            },
            "4" => session.reset(),
            "5" => examples_table(session.calculator.examples()).printstd(),
            "6" => {
                examples_table(session.calculator.examples()).printstd();
                match prompt("Example number: ").trim().parse::<usize>() {
                    Ok(n) if n >= 1 => match session.load_example(n - 1) {
                        Ok(example) => println!("Loaded '{}': {}", example.name, example.description),
                        Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
                    },
                    _ => println!("Invalid example number"),
                }
            }
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn show_form(session: &CalculatorSession) {
    println!("\n=== {} ===", session.calculator.name());
    let Some(mode) = session.mode_spec() else {
        return;
    };
    println!("Mode: {}   {}", mode.label, mode.formula);
    for field in mode.fields {
        let value = session.form.get(field.key).unwrap_or("");
        let marker = if field.required { "*" } else { " " };
        println!("  {}{} [{}]: {}", marker, field.label, field.unit, value);
    }
}

fn choose_mode(session: &mut CalculatorSession) {
    let modes = session.calculator.modes();
    modes_table(modes).printstd();
    match prompt("Mode number: ").trim().parse::<usize>() {
        Ok(n) if (1..=modes.len()).contains(&n) => {
            if let Err(e) = session.select_mode(modes[n - 1].key) {
                println!("\x1b[31mError: {}\x1b[0m", e);
            }
        }
        _ => println!("Invalid mode number"),
    }
}

/// asks for every field of the current mode; an empty answer keeps the current value
fn edit_fields(session: &mut CalculatorSession) {
    let Some(mode) = session.mode_spec() else {
        return;
    };
    for field in mode.fields {
        let current = session.form.get(field.key).unwrap_or("").to_string();
        let answer = prompt(&format!("{} [{}] ({}): ", field.label, field.unit, current));
        let answer = answer.trim();
        if !answer.is_empty() {
            session.set_field(field.key, answer);
        }
    }
}
