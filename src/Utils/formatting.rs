//! Turning results into text: numbers with the configured precision and prettytable
//! tables for results, example datasets and calculation modes.
use crate::Calculators::calculator_api::{CalcResult, ExamplePreset, ModeSpec};
use crate::settings::Settings;
use prettytable::{Table, row};

/// Fixed notation inside the configured magnitude window, scientific notation outside.
/// Zero is always fixed.
pub fn format_number(value: f64, settings: &Settings) -> String {
    let precision = settings.precision;
    let magnitude = value.abs();
    if value == 0.0 {
        format!("{:.*}", precision, 0.0)
    } else if magnitude < settings.scientific_below || magnitude >= settings.scientific_above {
        format!("{:.*e}", precision, value)
    } else {
        format!("{:.*}", precision, value)
    }
}

pub fn result_table(result: &CalcResult, settings: &Settings) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Quantity", "Value", "Unit"]);
    for value in &result.values {
        table.add_row(row![
            value.label,
            format_number(value.value, settings),
            value.unit
        ]);
    }
    for text in &result.texts {
        table.add_row(row![text.label, text.text, ""]);
    }
    table
}

/// table followed by the interpretation lines (when enabled in settings)
pub fn render_result(result: &CalcResult, settings: &Settings) -> String {
    let mut out = format!("{} ({})\n", result.calculator, result.mode);
    out.push_str(&result_table(result, settings).to_string());
    if settings.show_interpretation {
        for line in &result.interpretation {
            out.push_str("  * ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

pub fn print_result(result: &CalcResult, settings: &Settings) {
    print!("{}", render_result(result, settings));
}

pub fn examples_table(examples: &[ExamplePreset]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["#", "Example", "Mode", "Inputs", "Reference"]);
    for (i, example) in examples.iter().enumerate() {
        let inputs = example
            .inputs
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        let reference = example
            .reference
            .map(|r| format!("{} = {} {}", r.label, r.value, r.unit))
            .unwrap_or_default();
        table.add_row(row![i + 1, example.name, example.mode, inputs, reference]);
    }
    table
}

pub fn modes_table(modes: &[ModeSpec]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["#", "Mode", "Formula"]);
    for (i, mode) in modes.iter().enumerate() {
        table.add_row(row![i + 1, mode.label, mode.formula]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_switch_notation_outside_window() {
        let settings = Settings::default();
        assert_eq!(format_number(50.0, &settings), "50.000");
        assert_eq!(format_number(0.0, &settings), "0.000");
        assert_eq!(format_number(1.8e-5, &settings), "1.800e-5");
        assert_eq!(format_number(6.022e23, &settings), "6.022e23");
        assert_eq!(format_number(-411.0, &settings), "-411.000");
        let precise = Settings {
            precision: 1,
            ..Settings::default()
        };
        assert_eq!(format_number(2.8722, &precise), "2.9");
    }

    #[test]
    fn rendered_result_contains_values_texts_and_notes() {
        let result = CalcResult::new("Dilution Calculator", "v2")
            .with_value("V2", 50.0, "mL")
            .with_text("Limiting reagent", "N2")
            .with_interpretation("Dilution factor 5");
        let text = render_result(&result, &Settings::default());
        assert!(text.contains("Dilution Calculator (v2)"));
        assert!(text.contains("50.000"));
        assert!(text.contains("mL"));
        assert!(text.contains("N2"));
        assert!(text.contains("Dilution factor 5"));

        let quiet = Settings {
            show_interpretation: false,
            ..Settings::default()
        };
        assert!(!render_result(&result, &quiet).contains("Dilution factor 5"));
    }

    #[test]
    fn examples_table_has_a_row_per_preset() {
        const EXAMPLES: &[ExamplePreset] = &[ExamplePreset {
            name: "Stock to working solution",
            mode: "v2",
            inputs: &[("m1", "5.0"), ("v1", "10")],
            reference: None,
            description: "",
        }];
        let table = examples_table(EXAMPLES);
        assert_eq!(table.len(), 1);
        assert!(table.to_string().contains("m1=5.0, v1=10"));
    }
}
