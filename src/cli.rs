/// main menu: calculator list, examples, settings
pub mod cli_main;
/// form loop of one calculator
pub mod cli_calculator;
pub mod cli_examples;
