/// Raw text of the input form: field name -> whatever the user typed.
pub mod form_state;
/// Number and table formatting for calculation results (prettytable based).
pub mod formatting;
/// Logger set up with simplelog: terminal and optional log file.
pub mod logger;
/// eng
/// Error type shared by all calculators and the `Validator` that turns raw form text
/// into checked `f64` values. Every rule here reports exactly one human readable message:
/// 1) parse errors - empty required field, text that is not a finite number
/// 2) domain errors - negative volume, reversed time order, zero denominator
/// 3) derived impossibilities - result that cannot exist physically (negative concentration)
pub mod validation;
