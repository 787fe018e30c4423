/// worked scenarios printed as tables, reachable from the Examples menu
pub mod calculator_examples;
