/// eng
/// Shared contract of all calculators: the `Calculator` trait, field and mode descriptions,
/// example presets, the result record, and `CalculatorEnum` which dispatches to every
/// calculator of the crate. Look here first if you want to add a new calculator.
pub mod calculator_api;
/// Threshold tables turning numbers into qualitative commentary ("products favored").
pub mod interpretation;
/// State of one open calculator form: selected mode, typed fields, last result or error.
pub mod session;

pub mod arrhenius;
/// weighted average of isotope masses
pub mod atomic_mass;
/// M1·V1 = M2·V2
pub mod dilution;
pub mod equation_balancer;
pub mod equilibrium_constant;
pub mod gibbs_free_energy;
pub mod half_life;
pub mod henderson_hasselbalch;
/// PV = nRT solved for any of its variables
pub mod ideal_gas;
/// Kapustinskii, Born-Landé and Born-Haber estimates of lattice energy
pub mod lattice_energy;
pub mod molar_mass;
pub mod nernst;
pub mod percent_yield;
pub mod ph;
/// average rate, instantaneous rate and concentration after time t
pub mod reaction_rate;
/// mass-to-mass conversion and limiting reagent / theoretical yield from a reaction equation
pub mod stoichiometry;
/// acid-base titration: initial pH, equivalence volume, pH at half-equivalence and equivalence
pub mod titration;
#[cfg(test)]
mod titration_tests;
