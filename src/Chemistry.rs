/// eng
/// Module to calculate the atomic composition and molar mass of a chemical formula.
/// Formulae may contain brackets of any depth ( (), [], {} ), hydrate parts separated by
/// a dot (CuSO4·5H2O), Unicode subscripts (H₂O), phase marks ((g), (aq)) and user-defined
/// groups of atoms, e.g. Me (methyl) which is converted into {"C":1, "H":3}
pub mod molmass;
/// Parser of reaction equations like "N2 + 3H2 -> 2NH3" into species with coefficients
/// and atomic compositions, plus element balance checks.
pub mod reaction_equation;
/// Balancing of reaction equations: the smallest positive integer coefficients are taken from
/// the null space of the element composition matrix (nalgebra).
pub mod balance;
