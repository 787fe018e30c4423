use crate::Chemistry::molmass::{Composition, composition_matrix};
use crate::Utils::validation::CalcError;
use log::debug;
use nalgebra::DMatrix;

const MAX_MULTIPLIER: u64 = 1000;

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Smallest positive integer coefficients for species given as compositions, reactants first.
///
/// The element matrix A (elements x species, product columns negated) satisfies A·x = 0 for a
/// balanced equation, so x is the eigenvector of AᵀA with zero eigenvalue. The null space must
/// be one-dimensional and the vector must have one sign; then it is scaled to integers.
pub fn balance_coefficients(
    compositions: &[Composition],
    n_reactants: usize,
) -> Result<Vec<u64>, CalcError> {
    if n_reactants == 0 || n_reactants >= compositions.len() {
        return Err(CalcError::domain(
            "At least one reactant and one product are required",
        ));
    }
    let (species_by_element, elements) = composition_matrix(compositions);
    let mut a: DMatrix<f64> = species_by_element.transpose();
    for j in n_reactants..compositions.len() {
        let mut column = a.column_mut(j);
        column *= -1.0;
    }
    debug!("balancing over elements {:?}", elements);

    let ata = a.transpose() * &a;
    let eigen = ata.symmetric_eigen();
    let largest = eigen.eigenvalues.iter().cloned().fold(0.0_f64, f64::max);
    let tolerance = 1e-9 * largest.max(1.0);
    let null_directions: Vec<usize> = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .filter(|(_, value)| value.abs() <= tolerance)
        .map(|(i, _)| i)
        .collect();
    match null_directions.len() {
        0 => {
            return Err(CalcError::impossible(
                "The equation cannot be balanced: check the formulas",
            ));
        }
        1 => {}
        _ => {
            return Err(CalcError::impossible(
                "The equation has several independent balances; split it into separate reactions",
            ));
        }
    }
    let vector = eigen.eigenvectors.column(null_directions[0]).into_owned();

    let smallest = vector
        .iter()
        .map(|v| v.abs())
        .fold(f64::INFINITY, f64::min);
    if smallest < 1e-9 {
        return Err(CalcError::impossible(
            "The equation cannot be balanced: a species would need a zero coefficient",
        ));
    }
    let sign = vector[0].signum();
    if vector.iter().any(|v| v.signum() != sign) {
        return Err(CalcError::impossible(
            "The equation cannot be balanced with positive coefficients",
        ));
    }
    let ratios: Vec<f64> = vector.iter().map(|v| v.abs() / smallest).collect();

    for multiplier in 1..=MAX_MULTIPLIER {
        let scaled: Vec<f64> = ratios.iter().map(|r| r * multiplier as f64).collect();
        if scaled.iter().all(|s| (s - s.round()).abs() < 1e-6 * s.max(1.0)) {
            let integers: Vec<u64> = scaled.iter().map(|s| s.round() as u64).collect();
            let divisor = integers.iter().cloned().fold(0, gcd);
            return Ok(integers.iter().map(|c| c / divisor.max(1)).collect());
        }
    }
    Err(CalcError::impossible(
        "No integer coefficients found for this equation",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Chemistry::molmass::parse_formula;

    fn balance(reactants: &[&str], products: &[&str]) -> Result<Vec<u64>, CalcError> {
        let compositions: Vec<Composition> = reactants
            .iter()
            .chain(products.iter())
            .map(|f| parse_formula(f).unwrap())
            .collect();
        balance_coefficients(&compositions, reactants.len())
    }

    #[test]
    fn textbook_equations() {
        assert_eq!(balance(&["CH4", "O2"], &["CO2", "H2O"]).unwrap(), vec![1, 2, 1, 2]);
        assert_eq!(balance(&["H2", "O2"], &["H2O"]).unwrap(), vec![2, 1, 2]);
        assert_eq!(balance(&["N2", "H2"], &["NH3"]).unwrap(), vec![1, 3, 2]);
        assert_eq!(
            balance(&["C3H8", "O2"], &["CO2", "H2O"]).unwrap(),
            vec![1, 5, 3, 4]
        );
        assert_eq!(balance(&["Fe", "O2"], &["Fe2O3"]).unwrap(), vec![4, 3, 2]);
        assert_eq!(
            balance(&["KMnO4", "HCl"], &["KCl", "MnCl2", "H2O", "Cl2"]).unwrap(),
            vec![2, 16, 2, 2, 8, 5]
        );
    }

    #[test]
    fn impossible_equations() {
        assert!(balance(&["H2"], &["O2"]).is_err());
        assert!(balance(&["NaCl"], &["KBr"]).is_err());
        assert!(balance(&["H2", "O2"], &[]).is_err());
    }
}
