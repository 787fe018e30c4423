//! Module to calculate the atomic composition and molar mass of a chemical formula
use crate::Utils::validation::CalcError;
use nalgebra::DMatrix;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// atomic composition: element symbol -> number of atoms
pub type Composition = BTreeMap<String, usize>;
/// special names for chemical groups, e.g. { "Me": {"C":1, "H":3} }
pub type Groups = HashMap<String, HashMap<String, usize>>;

// Define a struct to hold element data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub symbol: &'static str,
    pub number: u8,
    pub atomic_mass: f64,
}

impl Element {
    const fn new(symbol: &'static str, number: u8, atomic_mass: f64) -> Self {
        Self {
            symbol,
            number,
            atomic_mass,
        }
    }
}

// standard atomic weights, g/mol; mass number of the longest-lived isotope for elements without one
pub const ELEMENTS: &[Element] = &[
    Element::new("H", 1, 1.008),
    Element::new("He", 2, 4.0026),
    Element::new("Li", 3, 6.94),
    Element::new("Be", 4, 9.0122),
    Element::new("B", 5, 10.81),
    Element::new("C", 6, 12.011),
    Element::new("N", 7, 14.007),
    Element::new("O", 8, 15.999),
    Element::new("F", 9, 18.998),
    Element::new("Ne", 10, 20.18),
    Element::new("Na", 11, 22.99),
    Element::new("Mg", 12, 24.305),
    Element::new("Al", 13, 26.982),
    Element::new("Si", 14, 28.085),
    Element::new("P", 15, 30.974),
    Element::new("S", 16, 32.06),
    Element::new("Cl", 17, 35.45),
    Element::new("Ar", 18, 39.948),
    Element::new("K", 19, 39.098),
    Element::new("Ca", 20, 40.078),
    Element::new("Sc", 21, 44.956),
    Element::new("Ti", 22, 47.867),
    Element::new("V", 23, 50.942),
    Element::new("Cr", 24, 51.996),
    Element::new("Mn", 25, 54.938),
    Element::new("Fe", 26, 55.845),
    Element::new("Co", 27, 58.933),
    Element::new("Ni", 28, 58.693),
    Element::new("Cu", 29, 63.546),
    Element::new("Zn", 30, 65.38),
    Element::new("Ga", 31, 69.723),
    Element::new("Ge", 32, 72.63),
    Element::new("As", 33, 74.922),
    Element::new("Se", 34, 78.971),
    Element::new("Br", 35, 79.904),
    Element::new("Kr", 36, 83.798),
    Element::new("Rb", 37, 85.468),
    Element::new("Sr", 38, 87.62),
    Element::new("Y", 39, 88.906),
    Element::new("Zr", 40, 91.224),
    Element::new("Nb", 41, 92.906),
    Element::new("Mo", 42, 95.95),
    Element::new("Tc", 43, 98.0),
    Element::new("Ru", 44, 101.07),
    Element::new("Rh", 45, 102.91),
    Element::new("Pd", 46, 106.42),
    Element::new("Ag", 47, 107.87),
    Element::new("Cd", 48, 112.41),
    Element::new("In", 49, 114.82),
    Element::new("Sn", 50, 118.71),
    Element::new("Sb", 51, 121.76),
    Element::new("Te", 52, 127.6),
    Element::new("I", 53, 126.9),
    Element::new("Xe", 54, 131.29),
    Element::new("Cs", 55, 132.91),
    Element::new("Ba", 56, 137.33),
    Element::new("La", 57, 138.91),
    Element::new("Ce", 58, 140.12),
    Element::new("Pr", 59, 140.91),
    Element::new("Nd", 60, 144.24),
    Element::new("Pm", 61, 145.0),
    Element::new("Sm", 62, 150.36),
    Element::new("Eu", 63, 151.96),
    Element::new("Gd", 64, 157.25),
    Element::new("Tb", 65, 158.93),
    Element::new("Dy", 66, 162.5),
    Element::new("Ho", 67, 164.93),
    Element::new("Er", 68, 167.26),
    Element::new("Tm", 69, 168.93),
    Element::new("Yb", 70, 173.05),
    Element::new("Lu", 71, 174.97),
    Element::new("Hf", 72, 178.49),
    Element::new("Ta", 73, 180.95),
    Element::new("W", 74, 183.84),
    Element::new("Re", 75, 186.21),
    Element::new("Os", 76, 190.23),
    Element::new("Ir", 77, 192.22),
    Element::new("Pt", 78, 195.08),
    Element::new("Au", 79, 196.97),
    Element::new("Hg", 80, 200.59),
    Element::new("Tl", 81, 204.38),
    Element::new("Pb", 82, 207.2),
    Element::new("Bi", 83, 208.98),
    Element::new("Po", 84, 209.0),
    Element::new("At", 85, 210.0),
    Element::new("Rn", 86, 222.0),
    Element::new("Fr", 87, 223.0),
    Element::new("Ra", 88, 226.0),
    Element::new("Ac", 89, 227.0),
    Element::new("Th", 90, 232.04),
    Element::new("Pa", 91, 231.04),
    Element::new("U", 92, 238.03),
    Element::new("Np", 93, 237.0),
    Element::new("Pu", 94, 244.0),
    Element::new("Am", 95, 243.0),
    Element::new("Cm", 96, 247.0),
    Element::new("Bk", 97, 247.0),
    Element::new("Cf", 98, 251.0),
    Element::new("Es", 99, 252.0),
    Element::new("Fm", 100, 257.0),
    Element::new("Md", 101, 258.0),
    Element::new("No", 102, 259.0),
    Element::new("Lr", 103, 266.0),
    Element::new("Rf", 104, 267.0),
    Element::new("Db", 105, 268.0),
    Element::new("Sg", 106, 269.0),
    Element::new("Bh", 107, 270.0),
    Element::new("Hs", 108, 277.0),
    Element::new("Mt", 109, 278.0),
    Element::new("Ds", 110, 281.0),
    Element::new("Rg", 111, 282.0),
    Element::new("Cn", 112, 285.0),
    Element::new("Nh", 113, 286.0),
    Element::new("Fl", 114, 289.0),
    Element::new("Mc", 115, 290.0),
    Element::new("Lv", 116, 293.0),
    Element::new("Ts", 117, 294.0),
    Element::new("Og", 118, 294.0),
];

pub fn find_element(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

pub fn atomic_mass(symbol: &str) -> Option<f64> {
    find_element(symbol).map(|e| e.atomic_mass)
}

/// H₂O -> H2O, strips whitespace and the trailing phase mark: H2O(g) -> H2O
pub fn normalize_formula(formula: &str) -> String {
    let mut normalized: String = formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2080}'..='\u{2089}' => {
                char::from_digit(c as u32 - '\u{2080}' as u32, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect();
    let phases = ["(aq)", "(AQ)", "(g)", "(G)", "(l)", "(L)", "(s)", "(S)", "(c)", "(C)"];
    for phase in phases {
        if let Some(stripped) = normalized.strip_suffix(phase) {
            normalized = stripped.to_string();
            break;
        }
    }
    normalized
}

fn formula_error(formula: &str, reason: &str) -> CalcError {
    CalcError::Formula(format!("'{}': {}", formula, reason))
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn add_scaled(
    target: &mut Composition,
    part: &Composition,
    times: usize,
    source: &str,
) -> Result<(), CalcError> {
    for (element, count) in part {
        let entry = target.entry(element.clone()).or_insert(0);
        let current = *entry;
        *entry = count
            .checked_mul(times)
            .and_then(|added| current.checked_add(added))
            .ok_or_else(|| formula_error(source, "atom count is too large"))?;
    }
    Ok(())
}

/// Recursive descent over one hydrate part of a formula:
/// sequence := (symbol count? | '(' sequence ')' count?)+
struct FormulaParser<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
    groups: Option<&'a Groups>,
}

impl<'a> FormulaParser<'a> {
    fn new(part: &str, source: &'a str, groups: Option<&'a Groups>) -> Self {
        Self {
            chars: part.chars().collect(),
            pos: 0,
            source,
            groups,
        }
    }

    fn is_group(&self, name: &str) -> bool {
        self.groups.is_some_and(|g| g.contains_key(name))
    }

    fn parse_count(&mut self) -> Result<usize, CalcError> {
        let start = self.pos;
        while self.pos < self.chars.len() && self.chars[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(1);
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        match digits.parse::<usize>() {
            Ok(0) => Err(formula_error(self.source, "atom count must be positive")),
            Ok(n) => Ok(n),
            Err(_) => Err(formula_error(self.source, "atom count is too large")),
        }
    }

    /// uppercase letter with following lowercase letters; the longest known prefix wins
    fn parse_symbol(&mut self) -> Result<String, CalcError> {
        let start = self.pos;
        let mut end = start + 1;
        while end < self.chars.len() && self.chars[end].is_ascii_lowercase() {
            end += 1;
        }
        for len in (1..=end - start).rev() {
            let candidate: String = self.chars[start..start + len].iter().collect();
            if self.is_group(&candidate) || find_element(&candidate).is_some() {
                self.pos = start + len;
                return Ok(candidate);
            }
        }
        let candidate: String = self.chars[start..end].iter().collect();
        Err(formula_error(
            self.source,
            &format!("unknown element '{}'", candidate),
        ))
    }

    fn expand(&self, symbol: &str) -> Composition {
        match self.groups.and_then(|g| g.get(symbol)) {
            Some(group) => group.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            None => Composition::from([(symbol.to_string(), 1)]),
        }
    }

    fn parse_sequence(&mut self, closing: Option<char>) -> Result<Composition, CalcError> {
        let mut counts = Composition::new();
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                '(' | '[' | '{' => {
                    let close = closing_for(c);
                    self.pos += 1;
                    let inner = self.parse_sequence(Some(close))?;
                    if self.chars.get(self.pos) != Some(&close) {
                        return Err(formula_error(self.source, "unclosed bracket"));
                    }
                    self.pos += 1;
                    let times = self.parse_count()?;
                    add_scaled(&mut counts, &inner, times, self.source)?;
                }
                ')' | ']' | '}' => {
                    if closing == Some(c) {
                        break;
                    }
                    return Err(formula_error(self.source, "unexpected closing bracket"));
                }
                c if c.is_ascii_uppercase() => {
                    let symbol = self.parse_symbol()?;
                    let times = self.parse_count()?;
                    let unit = self.expand(&symbol);
                    add_scaled(&mut counts, &unit, times, self.source)?;
                }
                other => {
                    return Err(formula_error(
                        self.source,
                        &format!("unexpected character '{}'", other),
                    ));
                }
            }
        }
        if counts.is_empty() {
            return Err(formula_error(self.source, "nothing to parse"));
        }
        Ok(counts)
    }
}

/// Function to parse a chemical formula and return a map of elements and their counts.
/// Argument groups is optional. It is needed if the formula contains special names for chemical
/// groups like Me, Ph, etc. In that case it should contain the names of these groups and their
/// atomic composition { "Me":{"C":1, "H":3}}
pub fn parse_formula_with_groups(
    formula: &str,
    groups: Option<&Groups>,
) -> Result<Composition, CalcError> {
    let normalized = normalize_formula(formula);
    if normalized.is_empty() {
        return Err(CalcError::Formula("formula is empty".to_string()));
    }
    let mut counts = Composition::new();
    // hydrates and adducts: CuSO4·5H2O, CaSO4*2H2O
    for part in normalized.split(['\u{00B7}', '\u{2022}', '*']) {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        let multiplier = if digits.is_empty() {
            1
        } else {
            match digits.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(formula_error(formula, "invalid hydrate multiplier")),
            }
        };
        let body = &part[digits.len()..];
        let mut parser = FormulaParser::new(body, formula, groups);
        let part_counts = parser.parse_sequence(None)?;
        add_scaled(&mut counts, &part_counts, multiplier, formula)?;
    }
    Ok(counts)
}

pub fn parse_formula(formula: &str) -> Result<Composition, CalcError> {
    parse_formula_with_groups(formula, None)
}

pub fn molar_mass_of_composition(counts: &Composition) -> f64 {
    counts
        .iter()
        .filter_map(|(element, count)| atomic_mass(element).map(|m| m * *count as f64))
        .sum()
}

// Function to calculate the molar mass of a substance given its chemical formula
pub fn calculate_molar_mass(
    formula: &str,
    groups: Option<&Groups>,
) -> Result<(f64, Composition), CalcError> {
    let counts = parse_formula_with_groups(formula, groups)?;
    Ok((molar_mass_of_composition(&counts), counts))
}

/// contribution of one element to the molar mass
#[derive(Debug, Clone, PartialEq)]
pub struct ElementShare {
    pub symbol: String,
    pub count: usize,
    pub mass: f64,
    pub mass_percent: f64,
}

/// per-element masses and mass percents, ordered by element symbol
pub fn mass_breakdown(
    formula: &str,
    groups: Option<&Groups>,
) -> Result<(f64, Vec<ElementShare>), CalcError> {
    let (total, counts) = calculate_molar_mass(formula, groups)?;
    let shares = counts
        .iter()
        .map(|(symbol, &count)| {
            let mass = atomic_mass(symbol).unwrap_or(0.0) * count as f64;
            ElementShare {
                symbol: symbol.clone(),
                count,
                mass,
                mass_percent: 100.0 * mass / total,
            }
        })
        .collect();
    Ok((total, shares))
}

/// matrix substances x elements with the number of atoms, and the (sorted) element list
pub fn composition_matrix(compositions: &[Composition]) -> (DMatrix<f64>, Vec<String>) {
    let elements: BTreeSet<&String> = compositions.iter().flat_map(|c| c.keys()).collect();
    let elements: Vec<String> = elements.into_iter().cloned().collect();
    let mut matrix = DMatrix::zeros(compositions.len(), elements.len());
    for (i, composition) in compositions.iter().enumerate() {
        for (j, element) in elements.iter().enumerate() {
            if let Some(count) = composition.get(element) {
                matrix[(i, j)] = *count as f64;
            }
        }
    }
    (matrix, elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn comp(pairs: &[(&str, usize)]) -> Composition {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_parse_formula() {
        assert_eq!(
            parse_formula("C6H8O6").unwrap(),
            comp(&[("C", 6), ("H", 8), ("O", 6)])
        );
        assert_eq!(
            parse_formula("Na(NO3)2").unwrap(),
            comp(&[("Na", 1), ("N", 2), ("O", 6)])
        );
        assert_eq!(parse_formula("H2O").unwrap(), comp(&[("H", 2), ("O", 1)]));
        assert_eq!(
            parse_formula("C5H6OOH").unwrap(),
            comp(&[("C", 5), ("H", 7), ("O", 2)])
        );
        assert_eq!(parse_formula("CO").unwrap(), comp(&[("C", 1), ("O", 1)]));
        assert_eq!(parse_formula("Co").unwrap(), comp(&[("Co", 1)]));
    }

    #[test]
    fn nested_brackets_hydrates_and_subscripts() {
        assert_eq!(
            parse_formula("K4[Fe(CN)6]").unwrap(),
            comp(&[("K", 4), ("Fe", 1), ("C", 6), ("N", 6)])
        );
        assert_eq!(
            parse_formula("CuSO4·5H2O").unwrap(),
            comp(&[("Cu", 1), ("S", 1), ("O", 9), ("H", 10)])
        );
        assert_eq!(
            parse_formula("Fe₂O₃").unwrap(),
            comp(&[("Fe", 2), ("O", 3)])
        );
        assert_eq!(parse_formula("H2O(g)").unwrap(), comp(&[("H", 2), ("O", 1)]));
        assert_eq!(
            parse_formula("(NH4)2SO4").unwrap(),
            comp(&[("N", 2), ("H", 8), ("S", 1), ("O", 4)])
        );
    }

    #[test]
    fn malformed_formulae_are_rejected() {
        for bad in ["", "Xx2", "H2O)", "(H2O", "h2o", "H0", "Ca(OH"] {
            let err = parse_formula(bad).unwrap_err();
            assert!(matches!(err, CalcError::Formula(_)), "{} -> {:?}", bad, err);
        }
    }

    #[test]
    fn huge_atom_counts_are_rejected() {
        for bad in [
            "(H4294967296)4294967296",
            "H18446744073709551615H",
            "18446744073709551615H2O",
            "H99999999999999999999999",
        ] {
            let err = parse_formula(bad).unwrap_err();
            assert_eq!(
                err,
                CalcError::Formula(format!("'{}': atom count is too large", bad)),
            );
        }
    }

    #[test]
    fn test_calculate_molar_mass() {
        let (m, _) = calculate_molar_mass("H2O(g)", None).unwrap();
        assert_relative_eq!(m, 18.015, epsilon = 1e-2);
        let (m, _) = calculate_molar_mass("NaCl", None).unwrap();
        assert_relative_eq!(m, 58.44, epsilon = 1e-2);
        let (m, _) = calculate_molar_mass("C6H8O6", None).unwrap();
        assert_relative_eq!(m, 176.12, epsilon = 1e-2);
        let (m, _) = calculate_molar_mass("Ca(NO3)2", None).unwrap();
        assert_relative_eq!(m, 164.09, epsilon = 1e-2);
    }

    #[test]
    fn test_with_groups() {
        let groups: Groups = HashMap::from([(
            "Me".to_string(),
            HashMap::from([("C".to_string(), 1), ("H".to_string(), 3)]),
        )]);
        assert_eq!(
            parse_formula_with_groups("C6H5Me", Some(&groups)).unwrap(),
            comp(&[("H", 8), ("C", 7)])
        );
        assert_eq!(
            parse_formula_with_groups("C6H4(Me)2", Some(&groups)).unwrap(),
            comp(&[("H", 10), ("C", 8)])
        );
        assert!(parse_formula("C6H5Me").is_err());
    }

    #[test]
    fn breakdown_percentages_sum_to_100() {
        let (total, shares) = mass_breakdown("C6H12O6", None).unwrap();
        assert_relative_eq!(total, 180.156, epsilon = 1e-2);
        let sum: f64 = shares.iter().map(|s| s.mass_percent).sum();
        assert_relative_eq!(sum, 100.0, epsilon = 1e-9);
        let carbon = shares.iter().find(|s| s.symbol == "C").unwrap();
        assert_relative_eq!(carbon.mass_percent, 40.0, epsilon = 0.05);
    }

    #[test]
    fn test_element_matrix() {
        let compositions: Vec<Composition> = ["H2O", "NaCl", "C3H8", "CH4"]
            .iter()
            .map(|f| parse_formula(f).unwrap())
            .collect();
        let (matrix, elements) = composition_matrix(&compositions);
        assert_eq!(matrix.nrows(), 4);
        assert_eq!(matrix.ncols(), 5);
        assert_eq!(elements, vec!["C", "Cl", "H", "Na", "O"]);
        assert_eq!(matrix[(2, 0)], 3.0);
        assert_eq!(matrix[(3, 2)], 4.0);
    }
}
