//! Qualitative labels for numeric results. The labels are heuristic copy, kept as ordered
//! lookup tables: the first band whose comparison holds wins, otherwise the default.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Gt,
    Ge,
    Lt,
    Le,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub cmp: Cmp,
    pub bound: f64,
    pub label: &'static str,
}

impl Band {
    pub const fn gt(bound: f64, label: &'static str) -> Self {
        Self {
            cmp: Cmp::Gt,
            bound,
            label,
        }
    }
    pub const fn ge(bound: f64, label: &'static str) -> Self {
        Self {
            cmp: Cmp::Ge,
            bound,
            label,
        }
    }
    pub const fn lt(bound: f64, label: &'static str) -> Self {
        Self {
            cmp: Cmp::Lt,
            bound,
            label,
        }
    }
    pub const fn le(bound: f64, label: &'static str) -> Self {
        Self {
            cmp: Cmp::Le,
            bound,
            label,
        }
    }

    fn holds(&self, value: f64) -> bool {
        match self.cmp {
            Cmp::Gt => value > self.bound,
            Cmp::Ge => value >= self.bound,
            Cmp::Lt => value < self.bound,
            Cmp::Le => value <= self.bound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    pub bands: &'static [Band],
    pub default: &'static str,
}

impl ThresholdTable {
    pub const fn new(bands: &'static [Band], default: &'static str) -> Self {
        Self { bands, default }
    }

    pub fn classify(&self, value: f64) -> &'static str {
        self.bands
            .iter()
            .find(|band| band.holds(value))
            .map(|band| band.label)
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: ThresholdTable = ThresholdTable::new(
        &[
            Band::gt(1000.0, "strong"),
            Band::gt(10.0, "favors"),
            Band::ge(0.1, "both"),
        ],
        "reverse",
    );

    #[test]
    fn first_matching_band_wins() {
        assert_eq!(TABLE.classify(5000.0), "strong");
        assert_eq!(TABLE.classify(1000.0), "favors");
        assert_eq!(TABLE.classify(0.1), "both");
        assert_eq!(TABLE.classify(0.05), "reverse");
    }

    #[test]
    fn descending_tables_with_lower_bounds() {
        const BELOW: ThresholdTable =
            ThresholdTable::new(&[Band::lt(-3000.0, "very"), Band::le(-1000.0, "some")], "low");
        assert_eq!(BELOW.classify(-3500.0), "very");
        assert_eq!(BELOW.classify(-1000.0), "some");
        assert_eq!(BELOW.classify(-10.0), "low");
    }
}
