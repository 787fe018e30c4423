use std::collections::BTreeMap;

/// Editable state of one calculator form. Values are kept exactly as typed, parsing
/// happens only when the user asks for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: BTreeMap<String, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
    /// build a form from (field, raw text) pairs, e.g. an example preset
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut form = Self::new();
        for (key, value) in pairs {
            form.set(key, value);
        }
        form
    }

    pub fn set(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
    }

    /// raw text of a field; a field holding only whitespace counts as absent
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.fields.remove(field)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|value| value.trim().is_empty())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_absent() {
        let mut form = FormState::new();
        form.set("m1", "   ");
        form.set("v1", " 10 ");
        assert_eq!(form.get("m1"), None);
        assert_eq!(form.get("v1"), Some("10"));
        assert_eq!(form.get("m2"), None);
    }

    #[test]
    fn from_pairs_and_clear() {
        let mut form = FormState::from_pairs(&[("m1", "5.0"), ("v1", "10")]);
        assert!(!form.is_empty());
        assert_eq!(form.fields().count(), 2);
        form.clear();
        assert!(form.is_empty());
        assert_eq!(form.get("m1"), None);
    }
}
