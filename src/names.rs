//! Translation between human-readable feature labels and model column names

use crate::features::FEATURES;

/// Label → field name table. Unmapped labels pass through unchanged.
#[derive(Clone, Debug)]
pub struct NameMap {
    pairs: Vec<(String, String)>,
}

impl Default for NameMap {
    /// The KOI mapping for all 34 known features.
    fn default() -> Self {
        Self {
            pairs: FEATURES
                .iter()
                .map(|f| (f.label.to_string(), f.field.to_string()))
                .collect(),
        }
    }
}

impl NameMap {
    pub fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Add or replace a mapping.
    pub fn insert(&mut self, label: impl Into<String>, field: impl Into<String>) {
        let label = label.into();
        let field = field.into();
        match self.pairs.iter_mut().find(|(l, _)| *l == label) {
            Some(pair) => pair.1 = field,
            None => self.pairs.push((label, field)),
        }
    }

    /// Field name for `label`, falling back to the label itself.
    pub fn field_for<'a>(&'a self, label: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, f)| f.as_str())
            .unwrap_or(label)
    }

    /// Inverse lookup; `None` when no label maps to `field`.
    pub fn label_for(&self, field: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, f)| f == field)
            .map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_label_translates() {
        let map = NameMap::default();
        assert_eq!(map.field_for("Orbital Period (days)"), "koi_period");
        assert_eq!(map.field_for("Log(1 + Transit SNR)"), "log_snr");
    }

    #[test]
    fn test_unknown_label_passes_through() {
        let map = NameMap::default();
        assert_eq!(map.field_for("koi_score"), "koi_score");
    }

    #[test]
    fn test_inverse_recovers_every_label() {
        let map = NameMap::default();
        assert_eq!(map.len(), 34);
        for f in FEATURES.iter() {
            let field = map.field_for(f.label);
            assert_eq!(map.label_for(field), Some(f.label));
        }
        assert_eq!(map.label_for("koi_score"), None);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut map = NameMap::empty();
        map.insert("Radius", "r1");
        map.insert("Radius", "r2");
        assert_eq!(map.len(), 1);
        assert_eq!(map.field_for("Radius"), "r2");
    }
}
