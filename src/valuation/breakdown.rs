use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Insertion-ordered label -> amount mapping.
///
/// Serializes as a map so the JSON output reads `{"year_0_1": .., "year_2": ..}`
/// while keeping the chronological order that a sorted map would lose once
/// labels reach `year_10`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown {
    entries: Vec<(String, f64)>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line, replacing the amount in place if the label already exists.
    pub fn insert(&mut self, label: impl Into<String>, amount: f64) {
        let label = label.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = amount,
            None => self.entries.push((label, amount)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, amount)| *amount)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(label, amount)| (label.as_str(), *amount))
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn map_amounts(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(label, amount)| (label.clone(), f(*amount)))
                .collect(),
        }
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, amount) in &self.entries {
            map.serialize_entry(label, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Breakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = Breakdown;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of labels to amounts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Breakdown, A::Error> {
                let mut breakdown = Breakdown::new();
                while let Some((label, amount)) = access.next_entry::<String, f64>()? {
                    breakdown.insert(label, amount);
                }
                Ok(breakdown)
            }
        }

        deserializer.deserialize_map(BreakdownVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_insertion_order() {
        let mut breakdown = Breakdown::new();
        breakdown.insert("year_0_1", 1.0);
        breakdown.insert("year_2", 2.0);
        breakdown.insert("year_10", 3.0);

        let json = serde_json::to_string(&breakdown).expect("breakdown serializes");
        assert_eq!(json, r#"{"year_0_1":1.0,"year_2":2.0,"year_10":3.0}"#);

        let parsed: Breakdown = serde_json::from_str(&json).expect("breakdown parses");
        assert_eq!(
            parsed.labels().collect::<Vec<_>>(),
            vec!["year_0_1", "year_2", "year_10"]
        );
    }

    #[test]
    fn insert_replaces_existing_label() {
        let mut breakdown = Breakdown::new();
        breakdown.insert("ac", 5.0);
        breakdown.insert("ac", 0.0);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown.get("ac"), Some(0.0));
    }
}
