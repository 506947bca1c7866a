use serde::{Deserialize, Serialize};

/// Warnings and recommendations produced by one valuation step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn recommend(&mut self, message: impl Into<String>) {
        self.recommendations.push(message.into());
    }

    /// Appends another step's findings after this one's, preserving order.
    pub fn absorb(&mut self, other: Findings) {
        self.warnings.extend(other.warnings);
        self.recommendations.extend(other.recommendations);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.recommendations.is_empty()
    }
}

/// Formats whole numbers with comma grouping, e.g. `75,000`.
pub fn grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_keeps_step_order() {
        let mut first = Findings::new();
        first.warn("usage");
        let mut second = Findings::new();
        second.warn("condition");
        second.recommend("premium");

        first.absorb(second);
        assert_eq!(first.warnings, vec!["usage", "condition"]);
        assert_eq!(first.recommendations, vec!["premium"]);
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(grouped(0), "0");
        assert_eq!(grouped(999), "999");
        assert_eq!(grouped(75_000), "75,000");
        assert_eq!(grouped(1_234_567), "1,234,567");
        assert_eq!(grouped(-40_000), "-40,000");
    }
}
