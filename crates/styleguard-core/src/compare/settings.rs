use serde::{Deserialize, Serialize};

/// Settings for [`super::FormatComparer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    /// Largest absolute difference (in points, or spacing multiples) still
    /// treated as equal.
    pub numeric_tolerance: f64,

    /// Report differing paragraph and table counts as structure issues.
    pub check_element_counts: bool,

    /// Compare style name sets. When off, the style comparison is vacuously
    /// compliant.
    pub compare_styles: bool,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            numeric_tolerance: 0.01,
            check_element_counts: true,
            compare_styles: true,
        }
    }
}

impl ComparisonSettings {
    pub fn numbers_match(&self, current: Option<f64>, expected: Option<f64>) -> bool {
        match (current, expected) {
            (None, None) => true,
            (Some(a), Some(b)) => (a - b).abs() <= self.numeric_tolerance,
            _ => false,
        }
    }
}
