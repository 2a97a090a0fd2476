mod comparer;
mod identity;
mod positional;
mod report;
mod result;
mod settings;
mod styles;

pub use comparer::FormatComparer;
pub use report::{
    ActionType, ComparisonReport, Recommendation, RecommendationAction, ReportSummary,
};
pub use result::{
    ComparisonOutcome, ContentComparison, ElementComparison, ElementKind, FormatComparison,
    MatchStrategy, RuleComparison, StyleComparison, StyleElementComparison,
};
pub use settings::ComparisonSettings;
