pub mod document;
pub mod issue;
pub mod rules;

pub use document::{
    DocumentContent, DocumentMetadata, Margins, Paragraph, Run, RunFont, Section, Spacing,
    StyleSet, Table,
};
pub use issue::{
    display_value, paragraph_location, table_location, Difference, FormatIssue, IssueKind,
    StyleCategory,
};
pub use rules::{FontRule, FormatRules, PageRule, ParagraphRule, RuleKind, TableRule};
