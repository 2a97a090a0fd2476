use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StyleguardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Recommendation priority for an issue of this severity.
    pub fn priority(&self) -> Priority {
        match self {
            Severity::Critical => Priority::Urgent,
            Severity::High => Priority::High,
            Severity::Medium => Priority::Medium,
            Severity::Low => Priority::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = StyleguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(StyleguardError::validation(format!(
                "unknown severity '{}'",
                other
            ))),
        }
    }
}

/// What an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Font,
    Paragraph,
    Table,
    Page,
    Style,
    Content,
    Structure,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Font => "font",
            IssueType::Paragraph => "paragraph",
            IssueType::Table => "table",
            IssueType::Page => "page",
            IssueType::Style => "style",
            IssueType::Content => "content",
            IssueType::Structure => "structure",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_severity() {
        assert_eq!(Severity::Critical.priority(), Priority::Urgent);
        assert_eq!(Severity::High.priority(), Priority::High);
        assert_eq!(Severity::Medium.priority(), Priority::Medium);
        assert_eq!(Severity::Low.priority(), Priority::Low);
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        assert_eq!(serde_json::to_string(&IssueType::Structure).unwrap(), "\"structure\"");
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
    }
}
