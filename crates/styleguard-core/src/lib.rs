pub mod error;
pub mod types;
pub mod xml;
pub mod hash;
pub mod package;
pub mod model;
pub mod compare;
pub mod annotate;
pub mod wml;
pub mod extract;
pub mod checker;

pub use error::{Result, Stage, StageContext, StyleguardError};
pub use types::{IssueType, Priority, Severity};

pub use annotate::{AnnotationSettings, Annotator};
pub use checker::{AnnotationTarget, CheckInput, CheckerSettings, FormatChecker};
pub use compare::{ComparisonReport, ComparisonSettings, FormatComparer};
pub use extract::extract_rules;
pub use model::{DocumentContent, FormatIssue, FormatRules};
pub use package::{OoxmlPackage, PackageRewriter};
pub use wml::WmlDocument;
