//! Native Word review comments for comparison issues.
//!
//! Issues are expanded into [`CommentRecord`]s, anchored in the main
//! document part with `commentRangeStart` / `commentRangeEnd` /
//! `commentReference`, and written to the comments part. Every other part of
//! the package is copied through byte-for-byte.

mod annotator;
mod comments;
mod expand;
mod inject;
mod record;
mod settings;

pub use annotator::Annotator;
pub use comments::{build_comments_part, existing_comment_ids};
pub use expand::{expand_issue, expand_issues};
pub use inject::{anchored_comment_ids, inject_comments, InjectionSummary};
pub use record::{Anchor, CommentIdCounter, CommentRecord};
pub use settings::AnnotationSettings;
