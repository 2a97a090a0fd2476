pub mod content_types;
pub mod ooxml;
pub mod relationships;
pub mod rewriter;
pub mod verify;

pub use content_types::{content_type_values, ensure_override, ContentTypes};
pub use ooxml::{CoreProperties, OoxmlPackage};
pub use relationships::{
    ensure_relationship, parse_relationships, relationship_types, relationships_part_for,
    Relationship, RelationshipMerge,
};
pub use rewriter::{AppendedPart, PackageRewriter, PartAction, RewriteSummary};
