//! WordprocessingML package access and the document reader.

pub mod document;
pub mod reader;

pub use document::{
    body_paragraphs, body_tables, extract_text, find_document_body, WmlDocument,
};
pub use reader::{read_bytes, read_document, read_path};
