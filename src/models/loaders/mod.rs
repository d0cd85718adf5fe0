pub mod document_loader;

pub use document_loader::{collect_phrases, read_document, read_phrases};
