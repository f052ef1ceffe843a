// Adapters layer: concrete collaborators for data retrieval, page documents and error reporting.

pub mod document;
pub mod reporter;
pub mod source;
