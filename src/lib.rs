pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::document::{HtmlDocument, MemoryDocument};
pub use crate::adapters::reporter::TracingReporter;
pub use crate::adapters::source::{FileSource, HttpSource};
pub use crate::config::{cli::LocalStorage, toml_config::PageConfig};
pub use crate::core::{
    page::PageInitializer, renderer::SectionRenderer, templates::TemplateKind, RenderResult,
    SectionDescriptor, SectionItem, SectionOutcome,
};
pub use crate::utils::error::{RenderError, Result};
