pub mod page;
pub mod renderer;
pub mod templates;

pub use crate::domain::model::{
    Mount, RenderResult, ReportContext, SectionDescriptor, SectionItem, SectionOutcome, Template,
};
pub use crate::domain::ports::{DataSource, Document, ErrorReporter, Storage};
pub use crate::utils::error::Result;
