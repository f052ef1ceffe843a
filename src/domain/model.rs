use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One entry of a section's data collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionItem {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl SectionItem {
    pub fn new(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }

    /// Decodes the item into a section's record type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_json::Value::Object(self.data.clone());
        Ok(serde_json::from_value(value)?)
    }
}

/// Maps one item and its position to a markup fragment.
pub type Template = Arc<dyn Fn(&SectionItem, usize) -> Result<String> + Send + Sync>;

/// A data-driven block of a page. Immutable once built.
#[derive(Clone)]
pub struct SectionDescriptor {
    mount_id: String,
    source_id: String,
    subject: String,
    template: Template,
}

impl SectionDescriptor {
    pub fn new(mount_id: impl Into<String>, source_id: impl Into<String>, template: Template) -> Self {
        let mount_id = mount_id.into();
        let subject = default_subject(&mount_id);
        Self {
            mount_id,
            source_id: source_id.into(),
            subject,
            template,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn empty_message(&self) -> String {
        format!("No {} yet.", self.subject)
    }

    pub fn error_message(&self) -> String {
        format!("Could not load {}.", self.subject)
    }
}

impl fmt::Debug for SectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionDescriptor")
            .field("mount_id", &self.mount_id)
            .field("source_id", &self.source_id)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

// "team-container" -> "team"
fn default_subject(mount_id: &str) -> String {
    mount_id
        .trim_end_matches("-container")
        .replace(['-', '_'], " ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    /// The page has no element for this section.
    Skipped,
    /// Number of fragments written; zero when the empty-state message was shown.
    Rendered(usize),
    /// The error message was shown.
    Failed(String),
}

impl RenderResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, RenderResult::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutcome {
    pub mount_id: String,
    pub result: RenderResult,
}

/// Diagnostic context handed to the error reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub mount_id: String,
    pub source_id: String,
}

impl From<&SectionDescriptor> for ReportContext {
    fn from(descriptor: &SectionDescriptor) -> Self {
        Self {
            mount_id: descriptor.mount_id().to_string(),
            source_id: descriptor.source_id().to_string(),
        }
    }
}

/// Handle to a resolved mount element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_template() -> Template {
        Arc::new(|_item: &SectionItem, _index: usize| -> Result<String> { Ok(String::new()) })
    }

    #[test]
    fn test_subject_defaults_from_mount_id() {
        let descriptor = SectionDescriptor::new("team-container", "team.json", noop_template());
        assert_eq!(descriptor.subject(), "team");
        assert_eq!(descriptor.empty_message(), "No team yet.");
        assert_eq!(descriptor.error_message(), "Could not load team.");
    }

    #[test]
    fn test_subject_override() {
        let descriptor = SectionDescriptor::new("team-container", "team.json", noop_template())
            .with_subject("team members");
        assert_eq!(descriptor.empty_message(), "No team members yet.");
    }

    #[test]
    fn test_decode_reports_missing_fields() {
        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            title: String,
        }

        let item = SectionItem::default();
        assert!(item.decode::<Needs>().is_err());
    }
}
