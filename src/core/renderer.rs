use crate::core::{
    DataSource, Document, ErrorReporter, Mount, RenderResult, ReportContext, SectionDescriptor,
    SectionItem,
};
use crate::utils::error::{RenderError, Result};
use crate::utils::escape::escape_html;
use std::sync::Arc;
use std::time::Duration;

/// Resolves a section's data and writes the result into its mount.
///
/// Every failure is handled here: the mount ends up showing either the
/// rendered fragments, the empty-state message or the error message, and
/// nothing is returned to the caller beyond a [`RenderResult`].
#[derive(Clone)]
pub struct SectionRenderer {
    source: Arc<dyn DataSource>,
    document: Arc<dyn Document>,
    reporter: Arc<dyn ErrorReporter>,
    timeout: Option<Duration>,
}

impl SectionRenderer {
    pub fn new(
        source: Arc<dyn DataSource>,
        document: Arc<dyn Document>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            source,
            document,
            reporter,
            timeout: None,
        }
    }

    /// Bounds the retrieval step; expiry takes the error branch.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn render(&self, descriptor: &SectionDescriptor) -> RenderResult {
        let Some(mount) = self.document.find_element(descriptor.mount_id()) else {
            tracing::debug!("No mount '{}' on this page, skipping", descriptor.mount_id());
            return RenderResult::Skipped;
        };

        let outcome = match self.retrieve(descriptor).await {
            Ok(items) if items.is_empty() => {
                tracing::info!(
                    "Section '{}' has no items in {}",
                    descriptor.mount_id(),
                    descriptor.source_id()
                );
                self.document
                    .set_content(&mount, &escape_html(&descriptor.empty_message()))
                    .map(|_| RenderResult::Rendered(0))
            }
            Ok(items) => build_markup(descriptor, &items).and_then(|markup| {
                self.document.set_content(&mount, &markup)?;
                Ok(RenderResult::Rendered(items.len()))
            }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                tracing::debug!("Section '{}' rendered: {:?}", descriptor.mount_id(), result);
                result
            }
            Err(error) => self.fail(descriptor, &mount, error),
        }
    }

    async fn retrieve(&self, descriptor: &SectionDescriptor) -> Result<Vec<SectionItem>> {
        let source_id = descriptor.source_id();
        tracing::debug!("Fetching section data from: {}", source_id);

        let payload = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.fetch(source_id))
                .await
                .map_err(|_| RenderError::TimeoutError {
                    source_id: source_id.to_string(),
                    limit,
                })??,
            None => self.source.fetch(source_id).await?,
        };

        into_items(source_id, payload)
    }

    /// Takes the error branch for a render that never reached its own
    /// failure handling, such as an aborted task.
    pub(crate) fn abandon(&self, descriptor: &SectionDescriptor, error: RenderError) -> RenderResult {
        match self.document.find_element(descriptor.mount_id()) {
            Some(mount) => self.fail(descriptor, &mount, error),
            None => {
                self.reporter.report(&ReportContext::from(descriptor), &error);
                RenderResult::Failed(error.to_string())
            }
        }
    }

    fn fail(&self, descriptor: &SectionDescriptor, mount: &Mount, error: RenderError) -> RenderResult {
        self.reporter.report(&ReportContext::from(descriptor), &error);

        let message = escape_html(&descriptor.error_message());
        if let Err(e) = self.document.set_content(mount, &message) {
            tracing::warn!(
                "Could not write error message into '{}': {}",
                descriptor.mount_id(),
                e
            );
        }
        RenderResult::Failed(error.to_string())
    }
}

/// Checks the container shape: an array whose entries are objects.
fn into_items(source_id: &str, payload: serde_json::Value) -> Result<Vec<SectionItem>> {
    let serde_json::Value::Array(entries) = payload else {
        return Err(RenderError::MalformedPayload {
            source_id: source_id.to_string(),
            message: format!("expected an array, found {}", json_kind(&payload)),
        });
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            serde_json::Value::Object(data) => Ok(SectionItem::new(data)),
            other => Err(RenderError::MalformedPayload {
                source_id: source_id.to_string(),
                message: format!("item {} is {}, not an object", index, json_kind(&other)),
            }),
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// All fragments are built before the mount is touched.
fn build_markup(descriptor: &SectionDescriptor, items: &[SectionItem]) -> Result<String> {
    let template = descriptor.template();
    let fragments = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            template(item, index).map_err(|e| match e {
                RenderError::TemplateError { .. } => e,
                other => RenderError::TemplateError {
                    index,
                    message: other.to_string(),
                },
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(fragments.concat())
}
