use crate::core::{ErrorReporter, ReportContext};
use crate::utils::error::RenderError;
use tracing::Level;

/// Sends section failures to the `tracing` pipeline.
///
/// Unavailable data is a warning; anything that broke while rendering is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

pub(crate) fn level_for(error: &RenderError) -> Level {
    if error.is_retrieval_failure() {
        Level::WARN
    } else {
        Level::ERROR
    }
}

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &ReportContext, error: &RenderError) {
        if level_for(error) == Level::WARN {
            tracing::warn!(
                mount = %context.mount_id,
                source = %context.source_id,
                severity = ?error.severity(),
                "⚠️ Section data unavailable: {}",
                error
            );
        } else {
            tracing::error!(
                mount = %context.mount_id,
                source = %context.source_id,
                severity = ?error.severity(),
                "❌ Section failed to render: {}",
                error
            );
        }
        tracing::debug!("💡 {}", error.recovery_suggestion());
    }
}
