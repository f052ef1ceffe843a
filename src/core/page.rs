use crate::core::renderer::SectionRenderer;
use crate::core::{RenderResult, SectionDescriptor, SectionOutcome};
use crate::utils::error::{RenderError, Result};
use crate::utils::validation::validate_unique;
use std::collections::HashMap;
use tokio::task::JoinSet;

/// Owns the page's sections and renders them together at startup.
pub struct PageInitializer {
    renderer: SectionRenderer,
    sections: Vec<SectionDescriptor>,
}

impl PageInitializer {
    /// Fails when two sections share a mount.
    pub fn new(renderer: SectionRenderer, sections: Vec<SectionDescriptor>) -> Result<Self> {
        validate_unique("sections.mount", sections.iter().map(|s| s.mount_id()))?;
        Ok(Self { renderer, sections })
    }

    /// Starts every section at once and returns when all have settled.
    ///
    /// Outcomes come back in registration order regardless of completion order.
    pub async fn initialize(&self) -> Vec<SectionOutcome> {
        tracing::info!("Rendering {} sections", self.sections.len());

        let mut tasks = JoinSet::new();
        let mut positions = HashMap::new();
        for (position, descriptor) in self.sections.iter().enumerate() {
            let renderer = self.renderer.clone();
            let descriptor = descriptor.clone();
            let handle = tasks.spawn(async move { renderer.render(&descriptor).await });
            positions.insert(handle.id(), position);
        }

        let mut results: Vec<Option<RenderResult>> = vec![None; self.sections.len()];
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, result)) => {
                    if let Some(&position) = positions.get(&id) {
                        results[position] = Some(result);
                    }
                }
                Err(e) => {
                    let Some(&position) = positions.get(&e.id()) else {
                        continue;
                    };
                    let descriptor = &self.sections[position];
                    let error = RenderError::TaskError {
                        mount: descriptor.mount_id().to_string(),
                        message: e.to_string(),
                    };
                    results[position] = Some(self.renderer.abandon(descriptor, error));
                }
            }
        }

        let outcomes: Vec<SectionOutcome> = self
            .sections
            .iter()
            .zip(results)
            .map(|(descriptor, result)| SectionOutcome {
                mount_id: descriptor.mount_id().to_string(),
                result: result.unwrap_or(RenderResult::Skipped),
            })
            .collect();

        log_summary(&outcomes);
        outcomes
    }

    /// Re-renders a single section. Returns `None` for an unknown mount.
    pub async fn refresh(&self, mount_id: &str) -> Option<RenderResult> {
        let descriptor = self.sections.iter().find(|s| s.mount_id() == mount_id)?;
        let renderer = self.renderer.clone();
        let task_descriptor = descriptor.clone();
        let joined = tokio::spawn(async move { renderer.render(&task_descriptor).await }).await;

        Some(joined.unwrap_or_else(|e| {
            let error = RenderError::TaskError {
                mount: descriptor.mount_id().to_string(),
                message: e.to_string(),
            };
            self.renderer.abandon(descriptor, error)
        }))
    }
}

fn log_summary(outcomes: &[SectionOutcome]) {
    let mut rendered = 0;
    let mut empty = 0;
    let mut failed = 0;
    let mut skipped = 0;
    for outcome in outcomes {
        match outcome.result {
            RenderResult::Rendered(0) => empty += 1,
            RenderResult::Rendered(_) => rendered += 1,
            RenderResult::Failed(_) => failed += 1,
            RenderResult::Skipped => skipped += 1,
        }
    }
    tracing::info!(
        "Sections settled: {} rendered, {} empty, {} failed, {} skipped",
        rendered,
        empty,
        failed,
        skipped
    );
}
