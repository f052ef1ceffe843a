use crate::domain::model::{Mount, ReportContext};
use crate::utils::error::{RenderError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Retrieves the structured payload behind a source locator.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, source_id: &str) -> Result<serde_json::Value>;
}

/// The two page primitives a section render depends on.
pub trait Document: Send + Sync {
    fn find_element(&self, id: &str) -> Option<Mount>;

    /// Replaces the whole content of the mount.
    fn set_content(&self, mount: &Mount, markup: &str) -> Result<()>;
}

/// Fire-and-forget sink for section failures.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &ReportContext, error: &RenderError);
}
