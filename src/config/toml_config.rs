use crate::adapters::source::source_for;
use crate::core::page::PageInitializer;
use crate::core::renderer::SectionRenderer;
use crate::core::templates::TemplateKind;
use crate::core::{Document, ErrorReporter, SectionDescriptor};
use crate::utils::error::{RenderError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub page: PageInfo,
    pub source: SourceConfig,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub name: String,
    /// Page markup, relative to the storage root.
    pub input: String,
    /// Rendered page, relative to the storage root.
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// http(s) URL or local directory that section sources resolve against.
    /// A relative directory is taken from the page root, see `rebase_source`.
    pub base: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub mount: String,
    pub source: String,
    pub template: TemplateKind,
    pub subject: Option<String>,
}

impl SectionConfig {
    pub fn descriptor(&self) -> SectionDescriptor {
        let subject = self
            .subject
            .clone()
            .unwrap_or_else(|| self.template.default_subject().to_string());
        SectionDescriptor::new(&self.mount, &self.source, self.template.template()).with_subject(subject)
    }
}

impl PageConfig {
    /// Loads and parses a page configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RenderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are kept as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RenderError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Anchors a relative local `source.base` under `root`. URLs and absolute
    /// directories are left alone.
    pub fn rebase_source(&mut self, root: &Path) {
        let base = &self.source.base;
        if base.starts_with("http://") || base.starts_with("https://") || Path::new(base).is_absolute() {
            return;
        }
        self.source.base = root.join(base).to_string_lossy().into_owned();
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    pub fn descriptors(&self) -> Vec<SectionDescriptor> {
        self.sections.iter().map(SectionConfig::descriptor).collect()
    }

    /// Wires the configured source and sections to a page document.
    pub fn initializer(
        &self,
        document: Arc<dyn Document>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<PageInitializer> {
        let timeout = self.timeout();
        let source = source_for(&self.source.base, timeout)?;
        let mut renderer = SectionRenderer::new(source, document, reporter);
        if let Some(limit) = timeout {
            renderer = renderer.with_timeout(limit);
        }
        PageInitializer::new(renderer, self.descriptors())
    }
}

impl Validate for PageConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("page.name", &self.page.name)?;
        validation::validate_path("page.input", &self.page.input)?;
        validation::validate_path("page.output", &self.page.output)?;
        validation::validate_source_base("source.base", &self.source.base)?;

        if let Some(seconds) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", seconds, 1)?;
        }

        if self.sections.is_empty() {
            return Err(RenderError::MissingConfigError {
                field: "sections".to_string(),
            });
        }

        for section in &self.sections {
            validation::validate_non_empty_string("sections.mount", &section.mount)?;
            validation::validate_non_empty_string("sections.source", &section.source)?;
        }
        validation::validate_unique("sections.mount", self.sections.iter().map(|s| s.mount.as_str()))
    }
}
