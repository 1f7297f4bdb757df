//! Configuration loading and types for error-pages.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files (`load`)
//! - Turning a validated config into an [`ErrorPageSet`]

mod load;
mod types;

pub use load::DEFAULT_CONFIG_FILE;
pub use types::{Config, PageCode, PageConfig, TemplateConfig};

use std::path::PathBuf;

use crate::pages::{ErrorPageSet, PagesError};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, serde_yaml::Error),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("invalid config: {0}")]
    Validation(String),

    #[error("failed to read template file {0}: {1}")]
    TemplateFile(PathBuf, std::io::Error),

    #[error(transparent)]
    Template(#[from] PagesError),
}

// =============================================================================
// Validation and assembly
// =============================================================================

impl Config {
    /// Check the structural rules a config must satisfy before use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.templates.is_empty() {
            return Err(ConfigError::Validation(
                "at least one template is required".into(),
            ));
        }

        for (i, template) in self.templates.iter().enumerate() {
            match (&template.path, &template.content) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::Validation(format!(
                        "template #{} has both 'path' and 'content'",
                        i + 1
                    )));
                }
                (None, None) => {
                    return Err(ConfigError::Validation(format!(
                        "template #{} needs either 'path' or 'content'",
                        i + 1
                    )));
                }
                _ => {}
            }

            match template.resolved_name() {
                Some(name) if !name.trim().is_empty() => {}
                _ => {
                    return Err(ConfigError::Validation(format!(
                        "template #{} has no name (inline templates must set 'name')",
                        i + 1
                    )));
                }
            }
        }

        if self.pages.keys().any(|code| code.as_str().trim().is_empty()) {
            return Err(ConfigError::Validation("page codes must not be empty".into()));
        }

        Ok(())
    }

    /// Load template sources as `(name, text)` pairs, in file order.
    ///
    /// Relative template paths resolve against [`Config::base_path`].
    pub fn load_templates(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.validate()?;

        self.templates
            .iter()
            .map(|template| {
                // validate() guarantees a name and exactly one source
                let name = template.resolved_name().unwrap_or_default();
                let text = match (&template.content, &template.path) {
                    (Some(content), _) => content.clone(),
                    (None, Some(path)) => {
                        let path = if path.is_relative() {
                            self.base_path.join(path)
                        } else {
                            path.clone()
                        };
                        std::fs::read_to_string(&path)
                            .map_err(|e| ConfigError::TemplateFile(path, e))?
                    }
                    (None, None) => String::new(),
                };
                Ok((name, text))
            })
            .collect()
    }

    /// Compile the templates and pages into an [`ErrorPageSet`].
    pub fn error_pages(&self) -> Result<ErrorPageSet, ConfigError> {
        let mut error_pages = ErrorPageSet::new();

        for (name, text) in self.load_templates()? {
            error_pages.add_template(&name, &text)?;
        }

        for (code, page) in &self.pages {
            error_pages.add_page(code.as_str(), page.message.as_str(), page.description.as_str());
        }

        Ok(error_pages)
    }
}
