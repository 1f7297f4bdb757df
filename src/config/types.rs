//! Configuration type definitions.
//!
//! This module contains the data structures of an `error-pages.yaml` file.
//! These types are pure data - no I/O or complex logic.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Top-level config
// =============================================================================

/// The whole configuration file.
///
/// ```yaml
/// templates:
///   - path: ./templates/ghost.html
///   - name: plain
///     content: "{{ code }} {{ message }}"
///
/// pages:
///   404:
///     message: Not Found
///     description: The server can not find the requested page
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,

    /// Error pages keyed by code, in file order
    #[serde(default)]
    pub pages: IndexMap<PageCode, PageConfig>,

    /// Directory relative template paths resolve against (the config file's
    /// directory once loaded)
    #[serde(skip)]
    pub base_path: PathBuf,
}

// =============================================================================
// Templates
// =============================================================================

/// A template, either read from a file or given inline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template name (defaults to the file stem of `path`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Path to the template file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Inline template text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl TemplateConfig {
    /// The explicit name, or the file stem of `path`.
    pub fn resolved_name(&self) -> Option<String> {
        self.name.clone().or_else(|| {
            self.path
                .as_deref()
                .and_then(Path::file_stem)
                .map(|stem| stem.to_string_lossy().into_owned())
        })
    }
}

// =============================================================================
// Pages
// =============================================================================

/// Human readable text for one error code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageConfig {
    pub message: String,

    #[serde(default)]
    pub description: String,
}

/// An error code key.
///
/// YAML reads `404:` as an integer, so both integer and string keys are
/// accepted and kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageCode(pub String);

impl PageCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageCode {
    fn from(code: &str) -> Self {
        PageCode(code.to_string())
    }
}

impl<'de> Deserialize<'de> for PageCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CodeVisitor;

        impl serde::de::Visitor<'_> for CodeVisitor {
            type Value = PageCode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an error code as a string or an integer")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<PageCode, E> {
                Ok(PageCode(v.to_string()))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<PageCode, E> {
                Ok(PageCode(v.to_string()))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<PageCode, E> {
                Ok(PageCode(v.to_string()))
            }
        }

        deserializer.deserialize_any(CodeVisitor)
    }
}
