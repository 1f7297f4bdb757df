//! Render HTTP error pages across a set of templates.
//!
//! - [`pages`]: the templates, the error code catalog and the rendering of
//!   every (template, code) pair
//! - [`build`]: writing the rendered pages (and an optional index) to disk
//! - [`config`]: loading both from an `error-pages.yaml` file

pub mod build;
pub mod config;
pub mod pages;

pub use build::{BuildError, BuildResult, Builder};
pub use pages::{ErrorPageSet, PagesError, RenderedPage};
