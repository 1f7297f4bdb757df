use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::pages::{ErrorPageSet, PagesError};

use super::history::{History, HistoryItem};
use super::index::IndexRenderer;
use super::paths::{index_output_path, page_link, page_output_path};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("cannot prepare directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render index: {0}")]
    Index(#[source] tera::Error),

    #[error(transparent)]
    Pages(#[from] PagesError),
}

#[derive(Debug)]
pub struct BuildResult {
    pub output_dir: PathBuf,
    /// Number of page files written
    pub pages: usize,
    /// Number of templates pages were rendered with
    pub templates: usize,
    /// Whether `index.html` was written
    pub index: bool,
}

/// Writes every rendered error page to an output directory.
///
/// One call to [`Builder::build`] is one linear pass: prepare the output
/// directory, render and write all pages, then optionally write the index.
/// A failure aborts the pass and files already written stay on disk.
pub struct Builder<'a> {
    pages: &'a ErrorPageSet,
    generate_index: bool,
}

impl<'a> Builder<'a> {
    pub fn new(pages: &'a ErrorPageSet) -> Self {
        Self {
            pages,
            generate_index: false,
        }
    }

    /// Also write `index.html` listing every page, grouped by template.
    pub fn with_index(mut self, generate_index: bool) -> Self {
        self.generate_index = generate_index;
        self
    }

    pub fn build(&self, output_dir: &Path) -> Result<BuildResult, BuildError> {
        debug!(path = %output_dir.display(), "preparing the output directory");
        ensure_directory(output_dir)?;

        let mut history = History::new();
        let mut prepared: HashSet<String> = HashSet::new();
        let mut written = 0;
        let started = Instant::now();

        info!("saving the error pages");
        self.pages.iterate_pages(|page| -> Result<(), BuildError> {
            if !prepared.contains(page.template) {
                ensure_directory(&output_dir.join(page.template))?;
                prepared.insert(page.template.to_string());
            }

            let path = page_output_path(output_dir, page.template, page.code);
            std::fs::write(&path, &page.content)
                .map_err(|source| BuildError::Write { path, source })?;
            written += 1;

            // The index shows the catalog's message, not whatever the
            // template chose to render.
            let message = self
                .pages
                .catalog()
                .get(page.code)
                .map(|p| p.message.clone())
                .unwrap_or_default();

            history.record(
                page.template,
                HistoryItem {
                    code: page.code.to_string(),
                    message,
                    path: page_link(page.template, page.code),
                },
            );

            Ok(())
        })?;

        debug!(pages = written, duration = ?started.elapsed(), "saved");

        if self.generate_index {
            history.sort();

            info!("index file generation");
            let started = Instant::now();
            write_index(output_dir, &history)?;
            debug!(duration = ?started.elapsed(), "index file generated");
        }

        Ok(BuildResult {
            output_dir: output_dir.to_path_buf(),
            pages: written,
            templates: self.pages.templates().len(),
            index: self.generate_index,
        })
    }
}

/// Make sure `path` is a directory, creating it (and its parents) if absent.
fn ensure_directory(path: &Path) -> Result<(), BuildError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BuildError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            std::fs::create_dir_all(path).map_err(|source| BuildError::Directory {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(BuildError::Directory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_index(output_dir: &Path, history: &History) -> Result<(), BuildError> {
    let html = IndexRenderer::new()
        .and_then(|renderer| renderer.render(history))
        .map_err(BuildError::Index)?;

    let path = index_output_path(output_dir);
    std::fs::write(&path, html).map_err(|source| BuildError::Write { path, source })
}
