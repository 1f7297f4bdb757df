//! The page-generation engine.
//!
//! An [`ErrorPageSet`] pairs a [`TemplateRegistry`] with a [`PageCatalog`]
//! and renders every (template, code) combination exactly once:
//! - templates in the order they were added
//! - codes in the order they were added, within each template
//!
//! Rendering is pull-based, so at most one rendered page is held in memory
//! at a time and callers can interleave I/O with rendering.

mod catalog;
mod registry;

pub use catalog::{PageCatalog, PageDescriptor};
pub use registry::TemplateRegistry;

#[derive(thiserror::Error, Debug)]
pub enum PagesError {
    #[error("failed to parse template '{name}': {cause}")]
    TemplateParse {
        name: String,
        #[source]
        cause: tera::Error,
    },

    #[error("no templates registered")]
    NoTemplates,

    #[error("failed to render page {code} with template '{template}': {cause}")]
    Render {
        template: String,
        code: String,
        #[source]
        cause: tera::Error,
    },

    #[error("template '{0}' not found")]
    UnknownTemplate(String),

    #[error("page '{0}' not found")]
    UnknownPage(String),
}

/// One page rendered through one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage<'a> {
    pub template: &'a str,
    pub code: &'a str,
    pub content: Vec<u8>,
}

/// Templates and error codes, composed.
#[derive(Default)]
pub struct ErrorPageSet {
    templates: TemplateRegistry,
    catalog: PageCatalog,
}

impl ErrorPageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a template. Last write wins for a repeated name.
    pub fn add_template(&mut self, name: &str, raw: &str) -> Result<(), PagesError> {
        self.templates.add(name, raw)
    }

    /// Insert or replace the descriptor for an error code.
    pub fn add_page(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.catalog.add(code, message, description);
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn catalog(&self) -> &PageCatalog {
        &self.catalog
    }

    /// Render a single page.
    pub fn render(&self, template: &str, code: &str) -> Result<String, PagesError> {
        let page = self
            .catalog
            .get(code)
            .ok_or_else(|| PagesError::UnknownPage(code.to_string()))?;
        self.templates.render(template, page)
    }

    /// Lazily render every (template, code) pair.
    ///
    /// Fails up front when no templates are registered. The returned
    /// sequence ends after the first error it yields.
    pub fn pages(&self) -> Result<Pages<'_>, PagesError> {
        if self.templates.is_empty() {
            return Err(PagesError::NoTemplates);
        }

        Ok(Pages {
            set: self,
            template: 0,
            page: 0,
            failed: false,
        })
    }

    /// Render every (template, code) pair and hand each one to `visit`.
    ///
    /// The first error, from rendering or from `visit`, stops the iteration
    /// and is returned; `visit` is not called for any later pair.
    pub fn iterate_pages<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        E: From<PagesError>,
        F: FnMut(RenderedPage<'_>) -> Result<(), E>,
    {
        for page in self.pages()? {
            visit(page?)?;
        }

        Ok(())
    }
}

/// Iterator over the rendered cross-product of an [`ErrorPageSet`].
pub struct Pages<'a> {
    set: &'a ErrorPageSet,
    template: usize,
    page: usize,
    failed: bool,
}

impl<'a> Iterator for Pages<'a> {
    type Item = Result<RenderedPage<'a>, PagesError>;

    fn next(&mut self) -> Option<Self::Item> {
        let set = self.set;
        if self.failed || set.catalog.is_empty() {
            return None;
        }

        let template = set.templates.name_at(self.template)?;
        let page = set.catalog.get_index(self.page)?;

        self.page += 1;
        if self.page == set.catalog.len() {
            self.page = 0;
            self.template += 1;
        }

        let result = set
            .templates
            .render(template, page)
            .map(|html| RenderedPage {
                template,
                code: &page.code,
                content: html.into_bytes(),
            });

        if result.is_err() {
            self.failed = true;
        }

        Some(result)
    }
}
