//! Named page templates, compiled with Tera.

use indexmap::IndexSet;
use tera::{Context, Tera};

use super::PagesError;
use super::catalog::PageDescriptor;

/// The template registry, wrapping Tera.
///
/// Tera keeps its templates in a hash map, so the registry tracks the
/// insertion order of names separately.
pub struct TemplateRegistry {
    tera: Tera,
    names: IndexSet<String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        // Error page templates are trusted, and a name such as `ghost.html`
        // must not change how the page renders.
        tera.autoescape_on(vec![]);

        Self {
            tera,
            names: IndexSet::new(),
        }
    }

    /// Compile `raw` and register it under `name`.
    ///
    /// An existing template with the same name is replaced and keeps its
    /// position in the iteration order. On failure the registry is left
    /// exactly as it was.
    pub fn add(&mut self, name: &str, raw: &str) -> Result<(), PagesError> {
        // Tera inserts the template before resolving `extends`, so compile
        // into a copy and only keep it once everything checks out.
        let mut tera = self.tera.clone();
        tera.add_raw_template(name, raw)
            .map_err(|cause| PagesError::TemplateParse {
                name: name.to_string(),
                cause,
            })?;

        self.tera = tera;
        self.names.insert(name.to_string());
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Template names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub(crate) fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get_index(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Render one page descriptor through the named template.
    pub fn render(&self, name: &str, page: &PageDescriptor) -> Result<String, PagesError> {
        if !self.contains(name) {
            return Err(PagesError::UnknownTemplate(name.to_string()));
        }

        let mut context = Context::new();
        context.insert("code", &page.code);
        context.insert("message", &page.message);
        context.insert("description", &page.description);

        self.tera
            .render(name, &context)
            .map_err(|cause| PagesError::Render {
                template: name.to_string(),
                code: page.code.clone(),
                cause,
            })
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> PageDescriptor {
        PageDescriptor {
            code: "404".to_string(),
            message: "Not Found".to_string(),
            description: "The page does not exist".to_string(),
        }
    }

    #[test]
    fn test_render_context() {
        let mut registry = TemplateRegistry::new();
        registry
            .add("plain", "{{ code }}|{{ message }}|{{ description }}")
            .unwrap();

        let html = registry.render("plain", &not_found()).unwrap();
        assert_eq!(html, "404|Not Found|The page does not exist");
    }

    #[test]
    fn test_parse_error() {
        let mut registry = TemplateRegistry::new();
        let err = registry.add("broken", "{% if code %}unterminated").unwrap_err();

        assert!(matches!(err, PagesError::TemplateParse { ref name, .. } if name == "broken"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_name_replaces_renderer() {
        let mut registry = TemplateRegistry::new();
        registry.add("a", "first {{ code }}").unwrap();
        registry.add("b", "other").unwrap();
        registry.add("a", "second {{ code }}").unwrap();

        assert_eq!(registry.render("a", &not_found()).unwrap(), "second 404");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_no_autoescape_for_html_names() {
        let mut registry = TemplateRegistry::new();
        registry.add("page.html", "<p>{{ message }}</p>").unwrap();

        let page = PageDescriptor {
            message: "<b>Gone</b>".to_string(),
            ..not_found()
        };
        assert_eq!(
            registry.render("page.html", &page).unwrap(),
            "<p><b>Gone</b></p>"
        );
    }

    #[test]
    fn test_unknown_template() {
        let registry = TemplateRegistry::new();
        let err = registry.render("missing", &not_found()).unwrap_err();
        assert!(matches!(err, PagesError::UnknownTemplate(ref name) if name == "missing"));
    }

    #[test]
    fn test_missing_variable_is_render_error() {
        let mut registry = TemplateRegistry::new();
        registry.add("strict", "{{ status_text }}").unwrap();

        let err = registry.render("strict", &not_found()).unwrap_err();
        assert!(matches!(
            err,
            PagesError::Render { ref template, ref code, .. }
                if template == "strict" && code == "404"
        ));
    }

    #[test]
    fn test_failed_extends_leaves_registry_usable() {
        let mut registry = TemplateRegistry::new();
        registry.add("ok", "ok {{ code }}").unwrap();

        let err = registry
            .add("child", r#"{% extends "missing" %}"#)
            .unwrap_err();
        assert!(matches!(err, PagesError::TemplateParse { ref name, .. } if name == "child"));
        assert!(!registry.contains("child"));

        registry.add("plain", "{{ code }}").unwrap();
        assert_eq!(registry.render("ok", &not_found()).unwrap(), "ok 404");
        assert_eq!(registry.render("plain", &not_found()).unwrap(), "404");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["ok", "plain"]);
    }

    #[test]
    fn test_failed_replace_keeps_previous_renderer() {
        let mut registry = TemplateRegistry::new();
        registry.add("ok", "ok {{ code }}").unwrap();

        assert!(registry.add("ok", r#"{% extends "missing" %}"#).is_err());
        assert_eq!(registry.render("ok", &not_found()).unwrap(), "ok 404");
    }
}
