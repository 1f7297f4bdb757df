use serde::Serialize;
use tera::{Context, Tera};

use super::history::{History, HistoryItem};

/// The index template, embedded at compile time.
const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Registered with an `.html` suffix so Tera escapes names, messages and links.
const INDEX_TEMPLATE_NAME: &str = "index.html";

/// Renders the page listing every written error page.
pub struct IndexRenderer {
    tera: Tera,
}

impl IndexRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render the index over a (sorted) history.
    pub fn render(&self, history: &History) -> Result<String, tera::Error> {
        let templates: Vec<IndexSection> = history
            .iter()
            .map(|(name, items)| IndexSection { name, items })
            .collect();

        let mut context = Context::new();
        context.insert("templates", &templates);
        context.insert("version", env!("CARGO_PKG_VERSION"));

        self.tera.render(INDEX_TEMPLATE_NAME, &context)
    }
}

/// One template's heading and links in the index.
#[derive(Debug, Serialize)]
struct IndexSection<'a> {
    name: &'a str,
    items: &'a [HistoryItem],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(template: &str, code: &str, message: &str) -> HistoryItem {
        HistoryItem {
            code: code.to_string(),
            message: message.to_string(),
            path: format!("{template}/{code}.html"),
        }
    }

    #[test]
    fn test_render_lists_links_per_template() {
        let mut history = History::new();
        history.record("plain", item("plain", "404", "Not Found"));
        history.record("plain", item("plain", "500", "Server Error"));
        history.record("ghost", item("ghost", "404", "Not Found"));

        let html = IndexRenderer::new().unwrap().render(&history).unwrap();

        assert!(html.contains("Template name: <code>plain</code>"));
        assert!(html.contains(
            r#"<li><a href="plain&#x2F;404.html"><strong>404</strong>: Not Found</a></li>"#
        ));
        assert!(html.contains(
            r#"<li><a href="plain&#x2F;500.html"><strong>500</strong>: Server Error</a></li>"#
        ));

        let ghost = html.find("<code>ghost</code>").unwrap();
        let plain = html.find("<code>plain</code>").unwrap();
        assert!(ghost < plain);
    }

    #[test]
    fn test_messages_are_escaped() {
        let mut history = History::new();
        history.record("t", item("t", "400", "Bad <Request>"));

        let html = IndexRenderer::new().unwrap().render(&history).unwrap();
        assert!(html.contains("Bad &lt;Request&gt;"));
    }

    #[test]
    fn test_template_name_is_escaped_in_links() {
        let mut history = History::new();
        history.record(r#"a"b<c"#, item(r#"a"b<c"#, "404", "Not Found"));

        let html = IndexRenderer::new().unwrap().render(&history).unwrap();
        assert!(html.contains(r#"href="a&quot;b&lt;c&#x2F;404.html""#));
        assert!(html.contains("<code>a&quot;b&lt;c</code>"));
        assert!(!html.contains(r#"a"b<c"#));
    }

    #[test]
    fn test_empty_history() {
        let html = IndexRenderer::new().unwrap().render(&History::new()).unwrap();
        assert!(html.contains("Error pages index"));
        assert!(!html.contains("Template name"));
    }
}
