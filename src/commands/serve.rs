use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use error_pages::{ErrorPageSet, PagesError, config::Config};

use crate::ServeArgs;

/// Code rendered for `/` and for codes missing from the catalog.
const NOT_FOUND_CODE: &str = "404";

#[derive(Clone)]
struct AppState {
    pages: Arc<ErrorPageSet>,
    template: Arc<str>,
}

/// Routes for serving error pages rendered on each request.
///
/// - `/healthz`, `/health/live`: liveness probe
/// - `/{code}`, `/{code}.html`: the page for `code`
/// - `/`: the 404 page
fn router(pages: Arc<ErrorPageSet>, template: &str) -> Router {
    let state = AppState {
        pages,
        template: Arc::from(template),
    };

    Router::new()
        .route("/healthz", get(live_handler))
        .route("/health/live", get(live_handler))
        .route("/", get(index_handler))
        .route("/{page}", get(page_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn live_handler() -> &'static str {
    "OK"
}

async fn index_handler(State(state): State<AppState>) -> Response {
    not_found(&state)
}

async fn page_handler(State(state): State<AppState>, Path(page): Path<String>) -> Response {
    let code = page.strip_suffix(".html").unwrap_or(&page);
    render(&state, code)
}

fn render(state: &AppState, code: &str) -> Response {
    match state.pages.render(&state.template, code) {
        Ok(html) => (status_for(code), Html(html)).into_response(),
        Err(PagesError::UnknownPage(_)) => not_found(state),
        Err(e) => internal_error(&e),
    }
}

fn not_found(state: &AppState) -> Response {
    match state.pages.render(&state.template, NOT_FOUND_CODE) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(PagesError::UnknownPage(_)) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Err(e) => internal_error(&e),
    }
}

fn internal_error(err: &PagesError) -> Response {
    error!(error = %err, "failed to render error page");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// The status to answer with: the code itself when it is a valid HTTP
/// status, 200 otherwise.
fn status_for(code: &str) -> StatusCode {
    code.parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK)
}

pub async fn run(args: &ServeArgs) -> Result<(), anyhow::Error> {
    let config = Config::load_from_arg(Some(args.config_file.as_path()))?;

    info!("loading templates");
    let pages = config.error_pages()?;

    let template = match &args.template {
        Some(name) if pages.templates().contains(name) => name.clone(),
        Some(name) => {
            let known = pages.templates().names().collect::<Vec<_>>().join(", ");
            return Err(anyhow::anyhow!(
                "Unknown template '{name}' (available: {known})"
            ));
        }
        None => pages
            .templates()
            .names()
            .next()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("No templates configured"))?,
    };
    info!(template = %template, pages = pages.catalog().len(), "serving error pages");

    let app = router(Arc::new(pages), &template);

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;

    // Determine the URL to display
    let display_host = if args.bind == "0.0.0.0" {
        "localhost"
    } else {
        &args.bind
    };
    let url = format!("http://{}:{}", display_host, args.port);

    println!("\nServing error pages at {}", url);
    println!("Press Ctrl+C to stop\n");

    // Open browser if requested
    if args.open
        && let Err(e) = open::that(&url)
    {
        eprintln!("Failed to open browser: {}", e);
    }

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn sample_pages() -> Arc<ErrorPageSet> {
        let mut pages = ErrorPageSet::new();
        pages.add_template("plain", "{{ code }} {{ message }}").unwrap();
        pages.add_template("other", "other {{ code }}").unwrap();
        pages.add_page("404", "Not Found", "");
        pages.add_page("503", "Service Unavailable", "");
        pages.add_page("custom", "Custom Page", "");
        Arc::new(pages)
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_renders_page_with_its_status() {
        let app = router(sample_pages(), "plain");
        assert_eq!(
            fetch(app.clone(), "/503").await,
            (StatusCode::SERVICE_UNAVAILABLE, "503 Service Unavailable".to_string())
        );
        assert_eq!(
            fetch(app, "/503.html").await,
            (StatusCode::SERVICE_UNAVAILABLE, "503 Service Unavailable".to_string())
        );
    }

    #[tokio::test]
    async fn test_selected_template() {
        let app = router(sample_pages(), "other");
        assert_eq!(fetch(app, "/404").await.1, "other 404");
    }

    #[tokio::test]
    async fn test_non_numeric_code_is_ok() {
        let app = router(sample_pages(), "plain");
        assert_eq!(
            fetch(app, "/custom").await,
            (StatusCode::OK, "custom Custom Page".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_code_falls_back_to_404() {
        let app = router(sample_pages(), "plain");
        assert_eq!(
            fetch(app.clone(), "/418").await,
            (StatusCode::NOT_FOUND, "404 Not Found".to_string())
        );
        assert_eq!(
            fetch(app, "/").await,
            (StatusCode::NOT_FOUND, "404 Not Found".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_code_without_404_page() {
        let mut pages = ErrorPageSet::new();
        pages.add_template("plain", "{{ code }}").unwrap();
        pages.add_page("500", "Internal Server Error", "");
        let app = router(Arc::new(pages), "plain");

        assert_eq!(
            fetch(app, "/418").await,
            (StatusCode::NOT_FOUND, "Not Found".to_string())
        );
    }

    #[tokio::test]
    async fn test_render_failure_is_500() {
        let mut pages = ErrorPageSet::new();
        pages.add_template("broken", "{{ nope }}").unwrap();
        pages.add_page("500", "Internal Server Error", "");
        let app = router(Arc::new(pages), "broken");

        assert_eq!(fetch(app, "/500").await.0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_liveness_probe() {
        let app = router(sample_pages(), "plain");
        assert_eq!(fetch(app.clone(), "/healthz").await, (StatusCode::OK, "OK".to_string()));
        assert_eq!(fetch(app, "/health/live").await, (StatusCode::OK, "OK".to_string()));
    }

    #[test]
    fn test_status_for() {
        assert_eq!(status_for("404"), StatusCode::NOT_FOUND);
        assert_eq!(status_for("503"), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_for("custom"), StatusCode::OK);
        assert_eq!(status_for("42"), StatusCode::OK);
    }
}
