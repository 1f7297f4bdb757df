//! Output path conventions.
//!
//! Every rendered page lands at `<output>/<template>/<code>.html` and the
//! optional index at `<output>/index.html`. Links in the index are relative
//! to the output directory and always use `/`.

use std::path::{Path, PathBuf};

/// File name of the generated index page.
pub const INDEX_FILE: &str = "index.html";

/// File name of a rendered page: `404` -> `404.html`.
pub fn page_file_name(code: &str) -> String {
    format!("{code}.html")
}

/// Link to a page, relative to the output directory.
///
/// # Examples
/// ```ignore
/// page_link("ghost", "404") => "ghost/404.html"
/// ```
pub fn page_link(template: &str, code: &str) -> String {
    format!("{template}/{}", page_file_name(code))
}

/// Where a rendered page is written.
///
/// # Examples
/// ```ignore
/// page_output_path(Path::new("/out"), "ghost", "404") => /out/ghost/404.html
/// ```
pub fn page_output_path(output_dir: &Path, template: &str, code: &str) -> PathBuf {
    output_dir.join(template).join(page_file_name(code))
}

/// Where the index page is written.
pub fn index_output_path(output_dir: &Path) -> PathBuf {
    output_dir.join(INDEX_FILE)
}
