//! Standalone HTML pages for Markdown writings.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info, instrument, warn};

use pagesmith_markdown::escape_html;
use pagesmith_shared::{PagesmithError, Result};

use crate::splice::{SpliceError, splice};
use crate::writing::Writing;

/// Region in the page template that receives the rendered body.
pub const CONTENT_REGION: &str = "content";

/// Fill a page template for one writing.
///
/// `{{title}}`, `{{date}}` and `{{description}}` are substituted with escaped
/// values (the description is the excerpt), then the body is spliced into the
/// [`CONTENT_REGION`].
///
/// Tokens are substituted in one pass, so token text inside a value is kept literally.
pub fn render_writing_page(template: &str, writing: &Writing) -> std::result::Result<String, SpliceError> {
    static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\{\{(title|date|description)\}\}").expect("valid regex")
    });

    let filled = TOKEN_RE.replace_all(template, |caps: &Captures| {
        let value = match &caps[1] {
            "title" => &writing.title,
            "date" => &writing.date,
            _ => &writing.excerpt,
        };
        escape_html(value)
    });

    splice(&filled, CONTENT_REGION, &writing.body_html)
}

/// Write `<out_dir>/<slug>.html` for every writing. Returns the number written.
///
/// A template without a usable content region writes nothing and is logged.
/// Writings with an empty slug, or a slug already written earlier in the
/// batch, are skipped with a warning.
#[instrument(skip_all, fields(template = %template_path.display(), count = writings.len()))]
pub fn write_writing_pages(template_path: &Path, out_dir: &Path, writings: &[Writing]) -> Result<usize> {
    let template =
        std::fs::read_to_string(template_path).map_err(|e| PagesmithError::io(template_path, e))?;
    std::fs::create_dir_all(out_dir).map_err(|e| PagesmithError::io(out_dir, e))?;

    let mut written_slugs: HashSet<&str> = HashSet::new();
    let mut written = 0;
    for writing in writings {
        if writing.slug.is_empty() {
            warn!(title = %writing.title, "writing has an empty slug, page not written");
            continue;
        }
        if written_slugs.contains(writing.slug.as_str()) {
            warn!(title = %writing.title, slug = %writing.slug, "slug already used, page not written");
            continue;
        }

        let page = match render_writing_page(&template, writing) {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "writing template unusable, no pages written");
                return Ok(written);
            }
        };

        let path = out_dir.join(format!("{}.html", writing.slug));
        std::fs::write(&path, page).map_err(|e| PagesmithError::io(&path, e))?;
        debug!(path = %path.display(), "wrote writing page");
        written_slugs.insert(&writing.slug);
        written += 1;
    }

    info!(written, "writing pages generated");
    Ok(written)
}
