//! Markdown writings: parsing, excerpts, loading and ordering.
//!
//! A writing document opens with two single-level headers, the title and then
//! the date, followed by the Markdown body:
//!
//! ```text
//! # On Building Things Slowly
//! # March 2024
//!
//! Body text...
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use pagesmith_markdown::{render, strip_tags, unescape_text};
use pagesmith_shared::{PagesmithError, Result, WritingEntry};

use crate::dates::sort_key;
use crate::slug::slugify;

/// Maximum excerpt length in characters, before the ellipsis.
pub const EXCERPT_LEN: usize = 150;

/// A parsed Markdown writing, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Writing {
    /// Title text as written in the first header.
    pub title: String,
    /// Date string as written in the second header; empty when absent.
    pub date: String,
    pub slug: String,
    /// Rendered body HTML.
    pub body_html: String,
    /// Plain-text lead-in taken from the first paragraph.
    pub excerpt: String,
}

/// Writings loaded from a directory, plus the files that had to be skipped.
#[derive(Debug, Default)]
pub struct WritingBatch {
    pub writings: Vec<Writing>,
    /// Names of source files that failed to parse.
    pub skipped: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one writing document. `source_name` is only used in errors.
pub fn parse_writing(source_name: &str, markdown: &str) -> Result<Writing> {
    let normalized = markdown.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.lines().collect();
    let mut cursor = 0;

    let title = next_header(&lines, &mut cursor)
        .ok_or_else(|| PagesmithError::content(source_name, "no title header found"))?;
    let date = next_header(&lines, &mut cursor).unwrap_or_default();
    let body = lines[cursor..].join("\n");

    let body_html = render(&body);
    let excerpt = excerpt(&body_html);

    Ok(Writing {
        slug: slugify(&title),
        title,
        date,
        body_html,
        excerpt,
    })
}

/// Skip blank lines, then consume a `# text` line if one is next.
fn next_header(lines: &[&str], cursor: &mut usize) -> Option<String> {
    static H1_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^#[ \t]+(.+)$").expect("valid regex"));

    let mut idx = *cursor;
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }

    let caps = H1_RE.captures(lines.get(idx)?)?;
    let text = caps[1].trim();
    if text.is_empty() {
        return None;
    }

    *cursor = idx + 1;
    Some(text.to_string())
}

/// Plain text of the first rendered paragraph, cut to [`EXCERPT_LEN`] chars.
///
/// Appends `...` only when something was cut.
pub fn excerpt(body_html: &str) -> String {
    static FIRST_P_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<p>(.*?)</p>").expect("valid regex"));

    let Some(caps) = FIRST_P_RE.captures(body_html) else {
        return String::new();
    };

    let text = unescape_text(&strip_tags(&caps[1]));
    if text.chars().count() <= EXCERPT_LEN {
        return text;
    }

    let mut cut: String = text.chars().take(EXCERPT_LEN).collect();
    cut.push_str("...");
    cut
}

// ---------------------------------------------------------------------------
// Loading & ordering
// ---------------------------------------------------------------------------

/// `true` if `dir` exists and holds at least one `.md` file.
pub fn has_markdown_sources(dir: &Path) -> bool {
    markdown_sources(dir).is_ok_and(|files| !files.is_empty())
}

/// Parse every `.md` file in `dir`, newest first.
///
/// Files that fail to parse are logged and skipped; read errors propagate.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_writings(dir: &Path) -> Result<WritingBatch> {
    let mut batch = WritingBatch::default();

    for path in markdown_sources(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let source = std::fs::read_to_string(&path).map_err(|e| PagesmithError::io(&path, e))?;

        match parse_writing(&name, &source) {
            Ok(writing) => {
                debug!(file = %name, slug = %writing.slug, "parsed writing");
                batch.writings.push(writing);
            }
            Err(e) => {
                warn!(file = %name, error = %e, "skipping writing");
                batch.skipped.push(name);
            }
        }
    }

    sort_writings(&mut batch.writings);
    info!(
        parsed = batch.writings.len(),
        skipped = batch.skipped.len(),
        "writings loaded"
    );
    Ok(batch)
}

/// Newest first by parsed date; unparsable dates last, ties keep file order.
pub fn sort_writings(writings: &mut [Writing]) {
    writings.sort_by_key(|w| std::cmp::Reverse(sort_key(&w.date)));
}

/// Newest first by the raw `date` string.
pub fn sort_entries(entries: &mut [WritingEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// `.md` files directly inside `dir`, sorted by file name.
fn markdown_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PagesmithError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PagesmithError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
