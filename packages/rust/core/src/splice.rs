//! Marker-delimited region replacement in HTML documents.
//!
//! A region named `finds` is the text between `<!-- BEGIN:finds -->` and
//! `<!-- END:finds -->`. Each marker must appear exactly once, begin first.

use std::path::Path;

use tracing::{debug, warn};

use pagesmith_shared::{PagesmithError, Result};

/// Indentation placed before the end marker after a splice.
const END_INDENT: &str = "        ";

/// Why a region could not be spliced. The document is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpliceError {
    #[error("begin marker for region '{region}' not found")]
    MissingBegin { region: String },

    #[error("end marker for region '{region}' not found")]
    MissingEnd { region: String },

    #[error("marker for region '{region}' appears more than once")]
    DuplicateMarker { region: String },

    #[error("end marker for region '{region}' precedes its begin marker")]
    OutOfOrder { region: String },
}

pub fn begin_marker(region: &str) -> String {
    format!("<!-- BEGIN:{region} -->")
}

pub fn end_marker(region: &str) -> String {
    format!("<!-- END:{region} -->")
}

/// Replace everything between the region's markers with `content`.
///
/// Text before the begin marker (inclusive) and from the end marker onward is
/// kept byte-for-byte.
pub fn splice(document: &str, region: &str, content: &str) -> std::result::Result<String, SpliceError> {
    let begin = begin_marker(region);
    let end = end_marker(region);
    let region_owned = || region.to_string();

    let begin_at = unique_position(document, &begin, region)?
        .ok_or_else(|| SpliceError::MissingBegin { region: region_owned() })?;
    let end_at = unique_position(document, &end, region)?
        .ok_or_else(|| SpliceError::MissingEnd { region: region_owned() })?;

    let inner_start = begin_at + begin.len();
    if end_at < inner_start {
        return Err(SpliceError::OutOfOrder { region: region_owned() });
    }

    let mut out = String::with_capacity(document.len() + content.len());
    out.push_str(&document[..inner_start]);
    out.push('\n');
    out.push_str(content);
    out.push('\n');
    out.push_str(END_INDENT);
    out.push_str(&document[end_at..]);
    Ok(out)
}

/// Byte offset of `marker` if it occurs exactly once.
fn unique_position(
    document: &str,
    marker: &str,
    region: &str,
) -> std::result::Result<Option<usize>, SpliceError> {
    let mut hits = document.match_indices(marker).map(|(idx, _)| idx);
    let first = hits.next();
    if hits.next().is_some() {
        return Err(SpliceError::DuplicateMarker {
            region: region.to_string(),
        });
    }
    Ok(first)
}

/// Splice `content` into the file at `path` and write it back.
///
/// Returns `Ok(false)` and leaves the file alone when the markers are unusable;
/// read and write failures propagate.
pub fn splice_file(path: &Path, region: &str, content: &str) -> Result<bool> {
    let document = std::fs::read_to_string(path).map_err(|e| PagesmithError::io(path, e))?;

    match splice(&document, region, content) {
        Ok(updated) => {
            std::fs::write(path, updated).map_err(|e| PagesmithError::io(path, e))?;
            debug!(path = %path.display(), region, "region updated");
            Ok(true)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "region not updated");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<main>\n        <!-- BEGIN:cards -->\n        <p>old</p>\n        <!-- END:cards -->\n</main>\n";

    #[test]
    fn replaces_region_content() {
        let out = splice(PAGE, "cards", "<p>new</p>").unwrap();
        assert_eq!(
            out,
            "<main>\n        <!-- BEGIN:cards -->\n<p>new</p>\n        <!-- END:cards -->\n</main>\n"
        );
    }

    #[test]
    fn resplicing_only_touches_the_region() {
        let once = splice(PAGE, "cards", "first").unwrap();
        let twice = splice(&once, "cards", "second").unwrap();

        assert_eq!(twice, splice(PAGE, "cards", "second").unwrap());
        let (prefix, _) = PAGE.split_once("<!-- BEGIN:cards -->").unwrap();
        assert!(twice.starts_with(prefix));
        assert!(twice.ends_with("<!-- END:cards -->\n</main>\n"));
    }

    #[test]
    fn other_regions_are_left_alone() {
        let doc = format!("{PAGE}<!-- BEGIN:other -->keep<!-- END:other -->");
        let out = splice(&doc, "cards", "x").unwrap();
        assert!(out.ends_with("<!-- BEGIN:other -->keep<!-- END:other -->"));
    }

    #[test]
    fn missing_markers() {
        assert_eq!(
            splice("<p>no markers</p>", "cards", "x"),
            Err(SpliceError::MissingBegin {
                region: "cards".into()
            })
        );
        assert_eq!(
            splice("<!-- BEGIN:cards -->", "cards", "x"),
            Err(SpliceError::MissingEnd {
                region: "cards".into()
            })
        );
    }

    #[test]
    fn duplicate_and_reversed_markers() {
        let dup = "<!-- BEGIN:a --><!-- END:a --><!-- BEGIN:a -->";
        assert!(matches!(
            splice(dup, "a", "x"),
            Err(SpliceError::DuplicateMarker { .. })
        ));

        let reversed = "<!-- END:a --> text <!-- BEGIN:a -->";
        assert!(matches!(
            splice(reversed, "a", "x"),
            Err(SpliceError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn region_names_match_exactly() {
        let doc = "<!-- BEGIN:cards-extra -->x<!-- END:cards-extra -->";
        assert!(splice(doc, "cards", "y").is_err());
    }

    #[test]
    fn splice_file_writes_on_success_only() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.html");
        let bad = dir.path().join("bad.html");
        std::fs::write(&good, PAGE).unwrap();
        std::fs::write(&bad, "<p>plain</p>").unwrap();

        assert!(splice_file(&good, "cards", "<p>fresh</p>").unwrap());
        assert!(std::fs::read_to_string(&good).unwrap().contains("<p>fresh</p>"));

        assert!(!splice_file(&bad, "cards", "<p>fresh</p>").unwrap());
        assert_eq!(std::fs::read_to_string(&bad).unwrap(), "<p>plain</p>");
    }

    #[test]
    fn splice_file_propagates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = splice_file(&dir.path().join("nope.html"), "cards", "x").unwrap_err();
        assert!(matches!(err, PagesmithError::Io { .. }));
    }
}
