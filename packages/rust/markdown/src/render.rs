//! Markdown-to-HTML rendering pipeline.
//!
//! Each pass is a function `&str -> String` applied in sequence. Order is
//! load-bearing: escaping runs before any markup is introduced, and longer
//! markers are rewritten before shorter ones so later passes never re-match
//! text an earlier pass produced.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{instrument, trace};

use crate::escape::escape_text;

/// Render a Markdown document to an HTML fragment.
///
/// Deterministic: identical input always yields identical output.
#[instrument(skip_all, fields(len = markdown.len()))]
pub fn render(markdown: &str) -> String {
    let mut html = normalize_line_endings(markdown);

    html = escape_text(&html);
    html = blockquotes(&html);
    html = headings(&html);
    html = horizontal_rules(&html);
    html = emphasis(&html);
    html = code_spans(&html);
    html = links(&html);
    html = list_items(&html);
    html = paragraphs(&html);

    trace!(out_len = html.len(), "markdown rendered");
    html
}

// ---------------------------------------------------------------------------
// Pass 1: Line endings
// ---------------------------------------------------------------------------

fn normalize_line_endings(md: &str) -> String {
    md.replace("\r\n", "\n").replace('\r', "\n")
}

// ---------------------------------------------------------------------------
// Pass 3: Blockquotes
// ---------------------------------------------------------------------------

/// Turn `&gt;`-prefixed lines into blockquotes, merging adjacent lines into one.
///
/// The merged quote stays on a single line so the line-oriented passes below
/// cannot mistake its contents for headings or list items.
fn blockquotes(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut quote: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if let Some(rest) = line.strip_prefix("&gt;") {
            quote.push(rest.strip_prefix(' ').unwrap_or(rest).trim_end());
            continue;
        }
        flush_quote(&mut quote, &mut out);
        out.push(line.to_string());
    }
    flush_quote(&mut quote, &mut out);

    out.join("\n")
}

fn flush_quote(quote: &mut Vec<&str>, out: &mut Vec<String>) {
    if quote.is_empty() {
        return;
    }
    out.push(format!("<blockquote>{}</blockquote>", quote.join("<br>")));
    quote.clear();
}

// ---------------------------------------------------------------------------
// Pass 4: Headings
// ---------------------------------------------------------------------------

/// `######` down to `#`; six must match before one.
fn headings(text: &str) -> String {
    static HEADING_RES: LazyLock<Vec<(usize, Regex)>> = LazyLock::new(|| {
        (1..=6)
            .rev()
            .map(|level| {
                let re = Regex::new(&format!(r"(?m)^#{{{level}}}[ \t]+(.+?)[ \t]*$"))
                    .expect("valid regex");
                (level, re)
            })
            .collect()
    });

    let mut result = text.to_string();
    for (level, re) in HEADING_RES.iter() {
        let replacement = format!("<h{level}>${{1}}</h{level}>");
        result = re.replace_all(&result, replacement.as_str()).into_owned();
    }
    result
}

// ---------------------------------------------------------------------------
// Pass 5: Horizontal rules
// ---------------------------------------------------------------------------

fn horizontal_rules(text: &str) -> String {
    static HR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^(?:\*{3,}|-{3,}|_{3,})[ \t]*$").expect("valid regex")
    });

    HR_RE.replace_all(text, "<hr>").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 6: Emphasis
// ---------------------------------------------------------------------------

/// Triple, then double, then single markers.
///
/// `*` markers must hug non-space text (so `* item` stays a list marker);
/// `_` markers must sit on word boundaries (so `snake_case` is left alone).
fn emphasis(text: &str) -> String {
    static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
        [
            (
                r"\*\*\*(\S(?:[^\n]*?\S)?)\*\*\*",
                "<strong><em>${1}</em></strong>",
            ),
            (
                r"(?m)(^|\W)___(\S(?:[^\n]*?\S)?)___\b",
                "${1}<strong><em>${2}</em></strong>",
            ),
            (r"\*\*(\S(?:[^\n]*?\S)?)\*\*", "<strong>${1}</strong>"),
            (
                r"(?m)(^|\W)__(\S(?:[^\n]*?\S)?)__\b",
                "${1}<strong>${2}</strong>",
            ),
            (r"\*([^\s*](?:[^\n*]*?[^\s*])?)\*", "<em>${1}</em>"),
            (
                r"(?m)(^|\W)_([^\s_](?:[^\n_]*?[^\s_])?)_\b",
                "${1}<em>${2}</em>",
            ),
        ]
        .into_iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
        .collect()
    });

    let mut result = text.to_string();
    for (re, replacement) in RULES.iter() {
        result = re.replace_all(&result, *replacement).into_owned();
    }
    result
}

// ---------------------------------------------------------------------------
// Pass 7: Code spans
// ---------------------------------------------------------------------------

fn code_spans(text: &str) -> String {
    static CODE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));

    CODE_RE.replace_all(text, "<code>${1}</code>").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 8: Links
// ---------------------------------------------------------------------------

fn links(text: &str) -> String {
    static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"\[([^\]\n]+)\]\(([^)\s"]+)\)"#).expect("valid regex")
    });

    LINK_RE
        .replace_all(text, r#"<a href="${2}">${1}</a>"#)
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 9: Lists
// ---------------------------------------------------------------------------

/// Convert item lines first, then wrap each run of adjacent items once.
fn list_items(text: &str) -> String {
    static ITEM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^[*-][ \t]+(.+?)[ \t]*$").expect("valid regex"));

    let items = ITEM_RE.replace_all(text, "<li>${1}</li>");

    let mut out: Vec<&str> = Vec::new();
    let mut in_list = false;
    for line in items.split('\n') {
        let is_item = line.starts_with("<li>");
        if is_item && !in_list {
            out.push("<ul>");
        } else if !is_item && in_list {
            out.push("</ul>");
        }
        in_list = is_item;
        out.push(line);
    }
    if in_list {
        out.push("</ul>");
    }

    out.join("\n")
}

// ---------------------------------------------------------------------------
// Pass 10: Paragraphs
// ---------------------------------------------------------------------------

/// Split on blank lines and wrap loose text in `<p>`, single newlines becoming `<br>`.
///
/// Lines that already open or close a block element pass through untouched;
/// runs of loose lines between them become their own paragraphs.
fn paragraphs(text: &str) -> String {
    static BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("valid regex"));
    static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^</?(?:h[1-6]|hr|blockquote|ul|ol|li|p|pre|div)\b").expect("valid regex")
    });

    let mut out: Vec<String> = Vec::new();

    for block in BLANK_RE.split(text) {
        let mut loose: Vec<&str> = Vec::new();

        for line in block.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if BLOCK_TAG_RE.is_match(line) {
                flush_paragraph(&mut loose, &mut out);
                out.push(line.to_string());
            } else {
                loose.push(line);
            }
        }
        flush_paragraph(&mut loose, &mut out);
    }

    out.join("\n")
}

fn flush_paragraph(lines: &mut Vec<&str>, out: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    out.push(format!("<p>{}</p>", lines.join("<br>\n")));
    lines.clear();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paragraphs_are_wrapped_and_escaped() {
        let html = render("Fish & chips <b>now</b>\n\nSecond > first");
        assert_eq!(
            html,
            "<p>Fish &amp; chips &lt;b&gt;now&lt;/b&gt;</p>\n<p>Second &gt; first</p>"
        );
    }

    #[test]
    fn single_newlines_become_line_breaks() {
        assert_eq!(render("one\ntwo"), "<p>one<br>\ntwo</p>");
    }

    #[test]
    fn crlf_input_matches_lf_input() {
        assert_eq!(render("a\r\nb\r\n\r\nc"), render("a\nb\n\nc"));
    }

    #[test]
    fn heading_levels_match_longest_first() {
        assert_eq!(render("###### x"), "<h6>x</h6>");
        assert_eq!(render("# x"), "<h1>x</h1>");
        assert_eq!(render("### Three ###"), "<h3>Three ###</h3>");
    }

    #[test]
    fn hashtag_without_space_is_not_a_heading() {
        assert_eq!(render("#rustlang"), "<p>#rustlang</p>");
    }

    #[test]
    fn triple_emphasis_nests() {
        assert_eq!(
            render("***bold-italic***"),
            "<p><strong><em>bold-italic</em></strong></p>"
        );
        assert_eq!(
            render("___both___"),
            "<p><strong><em>both</em></strong></p>"
        );
    }

    #[test]
    fn double_and_single_emphasis() {
        assert_eq!(
            render("**bold** and *it* and __b2__ and _i2_"),
            "<p><strong>bold</strong> and <em>it</em> and <strong>b2</strong> and <em>i2</em></p>"
        );
    }

    #[test]
    fn snake_case_is_untouched() {
        assert_eq!(render("call my_var_name now"), "<p>call my_var_name now</p>");
    }

    #[test]
    fn code_spans_and_links() {
        assert_eq!(
            render("Run `cargo test` or see [docs](https://example.com/a?b=1&c=2)."),
            "<p>Run <code>cargo test</code> or see <a href=\"https://example.com/a?b=1&amp;c=2\">docs</a>.</p>"
        );
    }

    #[test]
    fn adjacent_list_items_share_one_container() {
        let html = render("- one\n- two\n- three");
        assert_eq!(
            html,
            "<ul>\n<li>one</li>\n<li>two</li>\n<li>three</li>\n</ul>"
        );
        assert_eq!(html.matches("<ul>").count(), 1);
    }

    #[test]
    fn star_items_keep_inline_emphasis() {
        assert_eq!(
            render("* a *b* c\n* **d**"),
            "<ul>\n<li>a <em>b</em> c</li>\n<li><strong>d</strong></li>\n</ul>"
        );
    }

    #[test]
    fn separated_lists_get_separate_containers() {
        let html = render("- a\n\nbetween\n\n- b");
        assert_eq!(html.matches("<ul>").count(), 2);
        assert!(html.contains("<p>between</p>"));
    }

    #[test]
    fn list_directly_after_text_is_not_swallowed() {
        assert_eq!(
            render("Shopping:\n- eggs\n- milk"),
            "<p>Shopping:</p>\n<ul>\n<li>eggs</li>\n<li>milk</li>\n</ul>"
        );
    }

    #[test]
    fn horizontal_rules() {
        assert_eq!(render("a\n\n---\n\nb"), "<p>a</p>\n<hr>\n<p>b</p>");
        assert_eq!(render("***"), "<hr>");
        assert_eq!(render("_____"), "<hr>");
    }

    #[test]
    fn adjacent_quote_lines_merge() {
        assert_eq!(
            render("> first\n> second\n\nafter"),
            "<blockquote>first<br>second</blockquote>\n<p>after</p>"
        );
    }

    #[test]
    fn quoted_list_marker_stays_in_quote() {
        assert_eq!(
            render("> - not an item"),
            "<blockquote>- not an item</blockquote>"
        );
    }

    #[test]
    fn raw_html_is_escaped_not_interpreted() {
        let html = render("<h1>fake</h1>");
        assert_eq!(html, "<p>&lt;h1&gt;fake&lt;/h1&gt;</p>");
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render(""), "");
        assert_eq!(render("\n\n\n"), "");
    }

    #[test]
    fn rendering_is_deterministic() {
        let md = "# T\n\nSome *text* with [a](b).\n\n- x\n- y\n\n> q";
        assert_eq!(render(md), render(md));
    }
}
