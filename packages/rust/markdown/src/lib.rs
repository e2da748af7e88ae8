//! Markdown-to-HTML rendering and HTML escaping.
//!
//! Renders the small Markdown dialect used by site writings (headings,
//! emphasis, code spans, links, flat lists, blockquotes, rules, paragraphs)
//! through a fixed sequence of rewrite passes. No tables, code fences,
//! nested lists, or reference-style links.

pub mod escape;
mod render;

pub use escape::{escape_html, escape_text, strip_tags, unescape_text};
pub use render::render;
