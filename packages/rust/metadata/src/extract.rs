//! Pure extraction of Open Graph metadata from an HTML document.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use pagesmith_shared::FetchedMetadata;

/// Extract title, description, image and site name from raw HTML.
///
/// Meta tags are read through the HTML parser, so attribute order and quoting
/// style don't matter and entities come back decoded. Precedence:
/// - title: `og:title`, then `<title>`
/// - description: `og:description`, then `name="description"`
/// - image: `og:image` (root-relative paths resolved against `page_url`),
///   overridden by the thumbnail for YouTube URLs
/// - site_name: `og:site_name`
pub fn extract_metadata(html: &str, page_url: &Url) -> FetchedMetadata {
    let doc = Html::parse_document(html);
    let tags = MetaTags::collect(&doc);

    let mut meta = FetchedMetadata {
        title: tags
            .property("og:title")
            .or_else(|| document_title(&doc)),
        description: tags
            .property("og:description")
            .or_else(|| tags.name("description")),
        image: tags
            .property("og:image")
            .map(|image| absolutize(&image, page_url)),
        site_name: tags.property("og:site_name"),
    };

    if let Some(thumbnail) = youtube_thumbnail(page_url.as_str()) {
        meta.image = Some(thumbnail);
    }

    meta
}

/// Thumbnail URL for a YouTube watch or short link, if `url` is one.
pub fn youtube_thumbnail(url: &str) -> Option<String> {
    static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?:v=|youtu\.be/)([A-Za-z0-9_-]+)").expect("valid regex")
    });

    if !url.contains("youtube.com/watch") && !url.contains("youtu.be") {
        return None;
    }

    VIDEO_ID_RE
        .captures(url)
        .map(|caps| format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", &caps[1]))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One `<meta>` tag with non-empty content.
struct MetaTag {
    property: Option<String>,
    name: Option<String>,
    content: String,
}

/// All usable `<meta>` tags in document order.
struct MetaTags(Vec<MetaTag>);

impl MetaTags {
    fn collect(doc: &Html) -> Self {
        let selector = Selector::parse("meta[content]").expect("valid selector");

        let tags = doc
            .select(&selector)
            .filter_map(|el| {
                let content = el.value().attr("content")?.trim();
                if content.is_empty() {
                    return None;
                }
                Some(MetaTag {
                    property: el.value().attr("property").map(str::to_string),
                    name: el.value().attr("name").map(str::to_string),
                    content: content.to_string(),
                })
            })
            .collect();

        Self(tags)
    }

    /// First `content` whose `property` matches, case-insensitively.
    fn property(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|tag| tag.property.as_deref().is_some_and(|p| p.eq_ignore_ascii_case(key)))
            .map(|tag| tag.content.clone())
    }

    /// First `content` whose `name` matches, case-insensitively.
    fn name(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|tag| tag.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(key)))
            .map(|tag| tag.content.clone())
    }
}

/// Trimmed text of the first `<title>` element.
fn document_title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("valid selector");
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolve `/path` (and `//host/path`) against the page URL; leave others alone.
fn absolutize(image: &str, page_url: &Url) -> String {
    if !image.starts_with('/') {
        return image.to_string();
    }
    page_url
        .join(image)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| image.to_string())
}
