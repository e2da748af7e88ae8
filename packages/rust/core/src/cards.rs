//! HTML card fragments for each content type.
//!
//! Every value interpolated into a card is escaped; only the structural
//! markup is literal. Fragments start with a newline and are indented to sit
//! inside the page's marker region.

use pagesmith_markdown::escape_html;
use pagesmith_shared::{FetchedMetadata, Find, Project, Publication, WritingEntry, non_empty};

use crate::content::{FindView, ProjectView, PublicationView, has_link};
use crate::dates::format_display_date;
use crate::writing::Writing;

// ---------------------------------------------------------------------------
// Finds
// ---------------------------------------------------------------------------

/// Masonry card for a find, or the quote layout when `category == "quote"`.
pub fn render_find_card(find: &Find, meta: &FetchedMetadata) -> String {
    if find.category == "quote" {
        return render_quote_card(find);
    }

    let view = FindView::resolve(find, meta);
    let title = escape_html(&view.title);
    let category = escape_html(&find.category);

    let size_class = match find.size.as_str() {
        "large" => " masonry__item--large",
        "medium" => " masonry__item--medium",
        _ => "",
    };

    let image_html = view
        .image
        .as_deref()
        .map(|image| {
            format!(
                r#"
            <div class="masonry__image">
              <img src="{}" alt="{title}" loading="lazy">
            </div>"#,
                escape_html(image)
            )
        })
        .unwrap_or_default();

    format!(
        r#"
          <article class="masonry__item{size_class}" data-category="{category}">{image_html}
            <div class="masonry__content">
              <span class="masonry__category masonry__category--{category}">{label}</span>
              <h3 class="masonry__title"><a href="{url}" target="_blank" rel="noopener">{title}</a></h3>
              <p class="masonry__description">{description}</p>
            </div>
          </article>"#,
        label = escape_html(&capitalize(&find.category)),
        url = escape_html(&view.url),
        description = escape_html(&view.description),
    )
}

fn render_quote_card(find: &Find) -> String {
    let notes = non_empty(find.notes.as_deref())
        .map(|n| format!(". {}", escape_html(n)))
        .unwrap_or_default();

    format!(
        r#"
          <article class="masonry__item" data-category="quote">
            <div class="masonry__content">
              <span class="masonry__category masonry__category--quote">Quote</span>
              <blockquote class="masonry__quote">"{quote}"</blockquote>
              <p class="masonry__description">— {author}{notes}</p>
            </div>
          </article>"#,
        quote = escape_html(find.quote.as_deref().unwrap_or_default()),
        author = escape_html(find.author.as_deref().unwrap_or_default()),
    )
}

// ---------------------------------------------------------------------------
// Publications & projects
// ---------------------------------------------------------------------------

/// Uniform card for a publication.
pub fn render_publication_card(publication: &Publication, meta: &FetchedMetadata) -> String {
    let view = PublicationView::resolve(publication, meta);
    let title = escape_html(&view.title);
    let url = escape_html(&view.url);

    let meta_line = match &view.year {
        Some(year) => format!("{}, {}", escape_html(&view.venue), escape_html(year)),
        None => escape_html(&view.venue),
    };

    format!(
        r#"
        <article class="uniform-card">
          <div class="uniform-card__image">
            <img src="{image}" alt="{title}" loading="lazy">
          </div>
          <div class="uniform-card__content">
            <span class="uniform-card__tag uniform-card__tag--publication">{kind}</span>
            <h3 class="uniform-card__title">
              <a href="{url}" target="_blank" rel="noopener">{title}</a>
            </h3>
            <p class="uniform-card__description">{authors}</p>
            <span class="uniform-card__meta">{meta_line}</span>{links}
          </div>
        </article>"#,
        image = escape_html(&view.image),
        kind = escape_html(&capitalize(&view.kind)),
        authors = escape_html(&view.authors),
        links = view_link(&view.url),
    )
}

/// Uniform card for a project.
pub fn render_project_card(project: &Project) -> String {
    let view = ProjectView::resolve(project);
    let title = escape_html(&view.title);

    let status_class = if view.is_active() {
        "uniform-card__tag--active"
    } else {
        "uniform-card__tag--completed"
    };

    format!(
        r#"
        <article class="uniform-card">
          <div class="uniform-card__image">
            <img src="{image}" alt="{title}" loading="lazy">
          </div>
          <div class="uniform-card__content">
            <span class="uniform-card__tag {status_class}">{status}</span>
            <h3 class="uniform-card__title">
              <a href="{url}" target="_blank" rel="noopener">{title}</a>
            </h3>
            <p class="uniform-card__description">{description}</p>
            <span class="uniform-card__meta">{tech}</span>{links}
          </div>
        </article>"#,
        image = escape_html(&view.image),
        status = escape_html(&capitalize(&view.status)),
        url = escape_html(&view.url),
        description = escape_html(&view.description),
        tech = escape_html(&view.tech),
        links = view_link(&view.url),
    )
}

/// The "View" action, present only for real links.
fn view_link(url: &str) -> String {
    if !has_link(url) {
        return String::new();
    }
    format!(
        r#"
            <div class="uniform-card__links">
              <a href="{}" class="uniform-card__link" target="_blank" rel="noopener">View</a>
            </div>"#,
        escape_html(url)
    )
}

// ---------------------------------------------------------------------------
// Writing lists
// ---------------------------------------------------------------------------

/// List item for a `writing.json` entry. `link_base` comes from [`writing_link_base`].
pub fn render_writing_item(entry: &WritingEntry, link_base: &str) -> String {
    let (_, short_date) = format_display_date(&entry.date);
    let href = writing_href(link_base, entry.slug.as_deref());

    format!(
        r#"
          <li class="list__item">
            <a href="{href}" class="list__link">
              <span class="list__title">{title}</span>
              <span class="list__meta">{date}</span>
            </a>
          </li>"#,
        href = escape_html(&href),
        title = escape_html(&entry.title),
        date = escape_html(&short_date),
    )
}

/// List item for a Markdown writing, with its excerpt.
pub fn render_writing_summary(writing: &Writing, link_base: &str) -> String {
    let href = writing_href(link_base, Some(&writing.slug));

    format!(
        r#"
          <li class="list__item">
            <a href="{href}" class="list__link">
              <span class="list__title">{title}</span>
              <span class="list__meta">{date}</span>
            </a>
            <p class="list__excerpt">{excerpt}</p>
          </li>"#,
        href = escape_html(&href),
        title = escape_html(&writing.title),
        date = escape_html(&writing.date),
        excerpt = escape_html(&writing.excerpt),
    )
}

/// Site-absolute URL prefix for writing pages written to `output_dir`.
///
/// `"writing"` and `"./writing/"` both give `/writing`; an empty dir gives `""`.
pub fn writing_link_base(output_dir: &str) -> String {
    output_dir
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .fold(String::new(), |mut base, segment| {
            base.push('/');
            base.push_str(segment);
            base
        })
}

fn writing_href(link_base: &str, slug: Option<&str>) -> String {
    match non_empty(slug) {
        Some(slug) => format!("{link_base}/{slug}.html"),
        None => "#".to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_shared::Year;

    fn find(json: &str) -> Find {
        serde_json::from_str(json).expect("find json")
    }

    #[test]
    fn find_card_escapes_and_uses_metadata() {
        let meta = FetchedMetadata {
            title: Some("Tom & Jerry <Remastered>".into()),
            description: Some("Cat \"vs\" mouse".into()),
            image: Some("https://img.example.com/a.jpg?x=1&y=2".into()),
            site_name: None,
        };
        let html = render_find_card(
            &find(r#"{"url": "https://example.com/v", "category": "video", "size": "large"}"#),
            &meta,
        );

        assert!(html.contains(r#"class="masonry__item masonry__item--large" data-category="video""#));
        assert!(html.contains("Tom &amp; Jerry &lt;Remastered&gt;"));
        assert!(html.contains("Cat &quot;vs&quot; mouse"));
        assert!(html.contains(r#"src="https://img.example.com/a.jpg?x=1&amp;y=2""#));
        assert!(html.contains(">Video</span>"));
        assert!(!html.contains("<Remastered>"));
    }

    #[test]
    fn find_card_without_image_has_no_image_block() {
        let html = render_find_card(&find(r#"{"title": "Bare"}"#), &FetchedMetadata::default());
        assert!(!html.contains("masonry__image"));
        assert!(html.contains(r##"<a href="#" target="_blank""##));
        assert!(html.contains(r#"class="masonry__item" data-category="link""#));
    }

    #[test]
    fn quote_layout_for_quote_category() {
        let html = render_find_card(
            &find(
                r#"{"category": "quote", "quote": "Simple > clever", "author": "Someone", "notes": "Heard at a talk"}"#,
            ),
            &FetchedMetadata {
                title: Some("ignored".into()),
                ..Default::default()
            },
        );

        assert!(html.contains(r#"data-category="quote""#));
        assert!(html.contains(r#"<blockquote class="masonry__quote">"Simple &gt; clever"</blockquote>"#));
        assert!(html.contains("— Someone. Heard at a talk</p>"));
        assert!(!html.contains("ignored"));
    }

    #[test]
    fn quote_without_notes_has_no_trailing_period() {
        let html = render_find_card(
            &find(r#"{"category": "quote", "quote": "Q", "author": "A"}"#),
            &FetchedMetadata::default(),
        );
        assert!(html.contains("— A</p>"));
    }

    fn publication(url: Option<&str>) -> Publication {
        Publication {
            title: Some("Parsing Things".into()),
            authors: vec!["Ada".into(), "Grace".into()],
            venue: Some("PLDI".into()),
            year: Some(Year::Number(2022)),
            kind: "conference".into(),
            image: None,
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn publication_card_fields() {
        let html = render_publication_card(
            &publication(Some("https://doi.org/10.1/x")),
            &FetchedMetadata::default(),
        );
        assert!(html.contains(">Conference</span>"));
        assert!(html.contains(">Ada, Grace</p>"));
        assert!(html.contains(">PLDI, 2022</span>"));
        assert!(html.contains(">View</a>"));
    }

    #[test]
    fn placeholder_url_hides_view_link() {
        let html = render_publication_card(&publication(None), &FetchedMetadata::default());
        assert!(!html.contains("View"));

        let project: Project = serde_json::from_str(r##"{"title": "P", "url": "#"}"##).unwrap();
        assert!(!render_project_card(&project).contains("View"));
    }

    #[test]
    fn project_card_status_classes() {
        let active: Project =
            serde_json::from_str(r#"{"title": "A", "tech": ["Rust", "SQL"], "url": "https://a.dev"}"#)
                .unwrap();
        let html = render_project_card(&active);
        assert!(html.contains("uniform-card__tag--active\">Active"));
        assert!(html.contains(">Rust, SQL</span>"));
        assert!(html.contains(">View</a>"));

        let done: Project = serde_json::from_str(r#"{"title": "B", "status": "completed"}"#).unwrap();
        assert!(render_project_card(&done).contains("uniform-card__tag--completed\">Completed"));
    }

    #[test]
    fn writing_items_link_by_slug() {
        let entry: WritingEntry =
            serde_json::from_str(r#"{"title": "On <Tools>", "slug": "on-tools", "date": "2024-03-05"}"#)
                .unwrap();
        let html = render_writing_item(&entry, "/writing");
        assert!(html.contains(r#"href="/writing/on-tools.html""#));
        assert!(html.contains("On &lt;Tools&gt;"));
        assert!(html.contains(">March 2024</span>"));

        let no_slug: WritingEntry = serde_json::from_str(r#"{"title": "Draft"}"#).unwrap();
        assert!(render_writing_item(&no_slug, "/writing").contains(r##"href="#""##));
    }

    #[test]
    fn writing_summary_includes_excerpt() {
        let writing = Writing {
            title: "Slow & Steady".into(),
            date: "March 2024".into(),
            slug: "slow-steady".into(),
            body_html: "<p>x</p>".into(),
            excerpt: "It was a <quiet> year.".into(),
        };
        let html = render_writing_summary(&writing, "/posts/2024");
        assert!(html.contains(r#"href="/posts/2024/slow-steady.html""#));
        assert!(html.contains("Slow &amp; Steady"));
        assert!(html.contains("It was a &lt;quiet&gt; year."));
    }

    #[test]
    fn link_base_follows_output_dir() {
        assert_eq!(writing_link_base("writing"), "/writing");
        assert_eq!(writing_link_base("./posts/"), "/posts");
        assert_eq!(writing_link_base("blog//posts"), "/blog/posts");
        assert_eq!(writing_link_base(""), "");
    }

    #[test]
    fn capitalize_first_char_only() {
        assert_eq!(capitalize("journal"), "Journal");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }
}
