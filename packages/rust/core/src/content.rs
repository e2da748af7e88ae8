//! JSON content records and field-precedence resolution.
//!
//! A record's displayed fields come from, in order: the record itself, the
//! metadata scraped from its URL, then a built-in default.

use std::path::Path;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::debug;

use pagesmith_shared::{
    FetchedMetadata, Find, PLACEHOLDER_URL, PagesmithError, Project, Publication, Result,
    non_empty,
};

/// Fallback title for finds and publications.
pub const UNTITLED: &str = "Untitled";

/// Publication cover images keyed by publication type.
const PUBLICATION_IMAGES: [(&str, &str); 5] = [
    (
        "journal",
        "https://images.unsplash.com/photo-1532094349884-543bc11b234d?w=400&q=80",
    ),
    (
        "conference",
        "https://images.unsplash.com/photo-1517976487492-5750f3195933?w=400&q=80",
    ),
    (
        "thesis",
        "https://images.unsplash.com/photo-1456513080510-7bf3a84b82f8?w=400&q=80",
    ),
    (
        "preprint",
        "https://images.unsplash.com/photo-1518152006812-edab29b069ac?w=400&q=80",
    ),
    (
        "workshop",
        "https://images.unsplash.com/photo-1635070041078-e363dbe005cb?w=400&q=80",
    ),
];

/// Project images picked from when a project has none.
const PROJECT_IMAGES: [&str; 3] = [
    "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=800&q=80",
    "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=800&q=80",
    "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=800&q=80",
];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read a JSON array of records from `path`.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path).map_err(|e| PagesmithError::io(path, e))?;

    let records: Vec<T> = serde_json::from_str(&content)
        .map_err(|e| PagesmithError::parse(format!("{}: {e}", path.display())))?;

    debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

// ---------------------------------------------------------------------------
// Default images
// ---------------------------------------------------------------------------

/// Cover image for a publication type; unknown types use the journal image.
pub fn default_publication_image(kind: &str) -> &'static str {
    PUBLICATION_IMAGES
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(PUBLICATION_IMAGES[0].1, |(_, image)| *image)
}

/// Stable pick from [`PROJECT_IMAGES`], keyed by a SHA-256 of `seed`.
pub fn default_project_image(seed: &str) -> &'static str {
    let digest = Sha256::digest(seed.as_bytes());
    PROJECT_IMAGES[digest[0] as usize % PROJECT_IMAGES.len()]
}

// ---------------------------------------------------------------------------
// Resolved views
// ---------------------------------------------------------------------------

/// A find's display fields after precedence resolution. Values are unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindView {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub url: String,
}

impl FindView {
    pub fn resolve(find: &Find, meta: &FetchedMetadata) -> Self {
        Self {
            title: first_of(&[find.title.as_deref(), meta.title.as_deref()])
                .unwrap_or(UNTITLED)
                .to_string(),
            description: first_of(&[find.notes.as_deref(), meta.description.as_deref()])
                .unwrap_or_default()
                .to_string(),
            image: first_of(&[find.image.as_deref(), meta.image.as_deref()]).map(str::to_string),
            url: link_target(find.url.as_deref()),
        }
    }
}

/// A publication's display fields after precedence resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationView {
    pub title: String,
    /// Authors joined with `, `.
    pub authors: String,
    pub venue: String,
    pub year: Option<String>,
    pub kind: String,
    pub image: String,
    pub url: String,
}

impl PublicationView {
    pub fn resolve(publication: &Publication, meta: &FetchedMetadata) -> Self {
        Self {
            title: first_of(&[publication.title.as_deref(), meta.title.as_deref()])
                .unwrap_or(UNTITLED)
                .to_string(),
            authors: publication.authors.join(", "),
            venue: first_of(&[publication.venue.as_deref(), meta.site_name.as_deref()])
                .unwrap_or_default()
                .to_string(),
            year: publication
                .year
                .as_ref()
                .map(|y| y.to_string())
                .filter(|y| !y.is_empty()),
            kind: publication.kind.clone(),
            image: first_of(&[publication.image.as_deref(), meta.image.as_deref()])
                .unwrap_or_else(|| default_publication_image(&publication.kind))
                .to_string(),
            url: link_target(publication.url.as_deref()),
        }
    }
}

/// A project's display fields. Projects are never enriched from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectView {
    pub title: String,
    pub description: String,
    pub status: String,
    /// Tech stack joined with `, `.
    pub tech: String,
    pub image: String,
    pub url: String,
}

impl ProjectView {
    pub fn resolve(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            status: project.status.clone(),
            tech: project.tech.join(", "),
            image: non_empty(project.image.as_deref())
                .unwrap_or_else(|| default_project_image(&project.title))
                .to_string(),
            url: link_target(project.url.as_deref()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// `true` when `url` points somewhere real.
pub fn has_link(url: &str) -> bool {
    url != PLACEHOLDER_URL
}

fn first_of<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().find_map(|c| non_empty(*c))
}

fn link_target(url: Option<&str>) -> String {
    non_empty(url).unwrap_or(PLACEHOLDER_URL).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_shared::Year;

    fn meta() -> FetchedMetadata {
        FetchedMetadata {
            title: Some("Fetched Title".into()),
            description: Some("Fetched description".into()),
            image: Some("https://example.com/og.png".into()),
            site_name: Some("Example Site".into()),
        }
    }

    fn find(json: &str) -> Find {
        serde_json::from_str(json).expect("find json")
    }

    #[test]
    fn record_fields_beat_metadata() {
        let view = FindView::resolve(
            &find(r#"{"title": "Mine", "notes": "My notes", "image": "/mine.png", "url": "https://a.b"}"#),
            &meta(),
        );
        assert_eq!(view.title, "Mine");
        assert_eq!(view.description, "My notes");
        assert_eq!(view.image.as_deref(), Some("/mine.png"));
        assert_eq!(view.url, "https://a.b");
    }

    #[test]
    fn metadata_fills_blank_fields() {
        let view = FindView::resolve(&find(r#"{"title": "", "url": "https://a.b"}"#), &meta());
        assert_eq!(view.title, "Fetched Title");
        assert_eq!(view.description, "Fetched description");
        assert_eq!(view.image.as_deref(), Some("https://example.com/og.png"));
    }

    #[test]
    fn defaults_apply_without_metadata() {
        let view = FindView::resolve(&find("{}"), &FetchedMetadata::default());
        assert_eq!(view.title, UNTITLED);
        assert_eq!(view.description, "");
        assert!(view.image.is_none());
        assert_eq!(view.url, PLACEHOLDER_URL);
        assert!(!has_link(&view.url));
    }

    #[test]
    fn publication_resolution() {
        let publication = Publication {
            title: None,
            authors: vec!["A. Lovelace".into(), "G. Hopper".into()],
            venue: None,
            year: Some(Year::Number(1843)),
            kind: "thesis".into(),
            image: None,
            url: None,
        };

        let view = PublicationView::resolve(&publication, &meta());
        assert_eq!(view.title, "Fetched Title");
        assert_eq!(view.authors, "A. Lovelace, G. Hopper");
        assert_eq!(view.venue, "Example Site");
        assert_eq!(view.year.as_deref(), Some("1843"));
        assert_eq!(view.image, "https://example.com/og.png");

        let bare = PublicationView::resolve(&publication, &FetchedMetadata::default());
        assert_eq!(bare.image, default_publication_image("thesis"));
        assert_eq!(bare.venue, "");
    }

    #[test]
    fn unknown_publication_type_uses_journal_image() {
        assert_eq!(
            default_publication_image("blog"),
            default_publication_image("journal")
        );
        assert_ne!(
            default_publication_image("thesis"),
            default_publication_image("journal")
        );
    }

    #[test]
    fn project_image_is_deterministic() {
        let a = default_project_image("Compiler in a Weekend");
        let b = default_project_image("Compiler in a Weekend");
        assert_eq!(a, b);
        assert!(PROJECT_IMAGES.contains(&a));
    }

    #[test]
    fn project_view_joins_tech() {
        let project: Project = serde_json::from_str(
            r#"{"title": "Pagesmith", "tech": ["Rust", "HTML"], "status": "completed"}"#,
        )
        .expect("project json");
        let view = ProjectView::resolve(&project);
        assert_eq!(view.tech, "Rust, HTML");
        assert!(!view.is_active());
        assert_eq!(view.image, default_project_image("Pagesmith"));
    }

    #[test]
    fn load_records_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("finds.json");
        std::fs::write(&path, "[{").expect("write");

        let err = load_records::<Find>(&path).unwrap_err();
        assert!(err.to_string().contains("finds.json"));
    }
}
