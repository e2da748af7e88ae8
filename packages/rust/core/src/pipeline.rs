//! End-to-end site build: data files → metadata → cards → spliced pages.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use pagesmith_metadata::{FetchOptions, MetadataFetcher};
use pagesmith_shared::{
    FetchConfig, FetchedMetadata, Find, Project, Publication, Result, SiteConfig, WritingEntry,
    non_empty,
};

use crate::cards::{
    render_find_card, render_project_card, render_publication_card, render_writing_item,
    render_writing_summary, writing_link_base,
};
use crate::content::load_records;
use crate::pages::write_writing_pages;
use crate::splice::splice_file;
use crate::writing::{has_markdown_sources, load_writings, sort_entries};

/// Configuration for [`build_site`].
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Site root; target pages live here and config paths are relative to it.
    pub root: PathBuf,
    pub site: SiteConfig,
}

/// What a build did.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub finds: usize,
    pub publications: usize,
    pub projects: usize,
    pub writings: usize,
    /// Standalone writing pages generated.
    pub pages_written: usize,
    /// Writing sources that failed to parse.
    pub skipped_documents: Vec<String>,
    /// `page#region` for every region updated.
    pub regions_updated: Vec<String>,
    /// `page#region` for every region whose markers were unusable.
    pub regions_missing: Vec<String>,
    pub elapsed: Duration,
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when starting a content type.
    fn phase(&self, name: &str);
    /// Called after each record is rendered.
    fn record_rendered(&self, kind: &str, current: usize, total: usize);
    /// Called when the build completes.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn record_rendered(&self, _kind: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &BuildReport) {}
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Metadata lookups with a politeness delay after each network request.
struct Enricher {
    fetcher: Option<MetadataFetcher>,
    delay: Duration,
}

impl Enricher {
    fn new(config: &FetchConfig) -> Result<Self> {
        let fetcher = if config.enabled {
            Some(MetadataFetcher::new(&FetchOptions::from(config))?)
        } else {
            info!("metadata fetching disabled");
            None
        };

        Ok(Self {
            fetcher,
            delay: Duration::from_millis(config.delay_ms),
        })
    }

    async fn lookup(&self, url: Option<&str>) -> FetchedMetadata {
        let (Some(fetcher), Some(url)) = (&self.fetcher, non_empty(url)) else {
            return FetchedMetadata::default();
        };

        let meta = fetcher.fetch(Some(url)).await;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        meta
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Run the full build.
///
/// 1. Finds → `index.html#finds`
/// 2. Publications → `publications.html#publications`
/// 3. Projects → `projects.html#projects`
/// 4. Writing → `writing.html#writing`, plus one page per Markdown writing
///
/// A content type whose data file is absent is skipped. Unusable markers are
/// reported in [`BuildReport::regions_missing`] and do not stop the build.
#[instrument(skip_all, fields(root = %config.root.display()))]
pub async fn build_site(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<BuildReport> {
    let start = Instant::now();
    let root = config.root.as_path();
    let paths = &config.site.paths;
    let data_dir = root.join(&paths.data_dir);
    let enricher = Enricher::new(&config.site.fetch)?;
    let mut report = BuildReport::default();

    info!(data_dir = %data_dir.display(), "starting build");

    // --- Finds ---
    if let Some(finds) = load_optional::<Find>(&data_dir.join("finds.json"))? {
        progress.phase("Finds");
        let mut cards = String::new();
        for (i, find) in finds.iter().enumerate() {
            let meta = if find.category == "quote" {
                FetchedMetadata::default()
            } else {
                enricher.lookup(find.url.as_deref()).await
            };
            cards.push_str(&render_find_card(find, &meta));
            progress.record_rendered("find", i + 1, finds.len());
        }
        report.finds = finds.len();
        update_region(root, "index.html", "finds", &cards, &mut report)?;
    }

    // --- Publications ---
    if let Some(publications) = load_optional::<Publication>(&data_dir.join("publications.json"))? {
        progress.phase("Publications");
        let mut cards = String::new();
        for (i, publication) in publications.iter().enumerate() {
            let meta = enricher.lookup(publication.url.as_deref()).await;
            cards.push_str(&render_publication_card(publication, &meta));
            progress.record_rendered("publication", i + 1, publications.len());
        }
        report.publications = publications.len();
        update_region(root, "publications.html", "publications", &cards, &mut report)?;
    }

    // --- Projects ---
    if let Some(projects) = load_optional::<Project>(&data_dir.join("projects.json"))? {
        progress.phase("Projects");
        let cards: String = projects.iter().map(render_project_card).collect();
        report.projects = projects.len();
        update_region(root, "projects.html", "projects", &cards, &mut report)?;
    }

    // --- Writing ---
    let writing_dir = root.join(&paths.writing_dir);
    let link_base = writing_link_base(&paths.writing_output_dir);
    if has_markdown_sources(&writing_dir) {
        progress.phase("Writing");
        let batch = load_writings(&writing_dir)?;
        let items: String = batch
            .writings
            .iter()
            .map(|writing| render_writing_summary(writing, &link_base))
            .collect();
        report.writings = batch.writings.len();
        report.skipped_documents = batch.skipped;
        update_region(root, "writing.html", "writing", &items, &mut report)?;

        let template = root.join(&paths.writing_template);
        if template.exists() {
            let out_dir = root.join(&paths.writing_output_dir);
            report.pages_written = write_writing_pages(&template, &out_dir, &batch.writings)?;
        } else {
            warn!(template = %template.display(), "writing template not found, pages not generated");
        }
    } else if let Some(mut entries) = load_optional::<WritingEntry>(&data_dir.join("writing.json"))? {
        progress.phase("Writing");
        sort_entries(&mut entries);
        let items: String = entries
            .iter()
            .map(|entry| render_writing_item(entry, &link_base))
            .collect();
        report.writings = entries.len();
        update_region(root, "writing.html", "writing", &items, &mut report)?;
    }

    report.elapsed = start.elapsed();
    info!(
        regions_updated = report.regions_updated.len(),
        regions_missing = report.regions_missing.len(),
        pages = report.pages_written,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "build complete"
    );
    progress.done(&report);

    Ok(report)
}

/// Load a data file, or `None` when it does not exist.
fn load_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        info!(path = %path.display(), "data file not found, skipping");
        return Ok(None);
    }
    load_records(path).map(Some)
}

fn update_region(
    root: &Path,
    page: &str,
    region: &str,
    html: &str,
    report: &mut BuildReport,
) -> Result<()> {
    let label = format!("{page}#{region}");
    if splice_file(&root.join(page), region, html)? {
        info!(region = %label, "updated");
        report.regions_updated.push(label);
    } else {
        report.regions_missing.push(label);
    }
    Ok(())
}
