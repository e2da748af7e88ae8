//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use pagesmith_core::pipeline::{BuildConfig, BuildReport, ProgressReporter, build_site};
use pagesmith_shared::{CONFIG_FILE_NAME, SiteConfig, init_config, load_config_from, load_site_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Pagesmith: fill a static site's pages from its content files.
#[derive(Parser)]
#[command(
    name = "pagesmith",
    version,
    about = "Render content data into the marker regions of a static site's pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Site root directory.
    #[arg(long, default_value = ".", global = true, env = "PAGESMITH_ROOT")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render all content and update the site's pages.
    Build {
        /// Config file (defaults to <root>/pagesmith.toml).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip metadata scraping; render from the data files alone.
        #[arg(long)]
        no_fetch: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a pagesmith.toml with defaults into the site root.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagesmith=info",
        1 => "pagesmith=debug",
        _ => "pagesmith=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { config, no_fetch } => cmd_build(&cli.root, config.as_deref(), no_fetch).await,
        Command::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(&cli.root, force),
            ConfigAction::Show => cmd_config_show(&cli.root),
        },
    }
}

async fn cmd_build(root: &Path, config_path: Option<&Path>, no_fetch: bool) -> Result<()> {
    if !root.is_dir() {
        return Err(eyre!("site root '{}' is not a directory", root.display()));
    }

    let mut site = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_site_config(root)?,
    };
    if no_fetch {
        site.fetch.enabled = false;
    }

    info!(root = %root.display(), fetch = site.fetch.enabled, "building site");

    let config = BuildConfig {
        root: root.to_path_buf(),
        site,
    };
    let reporter = CliProgress::new();
    let report = build_site(&config, &reporter).await?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &BuildReport) {
    println!();
    println!("  Build complete.");
    println!("  Finds:        {}", report.finds);
    println!("  Publications: {}", report.publications);
    println!("  Projects:     {}", report.projects);
    println!("  Writings:     {} ({} pages)", report.writings, report.pages_written);
    for region in &report.regions_updated {
        println!("  Updated:      {region}");
    }
    for region in &report.regions_missing {
        println!("  Warning:      markers not found for {region}");
    }
    for name in &report.skipped_documents {
        println!("  Skipped:      {name}");
    }
    println!("  Time:         {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn record_rendered(&self, kind: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering {kind} [{current}/{total}]"));
    }

    fn done(&self, _report: &BuildReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init(root: &Path, force: bool) -> Result<()> {
    let existing = root.join(CONFIG_FILE_NAME);
    if existing.exists() && !force {
        return Err(eyre!(
            "{} already exists (use --force to overwrite)",
            existing.display()
        ));
    }

    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path) -> Result<()> {
    let config: SiteConfig = load_site_config(root)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
