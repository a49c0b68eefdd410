//! CLI binary for docname.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RenameConfig`, renders progress, and writes the renamed copies
//! and/or the batch archive.

use anyhow::{Context, Result};
use clap::Parser;
use docname::{
    rename_batch, DocumentInput, FileError, RenameConfig, RenameProgressCallback,
    DEFAULT_ARCHIVE_NAME,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a progress bar over documents plus one log
/// line per outcome. The retry countdown reuses the bar's message slot so
/// the wait is visible without scrolling the log.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Renaming");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl RenameProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_files} document(s)…"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, original_name: &str) {
        self.bar.set_message(original_name.to_string());
    }

    fn on_retry_wait(&self, original_name: &str, attempt: u32, seconds_remaining: u64) {
        self.bar.set_message(format!(
            "{original_name}: rate limited — retrying in {seconds_remaining}s (attempt {attempt})"
        ));
    }

    fn on_file_renamed(&self, _index: usize, _total: usize, original_name: &str, new_name: &str) {
        self.bar.println(format!(
            "  {} {}  →  {}",
            green("✓"),
            dim(original_name),
            bold(new_name),
        ));
        self.bar.set_message(String::new());
        self.bar.inc(1);
    }

    fn on_file_error(&self, _index: usize, _total: usize, original_name: &str, error: &FileError) {
        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            dim(original_name),
            red(&error.to_string()),
        ));
        self.bar.set_message(String::new());
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();
        if failed == 0 {
            eprintln!(
                "{} {} document(s) renamed",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents renamed  ({} failed)",
                if success_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Rename two scans and bundle the results into renamed_documents.zip
  docname Scan_0041.pdf Scan_0042.pdf

  # Write renamed copies into a directory instead
  docname --output-dir ./named scans/*.pdf

  # Choose the archive path explicitly
  docname --zip filings.zip scans/*.pdf

  # Preview the computed names without writing anything
  docname --dry-run scans/*.pdf

  # Pin a model instead of querying the catalog
  docname --model models/gemini-1.5-pro document.pdf

NAMING CONVENTION:
  YY.MM.DD_TYPE_Number_Content_Status.pdf
  e.g. 25.03.14_DEC_125-UBND_Road_maintenance_Signed.pdf

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY      Google Gemini API key (required)

RATE LIMITS:
  Free-tier quotas reset per minute. On HTTP 429/400 the tool waits a
  fixed interval (default 65s, shown as a countdown) and retries, up to
  --max-attempts times per document. One failing document never stops
  the rest of the batch.
"#;

/// Rename scanned PDF documents to the company filing convention.
#[derive(Parser, Debug)]
#[command(
    name = "docname",
    version,
    about = "Rename scanned PDF documents using a vision model",
    long_about = "Rasterises the first page of each PDF, shows it to a Google Gemini vision \
model together with the company filing convention, and renames the document accordingly. \
Successes are written as renamed copies and/or bundled into a single ZIP archive.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF documents to rename.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write each renamed copy into this directory.
    #[arg(short, long, env = "DOCNAME_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Write the batch archive to this path (or into this directory).
    /// Defaults to ./renamed_documents.zip when --output-dir is not given.
    #[arg(short, long)]
    zip: Option<PathBuf>,

    /// Gemini API key. Prefer the environment variable over the flag so
    /// the key stays out of shell history.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model ID (e.g. models/gemini-1.5-flash). Picked from the catalog
    /// when not set.
    #[arg(long, env = "DOCNAME_MODEL")]
    model: Option<String>,

    /// Rendering DPI for the first page (72–400).
    #[arg(long, env = "DOCNAME_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Maximum attempts per document on a rate-limit error.
    #[arg(long, env = "DOCNAME_MAX_ATTEMPTS", default_value_t = 5)]
    max_attempts: u32,

    /// Fixed wait between attempts, in seconds.
    #[arg(long, env = "DOCNAME_RETRY_WAIT", default_value_t = 65)]
    retry_wait: u64,

    /// Per-request timeout for model calls, in seconds.
    #[arg(long, env = "DOCNAME_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Compute and print the names without writing any file.
    #[arg(long)]
    dry_run: bool,

    /// Output structured JSON (per-file results and stats) instead of logs.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "DOCNAME_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCNAME_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCNAME_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Load inputs ──────────────────────────────────────────────────────
    let mut inputs = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let input = DocumentInput::from_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        inputs.push(input);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = RenameConfig::builder()
        .dpi(cli.dpi)
        .max_attempts(cli.max_attempts)
        .retry_wait_secs(cli.retry_wait)
        .api_timeout_secs(cli.api_timeout);
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.as_str());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.as_str());
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new());
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the batch ────────────────────────────────────────────────────
    let output = rename_batch(&inputs, &config)
        .await
        .context("Batch failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !show_progress && !cli.quiet {
        for result in &output.results {
            match (&result.new_name, &result.error) {
                (Some(new_name), _) => {
                    println!("{}  →  {}", result.original_name, new_name)
                }
                (None, Some(error)) => {
                    eprintln!("{}: {}", result.original_name, error)
                }
                (None, None) => {}
            }
        }
    }

    // ── Write outputs ────────────────────────────────────────────────────
    if !cli.dry_run && !output.successes.is_empty() {
        if let Some(ref dir) = cli.output_dir {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            for (name, bytes) in &output.successes {
                let dest = dir.join(name);
                tokio::fs::write(&dest, bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", dest.display()))?;
            }
            if !cli.quiet {
                eprintln!(
                    "   {} renamed copies in {}",
                    output.successes.len(),
                    bold(&dir.display().to_string())
                );
            }
        }

        let zip_dest = match (&cli.zip, &cli.output_dir) {
            (Some(path), _) if path.is_dir() => Some(path.join(DEFAULT_ARCHIVE_NAME)),
            (Some(path), _) => Some(path.clone()),
            (None, None) => Some(PathBuf::from(DEFAULT_ARCHIVE_NAME)),
            (None, Some(_)) => None,
        };
        if let Some(dest) = zip_dest {
            if let Some(zip_bytes) = output.zip_bytes()? {
                tokio::fs::write(&dest, zip_bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", dest.display()))?;
                if !cli.quiet {
                    eprintln!("   archive: {}", bold(&dest.display().to_string()));
                }
            }
        }
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if !cli.quiet && !cli.json {
        eprintln!(
            "   {} files  {} renamed  {} failed  {}",
            output.stats.total_files,
            output.stats.renamed_files,
            output.stats.failed_files,
            dim(&format!("{}ms", output.stats.total_duration_ms)),
        );
    }

    if output.stats.renamed_files == 0 && output.stats.total_files > 0 {
        std::process::exit(1);
    }
    Ok(())
}
