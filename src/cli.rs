//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use harvester_core::{FilenameStyle, HarvestConfig};

/// Collect every PDF linked from one or more pages into a local directory.
///
/// Each seed page is fetched, scanned for links ending in `.pdf`, and every
/// unique document is downloaded once. Files already present are skipped, so
/// re-running is safe.
#[derive(Parser, Debug)]
#[command(name = "pdf-harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Seed pages to scan (defaults to the configured seed list)
    pub seeds: Vec<String>,

    /// Directory receiving downloaded PDFs
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix joined onto links that have no host
    #[arg(short = 'b', long)]
    pub base_domain: Option<String>,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Path to a TOML config file (overrides the default location)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overall per-request timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Name files `<stem>.pdf` instead of `<stem>.pdf.pdf`
    #[arg(long)]
    pub single_extension: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Exit non-zero when downloads fail (2 = some failed, 1 = all failed)
    #[arg(long)]
    pub strict: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Default log level from the verbosity flags.
    ///
    /// Priority: quiet flag > verbose flag > default (info). `RUST_LOG`
    /// overrides all of these at subscriber setup.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Applies command-line overrides on top of file configuration.
    pub fn apply_to(&self, config: &mut HarvestConfig) {
        if !self.seeds.is_empty() {
            config.seeds.clone_from(&self.seeds);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(base_domain) = &self.base_domain {
            config.base_domain.clone_from(base_domain);
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = usize::from(concurrency);
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if self.single_extension {
            config.filename_style = FilenameStyle::SingleExtension;
        }
    }
}
