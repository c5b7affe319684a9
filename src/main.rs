//! dirscope - measure a directory tree and search it by name.
//!
//! Usage:
//!   dirscope scan [PATH]             Scan and show a size tree
//!   dirscope search QUERY [PATH]     Find entries whose name contains QUERY
//!   dirscope export [PATH]           Export the scanned tree to JSON
//!   dirscope --help                  Show help

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dirscope_core::{FileNode, TreeStats};
use dirscope_scan::{ScanConfig, ScanError, TreeScanner};
use dirscope_search::{DEFAULT_LIMIT, SearchConfig, TreeSearcher};

#[derive(Parser)]
#[command(
    name = "dirscope",
    version,
    about = "Measure a directory tree and search it by name",
    long_about = "dirscope walks a directory, adds up the size of everything below it \
                  and shows where the space goes. Unreadable entries are skipped, \
                  symbolic links are never followed."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Give up on the scan after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan and show a summary with the largest entries
    Scan {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Stop building nodes below this depth (sizes stay exact)
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Depth of the printed tree
        #[arg(long, default_value = "3")]
        show_depth: u32,

        /// Number of top entries to show per directory
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },

    /// Scan, then list entries whose name contains QUERY (case-insensitive)
    Search {
        /// Text to look for in entry names
        query: String,

        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum number of matches to list
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Stop building nodes below this depth
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Export scan results to JSON
    Export {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Stop building nodes below this depth
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timeout = cli.timeout.map(Duration::from_secs);

    match cli.command {
        Command::Scan {
            path,
            max_depth,
            show_depth,
            top,
        } => {
            run_scan(&path, max_depth, show_depth, top, timeout).await?;
        }
        Command::Search {
            query,
            path,
            limit,
            max_depth,
            format,
        } => {
            run_search(&path, &query, limit, max_depth, format, timeout).await?;
        }
        Command::Export {
            path,
            max_depth,
            output,
        } => {
            run_export(&path, max_depth, output, timeout).await?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Scan `path`, cancelling the scan if it runs past `timeout`.
async fn scan_tree(
    path: &Path,
    max_depth: Option<u32>,
    timeout: Option<Duration>,
) -> Result<FileNode> {
    eprintln!("Scanning {}...", path.display());

    let config = ScanConfig::new(path).with_max_depth(max_depth);
    let scanner = TreeScanner::new();
    let cancel = CancellationToken::new();
    let scan = scanner.scan(config, cancel.clone());

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, scan).await {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                bail!("Scan timed out after {}s", limit.as_secs());
            }
        },
        None => scan.await,
    };

    match result {
        Ok(tree) => {
            debug!(size = tree.size(), nodes = tree.descendant_count() + 1, "tree ready");
            Ok(tree)
        }
        Err(err @ ScanError::NotFound { .. }) => Err(err).context("Invalid path"),
        Err(err) => Err(err).context("Scan failed"),
    }
}

/// Run a scan and display summary.
async fn run_scan(
    path: &Path,
    max_depth: Option<u32>,
    show_depth: u32,
    top_n: usize,
    timeout: Option<Duration>,
) -> Result<()> {
    let start = Instant::now();
    let tree = scan_tree(path, max_depth, timeout).await?;
    let elapsed = start.elapsed();
    let stats = TreeStats::from_tree(&tree);

    println!();
    println!("{}", "─".repeat(60));
    println!(" {} - {}", tree.path().display(), format_size(stats.total_size));
    println!(" {} files, {} directories", stats.total_files, stats.total_dirs);
    if stats.truncated_dirs > 0 {
        println!(
            " {} directories below depth {} measured but not expanded",
            stats.truncated_dirs,
            max_depth.unwrap_or_default()
        );
    }
    if let Some((largest, size)) = &stats.largest_file {
        println!(" Largest file: {} ({})", largest.display(), format_size(*size));
    }
    println!(" Scanned in {:.2}s", elapsed.as_secs_f64());
    println!("{}", "─".repeat(60));
    println!();

    print_node(&tree, 0, show_depth, top_n, tree.size());

    Ok(())
}

/// Scan and search.
async fn run_search(
    path: &Path,
    query: &str,
    limit: usize,
    max_depth: Option<u32>,
    format: OutputFormat,
    timeout: Option<Duration>,
) -> Result<()> {
    let tree = scan_tree(path, max_depth, timeout).await?;

    let searcher = TreeSearcher::with_config(SearchConfig::new(query).with_limit(limit));
    let result = searcher.search(&tree);

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(
                " {} match(es) for \"{}\", {} total",
                result.total_match_count,
                query,
                format_size(result.total_match_bytes)
            );
            println!("{}", "─".repeat(70));
            println!();

            for m in &result.matches {
                println!(
                    " {:>10}  {}{}",
                    format_size(m.size()),
                    m.node.path().display(),
                    if m.node.is_dir() { "/" } else { "" }
                );
            }

            if result.omitted_count() > 0 {
                println!();
                println!(" ... and {} more", result.omitted_count());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

/// Export scan results to JSON.
async fn run_export(
    path: &Path,
    max_depth: Option<u32>,
    output: Option<PathBuf>,
    timeout: Option<Duration>,
) -> Result<()> {
    let tree = scan_tree(path, max_depth, timeout).await?;

    let json = serde_json::to_string_pretty(&tree)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .wrap_err_with(|| format!("Cannot write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}

/// Print a node and its largest children.
fn print_node(node: &FileNode, depth: u32, max_depth: u32, top_n: usize, root_size: u64) {
    let indent = "  ".repeat(depth as usize);
    let ratio = if root_size > 0 {
        node.size() as f64 / root_size as f64 * 100.0
    } else {
        0.0
    };

    let bar = make_bar(ratio / 100.0, 10);

    let name = if depth == 0 {
        node.path().display().to_string()
    } else {
        node.name().to_string()
    };

    let dir_marker = if node.is_dir() { "/" } else { "" };

    println!(
        "{}{}{:<40} {:>10} {:>5.1}% {}",
        indent,
        if node.is_dir() { "▼ " } else { "  " },
        truncate(&format!("{name}{dir_marker}"), 40),
        format_size(node.size()),
        ratio,
        bar
    );

    if node.is_dir() && depth < max_depth {
        let mut by_size: Vec<&FileNode> = node.children().iter().collect();
        by_size.sort_by(|a, b| b.size().cmp(&a.size()));

        for child in by_size.iter().take(top_n) {
            print_node(child, depth + 1, max_depth, top_n, root_size);
        }

        let remaining = by_size.len().saturating_sub(top_n);
        if remaining > 0 {
            let indent = "  ".repeat((depth + 1) as usize);
            println!("{indent}  ... and {remaining} more");
        }
    }
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width - filled;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to at most `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{head}…")
    }
}
