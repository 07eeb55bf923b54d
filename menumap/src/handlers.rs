use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use menumap_core::report::{ReportFormat, render_report, save_report};
use menumap_core::scan::{ScanOptions, ScanProgressCallback, execute_scan};
use menumap_scanner::NavigationScan;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Expand a user-supplied output path, tilde included.
pub fn resolve_output_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    PathBuf::from(expanded.as_ref())
}

/// Parse a report format argument.
pub fn parse_format(raw: &str) -> Result<ReportFormat> {
    ReportFormat::from_str(raw).with_context(|| format!("Unknown report format '{}'", raw))
}

/// Load a previously saved scan record from disk.
pub fn load_scan(path: &Path) -> Result<NavigationScan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scan file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid scan record", path.display()))
}

/// Write the rendered content to the output path, or print it to the screen.
fn emit(content: &str, output: Option<&String>) -> Result<()> {
    match output {
        Some(raw) => {
            let path = resolve_output_path(raw);
            save_report(content, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Saved to {}", "✓".green().bold(), path.display());
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

pub async fn handle_scan(args: &ArgMatches, quiet: bool) -> Result<()> {
    let url = args.get_one::<Url>("url").unwrap();
    let webdriver = args.get_one::<String>("webdriver").unwrap();
    let section_template = args.get_one::<String>("section-template").unwrap();
    let item_pattern = args.get_one::<String>("item-pattern").unwrap();
    let settle_ms = *args.get_one::<u64>("settle-ms").unwrap();
    let poll_ms = *args.get_one::<u64>("poll-ms").unwrap();
    let output = args.get_one::<String>("output");
    let format = parse_format(args.get_one::<String>("format").unwrap())?;

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Scanning {}", url));
        Some(pb)
    };

    let progress: Option<ScanProgressCallback> = spinner.clone().map(|pb| {
        let callback: ScanProgressCallback = Arc::new(move |msg: String| pb.set_message(msg));
        callback
    });

    let options = ScanOptions {
        target_url: url.as_str().to_string(),
        webdriver_url: webdriver.clone(),
        section_template: section_template.clone(),
        item_pattern: item_pattern.clone(),
        settle_cap_ms: settle_ms,
        poll_interval_ms: poll_ms,
    };

    let result = execute_scan(options, progress).await;

    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }

    let scan = result.map_err(|e| anyhow::anyhow!(e))?;

    if !quiet {
        println!(
            "{} {} section(s), {} item(s) discovered\n",
            "✓".green().bold(),
            scan.sections.len(),
            scan.item_count()
        );
    }

    let content = render_report(&scan, &format).map_err(|e| anyhow::anyhow!(e))?;
    emit(&content, output)
}

pub fn handle_report(args: &ArgMatches) -> Result<()> {
    let input = args.get_one::<PathBuf>("input").unwrap();
    let format = parse_format(args.get_one::<String>("format").unwrap())?;
    let output = args.get_one::<String>("output");

    let scan = load_scan(input)?;
    let content = render_report(&scan, &format).map_err(|e| anyhow::anyhow!(e))?;
    emit(&content, output)
}
