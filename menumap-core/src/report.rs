// Report generation from a navigation scan

use menumap_scanner::NavigationScan;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// Render a scan in the requested format.
pub fn render_report(scan: &NavigationScan, format: &ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(scan)),
        ReportFormat::Markdown => Ok(generate_markdown_report(scan)),
        ReportFormat::Json => {
            generate_json_report(scan).map_err(|e| format!("JSON serialization failed: {}", e))
        }
    }
}

pub fn generate_text_report(scan: &NavigationScan) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                 MENUMAP NAVIGATION SCAN\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("URL:        {}\n", scan.url));
    report.push_str(&format!(
        "Scanned:    {}\n",
        scan.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("Sections:   {}\n", scan.sections.len()));
    report.push_str(&format!("Items:      {}\n\n", scan.item_count()));

    if scan.sections.is_empty() {
        report.push_str("  (no sections discovered)\n");
    } else {
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        report.push_str("MENU STRUCTURE\n");
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

        for (index, section) in scan.sections.iter().enumerate() {
            report.push_str(&format!(
                "[{}] {} ({} item{})\n",
                index,
                section.name,
                section.items.len(),
                if section.items.len() == 1 { "" } else { "s" }
            ));
            for (i, item) in section.items.iter().enumerate() {
                let is_last = i == section.items.len() - 1;
                let prefix = if is_last { "└── " } else { "├── " };
                report.push_str(&format!("  {}{}  [{}]\n", prefix, item.name, item.id));
            }
            report.push('\n');
        }
    }

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report
}

pub fn generate_markdown_report(scan: &NavigationScan) -> String {
    let mut report = String::new();

    report.push_str(&format!("# Navigation menu: {}\n\n", scan.url));
    report.push_str(&format!(
        "Scanned at {}. {} sections, {} items.\n\n",
        scan.scanned_at.to_rfc3339(),
        scan.sections.len(),
        scan.item_count()
    ));

    for section in &scan.sections {
        report.push_str(&format!("## {}\n\n", section.name));
        if section.items.is_empty() {
            report.push_str("_No items._\n\n");
            continue;
        }
        for item in &section.items {
            report.push_str(&format!("- {} (`{}`)\n", item.name, item.id));
        }
        report.push('\n');
    }

    report
}

/// Pretty-printed scan record itself, byte-compatible with the JSON document
/// the host harness persists and reads back.
pub fn generate_json_report(scan: &NavigationScan) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(scan)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
