use menumap_scanner::{
    DEFAULT_ITEM_PATTERN, DEFAULT_SECTION_TEMPLATE, MenuScanner, NavigationScan, WebDriverPage,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Options for configuring a scan operation
pub struct ScanOptions {
    /// Address of the page whose menu is scanned.
    pub target_url: String,
    /// WebDriver endpoint to drive the browser through.
    pub webdriver_url: String,
    pub section_template: String,
    pub item_pattern: String,
    /// Upper bound in milliseconds on waiting for a menu render to settle.
    pub settle_cap_ms: u64,
    /// Interval in milliseconds between visible-count samples.
    pub poll_interval_ms: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            target_url: String::new(),
            webdriver_url: "http://localhost:4444".to_string(),
            section_template: DEFAULT_SECTION_TEMPLATE.to_string(),
            item_pattern: DEFAULT_ITEM_PATTERN.to_string(),
            settle_cap_ms: 2_000,
            poll_interval_ms: 100,
        }
    }
}

/// Callback for reporting scan progress
pub type ScanProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a full scan with the given options: connect to the WebDriver
/// endpoint, navigate to the target, scan the menu, close the session.
/// Returns the completed record, or an error message for the CLI layer.
pub async fn execute_scan(
    options: ScanOptions,
    progress_callback: Option<ScanProgressCallback>,
) -> Result<NavigationScan, String> {
    let report = |msg: String| {
        if let Some(ref callback) = progress_callback {
            callback(msg);
        }
    };

    report(format!(
        "Connecting to WebDriver at {}",
        options.webdriver_url
    ));
    let page = WebDriverPage::connect(&options.webdriver_url)
        .await
        .map_err(|e| format!("Failed to connect to {}: {}", options.webdriver_url, e))?;

    report(format!("Navigating to {}", options.target_url));
    if let Err(e) = page.goto(&options.target_url).await {
        let _ = page.close().await;
        return Err(format!("Failed to navigate to {}: {}", options.target_url, e));
    }

    let scanner = MenuScanner::new()
        .with_section_template(options.section_template)
        .with_item_pattern(options.item_pattern)
        .with_settle_cap(Duration::from_millis(options.settle_cap_ms))
        .with_poll_interval(Duration::from_millis(options.poll_interval_ms));

    report("Scanning navigation menu...".to_string());
    let scan = match scanner.scan(&page).await {
        Ok(scan) => scan,
        Err(e) => {
            let _ = page.close().await;
            return Err(format!("Scan failed: {}", e));
        }
    };

    if let Err(e) = page.close().await {
        // The record is already complete; a close failure is not fatal.
        warn!("Failed to close browser session: {}", e);
    }

    Ok(scan)
}
