use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structural snapshot of a page's navigation menu.
///
/// Field names serialize in camelCase so the JSON document matches what the
/// host harness expects to read back (`scannedAt` etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationScan {
    /// Page address with the query string stripped.
    pub url: String,
    /// Capture timestamp, taken at scan invocation start.
    pub scanned_at: DateTime<Utc>,
    /// Top-level sections in on-screen order.
    pub sections: Vec<Section>,
}

/// A top-level navigation entry that expands into a list of commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Trimmed display text.
    pub name: String,
    /// Selector usable to re-locate this section's trigger element.
    pub id: String,
    /// Command items in DOM-visible order while this section was open.
    pub items: Vec<Item>,
}

/// A selectable command inside an opened section's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Trimmed display text, never empty.
    pub name: String,
    /// The element's own id attribute, `#`-prefixed for direct selector reuse.
    pub id: String,
}

impl NavigationScan {
    pub fn new(url: String, scanned_at: DateTime<Utc>) -> Self {
        Self {
            url,
            scanned_at,
            sections: Vec::new(),
        }
    }

    /// Total number of command items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

impl Section {
    pub fn new(name: String, id: String) -> Self {
        Self {
            name,
            id,
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scan_serializes_with_camel_case_timestamp_field() {
        let scan = NavigationScan::new(
            "https://app.example/ui".to_string(),
            Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap(),
        );

        let json = serde_json::to_string(&scan).unwrap();
        assert!(json.contains("\"scannedAt\":\"2026-08-29T12:00:00Z\""));

        let parsed: NavigationScan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scan);
    }

    #[test]
    fn test_item_count_sums_all_sections() {
        let mut scan = NavigationScan::new("https://app.example/ui".to_string(), Utc::now());
        let mut a = Section::new("A".to_string(), "#themesCell_theme_0".to_string());
        a.items.push(Item {
            name: "Open".to_string(),
            id: "#cmd_open_txt".to_string(),
        });
        a.items.push(Item {
            name: "Save".to_string(),
            id: "#cmd_save_txt".to_string(),
        });
        let mut b = Section::new("B".to_string(), "#themesCell_theme_1".to_string());
        b.items.push(Item {
            name: "Exit".to_string(),
            id: "#cmd_exit_txt".to_string(),
        });
        scan.sections.push(a);
        scan.sections.push(b);

        assert_eq!(scan.item_count(), 3);
    }
}
