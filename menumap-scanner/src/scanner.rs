use crate::error::Result;
use crate::page::PageDriver;
use crate::result::{Item, NavigationScan, Section};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Naming template the host UI uses for section trigger elements.
/// `{index}` is replaced with the zero-based section position.
pub const DEFAULT_SECTION_TEMPLATE: &str = "#themesCell_theme_{index}";

/// CSS pattern matching command item text elements anywhere in the DOM.
/// Visibility, not structure, scopes an item to its section.
pub const DEFAULT_ITEM_PATTERN: &str = r#"[id^="cmd_"][id$="_txt"]"#;

const DEFAULT_SETTLE_CAP_MS: u64 = 2_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
const DEFAULT_DISMISS_SETTLE_MS: u64 = 200;

/// Extracts the section/item structure of a dynamically rendered navigation
/// menu into a [`NavigationScan`].
///
/// The section count is unknown up front, so discovery probes sequential
/// indices of the section template until the first absent one. Items are not
/// structurally scoped to their section; the scanner opens one section at a
/// time and takes whatever is visible while that menu is open.
pub struct MenuScanner {
    section_template: String,
    item_pattern: String,
    settle_cap: Duration,
    poll_interval: Duration,
    dismiss_settle: Duration,
}

impl MenuScanner {
    pub fn new() -> Self {
        Self {
            section_template: DEFAULT_SECTION_TEMPLATE.to_string(),
            item_pattern: DEFAULT_ITEM_PATTERN.to_string(),
            settle_cap: Duration::from_millis(DEFAULT_SETTLE_CAP_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            dismiss_settle: Duration::from_millis(DEFAULT_DISMISS_SETTLE_MS),
        }
    }

    /// Override the indexed naming template for section triggers.
    /// Must contain the `{index}` placeholder.
    pub fn with_section_template(mut self, template: String) -> Self {
        self.section_template = template;
        self
    }

    /// Override the CSS pattern matching command item elements.
    pub fn with_item_pattern(mut self, pattern: String) -> Self {
        self.item_pattern = pattern;
        self
    }

    /// Upper bound on how long to wait for a menu render to settle.
    pub fn with_settle_cap(mut self, cap: Duration) -> Self {
        self.settle_cap = cap;
        self
    }

    /// Interval between visible-count samples while waiting for a settle.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Run a full scan against the page. Strictly sequential: section N+1 is
    /// never opened before section N's harvest completes.
    ///
    /// On any interaction failure the scan aborts and no record is returned,
    /// but the page is still sent a dismiss key so a half-open menu is not
    /// left behind.
    pub async fn scan<P: PageDriver + ?Sized>(&self, page: &P) -> Result<NavigationScan> {
        let scanned_at = Utc::now();
        let url = strip_query(&page.current_url().await?);
        info!("Scanning navigation menu at {}", url);

        let mut sections = self.discover_sections(page).await?;
        debug!("Discovered {} section(s)", sections.len());

        let harvested = self.harvest_sections(page, &mut sections).await;
        let neutralized = self.neutralize(page).await;
        harvested?;
        neutralized?;

        info!(
            "Scan complete: {} section(s), {} item(s)",
            sections.len(),
            sections.iter().map(|s| s.items.len()).sum::<usize>()
        );

        Ok(NavigationScan {
            url,
            scanned_at,
            sections,
        })
    }

    /// Probe loop: test sequential indices until the first absence.
    async fn discover_sections<P: PageDriver + ?Sized>(&self, page: &P) -> Result<Vec<Section>> {
        let mut sections = Vec::new();
        let mut index = 0;
        loop {
            let selector = self.section_selector(index);
            if page.count(&selector).await? == 0 {
                // Normal end of enumeration, not an error.
                break;
            }
            let name = page.text(&selector).await?.trim().to_string();
            sections.push(Section::new(name, selector));
            index += 1;
        }
        Ok(sections)
    }

    async fn harvest_sections<P: PageDriver + ?Sized>(
        &self,
        page: &P,
        sections: &mut [Section],
    ) -> Result<()> {
        for (position, section) in sections.iter_mut().enumerate() {
            if position > 0 {
                // Close the previous menu ourselves rather than relying on
                // the host UI closing it as a side effect of the next click.
                page.press_escape().await?;
            }

            debug!("Opening section {} ({})", position, section.name);
            page.click(&section.id).await?;
            self.wait_for_menu_settle(page).await?;

            for snapshot in page.visible_matches(&self.item_pattern).await? {
                let name = snapshot.text.trim();
                if name.is_empty() {
                    continue;
                }
                section.items.push(Item {
                    name: name.to_string(),
                    id: format!("#{}", snapshot.id),
                });
            }
            debug!(
                "Section {} yielded {} item(s)",
                section.name,
                section.items.len()
            );
        }
        Ok(())
    }

    /// Wait for the opened menu's render to settle: sample the visible item
    /// count every poll interval until two consecutive samples agree, capped
    /// at `settle_cap`. A UI slower than the cap yields a short item list
    /// rather than an error.
    async fn wait_for_menu_settle<P: PageDriver + ?Sized>(&self, page: &P) -> Result<()> {
        let mut waited = Duration::ZERO;
        let mut last = None;
        while waited < self.settle_cap {
            tokio::time::sleep(self.poll_interval).await;
            waited += self.poll_interval;
            let count = page.visible_matches(&self.item_pattern).await?.len();
            if last == Some(count) {
                break;
            }
            last = Some(count);
        }
        Ok(())
    }

    /// Return the page to a neutral state with no open menu.
    async fn neutralize<P: PageDriver + ?Sized>(&self, page: &P) -> Result<()> {
        page.press_escape().await?;
        tokio::time::sleep(self.dismiss_settle).await;
        Ok(())
    }

    fn section_selector(&self, index: usize) -> String {
        self.section_template.replace("{index}", &index.to_string())
    }
}

impl Default for MenuScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonicalize a page address by dropping its query string. A fragment on a
/// parseable URL is kept; only the unparseable fallback truncates at `?` and
/// loses whatever followed it.
pub fn strip_query(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.to_string()
        }
        // Unparseable address: truncate at the first '?'.
        Err(_) => raw.split('?').next().unwrap_or(raw).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ScanError};
    use crate::page::{ElementSnapshot, PageDriver};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const SECTION_PREFIX: &str = "#themesCell_theme_";

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Click(String),
        Escape,
    }

    struct FakeSection {
        name: &'static str,
        /// (id attribute, rendered text) pairs, in DOM order.
        items: Vec<(&'static str, &'static str)>,
    }

    struct FakeState {
        open: Option<usize>,
        events: Vec<Event>,
        polls_since_open: usize,
    }

    /// Scripted page double: one menu open at a time, items visible only
    /// while their owning section is open. `render_delay_polls` simulates an
    /// animated menu whose items only appear after a few queries.
    struct FakePage {
        url: String,
        section_prefix: String,
        sections: Vec<FakeSection>,
        fail_click_on: Option<String>,
        render_delay_polls: usize,
        /// One extra synthetic item becomes visible on every sample, so the
        /// count never repeats and the settle loop can only end at its cap.
        grow_each_poll: bool,
        state: Mutex<FakeState>,
    }

    impl FakePage {
        fn new(url: &str, sections: Vec<FakeSection>) -> Self {
            Self {
                url: url.to_string(),
                section_prefix: SECTION_PREFIX.to_string(),
                sections,
                fail_click_on: None,
                render_delay_polls: 0,
                grow_each_poll: false,
                state: Mutex::new(FakeState {
                    open: None,
                    events: Vec::new(),
                    polls_since_open: 0,
                }),
            }
        }

        fn failing_on(mut self, selector: &str) -> Self {
            self.fail_click_on = Some(selector.to_string());
            self
        }

        fn with_render_delay(mut self, polls: usize) -> Self {
            self.render_delay_polls = polls;
            self
        }

        fn never_settling(mut self) -> Self {
            self.grow_each_poll = true;
            self
        }

        fn section_index(&self, selector: &str) -> Option<usize> {
            let index = selector.strip_prefix(&self.section_prefix)?;
            let index: usize = index.parse().ok()?;
            (index < self.sections.len()).then_some(index)
        }

        fn open_section(&self) -> Option<usize> {
            self.state.lock().unwrap().open
        }

        fn events(&self) -> Vec<Event> {
            self.state.lock().unwrap().events.clone()
        }
    }

    #[async_trait]
    impl PageDriver for FakePage {
        async fn current_url(&self) -> Result<String> {
            Ok(self.url.clone())
        }

        async fn count(&self, selector: &str) -> Result<usize> {
            Ok(self.section_index(selector).map_or(0, |_| 1))
        }

        async fn text(&self, selector: &str) -> Result<String> {
            let index = self
                .section_index(selector)
                .ok_or_else(|| ScanError::MissingElement(selector.to_string()))?;
            Ok(self.sections[index].name.to_string())
        }

        async fn click(&self, selector: &str) -> Result<()> {
            if self.fail_click_on.as_deref() == Some(selector) {
                return Err(ScanError::MissingElement(selector.to_string()));
            }
            let index = self
                .section_index(selector)
                .ok_or_else(|| ScanError::MissingElement(selector.to_string()))?;
            let mut state = self.state.lock().unwrap();
            state.open = Some(index);
            state.polls_since_open = 0;
            state.events.push(Event::Click(selector.to_string()));
            Ok(())
        }

        async fn visible_matches(&self, _selector: &str) -> Result<Vec<ElementSnapshot>> {
            let mut state = self.state.lock().unwrap();
            state.polls_since_open += 1;
            let Some(open) = state.open else {
                return Ok(Vec::new());
            };
            if state.polls_since_open <= self.render_delay_polls {
                // Menu is open but its items have not rendered yet.
                return Ok(Vec::new());
            }
            if self.grow_each_poll {
                return Ok((0..state.polls_since_open)
                    .map(|i| ElementSnapshot {
                        id: format!("cmd_generated_{}_txt", i),
                        text: format!("Generated {}", i),
                    })
                    .collect());
            }
            Ok(self.sections[open]
                .items
                .iter()
                .map(|(id, text)| ElementSnapshot {
                    id: id.to_string(),
                    text: text.to_string(),
                })
                .collect())
        }

        async fn press_escape(&self) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.open = None;
            state.events.push(Event::Escape);
            Ok(())
        }
    }

    fn two_section_menu() -> FakePage {
        FakePage::new(
            "https://app.example/ui",
            vec![
                FakeSection {
                    name: "  Section A  ",
                    items: vec![
                        ("cmd_open_txt", "Open"),
                        ("cmd_save_txt", "  Save "),
                        ("cmd_blank_txt", "   "),
                    ],
                },
                FakeSection {
                    name: "Section B",
                    items: vec![("cmd_exit_txt", "Exit")],
                },
            ],
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovers_all_sections_and_stops_at_boundary() {
        let page = FakePage::new(
            "https://app.example/ui",
            vec![
                FakeSection { name: "One", items: vec![] },
                FakeSection { name: "Two", items: vec![] },
                FakeSection { name: "Three", items: vec![] },
            ],
        );

        let scan = MenuScanner::new().scan(&page).await.unwrap();

        assert_eq!(scan.sections.len(), 3);
        assert_eq!(scan.sections[0].id, "#themesCell_theme_0");
        assert_eq!(scan.sections[2].id, "#themesCell_theme_2");
        // Exactly one probe past the boundary, never a click there.
        assert!(
            !page
                .events()
                .contains(&Event::Click("#themesCell_theme_3".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_section_names_are_trimmed() {
        let page = two_section_menu();
        let scan = MenuScanner::new().scan(&page).await.unwrap();

        assert_eq!(scan.sections[0].name, "Section A");
        assert_eq!(scan.sections[1].name, "Section B");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_item_names_are_filtered() {
        let page = two_section_menu();
        let scan = MenuScanner::new().scan(&page).await.unwrap();

        let names: Vec<&str> = scan.sections[0]
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Open", "Save"]);
        assert!(scan.sections.iter().all(|s| s.items.iter().all(|i| !i.name.is_empty())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_items_do_not_leak_between_sections() {
        let page = two_section_menu();
        let scan = MenuScanner::new().scan(&page).await.unwrap();

        let second: Vec<&str> = scan.sections[1]
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(second, vec!["Exit"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_ids_are_selector_ready() {
        let page = two_section_menu();
        let scan = MenuScanner::new().scan(&page).await.unwrap();

        assert_eq!(scan.sections[0].items[0].id, "#cmd_open_txt");
        assert_eq!(scan.sections[1].items[0].id, "#cmd_exit_txt");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_sections_yields_empty_scan() {
        let page = FakePage::new("https://app.example/ui", vec![]);
        let scan = MenuScanner::new().scan(&page).await.unwrap();

        assert!(scan.sections.is_empty());
        // No trigger was ever clicked.
        assert!(
            page.events()
                .iter()
                .all(|e| !matches!(e, Event::Click(_)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_menu_left_open_after_scan() {
        let page = two_section_menu();
        MenuScanner::new().scan(&page).await.unwrap();

        assert_eq!(page.open_section(), None);
        assert_eq!(page.events().last(), Some(&Event::Escape));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_scans_are_identical() {
        let page = two_section_menu();
        let scanner = MenuScanner::new();

        let first = scanner.scan(&page).await.unwrap();
        let second = scanner.scan(&page).await.unwrap();

        assert_eq!(first.sections, second.sections);
        assert_eq!(first.url, second.url);
    }

    #[tokio::test(start_paused = true)]
    async fn test_url_query_is_stripped() {
        let page = FakePage::new("https://app.example/ui?sessionId=abc&lang=en", vec![]);
        let scan = MenuScanner::new().scan(&page).await.unwrap();

        assert_eq!(scan.url, "https://app.example/ui");
        assert!(!scan.url.contains('?'));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_failure_aborts_without_partial_record() {
        let page = two_section_menu().failing_on("#themesCell_theme_1");
        let result = MenuScanner::new().scan(&page).await;

        assert!(matches!(result, Err(ScanError::MissingElement(_))));
        // The failure path still dismisses whatever menu was left open.
        assert_eq!(page.events().last(), Some(&Event::Escape));
        assert_eq!(page.open_section(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_polling_captures_slow_rendering_items() {
        // Items appear only on the second visibility sample after the
        // section opens; seeing the count change must trigger another poll.
        let page = two_section_menu().with_render_delay(1);
        let scan = MenuScanner::new().scan(&page).await.unwrap();

        assert_eq!(scan.sections[0].items.len(), 2);
        assert_eq!(scan.sections[1].items.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_cap_bounds_a_menu_that_never_stops_rendering() {
        let page = FakePage::new(
            "https://app.example/ui",
            vec![FakeSection { name: "Busy", items: vec![] }],
        )
        .never_settling();

        let scan = MenuScanner::new()
            .with_settle_cap(Duration::from_millis(500))
            .scan(&page)
            .await
            .unwrap();

        // The scan terminates normally with whatever was visible when the
        // cap ran out, rather than erroring or waiting forever.
        assert_eq!(scan.sections.len(), 1);
        assert!(!scan.sections[0].items.is_empty());
        assert_eq!(page.open_section(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_section_template() {
        let mut page = FakePage::new(
            "https://app.example/ui",
            vec![FakeSection { name: "Only", items: vec![] }],
        );
        page.section_prefix = "#nav_entry_".to_string();

        let scan = MenuScanner::new()
            .with_section_template("#nav_entry_{index}".to_string())
            .scan(&page)
            .await
            .unwrap();

        assert_eq!(scan.sections.len(), 1);
        assert_eq!(scan.sections[0].id, "#nav_entry_0");
    }

    #[test]
    fn test_strip_query_plain_url() {
        assert_eq!(
            strip_query("https://app.example/ui"),
            "https://app.example/ui"
        );
    }

    #[test]
    fn test_strip_query_unparseable_falls_back_to_truncation() {
        assert_eq!(strip_query("not a url?x=1"), "not a url");
    }
}
