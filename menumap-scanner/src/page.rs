use crate::error::Result;
use async_trait::async_trait;

/// Point-in-time view of a matched menu element: its own id attribute and
/// inner text, captured together so the scanner never has to hold a live
/// element handle across an await point.
#[derive(Debug, Clone)]
pub struct ElementSnapshot {
    /// Value of the element's id attribute, without any prefix.
    pub id: String,
    /// Inner text as rendered, untrimmed.
    pub text: String,
}

/// Capability contract against a live page, consumed by the scanner.
///
/// All operations are strictly sequential from the scanner's point of view;
/// implementations do not need interior queuing. `visible_matches` is the
/// section-membership signal: it must return only elements that are visible
/// at the moment of the call, in DOM order.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Current page address, as the browser reports it.
    async fn current_url(&self) -> Result<String>;

    /// Number of elements matching the selector, visible or not.
    /// Used as the existence probe during section discovery.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Inner text of the first element matching the selector.
    /// Fails if no element matches.
    async fn text(&self, selector: &str) -> Result<String>;

    /// Click the first element matching the selector.
    /// Fails if no element matches.
    async fn click(&self, selector: &str) -> Result<()>;

    /// All currently visible elements matching the selector, in DOM order.
    /// Matches without an id attribute are omitted.
    async fn visible_matches(&self, selector: &str) -> Result<Vec<ElementSnapshot>>;

    /// Dispatch an Escape key press to the page.
    async fn press_escape(&self) -> Result<()>;
}
