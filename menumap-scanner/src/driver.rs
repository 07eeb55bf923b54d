use crate::error::{Result, ScanError};
use crate::page::{ElementSnapshot, PageDriver};
use async_trait::async_trait;
use fantoccini::actions::{InputSource, KeyAction, KeyActions};
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder, Locator};
use tracing::debug;

/// `PageDriver` backed by a live WebDriver session.
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    /// Establish a new session against a WebDriver endpoint
    /// (e.g. a local geckodriver or chromedriver).
    pub async fn connect(webdriver_url: &str) -> Result<Self> {
        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::native().connect(webdriver_url).await?;
        Ok(Self { client })
    }

    /// Wrap an already-established session.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Navigate the session to the given address.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    /// Close the browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn current_url(&self) -> Result<String> {
        let url = self.client.current_url().await?;
        Ok(url.to_string())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let matches = self.client.find_all(Locator::Css(selector)).await?;
        Ok(matches.len())
    }

    async fn text(&self, selector: &str) -> Result<String> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => Ok(element.text().await?),
            Err(e) if e.is_no_such_element() => {
                Err(ScanError::MissingElement(selector.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => {
                element.click().await?;
                Ok(())
            }
            Err(e) if e.is_no_such_element() => {
                Err(ScanError::MissingElement(selector.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn visible_matches(&self, selector: &str) -> Result<Vec<ElementSnapshot>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        let mut snapshots = Vec::new();

        for element in elements {
            if !element.is_displayed().await? {
                continue;
            }
            // An id-less match cannot be re-exposed as a selector; skip it.
            let Some(id) = element.attr("id").await?.filter(|id| !id.is_empty()) else {
                continue;
            };
            let text = element.text().await?;
            snapshots.push(ElementSnapshot { id, text });
        }

        Ok(snapshots)
    }

    async fn press_escape(&self) -> Result<()> {
        let keyboard = KeyActions::new("keyboard".to_string())
            .then(KeyAction::Down {
                value: Key::Escape.into(),
            })
            .then(KeyAction::Up {
                value: Key::Escape.into(),
            });
        self.client.perform_actions(keyboard).await?;
        Ok(())
    }
}
