use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use scraper::{ElementRef, Html, Selector};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::BrowserConfig;
use crate::utils::error::{AppError, Result};

/// One candidate listing on a results page, captured as visible text plus
/// its outer HTML so sub-elements can still be located after the page moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFragment {
    pub text: String,
    pub html: String,
}

impl ItemFragment {
    pub fn new(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: html.into(),
        }
    }

    fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            text: element_text(element),
            html: element.html(),
        }
    }

    /// Text of the first descendant matching `selector`, if any.
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        let fragment = Html::parse_fragment(&self.html);
        let text = fragment.select(selector).next().map(element_text);
        text
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Splits rendered page HTML into one fragment per element matching `selector`.
pub fn fragments_from_html(html: &str, selector: &str) -> Result<Vec<ItemFragment>> {
    let document = Html::parse_document(html);
    let css_selector = parse_selector(selector)?;
    Ok(document.select(&css_selector).map(ItemFragment::from_element).collect())
}

/// Only an elapsed wait counts as "not found in time"; any other failure
/// (closed connection, crashed tab, rejected selector) is a browser error.
fn wait_outcome(selector: &str, waited: anyhow::Result<()>) -> Result<bool> {
    match waited {
        Ok(()) => Ok(true),
        Err(e) if e.downcast_ref::<headless_chrome::util::Timeout>().is_some() => {
            tracing::debug!("Selector '{}' did not appear in time", selector);
            Ok(false)
        }
        Err(e) => Err(AppError::Browser(format!(
            "Waiting for selector '{}' failed: {}",
            selector, e
        ))),
    }
}

/// The rendering collaborator the comparison depends on.
///
/// One instance is shared by the whole run and used strictly sequentially.
#[async_trait]
pub trait PageRenderer: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Returns `false` if nothing matched `selector` before `timeout` elapsed.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<bool>;

    async fn find_all(&mut self, selector: &str) -> Result<Vec<ItemFragment>>;

    /// Releases the underlying resource. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Headless Chrome session holding a single tab for the whole run.
pub struct ChromeRenderer {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeRenderer {
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .window_size(Some((config.window_width, config.window_height)))
            .idle_browser_timeout(Duration::from_secs(config.idle_timeout_secs))
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("Failed to create tab: {}", e)))?;

        if let Some(user_agent) = &config.user_agent {
            tab.set_user_agent(user_agent, None, None)
                .map_err(|e| AppError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        tracing::info!("Launched headless Chrome (headless: {})", config.headless);

        Ok(Self {
            browser: Some(browser),
            tab: Some(tab),
        })
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| AppError::Browser("Browser session is already closed".to_string()))
    }

    fn shutdown(&mut self) {
        if let Some(tab) = self.tab.take() {
            if let Err(e) = tab.close(true) {
                tracing::debug!("Error closing tab: {}", e);
            }
        }
        if self.browser.take().is_some() {
            tracing::info!("Closed headless Chrome");
        }
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.navigate_to(url)
            .map_err(|e| AppError::Browser(format!("Navigation to {} failed: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| AppError::Browser(format!("Page load failed for {}: {}", url, e)))?;
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<bool> {
        let tab = self.tab()?;
        let waited = tab.wait_for_element_with_custom_timeout(selector, timeout).map(|_| ());
        wait_outcome(selector, waited)
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<ItemFragment>> {
        let html_content = self
            .tab()?
            .get_content()
            .map_err(|e| AppError::Browser(format!("Failed to get page content: {}", e)))?;

        fragments_from_html(&html_content, selector)
    }

    async fn close(&mut self) -> Result<()> {
        self.shutdown();
        Ok(())
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        // No-op when close() already ran.
        self.shutdown();
    }
}
