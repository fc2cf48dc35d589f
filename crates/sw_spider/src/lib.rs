use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::emulation::SetTimezoneOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::future::join_all;
use futures::StreamExt;
use tracing::{debug, warn};

use sw_core::{Error, Result};

pub mod extract;

pub use extract::visible_text;

/// Rendered-and-extracted text for one URL. `text` is empty when the
/// navigation failed or timed out.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timezone: String,
    pub locale: String,
    pub window: (u32, u32),
    pub navigation_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/88.0.4324.182 Safari/537.36"
                .to_string(),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8,ja;q=0.7".to_string(),
            timezone: "Asia/Shanghai".to_string(),
            locale: "zh-CN".to_string(),
            window: (1920, 1080),
            navigation_timeout: Duration::from_secs(60),
        }
    }
}

/// Fetches rendered page text through a headless browser.
///
/// One browser instance is launched per `fetch_all` call; every URL gets
/// its own page, all launched together and awaited together. There is no
/// retry and no partial result: the call returns exactly one record per
/// input URL.
pub struct PageFetcher {
    config: FetchConfig,
}

impl PageFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<FetchedPage>> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let (width, height) = self.config.window;
        let browser_config = BrowserConfig::builder()
            .window_size(width, height)
            .arg("--ignore-certificate-errors")
            .arg(format!("--lang={}", self.config.locale))
            .build()
            .map_err(Error::Fetch)?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| Error::Fetch(format!("failed to launch browser: {}", e)))?;

        // The CDP event stream must be drained for the connection to make
        // progress.
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let fetches = urls.iter().map(|url| self.fetch_page(&browser, url));
        let pages = join_all(fetches).await;

        if let Err(e) = browser.close().await {
            warn!("🕷️ failed to close browser cleanly: {}", e);
        }
        let _ = browser.wait().await;
        event_loop.abort();

        Ok(pages)
    }

    /// Fetch a single page, folding every failure into empty text so one
    /// bad URL never fails the batch.
    async fn fetch_page(&self, browser: &Browser, url: &str) -> FetchedPage {
        match self.try_fetch(browser, url).await {
            Ok(text) => {
                debug!("🕷️ fetched {} ({} chars)", url, text.chars().count());
                FetchedPage {
                    url: url.to_string(),
                    text,
                }
            }
            Err(e) => {
                warn!("🕷️ fetch failed for {}: {}", url, e);
                FetchedPage {
                    url: url.to_string(),
                    text: String::new(),
                }
            }
        }
    }

    async fn try_fetch(&self, browser: &Browser, url: &str) -> Result<String> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Fetch(format!("failed to open page: {}", e)))?;

        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(&self.config.user_agent)
            .accept_language(&self.config.accept_language)
            .build()
            .map_err(Error::Fetch)?;
        page.set_user_agent(user_agent)
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let timezone = SetTimezoneOverrideParams::builder()
            .timezone_id(&self.config.timezone)
            .build()
            .map_err(Error::Fetch)?;
        page.execute(timezone)
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let navigation = async {
            page.goto(url)
                .await
                .map_err(|e| Error::Fetch(format!("navigation failed: {}", e)))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| Error::Fetch(format!("navigation failed: {}", e)))?;
            page.content()
                .await
                .map_err(|e| Error::Fetch(format!("failed to read content: {}", e)))
        };

        let html = tokio::time::timeout(self.config.navigation_timeout, navigation)
            .await
            .map_err(|_| {
                Error::Fetch(format!(
                    "navigation timed out after {:?}",
                    self.config.navigation_timeout
                ))
            })??;

        if let Err(e) = page.close().await {
            debug!("🕷️ failed to close page for {}: {}", url, e);
        }

        Ok(extract::visible_text(&html))
    }
}
