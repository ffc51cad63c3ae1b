//! Browser session lifecycle
//!
//! `BrowserSession` owns one Chromium process and one page for the whole run.
//! Release happens through `close()` on every normal and aborted path, with
//! `BrowserWrapper::drop` as the last resort on panics and dropped futures.

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::driver::{NextAffordance, PageDriver};
use super::page_helpers::{evaluate_value, get_page_url_with_fallback, js_string};
use crate::browser_setup::{LaunchOptions, launch_browser};
use crate::config::HarvestConfig;
use crate::harvest_engine::page_timeout::with_page_timeout;
use crate::harvest_engine::{HarvestError, HarvestResult};

/// Hides the most common automation tell before any page script runs
const HIDE_WEBDRIVER_JS: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

const SCROLL_TO_BOTTOM_JS: &str =
    "(() => { window.scrollTo(0, document.body.scrollHeight); return true; })()";

const DOCUMENT_EXTENT_JS: &str =
    "Math.max(document.body ? document.body.scrollHeight : 0, document.documentElement.scrollHeight)";

/// Browser process plus its CDP handler task
///
/// The handler must be aborted once the browser is gone, and the profile
/// directory removed only after the process has exited.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(
        browser: Browser,
        handler: JoinHandle<()>,
        user_data_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            browser,
            handler,
            user_data_dir,
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser, wait for exit, then remove the profile directory
    pub(crate) async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.cleanup_temp_dir();
    }

    /// Remove the profile directory (blocking)
    ///
    /// Must run after the browser process exited, otherwise locked files on
    /// Windows make the removal fail.
    pub fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Cleaning up browser profile: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up browser profile {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop kills the Chrome child process
        if self.user_data_dir.is_some() {
            warn!("BrowserWrapper dropped without explicit shutdown - removing profile in Drop");
            self.cleanup_temp_dir();
        }
    }
}

/// The harvest's single browser session
pub struct BrowserSession {
    wrapper: Option<BrowserWrapper>,
    page: Option<Page>,
    navigation_timeout: Duration,
}

impl BrowserSession {
    /// Launch the browser and open the working page
    ///
    /// # Errors
    /// `HarvestError::SessionInit` when no browser can be found, downloaded or started.
    pub async fn open(config: &HarvestConfig) -> HarvestResult<Self> {
        let options = LaunchOptions {
            headless: config.headless(),
            user_agent: config.user_agent().to_string(),
            user_data_dir: config.chrome_data_dir().cloned(),
            request_timeout: config.page_load_timeout(),
        };

        let (browser, handler, user_data_dir) = launch_browser(&options)
            .await
            .map_err(|e| HarvestError::SessionInit(format!("{e:#}")))?;
        let wrapper = BrowserWrapper::new(browser, handler, user_data_dir);

        let page = match Self::prepare_page(&wrapper, config.user_agent()).await {
            Ok(page) => page,
            Err(e) => {
                wrapper.shutdown().await;
                return Err(HarvestError::SessionInit(e.to_string()));
            }
        };

        info!("Browser session ready");
        Ok(Self {
            wrapper: Some(wrapper),
            page: Some(page),
            navigation_timeout: config.page_load_timeout(),
        })
    }

    async fn prepare_page(wrapper: &BrowserWrapper, user_agent: &str) -> HarvestResult<Page> {
        let page = wrapper
            .browser()
            .new_page("about:blank")
            .await
            .map_err(|e| HarvestError::Browser(format!("Failed to create page: {e}")))?;

        page.execute(SetUserAgentOverrideParams {
            user_agent: user_agent.to_string(),
            accept_language: Some("en-US,en;q=0.9".to_string()),
            platform: None,
            user_agent_metadata: None,
        })
        .await
        .map_err(|e| HarvestError::Browser(format!("Failed to set user agent: {e}")))?;

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(1920)
            .height(1080)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(HarvestError::Browser)?;
        page.execute(metrics)
            .await
            .map_err(|e| HarvestError::Browser(format!("Failed to set viewport: {e}")))?;

        let hide_webdriver = AddScriptToEvaluateOnNewDocumentParams {
            source: HIDE_WEBDRIVER_JS.to_string(),
            include_command_line_api: None,
            world_name: None,
            run_immediately: None,
        };
        if let Err(e) = page.execute(hide_webdriver).await {
            warn!("Failed to install webdriver evasion: {}", e);
        }

        Ok(page)
    }

    fn page(&self) -> HarvestResult<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| HarvestError::Browser("Browser session is closed".to_string()))
    }
}

#[async_trait]
impl PageDriver for BrowserSession {
    async fn navigate(&mut self, url: &str) -> HarvestResult<()> {
        let page = self.page()?;
        let timeout = self.navigation_timeout;
        let nav_error = |message: String| HarvestError::Navigation {
            url: url.to_string(),
            message,
        };

        with_page_timeout(
            async {
                page.goto(url).await.map_err(|e| nav_error(e.to_string()))?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| nav_error(e.to_string()))?;
                Ok(())
            },
            timeout,
            || nav_error(format!("navigation timeout after {} seconds", timeout.as_secs())),
        )
        .await?;

        debug!("Navigated to {}", get_page_url_with_fallback(page).await);
        Ok(())
    }

    async fn count_markers(&mut self, selector: &str) -> HarvestResult<usize> {
        let script = format!("document.querySelectorAll({}).length", js_string(selector)?);
        evaluate_value::<usize>(self.page()?, &script).await
    }

    async fn reveal_more(&mut self) -> HarvestResult<()> {
        evaluate_value::<bool>(self.page()?, SCROLL_TO_BOTTOM_JS)
            .await
            .map(|_| ())
    }

    async fn document_extent(&mut self) -> HarvestResult<u64> {
        evaluate_value::<f64>(self.page()?, DOCUMENT_EXTENT_JS)
            .await
            .map(|h| h.max(0.0) as u64)
    }

    async fn rendered_document(&mut self) -> HarvestResult<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| HarvestError::Browser(format!("Failed to read page content: {e}")))
    }

    async fn next_affordance(&mut self, selector: &str) -> HarvestResult<NextAffordance> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return "absent";
                const cls = el.getAttribute("class") || "";
                if (el.disabled === true
                    || el.hasAttribute("disabled")
                    || el.getAttribute("aria-disabled") === "true"
                    || cls.includes("disabled")) return "disabled";
                return "enabled";
            }})()"#,
            js_string(selector)?
        );
        evaluate_value::<NextAffordance>(self.page()?, &script).await
    }

    async fn close(&mut self) -> HarvestResult<()> {
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            debug!("Failed to close page: {}", e);
        }
        if let Some(wrapper) = self.wrapper.take() {
            info!("Shutting down browser session");
            wrapper.shutdown().await;
        }
        Ok(())
    }
}
