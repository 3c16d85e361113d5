//! Headless Chrome driver built on chromiumoxide

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::BrowserSettings;
use crate::error::{Result, ScrapeError};

use super::{PageDriver, SessionLauncher};

/// Delay between cookie banner probes
const COOKIE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches one headless Chrome process per session
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let settings = &self.settings;
        let mut builder = BrowserConfig::builder()
            .window_size(settings.window_width, settings.window_height)
            .viewport(Viewport {
                width: settings.window_width,
                height: settings.window_height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: false,
                has_touch: false,
            })
            .request_timeout(settings.request_timeout())
            .arg("--disable-gpu");

        if !settings.headless {
            builder = builder.with_head();
        }
        if settings.disable_sandbox {
            builder = builder.no_sandbox().arg("--disable-dev-shm-usage");
        }
        if let Some(path) = &settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(ScrapeError::Launch)
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    type Driver = ChromiumDriver;

    async fn launch(&self) -> Result<ChromiumDriver> {
        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let mut driver = ChromiumDriver {
                    browser,
                    page: None,
                    handler_task: Some(handler_task),
                };
                let _ = driver.close().await;
                return Err(e.into());
            }
        };

        debug!("Browser session started");
        Ok(ChromiumDriver {
            browser,
            page: Some(page),
            handler_task: Some(handler_task),
        })
    }
}

/// A running Chrome process with a single tab
pub struct ChromiumDriver {
    browser: Browser,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
}

impl ChromiumDriver {
    fn page(&self) -> Result<&Page> {
        self.page.as_ref().ok_or(ScrapeError::SessionClosed)
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, script: &str) -> Result<T> {
        let result = self.page()?.evaluate(script).await?;
        Ok(result.into_value()?)
    }
}

/// Embed a Rust string as a JavaScript string literal.
fn js_string(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Script clicking the first visible, enabled button containing a label.
fn cookie_script(button_text: &str) -> Result<String> {
    Ok(format!(
        r#"(() => {{
    const label = {};
    const button = Array.from(document.querySelectorAll('button'))
        .find(b => b.textContent.includes(label) && !b.disabled && b.offsetParent !== null);
    if (!button) return false;
    button.click();
    return true;
}})()"#,
        js_string(button_text)?
    ))
}

/// Script applying the next-control rules and clicking through the DOM,
/// which sidesteps overlays covering the pager.
fn next_script(glyph: &str) -> Result<String> {
    Ok(format!(
        r#"(() => {{
    const glyph = {};
    const link = Array.from(document.querySelectorAll('a'))
        .find(a => a.textContent.trim() === glyph);
    if (!link) return 'missing';
    const parent = link.parentElement;
    if (parent && String(parent.className).includes('disabled')) return 'disabled';
    link.click();
    return 'clicked';
}})()"#,
        js_string(glyph)?
    ))
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn load_page(&mut self, url: &str) -> Result<()> {
        let page = self.page()?;
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        debug!(url, "Page loaded");
        Ok(())
    }

    async fn dismiss_cookie_banner_if_present(
        &mut self,
        button_text: &str,
        timeout: Duration,
    ) -> Result<bool> {
        let script = cookie_script(button_text)?;
        let deadline = Instant::now() + timeout;

        loop {
            if self.evaluate::<bool>(&script).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(COOKIE_POLL_INTERVAL).await;
        }
    }

    async fn content(&mut self) -> Result<String> {
        Ok(self.page()?.content().await?)
    }

    async fn click_next(&mut self, glyph: &str) -> Result<bool> {
        let state: String = self.evaluate(&next_script(glyph)?).await?;
        match state.as_str() {
            "clicked" => Ok(true),
            "missing" | "disabled" => {
                debug!(state = %state, "Next control not followable");
                Ok(false)
            }
            other => Err(ScrapeError::Script(format!("next control reported '{}'", other))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.page = None;
        let closed = self.browser.close().await;
        // Reap the process even if the CDP close command failed
        let waited = self.browser.wait().await;
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        closed?;
        waited?;
        debug!("Browser session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("»").unwrap(), "\"»\"");
        assert_eq!(js_string("a'b\"c").unwrap(), "\"a'b\\\"c\"");
    }

    #[test]
    fn test_scripts_embed_labels() {
        let script = next_script("»").unwrap();
        assert!(script.contains("const glyph = \"»\";"));
        assert!(script.contains("'disabled'"));

        let script = cookie_script("Aceptar").unwrap();
        assert!(script.contains("const label = \"Aceptar\";"));
    }

    #[test]
    fn test_browser_config_builds() {
        let launcher = ChromiumLauncher::new(BrowserSettings {
            chrome_executable: Some("/usr/bin/true".into()),
            ..BrowserSettings::default()
        });
        assert!(launcher.browser_config().is_ok());
    }
}
