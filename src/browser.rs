use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use headless_chrome::{Browser, LaunchOptions, Tab};

pub const NAV_TIMEOUT: Duration = Duration::from_secs(30);
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);
pub const INTER_URL_DELAY: Duration = Duration::from_secs(2);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// One Chrome instance with a single reusable tab, shared by a whole batch.
/// The cookie jar lives in this session between navigations. Dropping the
/// session kills the browser process, so teardown happens on every exit
/// path, including early returns.
pub struct BrowserSession {
    _browser: Browser,
    tab: Arc<Tab>,
}

/// What the orchestrator hands to the extractors once a page has settled.
pub struct RenderedPage {
    pub title: String,
    pub html: String,
    pub body_text: String,
}

impl BrowserSession {
    pub fn launch() -> Result<Self> {
        // Flags tuned for constrained sandboxed environments: no GPU, no
        // sandbox helpers, a single browser process.
        let mut args = vec![
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-setuid-sandbox"),
            OsStr::new("--disable-gpu"),
            OsStr::new("--single-process"),
            OsStr::new("--no-zygote"),
        ];
        let ua_arg = format!("--user-agent={}", USER_AGENT);
        args.push(OsStr::new(&ua_arg));

        let browser = Browser::new(LaunchOptions {
            headless: true,
            window_size: Some((1280, 800)),
            args,
            idle_browser_timeout: Duration::from_secs(90),
            ..Default::default()
        })?;

        let tab = browser.new_tab()?;
        tab.set_default_timeout(NAV_TIMEOUT);

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab.navigate_to(url)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    /// Reads the title, the serialized DOM, and the rendered body text from
    /// the current page.
    pub fn capture(&self) -> Result<RenderedPage> {
        let title = self.tab.get_title()?;
        let html = self.tab.get_content()?;
        let body_text = self
            .tab
            .evaluate("document.body ? document.body.innerText : ''", false)?
            .value
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .unwrap_or_default();

        Ok(RenderedPage {
            title,
            html,
            body_text,
        })
    }
}
