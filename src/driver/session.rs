use crate::driver::config::SessionOptions;
use crate::error::{AutomationError, Result};
use crate::locator::{Platform, Strategy, UNKNOWN_VIEWPORT};
use crate::source::xpath::xpath_literal;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use fantoccini::actions::{InputSource, PointerAction, TouchActions, MOUSE_BUTTON_LEFT};
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use std::time::Duration;

/// One live WebDriver session against an Appium server.
///
/// Thin wrapper over the fantoccini client: every method issues W3C commands
/// and translates failures into crate errors. The client is a cheap handle,
/// so the session can be shared behind an `Arc` across concurrent tool calls.
pub struct DriverSession {
    client: Client,
    platform: Platform,
}

impl DriverSession {
    /// Create a new session on the Appium server described by `options`.
    pub async fn connect(options: &SessionOptions) -> Result<Self> {
        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(&options.server_url)
            .await
            .map_err(|e| AutomationError::ConnectionFailed(e.to_string()))?;

        log::info!(
            "Created {:?} session against {}",
            options.platform,
            options.server_url
        );
        Ok(Self {
            client,
            platform: options.platform,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Fetch the accessibility-tree XML for the current screen.
    pub async fn page_source(&self) -> Result<String> {
        self.client
            .source()
            .await
            .map_err(|e| AutomationError::CommandFailed(format!("Failed to get page source: {}", e)))
    }

    /// Window size in device pixels. Unmeasurable windows degrade to a
    /// sentinel large enough that viewport filtering keeps everything.
    pub async fn viewport(&self) -> (i64, i64) {
        match self.client.get_window_size().await {
            Ok((w, h)) => (w as i64, h as i64),
            Err(e) => {
                log::debug!("Could not read window size, assuming unbounded: {}", e);
                (UNKNOWN_VIEWPORT, UNKNOWN_VIEWPORT)
            }
        }
    }

    /// Resolve a locator to an element on the device.
    ///
    /// Only strategies expressible as W3C finds are accepted here; the
    /// native-engine strategies (UiAutomator, predicate, class chain) have
    /// no wire equivalent in this client and are rejected upfront.
    pub async fn find(&self, strategy: Strategy, value: &str) -> Result<Element> {
        let xpath = self.strategy_xpath(strategy, value)?;
        self.client
            .find(Locator::XPath(&xpath))
            .await
            .map_err(|e| {
                AutomationError::ElementNotFound(format!(
                    "No element for {:?} '{}': {}",
                    strategy, value, e
                ))
            })
    }

    pub async fn click(&self, strategy: Strategy, value: &str) -> Result<()> {
        let element = self.find(strategy, value).await?;
        element
            .click()
            .await
            .map_err(|e| AutomationError::CommandFailed(format!("Click failed: {}", e)))
    }

    pub async fn send_keys(&self, strategy: Strategy, value: &str, text: &str, clear: bool) -> Result<()> {
        let element = self.find(strategy, value).await?;
        if clear {
            element
                .clear()
                .await
                .map_err(|e| AutomationError::CommandFailed(format!("Clear failed: {}", e)))?;
        }
        element
            .send_keys(text)
            .await
            .map_err(|e| AutomationError::CommandFailed(format!("Send keys failed: {}", e)))
    }

    /// Tap at absolute screen coordinates.
    pub async fn tap_point(&self, x: i64, y: i64) -> Result<()> {
        let actions = TouchActions::new("finger".to_string())
            .then(PointerAction::MoveTo {
                duration: Some(Duration::from_millis(0)),
                x,
                y,
            })
            .then(PointerAction::Down {
                button: MOUSE_BUTTON_LEFT,
            })
            .then(PointerAction::Up {
                button: MOUSE_BUTTON_LEFT,
            });
        self.perform(actions).await
    }

    /// Drag from one point to another over `duration_ms`.
    pub async fn swipe(
        &self,
        from: (i64, i64),
        to: (i64, i64),
        duration_ms: u64,
    ) -> Result<()> {
        let actions = TouchActions::new("finger".to_string())
            .then(PointerAction::MoveTo {
                duration: Some(Duration::from_millis(0)),
                x: from.0,
                y: from.1,
            })
            .then(PointerAction::Down {
                button: MOUSE_BUTTON_LEFT,
            })
            .then(PointerAction::MoveTo {
                duration: Some(Duration::from_millis(duration_ms)),
                x: to.0,
                y: to.1,
            })
            .then(PointerAction::Up {
                button: MOUSE_BUTTON_LEFT,
            });
        self.perform(actions).await
    }

    async fn perform(&self, actions: TouchActions) -> Result<()> {
        self.client
            .perform_actions(actions)
            .await
            .map_err(|e| AutomationError::CommandFailed(format!("Touch action failed: {}", e)))?;
        let _ = self.client.release_actions().await;
        Ok(())
    }

    /// PNG screenshot of the current screen, base64-encoded.
    pub async fn screenshot_base64(&self) -> Result<String> {
        let png = self
            .client
            .screenshot()
            .await
            .map_err(|e| AutomationError::CommandFailed(format!("Screenshot failed: {}", e)))?;
        Ok(BASE64.encode(png))
    }

    /// Hardware/system back (Android back button, iOS navigation back).
    pub async fn back(&self) -> Result<()> {
        self.client
            .back()
            .await
            .map_err(|e| AutomationError::CommandFailed(format!("Back failed: {}", e)))
    }

    /// Screen orientation derived from the window geometry.
    pub async fn orientation(&self) -> Result<String> {
        let (w, h) = self.viewport().await;
        Ok(if w > h { "LANDSCAPE" } else { "PORTRAIT" }.to_string())
    }

    /// End the session on the server.
    pub async fn close(&self) -> Result<()> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| AutomationError::CommandFailed(format!("Failed to close session: {}", e)))
    }

    fn strategy_xpath(&self, strategy: Strategy, value: &str) -> Result<String> {
        strategy_xpath(self.platform, strategy, value)
    }
}

/// Translate a find strategy into the XPath actually sent over the wire.
pub fn strategy_xpath(platform: Platform, strategy: Strategy, value: &str) -> Result<String> {
    let lit = xpath_literal(value);
    match (strategy, platform) {
        (Strategy::Xpath, _) => Ok(value.to_string()),
        (Strategy::AccessibilityId, Platform::Android) => {
            Ok(format!("//*[@content-desc={}]", lit))
        }
        (Strategy::AccessibilityId, Platform::Ios) => Ok(format!("//*[@name={}]", lit)),
        (Strategy::Id, Platform::Android) => Ok(format!("//*[@resource-id={}]", lit)),
        (Strategy::Id, Platform::Ios) => Ok(format!("//*[@name={}]", lit)),
        (Strategy::Text, Platform::Android) => Ok(format!("//*[@text={}]", lit)),
        (Strategy::Text, Platform::Ios) => Ok(format!("//*[@label={}]", lit)),
        (Strategy::ClassName, _) => Ok(format!("//{}", value)),
        (Strategy::UiAutomator | Strategy::PredicateString | Strategy::ClassChain, _) => {
            Err(AutomationError::InvalidParams(format!(
                "Strategy {:?} requires the platform's native selector engine; \
                 use the xpath locator instead",
                strategy
            )))
        }
    }
}
