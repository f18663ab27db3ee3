use crate::locator::Platform;
use serde_json::{json, Map, Value};

/// Appium server endpoint used when none is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723";

/// Session configuration translated into W3C capabilities at connect time.
///
/// Everything Appium-specific is emitted under the `appium:` vendor prefix;
/// arbitrary extra capabilities can be merged in for options this struct
/// does not model.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Appium server URL, e.g. `http://127.0.0.1:4723`
    pub server_url: String,
    pub platform: Platform,
    /// Automation backend; defaults to UiAutomator2 / XCUITest per platform
    pub automation_name: Option<String>,
    pub device_name: Option<String>,
    /// Path or URL of the app package to install
    pub app: Option<String>,
    /// Android app package to launch
    pub app_package: Option<String>,
    /// Android activity to launch
    pub app_activity: Option<String>,
    /// iOS bundle identifier to launch
    pub bundle_id: Option<String>,
    /// Device serial / UDID when several devices are attached
    pub udid: Option<String>,
    /// Keep app state between sessions
    pub no_reset: bool,
    /// Idle timeout before Appium reaps the session, in seconds
    pub new_command_timeout_secs: u64,
    /// Raw capabilities merged last, overriding the modeled ones
    pub extra_capabilities: Map<String, Value>,
}

impl SessionOptions {
    pub fn new(platform: Platform) -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            platform,
            automation_name: None,
            device_name: None,
            app: None,
            app_package: None,
            app_activity: None,
            bundle_id: None,
            udid: None,
            no_reset: true,
            new_command_timeout_secs: 3600,
            extra_capabilities: Map::new(),
        }
    }

    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn automation_name(mut self, name: impl Into<String>) -> Self {
        self.automation_name = Some(name.into());
        self
    }

    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn app_package(mut self, package: impl Into<String>) -> Self {
        self.app_package = Some(package.into());
        self
    }

    pub fn app_activity(mut self, activity: impl Into<String>) -> Self {
        self.app_activity = Some(activity.into());
        self
    }

    pub fn bundle_id(mut self, bundle_id: impl Into<String>) -> Self {
        self.bundle_id = Some(bundle_id.into());
        self
    }

    pub fn udid(mut self, udid: impl Into<String>) -> Self {
        self.udid = Some(udid.into());
        self
    }

    pub fn no_reset(mut self, no_reset: bool) -> Self {
        self.no_reset = no_reset;
        self
    }

    pub fn extra_capability(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra_capabilities.insert(key.into(), value);
        self
    }

    fn default_automation_name(&self) -> &'static str {
        match self.platform {
            Platform::Android => "UiAutomator2",
            Platform::Ios => "XCUITest",
        }
    }

    /// Build the W3C capability map sent with the new-session request.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert(
            "platformName".to_string(),
            json!(match self.platform {
                Platform::Android => "Android",
                Platform::Ios => "iOS",
            }),
        );
        caps.insert(
            "appium:automationName".to_string(),
            json!(self
                .automation_name
                .as_deref()
                .unwrap_or_else(|| self.default_automation_name())),
        );
        if let Some(v) = &self.device_name {
            caps.insert("appium:deviceName".to_string(), json!(v));
        }
        if let Some(v) = &self.app {
            caps.insert("appium:app".to_string(), json!(v));
        }
        if let Some(v) = &self.app_package {
            caps.insert("appium:appPackage".to_string(), json!(v));
        }
        if let Some(v) = &self.app_activity {
            caps.insert("appium:appActivity".to_string(), json!(v));
        }
        if let Some(v) = &self.bundle_id {
            caps.insert("appium:bundleId".to_string(), json!(v));
        }
        if let Some(v) = &self.udid {
            caps.insert("appium:udid".to_string(), json!(v));
        }
        caps.insert("appium:noReset".to_string(), json!(self.no_reset));
        caps.insert(
            "appium:newCommandTimeout".to_string(),
            json!(self.new_command_timeout_secs),
        );
        for (key, value) in &self.extra_capabilities {
            caps.insert(key.clone(), value.clone());
        }
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_android_capabilities() {
        let opts = SessionOptions::new(Platform::Android)
            .device_name("emulator-5554")
            .app_package("com.example.app")
            .app_activity(".MainActivity");
        let caps = opts.capabilities();

        assert_eq!(caps["platformName"], "Android");
        assert_eq!(caps["appium:automationName"], "UiAutomator2");
        assert_eq!(caps["appium:deviceName"], "emulator-5554");
        assert_eq!(caps["appium:appPackage"], "com.example.app");
        assert_eq!(caps["appium:appActivity"], ".MainActivity");
        assert_eq!(caps["appium:noReset"], true);
    }

    #[test]
    fn test_ios_defaults() {
        let caps = SessionOptions::new(Platform::Ios).capabilities();
        assert_eq!(caps["platformName"], "iOS");
        assert_eq!(caps["appium:automationName"], "XCUITest");
        assert!(!caps.contains_key("appium:deviceName"));
    }

    #[test]
    fn test_extra_capabilities_override() {
        let opts = SessionOptions::new(Platform::Android)
            .extra_capability("appium:automationName", json!("Espresso"));
        let caps = opts.capabilities();
        assert_eq!(caps["appium:automationName"], "Espresso");
    }

    #[test]
    fn test_builder_server_url() {
        let opts = SessionOptions::new(Platform::Android).server_url("http://appium:4723");
        assert_eq!(opts.server_url, "http://appium:4723");
    }
}
