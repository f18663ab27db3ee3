use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mobile platform the accessibility tree was captured on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Best-effort detection from a free-text automation name capability
    /// (e.g. "UiAutomator2", "XCUITest"). Callers that already hold a
    /// normalized platform should construct the enum directly instead.
    pub fn from_automation_name(name: &str) -> Option<Platform> {
        let lower = name.to_lowercase();
        if lower.contains("uiautomator") || lower.contains("espresso") {
            Some(Platform::Android)
        } else if lower.contains("xcuitest") || lower.contains("xcui") {
            Some(Platform::Ios)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locator strategy, serialized with Appium wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Strategy {
    #[serde(rename = "accessibility id")]
    AccessibilityId,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "class name")]
    ClassName,
    #[serde(rename = "xpath")]
    Xpath,
    #[serde(rename = "-ios predicate string")]
    PredicateString,
    #[serde(rename = "-ios class chain")]
    ClassChain,
    #[serde(rename = "-android uiautomator")]
    UiAutomator,
    #[serde(rename = "text")]
    Text,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::AccessibilityId => "accessibility id",
            Strategy::Id => "id",
            Strategy::ClassName => "class name",
            Strategy::Xpath => "xpath",
            Strategy::PredicateString => "-ios predicate string",
            Strategy::ClassChain => "-ios class chain",
            Strategy::UiAutomator => "-android uiautomator",
            Strategy::Text => "text",
        }
    }

    /// Whether the strategy supports positional disambiguation when the
    /// underlying selector matches more than one element.
    pub fn supports_indexing(&self) -> bool {
        matches!(
            self,
            Strategy::UiAutomator | Strategy::Xpath | Strategy::ClassChain
        )
    }

    /// Strategy priority used when picking a primary locator, most stable
    /// first. Lower rank wins.
    pub fn priority(&self, platform: Platform) -> usize {
        let order: &[Strategy] = match platform {
            Platform::Android => &[
                Strategy::AccessibilityId,
                Strategy::Id,
                Strategy::UiAutomator,
                Strategy::Text,
                Strategy::ClassName,
                Strategy::Xpath,
            ],
            Platform::Ios => &[
                Strategy::AccessibilityId,
                Strategy::PredicateString,
                Strategy::ClassChain,
                Strategy::ClassName,
                Strategy::Xpath,
            ],
        };
        order
            .iter()
            .position(|s| s == self)
            .unwrap_or(order.len())
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
