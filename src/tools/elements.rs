use crate::error::Result;
use crate::locator::{generate_elements, ElementWithLocators, FilterConfig, Platform, Strategy};
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Display text longer than this is truncated in tool output
const MAX_TEXT_LEN: usize = 80;

fn default_true() -> bool {
    true
}

fn default_max_elements() -> usize {
    50
}

/// Parameters for the generate_locators tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GenerateLocatorsParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
    /// Full filter configuration; overrides include_containers when given
    #[serde(default)]
    pub filter: Option<FilterConfig>,
    /// Keep bare layout containers in the output (default false)
    #[serde(default)]
    pub include_containers: bool,
    /// Only return elements fully inside the viewport (default true)
    #[serde(default = "default_true")]
    pub in_viewport_only: bool,
    /// Number of leading elements to skip
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of elements to return (default 50)
    #[serde(default = "default_max_elements")]
    pub max_elements: usize,
}

/// One locator entry in the tool output
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocatorEntry {
    pub strategy: Strategy,
    pub value: String,
}

/// Tool output shape for one element: a primary locator picked by strategy
/// priority plus the remaining candidates as alternatives.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ElementSummary {
    pub tag_name: String,
    pub primary: LocatorEntry,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alternatives: Vec<LocatorEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_id: Option<String>,
    pub clickable: bool,
    pub enabled: bool,
    pub displayed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<crate::source::Bounds>,
    pub in_viewport: bool,
    pub path: String,
}

/// Tool running the locator-generation core against the current screen
#[derive(Default)]
pub struct GenerateLocatorsTool;

#[async_trait]
impl Tool for GenerateLocatorsTool {
    type Params = GenerateLocatorsParams;

    fn name(&self) -> &str {
        "generate_locators"
    }

    async fn execute_typed(
        &self,
        params: GenerateLocatorsParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let session = context.session(params.session_id.as_deref())?;
        let platform = session.platform();
        let source = session.page_source().await?;
        let viewport = session.viewport().await;

        let config = match (&params.filter, params.include_containers) {
            (Some(filter), _) => filter.clone(),
            (None, true) => FilterConfig::default(),
            (None, false) => FilterConfig::without_containers(platform),
        };

        let elements = generate_elements(&source, platform, viewport, &config);
        let total = elements.len();

        let summaries: Vec<ElementSummary> = elements
            .into_iter()
            .filter(|e| !params.in_viewport_only || e.in_viewport)
            .skip(params.offset)
            .take(params.max_elements)
            .map(|e| summarize(e, platform))
            .collect();

        Ok(ToolResult::success_with(serde_json::json!({
            "platform": platform,
            "viewport": { "width": viewport.0, "height": viewport.1 },
            "total": total,
            "offset": params.offset,
            "count": summaries.len(),
            "elements": summaries,
        })))
    }
}

/// Split an element's locator map into primary + alternatives by strategy
/// priority, and truncate display text for transport.
fn summarize(element: ElementWithLocators, platform: Platform) -> ElementSummary {
    let mut entries: Vec<LocatorEntry> = element
        .locators
        .into_iter()
        .map(|(strategy, value)| LocatorEntry { strategy, value })
        .collect();
    // Stable sort keeps synthesis order among equal-priority entries
    entries.sort_by_key(|e| e.strategy.priority(platform));

    let mut iter = entries.into_iter();
    let primary = match iter.next() {
        Some(entry) => entry,
        // The orchestrator drops zero-locator elements, so this arm only
        // defends against a future regression there
        None => LocatorEntry {
            strategy: Strategy::Xpath,
            value: format!("//{}", element.tag_name),
        },
    };

    ElementSummary {
        tag_name: element.tag_name,
        primary,
        alternatives: iter.collect(),
        text: element.text.map(|t| truncate(&t)),
        resource_id: element.resource_id,
        accessibility_id: element.accessibility_id,
        clickable: element.clickable,
        enabled: element.enabled,
        displayed: element.displayed,
        bounds: element.bounds,
        in_viewport: element.in_viewport,
        path: element.path,
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_TEXT_LEN {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_TEXT_LEN).collect();
        format!("{}...", cut)
    }
}
