use crate::error::Result;
use crate::locator::Strategy;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the tap_element tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TapElementParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
    /// Locator strategy, as returned by generate_locators
    pub strategy: Strategy,
    /// Locator value
    pub value: String,
}

/// Tool for tapping an element resolved by locator
#[derive(Default)]
pub struct TapElementTool;

#[async_trait]
impl Tool for TapElementTool {
    type Params = TapElementParams;

    fn name(&self) -> &str {
        "tap_element"
    }

    async fn execute_typed(
        &self,
        params: TapElementParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let session = context.session(params.session_id.as_deref())?;
        session.click(params.strategy, &params.value).await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "strategy": params.strategy,
            "value": params.value,
            "tapped": true,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_accept_wire_strategy_names() {
        let params: TapElementParams = serde_json::from_value(serde_json::json!({
            "strategy": "accessibility id",
            "value": "Login",
        }))
        .unwrap();
        assert_eq!(params.strategy, Strategy::AccessibilityId);
        assert_eq!(params.value, "Login");
        assert!(params.session_id.is_none());
    }

    #[test]
    fn test_value_is_required() {
        let result: std::result::Result<TapElementParams, _> =
            serde_json::from_value(serde_json::json!({"strategy": "xpath"}));
        assert!(result.is_err());
    }
}
