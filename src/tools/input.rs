use crate::error::Result;
use crate::locator::Strategy;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Parameters for the send_keys tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendKeysParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
    /// Locator strategy, as returned by generate_locators
    pub strategy: Strategy,
    /// Locator value
    pub value: String,
    /// Text to type into the element
    pub text: String,
    /// Clear the field before typing (default true)
    #[serde(default = "default_true")]
    pub clear: bool,
}

/// Tool for typing text into an element resolved by locator
#[derive(Default)]
pub struct SendKeysTool;

#[async_trait]
impl Tool for SendKeysTool {
    type Params = SendKeysParams;

    fn name(&self) -> &str {
        "send_keys"
    }

    async fn execute_typed(
        &self,
        params: SendKeysParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let session = context.session(params.session_id.as_deref())?;
        session
            .send_keys(params.strategy, &params.value, &params.text, params.clear)
            .await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "strategy": params.strategy,
            "value": params.value,
            "typed": params.text.chars().count(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_defaults_to_true() {
        let params: SendKeysParams = serde_json::from_value(serde_json::json!({
            "strategy": "id",
            "value": "com.app:id/email",
            "text": "user@example.com",
        }))
        .unwrap();
        assert!(params.clear);
    }

    #[test]
    fn test_text_is_required() {
        let result: std::result::Result<SendKeysParams, _> =
            serde_json::from_value(serde_json::json!({
                "strategy": "id",
                "value": "com.app:id/email",
            }));
        assert!(result.is_err());
    }
}
