use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the screenshot tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScreenshotParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Tool capturing a PNG screenshot of the current screen
#[derive(Default)]
pub struct ScreenshotTool;

#[async_trait]
impl Tool for ScreenshotTool {
    type Params = ScreenshotParams;

    fn name(&self) -> &str {
        "screenshot"
    }

    async fn execute_typed(
        &self,
        params: ScreenshotParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let session = context.session(params.session_id.as_deref())?;
        let data = session.screenshot_base64().await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "format": "png",
            "encoding": "base64",
            "data": data,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::SessionRegistry;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_requires_open_session() {
        let context = ToolContext::new(Arc::new(SessionRegistry::new()));
        let err = ScreenshotTool
            .execute_typed(ScreenshotParams::default(), &context)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::AutomationError::SessionNotFound(_)
        ));
    }
}
