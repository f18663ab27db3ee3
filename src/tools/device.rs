use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the press_back tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PressBackParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Tool triggering the system back navigation
#[derive(Default)]
pub struct PressBackTool;

#[async_trait]
impl Tool for PressBackTool {
    type Params = PressBackParams;

    fn name(&self) -> &str {
        "press_back"
    }

    async fn execute_typed(
        &self,
        params: PressBackParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let session = context.session(params.session_id.as_deref())?;
        session.back().await?;
        Ok(ToolResult::success())
    }
}

/// Parameters for the get_orientation tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetOrientationParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Tool reporting the current screen orientation
#[derive(Default)]
pub struct GetOrientationTool;

#[async_trait]
impl Tool for GetOrientationTool {
    type Params = GetOrientationParams;

    fn name(&self) -> &str {
        "get_orientation"
    }

    async fn execute_typed(
        &self,
        params: GetOrientationParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let session = context.session(params.session_id.as_deref())?;
        let orientation = session.orientation().await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "orientation": orientation,
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
        let err = PressBackTool
            .execute_typed(PressBackParams::default(), &context)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::AutomationError::SessionNotFound(_)
        ));
    }
}
