use crate::error::{AutomationError, Result};
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_swipe_duration_ms() -> u64 {
    800
}

/// Parameters for the tap_point tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TapPointParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
    /// Absolute x coordinate in device pixels
    pub x: i64,
    /// Absolute y coordinate in device pixels
    pub y: i64,
}

/// Tool for tapping absolute screen coordinates
#[derive(Default)]
pub struct TapPointTool;

#[async_trait]
impl Tool for TapPointTool {
    type Params = TapPointParams;

    fn name(&self) -> &str {
        "tap_point"
    }

    async fn execute_typed(
        &self,
        params: TapPointParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        if params.x < 0 || params.y < 0 {
            return Err(AutomationError::InvalidParams(
                "tap coordinates must be non-negative".to_string(),
            ));
        }
        let session = context.session(params.session_id.as_deref())?;
        session.tap_point(params.x, params.y).await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "x": params.x,
            "y": params.y,
            "tapped": true,
        })))
    }
}

/// Parameters for the swipe tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwipeParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
    /// Swipe duration in milliseconds (default 800)
    #[serde(default = "default_swipe_duration_ms")]
    pub duration_ms: u64,
}

/// Tool for swiping between two points
#[derive(Default)]
pub struct SwipeTool;

#[async_trait]
impl Tool for SwipeTool {
    type Params = SwipeParams;

    fn name(&self) -> &str {
        "swipe"
    }

    async fn execute_typed(&self, params: SwipeParams, context: &ToolContext) -> Result<ToolResult> {
        if params.start_x < 0 || params.start_y < 0 || params.end_x < 0 || params.end_y < 0 {
            return Err(AutomationError::InvalidParams(
                "swipe coordinates must be non-negative".to_string(),
            ));
        }
        let session = context.session(params.session_id.as_deref())?;
        session
            .swipe(
                (params.start_x, params.start_y),
                (params.end_x, params.end_y),
                params.duration_ms,
            )
            .await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "from": { "x": params.start_x, "y": params.start_y },
            "to": { "x": params.end_x, "y": params.end_y },
            "duration_ms": params.duration_ms,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::SessionRegistry;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_negative_coordinates_rejected() {
        let context = ToolContext::new(Arc::new(SessionRegistry::new()));
        let err = TapPointTool
            .execute_typed(
                TapPointParams {
                    session_id: None,
                    x: -1,
                    y: 10,
                },
                &context,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AutomationError::InvalidParams(_)));
    }

    #[test]
    fn test_swipe_duration_default() {
        let params: SwipeParams = serde_json::from_value(serde_json::json!({
            "start_x": 500, "start_y": 1500, "end_x": 500, "end_y": 300,
        }))
        .unwrap();
        assert_eq!(params.duration_ms, 800);
    }
}
