use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the get_source tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetSourceParams {
    /// Session to target; optional when only one session is open
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Tool returning the raw accessibility-tree XML for the current screen
#[derive(Default)]
pub struct GetSourceTool;

#[async_trait]
impl Tool for GetSourceTool {
    type Params = GetSourceParams;

    fn name(&self) -> &str {
        "get_source"
    }

    async fn execute_typed(
        &self,
        params: GetSourceParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let session = context.session(params.session_id.as_deref())?;
        let source = session.page_source().await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "platform": session.platform(),
            "source": source,
        })))
    }
}
