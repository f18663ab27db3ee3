use crate::driver::SessionOptions;
use crate::error::Result;
use crate::locator::Platform;
use crate::tools::{Tool, ToolContext, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the create_session tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateSessionParams {
    /// Target platform
    pub platform: Platform,
    /// Appium server URL; falls back to the server's configured default
    #[serde(default)]
    pub server_url: Option<String>,
    /// Automation backend override (UiAutomator2 / XCUITest by default)
    #[serde(default)]
    pub automation_name: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    /// Path or URL of the app package to install
    #[serde(default)]
    pub app: Option<String>,
    /// Android app package to launch
    #[serde(default)]
    pub app_package: Option<String>,
    /// Android activity to launch
    #[serde(default)]
    pub app_activity: Option<String>,
    /// iOS bundle identifier to launch
    #[serde(default)]
    pub bundle_id: Option<String>,
    /// Device serial / UDID
    #[serde(default)]
    pub udid: Option<String>,
    /// Keep app state between sessions (default true)
    #[serde(default = "default_true")]
    pub no_reset: bool,
}

fn default_true() -> bool {
    true
}

/// Tool for opening a new device session
#[derive(Default)]
pub struct CreateSessionTool;

#[async_trait]
impl Tool for CreateSessionTool {
    type Params = CreateSessionParams;

    fn name(&self) -> &str {
        "create_session"
    }

    async fn execute_typed(
        &self,
        params: CreateSessionParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let mut options = SessionOptions::new(params.platform)
            .server_url(params.server_url.unwrap_or_else(|| context.server_url.clone()))
            .no_reset(params.no_reset);
        if let Some(v) = params.automation_name {
            options = options.automation_name(v);
        }
        if let Some(v) = params.device_name {
            options = options.device_name(v);
        }
        if let Some(v) = params.app {
            options = options.app(v);
        }
        if let Some(v) = params.app_package {
            options = options.app_package(v);
        }
        if let Some(v) = params.app_activity {
            options = options.app_activity(v);
        }
        if let Some(v) = params.bundle_id {
            options = options.bundle_id(v);
        }
        if let Some(v) = params.udid {
            options = options.udid(v);
        }

        let session_id = context.registry.create(&options).await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "session_id": session_id,
            "platform": params.platform,
        })))
    }
}

/// Parameters for the close_session tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CloseSessionParams {
    /// Id returned by create_session
    pub session_id: String,
}

/// Tool for ending a device session
#[derive(Default)]
pub struct CloseSessionTool;

#[async_trait]
impl Tool for CloseSessionTool {
    type Params = CloseSessionParams;

    fn name(&self) -> &str {
        "close_session"
    }

    async fn execute_typed(
        &self,
        params: CloseSessionParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        context.registry.dispose(&params.session_id).await?;
        Ok(ToolResult::success_with(serde_json::json!({
            "session_id": params.session_id,
            "closed": true,
        })))
    }
}

/// Parameters for the list_sessions tool (none)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListSessionsParams {}

/// Tool for listing open sessions
#[derive(Default)]
pub struct ListSessionsTool;

#[async_trait]
impl Tool for ListSessionsTool {
    type Params = ListSessionsParams;

    fn name(&self) -> &str {
        "list_sessions"
    }

    async fn execute_typed(
        &self,
        _params: ListSessionsParams,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let sessions = context.registry.list()?;
        Ok(ToolResult::success_with(serde_json::json!({
            "sessions": sessions,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::SessionRegistry;
    use std::sync::Arc;

    #[test]
    fn test_create_session_params_defaults() {
        let params: CreateSessionParams =
            serde_json::from_value(serde_json::json!({"platform": "android"})).unwrap();
        assert_eq!(params.platform, Platform::Android);
        assert!(params.no_reset);
        assert!(params.server_url.is_none());
    }

    #[test]
    fn test_platform_is_required() {
        let result: std::result::Result<CreateSessionParams, _> =
            serde_json::from_value(serde_json::json!({}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_close_unknown_session() {
        let context = ToolContext::new(Arc::new(SessionRegistry::new()));
        let err = CloseSessionTool
            .execute_typed(
                CloseSessionParams {
                    session_id: "missing".to_string(),
                },
                &context,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::AutomationError::SessionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_sessions_empty() {
        let context = ToolContext::new(Arc::new(SessionRegistry::new()));
        let result = ListSessionsTool
            .execute_typed(ListSessionsParams::default(), &context)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.data.unwrap()["sessions"], serde_json::json!([]));
    }
}
