//! MCP (Model Context Protocol) server implementation for mobile automation
//!
//! This module exposes the tool registry as rmcp-compatible tools. Parameter
//! structs are shared with the tool layer, so the JSON schema the agent sees
//! is exactly what the tools validate.

pub mod handler;
pub use handler::AppiumServer;

use crate::error::AutomationError;
use crate::tools::click::TapElementParams;
use crate::tools::device::{GetOrientationParams, PressBackParams};
use crate::tools::elements::GenerateLocatorsParams;
use crate::tools::gesture::{SwipeParams, TapPointParams};
use crate::tools::input::SendKeysParams;
use crate::tools::screenshot::ScreenshotParams;
use crate::tools::session::{CloseSessionParams, CreateSessionParams, ListSessionsParams};
use crate::tools::source::GetSourceParams;
use crate::tools::ToolResult as InternalToolResult;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    tool, tool_router,
    ErrorData as McpError,
};
use serde::Serialize;

/// Convert internal ToolResult to MCP CallToolResult
fn convert_result(result: InternalToolResult) -> Result<CallToolResult, McpError> {
    if result.success {
        let text = if let Some(data) = result.data {
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
        } else {
            "Success".to_string()
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    } else {
        let error_msg = result.error.unwrap_or_else(|| "Unknown error".to_string());
        Err(McpError::internal_error(error_msg, None))
    }
}

fn convert_error(error: AutomationError) -> McpError {
    match error {
        AutomationError::InvalidParams(msg) => McpError::invalid_params(msg, None),
        AutomationError::UnknownTool(name) => {
            McpError::invalid_params(format!("Unknown tool: {}", name), None)
        }
        other => McpError::internal_error(other.to_string(), None),
    }
}

#[tool_router]
impl AppiumServer {
    async fn run<P: Serialize>(&self, name: &str, params: P) -> Result<CallToolResult, McpError> {
        let value = serde_json::to_value(params)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let result = self
            .tools()
            .execute(name, value, self.context())
            .await
            .map_err(convert_error)?;
        convert_result(result)
    }

    /// Open a device session
    #[tool(description = "Create a new Appium session against a device or emulator")]
    async fn mobile_create_session(
        &self,
        params: Parameters<CreateSessionParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("create_session", params.0).await
    }

    /// Close a device session
    #[tool(description = "Close an Appium session by id")]
    async fn mobile_close_session(
        &self,
        params: Parameters<CloseSessionParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("close_session", params.0).await
    }

    /// List open sessions
    #[tool(description = "List all open Appium sessions")]
    async fn mobile_list_sessions(
        &self,
        params: Parameters<ListSessionsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("list_sessions", params.0).await
    }

    /// Fetch the raw accessibility-tree XML
    #[tool(description = "Get the raw accessibility-tree XML page source of the current screen")]
    async fn mobile_get_source(
        &self,
        params: Parameters<GetSourceParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_source", params.0).await
    }

    /// Generate locators for the current screen
    #[tool(description = "Analyze the current screen and return UI elements with ranked, \
                          uniqueness-verified locators (accessibility id, id, xpath, ...)")]
    async fn mobile_generate_locators(
        &self,
        params: Parameters<GenerateLocatorsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("generate_locators", params.0).await
    }

    /// Tap an element
    #[tool(description = "Tap an element resolved by a locator strategy and value")]
    async fn mobile_tap_element(
        &self,
        params: Parameters<TapElementParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("tap_element", params.0).await
    }

    /// Type into an element
    #[tool(description = "Type text into an element resolved by a locator strategy and value")]
    async fn mobile_send_keys(
        &self,
        params: Parameters<SendKeysParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("send_keys", params.0).await
    }

    /// Tap a point
    #[tool(description = "Tap absolute screen coordinates")]
    async fn mobile_tap_point(
        &self,
        params: Parameters<TapPointParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("tap_point", params.0).await
    }

    /// Swipe between two points
    #[tool(description = "Swipe from one screen point to another")]
    async fn mobile_swipe(
        &self,
        params: Parameters<SwipeParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("swipe", params.0).await
    }

    /// Take a screenshot
    #[tool(description = "Take a PNG screenshot of the current screen, base64-encoded")]
    async fn mobile_screenshot(
        &self,
        params: Parameters<ScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("screenshot", params.0).await
    }

    /// System back navigation
    #[tool(description = "Press the system back button (Android) or navigate back (iOS)")]
    async fn mobile_press_back(
        &self,
        params: Parameters<PressBackParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("press_back", params.0).await
    }

    /// Screen orientation
    #[tool(description = "Get the current screen orientation (PORTRAIT or LANDSCAPE)")]
    async fn mobile_get_orientation(
        &self,
        params: Parameters<GetOrientationParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_orientation", params.0).await
    }
}
