//! Tool system for device automation
//!
//! Each tool is a thin parameter-validated wrapper around the driver
//! session or the locator core. Tools are registered by name in a
//! [`ToolRegistry`] and executed with JSON parameters, which is also the
//! shape the MCP layer speaks.

pub mod click;
pub mod device;
pub mod elements;
pub mod gesture;
pub mod input;
pub mod screenshot;
pub mod session;
pub mod source;

pub use click::TapElementTool;
pub use device::{GetOrientationTool, PressBackTool};
pub use elements::GenerateLocatorsTool;
pub use gesture::{SwipeTool, TapPointTool};
pub use input::SendKeysTool;
pub use screenshot::ScreenshotTool;
pub use session::{CloseSessionTool, CreateSessionTool, ListSessionsTool};
pub use source::GetSourceTool;

use crate::driver::{DriverSession, SessionRegistry, DEFAULT_SERVER_URL};
use crate::error::{AutomationError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of a tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn success_with(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Shared state handed to every tool execution
#[derive(Clone)]
pub struct ToolContext {
    pub registry: Arc<SessionRegistry>,
    /// Appium server URL used when `create_session` gets none
    pub server_url: String,
}

impl ToolContext {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Resolve the session a tool call targets; `None` works when exactly
    /// one session is open.
    pub fn session(&self, session_id: Option<&str>) -> Result<Arc<DriverSession>> {
        self.registry.get(session_id)
    }
}

/// A typed automation tool
#[async_trait]
pub trait Tool: Send + Sync {
    type Params: DeserializeOwned + Send;

    fn name(&self) -> &str;

    async fn execute_typed(&self, params: Self::Params, context: &ToolContext)
        -> Result<ToolResult>;
}

/// Object-safe wrapper so tools with different param types share a registry
#[async_trait]
trait ErasedTool: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult>;
}

#[async_trait]
impl<T: Tool> ErasedTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> Result<ToolResult> {
        let typed: T::Params = serde_json::from_value(params)
            .map_err(|e| AutomationError::InvalidParams(format!("{}: {}", Tool::name(self), e)))?;
        self.execute_typed(typed, context).await
    }
}

/// Registry of tools executable by name with JSON parameters
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn ErasedTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in tool registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CreateSessionTool);
        registry.register(CloseSessionTool);
        registry.register(ListSessionsTool);
        registry.register(GetSourceTool);
        registry.register(GenerateLocatorsTool);
        registry.register(TapElementTool);
        registry.register(SendKeysTool);
        registry.register(TapPointTool);
        registry.register(SwipeTool);
        registry.register(ScreenshotTool);
        registry.register(PressBackTool);
        registry.register(GetOrientationTool);
        registry
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools
            .insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    pub async fn execute(
        &self,
        name: &str,
        params: Value,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| AutomationError::UnknownTool(name.to_string()))?;
        tool.execute(params, context).await
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
