use crate::driver::SessionRegistry;
use crate::tools::{ToolContext, ToolRegistry};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::model::{
    Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool_handler, ServerHandler};
use std::sync::Arc;

/// MCP server exposing mobile automation tools over an Appium backend.
///
/// Owns the session registry and tool registry; one instance serves every
/// connected MCP client, with sessions disambiguated by id.
pub struct AppiumServer {
    context: ToolContext,
    tools: ToolRegistry,
    tool_router: ToolRouter<Self>,
}

impl AppiumServer {
    pub fn new(server_url: impl Into<String>) -> Self {
        let context =
            ToolContext::new(Arc::new(SessionRegistry::new())).with_server_url(server_url);
        Self {
            context,
            tools: ToolRegistry::with_defaults(),
            tool_router: Self::tool_router(),
        }
    }

    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}

#[tool_handler]
impl ServerHandler for AppiumServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Mobile-app automation over Appium. Start with mobile_create_session \
                 (platform: android or ios), then mobile_generate_locators to discover \
                 elements with ranked locators, and interact via mobile_tap_element / \
                 mobile_send_keys using a returned strategy + value pair."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_advertises_tools() {
        let server = AppiumServer::new("http://127.0.0.1:4723");
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }
}
