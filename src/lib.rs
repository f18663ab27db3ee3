//! # appium-use
//!
//! A Rust library for mobile-app automation via WebDriver/Appium, designed for AI agent integration.
//!
//! ## Features
//!
//! - **MCP Server**: Model Context Protocol server for AI-driven mobile automation
//! - **Session Management**: Create and manage Appium device sessions through an explicit registry
//! - **Locator Generation**: Parse the platform accessibility tree and derive ranked,
//!   uniqueness-verified element locators (accessibility id, resource id, UiAutomator,
//!   predicate string, class chain, XPath)
//! - **Tool System**: High-level device operations (tap, type, swipe, screenshot, etc.)
//!
//! ## MCP Server
//!
//! The recommended way to use this library is via the Model Context Protocol (MCP) server,
//! which exposes mobile automation tools to AI agents like Claude:
//!
//! ```bash
//! # Stdio transport against a local Appium server
//! cargo run --bin mcp-server --features mcp-server
//!
//! # Against a remote Appium server
//! cargo run --bin mcp-server --features mcp-server -- --appium-url http://device-farm:4723
//! ```
//!
//! ## Library Usage (Advanced)
//!
//! The locator-generation core is pure over its inputs and usable without a device:
//!
//! ```rust
//! use appium_use::locator::{generate_elements, FilterConfig, Platform};
//!
//! let xml = r#"<hierarchy>
//!   <android.widget.FrameLayout bounds="[0,0][1080,1920]">
//!     <android.widget.Button resource-id="com.app:id/ok" text="OK"
//!                            clickable="true" bounds="[40,100][400,200]"/>
//!   </android.widget.FrameLayout>
//! </hierarchy>"#;
//!
//! let elements = generate_elements(xml, Platform::Android, (1080, 1920), &FilterConfig::default());
//! assert!(!elements.is_empty());
//! ```
//!
//! Driving a real device goes through [`driver::SessionRegistry`] and the tool system:
//!
//! ```rust,no_run
//! use appium_use::driver::{SessionOptions, SessionRegistry};
//! use appium_use::locator::Platform;
//! use std::sync::Arc;
//!
//! # async fn run() -> appium_use::Result<()> {
//! let registry = Arc::new(SessionRegistry::new());
//! let options = SessionOptions::new(Platform::Android).device_name("emulator-5554");
//! let session_id = registry.create(&options).await?;
//!
//! let session = registry.get(Some(&session_id))?;
//! let source = session.page_source().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`source`]: accessibility-tree XML parsing (tree, document, bounds, XPath queries)
//! - [`locator`]: element classification, locator synthesis and the generation orchestrator
//! - [`driver`]: Appium session lifecycle and the session registry
//! - [`tools`]: device automation tools (sessions, locators, tap, type, swipe, ...)
//! - [`error`]: error types and result aliases
//! - [`mcp`]: **Model Context Protocol server** (requires `mcp-handler` feature) - **Start here for AI integration**

pub mod driver;
pub mod error;
pub mod locator;
pub mod source;
pub mod tools;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use driver::{DriverSession, SessionOptions, SessionRegistry};
pub use error::{AutomationError, Result};
pub use locator::{generate_elements, ElementWithLocators, FilterConfig, Platform, Strategy};
pub use source::{Bounds, SourceNode};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};

#[cfg(feature = "mcp-handler")]
pub use mcp::AppiumServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;
