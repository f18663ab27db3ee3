//! Driver module
//!
//! Session lifecycle against an Appium server: capability construction,
//! the per-session WebDriver wrapper, and the id-keyed registry the tool
//! layer resolves sessions through.

pub mod config;
pub mod registry;
pub mod session;

pub use config::{SessionOptions, DEFAULT_SERVER_URL};
pub use registry::{SessionInfo, SessionRegistry};
pub use session::DriverSession;
