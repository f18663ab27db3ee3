use thiserror::Error;

/// Errors produced by the automation library
#[derive(Debug, Error)]
pub enum AutomationError {
    /// Failed to establish a WebDriver session with the Appium server
    #[error("Failed to create session: {0}")]
    SessionFailed(String),

    /// Failed to connect to the Appium server endpoint
    #[error("Failed to connect to Appium server: {0}")]
    ConnectionFailed(String),

    /// A WebDriver command failed after the session was established
    #[error("Driver command failed: {0}")]
    CommandFailed(String),

    /// No session is registered under the given id
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The page-source XML could not be parsed
    #[error("Failed to parse page source: {0}")]
    SourceParseFailed(String),

    /// An element could not be resolved on the device
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A tool rejected its parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// A tool failed while executing
    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    /// No tool is registered under the given name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AutomationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AutomationError::SessionNotFound("abc123".to_string());
        assert_eq!(err.to_string(), "Session not found: abc123");

        let err = AutomationError::ToolExecutionFailed {
            tool: "tap_element".to_string(),
            reason: "stale element".to_string(),
        };
        assert!(err.to_string().contains("tap_element"));
        assert!(err.to_string().contains("stale element"));
    }
}
