use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every string the tool returns
pub const TOOL_MSG_PREFIX: &str = "TOOL OUTPUT: ";

/// Marks a successful scrape inside the tool string
pub const SCRAPED_TEXT_TAG: &str = "SCRAPED TEXT::";

/// Outcome of one tool invocation.
///
/// Rendered with `Display` into the single string handed to the agent:
/// `TOOL OUTPUT: SCRAPED TEXT:: <text>` on success, `TOOL OUTPUT: <message>`
/// on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolOutput {
    /// Truncated article text
    Scraped(String),
    /// Message naming the failed stage
    Error(String),
}

impl ToolOutput {
    pub fn is_scraped(&self) -> bool {
        matches!(self, ToolOutput::Scraped(_))
    }

    /// The article text, if the scrape succeeded
    pub fn scraped_text(&self) -> Option<&str> {
        match self {
            ToolOutput::Scraped(text) => Some(text),
            ToolOutput::Error(_) => None,
        }
    }

    /// Recover the outcome from a tool string; `None` if the prefix is missing
    pub fn from_tool_string(output: &str) -> Option<Self> {
        let body = output.strip_prefix(TOOL_MSG_PREFIX)?;
        match body.strip_prefix(SCRAPED_TEXT_TAG) {
            Some(text) => Some(ToolOutput::Scraped(
                text.strip_prefix(' ').unwrap_or(text).to_string(),
            )),
            None => Some(ToolOutput::Error(body.to_string())),
        }
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutput::Scraped(text) => {
                write!(f, "{}{} {}", TOOL_MSG_PREFIX, SCRAPED_TEXT_TAG, text)
            }
            ToolOutput::Error(message) => write!(f, "{}{}", TOOL_MSG_PREFIX, message),
        }
    }
}
