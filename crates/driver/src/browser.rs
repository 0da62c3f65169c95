//! Supported browser backends.

use std::fmt;
use std::str::FromStr;

use autoqliq_core::AutomationError;
use serde::{Deserialize, Serialize};

/// Browser backend tags accepted by the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    /// Google Chrome / Chromium.
    Chrome,
    /// Mozilla Firefox.
    Firefox,
    /// Microsoft Edge.
    Edge,
    /// Apple Safari.
    Safari,
}

impl BrowserType {
    /// The lowercase tag used in configuration and error context.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
            Self::Safari => "safari",
        }
    }
}

impl fmt::Display for BrowserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserType {
    type Err = AutomationError;

    /// Parse a browser tag, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Config`] for unknown tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" => Ok(Self::Edge),
            "safari" => Ok(Self::Safari),
            other => Err(AutomationError::config(format!(
                "unsupported browser type: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("chrome", BrowserType::Chrome)]
    #[case("FIREFOX", BrowserType::Firefox)]
    #[case("Edge", BrowserType::Edge)]
    #[case("safari", BrowserType::Safari)]
    fn parses_known_tags(#[case] tag: &str, #[case] expected: BrowserType) {
        assert_eq!(tag.parse::<BrowserType>().unwrap(), expected);
    }

    #[test]
    fn unknown_tag_is_a_config_error() {
        let err = "netscape".parse::<BrowserType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: unsupported browser type: netscape"
        );
    }

    #[test]
    fn display_matches_serde_tag() {
        assert_eq!(BrowserType::Chrome.to_string(), "chrome");
        assert_eq!(
            serde_json::to_string(&BrowserType::Chrome).unwrap(),
            "\"chrome\""
        );
    }
}
