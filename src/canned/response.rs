use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A fictional response, replayed instead of hitting the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannedResponse {
    /// HTTP status code to report
    pub status: u16,

    /// When set, the navigation fails with this message instead of
    /// returning a status/body pair
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Simulated wall-clock roundtrip
    #[serde(default)]
    pub roundtrip: Duration,

    /// Page source to replay
    #[serde(default)]
    pub body: Vec<u8>,
}

impl CannedResponse {
    /// Create a canned response with the defaults: 200, empty body,
    /// zero roundtrip, no scripted failure
    pub fn new() -> Self {
        Self {
            status: 200,
            error: None,
            roundtrip: Duration::ZERO,
            body: Vec::new(),
        }
    }

    /// Builder method: set the status code
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Builder method: set the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builder method: set the simulated roundtrip
    pub fn with_roundtrip(mut self, roundtrip: Duration) -> Self {
        self.roundtrip = roundtrip;
        self
    }

    /// Builder method: script a failure to raise on replay
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

impl Default for CannedResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let can = CannedResponse::new();
        assert_eq!(can.status, 200);
        assert!(can.error.is_none());
        assert_eq!(can.roundtrip, Duration::ZERO);
        assert!(can.body.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let can = CannedResponse::new()
            .with_status(404)
            .with_body("<html>gone</html>")
            .with_roundtrip(Duration::from_millis(50));

        assert_eq!(can.status, 404);
        assert_eq!(can.body, b"<html>gone</html>");
        assert_eq!(can.roundtrip, Duration::from_millis(50));
    }

    #[test]
    fn test_scripted_error() {
        let can = CannedResponse::new().with_error("connection reset");
        assert_eq!(can.error.as_deref(), Some("connection reset"));
    }
}
