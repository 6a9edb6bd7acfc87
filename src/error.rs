//! Error types and result aliases

use crate::canned::RequestKey;
use thiserror::Error;

/// Errors that can occur during navigation and form automation
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Live network call failed after exhausting the retry budget
    #[error("transport failure: {0}")]
    Transport(String),

    /// Offline mode is enabled but no canned response matches the request
    #[error("offline mode enabled, but no canned response matches {key} (registered: {known:?})")]
    OfflineNoMatch {
        /// The key that was looked up
        key: RequestKey,
        /// Every key currently registered, for diagnosing the mismatch
        known: Vec<RequestKey>,
    },

    /// A canned response was configured to simulate a failure
    #[error("scripted failure: {0}")]
    Scripted(String),

    /// The document was queried before any navigation
    #[error("no document has been fetched yet")]
    NoDocument,

    /// A CSS selector failed to parse
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// An HTTP method string could not be recognized
    #[error("unsupported HTTP method: {0}")]
    InvalidMethod(String),

    /// No form matched the given index or name/id
    #[error("form not found: {0}")]
    FormNotFound(String),

    /// A form operation was attempted with no form selected
    #[error("no form is selected")]
    NoFormSelected,

    /// The selected form has no dropdown with the given name
    #[error("no dropdown named '{0}' in the selected form")]
    DropdownNotFound(String),

    /// No option in the dropdown matched the requested title
    #[error("dropdown '{dropdown}' has no option matching {title:?}")]
    OptionNotFound {
        dropdown: String,
        title: Option<String>,
    },

    /// No anchor matched the given text or selector
    #[error("link not found: {0}")]
    LinkNotFound(String),

    /// The selected form declares no submit button
    #[error("the selected form has no submit button")]
    NoSubmitButton,

    /// Several submit buttons exist and none was chosen
    #[error("form has {0} submit buttons; an explicit choice is required")]
    AmbiguousSubmit(usize),

    /// The submit-button selector did not resolve
    #[error("submit button not found: {0}")]
    SubmitButtonNotFound(String),

    /// The REST layer received a status it cannot handle
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// A response body could not be decoded by the active codec
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// Writing the page source to disk failed
    #[error("failed to save page: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;

    #[test]
    fn test_offline_error_lists_registered_keys() {
        let err = BrowserError::OfflineNoMatch {
            key: RequestKey::new("http://a", Method::Get, None),
            known: vec![RequestKey::new("http://b", Method::Post, Some("x=1".into()))],
        };

        let msg = err.to_string();
        assert!(msg.contains("offline mode"));
        assert!(msg.contains("http://a"));
        assert!(msg.contains("http://b"));
    }

    #[test]
    fn test_ambiguous_submit_message() {
        let err = BrowserError::AmbiguousSubmit(2);
        assert!(err.to_string().contains("2 submit buttons"));
    }
}
