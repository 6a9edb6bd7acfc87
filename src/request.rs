//! HTTP methods and request payload encoding

use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP method of an outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
    Options,
}

impl Method {
    /// Wire representation of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "PATCH" => Ok(Method::Patch),
            "OPTIONS" => Ok(Method::Options),
            other => Err(BrowserError::InvalidMethod(other.to_string())),
        }
    }
}

/// Data accompanying a request, before it is put on the wire.
///
/// The variant decides how the data is encoded; callers that already hold an
/// encoded string use [`Payload::Raw`] and the bytes pass through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured key/value pairs, encoded as a URL-encoded query string
    /// in the order given
    Fields(Vec<(String, String)>),

    /// An already-encoded string, passed through unchanged
    Raw(String),

    /// A JSON document, used by the REST layer's JSON codec
    Json(serde_json::Value),
}

impl Payload {
    /// Build a [`Payload::Fields`] from anything iterable as string pairs
    pub fn fields<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Payload::Fields(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Encode into the canonical wire string.
    ///
    /// This is the form used both for live request bodies / GET query strings
    /// and for canned-response matching.
    pub fn encode(&self) -> String {
        match self {
            Payload::Fields(pairs) => {
                let mut serializer = url::form_urlencoded::Serializer::new(String::new());
                for (key, value) in pairs {
                    serializer.append_pair(key, value);
                }
                serializer.finish()
            }
            Payload::Raw(encoded) => encoded.clone(),
            Payload::Json(value) => value.to_string(),
        }
    }

    /// Content type to send alongside the encoded bytes
    pub fn content_type(&self) -> &'static str {
        match self {
            Payload::Fields(_) | Payload::Raw(_) => "application/x-www-form-urlencoded",
            Payload::Json(_) => "application/json",
        }
    }
}

impl From<&str> for Payload {
    fn from(encoded: &str) -> Self {
        Payload::Raw(encoded.to_string())
    }
}

impl From<String> for Payload {
    fn from(encoded: String) -> Self {
        Payload::Raw(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_roundtrip() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_method_unknown() {
        let err = "BREW".parse::<Method>().unwrap_err();
        assert!(err.to_string().contains("BREW"));
    }

    #[test]
    fn test_fields_encoding_preserves_order() {
        let payload = Payload::fields([("b", "2"), ("a", "1")]);
        assert_eq!(payload.encode(), "b=2&a=1");
    }

    #[test]
    fn test_fields_encoding_escapes() {
        let payload = Payload::fields([("q", "two words"), ("x", "a&b")]);
        let encoded = payload.encode();

        // Same escaping the urlencoding crate applies, modulo the
        // form-urlencoded space convention
        assert_eq!(encoded, "q=two+words&x=a%26b");
        assert_eq!(urlencoding::encode("a&b"), "a%26b");
    }

    #[test]
    fn test_raw_passthrough() {
        let payload = Payload::Raw("already=encoded&x=%20".to_string());
        assert_eq!(payload.encode(), "already=encoded&x=%20");
    }

    #[test]
    fn test_json_encoding_and_content_type() {
        let payload = Payload::Json(serde_json::json!({"name": "cat"}));
        assert_eq!(payload.encode(), r#"{"name":"cat"}"#);
        assert_eq!(payload.content_type(), "application/json");
    }

    #[test]
    fn test_form_content_type() {
        assert_eq!(
            Payload::fields([("a", "1")]).content_type(),
            "application/x-www-form-urlencoded"
        );
    }
}
