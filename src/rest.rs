//! REST convenience layer on top of [`BrowserSession`]
//!
//! A thin client for `{base}/{resource}[/{id}]` style APIs. The payload codec
//! is a strategy picked at construction: [`RawCodec`] moves strings and bytes
//! unchanged, [`JsonCodec`] speaks `serde_json::Value` on both sides. Canned
//! responses registered on the underlying session work here too, which keeps
//! API client code testable offline.

use crate::browser::{BrowserConfig, BrowserSession};
use crate::error::{BrowserError, Result};
use crate::request::{Method, Payload};

/// Strategy turning request bodies into payloads and decoding response bytes
pub trait Codec {
    /// What callers hand to the writing verbs
    type Body;
    /// What the reading verbs return
    type Response;

    fn encode(&self, body: Self::Body) -> Result<Payload>;
    fn decode(&self, bytes: &[u8]) -> Result<Self::Response>;
}

/// Raw codec: request bodies are assumed already encoded, response bytes
/// come back untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct RawCodec;

impl Codec for RawCodec {
    type Body = String;
    type Response = Vec<u8>;

    fn encode(&self, body: String) -> Result<Payload> {
        Ok(Payload::Raw(body))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(bytes.to_vec())
    }
}

/// JSON codec: bodies are serialized JSON values, responses are parsed JSON
/// (an empty body decodes to `None`)
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Body = serde_json::Value;
    type Response = Option<serde_json::Value>;

    fn encode(&self, body: serde_json::Value) -> Result<Payload> {
        Ok(Payload::Json(body))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Option<serde_json::Value>> {
        if bytes.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(bytes)
            .map(Some)
            .map_err(|e| BrowserError::Decode(e.to_string()))
    }
}

/// A simple REST client composed of a browser session and a payload codec
pub struct RestClient<C: Codec = RawCodec> {
    session: BrowserSession,
    base: String,
    codec: C,
}

/// REST client that only speaks JSON
pub type JsonRestClient = RestClient<JsonCodec>;

impl RestClient<RawCodec> {
    /// Create a raw-bytes client for the given base URL
    pub fn new(base: impl Into<String>) -> Result<Self> {
        Self::with_codec(base, RawCodec)
    }
}

impl JsonRestClient {
    /// Create a JSON client for the given base URL
    pub fn json(base: impl Into<String>) -> Result<Self> {
        Self::with_codec(base, JsonCodec)
    }
}

impl<C: Codec> RestClient<C> {
    /// Create a client with the given codec strategy
    pub fn with_codec(base: impl Into<String>, codec: C) -> Result<Self> {
        let config = BrowserConfig::new()
            .user_agent(concat!("canned-browser-rest/", env!("CARGO_PKG_VERSION")));
        Ok(Self::with_session(BrowserSession::with_config(config)?, base, codec))
    }

    /// Create a client over an existing session, e.g. one loaded with
    /// canned responses
    pub fn with_session(session: BrowserSession, base: impl Into<String>, codec: C) -> Self {
        Self {
            session,
            base: base.into(),
            codec,
        }
    }

    /// The underlying session, e.g. for registering canned responses
    pub fn session_mut(&mut self) -> &mut BrowserSession {
        &mut self.session
    }

    fn url(&self, resource: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base, resource, id),
            None => format!("{}/{}", self.base, resource),
        }
    }

    /// Navigate and insist on a 200
    fn call(&mut self, url: &str, method: Method, payload: Option<Payload>) -> Result<()> {
        let status = self.session.navigate(url, method, payload)?;
        if status != 200 {
            return Err(BrowserError::UnexpectedStatus(status));
        }
        Ok(())
    }

    fn decode_current(&mut self) -> Result<C::Response> {
        let bytes = self.session.source().unwrap_or_default().to_vec();
        self.codec.decode(&bytes)
    }

    /// Fetch a resource
    pub fn get(&mut self, resource: &str, id: Option<&str>) -> Result<C::Response> {
        let url = self.url(resource, id);
        self.call(&url, Method::Get, None)?;
        self.decode_current()
    }

    /// Probe a resource without fetching its body
    pub fn head(&mut self, resource: &str, id: Option<&str>) -> Result<()> {
        let url = self.url(resource, id);
        self.call(&url, Method::Head, None)
    }

    /// Create a resource
    pub fn post(&mut self, resource: &str, body: Option<C::Body>) -> Result<C::Response> {
        let url = self.url(resource, None);
        let payload = body.map(|b| self.codec.encode(b)).transpose()?;
        self.call(&url, Method::Post, payload)?;
        self.decode_current()
    }

    /// Replace a resource
    pub fn put(&mut self, resource: &str, id: &str, body: Option<C::Body>) -> Result<C::Response> {
        let url = self.url(resource, Some(id));
        let payload = body.map(|b| self.codec.encode(b)).transpose()?;
        self.call(&url, Method::Put, payload)?;
        self.decode_current()
    }

    /// Delete a resource
    pub fn delete(&mut self, resource: &str, id: &str) -> Result<C::Response> {
        let url = self.url(resource, Some(id));
        self.call(&url, Method::Delete, None)?;
        self.decode_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{Transport, TransportRequest, TransportResponse};
    use crate::canned::CannedResponse;
    use serde_json::json;

    struct NoTransport;
    impl Transport for NoTransport {
        fn perform(&self, _request: &TransportRequest) -> Result<TransportResponse> {
            panic!("rest test touched the transport");
        }
    }

    fn offline_session() -> BrowserSession {
        BrowserSession::with_transport(BrowserConfig::new().offline(true), Box::new(NoTransport))
    }

    #[test]
    fn test_raw_get() {
        let mut session = offline_session();
        session.add_canned_response(
            "http://api/things/42",
            Method::Get,
            None,
            CannedResponse::new().with_body("thing 42"),
        );

        let mut client = RestClient::with_session(session, "http://api", RawCodec);
        assert_eq!(client.get("things", Some("42")).unwrap(), b"thing 42");
    }

    #[test]
    fn test_non_200_is_an_error() {
        let mut session = offline_session();
        session.add_canned_response(
            "http://api/things",
            Method::Get,
            None,
            CannedResponse::new().with_status(404),
        );

        let mut client = RestClient::with_session(session, "http://api", RawCodec);
        let err = client.get("things", None).unwrap_err();
        assert!(matches!(err, BrowserError::UnexpectedStatus(404)));
    }

    #[test]
    fn test_json_get() {
        let mut session = offline_session();
        session.add_canned_response(
            "http://api/users/1",
            Method::Get,
            None,
            CannedResponse::new().with_body(r#"{"name":"ada"}"#),
        );

        let mut client = RestClient::with_session(session, "http://api", JsonCodec);
        let user = client.get("users", Some("1")).unwrap().unwrap();
        assert_eq!(user["name"], "ada");
    }

    #[test]
    fn test_json_post_roundtrip() {
        let mut session = offline_session();
        session.add_canned_response(
            "http://api/users",
            Method::Post,
            Some(Payload::Json(json!({"name": "ada"}))),
            CannedResponse::new().with_body(r#"{"id":7,"name":"ada"}"#),
        );

        let mut client = RestClient::with_session(session, "http://api", JsonCodec);
        let created = client.post("users", Some(json!({"name": "ada"}))).unwrap().unwrap();
        assert_eq!(created["id"], 7);
    }

    #[test]
    fn test_json_empty_body_decodes_to_none() {
        let mut session = offline_session();
        session.add_canned_response("http://api/users/1", Method::Delete, None, CannedResponse::new());

        let mut client = RestClient::with_session(session, "http://api", JsonCodec);
        assert!(client.delete("users", "1").unwrap().is_none());
    }

    #[test]
    fn test_json_decode_failure() {
        let mut session = offline_session();
        session.add_canned_response(
            "http://api/users/1",
            Method::Get,
            None,
            CannedResponse::new().with_body("not json"),
        );

        let mut client = RestClient::with_session(session, "http://api", JsonCodec);
        assert!(matches!(
            client.get("users", Some("1")),
            Err(BrowserError::Decode(_))
        ));
    }

    #[test]
    fn test_head() {
        let mut session = offline_session();
        session.add_canned_response("http://api/users/1", Method::Head, None, CannedResponse::new());

        let mut client = RestClient::with_session(session, "http://api", RawCodec);
        assert!(client.head("users", Some("1")).is_ok());
    }
}
