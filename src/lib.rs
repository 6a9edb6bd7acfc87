//! # canned-browser
//!
//! A Rust library emulating a web browser for automated page navigation and
//! form interaction, with a built-in test-double layer of canned responses.
//!
//! ## Features
//!
//! - **Canned Responses**: Register scripted responses keyed by request shape
//!   and navigate deterministically, with best-fit payload matching
//! - **Live Fetching**: Blocking HTTP with bounded retries, timeouts and
//!   redirect following when no canned response matches
//! - **Form Automation**: Select a form, override fields, pick dropdown
//!   options and submit, like a user would (minus the Javascript)
//! - **REST Layer**: A small composable REST client with raw and JSON codecs
//!
//! ## Navigating with canned responses
//!
//! ```rust
//! use canned_browser::{BrowserSession, CannedResponse, Method, Payload};
//!
//! # fn main() -> canned_browser::Result<()> {
//! let mut session = BrowserSession::new()?;
//! session.set_offline(true);
//!
//! session.add_canned_response(
//!     "http://example.test/search",
//!     Method::Get,
//!     Some(Payload::fields([("q", "cats")])),
//!     CannedResponse::new().with_body("<html><title>Cats</title></html>"),
//! );
//!
//! // Extra fields are tolerated: the registered payload is a subset of
//! // what was sent
//! let status = session.navigate(
//!     "http://example.test/search",
//!     Method::Get,
//!     Some(Payload::fields([("q", "cats"), ("sort", "asc")])),
//! )?;
//!
//! assert_eq!(status, 200);
//! assert_eq!(session.title()?.as_deref(), Some("Cats"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Filling and submitting a form
//!
//! ```rust
//! use canned_browser::{BrowserSession, CannedResponse, Method, Payload};
//!
//! # fn main() -> canned_browser::Result<()> {
//! let mut session = BrowserSession::new()?;
//! session.set_offline(true);
//!
//! session.add_canned_response(
//!     "http://example.test/login",
//!     Method::Get,
//!     None,
//!     CannedResponse::new().with_body(concat!(
//!         r#"<form method="post" action="/auth">"#,
//!         r#"<input name="user"><input name="pass">"#,
//!         r#"<input type="submit" value="Sign in"></form>"#,
//!     )),
//! );
//! session.add_canned_response(
//!     "http://example.test/auth",
//!     Method::Post,
//!     Some(Payload::fields([("user", "ada"), ("pass", "s3cret")])),
//!     CannedResponse::new().with_body("<html><title>Welcome</title></html>"),
//! );
//!
//! session.get("http://example.test/login")?;
//! session.select_form(0)?;
//! session.update_fields([("user", "ada"), ("pass", "s3cret")])?;
//! session.submit(None)?;
//!
//! assert_eq!(session.title()?.as_deref(), Some("Welcome"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Session façade, configuration and the transport seam
//! - [`canned`]: Canned responses, request keys and the best-fit registry
//! - [`dom`]: Document model and form extraction
//! - [`request`]: HTTP methods and payload encoding
//! - [`rest`]: REST convenience layer with interchangeable codecs
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod canned;
pub mod dom;
pub mod error;
pub mod request;
pub mod rest;

pub use browser::{BrowserConfig, BrowserSession, Transport, TransportRequest, TransportResponse};
pub use canned::{CannedRegistry, CannedResponse, RequestKey};
pub use dom::{Document, DropdownModel, FormModel, Selector, SubmitButton};
pub use error::{BrowserError, Result};
pub use request::{Method, Payload};
pub use rest::{Codec, JsonCodec, JsonRestClient, RawCodec, RestClient};
