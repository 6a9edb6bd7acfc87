//! Browser session management and configuration
//!
//! This module holds the façade of the crate. It includes:
//! - BrowserSession: navigation, canned-response resolution and form automation
//! - BrowserConfig: immutable per-session request configuration
//! - Transport: the narrow seam to the underlying HTTP stack

pub mod config;
pub mod session;
pub mod transport;

pub use config::BrowserConfig;
pub use session::BrowserSession;
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
