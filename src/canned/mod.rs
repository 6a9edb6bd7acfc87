//! Canned responses and their registry
//!
//! A canned response is a pre-scripted substitute for a live network result,
//! keyed by request shape. Registering cans makes navigation deterministic,
//! which is the backbone of testing code built on this crate. It includes:
//! - CannedResponse: status/body/roundtrip (or a scripted failure) to replay
//! - RequestKey: the (url, method, payload) shape a can is registered under
//! - CannedRegistry: storage plus the best-fit matching algorithm

pub mod registry;
pub mod response;

pub use registry::{CannedRegistry, RequestKey};
pub use response::CannedResponse;
