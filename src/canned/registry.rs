use crate::canned::CannedResponse;
use crate::request::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The request shape a canned response is registered under.
///
/// Equality is structural; two keys differing only in payload are distinct
/// registry entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub url: String,
    pub method: Method,
    /// Canonically encoded payload, if any
    pub payload: Option<String>,
}

impl RequestKey {
    pub fn new(url: impl Into<String>, method: Method, payload: Option<String>) -> Self {
        Self {
            url: url.into(),
            method,
            payload,
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{} {} [{}]", self.method, self.url, payload),
            None => write!(f, "{} {}", self.method, self.url),
        }
    }
}

/// Storage for canned responses plus the best-fit matching algorithm.
///
/// Entries keep their insertion order, which makes the fallback match
/// deterministic: when two candidates fit equally well, the one registered
/// first wins.
#[derive(Debug, Default)]
pub struct CannedRegistry {
    entries: IndexMap<RequestKey, CannedResponse>,
}

impl CannedRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned response under the given key.
    ///
    /// Re-registering an identical key replaces the previous entry
    /// (last write wins).
    pub fn insert(&mut self, key: RequestKey, response: CannedResponse) {
        if self.entries.contains_key(&key) {
            log::debug!("replacing canned response for {}", key);
        }
        self.entries.insert(key, response);
    }

    /// Number of registered responses
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the registered keys, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &RequestKey> {
        self.entries.keys()
    }

    /// Find the canned response that best matches the request, if any.
    ///
    /// An exact key match always wins. Failing that, candidates sharing the
    /// url and method are compared token-wise: a candidate survives when every
    /// one of its `key=value` tokens is present in the incoming payload
    /// (extra incoming fields are tolerated), and the survivor whose encoded
    /// length is closest to the incoming payload's is chosen. Length ties go
    /// to the candidate registered first.
    pub fn resolve(
        &self,
        url: &str,
        method: Method,
        payload: Option<&str>,
    ) -> Option<&CannedResponse> {
        let exact = RequestKey::new(url, method, payload.map(str::to_string));
        if let Some(can) = self.entries.get(&exact) {
            return Some(can);
        }

        // Without a payload there is nothing to match fuzzily against
        let incoming = payload?;
        let incoming_tokens: HashSet<&str> = incoming.split('&').collect();

        let mut best: Option<(&CannedResponse, usize)> = None;
        for (key, can) in &self.entries {
            if key.url != url || key.method != method {
                continue;
            }
            let Some(reference) = &key.payload else {
                continue;
            };
            if !reference.split('&').all(|token| incoming_tokens.contains(token)) {
                continue;
            }

            let diff = reference.len().abs_diff(incoming.len());
            // strictly-less keeps the earliest registration on a tie
            if best.is_none_or(|(_, best_diff)| diff < best_diff) {
                best = Some((can, diff));
            }
        }

        best.map(|(can, _)| can)
    }
}
