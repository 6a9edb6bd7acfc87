use std::time::Duration;

/// Immutable per-session request configuration.
///
/// Constructed once and handed to the session; the transport client is built
/// from it, so later calls cannot leak state into each other.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    /// Connect timeout for each live attempt
    pub connect_timeout: Duration,

    /// Overall timeout for each live attempt
    pub timeout: Duration,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,

    /// User agent sent with live requests
    pub user_agent: String,

    /// Initial retry budget (total attempts = retries + 1)
    pub retries: u32,

    /// Start in offline mode: never touch the network, fail when no
    /// canned response matches
    pub offline: bool,
}

impl BrowserConfig {
    /// Create a config with the defaults: 2s connect / 4s overall timeouts,
    /// 20 redirects, no retries, online
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method: set the overall per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method: set the redirect bound
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Builder method: set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Builder method: set the retry budget
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Builder method: set offline mode
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(4),
            max_redirects: 20,
            user_agent: concat!(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
                "(KHTML, like Gecko) canned-browser/",
                env!("CARGO_PKG_VERSION")
            )
            .to_string(),
            retries: 0,
            offline: false,
        }
    }
}
