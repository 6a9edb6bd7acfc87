use crate::browser::config::BrowserConfig;
use crate::browser::transport::{
    fetch_with_retries, HttpTransport, Transport, TransportRequest,
};
use crate::canned::{CannedRegistry, CannedResponse, RequestKey};
use crate::dom::{Document, FormModel, Selector};
use crate::error::{BrowserError, Result};
use crate::request::{Method, Payload};
use indexmap::IndexMap;
use std::path::Path;
use std::time::Duration;

/// The page the session is currently on
struct Page {
    /// Effective URL, after redirects (or the canned request URL)
    url: String,
    /// Raw response body
    body: Vec<u8>,
    /// Parsed tree, built lazily and at most once per navigation
    doc: Option<Document>,
}

/// Browser session emulating page navigation and form interaction.
///
/// A session is a single sequential actor: every operation takes `&mut self`
/// and there is no internal locking. Callers needing parallelism use
/// independent sessions; canned responses are per-session state, so sessions
/// never interfere.
///
/// Navigation resolves against the canned-response registry first and only
/// falls through to a live fetch on a miss (never in offline mode). Each
/// successful navigation resets the document, the selected form and the
/// field overrides.
pub struct BrowserSession {
    transport: Box<dyn Transport>,
    canned: CannedRegistry,

    /// Extra attempts after a failed live fetch
    retries: u32,

    /// When set, a canned miss is an error instead of a live fetch
    offline: bool,

    /// Wall-clock time of the last (possibly retried) resolution
    roundtrip: Option<Duration>,

    page: Option<Page>,
    form: Option<FormModel>,
    overrides: IndexMap<String, String>,
}

impl BrowserSession {
    /// Create a session with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(BrowserConfig::default())
    }

    /// Create a session with the given configuration
    pub fn with_config(config: BrowserConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    /// Create a session over a custom transport.
    ///
    /// This is the seam for substituting a scripted transport in tests.
    pub fn with_transport(config: BrowserConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            canned: CannedRegistry::new(),
            retries: config.retries,
            offline: config.offline,
            roundtrip: None,
            page: None,
            form: None,
            overrides: IndexMap::new(),
        }
    }

    // navigation

    /// Navigate to a URL.
    ///
    /// A payload travels in the query string for GET and as the request body
    /// otherwise. Returns the HTTP status code; the document, selected form
    /// and field overrides are reset on success.
    pub fn navigate(&mut self, url: &str, method: Method, payload: Option<Payload>) -> Result<u16> {
        let encoded = payload.as_ref().map(Payload::encode);
        let content_type = payload.as_ref().map(Payload::content_type);
        log::debug!("navigating {} {}", method, url);

        // where the request actually goes: GET carries the payload in the URL
        let request_url = match (&method, encoded.as_deref()) {
            (Method::Get, Some(data)) => append_query(url, data),
            _ => url.to_string(),
        };

        // ideally we don't need to traverse the network; matching happens on
        // the URL as given, before any query-string append
        if let Some(can) = self.canned.resolve(url, method, encoded.as_deref()) {
            let can = can.clone();
            return self.replay_canned(can, request_url);
        }

        if self.offline {
            return Err(BrowserError::OfflineNoMatch {
                key: RequestKey::new(url, method, encoded),
                known: self.canned.keys().cloned().collect(),
            });
        }

        self.fetch_live(request_url, method, encoded, content_type)
    }

    /// Convenience for a plain GET
    pub fn get(&mut self, url: &str) -> Result<u16> {
        self.navigate(url, Method::Get, None)
    }

    /// Replay a canned response as if it had come off the wire
    fn replay_canned(&mut self, can: CannedResponse, url: String) -> Result<u16> {
        if let Some(message) = can.error {
            // a scripted failure is not a transport failure; it bypasses
            // the retry loop entirely
            return Err(BrowserError::Scripted(message));
        }

        self.reset_page(url, can.body);
        self.roundtrip = Some(can.roundtrip);
        Ok(can.status)
    }

    /// Perform the live fetch with the session's retry budget
    fn fetch_live(
        &mut self,
        url: String,
        method: Method,
        encoded: Option<String>,
        content_type: Option<&'static str>,
    ) -> Result<u16> {
        let body = match method {
            Method::Get => None,
            _ => encoded,
        };
        let content_type = body.as_ref().and(content_type).map(str::to_string);
        let request = TransportRequest {
            url,
            method,
            body,
            content_type,
        };

        let (elapsed, outcome) =
            fetch_with_retries(self.transport.as_ref(), &request, self.retries + 1);
        let response = outcome?;

        self.reset_page(response.effective_url, response.body);
        self.roundtrip = Some(elapsed);
        Ok(response.status)
    }

    /// We are now on a new page: clear out the browser state
    fn reset_page(&mut self, url: String, body: Vec<u8>) {
        self.page = Some(Page {
            url,
            body,
            doc: None,
        });
        self.form = None;
        self.overrides.clear();
        self.roundtrip = None;
    }

    // canned responses

    /// Register a canned response, for testing purposes.
    ///
    /// Registering the same (url, method, payload) shape twice replaces the
    /// earlier entry.
    pub fn add_canned_response(
        &mut self,
        url: impl Into<String>,
        method: Method,
        payload: Option<Payload>,
        response: CannedResponse,
    ) {
        let key = RequestKey::new(url.into(), method, payload.as_ref().map(Payload::encode));
        self.canned.insert(key, response);
    }

    /// The canned-response registry, mostly useful for diagnostics
    pub fn canned_responses(&self) -> &CannedRegistry {
        &self.canned
    }

    // document access

    /// The parsed current page, building the tree on first access.
    ///
    /// Fails with [`BrowserError::NoDocument`] before the first navigation;
    /// an empty body is valid and parses to a minimal tree.
    pub fn document(&mut self) -> Result<&Document> {
        let page = self.page.as_mut().ok_or(BrowserError::NoDocument)?;
        let Page { url, body, doc } = page;
        Ok(doc.get_or_insert_with(|| Document::parse(body.as_slice(), Some(url.as_str()))))
    }

    /// Current URL, if any navigation happened yet
    pub fn url(&self) -> Option<&str> {
        self.page.as_ref().map(|page| page.url.as_str())
    }

    /// Raw source of the current page
    pub fn source(&self) -> Option<&[u8]> {
        self.page.as_ref().map(|page| page.body.as_slice())
    }

    /// Title of the current page, trimmed; `None` when the page has none
    pub fn title(&mut self) -> Result<Option<String>> {
        Ok(self.document()?.title())
    }

    /// All forms on the current page
    pub fn forms(&mut self) -> Result<Vec<FormModel>> {
        Ok(self.document()?.forms())
    }

    /// Wall-clock roundtrip of the last resolution (simulated for canned hits)
    pub fn roundtrip(&self) -> Option<Duration> {
        self.roundtrip
    }

    /// Save the current page source to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let page = self.page.as_ref().ok_or(BrowserError::NoDocument)?;
        std::fs::write(path, &page.body)?;
        Ok(())
    }

    // retry/offline knobs

    /// Extra attempts to make after a failed live fetch
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Set the retry budget for live fetches
    pub fn set_retries(&mut self, retries: u32) {
        self.retries = retries;
    }

    /// Whether offline mode is active
    pub fn offline(&self) -> bool {
        self.offline
    }

    /// Toggle offline mode
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    // form selection and submission

    /// Select a form on the current page, by index or by name/id.
    ///
    /// The field overrides are initialized from the form's default values,
    /// and every dropdown is filled with its first option, mirroring a fresh
    /// page load where no explicit choice has been made yet.
    pub fn select_form(&mut self, selector: impl Into<Selector>) -> Result<()> {
        let selector = selector.into();
        let form = self.document()?.form(&selector)?;

        let mut overrides = form.fields.clone();
        for dropdown in &form.dropdowns {
            if let Some((_, value)) = dropdown.options.first() {
                overrides.insert(dropdown.name.clone(), value.clone());
            }
        }

        self.overrides = overrides;
        self.form = Some(form);
        Ok(())
    }

    /// The currently selected form, if any
    pub fn selected_form(&self) -> Option<&FormModel> {
        self.form.as_ref()
    }

    /// The working copy of the selected form's field values
    pub fn field_overrides(&self) -> &IndexMap<String, String> {
        &self.overrides
    }

    /// Merge values into the field overrides; later keys overwrite earlier ones
    pub fn update_fields<K, V, I>(&mut self, values: I) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        if self.form.is_none() {
            return Err(BrowserError::NoFormSelected);
        }
        for (key, value) in values {
            self.overrides.insert(key.into(), value.into());
        }
        Ok(())
    }

    /// Options of the named dropdown as a displayText -> value map
    pub fn dropdown_options(&self, name: &str) -> Result<IndexMap<String, String>> {
        let form = self.form.as_ref().ok_or(BrowserError::NoFormSelected)?;
        let dropdown = form
            .dropdown(name)
            .ok_or_else(|| BrowserError::DropdownNotFound(name.to_string()))?;
        Ok(dropdown.options.iter().cloned().collect())
    }

    /// Pick a dropdown option by display text, or the first option when no
    /// title is given, and write its value into the overrides
    pub fn fill_dropdown(&mut self, name: &str, option_title: Option<&str>) -> Result<()> {
        let form = self.form.as_ref().ok_or(BrowserError::NoFormSelected)?;
        let dropdown = form
            .dropdown(name)
            .ok_or_else(|| BrowserError::DropdownNotFound(name.to_string()))?;

        let value = match option_title {
            None => dropdown.options.first().map(|(_, value)| value.clone()),
            Some(title) => dropdown
                .options
                .iter()
                .find(|(text, _)| text == title)
                .map(|(_, value)| value.clone()),
        }
        .ok_or_else(|| BrowserError::OptionNotFound {
            dropdown: name.to_string(),
            title: option_title.map(str::to_string),
        })?;

        self.overrides.insert(name.to_string(), value);
        Ok(())
    }

    /// Submit the selected form with the given (or the only) submit button.
    ///
    /// A form with no submit button cannot be submitted this way; with more
    /// than one, the caller must choose. The clicked button's name/value pair
    /// joins the outgoing payload, like in a real browser where only the
    /// clicked button is sent.
    pub fn submit(&mut self, button: Option<Selector>) -> Result<u16> {
        let form = self.form.as_ref().ok_or(BrowserError::NoFormSelected)?;
        if form.submits.is_empty() {
            return Err(BrowserError::NoSubmitButton);
        }

        let chosen = match &button {
            None => {
                if form.submits.len() > 1 {
                    return Err(BrowserError::AmbiguousSubmit(form.submits.len()));
                }
                &form.submits[0]
            }
            Some(Selector::Index(index)) => form
                .submits
                .get(*index)
                .ok_or_else(|| BrowserError::SubmitButtonNotFound(format!("#{}", index)))?,
            Some(Selector::Name(name)) => form
                .submits
                .iter()
                .find(|submit| submit.matches(name))
                .ok_or_else(|| BrowserError::SubmitButtonNotFound(name.clone()))?,
        };

        if let Some(name) = chosen.name.clone() {
            let value = chosen.value.clone().unwrap_or_default();
            self.overrides.insert(name, value);
        }

        self.submit_form_data()
    }

    /// Submit the selected form without using any button
    pub fn submit_without_button(&mut self) -> Result<u16> {
        if self.form.is_none() {
            return Err(BrowserError::NoFormSelected);
        }
        self.submit_form_data()
    }

    /// Turn the selected form plus overrides into the next request
    fn submit_form_data(&mut self) -> Result<u16> {
        let form = self.form.as_ref().ok_or(BrowserError::NoFormSelected)?;
        let method = form.method;
        let action = match &form.action {
            Some(action) => action.clone(),
            // no declared action means "submit back to the current page"
            None => self.url().ok_or(BrowserError::NoDocument)?.to_string(),
        };

        let payload = Payload::Fields(
            self.overrides
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        );
        self.navigate(&action, method, Some(payload))
    }

    /// Emulate clicking a link.
    ///
    /// An argument starting with `#`, `.` or `[` is treated as a CSS
    /// selector; anything else matches anchors by exact visible text.
    pub fn follow_link(&mut self, text_or_selector: &str) -> Result<u16> {
        let href = self.document()?.find_link(text_or_selector)?;
        self.navigate(&href, Method::Get, None)
    }
}

/// Append encoded data to a URL's query string, inserting `?` or `&`
/// depending on whether a query component already exists
fn append_query(url: &str, data: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, data)
}
