use crate::dom::form::{resolve_href, FormModel, Selector};
use crate::error::{BrowserError, Result};
use scraper::{ElementRef, Html};
use url::Url;

/// A parsed page, queryable with CSS selectors.
///
/// Built at most once per navigation; the session caches it until the next
/// reset. Hrefs and form actions are resolved against the effective
/// (post-redirect) URL of the page.
#[derive(Debug)]
pub struct Document {
    html: Html,
    base: Option<Url>,
}

impl Document {
    /// Parse a response body. An empty body is valid and yields a minimal
    /// tree, not an error.
    pub fn parse(body: &[u8], base_url: Option<&str>) -> Self {
        let text = String::from_utf8_lossy(body);
        Self {
            html: Html::parse_document(&text),
            base: base_url.and_then(|url| Url::parse(url).ok()),
        }
    }

    /// Base URL used for absolute-link resolution, if one was known
    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Run a CSS selector against the tree
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let compiled =
            scraper::Selector::parse(selector).map_err(|e| BrowserError::InvalidSelector {
                selector: selector.to_string(),
                message: e.to_string(),
            })?;
        Ok(self.html.select(&compiled).collect())
    }

    /// First title-element text, trimmed; absent if the page has none
    pub fn title(&self) -> Option<String> {
        let selector = scraper::Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    /// All forms on the page, in document order
    pub fn forms(&self) -> Vec<FormModel> {
        let Ok(selector) = scraper::Selector::parse("form") else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .map(|form| FormModel::from_element(form, self.base.as_ref()))
            .collect()
    }

    /// Resolve one form by position or by name/id
    pub fn form(&self, selector: &Selector) -> Result<FormModel> {
        let forms = self.forms();
        let found = match selector {
            Selector::Index(index) => forms.into_iter().nth(*index),
            Selector::Name(name) => forms.into_iter().find(|form| form.matches(name)),
        };
        found.ok_or_else(|| BrowserError::FormNotFound(selector.to_string()))
    }

    /// Find an anchor's href, resolved against the page base.
    ///
    /// An argument starting with `#`, `.` or `[` is treated as a CSS selector
    /// (which must match an `<a>`); anything else matches anchors by exact
    /// visible text.
    pub fn find_link(&self, text_or_selector: &str) -> Result<String> {
        let miss = || BrowserError::LinkNotFound(text_or_selector.to_string());

        let anchor = if text_or_selector.starts_with(['#', '.', '[']) {
            self.select(text_or_selector)?
                .into_iter()
                .find(|el| el.value().name() == "a")
        } else {
            self.select("a")?
                .into_iter()
                .find(|el| el.text().collect::<String>() == text_or_selector)
        };

        let href = anchor.and_then(|el| el.value().attr("href")).ok_or_else(miss)?;
        Ok(resolve_href(href, self.base.as_ref()))
    }
}
