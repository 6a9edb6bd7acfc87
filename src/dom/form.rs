use crate::request::Method;
use indexmap::IndexMap;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

static CONTROLS: LazyLock<scraper::Selector> =
    LazyLock::new(|| scraper::Selector::parse("input, textarea, select, button").expect("static selector"));
static OPTIONS: LazyLock<scraper::Selector> =
    LazyLock::new(|| scraper::Selector::parse("option").expect("static selector"));

/// How a form or a submit button is picked: by position in document order,
/// or by name/id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Index(usize),
    Name(String),
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector::Index(index)
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Name(name)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Index(index) => write!(f, "#{}", index),
            Selector::Name(name) => f.write_str(name),
        }
    }
}

/// A submit-button candidate within a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitButton {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl SubmitButton {
    /// Whether the button answers to the given name or value
    pub fn matches(&self, wanted: &str) -> bool {
        self.name.as_deref() == Some(wanted) || self.value.as_deref() == Some(wanted)
    }
}

/// A named `<select>` element and its options as (display text, value) pairs,
/// in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownModel {
    pub name: String,
    pub options: Vec<(String, String)>,
}

/// An owned, read-derived view over one `<form>` element.
///
/// Mutation never touches the document; the session keeps a working copy of
/// the field values and merges changes there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormModel {
    pub name: Option<String>,
    pub id: Option<String>,
    pub method: Method,
    /// Declared action, resolved against the page base; absent means
    /// "submit back to the current page"
    pub action: Option<String>,
    /// Default values of the named, non-submit controls
    pub fields: IndexMap<String, String>,
    pub dropdowns: Vec<DropdownModel>,
    pub submits: Vec<SubmitButton>,
}

impl FormModel {
    /// Extract an owned form model from a `<form>` element
    pub(crate) fn from_element(form: ElementRef<'_>, base: Option<&Url>) -> Self {
        let method = form
            .value()
            .attr("method")
            .and_then(|m| m.parse::<Method>().ok())
            .unwrap_or(Method::Get);

        let action = form
            .value()
            .attr("action")
            .filter(|a| !a.is_empty())
            .map(|a| resolve_href(a, base));

        let mut fields = IndexMap::new();
        let mut dropdowns = Vec::new();
        let mut submits = Vec::new();

        for element in form.select(&CONTROLS) {
            match element.value().name() {
                "input" => {
                    let input_type = element.value().attr("type").unwrap_or("text");
                    let name = element.value().attr("name");
                    match input_type {
                        "submit" => submits.push(SubmitButton {
                            name: name.map(str::to_string),
                            value: element.value().attr("value").map(str::to_string),
                        }),
                        "button" | "image" | "reset" | "file" => {}
                        "checkbox" | "radio" => {
                            // only a checked control contributes a default value
                            if element.value().attr("checked").is_some() {
                                if let Some(name) = name {
                                    let value = element.value().attr("value").unwrap_or("on");
                                    fields.insert(name.to_string(), value.to_string());
                                }
                            }
                        }
                        _ => {
                            if let Some(name) = name {
                                let value = element.value().attr("value").unwrap_or("");
                                fields.insert(name.to_string(), value.to_string());
                            }
                        }
                    }
                }
                "textarea" => {
                    if let Some(name) = element.value().attr("name") {
                        let text: String = element.text().collect();
                        fields.insert(name.to_string(), text);
                    }
                }
                "select" => {
                    if let Some(name) = element.value().attr("name") {
                        let options = element
                            .select(&OPTIONS)
                            .map(|option| {
                                let text: String = option.text().collect();
                                let text = text.trim().to_string();
                                let value = option
                                    .value()
                                    .attr("value")
                                    .map(str::to_string)
                                    .unwrap_or_else(|| text.clone());
                                (text, value)
                            })
                            .collect();
                        dropdowns.push(DropdownModel {
                            name: name.to_string(),
                            options,
                        });
                    }
                }
                "button" => {
                    // an explicit type=submit only; plain buttons are inert here
                    if element.value().attr("type") == Some("submit") {
                        submits.push(SubmitButton {
                            name: element.value().attr("name").map(str::to_string),
                            value: element.value().attr("value").map(str::to_string),
                        });
                    }
                }
                _ => {}
            }
        }

        Self {
            name: form.value().attr("name").map(str::to_string),
            id: form.value().attr("id").map(str::to_string),
            method,
            action,
            fields,
            dropdowns,
            submits,
        }
    }

    /// Whether the form answers to the given name or id
    pub fn matches(&self, wanted: &str) -> bool {
        self.name.as_deref() == Some(wanted) || self.id.as_deref() == Some(wanted)
    }

    /// Look up a dropdown by its name
    pub fn dropdown(&self, name: &str) -> Option<&DropdownModel> {
        self.dropdowns.iter().find(|d| d.name == name)
    }
}

/// Resolve an href against the page base URL, falling back to the raw value
/// when no base is known or the join fails
pub(crate) fn resolve_href(href: &str, base: Option<&Url>) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_form(html: &str, base: Option<&str>) -> FormModel {
        let document = Html::parse_document(html);
        let selector = scraper::Selector::parse("form").unwrap();
        let form = document.select(&selector).next().expect("a form");
        let base = base.map(|b| Url::parse(b).unwrap());
        FormModel::from_element(form, base.as_ref())
    }

    #[test]
    fn test_method_and_action_extraction() {
        let form = first_form(
            r#"<form method="post" action="/submit"><input type="submit"></form>"#,
            Some("http://x/page"),
        );

        assert_eq!(form.method, Method::Post);
        assert_eq!(form.action.as_deref(), Some("http://x/submit"));
    }

    #[test]
    fn test_missing_method_defaults_to_get() {
        let form = first_form(r#"<form><input type="submit"></form>"#, None);
        assert_eq!(form.method, Method::Get);
        assert!(form.action.is_none());
    }

    #[test]
    fn test_field_defaults() {
        let form = first_form(
            r#"<form>
                <input type="text" name="user" value="alice">
                <input type="hidden" name="token" value="t0k">
                <input type="text" value="unnamed">
                <input type="checkbox" name="opt_in" checked>
                <input type="checkbox" name="spam">
                <input type="radio" name="color" value="red">
                <input type="radio" name="color" value="blue" checked>
                <textarea name="notes">hello</textarea>
                <input type="submit" name="go" value="Go">
            </form>"#,
            None,
        );

        assert_eq!(form.fields.get("user").unwrap(), "alice");
        assert_eq!(form.fields.get("token").unwrap(), "t0k");
        assert_eq!(form.fields.get("opt_in").unwrap(), "on");
        assert_eq!(form.fields.get("color").unwrap(), "blue");
        assert_eq!(form.fields.get("notes").unwrap(), "hello");
        // unchecked, unnamed and submit controls contribute nothing
        assert!(!form.fields.contains_key("spam"));
        assert!(!form.fields.contains_key("go"));
        assert_eq!(form.fields.len(), 5);
    }

    #[test]
    fn test_dropdown_extraction() {
        let form = first_form(
            r#"<form>
                <select name="size">
                    <option value="s">Small</option>
                    <option value="l">Large</option>
                    <option>Huge</option>
                </select>
                <input type="submit">
            </form>"#,
            None,
        );

        let dropdown = form.dropdown("size").unwrap();
        assert_eq!(
            dropdown.options,
            vec![
                ("Small".to_string(), "s".to_string()),
                ("Large".to_string(), "l".to_string()),
                // value falls back to the display text
                ("Huge".to_string(), "Huge".to_string()),
            ]
        );
    }

    #[test]
    fn test_submit_candidates() {
        let form = first_form(
            r#"<form>
                <input type="submit" name="save" value="Save">
                <button type="submit" name="delete" value="Delete">Delete</button>
                <button type="button" name="noop">Noop</button>
            </form>"#,
            None,
        );

        assert_eq!(form.submits.len(), 2);
        assert_eq!(form.submits[0].name.as_deref(), Some("save"));
        assert_eq!(form.submits[1].name.as_deref(), Some("delete"));
        assert!(form.submits[1].matches("Delete"));
    }

    #[test]
    fn test_form_matches_name_or_id() {
        let form = first_form(
            r#"<form name="login" id="login-form"><input type="submit"></form>"#,
            None,
        );

        assert!(form.matches("login"));
        assert!(form.matches("login-form"));
        assert!(!form.matches("search"));
    }

    #[test]
    fn test_selector_conversions() {
        assert_eq!(Selector::from(2), Selector::Index(2));
        assert_eq!(Selector::from("login"), Selector::Name("login".to_string()));
    }

    #[test]
    fn test_resolve_href() {
        let base = Url::parse("http://x/a/b").unwrap();
        assert_eq!(resolve_href("/c", Some(&base)), "http://x/c");
        assert_eq!(resolve_href("c", Some(&base)), "http://x/a/c");
        assert_eq!(resolve_href("http://y/", Some(&base)), "http://y/");
        assert_eq!(resolve_href("/c", None), "/c");
    }
}
