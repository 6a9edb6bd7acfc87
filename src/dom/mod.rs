//! Document model and form extraction
//!
//! This module turns a fetched response body into something navigable.
//! It includes:
//! - Document: a scraper-backed page tree with CSS querying and title/link helpers
//! - FormModel: an owned view over one form (fields, dropdowns, submit buttons)
//! - Selector: pick-by-index-or-name dispatch for forms and submit buttons

pub mod document;
pub mod form;

pub use document::Document;
pub use form::{DropdownModel, FormModel, Selector, SubmitButton};
