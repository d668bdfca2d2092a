//! HTML token extraction for the CAS login flow.
//!
//! `scraper` types are not `Send`, so these helpers stay synchronous and are
//! called between awaits with owned strings.

use scraper::{Html, Selector};

use super::PortalError;

/// Pulls the hidden `execution` (required) and `lt` (optional, older CAS
/// versions) form tokens out of the CAS login page.
pub fn extract_cas_tokens(html: &str) -> Result<(String, Option<String>), PortalError> {
    let doc = Html::parse_document(html);

    let exec_sel = Selector::parse(r#"input[name="execution"]"#).unwrap();
    let execution = doc
        .select(&exec_sel)
        .next()
        .and_then(|el| el.value().attr("value"))
        .ok_or(PortalError::TokenMissing("CAS execution"))?
        .to_string();

    let lt_sel = Selector::parse(r#"input[name="lt"]"#).unwrap();
    let lt = doc
        .select(&lt_sel)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(|s| s.to_string());

    Ok((execution, lt))
}

/// Reads the CSRF token the portal embeds as a `_csrf` meta tag.
pub fn extract_csrf(html: &str) -> Result<String, PortalError> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(r#"meta[name="_csrf"]"#).unwrap();
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.to_string())
        .ok_or(PortalError::TokenMissing("CSRF"))
}
