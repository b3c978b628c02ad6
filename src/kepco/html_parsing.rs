//! HTML parsing for the portal's login pages.
//!
//! The landing page carries the RSA exponent in a hidden form field; the page
//! returned after a login attempt tells us whether the login form is still
//! being shown.

use crate::error::PortalStructureError;
use scraper::{Html, Selector};

pub const RSA_EXPONENT_SELECTOR: &str = "input#RSAExponent";

const LOGIN_FORM_SELECTORS: &[&str] = &["#RSA_USER_ID", "#RSA_USER_PWD"];

const ALERT_MESSAGE_SELECTOR: &str = ".alert-message";

/// Creates a CSS selector from a string.
pub fn html_selector(selector: &str) -> Result<Selector, PortalStructureError> {
    Selector::parse(selector).map_err(|e| PortalStructureError::invalid_selector(selector, e))
}

/// Reads a non-empty attribute of the first element matching `selector`.
pub fn extract_attribute(
    document: &Html,
    selector: &str,
    attribute: &str,
) -> Result<String, PortalStructureError> {
    let selector_obj = html_selector(selector)?;
    let element = document
        .select(&selector_obj)
        .next()
        .ok_or_else(|| PortalStructureError::element_not_found(selector))?;

    element
        .value()
        .attr(attribute)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PortalStructureError::missing_attribute(selector, attribute))
}

/// Extracts the hex RSA public exponent from the landing page.
///
/// # Example
/// ```ignore
/// let page = r#"<input type="hidden" id="RSAExponent" value="10001">"#;
/// assert_eq!(parse_rsa_exponent(page)?, "10001");
/// ```
pub fn parse_rsa_exponent(html: &str) -> Result<String, PortalStructureError> {
    let document = Html::parse_document(html);
    extract_attribute(&document, RSA_EXPONENT_SELECTOR, "value")
}

/// Outcome of inspecting the page returned by the login POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPage {
    /// The login form is gone
    Authenticated,
    /// The login form is still shown, with the portal's alert text if any
    Rejected(Option<String>),
}

/// Checks whether the page returned after login still shows the login form.
pub fn inspect_login_page(html: &str) -> Result<LoginPage, PortalStructureError> {
    let document = Html::parse_document(html);

    for selector in LOGIN_FORM_SELECTORS {
        let selector_obj = html_selector(selector)?;
        if document.select(&selector_obj).next().is_some() {
            let alert = html_selector(ALERT_MESSAGE_SELECTOR)?;
            let message = document
                .select(&alert)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|text| !text.is_empty());
            return Ok(LoginPage::Rejected(message));
        }
    }

    Ok(LoginPage::Authenticated)
}
