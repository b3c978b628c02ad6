use crate::config::PortalConfig;
use crate::error::{PortalStructureError, ScrapeError};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, USER_AGENT};
use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::Serialize;
use std::sync::Arc;

pub const SSID_COOKIE: &str = "cookieSsId";
pub const RSA_COOKIE: &str = "cookieRsa";
pub const JSESSIONID_COOKIE: &str = "JSESSIONID";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const JSON_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const X_REQUESTED_WITH: &str = "X-Requested-With";

/// The three cookies the portal's login handshake depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookies {
    pub ssid: String,
    /// Hex RSA modulus
    pub rsa: String,
    pub jsession_id: String,
}

impl SessionCookies {
    /// Picks the handshake cookies out of a `name=value; name=value` header.
    pub fn from_header(header: &str) -> Result<Self, PortalStructureError> {
        let find = |name: &str| {
            header
                .split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(key, value)| *key == name && !value.is_empty())
                .map(|(_, value)| value.to_string())
                .ok_or_else(|| PortalStructureError::missing_cookie(name))
        };

        Ok(Self {
            ssid: find(SSID_COOKIE)?,
            rsa: find(RSA_COOKIE)?,
            jsession_id: find(JSESSIONID_COOKIE)?,
        })
    }

    /// `Cookie` header value, always in the order the portal's own pages send.
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; {}={}; {}={}",
            SSID_COOKIE, self.ssid, RSA_COOKIE, self.rsa, JSESSIONID_COOKIE, self.jsession_id
        )
    }
}

/// One cookie-bearing conversation with the portal.
///
/// A session lives for a single scrape; dropping it closes its connections.
pub struct PortalSession {
    http_client: HttpClient,
    jar: Arc<Jar>,
    base_url: Url,
    user_agent: String,
}

impl PortalSession {
    pub fn open(base_url: Url, config: &PortalConfig) -> Result<Self, ScrapeError> {
        let jar = Arc::new(Jar::default());
        let mut builder = HttpClient::builder().cookie_provider(Arc::clone(&jar));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            jar,
            base_url,
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Handshake cookies currently held by the session's jar.
    pub fn cookies(&self) -> Result<SessionCookies, PortalStructureError> {
        let header = self
            .jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .unwrap_or_default();
        SessionCookies::from_header(&header)
    }

    /// Fetches the portal root, which sets the handshake cookies.
    pub async fn get_landing_page(&self) -> Result<String, ScrapeError> {
        let url = self.url("");
        tracing::debug!("GET {}", url);
        let response = self
            .http_client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ScrapeError::server_error(status, body))
        }
    }

    /// POSTs a form-encoded body and hands back status and page, unchecked.
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        cookies: &SessionCookies,
        form: &T,
    ) -> Result<(StatusCode, String), ScrapeError> {
        let url = self.url(path);
        tracing::debug!("POST {} (form)", url);
        let response = self
            .http_client
            .post(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(COOKIE, cookies.header_value())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// POSTs a JSON body as the portal's own AJAX calls do and returns the
    /// raw response text.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        cookies: &SessionCookies,
        body: &T,
    ) -> Result<String, ScrapeError> {
        let url = self.url(path);
        tracing::debug!("POST {} (json)", url);
        let response = self
            .http_client
            .post(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(COOKIE, cookies.header_value())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_ACCEPT)
            .header(X_REQUESTED_WITH, "XMLHttpRequest")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(ScrapeError::server_error(status, text))
        }
    }
}
