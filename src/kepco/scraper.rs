//! The login-and-fetch sequence against the PowerPlanner portal.
//!
//! ```text
//! GET /                      -> cookieSsId, cookieRsa (modulus), JSESSIONID
//!                               + input#RSAExponent
//! POST /login                -> RSA-encrypted, JSESSIONID-prefixed credentials
//! POST /rm/getRM0201.do      -> simple mode
//! POST /rs/rs0201_chart.do   -> detailed mode
//! ```

use crate::config::PortalConfig;
use crate::error::{ConfigError, ScrapeError};
use crate::kepco::client::{PortalSession, SessionCookies};
use crate::kepco::html_parsing::{inspect_login_page, parse_rsa_exponent, LoginPage};
use crate::kepco::legacy_rsa::LegacyRsaKey;
use crate::kepco::query_builder::{DataRequest, LoginForm, LOGIN_PATH};
use crate::kepco::translation::translate_response;
use crate::model::{Credentials, TranslatedRecord, UsageQuery};
use reqwest::Url;

/// Key material and cookies read from the landing page.
struct Handshake {
    cookies: SessionCookies,
    exponent: String,
}

/// Scrapes usage data from the portal, one fresh session per call.
pub struct Scraper {
    config: PortalConfig,
    base_url: Url,
}

impl Scraper {
    pub fn new(config: PortalConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        Ok(Self { config, base_url })
    }

    /// Logs in with `credentials` and fetches the data selected by `query`.
    ///
    /// The session opened here is dropped on every return path.
    pub async fn scrape(
        &self,
        credentials: &Credentials,
        query: &UsageQuery,
    ) -> Result<TranslatedRecord, ScrapeError> {
        let session = PortalSession::open(self.base_url.clone(), &self.config)?;

        let handshake = self.start_session(&session).await?;
        self.login(&session, &handshake, credentials).await?;
        let body = self.fetch_data(&session, query).await?;

        let record = translate_response(&body, query)?;
        tracing::info!(
            "Fetched {} usage data for {}",
            query.mode,
            query.date_string()
        );
        Ok(record)
    }

    async fn start_session(&self, session: &PortalSession) -> Result<Handshake, ScrapeError> {
        tracing::info!("Opening portal session at {}", session.base_url());
        let landing_page = session.get_landing_page().await?;

        let cookies = session.cookies()?;
        let exponent = parse_rsa_exponent(&landing_page)?;
        tracing::debug!(
            "Landing page gave RSA exponent {} and a {}-digit modulus",
            exponent,
            cookies.rsa.len()
        );

        Ok(Handshake { cookies, exponent })
    }

    async fn login(
        &self,
        session: &PortalSession,
        handshake: &Handshake,
        credentials: &Credentials,
    ) -> Result<(), ScrapeError> {
        let (user_id_token, password_token) = encrypt_credentials(handshake, credentials)?;
        let form = LoginForm::new(&handshake.exponent, &user_id_token, &password_token);

        let (status, page) = session
            .post_form(LOGIN_PATH, &handshake.cookies, &form)
            .await?;

        if !status.is_success() {
            return Err(ScrapeError::Authentication(format!(
                "login request returned status {}",
                status
            )));
        }

        match inspect_login_page(&page)? {
            LoginPage::Authenticated => {
                tracing::info!("Logged in to the portal");
                Ok(())
            }
            LoginPage::Rejected(message) => {
                tracing::warn!("Portal rejected the login");
                Err(ScrapeError::Authentication(message.unwrap_or_else(|| {
                    "login form is still shown after submitting credentials".to_string()
                })))
            }
        }
    }

    async fn fetch_data(
        &self,
        session: &PortalSession,
        query: &UsageQuery,
    ) -> Result<String, ScrapeError> {
        // login may have rotated JSESSIONID
        let cookies = session.cookies()?;
        let request = DataRequest::for_query(query);
        session.post_json(request.path(), &cookies, &request).await
    }
}

/// Turns both credentials into `<JSESSIONID>_<ciphertext>` login tokens.
fn encrypt_credentials(
    handshake: &Handshake,
    credentials: &Credentials,
) -> Result<(String, String), ScrapeError> {
    let key = LegacyRsaKey::from_hex(&handshake.cookies.rsa, &handshake.exponent)?;
    let mut rng = rand::thread_rng();
    let session_id = handshake.cookies.jsession_id.as_str();

    let user_id = key.login_token(session_id, &credentials.user_id, &mut rng)?;
    let password = key.login_token(session_id, &credentials.password, &mut rng)?;
    Ok((user_id, password))
}
