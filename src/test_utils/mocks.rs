//! Mock PowerPlanner portal for end-to-end scraper tests.
//!
//! Built on `wiremock` so tests can look at the requests the scraper sent
//! after the fact (login form fields, cookie headers).

use super::fixtures::{constants, pages};
use reqwest::Url;
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const DATA_PATHS: &[&str] = &["/rm/getRM0201.do", "/rs/rs0201_chart.do"];

fn default_cookies() -> Vec<(&'static str, &'static str)> {
    vec![
        ("cookieSsId", constants::TEST_SSID),
        ("cookieRsa", constants::TEST_MODULUS_HEX),
        ("JSESSIONID", constants::TEST_JSESSIONID),
    ]
}

/// Builder for a mock portal; each `with_*` mounts one endpoint.
pub struct MockPortalBuilder {
    server: MockServer,
}

impl MockPortalBuilder {
    /// Starts a new mock server.
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Gets the server URL.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    async fn mount_landing(self, cookies: &[(&str, &str)], body: String) -> Self {
        let mut template = ResponseTemplate::new(200)
            .insert_header("content-type", "text/html; charset=utf-8")
            .set_body_string(body);
        for (name, value) in cookies {
            template = template.append_header("set-cookie", format!("{}={}; Path=/", name, value));
        }

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(template)
            .expect(1)
            .mount(&self.server)
            .await;
        self
    }

    /// Landing page with the three handshake cookies and exponent `10001`.
    pub async fn with_landing_page(self) -> Self {
        self.mount_landing(
            &default_cookies(),
            pages::landing_page(constants::TEST_EXPONENT),
        )
        .await
    }

    /// Landing page with the usual cookies and a custom body.
    pub async fn with_landing_page_body(self, body: &str) -> Self {
        self.mount_landing(&default_cookies(), body.to_string()).await
    }

    /// Landing page with the usual body and a custom set of cookies.
    pub async fn with_landing_page_cookies(self, cookies: &[(&str, &str)]) -> Self {
        self.mount_landing(cookies, pages::landing_page(constants::TEST_EXPONENT))
            .await
    }

    async fn mount_login(self, template: ResponseTemplate) -> Self {
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(header(
                "content-type",
                "application/x-www-form-urlencoded",
            ))
            .and(body_string_contains("RSAExponent=10001"))
            .respond_with(template)
            .expect(1)
            .mount(&self.server)
            .await;
        self
    }

    /// Login that lands on the main page.
    pub async fn with_login_accepted(self) -> Self {
        self.mount_login(ResponseTemplate::new(200).set_body_string(pages::MAIN_PAGE))
            .await
    }

    /// Login that succeeds and hands out a new `JSESSIONID`.
    pub async fn with_login_rotating_session(self, jsession_id: &str) -> Self {
        self.mount_login(
            ResponseTemplate::new(200)
                .append_header("set-cookie", format!("JSESSIONID={}; Path=/", jsession_id))
                .set_body_string(pages::MAIN_PAGE),
        )
        .await
    }

    /// Login that shows the form again with an alert.
    pub async fn with_login_rejected(self, alert: &str) -> Self {
        self.mount_login(
            ResponseTemplate::new(200).set_body_string(pages::rejected_login_page(Some(alert))),
        )
        .await
    }

    /// Login answered with a bare status code.
    pub async fn with_login_status(self, status: u16) -> Self {
        self.mount_login(ResponseTemplate::new(status)).await
    }

    /// Real-time summary endpoint returning `body`.
    pub async fn with_simple_data(self, body: &str) -> Self {
        Mock::given(method("POST"))
            .and(path("/rm/getRM0201.do"))
            .and(header("x-requested-with", "XMLHttpRequest"))
            .and(body_json(json!({"menuType": "time", "TOU": false})))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&self.server)
            .await;
        self
    }

    /// Time-series endpoint returning `body` for `date`.
    pub async fn with_detailed_data(self, date: &str, body: &str) -> Self {
        Mock::given(method("POST"))
            .and(path("/rs/rs0201_chart.do"))
            .and(header("x-requested-with", "XMLHttpRequest"))
            .and(body_json(
                json!({"SELECT_DT": date, "TIME_TYPE": "1", "selectType": "all"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&self.server)
            .await;
        self
    }

    /// Checks every mounted endpoint was hit the expected number of times.
    pub async fn verify(&self) {
        self.server.verify().await;
    }

    async fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == request_path)
            .collect()
    }

    /// Decoded fields of the login form the scraper posted.
    pub async fn login_form(&self) -> Option<HashMap<String, String>> {
        let request = self.requests_to("/login").await.into_iter().next()?;
        let body = String::from_utf8(request.body).ok()?;
        let url = Url::parse(&format!("http://form.local/?{}", body)).ok()?;
        Some(url.query_pairs().into_owned().collect())
    }

    /// `Cookie` header of the first data request.
    pub async fn data_request_cookie(&self) -> Option<String> {
        for data_path in DATA_PATHS {
            if let Some(request) = self.requests_to(data_path).await.into_iter().next() {
                return request
                    .headers
                    .get("cookie")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
            }
        }
        None
    }

    /// Asserts the scraper never reached a data endpoint.
    pub async fn verify_no_data_request(&self) {
        for data_path in DATA_PATHS {
            assert!(
                self.requests_to(data_path).await.is_empty(),
                "unexpected request to {}",
                data_path
            );
        }
    }
}
