//! Request payloads for the portal's login and data endpoints.

use crate::model::{Mode, UsageQuery};
use serde_derive::Serialize;

pub const LOGIN_PATH: &str = "login";
pub const DETAILED_DATA_PATH: &str = "rs/rs0201_chart.do";
pub const SIMPLE_DATA_PATH: &str = "rm/getRM0201.do";

/// Form body of the login POST.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LoginForm<'a> {
    #[serde(rename = "RSAExponent")]
    pub rsa_exponent: &'a str,
    #[serde(rename = "USER_ID")]
    pub user_id: &'a str,
    #[serde(rename = "USER_PWD")]
    pub user_pwd: &'a str,
    #[serde(rename = "viewType")]
    pub view_type: &'static str,
}

impl<'a> LoginForm<'a> {
    pub fn new(rsa_exponent: &'a str, user_id_token: &'a str, password_token: &'a str) -> Self {
        Self {
            rsa_exponent,
            user_id: user_id_token,
            user_pwd: password_token,
            view_type: "web",
        }
    }
}

/// JSON body of a data request.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DataRequest {
    /// Quarter-hour series for one day
    TimeSeries {
        #[serde(rename = "SELECT_DT")]
        select_dt: String,
        #[serde(rename = "TIME_TYPE")]
        time_type: &'static str,
        #[serde(rename = "selectType")]
        select_type: &'static str,
    },
    /// Real-time summary; the portal ignores any date here
    RealTime {
        #[serde(rename = "menuType")]
        menu_type: &'static str,
        #[serde(rename = "TOU")]
        tou: bool,
    },
}

impl DataRequest {
    pub fn for_query(query: &UsageQuery) -> Self {
        match query.mode {
            Mode::Detailed => DataRequest::TimeSeries {
                select_dt: query.date_string(),
                time_type: "1",
                select_type: "all",
            },
            Mode::Simple => DataRequest::RealTime {
                menu_type: "time",
                tou: false,
            },
        }
    }

    /// Endpoint path, relative to the portal base URL.
    pub fn path(&self) -> &'static str {
        match self {
            DataRequest::TimeSeries { .. } => DETAILED_DATA_PATH,
            DataRequest::RealTime { .. } => SIMPLE_DATA_PATH,
        }
    }
}
