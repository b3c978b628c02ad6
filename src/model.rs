//! Domain types shared by the scraper and the CLI.

use chrono::{Local, NaiveDate};
use serde_derive::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Account identifier and secret used to log in to the portal.
///
/// The secret is only ever turned into ciphertext; `Debug` never prints it.
#[derive(Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which data endpoint to query and which field table to translate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Real-time summary of the current billing period (date-independent)
    #[default]
    Simple,
    /// Time series for the requested date
    Detailed,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Simple => f.write_str("simple"),
            Mode::Detailed => f.write_str("detailed"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Mode::Simple),
            "detailed" => Ok(Mode::Detailed),
            other => Err(format!(
                "unknown mode '{}', expected 'simple' or 'detailed'",
                other
            )),
        }
    }
}

/// What to fetch: the target date and the retrieval mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageQuery {
    pub date: NaiveDate,
    pub mode: Mode,
}

impl UsageQuery {
    pub fn new(date: NaiveDate, mode: Mode) -> Self {
        Self { date, mode }
    }

    /// The date as the portal expects it (`YYYY-MM-DD`).
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl Default for UsageQuery {
    /// Today, simple mode.
    fn default() -> Self {
        Self::new(Local::now().date_naive(), Mode::Simple)
    }
}

/// One time-series payload tagged with the date it was requested for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedRecord {
    #[serde(rename = "DateTime")]
    pub date: String,
    #[serde(rename = "Data")]
    pub data: Value,
}

/// Usage data with the portal's short codes replaced by descriptive names.
///
/// Serializes to the parsed document itself in simple mode and to a
/// one-element array in detailed mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranslatedRecord {
    Summary(Value),
    TimeSeries([DatedRecord; 1]),
}

const REALTIME_USAGE_KWH: &str = "실시간사용량(kWh)";
const PREDICTED_USAGE_KWH: &str = "예상_전력사용량";
const PREDICTED_CHARGE: &str = "당월_예상_청구금액";
const LAGGING_POWER_FACTOR: &str = "역률(지상)";

const DEFAULT_VOLTAGE: f64 = 220.0;
const DEFAULT_POWER_FACTOR: f64 = 0.95;

/// Headline figures derived from a simple-mode record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerSummary {
    pub current_power_wh: Option<f64>,
    pub predicted_usage_kwh: Option<f64>,
    pub predicted_charge_won: Option<f64>,
    pub voltage: f64,
    pub power_factor: f64,
    pub current_a: Option<f64>,
}

impl PowerSummary {
    pub fn from_record(record: &Value) -> Self {
        let current_power_wh = numeric_field(record, REALTIME_USAGE_KWH).map(|kwh| kwh * 1000.0);
        let power_factor = numeric_field(record, LAGGING_POWER_FACTOR)
            .filter(|pf| *pf > 0.0)
            .unwrap_or(DEFAULT_POWER_FACTOR);
        let current_a = current_power_wh
            .filter(|wh| *wh > 0.0)
            .map(|wh| wh / (DEFAULT_VOLTAGE * power_factor));

        if current_power_wh.unwrap_or(0.0) <= 0.0 {
            tracing::warn!("Real-time usage is zero or missing in the portal response");
        }

        Self {
            current_power_wh,
            predicted_usage_kwh: numeric_field(record, PREDICTED_USAGE_KWH),
            predicted_charge_won: numeric_field(record, PREDICTED_CHARGE),
            voltage: DEFAULT_VOLTAGE,
            power_factor,
            current_a,
        }
    }
}

/// Reads a number that the portal may send either as a JSON number or as a
/// string such as `"1,234.5"`.
fn numeric_field(record: &Value, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', "").trim().parse::<f64>().ok(),
        _ => None,
    }
}
