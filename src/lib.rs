//! Client for the KEPCO PowerPlanner portal.
//!
//! Logs in with the portal's RSA-encrypted credential handshake, fetches
//! power-usage data for an account, and returns it with the portal's short
//! field codes replaced by descriptive names.
//!
//! ```no_run
//! use powerplanner::config::PortalConfig;
//! use powerplanner::kepco::Scraper;
//! use powerplanner::model::{Credentials, UsageQuery};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scraper = Scraper::new(PortalConfig::default())?;
//! let credentials = Credentials::new("0123456789", "password");
//! let record = scraper.scrape(&credentials, &UsageQuery::default()).await?;
//! println!("{}", serde_json::to_string(&record)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod kepco;
pub mod model;

#[cfg(test)]
mod test_utils;

pub use error::{Error, Result, ScrapeError};
pub use kepco::Scraper;
pub use model::{Credentials, Mode, PowerSummary, TranslatedRecord, UsageQuery};
