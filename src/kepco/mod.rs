pub mod client;
pub mod html_parsing;
pub mod legacy_rsa;
pub mod query_builder;
pub mod scraper;
pub mod translation;

pub use client::{PortalSession, SessionCookies};
pub use legacy_rsa::LegacyRsaKey;
pub use scraper::Scraper;
