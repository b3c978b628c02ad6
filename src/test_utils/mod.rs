//! Test utilities shared by the scraper's unit tests.
//!
//! Configuration builders, page and response fixtures, and a mock portal
//! server that records what the scraper sent.

#![cfg(test)]

pub mod config;
pub mod logs;
pub mod mocks;
