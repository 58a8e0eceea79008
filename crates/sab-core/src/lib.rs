//! Core domain + application logic for the SellAuth Discord bot.
//!
//! This crate is intentionally framework-agnostic. Discord and the SellAuth
//! HTTP API live behind ports (traits) implemented in adapter crates.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;

pub use errors::{Error, Result};
