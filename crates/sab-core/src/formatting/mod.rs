//! Response formatting: upstream payloads → [`DisplayDocument`]s.
//!
//! Pure functions only. Every declared field slot is always emitted; missing
//! values render as [`PLACEHOLDER`].

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::api::value_text;

mod catalog;
mod document;
mod invoice;
mod product;
mod shop;

pub use catalog::*;
pub use document::*;
pub use invoice::invoice_document;
pub use product::product_document;
pub use shop::{shop_documents, ShopPartition, SHOP_PARTITIONS};

pub fn or_placeholder<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `YYYY-MM-DD HH:MM:SS UTC` when parseable, the raw text otherwise.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => raw.to_string(),
    }
}

/// Discord's client-localized `<t:unix:F>` markup.
pub fn discord_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    match parse_timestamp(raw) {
        Some(ts) => format!("<t:{}:F>", ts.timestamp()),
        None => raw.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // SellAuth also emits naive `2024-01-31 12:00:00` (UTC).
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Join a JSON list into one text block; `None` when nothing renders.
fn join_values(items: Option<&[Value]>, separator: &str) -> Option<String> {
    let parts: Vec<String> = items?.iter().filter_map(value_text).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(separator))
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
