use std::{env, fs, path::Path, time::Duration};

use crate::{domain::ShopId, errors::Error, Result};

pub const DEFAULT_SELLAUTH_BASE_URL: &str = "https://api.sellauth.com/v1";
pub const DEFAULT_EMBED_COLOR: u32 = 0x0accc4;
pub const DEFAULT_CUSTOMER_ROLE: &str = "Customer";

/// Typed configuration, read once at startup and shared read-only afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub application_id: u64,

    // SellAuth
    pub sellauth_api_key: String,
    pub shop_id: ShopId,
    pub sellauth_base_url: String,
    pub http_timeout: Duration,
    pub products_page_limit: u32,

    // Presentation
    pub embed_color: u32,

    // Role claiming
    pub customer_role_name: String,
    pub verify_claim_orders: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key).and_then(non_empty).ok_or_else(|| {
                Error::Config(format!("{key} environment variable is required"))
            })
        };

        let discord_token = required("DISCORD_TOKEN")?;
        let application_id = required("CLIENT_ID")?
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| Error::Config("CLIENT_ID must be a Discord application id".to_string()))?;
        let sellauth_api_key = required("SELLAUTH_API_KEY")?;
        let shop_id = ShopId(required("SELLAUTH_SHOP_ID")?.trim().to_string());

        let sellauth_base_url = lookup("SELLAUTH_BASE_URL")
            .and_then(non_empty)
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SELLAUTH_BASE_URL.to_string());
        let http_timeout = Duration::from_secs(
            parse_u64(lookup("SELLAUTH_TIMEOUT_SECS"))
                .unwrap_or(30)
                .max(1),
        );
        let products_page_limit = parse_u64(lookup("PRODUCTS_PAGE_LIMIT"))
            .map(|n| n.clamp(1, 100) as u32)
            .unwrap_or(10);

        let embed_color = match lookup("EMBED_COLOR").and_then(non_empty) {
            Some(raw) => parse_hex_color(&raw)
                .ok_or_else(|| Error::Config(format!("EMBED_COLOR is not a hex color: {raw}")))?,
            None => DEFAULT_EMBED_COLOR,
        };

        let customer_role_name = lookup("CUSTOMER_ROLE_NAME")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_CUSTOMER_ROLE.to_string());
        let verify_claim_orders = parse_bool(lookup("CLAIMROLE_VERIFY_ORDER")).unwrap_or(false);

        Ok(Self {
            discord_token,
            application_id,
            sellauth_api_key,
            shop_id,
            sellauth_base_url,
            http_timeout,
            products_page_limit,
            embed_color,
            customer_role_name,
            verify_claim_orders,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn parse_bool(v: Option<String>) -> Option<bool> {
    v.map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

/// Accepts `0accc4`, `#0accc4` and `0x0accc4`.
fn parse_hex_color(raw: &str) -> Option<u32> {
    let s = raw.trim();
    let s = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    if s.is_empty() || s.len() > 6 {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
