//! Upstream payloads as returned by the SellAuth API.
//!
//! Small resources are typed structs with optional fields; invoices and shop
//! info carry dozens of loosely typed fields and are kept as JSON objects read
//! through [`field_text`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

/// A scalar that upstream sends as either a string or a number (ids, prices,
/// stock counts, flags).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Loose truthiness: `true`, non-zero numbers and non-empty strings other
    /// than `"0"`/`"false"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Int(n) => *n != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Text(s) => {
                let s = s.trim();
                !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false")
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// `Some(None)` for an explicit `null`, `None` (via `default`) for an absent field.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Product {
    pub id: Option<Scalar>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Scalar>,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub visibility: Option<Scalar>,
    pub stock_count: Option<Scalar>,
    pub deliverables: Option<Vec<Value>>,
    pub variants: Option<Vec<Variant>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Variant {
    pub id: Option<Scalar>,
    pub name: Option<String>,
    pub price: Option<Scalar>,
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub stock: Option<Option<Scalar>>,
    pub purchase_length: Option<Scalar>,
    pub deliverables: Option<Vec<Value>>,
}

/// One page of `GET /products`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProductPage {
    pub data: Option<Vec<Product>>,
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub total: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Group {
    pub id: Option<Scalar>,
    pub name: Option<String>,
    pub products_count: Option<Scalar>,
    pub products: Option<Vec<Value>>,
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Coupon {
    pub id: Option<Scalar>,
    pub code: Option<String>,
    pub discount: Option<Scalar>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub global: Option<Scalar>,
    pub shop_id: Option<Scalar>,
    pub salt: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Body of `POST /coupons`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewCoupon {
    pub discount: i64,
    pub code: String,
    pub global: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PayoutBalances {
    pub btc: Option<CoinBalance>,
    pub ltc: Option<CoinBalance>,
}

/// Upstream keys the coin amount by its ticker (`{"btc": .., "usd": ..}`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CoinBalance {
    #[serde(alias = "btc", alias = "ltc")]
    pub amount: Option<Scalar>,
    pub usd: Option<Scalar>,
}

/// Body of `PUT /products/{id}/update`.
///
/// Upstream replaces the product wholesale, so every field we do not intend
/// to change is copied from the current state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceUpdate {
    pub price: f64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub visibility: Option<Scalar>,
}

impl PriceUpdate {
    pub fn preserving(existing: &Product, price: f64) -> Self {
        Self {
            price,
            name: existing.name.clone(),
            description: existing.description.clone(),
            currency: existing.currency.clone(),
            kind: existing.kind.clone(),
            visibility: existing.visibility.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Invoice(pub JsonObject);

impl Invoice {
    pub fn field(&self, path: &str) -> Option<String> {
        field_text(&self.0, path)
    }
}

/// Shop fields that must never reach a chat message.
pub const SENSITIVE_SHOP_FIELDS: &[&str] = &[
    "terms",
    "stripe_api_key",
    "stripe_webhook_secret",
    "discord_webhook_url",
    "discord_client_id",
    "discord_client_secret",
    "discord_bot_token",
    "paypal_client_secret",
    "paypal_webhook_id",
    "square_api_key",
    "tap_api_key",
    "amazonps_access_code",
    "amazonps_sha_request_phrase",
    "amazonps_sha_response_phrase",
];

const SENSITIVE_KEY_MARKERS: &[&str] = &[
    "secret",
    "api_key",
    "token",
    "webhook",
    "password",
    "access_code",
    "sha_",
];

pub fn is_sensitive_shop_field(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_SHOP_FIELDS.contains(&key.as_str())
        || SENSITIVE_KEY_MARKERS.iter().any(|m| key.contains(m))
}

/// Shop settings with credentials stripped.
///
/// The only way to obtain one is through redaction, so an unredacted payload
/// cannot be formatted by accident.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "JsonObject")]
pub struct ShopInfo(JsonObject);

impl From<JsonObject> for ShopInfo {
    fn from(mut raw: JsonObject) -> Self {
        raw.retain(|key, _| !is_sensitive_shop_field(key));
        Self(raw)
    }
}

impl ShopInfo {
    pub fn field(&self, path: &str) -> Option<String> {
        field_text(&self.0, path)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Fetch a (dotted) field and render it as display text.
///
/// Missing, `null` and blank-string values yield `None`.
pub fn field_text(object: &JsonObject, path: &str) -> Option<String> {
    let mut parts = path.split('.');
    let mut current = object.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    value_text(current)
}

pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_accepts_strings_and_numbers() {
        let p: Product =
            serde_json::from_value(json!({"id": 7, "price": "19.99", "stock_count": 3}))
                .unwrap();
        assert_eq!(p.id, Some(Scalar::Int(7)));
        assert_eq!(p.price.unwrap().to_string(), "19.99");
        assert_eq!(p.stock_count.unwrap().to_string(), "3");
    }

    #[test]
    fn variant_stock_distinguishes_null_from_absent() {
        let null: Variant = serde_json::from_value(json!({"stock": null})).unwrap();
        let absent: Variant = serde_json::from_value(json!({})).unwrap();
        let set: Variant = serde_json::from_value(json!({"stock": 5})).unwrap();
        assert_eq!(null.stock, Some(None));
        assert_eq!(absent.stock, None);
        assert_eq!(set.stock, Some(Some(Scalar::Int(5))));
    }

    #[test]
    fn coin_balance_reads_ticker_key() {
        let b: PayoutBalances = serde_json::from_value(json!({
            "btc": {"btc": "0.5", "usd": "30000"},
            "ltc": {"ltc": 2, "usd": 150.5}
        }))
        .unwrap();
        assert_eq!(b.btc.unwrap().amount.unwrap().to_string(), "0.5");
        assert_eq!(b.ltc.unwrap().usd.unwrap().to_string(), "150.5");
    }

    #[test]
    fn price_update_preserves_existing_fields() {
        let existing: Product = serde_json::from_value(json!({
            "name": "X",
            "description": "Y",
            "currency": "USD",
            "type": "t",
            "visibility": true,
            "price": 5
        }))
        .unwrap();

        let body = serde_json::to_value(PriceUpdate::preserving(&existing, 19.99)).unwrap();
        assert_eq!(
            body,
            json!({
                "price": 19.99,
                "name": "X",
                "description": "Y",
                "currency": "USD",
                "type": "t",
                "visibility": true
            })
        );
    }

    #[test]
    fn shop_info_strips_sensitive_fields() {
        let mut raw = JsonObject::new();
        for key in SENSITIVE_SHOP_FIELDS {
            raw.insert(key.to_string(), json!("x"));
        }
        raw.insert("some_new_secret".to_string(), json!("x"));
        raw.insert("name".to_string(), json!("My Shop"));
        raw.insert("discord_url".to_string(), json!("https://discord.gg/x"));

        let shop: ShopInfo = serde_json::from_value(Value::Object(raw)).unwrap();
        let keys: Vec<&str> = shop.keys().collect();
        assert_eq!(keys.len(), 2, "{keys:?}");
        assert_eq!(shop.field("name").as_deref(), Some("My Shop"));
        assert!(shop.field("stripe_api_key").is_none());
    }

    #[test]
    fn field_text_handles_paths_and_blanks() {
        let obj = json!({
            "product": {"name": "Key"},
            "email": "",
            "salt": null,
            "archived": false,
            "methods": ["paypal", "btc"]
        });
        let obj = obj.as_object().unwrap();
        assert_eq!(field_text(obj, "product.name").as_deref(), Some("Key"));
        assert_eq!(field_text(obj, "product.stock_count"), None);
        assert_eq!(field_text(obj, "email"), None);
        assert_eq!(field_text(obj, "salt"), None);
        assert_eq!(field_text(obj, "archived").as_deref(), Some("false"));
        assert_eq!(field_text(obj, "methods").as_deref(), Some("paypal, btc"));
    }
}
