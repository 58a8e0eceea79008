//! SellAuth REST adapter.
//!
//! Implements [`CommerceApi`] over `https://api.sellauth.com/v1/shops/{shop}/...`
//! with bearer-token auth. One request per operation, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use sab_core::{
    api::{
        require_id, ApiFailure, ApiResult, CommerceApi, Coupon, Group, Invoice, NewCoupon,
        PayoutBalances, PriceUpdate, Product, ProductPage, ShopInfo,
    },
    domain::ShopId,
    errors::Error,
    Result,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct SellAuthClient {
    base: Url,
    api_key: String,
    http: reqwest::Client,
}

impl SellAuthClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("http client build error: {e}")))?;
        Self::with_http(base_url, api_key, http)
    }

    fn with_http(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("invalid SellAuth base URL {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "invalid SellAuth base URL {base_url:?}: not a hierarchical URL"
            )));
        }
        Ok(Self {
            base,
            api_key: api_key.into(),
            http,
        })
    }

    /// `{base}/shops/{shop}/{segments...}`. Every segment, ids included, is
    /// percent-encoded as a single path segment.
    fn url(&self, shop: &ShopId, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiFailure::validation("SellAuth base URL cannot take a path"))?
            .pop_if_empty()
            .push("shops")
            .push(&shop.0)
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> ApiResult<T> {
        debug!(%method, %url, "sellauth request");

        let mut req = self
            .http
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ApiFailure::network(format!("SellAuth request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiFailure::network(format!("SellAuth response read failed: {e}")))?;

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Request failed");
            return Err(classify_failure(status.as_u16(), reason, &text));
        }

        decode_body(&text)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        self.send(Method::GET, url, None).await
    }

    async fn delete(&self, url: Url) -> ApiResult<()> {
        self.send::<Value>(Method::DELETE, url, None)
            .await
            .map(|_| ())
    }
}

fn json_body<T: Serialize>(payload: &T) -> ApiResult<Value> {
    serde_json::to_value(payload)
        .map_err(|e| ApiFailure::validation(format!("Could not encode request body: {e}")))
}

/// Map a non-2xx response to a failure kind; the message is the upstream
/// JSON `message` when present, the status reason otherwise.
pub fn classify_failure(status: u16, reason: &str, body: &str) -> ApiFailure {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {status} {reason}"));

    match status {
        404 => ApiFailure::not_found(message),
        401 | 403 => ApiFailure::unauthorized(message),
        _ => ApiFailure::unknown(message),
    }
}

/// Empty bodies decode as JSON `null` (e.g. `204 No Content`).
pub fn decode_body<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text)
        .map_err(|e| ApiFailure::validation(format!("Unexpected response from SellAuth: {e}")))
}

/// List endpoints answer with a bare array or a paginated `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Paged { data: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Paged { data: items } => items,
        }
    }
}

#[async_trait]
impl CommerceApi for SellAuthClient {
    async fn get_shop_info(&self, shop: &ShopId) -> ApiResult<ShopInfo> {
        // Redaction happens while deserializing into `ShopInfo`.
        self.get(self.url(shop, &[])?).await
    }

    async fn get_invoice(&self, shop: &ShopId, invoice_id: &str) -> ApiResult<Invoice> {
        let id = require_id("Invoice ID", invoice_id)?;
        self.get(self.url(shop, &["invoices", id])?).await
    }

    async fn get_products(&self, shop: &ShopId, page: u32, limit: u32) -> ApiResult<ProductPage> {
        let mut url = self.url(shop, &["products"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        self.get(url).await
    }

    async fn get_product_details(
        &self,
        shop: &ShopId,
        product_id: &str,
    ) -> ApiResult<Option<Product>> {
        let id = require_id("Product ID", product_id)?;
        self.get(self.url(shop, &["products", id])?).await
    }

    async fn get_groups(&self, shop: &ShopId) -> ApiResult<Vec<Group>> {
        let listing: Listing<Group> = self.get(self.url(shop, &["groups"])?).await?;
        Ok(listing.into_vec())
    }

    async fn get_group(&self, shop: &ShopId, group_id: &str) -> ApiResult<Group> {
        let id = require_id("Group ID", group_id)?;
        let group: Option<Group> = self.get(self.url(shop, &["groups", id])?).await?;
        Ok(group.unwrap_or_default())
    }

    async fn get_coupons(&self, shop: &ShopId) -> ApiResult<Vec<Coupon>> {
        let listing: Listing<Coupon> = self.get(self.url(shop, &["coupons"])?).await?;
        Ok(listing.into_vec())
    }

    async fn create_coupon(&self, shop: &ShopId, coupon: &NewCoupon) -> ApiResult<Coupon> {
        if coupon.code.trim().is_empty() {
            return Err(ApiFailure::validation("Coupon code must not be empty"));
        }
        let body = json_body(coupon)?;
        self.send(Method::POST, self.url(shop, &["coupons"])?, Some(body))
            .await
    }

    async fn delete_coupon(&self, shop: &ShopId, coupon_id: &str) -> ApiResult<()> {
        let id = require_id("Coupon ID", coupon_id)?;
        self.delete(self.url(shop, &["coupons", id])?).await
    }

    async fn delete_product(&self, shop: &ShopId, product_id: &str) -> ApiResult<()> {
        let id = require_id("Product ID", product_id)?;
        self.delete(self.url(shop, &["products", id])?).await
    }

    async fn get_payout_balances(&self, shop: &ShopId) -> ApiResult<PayoutBalances> {
        let balances: Option<PayoutBalances> =
            self.get(self.url(shop, &["payouts", "balances"])?).await?;
        Ok(balances.unwrap_or_default())
    }

    async fn update_product(
        &self,
        shop: &ShopId,
        product_id: &str,
        update: &PriceUpdate,
    ) -> ApiResult<()> {
        let id = require_id("Product ID", product_id)?;
        let body = json_body(update)?;
        self.send::<Value>(
            Method::PUT,
            self.url(shop, &["products", id, "update"])?,
            Some(body),
        )
        .await
        .map(|_| ())
    }
}
