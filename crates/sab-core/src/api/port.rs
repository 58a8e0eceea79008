use async_trait::async_trait;

use crate::domain::ShopId;

use super::{
    models::{
        Coupon, Group, Invoice, NewCoupon, PayoutBalances, PriceUpdate, Product, ProductPage,
        ShopInfo,
    },
    result::{ApiFailure, ApiResult},
};

/// Hexagonal port for the SellAuth commerce API.
///
/// One method per resource/action; each issues a single authenticated call
/// (no retries) and normalizes the outcome into [`ApiResult`].
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Shop settings, already redacted of credentials.
    async fn get_shop_info(&self, shop: &ShopId) -> ApiResult<ShopInfo>;

    async fn get_invoice(&self, shop: &ShopId, invoice_id: &str) -> ApiResult<Invoice>;

    async fn get_products(&self, shop: &ShopId, page: u32, limit: u32) -> ApiResult<ProductPage>;

    /// `Ok(None)` when upstream answered successfully with an empty/null body.
    async fn get_product_details(
        &self,
        shop: &ShopId,
        product_id: &str,
    ) -> ApiResult<Option<Product>>;

    async fn get_groups(&self, shop: &ShopId) -> ApiResult<Vec<Group>>;

    async fn get_group(&self, shop: &ShopId, group_id: &str) -> ApiResult<Group>;

    async fn get_coupons(&self, shop: &ShopId) -> ApiResult<Vec<Coupon>>;

    async fn create_coupon(&self, shop: &ShopId, coupon: &NewCoupon) -> ApiResult<Coupon>;

    async fn delete_coupon(&self, shop: &ShopId, coupon_id: &str) -> ApiResult<()>;

    async fn delete_product(&self, shop: &ShopId, product_id: &str) -> ApiResult<()>;

    async fn get_payout_balances(&self, shop: &ShopId) -> ApiResult<PayoutBalances>;

    /// Replace a product's editable fields.
    async fn update_product(
        &self,
        shop: &ShopId,
        product_id: &str,
        update: &PriceUpdate,
    ) -> ApiResult<()>;

    /// Read-modify-write price change: fetch the product, then update it with
    /// the new price and its current name, description, currency, type and
    /// visibility.
    ///
    /// Not atomic: a concurrent upstream edit between the two calls is
    /// overwritten. A failed read issues no write.
    async fn edit_product_price(
        &self,
        shop: &ShopId,
        product_id: &str,
        price: f64,
    ) -> ApiResult<PriceUpdate> {
        let existing = self
            .get_product_details(shop, product_id)
            .await?
            .ok_or_else(|| {
                ApiFailure::not_found("Could not retrieve product details for the update.")
            })?;

        let update = PriceUpdate::preserving(&existing, price);
        self.update_product(shop, product_id, &update).await?;
        Ok(update)
    }
}

/// Reject empty identifiers, and identifiers that could address another path
/// or shop, before any network call.
pub fn require_id<'a>(what: &str, id: &'a str) -> ApiResult<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiFailure::validation(format!("{what} must not be empty")));
    }
    let traversal = matches!(id, "." | "..")
        || id
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control());
    if traversal {
        return Err(ApiFailure::validation(format!(
            "{what} contains characters that are not allowed"
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::api::{FailureKind, Scalar};

    /// Only the two calls a price edit makes are backed.
    struct ProductStore {
        product: Option<Product>,
        read_failure: Option<ApiFailure>,
        writes: Mutex<Vec<(String, PriceUpdate)>>,
    }

    #[async_trait]
    impl CommerceApi for ProductStore {
        async fn get_shop_info(&self, _: &ShopId) -> ApiResult<ShopInfo> {
            unimplemented!()
        }
        async fn get_invoice(&self, _: &ShopId, _: &str) -> ApiResult<Invoice> {
            unimplemented!()
        }
        async fn get_products(&self, _: &ShopId, _: u32, _: u32) -> ApiResult<ProductPage> {
            unimplemented!()
        }
        async fn get_product_details(&self, _: &ShopId, _: &str) -> ApiResult<Option<Product>> {
            match &self.read_failure {
                Some(f) => Err(f.clone()),
                None => Ok(self.product.clone()),
            }
        }
        async fn get_groups(&self, _: &ShopId) -> ApiResult<Vec<Group>> {
            unimplemented!()
        }
        async fn get_group(&self, _: &ShopId, _: &str) -> ApiResult<Group> {
            unimplemented!()
        }
        async fn get_coupons(&self, _: &ShopId) -> ApiResult<Vec<Coupon>> {
            unimplemented!()
        }
        async fn create_coupon(&self, _: &ShopId, _: &NewCoupon) -> ApiResult<Coupon> {
            unimplemented!()
        }
        async fn delete_coupon(&self, _: &ShopId, _: &str) -> ApiResult<()> {
            unimplemented!()
        }
        async fn delete_product(&self, _: &ShopId, _: &str) -> ApiResult<()> {
            unimplemented!()
        }
        async fn get_payout_balances(&self, _: &ShopId) -> ApiResult<PayoutBalances> {
            unimplemented!()
        }
        async fn update_product(
            &self,
            _: &ShopId,
            product_id: &str,
            update: &PriceUpdate,
        ) -> ApiResult<()> {
            self.writes
                .lock()
                .unwrap()
                .push((product_id.to_string(), update.clone()));
            Ok(())
        }
    }

    fn store(product: Option<Product>, read_failure: Option<ApiFailure>) -> ProductStore {
        ProductStore {
            product,
            read_failure,
            writes: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn price_edit_preserves_other_fields() {
        let product: Product = serde_json::from_value(json!({
            "name": "X", "description": "Y", "currency": "USD", "type": "t", "visibility": true
        }))
        .unwrap();
        let api = store(Some(product), None);

        let update = api
            .edit_product_price(&ShopId("1".into()), "p1", 19.99)
            .await
            .unwrap();

        let writes = api.writes.lock().unwrap().clone();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "p1");
        assert_eq!(writes[0].1, update);
        assert_eq!(
            update,
            PriceUpdate {
                price: 19.99,
                name: Some("X".into()),
                description: Some("Y".into()),
                currency: Some("USD".into()),
                kind: Some("t".into()),
                visibility: Some(Scalar::Bool(true)),
            }
        );
    }

    #[tokio::test]
    async fn failed_read_issues_no_write() {
        let api = store(None, Some(ApiFailure::not_found("Product not found")));
        let err = api
            .edit_product_price(&ShopId("1".into()), "p1", 1.0)
            .await
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::NotFound);
        assert!(api.writes.lock().unwrap().is_empty());

        let api = store(None, None);
        let err = api
            .edit_product_price(&ShopId("1".into()), "p1", 1.0)
            .await
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::NotFound);
        assert!(api.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(require_id("Invoice ID", " 7 ").unwrap(), "7");
        assert_eq!(
            require_id("Invoice ID", "  ").unwrap_err().kind,
            FailureKind::Validation
        );
    }

    #[test]
    fn ids_that_leave_their_path_segment_are_rejected() {
        for id in [
            "../products/7",
            "../../43/invoices/1",
            "..",
            ".",
            "7?limit=1",
            "7#x",
            "%2e%2e",
            "a\\b",
            "a\nb",
        ] {
            let f = require_id("Coupon ID", id).unwrap_err();
            assert_eq!(f.kind, FailureKind::Validation, "{id}");
        }
        assert_eq!(require_id("Invoice ID", "inv-1.a_b").unwrap(), "inv-1.a_b");
    }
}
