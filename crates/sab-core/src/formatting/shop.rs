use crate::api::ShopInfo;

use super::{or_placeholder, DisplayDocument, Section};

/// A fixed group of related shop fields rendered as one document.
pub struct ShopPartition {
    pub title: &'static str,
    /// `(label, upstream key)`
    pub fields: &'static [(&'static str, &'static str)],
}

/// A single embed cannot hold every shop field, so the settings are split
/// into these documents, in this order.
pub const SHOP_PARTITIONS: &[ShopPartition] = &[
    ShopPartition {
        title: "Basic Info",
        fields: &[
            ("Shop ID", "id"),
            ("Name", "name"),
            ("Subdomain", "subdomain"),
            ("Created At", "created_at"),
            ("Updated At", "updated_at"),
            ("Owner ID", "owner_id"),
            ("URL", "url"),
        ],
    },
    ShopPartition {
        title: "Images & URLs",
        fields: &[
            ("Logo Image ID", "logo_image_id"),
            ("Favicon Image ID", "favicon_image_id"),
            ("Image URL", "image_url"),
            ("Background Image URL", "background_image_url"),
            ("Discord URL", "discord_url"),
            ("YouTube URL", "youtube_url"),
            ("Telegram URL", "telegram_url"),
            ("TikTok URL", "tiktok_url"),
            ("Instagram URL", "instagram_url"),
        ],
    },
    ShopPartition {
        title: "Bitcoin & Litecoin Details",
        fields: &[
            ("Bitcoin Address", "bitcoin_address"),
            ("Bitcoin Wallet", "bitcoin_wallet"),
            ("Bitcoin Last Processed Block", "bitcoin_last_processed_block"),
            ("Litecoin Address", "litecoin_address"),
            ("Litecoin Wallet", "litecoin_wallet"),
            ("Litecoin Last Processed Block", "litecoin_last_processed_block"),
        ],
    },
    ShopPartition {
        title: "PayPal & Payment Details",
        fields: &[
            ("PayPal Email", "paypal_email"),
            ("PayPal Method", "paypal_method"),
            ("PayPal Client ID", "paypal_client_id"),
            ("PayPal FF Method", "paypalff_method"),
            ("Stripe PayPal Integration", "stripe_paypal"),
            ("PayPal FF Email", "paypalff_email"),
            ("PayPal FF Currency", "paypalff_currency"),
            ("Cash App Cashtag", "cashapp_cashtag"),
            ("Cash App Email", "cashapp_email"),
            ("Venmo Tag", "venmo_tag"),
            ("Venmo Email", "venmo_email"),
            ("Square Location ID", "square_location_id"),
        ],
    },
    ShopPartition {
        title: "Additional Payment Details",
        fields: &[
            ("Amazon PS Merchant Identifier", "amazonps_merchant_identifier"),
            ("Crisp Website ID", "crisp_website_id"),
        ],
    },
    ShopPartition {
        title: "Fees",
        fields: &[
            ("PayPal Fee", "paypal_fee"),
            ("PayPal FF Fee", "paypalff_fee"),
            ("Stripe Fee", "stripe_fee"),
            ("Square Fee", "square_fee"),
            ("Bitcoin Fee", "bitcoin_fee"),
            ("Litecoin Fee", "litecoin_fee"),
            ("Cash App Fee", "cashapp_fee"),
            ("Venmo Fee", "venmo_fee"),
            ("Amazon PS Fee", "amazonps_fee"),
            ("Skrill Fee", "skrill_fee"),
            ("Mollie Fee", "mollie_fee"),
            ("SumUp Fee", "sumup_fee"),
        ],
    },
    ShopPartition {
        title: "Subscription & Termination",
        fields: &[
            ("Subscription End Time", "subscription_end_time"),
            ("Termination Reason", "termination_reason"),
            ("Terminated At", "terminated_at"),
        ],
    },
    ShopPartition {
        title: "Limits and Additional Settings",
        fields: &[
            ("Max Product Limit", "max_product_limit"),
            ("Max Variant Limit", "max_variant_limit"),
            ("Max User Limit", "max_user_limit"),
            ("Valid Payment Methods", "valid_payment_methods"),
            ("Enable Automatic Feedback", "enable_automatic_feedback"),
            ("Is Subscribed", "is_subscribed"),
            ("Theme ID", "theme_id"),
            ("Deleted At", "deleted_at"),
        ],
    },
];

pub fn shop_documents(shop: &ShopInfo) -> Vec<DisplayDocument> {
    SHOP_PARTITIONS
        .iter()
        .map(|partition| {
            DisplayDocument::new(format!("Shop Information - {}", partition.title), "").sections(
                partition
                    .fields
                    .iter()
                    .map(|(label, key)| Section::inline(label, or_placeholder(shop.field(key)))),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{is_sensitive_shop_field, SENSITIVE_SHOP_FIELDS};
    use crate::formatting::PLACEHOLDER;
    use serde_json::{json, Value};

    fn shop(v: Value) -> ShopInfo {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn layout_never_declares_a_sensitive_field() {
        for p in SHOP_PARTITIONS {
            for (_, key) in p.fields {
                assert!(!is_sensitive_shop_field(key), "{key} is sensitive");
            }
        }
    }

    #[test]
    fn empty_shop_renders_all_partitions_with_placeholders() {
        let docs = shop_documents(&shop(json!({})));
        assert_eq!(docs.len(), SHOP_PARTITIONS.len());
        for (doc, p) in docs.iter().zip(SHOP_PARTITIONS) {
            assert_eq!(doc.sections.len(), p.fields.len());
            assert!(doc.sections.iter().all(|s| s.value == PLACEHOLDER && s.inline));
        }
    }

    #[test]
    fn output_never_contains_sensitive_names_or_values() {
        let mut raw = serde_json::Map::new();
        for key in SENSITIVE_SHOP_FIELDS {
            raw.insert(key.to_string(), json!(format!("SECRET-{key}")));
        }
        raw.insert("name".to_string(), json!("Shop"));
        raw.insert("valid_payment_methods".to_string(), json!(["paypal", "btc"]));

        let docs = shop_documents(&shop(Value::Object(raw)));
        for doc in &docs {
            for s in &doc.sections {
                assert!(!s.value.contains("SECRET-"), "{s:?}");
                for key in SENSITIVE_SHOP_FIELDS {
                    assert!(!s.name.contains(key) && !s.value.contains(key));
                }
            }
        }
        assert_eq!(docs[0].sections[1].value, "Shop");
        let limits = docs.last().unwrap();
        assert_eq!(limits.sections[3].value, "paypal, btc");
    }
}
