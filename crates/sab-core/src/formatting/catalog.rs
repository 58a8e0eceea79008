//! Documents for list views, confirmations, and small resources.

use crate::api::{CoinBalance, Coupon, Group, PayoutBalances, PriceUpdate, ProductPage};

use super::{
    capitalize, discord_timestamp, format_timestamp, or_placeholder, yes_no, DisplayDocument,
    Section,
};

pub fn groups_document(groups: &[Group]) -> DisplayDocument {
    let description = if groups.is_empty() {
        "No groups found."
    } else {
        "Here are the available groups:"
    };

    DisplayDocument::new("Groups", description).sections(groups.iter().map(|g| {
        Section::labelled(
            format!("**`{}`**", or_placeholder(g.name.as_ref())),
            &[
                ("ID", or_placeholder(g.id.as_ref())),
                ("Product Count", product_count(g)),
                ("Created At", format_timestamp(g.created_at.as_deref())),
            ],
        )
    }))
}

pub fn group_document(group: &Group) -> DisplayDocument {
    let id = or_placeholder(group.id.as_ref());
    DisplayDocument::new(
        "Group Details",
        format!("Here are the details for group ID: **{id}**"),
    )
    .section(Section::inline("Name", or_placeholder(group.name.as_ref())))
    .section(Section::inline("ID", id))
    .section(Section::inline("Product Count", product_count(group)))
    .section(Section::inline(
        "Created At",
        format_timestamp(group.created_at.as_deref()),
    ))
}

/// The embedded product list wins over the upstream counter; no data means 0.
fn product_count(group: &Group) -> String {
    if let Some(products) = &group.products {
        return products.len().to_string();
    }
    group
        .products_count
        .as_ref()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "0".to_string())
}

pub fn coupons_document(coupons: &[Coupon]) -> DisplayDocument {
    let description = if coupons.is_empty() {
        "No coupons found."
    } else {
        "Here are the available coupons:"
    };

    DisplayDocument::new("Coupons", description).sections(coupons.iter().map(|c| {
        Section::labelled(
            format!("**`{}`**", or_placeholder(c.code.as_ref())),
            &[
                ("ID", or_placeholder(c.id.as_ref())),
                ("Discount", discount_text(c)),
                ("Type", or_placeholder(c.kind.as_deref().map(capitalize))),
                ("Global", global_text(c)),
            ],
        )
    }))
}

pub fn coupon_created_document(coupon: &Coupon) -> DisplayDocument {
    let code = |v: Option<String>| or_placeholder(v.map(|s| format!("`{s}`")));

    DisplayDocument::new("🎟️ Coupon Created Successfully!", "")
        .section(Section::inline("Coupon Code", code(coupon.code.clone())))
        .section(Section::inline("Global", global_text(coupon)))
        .section(Section::inline("Discount", discount_text(coupon)))
        .section(Section::inline(
            "Type",
            or_placeholder(coupon.kind.as_deref().map(capitalize)),
        ))
        .section(Section::inline(
            "Shop ID",
            code(coupon.shop_id.as_ref().map(|s| s.to_string())),
        ))
        .section(Section::inline("Salt", code(coupon.salt.clone())))
        .section(Section::block(
            "Created At",
            discord_timestamp(coupon.created_at.as_deref()),
        ))
        .section(Section::block(
            "Updated At",
            discord_timestamp(coupon.updated_at.as_deref()),
        ))
        .section(Section::block(
            "Coupon ID",
            code(coupon.id.as_ref().map(|s| s.to_string())),
        ))
        .footer("Coupon Creation")
}

/// Percentage coupons read `10%`, fixed ones `10 USD`.
fn discount_text(coupon: &Coupon) -> String {
    let Some(discount) = &coupon.discount else {
        return or_placeholder(None::<String>);
    };
    match coupon.kind.as_deref() {
        Some(kind) if kind.eq_ignore_ascii_case("percentage") => format!("{discount}%"),
        _ => format!("{discount} USD"),
    }
}

fn global_text(coupon: &Coupon) -> String {
    yes_no(coupon.global.as_ref().is_some_and(|g| g.is_truthy())).to_string()
}

pub fn coupon_deleted_document(coupon_id: &str) -> DisplayDocument {
    DisplayDocument::new(
        "Coupon Deleted",
        format!("Successfully deleted coupon with ID: **{coupon_id}**."),
    )
}

pub fn product_deleted_document(product_id: &str) -> DisplayDocument {
    DisplayDocument::new(
        "Product Deleted",
        format!("Successfully deleted product with ID: **{product_id}**."),
    )
}

pub fn price_updated_document(product_id: &str, update: &PriceUpdate) -> DisplayDocument {
    let currency = update.currency.as_deref().unwrap_or("USD");
    DisplayDocument::new(
        "Product Price Updated",
        format!("Successfully updated the price of product **{product_id}**."),
    )
    .section(Section::inline("Name", or_placeholder(update.name.as_ref())))
    .section(Section::inline(
        "New Price",
        format!("{} {currency}", update.price),
    ))
}

pub fn balances_document(balances: &PayoutBalances) -> DisplayDocument {
    DisplayDocument::new("Account Balances", "")
        .section(coin_section("Bitcoin (BTC)", "BTC", balances.btc.as_ref()))
        .section(coin_section("Litecoin (LTC)", "LTC", balances.ltc.as_ref()))
}

fn coin_section(name: &str, ticker: &str, balance: Option<&CoinBalance>) -> Section {
    let amount = or_placeholder(balance.and_then(|b| b.amount.as_ref()));
    let usd = balance
        .and_then(|b| b.usd.as_ref())
        .map(|u| format!("${u}"));
    Section::inline(
        name,
        format!(
            "**{ticker} Amount:** {amount}\n**USD Equivalent:** {}",
            or_placeholder(usd)
        ),
    )
}

/// Listing of one products page. Products with variants list one entry per
/// variant, others one entry for the product itself.
pub fn product_page_document(page: &ProductPage, requested_page: u32) -> DisplayDocument {
    let products = page.data.as_deref().unwrap_or(&[]);
    let description = if products.is_empty() {
        "No products found on this page."
    } else {
        "Here are the products:"
    };

    let mut doc = DisplayDocument::new(format!("Products - Page {requested_page}"), description);

    for product in products {
        let product_name = or_placeholder(product.name.as_ref());
        match product.variants.as_deref() {
            Some(variants) if !variants.is_empty() => {
                for v in variants {
                    doc.push(Section::block(
                        format!(
                            "{product_name} - Purchase Length: {}",
                            or_placeholder(v.purchase_length.as_ref())
                        ),
                        listing_value(
                            v.price.as_ref().map(|p| p.to_string()),
                            v.currency.as_deref(),
                            v.id.as_ref().map(|i| i.to_string()),
                        ),
                    ));
                }
            }
            _ => doc.push(Section::block(
                product_name,
                listing_value(
                    product.price.as_ref().map(|p| p.to_string()),
                    product.currency.as_deref(),
                    product.id.as_ref().map(|i| i.to_string()),
                ),
            )),
        }
    }

    if let (Some(current), Some(last)) = (page.current_page, page.last_page) {
        doc = doc.footer(format!("Page {current} of {last}"));
    }
    doc
}

fn listing_value(price: Option<String>, currency: Option<&str>, id: Option<String>) -> String {
    format!(
        "Price: {} {}\nID: {}",
        price.unwrap_or_else(|| "Price not available".to_string()),
        currency.unwrap_or("USD"),
        or_placeholder(id)
    )
}

pub fn role_claimed_document(role_name: &str) -> DisplayDocument {
    DisplayDocument::new(
        "Role Claimed",
        format!("You Have Successfully Claimed The {role_name} Role"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::PLACEHOLDER;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(v: serde_json::Value) -> T {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn group_without_fields_renders_placeholders() {
        let doc = group_document(&Group::default());
        let values: Vec<&str> = doc.sections.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec![PLACEHOLDER, PLACEHOLDER, "0", PLACEHOLDER]);
    }

    #[test]
    fn group_counts_embedded_products() {
        let g: Group = parse(json!({"id": 3, "name": "Keys", "products": [{}, {}], "products_count": 9}));
        let doc = group_document(&g);
        assert_eq!(doc.sections[2].value, "2");
        assert_eq!(doc.description, "Here are the details for group ID: **3**");
    }

    #[test]
    fn groups_listing_one_section_per_group() {
        let groups: Vec<Group> = parse(json!([
            {"id": 1, "name": "A", "products_count": 4, "created_at": "2024-01-01T00:00:00Z"},
            {"id": 2}
        ]));
        let doc = groups_document(&groups);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].name, "**`A`**");
        assert_eq!(
            doc.sections[0].value,
            "**ID:** 1\n**Product Count:** 4\n**Created At:** 2024-01-01 00:00:00 UTC"
        );
        assert_eq!(doc.sections[1].name, "**`N/A`**");
    }

    #[test]
    fn coupon_listing_and_creation() {
        let c: Coupon = parse(json!({
            "id": 11, "code": "SAVE10", "discount": 10, "type": "percentage", "global": true,
            "shop_id": 42, "salt": "abc", "created_at": "1970-01-01T00:00:10Z"
        }));
        let list = coupons_document(std::slice::from_ref(&c));
        assert_eq!(
            list.sections[0].value,
            "**ID:** 11\n**Discount:** 10%\n**Type:** Percentage\n**Global:** Yes"
        );

        let created = coupon_created_document(&c);
        assert_eq!(created.sections.len(), 9);
        assert_eq!(created.sections[0].value, "`SAVE10`");
        assert_eq!(created.sections[6].value, "<t:10:F>");
        assert_eq!(created.sections[7].value, PLACEHOLDER);
        assert_eq!(created.footer.as_deref(), Some("Coupon Creation"));
    }

    #[test]
    fn fixed_coupon_discount_in_usd() {
        let c: Coupon = parse(json!({"discount": "5", "type": "fixed"}));
        assert_eq!(discount_text(&c), "5 USD");
        assert_eq!(global_text(&c), "No");
    }

    #[test]
    fn balances_render_both_coins() {
        let b: PayoutBalances = parse(json!({"btc": {"btc": "0.1", "usd": "6000"}}));
        let doc = balances_document(&b);
        assert_eq!(
            doc.sections[0].value,
            "**BTC Amount:** 0.1\n**USD Equivalent:** $6000"
        );
        assert_eq!(
            doc.sections[1].value,
            "**LTC Amount:** N/A\n**USD Equivalent:** N/A"
        );
    }

    #[test]
    fn product_page_expands_variants() {
        let page: ProductPage = parse(json!({
            "data": [
                {"id": 1, "name": "Plain", "price": "2.00"},
                {"id": 2, "name": "Sub", "variants": [
                    {"id": 21, "price": 5, "purchase_length": "30 days"},
                    {"id": 22, "currency": "EUR"}
                ]}
            ],
            "current_page": 2,
            "last_page": 4
        }));
        let doc = product_page_document(&page, 2);
        assert_eq!(doc.title, "Products - Page 2");
        assert_eq!(doc.sections.len(), 3);
        assert_eq!(doc.sections[0].value, "Price: 2.00 USD\nID: 1");
        assert_eq!(doc.sections[1].name, "Sub - Purchase Length: 30 days");
        assert_eq!(doc.sections[1].value, "Price: 5 USD\nID: 21");
        assert_eq!(doc.sections[2].value, "Price: Price not available EUR\nID: 22");
        assert_eq!(doc.footer.as_deref(), Some("Page 2 of 4"));
    }
}
