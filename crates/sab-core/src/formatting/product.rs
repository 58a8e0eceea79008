use crate::api::{Product, Scalar, Variant};

use super::{capitalize, join_values, or_placeholder, DisplayDocument, Section, PLACEHOLDER};

const DEFAULT_CURRENCY: &str = "USD";

pub fn product_document(product: &Product) -> DisplayDocument {
    let currency = product.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);

    let mut doc = DisplayDocument::new(
        format!("Product Details for ID: {}", or_placeholder(product.id.as_ref())),
        "Here are the details for the product:",
    )
    .section(Section::inline("Name", or_placeholder(product.name.as_ref())))
    .section(Section::inline(
        "Price",
        or_placeholder(product.price.as_ref().map(|p| format!("{p} {currency}"))),
    ))
    .section(Section::inline(
        "Stock Count",
        or_placeholder(product.stock_count.as_ref()),
    ))
    .section(Section::inline(
        "Visibility",
        visibility_label(product.visibility.as_ref()),
    ))
    .section(Section::block(
        "Deliverables",
        join_values(product.deliverables.as_deref(), "\n")
            .unwrap_or_else(|| "No deliverables available.".to_string()),
    ));

    match product.variants.as_deref() {
        Some(variants) if !variants.is_empty() => {
            doc.push(Section::block("Variants", "Here are the available variants:"));
            for variant in variants {
                doc.push(variant_section(variant, currency));
            }
        }
        _ => doc.push(Section::block("Variants", "No variants available.")),
    }

    doc
}

fn variant_section(variant: &Variant, currency: &str) -> Section {
    let price = variant
        .price
        .as_ref()
        .map(|p| format!("{p} {currency}"))
        .unwrap_or_else(|| "Price not available".to_string());
    let stock = match &variant.stock {
        Some(Some(s)) => s.to_string(),
        Some(None) => "Out of stock".to_string(),
        None => "Stock not available".to_string(),
    };
    let deliverables = join_values(variant.deliverables.as_deref(), ", ")
        .unwrap_or_else(|| "No deliverables available".to_string());

    Section::inline(
        or_placeholder(variant.name.as_ref()),
        format!("{price} | Stock: {stock} | Deliverables: {deliverables}"),
    )
}

/// Upstream sends either a flag or a named level (`public`, `hidden`, ...).
fn visibility_label(visibility: Option<&Scalar>) -> String {
    match visibility {
        None => PLACEHOLDER.to_string(),
        Some(Scalar::Text(s)) if !matches!(s.trim(), "" | "0" | "1" | "true" | "false") => {
            capitalize(s.trim())
        }
        Some(v) if v.is_truthy() => "Visible".to_string(),
        Some(_) => "Hidden".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(v: serde_json::Value) -> Product {
        serde_json::from_value(v).unwrap()
    }

    fn find<'a>(doc: &'a DisplayDocument, name: &str) -> &'a Section {
        doc.sections.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn empty_product_renders_every_slot() {
        let doc = product_document(&product(json!({})));
        let names: Vec<&str> = doc.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Name", "Price", "Stock Count", "Visibility", "Deliverables", "Variants"]
        );
        for s in &doc.sections[..4] {
            assert_eq!(s.value, PLACEHOLDER);
        }
        assert_eq!(find(&doc, "Deliverables").value, "No deliverables available.");
        assert_eq!(find(&doc, "Variants").value, "No variants available.");
        assert_eq!(doc.title, "Product Details for ID: N/A");
    }

    #[test]
    fn deliverables_use_newline_for_product_and_comma_for_variants() {
        let doc = product_document(&product(json!({
            "id": 5,
            "name": "Bundle",
            "price": "4.50",
            "currency": "EUR",
            "visibility": "public",
            "deliverables": ["key-1", "key-2"],
            "variants": [
                {"name": "Monthly", "price": 3, "stock": null, "deliverables": ["a", "b"]},
                {"name": "Yearly", "stock": 7}
            ]
        })));

        assert_eq!(find(&doc, "Deliverables").value, "key-1\nkey-2");
        assert_eq!(find(&doc, "Price").value, "4.50 EUR");
        assert_eq!(find(&doc, "Visibility").value, "Public");

        let monthly = find(&doc, "Monthly");
        assert!(monthly.inline);
        assert_eq!(
            monthly.value,
            "3 EUR | Stock: Out of stock | Deliverables: a, b"
        );
        assert_eq!(
            find(&doc, "Yearly").value,
            "Price not available | Stock: 7 | Deliverables: No deliverables available"
        );
        assert_eq!(find(&doc, "Variants").value, "Here are the available variants:");
    }

    #[test]
    fn visibility_flags() {
        assert_eq!(visibility_label(Some(&Scalar::Bool(true))), "Visible");
        assert_eq!(visibility_label(Some(&Scalar::Int(0))), "Hidden");
        assert_eq!(visibility_label(Some(&Scalar::Text("hidden".into()))), "Hidden");
        assert_eq!(visibility_label(None), PLACEHOLDER);
    }
}
