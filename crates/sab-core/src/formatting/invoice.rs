use crate::api::Invoice;

use super::{capitalize, format_timestamp, or_placeholder, DisplayDocument, Section};

pub fn invoice_document(invoice: &Invoice) -> DisplayDocument {
    let f = |key: &str| or_placeholder(invoice.field(key));
    let ts = |key: &str| format_timestamp(invoice.field(key).as_deref());
    let amount_in =
        |key: &str, unit: &str| or_placeholder(invoice.field(key).map(|v| format!("{v} {unit}")));

    let price = match (invoice.field("price"), invoice.field("currency")) {
        (Some(p), Some(c)) => format!("{p} {c}"),
        (p, _) => or_placeholder(p),
    };

    DisplayDocument::new(
        "Invoice Details",
        format!("Details for invoice **{}**", f("id")),
    )
    .section(Section::labelled(
        "Invoice Information",
        &[
            ("Invoice ID", f("id")),
            ("Coupon ID", f("coupon_id")),
            ("PayPal Email", f("paypalff_email")),
            ("Customer ID", f("customer_id")),
            ("Email", f("email")),
        ],
    ))
    .section(Section::labelled(
        "Pricing Details",
        &[
            ("Price", price),
            ("Amount", f("amount")),
            ("Price (USD)", amount_in("price_usd", "USD")),
            ("Price (EUR)", amount_in("price_eur", "EUR")),
        ],
    ))
    .section(Section::labelled(
        "Transaction Status",
        &[
            ("Status", or_placeholder(invoice.field("status").map(|s| capitalize(&s)))),
            ("Payment Gateway", f("gateway")),
            ("Created At", ts("created_at")),
            ("Updated At", ts("updated_at")),
            ("Completed At", ts("completed_at")),
        ],
    ))
    .section(Section::labelled(
        "Security & User Info",
        &[
            ("Salt", f("salt")),
            ("IP Address", f("ip")),
            ("User Agent", f("user_agent")),
            ("Discord User ID", f("discord_user_id")),
        ],
    ))
    .section(Section::labelled(
        "Payment & Delivery",
        &[
            ("Transaction ID", f("paypalff_transaction_id")),
            ("Delivered", f("delivered")),
            ("CashApp Email", f("cashapp_email")),
            ("CashApp Cashtag", f("cashapp_cashtag")),
            ("Venmo Tag", f("venmo_tag")),
        ],
    ))
    .section(Section::labelled(
        "Product Details",
        &[
            ("Product ID", f("product_id")),
            ("Product Name", f("product.name")),
            ("Variant ID", f("variant_id")),
            ("Variant Name", f("variant.name")),
            ("Stock Count", f("product.stock_count")),
        ],
    ))
    .section(Section::labelled(
        "Additional Info",
        &[
            ("Unique ID", f("unique_id")),
            ("Archived", f("archived")),
            ("Manual", f("manual")),
            ("Custom Fields", f("custom_fields")),
        ],
    ))
    .section(Section::labelled(
        "Crypto Info",
        &[
            ("Crypto Address", f("crypto_address")),
            ("Crypto Amount", f("crypto_amount")),
        ],
    ))
    .section(Section::labelled(
        "Other Transactions",
        &[
            ("PayPal Note", f("paypalff_note")),
            ("PayPal Currency", f("paypalff_currency")),
            ("Stripe PI ID", f("stripe_pi_id")),
            ("Mollie Transaction ID", f("mollie_transaction_id")),
            ("Skrill Transaction ID", f("skrill_transaction_id")),
        ],
    ))
}
