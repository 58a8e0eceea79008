//! `DisplayDocument` → serenity embed.

use serenity::{
    builder::{CreateEmbed, CreateEmbedFooter},
    model::Timestamp,
};

use sab_core::formatting::DisplayDocument;

pub fn embed(doc: &DisplayDocument) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(&doc.title)
        .colour(doc.color)
        .timestamp(Timestamp::now());

    // Discord rejects an empty description.
    if !doc.description.trim().is_empty() {
        embed = embed.description(&doc.description);
    }

    for s in &doc.sections {
        embed = embed.field(&s.name, &s.value, s.inline);
    }

    if let Some(footer) = doc.footer_text() {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }
    embed
}

pub fn embeds(docs: &[DisplayDocument]) -> Vec<CreateEmbed> {
    docs.iter().map(embed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sab_core::formatting::Section;
    use serde_json::Value;

    fn json(doc: &DisplayDocument) -> Value {
        serde_json::to_value(embed(doc)).unwrap()
    }

    #[test]
    fn renders_fields_color_and_footer() {
        let mut doc = DisplayDocument::new("Groups", "Here are the available groups:")
            .section(Section::inline("Name", "Keys"))
            .footer("Page 1 of 2");
        doc.color = 0x00ff00;

        let v = json(&doc);
        assert_eq!(v["title"], "Groups");
        assert_eq!(v["description"], "Here are the available groups:");
        assert_eq!(v["color"], 0x00ff00);
        assert_eq!(v["fields"][0]["name"], "Name");
        assert_eq!(v["fields"][0]["value"], "Keys");
        assert_eq!(v["fields"][0]["inline"], true);
        assert_eq!(v["footer"]["text"], "Page 1 of 2");
        assert!(v.get("timestamp").is_some());
    }

    #[test]
    fn empty_description_is_omitted() {
        let v = json(&DisplayDocument::new("Account Balances", ""));
        assert!(v.get("description").map_or(true, Value::is_null));
        assert!(v.get("footer").map_or(true, Value::is_null));
    }
}
