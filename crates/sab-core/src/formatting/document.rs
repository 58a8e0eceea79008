use std::fmt;

use crate::config::DEFAULT_EMBED_COLOR;

/// Rendered for any missing/null/blank value.
pub const PLACEHOLDER: &str = "N/A";

// Discord embed limits.
pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_DESCRIPTION_LEN: usize = 4096;
pub const MAX_NAME_LEN: usize = 256;
pub const MAX_VALUE_LEN: usize = 1024;
pub const MAX_SECTIONS: usize = 25;
pub const MAX_DOCUMENTS_PER_MESSAGE: usize = 10;
pub const MAX_CHARS_PER_MESSAGE: usize = 6000;

/// One named key/value block of a [`DisplayDocument`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Section {
    /// Coerces both parts to text, then hard-truncates (no ellipsis) to the
    /// platform limits. Blank parts become [`PLACEHOLDER`].
    pub fn new(name: impl fmt::Display, value: impl fmt::Display, inline: bool) -> Self {
        Self {
            name: clamp_text(name.to_string(), MAX_NAME_LEN),
            value: clamp_text(value.to_string(), MAX_VALUE_LEN),
            inline,
        }
    }

    pub fn inline(name: impl fmt::Display, value: impl fmt::Display) -> Self {
        Self::new(name, value, true)
    }

    pub fn block(name: impl fmt::Display, value: impl fmt::Display) -> Self {
        Self::new(name, value, false)
    }

    /// A block whose value is `**Label:** value` lines.
    pub fn labelled(name: impl fmt::Display, lines: &[(&str, String)]) -> Self {
        let value = lines
            .iter()
            .map(|(label, value)| format!("**{label}:** {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        Self::block(name, value)
    }

    fn char_len(&self) -> usize {
        self.name.chars().count() + self.value.chars().count()
    }
}

/// Platform-agnostic structured reply (an embed, on Discord).
///
/// The adapter stamps the timestamp when rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayDocument {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub sections: Vec<Section>,
    pub footer: Option<String>,
    /// Sections dropped because the document was full.
    pub omitted: usize,
}

impl DisplayDocument {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: truncate_chars(&title.into(), MAX_TITLE_LEN),
            description: truncate_chars(&description.into(), MAX_DESCRIPTION_LEN),
            color: DEFAULT_EMBED_COLOR,
            sections: Vec::new(),
            footer: None,
            omitted: 0,
        }
    }

    pub fn section(mut self, section: Section) -> Self {
        self.push(section);
        self
    }

    pub fn sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        for s in sections {
            self.push(s);
        }
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    pub fn push(&mut self, section: Section) {
        if self.sections.len() >= MAX_SECTIONS {
            self.omitted += 1;
            return;
        }
        self.sections.push(section);
    }

    /// Footer as rendered, including the omitted-sections note.
    pub fn footer_text(&self) -> Option<String> {
        let note = match self.omitted {
            0 => None,
            1 => Some("1 more entry not shown".to_string()),
            n => Some(format!("{n} more entries not shown")),
        };
        match (&self.footer, note) {
            (Some(f), Some(n)) => Some(format!("{f} • {n}")),
            (Some(f), None) => Some(f.clone()),
            (None, n) => n,
        }
    }

    /// Characters counted against the per-message embed budget.
    pub fn char_len(&self) -> usize {
        self.title.chars().count()
            + self.description.chars().count()
            + self.footer_text().map(|f| f.chars().count()).unwrap_or(0)
            + self.sections.iter().map(Section::char_len).sum::<usize>()
    }
}

/// Group documents into messages that respect the per-message embed count and
/// character budget. Order is preserved; a single oversized document still
/// gets its own message.
pub fn batch_documents(documents: Vec<DisplayDocument>) -> Vec<Vec<DisplayDocument>> {
    let mut out: Vec<Vec<DisplayDocument>> = Vec::new();
    let mut current: Vec<DisplayDocument> = Vec::new();
    let mut chars = 0usize;

    for doc in documents {
        let len = doc.char_len();
        let full = current.len() >= MAX_DOCUMENTS_PER_MESSAGE
            || (!current.is_empty() && chars + len > MAX_CHARS_PER_MESSAGE);
        if full {
            out.push(std::mem::take(&mut current));
            chars = 0;
        }
        chars += len;
        current.push(doc);
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Hard truncation by characters (never splits a code point).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

fn clamp_text(s: String, max: usize) -> String {
    if s.trim().is_empty() {
        return PLACEHOLDER.to_string();
    }
    truncate_chars(&s, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_documents_use_the_configured_default_color() {
        assert_eq!(DisplayDocument::new("t", "d").color, DEFAULT_EMBED_COLOR);
    }

    #[test]
    fn truncates_value_to_exactly_1024_without_marker() {
        let long = "v".repeat(5000);
        let s = Section::block("name", &long);
        assert_eq!(s.value.chars().count(), 1024);
        assert!(s.value.chars().all(|c| c == 'v'));
    }

    #[test]
    fn truncates_name_to_exactly_256() {
        let s = Section::inline("n".repeat(300), "x");
        assert_eq!(s.name.chars().count(), 256);
    }

    #[test]
    fn short_values_are_untouched() {
        let s = Section::inline("Name", 42);
        assert_eq!(s.name, "Name");
        assert_eq!(s.value, "42");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let s = Section::block("x", "é".repeat(2000));
        assert_eq!(s.value.chars().count(), 1024);
    }

    #[test]
    fn blank_parts_render_placeholder() {
        let s = Section::inline("", "  ");
        assert_eq!(s.name, PLACEHOLDER);
        assert_eq!(s.value, PLACEHOLDER);
    }

    #[test]
    fn caps_sections_and_notes_omitted() {
        let doc = DisplayDocument::new("t", "d")
            .footer("Page 1 of 3")
            .sections((0..30).map(|i| Section::inline(i, i)));
        assert_eq!(doc.sections.len(), MAX_SECTIONS);
        assert_eq!(doc.omitted, 5);
        assert_eq!(
            doc.footer_text().as_deref(),
            Some("Page 1 of 3 • 5 more entries not shown")
        );
    }

    #[test]
    fn batches_by_count_and_size() {
        let small: Vec<DisplayDocument> =
            (0..12).map(|i| DisplayDocument::new(format!("{i}"), "")).collect();
        let batches = batch_documents(small);
        assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![10, 2]);

        let big = |t: &str| DisplayDocument::new(t, "d".repeat(4000));
        let batches = batch_documents(vec![big("a"), big("b"), big("c")]);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1][0].title, "b");
    }
}
