//! Render feed items as one text block for the summarizer.

use pulse_core::FeedItem;

const DELIMITER: &str = "\n\n---\n\n";

/// `Post {n} ({M/D/YYYY}):\n{content}` per item, joined by a `---` rule.
///
/// Empty input yields an empty string.
#[must_use]
pub fn format_for_summary(items: &[FeedItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            format!(
                "Post {} ({}):\n{}",
                idx + 1,
                item.published_at.format("%-m/%-d/%Y"),
                item.content
            )
        })
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn item(content: &str, date: &str) -> FeedItem {
        FeedItem {
            id: content.into(),
            title: content.into(),
            content: content.into(),
            published_at: DateTime::parse_from_rfc3339(date)
                .unwrap()
                .with_timezone(&Utc),
            link: String::new(),
        }
    }

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(format_for_summary(&[]), "");
    }

    #[test]
    fn numbers_and_delimits_items() {
        let text = format_for_summary(&[
            item("first", "2025-01-05T10:00:00Z"),
            item("second", "2025-12-25T10:00:00Z"),
        ]);
        assert_eq!(
            text,
            "Post 1 (1/5/2025):\nfirst\n\n---\n\nPost 2 (12/25/2025):\nsecond"
        );
    }
}
