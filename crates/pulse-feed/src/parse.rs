//! RSS 2.0 parsing.
//!
//! Produces [`RawEntry`] values with every field optional; normalization and
//! date filtering happen in [`crate::window`].

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use scraper::Html;

use crate::error::FeedError;

/// One `<item>` as found in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub guid: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    /// `content:encoded` if present, otherwise `description`. Still HTML.
    pub body: Option<String>,
}

#[derive(Default)]
struct EntryBuilder {
    guid: String,
    title: String,
    link: String,
    pub_date: String,
    dc_date: String,
    description: String,
    encoded: String,
}

impl EntryBuilder {
    fn field_mut(&mut self, element: &str) -> Option<&mut String> {
        match element {
            "guid" => Some(&mut self.guid),
            "title" => Some(&mut self.title),
            "link" => Some(&mut self.link),
            "pubDate" => Some(&mut self.pub_date),
            "dc:date" => Some(&mut self.dc_date),
            "description" => Some(&mut self.description),
            "content:encoded" => Some(&mut self.encoded),
            _ => None,
        }
    }

    fn build(self) -> RawEntry {
        let non_empty = |s: String| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        RawEntry {
            guid: non_empty(self.guid),
            title: non_empty(self.title),
            link: non_empty(self.link),
            published: non_empty(self.pub_date).or_else(|| non_empty(self.dc_date)),
            body: non_empty(self.encoded).or_else(|| non_empty(self.description)),
        }
    }
}

/// Parse an RSS document into raw entries, in document order.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] on malformed XML or when the document has no
/// `<rss>`/`<channel>` root (relays sometimes answer with an HTML error page).
pub fn parse_feed(xml: &[u8]) -> Result<Vec<RawEntry>, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut saw_channel = false;
    let mut current: Option<EntryBuilder> = None;
    let mut element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "rss" | "channel" | "rdf:RDF" => saw_channel = true,
                    "item" => current = Some(EntryBuilder::default()),
                    _ => {}
                }
                element = name;
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item"
                    && let Some(builder) = current.take()
                {
                    entries.push(builder.build());
                }
                element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(field) = current.as_mut().and_then(|b| b.field_mut(&element)) {
                    // Undeclared entities (`&nbsp;` in raw XML) keep their literal text.
                    match e.unescape() {
                        Ok(text) => field.push_str(&text),
                        Err(_) => field.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(field) = current.as_mut().and_then(|b| b.field_mut(&element)) {
                    field.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(format!("XML parse error: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    if !saw_channel {
        return Err(FeedError::Parse("document is not an RSS feed".into()));
    }
    Ok(entries)
}

/// Reduce an HTML fragment to plain text: markup dropped, entities decoded,
/// whitespace collapsed.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
