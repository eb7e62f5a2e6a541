//! RSS 2.0 document parsing.

use crate::feeds::FeedError;
use crate::models::FeedEntry;
use html_escape::{decode_html_entities, encode_text};
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::borrow::Cow;
use tracing::{debug, instrument};

static NAMED_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("named entity pattern is valid")
});

/// Entities XML itself defines; these are left for the XML reader.
const XML_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    /// `<link>` plus any prefixed variant such as `<atom:link href="..."/>`.
    #[serde(rename = "link", default)]
    links: Vec<Link>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "$text", default)]
    text: Option<String>,
    #[serde(rename = "@href", default)]
    href: Option<String>,
}

impl Item {
    /// First non-empty element text, else the first non-empty `href`.
    fn primary_link(&self) -> String {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        self.links
            .iter()
            .find_map(|l| non_empty(&l.text))
            .or_else(|| self.links.iter().find_map(|l| non_empty(&l.href)))
            .unwrap_or_default()
    }
}

impl From<Item> for FeedEntry {
    fn from(item: Item) -> Self {
        let link = item.primary_link();
        Self {
            title: item.title.unwrap_or_default().trim().to_string(),
            description: item.description.unwrap_or_default().trim().to_string(),
            link,
            published: item.pub_date.unwrap_or_default(),
        }
    }
}

/// Parse an RSS document into feed entries, in feed order.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] when the document is not an RSS `<rss><channel>` tree.
#[instrument(level = "debug", skip_all, fields(bytes = xml.len()))]
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let cleaned = scrub_html_entities(xml);
    let rss: Rss = from_str(&cleaned)?;
    let entries: Vec<FeedEntry> = rss.channel.items.into_iter().map(FeedEntry::from).collect();
    debug!(count = entries.len(), "Parsed RSS items");
    Ok(entries)
}

/// Decode HTML named entities that XML does not define.
///
/// The decoded text is re-escaped so the document stays well-formed, and
/// names HTML does not know either are kept as literal text.
fn scrub_html_entities(xml: &str) -> Cow<'_, str> {
    NAMED_ENTITY.replace_all(xml, |caps: &Captures| {
        let whole = &caps[0];
        if XML_ENTITIES.contains(&&caps[1]) {
            whole.to_string()
        } else {
            encode_text(&decode_html_entities(whole)).into_owned()
        }
    })
}
