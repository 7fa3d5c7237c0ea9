//! feed-rs based parser producing domain feeds

use feed_rs::model::{self, Link};
use feed_rs::parser;
use rfeed_domain::{Enclosure, EntryImage, Feed, FeedImage, FeedSourceError, RawEntry};

/// Parse RSS or Atom bytes into a domain [`Feed`]
pub fn parse_feed(bytes: &[u8]) -> Result<Feed, FeedSourceError> {
    let feed = parser::parse(bytes).map_err(|e| FeedSourceError::Parse(e.to_string()))?;

    let link = select_link(&feed.links).unwrap_or_default();
    let image = feed.logo.or(feed.icon).map(|image| FeedImage {
        title: image.title.unwrap_or_default(),
        link: image.link.map(|l| l.href).unwrap_or_default(),
        url: image.uri,
    });

    Ok(Feed {
        link,
        title: feed.title.map(|t| t.content),
        image,
        entries: feed.entries.into_iter().map(convert_entry).collect(),
    })
}

fn convert_entry(entry: model::Entry) -> RawEntry {
    let link = select_link(&entry.links).unwrap_or_else(|| {
        let id = entry.id.trim();
        if id.starts_with("http://") || id.starts_with("https://") {
            id.to_string()
        } else {
            String::new()
        }
    });

    let description = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .unwrap_or_default();

    let image = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| &t.image)
        .find(|i| !i.uri.trim().is_empty())
        .map(|i| EntryImage {
            url: i.uri.clone(),
            title: i.title.clone(),
        });

    let enclosures = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter_map(|c| {
            let url = c.url.as_ref()?;
            Some(Enclosure {
                url: url.to_string(),
                mime_type: c.content_type.as_ref().map(|m| m.to_string()),
            })
        })
        .collect();

    RawEntry {
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        description,
        link,
        categories: entry.categories.into_iter().map(|c| c.term).collect(),
        image,
        enclosures,
    }
}

/// Prefer an `alternate` (or rel-less) link, else the first non-empty one
fn select_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| {
            !l.href.trim().is_empty()
                && l.rel
                    .as_deref()
                    .is_none_or(|rel| rel.is_empty() || rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| links.iter().find(|l| !l.href.trim().is_empty()))
        .map(|l| l.href.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::SAMPLE_RSS as RSS_XML;
    use rfeed_domain::{Item, TagSet, find_items};

    #[test]
    fn test_parse_channel_metadata() {
        let feed = parse_feed(RSS_XML.as_bytes()).unwrap();

        assert_eq!(feed.link, "https://example.com/");
        assert_eq!(feed.title.as_deref(), Some("Title"));
        let image = feed.image.expect("channel image");
        assert_eq!(image.title, "Image Title");
        assert_eq!(image.url, "https://example.com/icon.png");
    }

    #[test]
    fn test_parse_entries_and_categories() {
        let feed = parse_feed(RSS_XML.as_bytes()).unwrap();

        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].title, "Item Title 1");
        assert_eq!(feed.entries[0].link, "https://example1.com/");
        assert_eq!(feed.entries[0].description, "Item description 1");
        assert_eq!(feed.entries[0].categories, vec!["Test1", "Test2"]);
        assert_eq!(feed.entries[1].categories, vec!["Test1", "Test3"]);
        assert!(feed.entries[0].image.is_none());
    }

    #[test]
    fn test_parsed_feed_through_core() {
        let feed = parse_feed(RSS_XML.as_bytes()).unwrap();

        let wanted: TagSet = ["Test2"].into_iter().collect();
        let entries = find_items(&feed, &wanted);
        assert_eq!(entries.len(), 1);

        let item = Item::new(&feed, entries[0]);
        assert_eq!(item.title, "Item Title 1");
        assert_eq!(item.author.title, "Image Title");
        assert_eq!(item.author.image, "https://example.com/icon.png");
        assert_eq!(item.author.link, "https://example.com/");
        assert_eq!(item.image, "");
    }

    #[test]
    fn test_markup_in_cdata_title_is_sanitized() {
        let xml = RSS_XML.replace(
            "<title>Item Title 1</title>",
            "<title><![CDATA[<b>Item Title 1</b>]]></title>",
        );
        let feed = parse_feed(xml.as_bytes()).unwrap();
        let item = Item::new(&feed, &feed.entries[0]);
        assert_eq!(item.title, "Item Title 1");
    }

    #[test]
    fn test_image_enclosure_becomes_item_image() {
        let xml = RSS_XML.replace(
            "<description>Item description 2</description>",
            "<description>Item description 2</description>\
             <enclosure url=\"https://example2.com/cover.png\" length=\"10\" type=\"image/png\"/>",
        );
        let feed = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(feed.entries[1].enclosures.len(), 1);
        let item = Item::new(&feed, &feed.entries[1]);
        assert_eq!(item.image, "https://example2.com/cover.png");
    }

    #[test]
    fn test_parse_atom_feed() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Title</title>
  <link href="https://atom.example.com/" rel="alternate"/>
  <link href="https://atom.example.com/feed.xml" rel="self"/>
  <icon>https://atom.example.com/favicon.ico</icon>
  <id>urn:uuid:60a76c80-d399-11d9-b91C-0003939e0af6</id>
  <updated>2024-01-15T12:00:00Z</updated>
  <entry>
    <title>Atom Entry</title>
    <link href="https://atom.example.com/entry"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2024-01-15T12:00:00Z</updated>
    <summary>Atom summary</summary>
    <category term="rust"/>
  </entry>
</feed>"#;

        let feed = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(feed.link, "https://atom.example.com/");
        assert_eq!(
            feed.image.map(|i| i.url).as_deref(),
            Some("https://atom.example.com/favicon.ico")
        );
        assert_eq!(feed.entries[0].link, "https://atom.example.com/entry");
        assert_eq!(feed.entries[0].description, "Atom summary");
        assert_eq!(feed.entries[0].categories, vec!["rust"]);
    }

    #[test]
    fn test_parse_error() {
        let result = parse_feed(b"this is not a feed");
        assert!(matches!(result, Err(FeedSourceError::Parse(_))));
    }
}
