//! XML encoder shared by both document kinds.

use crate::counting::CountingWriter;
use crate::schema::{self, EntryFields, Layout, XML_HEADER};
use crate::types::{News, Url, XhtmlLink, format_timestamp};
use crate::{Result, StreamError};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Write the declaration, the document and a trailing newline to `sink`.
///
/// Returns the number of bytes the sink accepted. On failure the count in
/// the [`StreamError`] covers exactly the bytes accepted before it.
pub(crate) fn write_document<W: Write>(
    sink: W,
    layout: Layout,
    urls: &[Url],
    minify: bool,
) -> std::result::Result<u64, StreamError> {
    let mut counter = CountingWriter::new(sink);

    if let Err(err) = counter.write_all(XML_HEADER.as_bytes()) {
        return Err(StreamError::new(counter.bytes_written(), err));
    }

    let encoded = {
        // An empty root is written as `<urlset ...></urlset>` in both modes.
        let mut writer = if minify || urls.is_empty() {
            Writer::new(&mut counter)
        } else {
            Writer::new_with_indent(&mut counter, b' ', 2)
        };
        write_root(&mut writer, layout, urls)
    };
    if let Err(err) = encoded {
        return Err(StreamError::new(counter.bytes_written(), err));
    }

    if let Err(err) = counter.write_all(b"\n") {
        return Err(StreamError::new(counter.bytes_written(), err));
    }

    let bytes = counter.bytes_written();
    tracing::debug!(
        root = layout.root,
        entries = urls.len(),
        bytes,
        minify,
        "Wrote sitemap document"
    );
    Ok(bytes)
}

fn write_root<W: Write>(writer: &mut Writer<W>, layout: Layout, urls: &[Url]) -> Result<()> {
    let mut root = BytesStart::new(layout.root);
    for (name, namespace) in layout.namespaces() {
        root.push_attribute((name, namespace));
    }
    writer.write_event(Event::Start(root))?;

    for url in urls {
        write_entry(writer, layout, url)?;
    }

    writer.write_event(Event::End(BytesEnd::new(layout.root)))?;
    Ok(())
}

fn write_entry<W: Write>(writer: &mut Writer<W>, layout: Layout, url: &Url) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(layout.entry)))?;

    write_text_element(writer, schema::LOC, &url.loc)?;
    if let Some(lastmod) = &url.lastmod {
        write_text_element(writer, schema::LASTMOD, &format_timestamp(lastmod))?;
    }

    match layout.fields {
        EntryFields::Index => {
            if url.changefreq.is_some()
                || url.priority.is_some()
                || !url.xhtml_links.is_empty()
                || url.news.is_some()
            {
                tracing::trace!(loc = %url.loc, "Sitemap index entry: dropping fields other than loc and lastmod");
            }
        }
        EntryFields::Full { xhtml, news } => {
            if let Some(changefreq) = &url.changefreq {
                write_text_element(writer, schema::CHANGEFREQ, changefreq.as_str())?;
            }
            if let Some(priority) = url.priority {
                write_text_element(writer, schema::PRIORITY, &priority.to_string())?;
            }

            if xhtml {
                for link in &url.xhtml_links {
                    write_xhtml_link(writer, link)?;
                }
            } else if !url.xhtml_links.is_empty() {
                tracing::trace!(loc = %url.loc, "XHTML namespace not enabled: dropping alternate links");
            }

            match &url.news {
                Some(block) if news => write_news(writer, block)?,
                Some(_) => {
                    tracing::trace!(loc = %url.loc, "News namespace not enabled: dropping news block");
                }
                None => {}
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new(layout.entry)))?;
    Ok(())
}

fn write_xhtml_link<W: Write>(writer: &mut Writer<W>, link: &XhtmlLink) -> Result<()> {
    let mut element = BytesStart::new(schema::XHTML_LINK);
    element.push_attribute(("rel", link.rel.as_str()));
    element.push_attribute(("hreflang", link.hreflang.as_str()));
    element.push_attribute(("href", link.href.as_str()));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

fn write_news<W: Write>(writer: &mut Writer<W>, news: &News) -> Result<()> {
    let news_tag = schema::news_tag(schema::NEWS);
    let publication_tag = schema::news_tag(schema::PUBLICATION);

    writer.write_event(Event::Start(BytesStart::new(news_tag.as_str())))?;

    writer.write_event(Event::Start(BytesStart::new(publication_tag.as_str())))?;
    write_text_element(writer, &schema::news_tag(schema::NAME), &news.publication.name)?;
    write_text_element(
        writer,
        &schema::news_tag(schema::LANGUAGE),
        &news.publication.language,
    )?;
    writer.write_event(Event::End(BytesEnd::new(publication_tag.as_str())))?;

    write_text_element(
        writer,
        &schema::news_tag(schema::PUBLICATION_DATE),
        &format_timestamp(&news.publication_date),
    )?;
    write_text_element(writer, &schema::news_tag(schema::TITLE), &news.title)?;

    for (name, value) in [
        (schema::GENRES, &news.genres),
        (schema::KEYWORDS, &news.keywords),
        (schema::STOCK_TICKERS, &news.stock_tickers),
    ] {
        if let Some(value) = value {
            write_text_element(writer, &schema::news_tag(name), value)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(news_tag.as_str())))?;
    Ok(())
}

/// Write `<name>text</name>` with `text` escaped.
fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn render(layout: Layout, urls: &[Url], minify: bool) -> String {
        let mut out = Vec::new();
        let bytes = write_document(&mut out, layout, urls, minify).unwrap();
        assert_eq!(bytes, out.len() as u64);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_minified_empty_urlset() {
        let out = render(Layout::urlset(false, false), &[], true);
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"></urlset>\n"
        );
    }

    #[test]
    fn test_empty_root_has_no_line_break_when_pretty() {
        assert_eq!(
            render(Layout::urlset(true, false), &[], false),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" xmlns:xhtml=\"http://www.w3.org/1999/xhtml\"></urlset>\n"
        );
        assert_eq!(
            render(Layout::index(), &[], false),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"></sitemapindex>\n"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let urls = [Url::new("http://example.com/?a=1&b=<2>")];
        let out = render(Layout::urlset(false, false), &urls, true);
        assert!(out.contains("<loc>http://example.com/?a=1&amp;b=&lt;2&gt;</loc>"));
    }

    #[test]
    fn test_priority_zero_is_written() {
        let urls = [Url::new("http://example.com/").with_priority(0.0)];
        let out = render(Layout::urlset(false, false), &urls, true);
        assert!(out.contains("<priority>0</priority>"));

        let urls = [Url::new("http://example.com/").with_priority(0.5)];
        let out = render(Layout::urlset(false, false), &urls, true);
        assert!(out.contains("<priority>0.5</priority>"));
    }

    #[test]
    fn test_extensions_need_their_namespace() {
        let published = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z").unwrap();
        let urls = [Url::new("http://example.com/")
            .with_xhtml_link(XhtmlLink::alternate("de", "http://example.com/de/"))
            .with_news(News::new(
                crate::Publication::new("Example Times", "en"),
                "Headline",
                published,
            ))];

        let out = render(Layout::urlset(false, false), &urls, true);
        assert!(!out.contains("xhtml:link"));
        assert!(!out.contains("news:news"));

        let out = render(Layout::urlset(true, false), &urls, true);
        assert!(out.contains(
            r#"<xhtml:link rel="alternate" hreflang="de" href="http://example.com/de/"/>"#
        ));
        assert!(!out.contains("news:news"));

        let out = render(Layout::urlset(false, true), &urls, true);
        assert!(!out.contains("xhtml:link"));
        assert!(out.contains("<news:title>Headline</news:title>"));
    }

    #[test]
    fn test_index_entries_keep_only_loc_and_lastmod() {
        let urls = [Url::new("http://example.com/sitemap-1.xml")
            .with_changefreq(crate::ChangeFreq::Daily)
            .with_priority(1.0)];
        let out = render(Layout::index(), &urls, true);
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\
             <sitemap><loc>http://example.com/sitemap-1.xml</loc></sitemap>\
             </sitemapindex>\n"
        );
    }
}
