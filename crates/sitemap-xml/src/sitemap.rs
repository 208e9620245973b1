//! The `<urlset>` document.

use crate::parser::read_document;
use crate::schema::{Layout, NEWS_NS, SITEMAP_NS, XHTML_NS};
use crate::writer::write_document;
use crate::{ReadFrom, StreamError, Url, WriteTo};
use std::io::{Read, Write};

/// A complete sitemap: an ordered list of [`Url`] entries.
///
/// Entries are written in the order they were added. The `xhtml` and
/// `news` extensions are off by default; while an extension is off, its
/// per-entry data is not written.
///
/// ```rust
/// use sitemap_xml::{ChangeFreq, Sitemap, Url};
///
/// let mut sitemap = Sitemap::new().with_minify();
/// sitemap.add(Url::new("http://example.com/").with_changefreq(ChangeFreq::Daily));
///
/// let mut out = Vec::new();
/// let bytes = sitemap.write_to(&mut out).unwrap();
/// assert_eq!(bytes, out.len() as u64);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sitemap {
    urls: Vec<Url>,
    xhtml: bool,
    news: bool,
    minify: bool,
}

impl Sitemap {
    /// An empty sitemap in the sitemaps.org namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `xmlns:xhtml` and write alternate-language links.
    pub fn with_xhtml(mut self) -> Self {
        self.xhtml = true;
        self
    }

    /// Declare `xmlns:news` and write Google News blocks.
    pub fn with_news(mut self) -> Self {
        self.news = true;
        self
    }

    /// Write everything on one line, without indentation.
    pub fn with_minify(mut self) -> Self {
        self.minify = true;
        self
    }

    pub fn set_minify(&mut self, minify: bool) -> &mut Self {
        self.minify = minify;
        self
    }

    /// Append an entry. No validation or deduplication takes place.
    pub fn add(&mut self, url: Url) {
        self.urls.push(url);
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    pub fn into_urls(self) -> Vec<Url> {
        self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn xmlns(&self) -> &'static str {
        SITEMAP_NS
    }

    pub fn has_xhtml(&self) -> bool {
        self.xhtml
    }

    pub fn has_news(&self) -> bool {
        self.news
    }

    pub fn is_minified(&self) -> bool {
        self.minify
    }

    /// Write the XML declaration, the `<urlset>` document and a trailing
    /// newline to `w`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, w: W) -> Result<u64, StreamError> {
        write_document(
            w,
            Layout::urlset(self.xhtml, self.news),
            &self.urls,
            self.minify,
        )
    }

    /// Parse a `<urlset>` document from `r`, appending its entries.
    ///
    /// Alternate links and news blocks are read back, and a root that
    /// declares the XHTML or News namespace enables that extension. Returns
    /// the number of bytes the decoder consumed.
    pub fn read_from<R: Read>(&mut self, r: R) -> Result<u64, StreamError> {
        let decoded = read_document(r, Layout::urlset(true, true), &mut self.urls)?;
        self.xhtml |= decoded.root.declares(XHTML_NS);
        self.news |= decoded.root.declares(NEWS_NS);
        Ok(decoded.bytes)
    }
}

impl WriteTo for Sitemap {
    fn write_to<W: Write>(&self, w: W) -> Result<u64, StreamError> {
        Sitemap::write_to(self, w)
    }
}

impl ReadFrom for Sitemap {
    fn read_from<R: Read>(&mut self, r: R) -> Result<u64, StreamError> {
        Sitemap::read_from(self, r)
    }
}

impl Extend<Url> for Sitemap {
    fn extend<I: IntoIterator<Item = Url>>(&mut self, iter: I) {
        self.urls.extend(iter);
    }
}

impl FromIterator<Url> for Sitemap {
    fn from_iter<I: IntoIterator<Item = Url>>(iter: I) -> Self {
        let mut sitemap = Sitemap::new();
        sitemap.extend(iter);
        sitemap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChangeFreq, News, Publication, XhtmlLink};
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn epoch() -> chrono::DateTime<chrono::FixedOffset> {
        DateTime::from_timestamp(0, 0).unwrap().fixed_offset()
    }

    fn render(sitemap: &Sitemap) -> String {
        let mut out = Vec::new();
        sitemap.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_new_is_empty() {
        let sitemap = Sitemap::new();
        assert!(sitemap.is_empty());
        assert_eq!(sitemap.xmlns(), "http://www.sitemaps.org/schemas/sitemap/0.9");
        assert!(!sitemap.has_xhtml());
        assert!(!sitemap.has_news());
        assert!(!sitemap.is_minified());
    }

    #[test]
    fn test_toggles_chain() {
        let mut sitemap = Sitemap::new().with_xhtml().with_news().with_minify();
        assert!(sitemap.has_xhtml());
        assert!(sitemap.has_news());
        assert!(sitemap.is_minified());

        sitemap.set_minify(false).add(Url::new("http://a/"));
        assert!(!sitemap.is_minified());
        assert_eq!(sitemap.len(), 1);
    }

    #[test]
    fn test_add_keeps_order_and_duplicates() {
        let mut sitemap = Sitemap::new();
        sitemap.add(Url::new("http://b/"));
        sitemap.add(Url::new("http://a/"));
        sitemap.add(Url::new("http://b/"));

        let locs: Vec<&str> = sitemap.urls().iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(locs, vec!["http://b/", "http://a/", "http://b/"]);
    }

    #[test]
    fn test_write_single_entry_pretty() {
        let mut sitemap = Sitemap::new();
        sitemap.add(
            Url::new("http://example.com/")
                .with_lastmod(epoch())
                .with_changefreq(ChangeFreq::Daily),
        );

        assert_eq!(
            render(&sitemap),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>http://example.com/</loc>
    <lastmod>1970-01-01T00:00:00Z</lastmod>
    <changefreq>daily</changefreq>
  </url>
</urlset>
"#
        );
    }

    #[test]
    fn test_write_extensions_pretty() {
        let mut sitemap = Sitemap::new().with_xhtml().with_news();
        sitemap.add(
            Url::new("http://example.com/en/")
                .with_priority(0.5)
                .with_xhtml_link(XhtmlLink::alternate("de", "http://example.com/de/"))
                .with_news(
                    News::new(Publication::new("The Example Times", "en"), "Launch", epoch())
                        .with_keywords("launch, rocket"),
                ),
        );

        insta::assert_snapshot!(render(&sitemap), @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml" xmlns:news="http://www.google.com/schemas/sitemap-news/0.9">
          <url>
            <loc>http://example.com/en/</loc>
            <priority>0.5</priority>
            <xhtml:link rel="alternate" hreflang="de" href="http://example.com/de/"/>
            <news:news>
              <news:publication>
                <news:name>The Example Times</news:name>
                <news:language>en</news:language>
              </news:publication>
              <news:publication_date>1970-01-01T00:00:00Z</news:publication_date>
              <news:title>Launch</news:title>
              <news:keywords>launch, rocket</news:keywords>
            </news:news>
          </url>
        </urlset>
        "#);
    }

    #[test]
    fn test_extensions_round_trip() {
        let mut original = Sitemap::new().with_xhtml().with_news();
        original.add(
            Url::new("http://example.com/en/")
                .with_xhtml_link(XhtmlLink::alternate("de", "http://example.com/de/"))
                .with_xhtml_link(XhtmlLink::alternate("fr", "http://example.com/fr/"))
                .with_news(
                    News::new(Publication::new("The Example Times", "en"), "Launch", epoch())
                        .with_genres("PressRelease, Blog")
                        .with_stock_tickers("NASDAQ:EXMP"),
                ),
        );

        let mut out = Vec::new();
        original.write_to(&mut out).unwrap();

        let mut decoded = Sitemap::new();
        decoded.read_from(out.as_slice()).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_read_appends_to_existing_entries() {
        let mut source = Sitemap::new();
        source.add(Url::new("http://b/"));
        let mut out = Vec::new();
        source.write_to(&mut out).unwrap();

        let mut sitemap = Sitemap::new();
        sitemap.add(Url::new("http://a/"));
        sitemap.read_from(out.as_slice()).unwrap();

        assert_eq!(
            sitemap.urls(),
            &[Url::new("http://a/"), Url::new("http://b/")]
        );
    }

    #[test]
    fn test_read_reports_consumed_offset() {
        let mut source = Sitemap::new();
        source.add(Url::new("http://a/"));
        let mut out = Vec::new();
        let written = source.write_to(&mut out).unwrap();

        let mut sitemap = Sitemap::new();
        let read = sitemap.read_from(out.as_slice()).unwrap();

        // The decoder stops at the end of the root element, before the
        // trailing newline.
        assert_eq!(read, written - 1);
    }

    #[test]
    fn test_collect_from_iterator() {
        let sitemap: Sitemap = ["http://a/", "http://b/"].into_iter().map(Url::new).collect();
        assert_eq!(sitemap.len(), 2);
        assert_eq!(sitemap.into_urls()[1].loc, "http://b/");
    }
}
