//! The `<sitemapindex>` document.

use crate::parser::read_document;
use crate::schema::{Layout, SITEMAP_NS};
use crate::writer::write_document;
use crate::{ReadFrom, StreamError, Url, WriteTo};
use std::io::{Read, Write};

/// A sitemap index: an ordered list of references to other sitemaps.
///
/// It reuses [`Url`], but each entry is written as `<sitemap>` with only
/// `loc` and `lastmod`. Any other field set on an entry is left out of the
/// output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SitemapIndex {
    urls: Vec<Url>,
    minify: bool,
}

impl SitemapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minify(mut self) -> Self {
        self.minify = true;
        self
    }

    pub fn set_minify(&mut self, minify: bool) -> &mut Self {
        self.minify = minify;
        self
    }

    /// Append a reference to another sitemap.
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

    pub fn is_minified(&self) -> bool {
        self.minify
    }

    /// Write the XML declaration, the `<sitemapindex>` document and a
    /// trailing newline to `w`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, w: W) -> Result<u64, StreamError> {
        write_document(w, Layout::index(), &self.urls, self.minify)
    }

    /// Parse a `<sitemapindex>` document from `r`, appending its entries.
    ///
    /// Every entry field present in the input is decoded, including ones
    /// [`write_to`](Self::write_to) leaves out.
    pub fn read_from<R: Read>(&mut self, r: R) -> Result<u64, StreamError> {
        let decoded = read_document(r, Layout::index(), &mut self.urls)?;
        Ok(decoded.bytes)
    }
}

impl WriteTo for SitemapIndex {
    fn write_to<W: Write>(&self, w: W) -> Result<u64, StreamError> {
        SitemapIndex::write_to(self, w)
    }
}

impl ReadFrom for SitemapIndex {
    fn read_from<R: Read>(&mut self, r: R) -> Result<u64, StreamError> {
        SitemapIndex::read_from(self, r)
    }
}

impl Extend<Url> for SitemapIndex {
    fn extend<I: IntoIterator<Item = Url>>(&mut self, iter: I) {
        self.urls.extend(iter);
    }
}

impl FromIterator<Url> for SitemapIndex {
    fn from_iter<I: IntoIterator<Item = Url>>(iter: I) -> Self {
        let mut index = SitemapIndex::new();
        index.extend(iter);
        index
    }
}
