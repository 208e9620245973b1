//! Element names and namespaces of the sitemaps.org schema and the
//! extensions this crate understands.

/// Namespace of the sitemaps.org 0.9 schema.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Namespace bound to the `xhtml` prefix for alternate-language links.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Namespace bound to the `news` prefix for Google News entries.
pub const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";

/// The declaration written before every document, newline included.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

pub(crate) const URLSET: &str = "urlset";
pub(crate) const URL: &str = "url";
pub(crate) const SITEMAPINDEX: &str = "sitemapindex";
pub(crate) const SITEMAP: &str = "sitemap";

pub(crate) const LOC: &str = "loc";
pub(crate) const LASTMOD: &str = "lastmod";
pub(crate) const CHANGEFREQ: &str = "changefreq";
pub(crate) const PRIORITY: &str = "priority";

pub(crate) const XHTML_LINK: &str = "xhtml:link";
pub(crate) const LINK: &str = "link";

pub(crate) const NEWS: &str = "news";
pub(crate) const PUBLICATION: &str = "publication";
pub(crate) const NAME: &str = "name";
pub(crate) const LANGUAGE: &str = "language";
pub(crate) const PUBLICATION_DATE: &str = "publication_date";
pub(crate) const TITLE: &str = "title";
pub(crate) const GENRES: &str = "genres";
pub(crate) const KEYWORDS: &str = "keywords";
pub(crate) const STOCK_TICKERS: &str = "stock_tickers";

/// Which entry fields a document kind writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryFields {
    /// `loc` and `lastmod` only.
    Index,
    /// Every field, with each extension enabled separately.
    Full { xhtml: bool, news: bool },
}

/// Tag names and field set of one document kind.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    pub root: &'static str,
    pub entry: &'static str,
    pub fields: EntryFields,
}

impl Layout {
    pub(crate) fn urlset(xhtml: bool, news: bool) -> Self {
        Self {
            root: URLSET,
            entry: URL,
            fields: EntryFields::Full { xhtml, news },
        }
    }

    pub(crate) fn index() -> Self {
        Self {
            root: SITEMAPINDEX,
            entry: SITEMAP,
            fields: EntryFields::Index,
        }
    }

    /// Namespace declarations for the root element, in output order.
    pub(crate) fn namespaces(&self) -> Vec<(&'static str, &'static str)> {
        let mut namespaces = vec![("xmlns", SITEMAP_NS)];
        if let EntryFields::Full { xhtml, news } = self.fields {
            if xhtml {
                namespaces.push(("xmlns:xhtml", XHTML_NS));
            }
            if news {
                namespaces.push(("xmlns:news", NEWS_NS));
            }
        }
        namespaces
    }
}

/// Strip the prefix from a qualified name.
pub(crate) fn local_name(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map_or(qualified, |(_, local)| local)
}

/// Prefix `name` with `news:`.
pub(crate) fn news_tag(name: &str) -> String {
    format!("news:{}", name)
}
