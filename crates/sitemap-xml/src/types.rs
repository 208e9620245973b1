//! Entry records shared by [`Sitemap`](crate::Sitemap) and
//! [`SitemapIndex`](crate::SitemapIndex).

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How often the content at a URL is expected to change.
///
/// The seven protocol values have their own variants. Anything else is kept
/// verbatim in [`ChangeFreq::Other`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
    Other(String),
}

impl ChangeFreq {
    pub fn as_str(&self) -> &str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
            ChangeFreq::Other(value) => value,
        }
    }

    /// True for the seven values defined by the sitemaps.org protocol.
    pub fn is_standard(&self) -> bool {
        !matches!(self, ChangeFreq::Other(_))
    }
}

impl From<&str> for ChangeFreq {
    fn from(value: &str) -> Self {
        match value {
            "always" => ChangeFreq::Always,
            "hourly" => ChangeFreq::Hourly,
            "daily" => ChangeFreq::Daily,
            "weekly" => ChangeFreq::Weekly,
            "monthly" => ChangeFreq::Monthly,
            "yearly" => ChangeFreq::Yearly,
            "never" => ChangeFreq::Never,
            other => ChangeFreq::Other(other.to_string()),
        }
    }
}

impl From<String> for ChangeFreq {
    fn from(value: String) -> Self {
        match ChangeFreq::from(value.as_str()) {
            ChangeFreq::Other(_) => ChangeFreq::Other(value),
            known => known,
        }
    }
}

impl From<ChangeFreq> for String {
    fn from(value: ChangeFreq) -> Self {
        match value {
            ChangeFreq::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ChangeFreq {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ChangeFreq::from(s))
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<xhtml:link>` alternate-language reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XhtmlLink {
    pub rel: String,
    pub hreflang: String,
    pub href: String,
}

impl XhtmlLink {
    pub fn new(
        rel: impl Into<String>,
        hreflang: impl Into<String>,
        href: impl Into<String>,
    ) -> Self {
        Self {
            rel: rel.into(),
            hreflang: hreflang.into(),
            href: href.into(),
        }
    }

    /// A `rel="alternate"` link to the same content in another language.
    pub fn alternate(hreflang: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new("alternate", hreflang, href)
    }
}

/// Publisher of a news article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub name: String,
    /// ISO 639 language code, e.g. `en` or `zh-cn`.
    pub language: String,
}

impl Publication {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

/// Google News metadata for one article URL.
///
/// `genres`, `keywords` and `stock_tickers` are comma-separated lists,
/// stored as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub publication: Publication,
    pub title: String,
    pub publication_date: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_tickers: Option<String>,
}

impl News {
    pub fn new(
        publication: Publication,
        title: impl Into<String>,
        publication_date: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            publication,
            title: title.into(),
            publication_date,
            genres: None,
            keywords: None,
            stock_tickers: None,
        }
    }

    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = Some(genres.into());
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_stock_tickers(mut self, stock_tickers: impl Into<String>) -> Self {
        self.stock_tickers = Some(stock_tickers.into());
        self
    }
}

/// A single entry of a [`Sitemap`](crate::Sitemap) or
/// [`SitemapIndex`](crate::SitemapIndex).
///
/// `loc` is the only mandatory item and is never checked. In a sitemap
/// index only `loc` and `lastmod` are written; the other fields are
/// silently left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Url {
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFreq>,
    /// Conventionally in `0.0..=1.0`. `Some(0.0)` is written; `None` is not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub xhtml_links: Vec<XhtmlLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<News>,
}

impl Url {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            ..Self::default()
        }
    }

    pub fn with_lastmod(mut self, lastmod: DateTime<FixedOffset>) -> Self {
        self.lastmod = Some(lastmod);
        self
    }

    pub fn with_changefreq(mut self, changefreq: impl Into<ChangeFreq>) -> Self {
        self.changefreq = Some(changefreq.into());
        self
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_xhtml_link(mut self, link: XhtmlLink) -> Self {
        self.xhtml_links.push(link);
        self
    }

    pub fn with_news(mut self, news: News) -> Self {
        self.news = Some(news);
        self
    }
}

/// Render a timestamp the way `<lastmod>` and `<news:publication_date>`
/// carry it: RFC 3339, `Z` for UTC, and the shortest fraction that keeps
/// every non-zero sub-second digit (`.5`, not `.500`).
pub(crate) fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    let full = timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let Some((seconds, rest)) = full.split_once('.') else {
        return full;
    };

    let zone_start = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (fraction, zone) = rest.split_at(zone_start);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{seconds}{zone}")
    } else {
        format!("{seconds}.{fraction}{zone}")
    }
}

/// Parse an RFC 3339 timestamp or a W3C date (`YYYY-MM-DD`, taken as
/// midnight UTC).
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, String> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => Ok(timestamp),
        Err(rfc3339_err) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc().fixed_offset())
            .ok_or_else(|| rfc3339_err.to_string()),
    }
}
