//! Build and parse XML sitemaps and sitemap indexes.
//!
//! This crate renders [`Sitemap`] (`<urlset>`) and [`SitemapIndex`]
//! (`<sitemapindex>`) documents following the
//! [sitemaps.org](https://www.sitemaps.org/) 0.9 schema, and reads them back.
//! It wraps [`quick-xml`](quick_xml) for both directions.
//!
//! # Overview
//!
//! The main types are:
//! - [`Sitemap`]: a list of [`Url`] entries, optionally with the XHTML
//!   alternate-link and Google News extensions
//! - [`SitemapIndex`]: a list of references to other sitemaps
//! - [`Url`]: the entry record shared by both documents
//! - [`WriteTo`] / [`ReadFrom`]: the stream traits both documents implement
//!
//! # Example
//!
//! ```rust
//! use chrono::DateTime;
//! use sitemap_xml::{ChangeFreq, Sitemap, Url};
//!
//! let mut sitemap = Sitemap::new();
//! sitemap.add(
//!     Url::new("http://example.com/")
//!         .with_lastmod(DateTime::from_timestamp(0, 0).unwrap().fixed_offset())
//!         .with_changefreq(ChangeFreq::Daily),
//! );
//!
//! let mut out = Vec::new();
//! sitemap.write_to(&mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     r#"<?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>http://example.com/</loc>
//!     <lastmod>1970-01-01T00:00:00Z</lastmod>
//!     <changefreq>daily</changefreq>
//!   </url>
//! </urlset>
//! "#
//! );
//! ```
//!
//! # Validation
//!
//! Nothing is validated. Empty locations, unknown change frequencies,
//! priorities outside `0.0..=1.0`, more than 50,000 entries: all of it is
//! written as given. Limits of the protocol are the caller's business.

pub mod counting;
pub mod error;
pub mod index;
mod parser;
pub mod schema;
pub mod sitemap;
pub mod types;
mod writer;

// Re-export main types
pub use counting::CountingWriter;
pub use error::{Error, Result, StreamError};
pub use index::SitemapIndex;
pub use schema::{NEWS_NS, SITEMAP_NS, XHTML_NS, XML_HEADER};
pub use sitemap::Sitemap;
pub use types::{ChangeFreq, News, Publication, Url, XhtmlLink};

use std::io::{Read, Write};

/// A document that can serialize itself to a byte sink.
pub trait WriteTo {
    /// Write the document to `w`, returning the number of bytes written.
    fn write_to<W: Write>(&self, w: W) -> std::result::Result<u64, StreamError>;
}

/// A document that can be filled from a byte source.
pub trait ReadFrom {
    /// Decode a document from `r` into `self`, returning the number of
    /// bytes consumed.
    fn read_from<R: Read>(&mut self, r: R) -> std::result::Result<u64, StreamError>;
}
