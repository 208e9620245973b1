//! Streaming XML decoder shared by both document kinds.
//!
//! Elements are matched by local name only; namespace prefixes and
//! declarations are never checked against the schema. Every entry field is
//! decoded for both document kinds, so an index entry keeps a `changefreq`
//! or `priority` found in the markup.
//!
//! Leaf text is returned exactly as written. Only `lastmod`, `priority`
//! and `news:publication_date` are trimmed, for parsing.

use crate::schema::{self, Layout, local_name};
use crate::types::{News, Publication, Url, XhtmlLink, parse_timestamp};
use crate::{ChangeFreq, Error, Result, StreamError};
use chrono::{DateTime, FixedOffset};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::{BufRead, BufReader, Read};

/// Outcome of a successful [`read_document`].
#[derive(Debug)]
pub(crate) struct Decoded {
    pub root: RootElement,
    /// Bytes consumed by the decoder.
    pub bytes: u64,
}

/// The root start tag of a decoded document.
#[derive(Debug)]
pub(crate) struct RootElement {
    /// Attributes keyed by qualified name (`xmlns:xhtml`).
    pub attributes: Vec<(String, String)>,
    /// The root was written as `<urlset/>`.
    pub empty: bool,
}

impl RootElement {
    /// True if any prefix is bound to `namespace` on the root.
    pub(crate) fn declares(&self, namespace: &str) -> bool {
        self.attributes
            .iter()
            .any(|(name, value)| name.starts_with("xmlns:") && value == namespace)
    }
}

/// Decode one document from `source`, appending its entries to `urls`.
///
/// Entries decoded before a failure stay in `urls`. The byte count, on
/// success or failure, is the decoder's input offset.
pub(crate) fn read_document<R: Read>(
    source: R,
    layout: Layout,
    urls: &mut Vec<Url>,
) -> std::result::Result<Decoded, StreamError> {
    let mut parser = XmlParser::new(BufReader::new(source));
    let before = urls.len();

    let root = match parser.read_root(layout.root) {
        Ok(root) => root,
        Err(err) => return Err(StreamError::new(parser.offset(), err)),
    };

    if !root.empty {
        if let Err(err) = parser.read_entries(layout, urls) {
            return Err(StreamError::new(parser.offset(), err));
        }
    }

    let bytes = parser.offset();
    tracing::debug!(
        root = layout.root,
        entries = urls.len() - before,
        bytes,
        "Read sitemap document"
    );
    Ok(Decoded { root, bytes })
}

/// An event reduced to what the decoder needs, with owned data.
#[derive(Debug)]
enum Token {
    /// Start tag, name without prefix. `empty` marks a self-closing
    /// element, which has no matching [`Token::End`].
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        empty: bool,
    },
    End,
    Text(String),
    Eof,
}

/// Internal decoder state.
pub(crate) struct XmlParser<R> {
    /// The quick-xml reader.
    reader: Reader<R>,

    /// Event buffer, reused between reads.
    buf: Vec<u8>,
}

impl<R: BufRead> XmlParser<R> {
    pub(crate) fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Bytes consumed so far.
    pub(crate) fn offset(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Read up to and including the root start tag.
    pub(crate) fn read_root(&mut self, expected: &str) -> Result<RootElement> {
        loop {
            match self.next_token()? {
                Token::Start {
                    name,
                    attributes,
                    empty,
                } => {
                    if name != expected {
                        return Err(Error::UnexpectedRoot {
                            expected: expected.to_string(),
                            found: name,
                        });
                    }
                    return Ok(RootElement { attributes, empty });
                }
                Token::Text(_) | Token::End => {}
                Token::Eof => {
                    return Err(Error::UnexpectedEof {
                        expected: format!("root element <{}>", expected),
                    });
                }
            }
        }
    }

    /// Read entries until the root element closes.
    pub(crate) fn read_entries(&mut self, layout: Layout, urls: &mut Vec<Url>) -> Result<()> {
        loop {
            match self.next_token()? {
                Token::Start { name, empty, .. } if name == layout.entry => {
                    let url = if empty {
                        Url::default()
                    } else {
                        self.read_url()?
                    };
                    urls.push(url);
                }
                Token::Start { name, empty, .. } => {
                    tracing::trace!(element = %name, "Skipping unknown element");
                    if !empty {
                        self.skip_element()?;
                    }
                }
                Token::Text(_) => {}
                Token::End => return Ok(()),
                Token::Eof => {
                    return Err(Error::UnexpectedEof {
                        expected: format!("closing tag </{}>", layout.root),
                    });
                }
            }
        }
    }

    fn read_url(&mut self) -> Result<Url> {
        let mut url = Url::default();

        loop {
            match self.next_token()? {
                Token::Start {
                    name,
                    attributes,
                    empty,
                } => match name.as_str() {
                    schema::LOC => url.loc = self.read_text(empty)?,
                    schema::LASTMOD => url.lastmod = self.read_timestamp(schema::LASTMOD, empty)?,
                    schema::CHANGEFREQ => {
                        url.changefreq = Some(ChangeFreq::from(self.read_text(empty)?));
                    }
                    schema::PRIORITY => url.priority = self.read_priority(empty)?,
                    schema::LINK => {
                        url.xhtml_links.push(xhtml_link(&attributes));
                        if !empty {
                            self.skip_element()?;
                        }
                    }
                    schema::NEWS => url.news = Some(self.read_news(empty)?),
                    _ => {
                        tracing::trace!(element = %name, "Skipping unknown element");
                        if !empty {
                            self.skip_element()?;
                        }
                    }
                },
                Token::Text(_) => {}
                Token::End => return Ok(url),
                Token::Eof => {
                    return Err(Error::UnexpectedEof {
                        expected: "end of entry".to_string(),
                    });
                }
            }
        }
    }

    fn read_news(&mut self, empty: bool) -> Result<News> {
        let mut publication = Publication::default();
        let mut title = String::new();
        let mut publication_date = None;
        let mut genres = None;
        let mut keywords = None;
        let mut stock_tickers = None;

        if !empty {
            loop {
                match self.next_token()? {
                    Token::Start { name, empty, .. } => match name.as_str() {
                        schema::PUBLICATION => publication = self.read_publication(empty)?,
                        schema::PUBLICATION_DATE => {
                            publication_date =
                                self.read_timestamp(schema::PUBLICATION_DATE, empty)?;
                        }
                        schema::TITLE => title = self.read_text(empty)?,
                        schema::GENRES => genres = Some(self.read_text(empty)?),
                        schema::KEYWORDS => keywords = Some(self.read_text(empty)?),
                        schema::STOCK_TICKERS => stock_tickers = Some(self.read_text(empty)?),
                        _ => {
                            if !empty {
                                self.skip_element()?;
                            }
                        }
                    },
                    Token::Text(_) => {}
                    Token::End => break,
                    Token::Eof => {
                        return Err(Error::UnexpectedEof {
                            expected: "closing tag </news:news>".to_string(),
                        });
                    }
                }
            }
        }

        let publication_date = publication_date.ok_or_else(|| Error::MissingElement {
            parent: schema::NEWS.to_string(),
            element: schema::PUBLICATION_DATE.to_string(),
        })?;

        Ok(News {
            publication,
            title,
            publication_date,
            genres,
            keywords,
            stock_tickers,
        })
    }

    fn read_publication(&mut self, empty: bool) -> Result<Publication> {
        let mut publication = Publication::default();
        if empty {
            return Ok(publication);
        }

        loop {
            match self.next_token()? {
                Token::Start { name, empty, .. } => match name.as_str() {
                    schema::NAME => publication.name = self.read_text(empty)?,
                    schema::LANGUAGE => publication.language = self.read_text(empty)?,
                    _ => {
                        if !empty {
                            self.skip_element()?;
                        }
                    }
                },
                Token::Text(_) => {}
                Token::End => return Ok(publication),
                Token::Eof => {
                    return Err(Error::UnexpectedEof {
                        expected: "closing tag </news:publication>".to_string(),
                    });
                }
            }
        }
    }

    /// Read an optional timestamp. A blank element counts as absent.
    fn read_timestamp(
        &mut self,
        element: &str,
        empty: bool,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        let text = self.read_text(empty)?;
        let value = text.trim();
        if value.is_empty() {
            return Ok(None);
        }
        parse_timestamp(value)
            .map(Some)
            .map_err(|message| Error::InvalidValue {
                element: element.to_string(),
                value: text,
                message,
            })
    }

    /// Read an optional priority. A blank element counts as absent.
    fn read_priority(&mut self, empty: bool) -> Result<Option<f32>> {
        let text = self.read_text(empty)?;
        let value = text.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<f32>()
            .map(Some)
            .map_err(|err| Error::InvalidValue {
                element: schema::PRIORITY.to_string(),
                value: text.clone(),
                message: err.to_string(),
            })
    }

    /// Collect the text of the element whose start tag was just read,
    /// whitespace included. Nested markup is skipped.
    fn read_text(&mut self, empty: bool) -> Result<String> {
        let mut text = String::new();
        if empty {
            return Ok(text);
        }

        loop {
            match self.next_token()? {
                Token::Text(content) => text.push_str(&content),
                Token::Start { empty, .. } => {
                    if !empty {
                        self.skip_element()?;
                    }
                }
                Token::End => return Ok(text),
                Token::Eof => {
                    return Err(Error::UnexpectedEof {
                        expected: "closing tag".to_string(),
                    });
                }
            }
        }
    }

    /// Skip the element whose start tag was just read, children included.
    fn skip_element(&mut self) -> Result<()> {
        let mut depth = 1usize;
        loop {
            match self.next_token()? {
                Token::Start { empty: false, .. } => depth += 1,
                Token::End => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Token::Start { .. } | Token::Text(_) => {}
                Token::Eof => {
                    return Err(Error::UnexpectedEof {
                        expected: "closing tag".to_string(),
                    });
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        loop {
            self.buf.clear();
            let token = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => start_token(&e, false)?,
                Ok(Event::Empty(e)) => start_token(&e, true)?,
                Ok(Event::End(_)) => Token::End,
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| Error::XmlSyntax {
                        message: format!("Invalid text content: {}", err),
                        position: None,
                    })?;
                    Token::Text(text.into_owned())
                }
                Ok(Event::CData(e)) => Token::Text(String::from_utf8_lossy(e.as_ref()).into_owned()),
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {
                    // Skip comments, processing instructions, and declarations
                    continue;
                }
                Ok(Event::Eof) => Token::Eof,
                Err(err) => {
                    let position = self.reader.error_position() as u64;
                    return Err(match Error::from(err) {
                        Error::XmlSyntax { message, .. } => Error::XmlSyntax {
                            message,
                            position: Some(position),
                        },
                        other => other,
                    });
                }
            };
            return Ok(token);
        }
    }
}

fn start_token(e: &BytesStart<'_>, empty: bool) -> Result<Token> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid attribute value: {}", err),
            position: None,
        })?;
        attributes.push((key, value.into_owned()));
    }

    Ok(Token::Start {
        name,
        attributes,
        empty,
    })
}

fn xhtml_link(attributes: &[(String, String)]) -> XhtmlLink {
    let mut link = XhtmlLink::default();
    for (name, value) in attributes {
        match local_name(name) {
            "rel" => link.rel = value.clone(),
            "hreflang" => link.hreflang = value.clone(),
            "href" => link.href = value.clone(),
            _ => {}
        }
    }
    link
}
