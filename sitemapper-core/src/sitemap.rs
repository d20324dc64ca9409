//! Sitemap document model and XML serialization.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace carried by the `<urlset>` root element.
pub const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("XML serialization failed: {0}")]
    Serialize(String),
}

/// One `<url><loc>…</loc></url>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    pub loc: String,
}

/// An ordered sitemap document for one seed host. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMapDocument {
    pub urls: Vec<UrlEntry>,
}

impl SiteMapDocument {
    /// Build a document from an unordered page set.
    ///
    /// The crawler makes no ordering promise, so entries are sorted here to
    /// keep repeated runs byte-identical. Each distinct URL appears once.
    pub fn from_pages(pages: &[String]) -> Self {
        let mut pages = pages.to_vec();
        pages.sort();
        pages.dedup();

        Self {
            urls: pages.into_iter().map(|loc| UrlEntry { loc }).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Serialize to an XML document: prolog, namespaced `<urlset>` root, one
    /// `<url>` child per entry, two-space indentation, trailing newline.
    pub fn to_xml(&self) -> Result<String, SitemapError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(ser_err)?;

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", SITEMAP_XMLNS));
        writer.write_event(Event::Start(urlset)).map_err(ser_err)?;

        for entry in &self.urls {
            writer
                .write_event(Event::Start(BytesStart::new("url")))
                .map_err(ser_err)?;
            writer
                .write_event(Event::Start(BytesStart::new("loc")))
                .map_err(ser_err)?;
            writer
                .write_event(Event::Text(BytesText::new(&entry.loc)))
                .map_err(ser_err)?;
            writer
                .write_event(Event::End(BytesEnd::new("loc")))
                .map_err(ser_err)?;
            writer
                .write_event(Event::End(BytesEnd::new("url")))
                .map_err(ser_err)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("urlset")))
            .map_err(ser_err)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(ser_err)
    }
}

fn ser_err<E: std::fmt::Display>(err: E) -> SitemapError {
    SitemapError::Serialize(err.to_string())
}
