//! Templated slippy-map tile source.
//!
//! Tile servers following the XYZ addressing convention publish tiles at
//! URLs like `https://tile.example.org/{z}/{x}/{y}.png`. The template keeps
//! the literal placeholders and substitutes them per request.

use super::http::AsyncHttpClient;
use super::types::{SourceError, TileSource};
use crate::coord::TileIndex;
use std::fmt;

/// A tile URL template with `{x}`, `{y}` and `{z}` placeholders.
///
/// Each placeholder is substituted at most once per request; further
/// literal occurrences are left untouched. No other validation is applied
/// to the template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlTemplate(String);

impl TileUrlTemplate {
    /// Wraps a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the request URL for one tile at one zoom level.
    pub fn url_for(&self, tile: TileIndex, zoom: u8) -> String {
        self.0
            .replacen("{x}", &tile.x.to_string(), 1)
            .replacen("{y}", &tile.y.to_string(), 1)
            .replacen("{z}", &zoom.to_string(), 1)
    }
}

impl fmt::Display for TileUrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileUrlTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Tile source backed by a URL template and an HTTP client.
pub struct TemplateTileSource<C: AsyncHttpClient> {
    http_client: C,
    template: TileUrlTemplate,
}

impl<C: AsyncHttpClient> TemplateTileSource<C> {
    /// Creates a new templated source.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `template` - URL template with `{x}`, `{y}`, `{z}` placeholders
    pub fn new(http_client: C, template: TileUrlTemplate) -> Self {
        Self {
            http_client,
            template,
        }
    }

    /// The template this source requests tiles from.
    pub fn template(&self) -> &TileUrlTemplate {
        &self.template
    }
}

impl<C: AsyncHttpClient> TileSource for TemplateTileSource<C> {
    async fn fetch_tile(&self, tile: TileIndex, zoom: u8) -> Result<Vec<u8>, SourceError> {
        let url = self.template.url_for(tile, zoom);
        self.http_client.get(&url).await
    }

    fn name(&self) -> &str {
        "XYZ template"
    }
}
