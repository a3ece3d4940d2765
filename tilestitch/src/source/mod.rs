//! Tile source module
//!
//! Retrieves raw tile image bytes from a remote slippy-map server. The
//! server is addressed through a URL template with `{x}`, `{y}` and `{z}`
//! placeholders; the HTTP transport sits behind a trait so tests can
//! substitute mock clients.

mod http;
mod template;
mod types;

pub use http::{AsyncHttpClient, ReqwestClient};
pub use template::{TemplateTileSource, TileUrlTemplate};
pub use types::{SourceError, TileSource};

#[cfg(test)]
pub use http::tests::MockHttpClient;
