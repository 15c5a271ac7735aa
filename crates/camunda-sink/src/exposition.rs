//! Prometheus text exposition.
//!
//! Renders everything gathered from a [`Registry`] with the prometheus
//! crate's `TextEncoder`, for scraping by a Prometheus server or a
//! compatible agent.

use prometheus::{Encoder, TextEncoder};

use crate::registry::{Registry, RegistryError, RegistryResult};

/// Content type of [`render_prometheus`] output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render every non-empty family in the text format.
pub fn render_prometheus(registry: &Registry) -> RegistryResult<String> {
    let families = registry.gather();
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| RegistryError::Msg(e.to_string()))
}
