//! # Proxy Endpoints
//!
//! Templates for CORS proxy services: a fixed URL prefix the encoded
//! target URL is appended to, plus the shape of the proxy's response body.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped when substituting a target URL into a proxy
/// template. Matches JavaScript's `encodeURIComponent` unreserved set.
const TARGET_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Shape of a proxy's response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyResponseKind {
    /// The proxy relays the upstream body as-is.
    Raw,
    /// The proxy wraps the upstream body in a JSON object; the body is the
    /// JSON-encoded string under `field`.
    Enveloped { field: String },
}

/// A proxy endpoint template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    /// URL prefix the encoded target URL is appended to.
    pub base: String,
    /// Shape of the proxy's response body.
    pub response: ProxyResponseKind,
}

impl ProxyEndpoint {
    /// A proxy that relays the upstream body unchanged.
    pub fn raw(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            response: ProxyResponseKind::Raw,
        }
    }

    /// A proxy that nests the upstream body under `field`.
    pub fn enveloped(base: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            response: ProxyResponseKind::Enveloped {
                field: field.into(),
            },
        }
    }

    /// Build the proxied request URL for a target URL.
    pub fn proxied_url(&self, target: &str) -> String {
        format!(
            "{}{}",
            self.base,
            utf8_percent_encode(target, TARGET_ENCODE_SET)
        )
    }
}

/// Default public CORS proxies, in configuration order.
pub fn default_proxies() -> Vec<ProxyEndpoint> {
    vec![
        // AllOrigins raw passthrough
        ProxyEndpoint::raw("https://api.allorigins.win/raw?url="),
        // Isomorphic-git CORS proxy
        ProxyEndpoint::raw("https://cors.isomorphic-git.org/"),
    ]
}
