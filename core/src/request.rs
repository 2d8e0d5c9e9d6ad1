use std::mem;
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{Error, Result};

/// Everything except RFC 3986 unreserved characters.
static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Signing context for request.
///
/// The query is kept percent-decoded; headers keep the insertion order of the
/// original request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, as it appears on the wire.
    pub path: String,
    /// HTTP query parameters.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTPS),
            authority: uri.authority.ok_or_else(|| {
                Error::validation("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        let query = self.query_to_encoded_string();

        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let paq = if query.is_empty() {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(query.len() + 1);
                    s.push('?');
                    s.push_str(&query);
                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Encode the query in its original order: `a=b&c=d`.
    pub fn query_to_encoded_string(&self) -> String {
        let mut s = String::with_capacity(self.query_size() + self.query.len() * 2);

        for (idx, (k, v)) in self.query.iter().enumerate() {
            if idx != 0 {
                s.push('&');
            }

            s.extend(utf8_percent_encode(k, &QUERY_ENCODE_SET));
            if !v.is_empty() {
                s.push('=');
                s.extend(utf8_percent_encode(v, &QUERY_ENCODE_SET));
            }
        }

        s
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Get header names as sorted vector.
    ///
    /// `HeaderName` is always lowercase so the result can be used as is.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }

    /// Normalize header value for canonical form.
    ///
    /// Leading and trailing whitespace is removed and inner runs of
    /// whitespace are collapsed into a single space.
    pub fn header_value_normalize(v: &str) -> String {
        let mut s = String::with_capacity(v.len());
        for (idx, part) in v.split([' ', '\t']).filter(|p| !p.is_empty()).enumerate() {
            if idx != 0 {
                s.push(' ');
            }
            s.push_str(part);
        }
        s
    }
}

/// Convert header value into `&str`.
///
/// Unlike [`HeaderValue::to_str`], this accepts any valid UTF-8, so that
/// non-ASCII values survive as long as they can be represented as text.
pub fn header_value_to_str(v: &HeaderValue) -> Result<&str> {
    std::str::from_utf8(v.as_bytes()).map_err(|e| {
        Error::serialization("header value is not valid UTF-8").with_source(anyhow::Error::new(e))
    })
}
