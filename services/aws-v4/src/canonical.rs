use std::fmt::{self, Display, Write};

use aws_fed_id_core::{header_value_to_str, Error, Result, SigningRequest};
use percent_encoding::{percent_decode_str, utf8_percent_encode};

use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET};

/// CanonicalRequest is the normalized form of a request used as signing input.
///
/// - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)
///
/// Its `Display` output is the exact string that gets hashed:
///
/// ```text
/// <method>\n
/// <canonical uri>\n
/// <canonical query>\n
/// <canonical headers, one `key:value\n` per header>\n
/// <signed headers>\n
/// <payload hash>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri: String,
    query: String,
    headers: String,
    signed_headers: String,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request for `req`.
    ///
    /// Every header on the request is signed. Fails with a validation error
    /// if the path is not a valid absolute, UTF-8 path.
    pub fn build(req: &SigningRequest, payload_hash: &str) -> Result<Self> {
        let signed = req.header_name_to_vec_sorted();

        let mut headers = String::with_capacity(128);
        for name in signed.iter() {
            let value = req
                .headers
                .get(*name)
                .map(header_value_to_str)
                .transpose()?
                .unwrap_or_default();
            writeln!(
                headers,
                "{}:{}",
                name,
                SigningRequest::header_value_normalize(value)
            )?;
        }

        Ok(Self {
            method: req.method.as_str().to_string(),
            uri: canonical_uri(&req.path)?,
            query: canonical_query(&req.query),
            headers,
            signed_headers: signed.join(";"),
            payload_hash: payload_hash.to_string(),
        })
    }

    /// The `;` joined, sorted list of signed header names.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// The canonical URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The canonical query string.
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        writeln!(f, "{}", self.headers)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

fn canonical_uri(path: &str) -> Result<String> {
    if path.is_empty() {
        return Ok("/".to_string());
    }
    if !path.starts_with('/') {
        return Err(Error::validation("request path must be absolute").with_context("path", path));
    }

    let decoded = percent_decode_str(path).decode_utf8().map_err(|e| {
        Error::validation("request path is not valid UTF-8")
            .with_context("path", path)
            .with_source(anyhow::Error::new(e))
    })?;

    Ok(utf8_percent_encode(&decoded, &AWS_URI_ENCODE_SET).to_string())
}

fn canonical_query(query: &[(String, String)]) -> String {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    // Sort by param name, then by value.
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
