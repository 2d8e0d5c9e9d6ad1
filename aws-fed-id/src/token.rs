use aws_fed_id_core::{header_value_to_str, Error, Result};
use http::request::Parts;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Everything except RFC 3986 unreserved characters is encoded.
static TOKEN_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Token describes a signed request that a verifier can replay.
///
/// On the wire it is the compact JSON form percent-encoded as a whole:
///
/// ```json
/// {"url":"https://sts.us-east-1.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15",
///  "method":"POST",
///  "headers":[{"key":"host","value":"sts.us-east-1.amazonaws.com"}, ...]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Full request URL including the query string.
    pub url: String,
    /// HTTP method, always `POST` for generated tokens.
    pub method: String,
    /// Signed headers in the order they were added to the request.
    pub headers: Vec<TokenHeader>,
}

/// A single header of a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Lower-cased header name.
    pub key: String,
    /// Header value.
    pub value: String,
}

impl Token {
    /// Build a token from a signed request.
    ///
    /// Headers keep the request's insertion order. A header carrying several
    /// values contributes only its first one.
    pub fn from_parts(parts: &Parts) -> Result<Self> {
        let headers = parts
            .headers
            .keys()
            .map(|name| {
                let value = parts
                    .headers
                    .get(name)
                    .map(header_value_to_str)
                    .transpose()
                    .map_err(|e| e.with_context("header", name.as_str()))?
                    .unwrap_or_default();
                Ok(TokenHeader {
                    key: name.as_str().to_string(),
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            url: parts.uri.to_string(),
            method: parts.method.as_str().to_string(),
            headers,
        })
    }

    /// Get the value of the first header named `key`.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key == key)
            .map(|h| h.value.as_str())
    }

    /// Serialize into compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            Error::serialization("failed to serialize token").with_source(anyhow::Error::new(e))
        })
    }

    /// Serialize into the percent-encoded wire form.
    pub fn encode(&self) -> Result<String> {
        let json = self.to_json()?;
        Ok(utf8_percent_encode(&json, &TOKEN_ENCODE_SET).to_string())
    }

    /// Parse a token from its percent-encoded wire form.
    pub fn decode(token: &str) -> Result<Self> {
        let json = percent_decode_str(token).decode_utf8().map_err(|e| {
            Error::serialization("token is not valid percent-encoded UTF-8")
                .with_source(anyhow::Error::new(e))
        })?;

        serde_json::from_str(&json).map_err(|e| {
            Error::serialization("token is not valid JSON").with_source(anyhow::Error::new(e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_fed_id_core::ErrorKind;
    use http::{HeaderValue, Request};
    use pretty_assertions::assert_eq;

    fn signed_parts() -> Parts {
        Request::post(
            "https://sts.us-east-1.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15",
        )
        .header("host", "sts.us-east-1.amazonaws.com")
        .header("x-goog-cloud-target-resource", "example.com")
        .header("x-amz-date", "20210101T010101Z")
        .header("authorization", "AWS4-HMAC-SHA256 Credential=AK/20210101/us-east-1/sts/aws4_request, SignedHeaders=host;x-amz-date;x-goog-cloud-target-resource, Signature=00")
        .body(())
        .expect("request must be valid")
        .into_parts()
        .0
    }

    #[test]
    fn test_from_parts_keeps_order() -> Result<()> {
        let token = Token::from_parts(&signed_parts())?;

        assert_eq!(
            token.url,
            "https://sts.us-east-1.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15"
        );
        assert_eq!(token.method, "POST");
        assert_eq!(
            token
                .headers
                .iter()
                .map(|h| h.key.as_str())
                .collect::<Vec<_>>(),
            vec![
                "host",
                "x-goog-cloud-target-resource",
                "x-amz-date",
                "authorization"
            ]
        );
        assert_eq!(token.header("x-amz-date"), Some("20210101T010101Z"));
        assert_eq!(token.header("x-amz-security-token"), None);
        Ok(())
    }

    #[test]
    fn test_first_value_wins() -> Result<()> {
        let mut parts = signed_parts();
        parts
            .headers
            .append("x-goog-cloud-target-resource", HeaderValue::from_static("second"));

        let token = Token::from_parts(&parts)?;
        assert_eq!(token.headers.len(), 4);
        assert_eq!(token.header("x-goog-cloud-target-resource"), Some("example.com"));
        Ok(())
    }

    #[test]
    fn test_encode() -> Result<()> {
        let token = Token {
            url: "https://sts.us-east-1.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15"
                .to_string(),
            method: "POST".to_string(),
            headers: vec![TokenHeader {
                key: "host".to_string(),
                value: "sts.us-east-1.amazonaws.com".to_string(),
            }],
        };

        assert_eq!(
            token.to_json()?,
            r#"{"url":"https://sts.us-east-1.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15","method":"POST","headers":[{"key":"host","value":"sts.us-east-1.amazonaws.com"}]}"#
        );
        assert_eq!(
            token.encode()?,
            "%7B%22url%22%3A%22https%3A%2F%2Fsts.us-east-1.amazonaws.com%2F%3FAction%3DGetCallerIdentity%26Version%3D2011-06-15%22%2C%22method%22%3A%22POST%22%2C%22headers%22%3A%5B%7B%22key%22%3A%22host%22%2C%22value%22%3A%22sts.us-east-1.amazonaws.com%22%7D%5D%7D"
        );
        Ok(())
    }

    #[test]
    fn test_encode_escapes_reserved_characters() -> Result<()> {
        let token = Token {
            url: "u".to_string(),
            method: "POST".to_string(),
            headers: vec![TokenHeader {
                key: "x-amz-security-token".to_string(),
                value: "a+b/c= d".to_string(),
            }],
        };

        let encoded = token.encode()?;
        assert!(encoded.contains("a%2Bb%2Fc%3D%20d"));
        assert!(!encoded.contains('+'));
        Ok(())
    }

    #[test]
    fn test_decode_invalid() {
        let err = Token::decode("%7Bnot-json").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Serialization);

        let err = Token::decode("%FF%FE").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Serialization);

        let err = Token::decode("%7B%22url%22%3A%22u%22%7D").expect_err("missing fields must fail");
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }
}
