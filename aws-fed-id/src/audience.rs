use std::fmt::{self, Display};

use aws_fed_id_core::{Error, Result};

const HTTPS_PREFIX: &str = "https://";

/// Audience identifies the party a token is generated for.
///
/// With GCP workload identity federation this is the workload identity pool
/// provider; elsewhere any string that uniquely names the verifier works,
/// a hostname for example. Binding the token to it prevents replaying a token
/// against a different verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audience(String);

impl Audience {
    /// Parse an audience from raw bytes.
    ///
    /// The input must be non-empty UTF-8 that can be carried in an HTTP header
    /// value: no control characters other than horizontal tab.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let audience = std::str::from_utf8(input).map_err(|e| {
            Error::validation("audience is not valid UTF-8").with_source(anyhow::Error::new(e))
        })?;

        if audience.is_empty() {
            return Err(Error::validation("audience must not be empty"));
        }
        if audience.chars().any(|c| c.is_control() && c != '\t') {
            return Err(Error::validation("audience contains control characters")
                .with_context("audience", audience.escape_debug()));
        }

        let audience = Self(audience.to_string());
        if audience.target_resource().is_empty() {
            return Err(Error::validation("audience has nothing after the https:// prefix"));
        }
        Ok(audience)
    }

    /// The audience as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `x-goog-cloud-target-resource` header.
    ///
    /// A single leading `https://` is removed; anything else, other schemes
    /// included, is kept verbatim.
    pub fn target_resource(&self) -> &str {
        self.0.strip_prefix(HTTPS_PREFIX).unwrap_or(&self.0)
    }
}

impl TryFrom<&str> for Audience {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value.as_bytes())
    }
}

impl Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
