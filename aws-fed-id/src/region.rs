use std::fmt::{self, Display};
use std::str::FromStr;

use aws_fed_id_core::{Error, Result};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Region is an AWS region code such as `us-east-1`.
///
/// Region codes are treated as opaque: any non-empty combination of ASCII
/// letters, digits and `-` is accepted, so regions unknown to this crate keep
/// working. The only thing derived from a region is the regional STS host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    /// Parse a region code.
    pub fn parse(region: &str) -> Result<Self> {
        if region.is_empty() {
            return Err(Error::validation("region must not be empty"));
        }
        if !region
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return Err(Error::validation("region contains invalid characters")
                .with_context("region", region.escape_debug()));
        }

        Ok(Self(region.to_string()))
    }

    /// The region code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host of the regional STS endpoint: `sts.<region>.amazonaws.com`.
    pub fn sts_host(&self) -> String {
        format!("sts.{}.amazonaws.com", self.0)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self(DEFAULT_REGION.to_string())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
