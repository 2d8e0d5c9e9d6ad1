use std::fmt::{self, Debug};

use aws_fed_id_core::hash::{hex_hmac_sha256, hmac_sha256};
use aws_fed_id_core::Result;

use crate::constants::AWS4_REQUEST;

/// SigningKey is the HMAC-SHA256 key derived for one date, region and service.
///
/// - [Derive a signing key](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#derive-signing-key)
///
/// The key is consumed by [`SigningKey::sign`] so it can only be used once, and
/// its `Debug` output never reveals the bytes.
pub struct SigningKey([u8; 32]);

impl SigningKey {
    /// Derive the signing key.
    ///
    /// ```text
    /// kDate    = HMAC("AWS4" + secret, date)
    /// kRegion  = HMAC(kDate, region)
    /// kService = HMAC(kRegion, service)
    /// kSigning = HMAC(kService, "aws4_request")
    /// ```
    pub fn derive(secret: &str, date: &str, region: &str, service: &str) -> Result<Self> {
        // Sign secret
        let secret = format!("AWS4{secret}");
        // Sign date
        let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
        // Sign region
        let sign_region = hmac_sha256(&sign_date, region.as_bytes())?;
        // Sign service
        let sign_service = hmac_sha256(&sign_region, service.as_bytes())?;
        // Sign request
        let sign_request = hmac_sha256(&sign_service, AWS4_REQUEST.as_bytes())?;

        Ok(Self(sign_request))
    }

    /// Sign `string_to_sign` and return the hex encoded signature.
    pub fn sign(self, string_to_sign: &str) -> Result<String> {
        hex_hmac_sha256(&self.0, string_to_sign.as_bytes())
    }

    #[cfg(test)]
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.0.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derive_documented_vector() -> Result<()> {
        let key = SigningKey::derive(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20150830",
            "us-east-1",
            "iam",
        )?;

        assert_eq!(
            hex::encode(key.as_bytes()),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
        Ok(())
    }

    #[test]
    fn test_derive_depends_on_every_input() -> Result<()> {
        let base = SigningKey::derive("secret", "20210101", "us-east-1", "sts")?;

        for other in [
            SigningKey::derive("secret2", "20210101", "us-east-1", "sts")?,
            SigningKey::derive("secret", "20210102", "us-east-1", "sts")?,
            SigningKey::derive("secret", "20210101", "eu-west-1", "sts")?,
            SigningKey::derive("secret", "20210101", "us-east-1", "iam")?,
        ] {
            assert_ne!(base.as_bytes(), other.as_bytes());
        }
        Ok(())
    }

    #[test]
    fn test_debug_hides_key() -> Result<()> {
        let key = SigningKey::derive("secret", "20210101", "us-east-1", "sts")?;
        assert_eq!(format!("{key:?}"), "SigningKey(***)");
        Ok(())
    }
}
