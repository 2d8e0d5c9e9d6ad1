use aws_fed_id_aws_v4::{Credential, RequestSigner};
use aws_fed_id_core::time::DateTime;
use aws_fed_id_core::{Context, Error, ErrorKind, Result, SignRequest, SigningCredential};
use http::header;
use http::request::Parts;
use log::debug;

use crate::{default_context, Audience, Config, Token};

/// Signing name of AWS STS.
const STS_SERVICE: &str = "sts";
/// Query of the signed request.
const GET_CALLER_IDENTITY_QUERY: &str = "Action=GetCallerIdentity&Version=2011-06-15";
/// Header binding the token to its audience.
pub const X_GOOG_CLOUD_TARGET_RESOURCE: &str = "x-goog-cloud-target-resource";

/// TokenGenerator produces tokens proving the caller's AWS identity.
///
/// A token is a signed `sts:GetCallerIdentity` request that is never sent.
/// The verifier replays it against STS to learn who signed it, so the
/// credential itself never leaves the process. The format is the subject
/// token accepted by GCP workload identity federation for AWS.
///
/// Generation holds no mutable state: one generator can be shared by any
/// number of concurrent tasks.
#[derive(Clone, Debug)]
pub struct TokenGenerator {
    ctx: Context,
    config: Config,

    time: Option<DateTime>,
}

impl Default for TokenGenerator {
    /// Generator for `us-east-1` using the default credential chain and the
    /// process environment.
    fn default() -> Self {
        Self::new(default_context(), Config::default())
    }
}

impl TokenGenerator {
    /// Create a new generator.
    pub fn new(ctx: Context, config: Config) -> Self {
        Self {
            ctx,
            config,
            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Get the config of this generator.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate a token for `audience`.
    ///
    /// The audience is validated before the credential provider is asked
    /// for anything. Any failure is returned as `failed to generate token`
    /// with the failing stage, audience and region as context; the error
    /// kind and cause of the stage are kept.
    pub async fn generate(&self, audience: impl AsRef<[u8]>) -> Result<String> {
        let raw = audience.as_ref();
        let audience = Audience::parse(raw)
            .map_err(|e| self.wrap(e, "validate audience", &String::from_utf8_lossy(raw)))?;

        let token = self.generate_token(&audience).await?;
        token
            .encode()
            .map_err(|e| self.wrap(e, "serialize token", audience.as_str()))
    }

    /// Generate the token for an already validated audience, without encoding it.
    pub async fn generate_token(&self, audience: &Audience) -> Result<Token> {
        let cred = self
            .resolve_credential()
            .await
            .map_err(|e| self.wrap(e, "resolve credential", audience.as_str()))?;

        let mut parts = self
            .build_request(audience)
            .map_err(|e| self.wrap(e, "build request", audience.as_str()))?;

        let mut signer = RequestSigner::new(STS_SERVICE, self.config.region.as_str());
        if let Some(time) = self.time {
            signer = signer.with_time(time);
        }
        signer
            .sign_request(&mut parts, &cred)
            .map_err(|e| self.wrap(e, "sign request", audience.as_str()))?;

        let token = Token::from_parts(&parts)
            .map_err(|e| self.wrap(e, "serialize token", audience.as_str()))?;
        debug!(
            "generated token for audience {} in region {}",
            audience, self.config.region
        );
        Ok(token)
    }

    async fn resolve_credential(&self) -> Result<Credential> {
        let cred = self
            .config
            .credential_provider
            .provide_credential(&self.ctx)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::CredentialsUnavailable => e,
                _ => Error::credentials_unavailable("credential provider failed").with_source(e),
            })?;

        match cred {
            Some(cred) if cred.is_valid() => Ok(cred),
            Some(cred) => {
                debug!(
                    "credential is invalid or about to expire, expires_in: {:?}",
                    cred.expires_in
                );
                Err(Error::credentials_unavailable(
                    "credential is invalid or about to expire",
                ))
            }
            None => Err(Error::credentials_unavailable("no credential found")),
        }
    }

    /// Request skeleton: `POST https://sts.<region>.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15`
    fn build_request(&self, audience: &Audience) -> Result<Parts> {
        let host = self.config.region.sts_host();

        let (parts, _) = http::Request::post(format!("https://{host}/?{GET_CALLER_IDENTITY_QUERY}"))
            .header(header::HOST, &host)
            .header(X_GOOG_CLOUD_TARGET_RESOURCE, audience.target_resource())
            .body(())?
            .into_parts();
        Ok(parts)
    }

    fn wrap(&self, err: Error, stage: &str, audience: &str) -> Error {
        Error::new(err.kind(), "failed to generate token")
            .with_context("stage", stage)
            .with_context("audience", audience)
            .with_context("region", &self.config.region)
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Region;
    use aws_fed_id_aws_v4::StaticCredentialProvider;
    use pretty_assertions::assert_eq;

    fn generator(region: &str) -> TokenGenerator {
        let config = Config::default()
            .with_region(Region::parse(region).expect("region must be valid"))
            .with_credential_provider(StaticCredentialProvider::new("AK", "SK"));
        TokenGenerator::new(Context::new(), config)
    }

    #[test]
    fn test_build_request() -> Result<()> {
        let audience = Audience::try_from("https://example.com/api")?;
        let parts = generator("eu-west-1").build_request(&audience)?;

        assert_eq!(parts.method, http::Method::POST);
        assert_eq!(
            parts.uri.to_string(),
            "https://sts.eu-west-1.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15"
        );
        assert_eq!(
            parts
                .headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.to_str().expect("must be ascii")))
                .collect::<Vec<_>>(),
            vec![
                ("host", "sts.eu-west-1.amazonaws.com"),
                ("x-goog-cloud-target-resource", "example.com/api"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_wrap_keeps_kind_and_source() {
        let err = generator("ap-east-1").wrap(
            Error::serialization("boom"),
            "serialize token",
            "example.com",
        );

        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(err.message(), "failed to generate token");
        assert_eq!(err.context_value("stage"), Some("serialize token"));
        assert_eq!(err.context_value("audience"), Some("example.com"));
        assert_eq!(err.context_value("region"), Some("ap-east-1"));
        assert!(std::error::Error::source(&err)
            .expect("source must be kept")
            .to_string()
            .contains("boom"));
    }
}
