use crate::canonical::CanonicalRequest;
use crate::constants::{AWS4_HMAC_SHA256, AWS4_REQUEST, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};
use crate::signing_key::SigningKey;
use crate::Credential;
use aws_fed_id_core::hash::{hex_sha256, EMPTY_STRING_SHA256};
use aws_fed_id_core::time::{format_date, format_iso8601, now, DateTime};
use aws_fed_id_core::{Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use std::fmt::Write;

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// Only header based signing of requests without body is supported: the
/// payload hash is always the hash of the empty string.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

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

    /// Sign the request in place.
    ///
    /// Adds `x-amz-date`, `x-amz-security-token` (if the credential carries a
    /// session token) and finally `authorization`. Every other header already
    /// present on the request is signed as well.
    pub fn sign(&self, req: &mut SigningRequest, cred: &Credential) -> Result<()> {
        let now = self.time.unwrap_or_else(now);

        canonicalize_header(req, cred, now)?;

        let creq = CanonicalRequest::build(req, EMPTY_STRING_SHA256)?;
        debug!("calculated canonical request: {creq}");

        let scope = credential_scope(now, &self.region, &self.service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(now, &scope, &creq)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signature = SigningKey::derive(
            &cred.secret_access_key,
            &format_date(now),
            &self.region,
            &self.service,
        )?
        .sign(&string_to_sign)?;

        let mut authorization = HeaderValue::from_str(&format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            AWS4_HMAC_SHA256,
            cred.access_key_id,
            scope,
            creq.signed_headers(),
            signature
        ))
        .map_err(|e| {
            Error::serialization("failed to create authorization header")
                .with_source(anyhow::Error::new(e))
        })?;
        authorization.set_sensitive(true);

        req.headers.insert(header::AUTHORIZATION, authorization);
        Ok(())
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(&self, req: &mut Parts, credential: &Self::Credential) -> Result<()> {
        let mut signed_req = SigningRequest::build(req)?;
        self.sign(&mut signed_req, credential)?;

        // Apply to the request.
        signed_req.apply(req)
    }
}

/// Scope: `20220313/<region>/<service>/aws4_request`
pub fn credential_scope(time: DateTime, region: &str, service: &str) -> String {
    format!("{}/{}/{}/{}", format_date(time), region, service, AWS4_REQUEST)
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(time: DateTime, scope: &str, creq: &CanonicalRequest) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{}", format_iso8601(time))?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(creq.to_string().as_bytes()))?;
    Ok(f)
}

fn canonicalize_header(ctx: &mut SigningRequest, cred: &Credential, now: DateTime) -> Result<()> {
    // A previous signature must never be signed over.
    if ctx.headers.contains_key(header::AUTHORIZATION) {
        ctx.headers.remove(header::AUTHORIZATION);
    }

    // Insert HOST header if not present.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers.insert(
            header::HOST,
            ctx.authority.as_str().parse().map_err(|e| {
                Error::validation("failed to parse authority as header value")
                    .with_source(anyhow::Error::new(e))
            })?,
        );
    }

    // Date header must match the time used in the scope.
    ctx.headers
        .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now)).map_err(|e| {
            Error::internal_signing("failed to create date header")
                .with_source(anyhow::Error::new(e))
        })?);

    // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token).map_err(|e| {
            Error::serialization("failed to create security token header")
                .with_source(anyhow::Error::new(e))
        })?;
        // Set token value sensitive to valid leaking.
        value.set_sensitive(true);

        ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}
