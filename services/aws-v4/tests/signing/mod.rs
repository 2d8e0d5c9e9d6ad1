mod special_chars;
mod standard;

use aws_fed_id_aws_v4::{Credential, RequestSigner};
use aws_fed_id_core::time::DateTime;
use aws_fed_id_core::SignRequest;
use chrono::{TimeZone, Utc};
use http::request::Parts;
use http::Request;

/// Example credential from the AWS SigV4 documentation.
pub fn example_credential() -> Credential {
    Credential {
        access_key_id: "AKIDEXAMPLE".to_string(),
        secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
        session_token: None,
        expires_in: None,
    }
}

/// `20150830T123600Z`
pub fn example_time() -> DateTime {
    Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
}

pub fn example_signer() -> RequestSigner {
    let _ = env_logger::builder().is_test(true).try_init();
    RequestSigner::new("service", "us-east-1").with_time(example_time())
}

/// Sign a request without body and return its parts.
pub fn sign(
    signer: &RequestSigner,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    cred: &Credential,
) -> anyhow::Result<Parts> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    let (mut parts, _) = builder.body(())?.into_parts();
    signer.sign_request(&mut parts, cred)?;
    Ok(parts)
}

pub fn signature(parts: &Parts) -> anyhow::Result<String> {
    let authorization = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| anyhow::anyhow!("authorization is missing"))?
        .to_str()?;
    let (_, signature) = authorization
        .rsplit_once("Signature=")
        .ok_or_else(|| anyhow::anyhow!("signature is missing"))?;
    Ok(signature.to_string())
}
