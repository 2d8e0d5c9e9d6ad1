use super::{example_credential, example_signer, sign, signature};
use anyhow::Result;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case("GET", "/", &[], "7ab4567ae243ee168f6bf18206b2b40b61ce08277323168138fa113ed23c538e"; "get-vanilla")]
#[test_case("POST", "/", &[], "2a67e472830488f8f5af212097cff81a82fc54f436e7033de3d5aac92cc144c6"; "post-vanilla")]
#[test_case("GET", "/?Param2=value2&Param1=value1", &[], "ca0a842792a27475df455b2925aa79d50a98e27d1733a46b57c22810e6b1a7bc"; "get-vanilla-query-order-key-case")]
#[test_case("GET", "/?Param1=value1", &[], "e4e9c34069ce029c0a00daa7957e40cefc9ceabe113c59b41a36391d58f06634"; "get-vanilla-query")]
#[test_case("POST", "/?Param1=value1", &[], "fe951ec8872f7a98ef5cbd24b7f78747b6203301401df45ab624b88777b9c480"; "post-vanilla-query")]
#[test_case("GET", "/%E1%88%B4", &[], "8dc88059693cc237b09c1ed293e3b0c3a581d7f1f77a9eb91d3995b7740d62c3"; "get-utf8")]
#[test_case("GET", "/", &[("My-Header1", " value1"), ("My-Header2", "\"a   b   c\"")], "5e097816546ff8f99e2de1707197ad084de13c4d506a7217a5cffd9976739ab8"; "get-header-value-trim")]
fn test_fixed_clock_signature(method: &str, path: &str, headers: &[(&str, &str)], expected: &str) {
    let parts = sign(
        &example_signer(),
        method,
        &format!("https://example.amazon.com{path}"),
        headers,
        &example_credential(),
    )
    .expect("sign must succeed");

    assert_eq!(signature(&parts).expect("signature must exist"), expected);
}

#[test]
fn test_authorization_layout() -> Result<()> {
    let parts = sign(
        &example_signer(),
        "GET",
        "https://example.amazon.com/",
        &[],
        &example_credential(),
    )?;

    assert_eq!(
        parts.headers.get("authorization").map(|v| v.as_bytes()),
        Some(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, SignedHeaders=host;x-amz-date, Signature=7ab4567ae243ee168f6bf18206b2b40b61ce08277323168138fa113ed23c538e"
                .as_bytes()
        )
    );
    Ok(())
}

#[test]
fn test_session_token_is_signed() -> Result<()> {
    let mut cred = example_credential();
    cred.session_token = Some("AQoDYXdzEPT//////////wEXAMPLE".to_string());

    let parts = sign(
        &example_signer(),
        "POST",
        "https://example.amazon.com/",
        &[],
        &cred,
    )?;

    let authorization = parts
        .headers
        .get("authorization")
        .expect("authorization must exist")
        .to_str()?;
    assert!(authorization.contains("SignedHeaders=host;x-amz-date;x-amz-security-token,"));
    assert_eq!(
        parts.headers.get("x-amz-security-token").map(|v| v.as_bytes()),
        Some("AQoDYXdzEPT//////////wEXAMPLE".as_bytes())
    );
    Ok(())
}
