// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use super::{example_credential, example_signer, sign, signature};
use anyhow::Result;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

#[test]
fn test_path_with_special_characters() -> Result<()> {
    let path = utf8_percent_encode("!@#$%^&*()_+-=;:'><,?.txt", NON_ALPHANUMERIC).to_string();

    let parts = sign(
        &example_signer(),
        "GET",
        &format!("https://example.amazon.com/{path}"),
        &[],
        &example_credential(),
    )?;

    assert_eq!(signature(&parts)?.len(), 64);
    // The wire path is kept as given.
    assert_eq!(parts.uri.path(), format!("/{path}"));
    Ok(())
}

#[test]
fn test_equivalent_query_encodings_sign_the_same() -> Result<()> {
    let signer = example_signer();
    let cred = example_credential();

    let plus = sign(&signer, "GET", "https://example.amazon.com/?q=a+b", &[], &cred)?;
    let percent = sign(&signer, "GET", "https://example.amazon.com/?q=a%20b", &[], &cred)?;
    assert_eq!(signature(&plus)?, signature(&percent)?);
    Ok(())
}

#[test]
fn test_unicode_path_is_encoded() -> Result<()> {
    let path = utf8_percent_encode("测试文件.txt", NON_ALPHANUMERIC).to_string();

    let parts = sign(
        &example_signer(),
        "GET",
        &format!("https://example.amazon.com/{path}"),
        &[],
        &example_credential(),
    )?;
    assert_eq!(signature(&parts)?.len(), 64);
    Ok(())
}

#[test]
fn test_invalid_utf8_path_is_rejected() {
    let err = sign(
        &example_signer(),
        "GET",
        "https://example.amazon.com/%C3%28",
        &[],
        &example_credential(),
    )
    .expect_err("invalid utf-8 must be rejected");

    let err = err
        .downcast::<aws_fed_id_core::Error>()
        .expect("must be a signing error");
    assert_eq!(err.kind(), aws_fed_id_core::ErrorKind::Validation);
}
