//! AWS SigV4 signing for requests without body.
//!
//! This crate builds the canonical request, derives the signing key and
//! attaches the `authorization` header to an [`http::request::Parts`].
//!
//! ## Example
//!
//! ```no_run
//! use aws_fed_id_aws_v4::{Credential, RequestSigner};
//! use aws_fed_id_core::{Result, SignRequest};
//!
//! fn main() -> Result<()> {
//!     let (mut parts, _) = http::Request::post(
//!         "https://sts.us-east-1.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15",
//!     )
//!     .body(())?
//!     .into_parts();
//!
//!     let cred = Credential {
//!         access_key_id: "AKIDEXAMPLE".to_string(),
//!         secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
//!         ..Default::default()
//!     };
//!
//!     RequestSigner::new("sts", "us-east-1").sign_request(&mut parts, &cred)?;
//!     assert!(parts.headers.contains_key(http::header::AUTHORIZATION));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod constants;
pub use constants::{X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};

mod canonical;
pub use canonical::CanonicalRequest;

mod credential;
pub use credential::Credential;

mod signing_key;
pub use signing_key::SigningKey;

mod sign_request;
pub use sign_request::{credential_scope, string_to_sign, RequestSigner};

mod provide_credential;
pub use provide_credential::*;
