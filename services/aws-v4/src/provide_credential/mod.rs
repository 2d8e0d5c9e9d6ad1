//! Credential providers for AWS.
//!
//! Every provider returns `Ok(None)` when its source holds no credential, so
//! they can be combined with [`aws_fed_id_core::ProvideCredentialChain`].

mod default;
pub use default::DefaultCredentialProvider;

mod env;
pub use env::EnvCredentialProvider;

mod profile;
pub use profile::ProfileCredentialProvider;

mod r#static;
pub use r#static::StaticCredentialProvider;
