#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub use aws_fed_id_core::*;

/// AWS SigV4 signing and credential providers.
pub mod aws {
    pub use aws_fed_id_aws_v4::*;
}

mod audience;
pub use audience::Audience;

mod config;
pub use config::{Config, AWS_DEFAULT_REGION, AWS_REGION};

mod context;
pub use context::default_context;

mod generator;
pub use generator::{TokenGenerator, X_GOOG_CLOUD_TARGET_RESOURCE};

mod region;
pub use region::{Region, DEFAULT_REGION};

mod token;
pub use token::{Token, TokenHeader};
