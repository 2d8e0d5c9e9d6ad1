use std::sync::Arc;

use aws_fed_id_aws_v4::{Credential, DefaultCredentialProvider};
use aws_fed_id_core::{Context, ProvideCredential, Result};
use log::debug;

use crate::Region;

/// Env name of the region.
pub const AWS_REGION: &str = "AWS_REGION";
/// Env name of the region, used when `AWS_REGION` is not set.
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";

/// Config for [`crate::TokenGenerator`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Region of the STS endpoint and of the signing scope.
    ///
    /// Default to `us-east-1`.
    pub region: Region,
    /// Source of the credential, queried once per generated token.
    ///
    /// Default to [`DefaultCredentialProvider`].
    pub credential_provider: Arc<dyn ProvideCredential<Credential = Credential>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::default(),
            credential_provider: Arc::new(DefaultCredentialProvider::new()),
        }
    }
}

impl Config {
    /// Set the region.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Set the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.credential_provider = Arc::new(provider);
        self
    }

    /// Load the region from env.
    ///
    /// `AWS_REGION` is preferred over `AWS_DEFAULT_REGION`; empty values are
    /// ignored. Keeps the current region if neither is set.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        let region = [AWS_REGION, AWS_DEFAULT_REGION]
            .into_iter()
            .find_map(|key| ctx.env_var(key).filter(|v| !v.is_empty()).map(|v| (key, v)));

        if let Some((key, value)) = region {
            debug!("load region {value} from env {key}");
            self.region = Region::parse(&value).map_err(|e| e.with_context("env", key))?;
        }

        Ok(self)
    }
}
