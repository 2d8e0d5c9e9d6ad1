use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use aws_fed_id_core::{Context, Error, ProvideCredential, Result};
use ini::{Ini, Properties};
use log::debug;

/// ProfileCredentialProvider loads AWS credentials from configuration files.
///
/// This provider loads credentials from:
/// - `~/.aws/credentials` (or the path specified by `AWS_SHARED_CREDENTIALS_FILE`)
/// - `~/.aws/config` (or the path specified by `AWS_CONFIG_FILE`)
///
/// The profile to use is determined by:
/// 1. The profile specified via `with_profile()`
/// 2. The `AWS_PROFILE` environment variable
/// 3. Default to "default"
///
/// Missing or unreadable files are skipped; a file that exists but is not
/// valid INI is reported as an error.
#[derive(Debug, Default, Clone)]
pub struct ProfileCredentialProvider {
    profile: Option<String>,
    config_file: Option<String>,
    credentials_file: Option<String>,
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile name to use.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the path to the config file.
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Set the path to the credentials file.
    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    fn profile(&self, ctx: &Context) -> String {
        self.profile
            .clone()
            .or_else(|| ctx.env_var(AWS_PROFILE))
            .unwrap_or_else(|| "default".to_string())
    }

    async fn load_ini(
        &self,
        ctx: &Context,
        configured: Option<&String>,
        env_key: &str,
        fallback: &str,
    ) -> Result<Option<Ini>> {
        let path = configured
            .cloned()
            .or_else(|| ctx.env_var(env_key))
            .unwrap_or_else(|| fallback.to_string());

        let Some(expanded_path) = ctx.expand_home_dir(&path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&expanded_path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read {expanded_path}: {err}");
                return Ok(None);
            }
        };

        let conf = Ini::load_from_str(&content).map_err(|e| {
            Error::credentials_unavailable("failed to parse aws profile file")
                .with_context("path", &expanded_path)
                .with_source(anyhow::Error::new(e))
        })?;
        Ok(Some(conf))
    }

    async fn load_from_credentials_file(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<Credential>> {
        let Some(conf) = self
            .load_ini(
                ctx,
                self.credentials_file.as_ref(),
                AWS_SHARED_CREDENTIALS_FILE,
                "~/.aws/credentials",
            )
            .await?
        else {
            return Ok(None);
        };

        match conf.section(Some(profile)) {
            Some(props) => Ok(credential_from_properties(props)),
            None => {
                debug!("profile {profile} not found in credentials file");
                Ok(None)
            }
        }
    }

    async fn load_from_config_file(
        &self,
        ctx: &Context,
        profile: &str,
    ) -> Result<Option<Credential>> {
        let Some(conf) = self
            .load_ini(ctx, self.config_file.as_ref(), AWS_CONFIG_FILE, "~/.aws/config")
            .await?
        else {
            return Ok(None);
        };

        let section = match profile {
            "default" => "default".to_string(),
            x => format!("profile {x}"),
        };

        match conf.section(Some(section.as_str())) {
            Some(props) => Ok(credential_from_properties(props)),
            None => {
                debug!("section {section} not found in config file");
                Ok(None)
            }
        }
    }
}

fn credential_from_properties(props: &Properties) -> Option<Credential> {
    let access_key_id = props.get("aws_access_key_id")?;
    let secret_access_key = props.get("aws_secret_access_key")?;

    Some(Credential {
        access_key_id: access_key_id.to_string(),
        secret_access_key: secret_access_key.to_string(),
        session_token: props
            .get("aws_session_token")
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string()),
        expires_in: None,
    })
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let profile = self.profile(ctx);

        // Try credentials file first
        if let Some(cred) = self.load_from_credentials_file(ctx, &profile).await? {
            return Ok(Some(cred));
        }

        // Then try config file
        self.load_from_config_file(ctx, &profile).await
    }
}
