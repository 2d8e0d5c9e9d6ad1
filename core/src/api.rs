use crate::{Context, Result};
use std::fmt::Debug;
use std::sync::Arc;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the signing credential is valid.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential is the trait used to resolve credentials on demand.
///
/// Implementations may block on I/O and may cache or refresh internally. The
/// token generator calls a provider exactly once per generated token and never
/// keeps the returned credential around.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Resolve a credential from the given context.
    ///
    /// Returns `Ok(None)` when this provider has nothing to offer, so that a
    /// chain can move on to the next one.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

#[async_trait::async_trait]
impl<T: ProvideCredential + ?Sized> ProvideCredential for Arc<T> {
    type Credential = T::Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.as_ref().provide_credential(ctx).await
    }
}

/// SignRequest is the trait used by signer to sign the request.
///
/// Signing is pure computation: it reads the request and the credential and
/// writes the signature headers back, without any I/O.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place with the given credential.
    fn sign_request(
        &self,
        req: &mut http::request::Parts,
        credential: &Self::Credential,
    ) -> Result<()>;
}
