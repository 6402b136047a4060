//! Identity provider abstraction.
//!
//! The engine never knows how a user is authenticated; it asks the provider
//! for an anonymous, stable [`UserId`] once at session start and namespaces
//! every store operation by it.

use crate::types::UserId;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during identity bootstrap.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The identity service could not be reached.
    #[error("Identity service unavailable: {0}")]
    Unavailable(String),

    /// The identity service refused to issue an anonymous identity
    /// (quota exhausted, provider disabled, and the like).
    #[error("Anonymous sign-in denied: {0}")]
    Denied(String),
}

/// Issues anonymous user identities.
///
/// # Dyn Compatibility
///
/// This trait uses an explicit `Pin<Box<dyn Future>>` return instead of
/// `async fn` to enable trait object usage (`Arc<dyn IdentityProvider>`).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to be shared across async tasks.
pub trait IdentityProvider: Send + Sync {
    /// Establish an anonymous session and return its stable user identifier.
    ///
    /// Called once at session start. The returned [`UserId`] is never empty.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unavailable`]: network failure reaching the provider
    /// - [`AuthError::Denied`]: the provider refused to issue an identity
    fn sign_in_anonymously(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<UserId, AuthError>> + Send + '_>>;
}
