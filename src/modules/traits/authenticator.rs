use crate::errors::CustomResult;

/// the hosted identity provider. passwords never leave it,
/// this crate only learns whether a sign up or sign in succeeded
pub trait Authenticator {
    fn sign_up(&self, email: &str, password: &str, username: &str) -> CustomResult<()>;

    /// fails with `Error::AuthenticationError` on bad credentials
    fn sign_in(&self, email: &str, password: &str) -> CustomResult<()>;
}
