use log::{info, warn};
use serde::Serialize;

use crate::errors::{AuthenticationSnafu, CustomResult, Error, MissingFieldSnafu, UnauthorizedSnafu};
use crate::models::NewUser;
use crate::modules::models::user::User;
use crate::modules::traits::authenticator::Authenticator;
use crate::modules::traits::user_directory::UserDirectory;

const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

/// what a participant types in to log in. either username or email is enough
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// the logged in user. created by `login`, gone after `logout`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

fn required(value: &str, field: &str) -> CustomResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return MissingFieldSnafu { field }.fail();
    }
    Ok(value.to_string())
}

/// # register a new user
/// sign the user up with the identity provider and store the user row.
/// registering does not log the user in
///
/// ## Arguments
/// * `auth` - the identity provider
/// * `users` - where user rows are stored
/// * `username` - the name shown on leaderboards
/// * `email` - the login email
/// * `password` - handed to the identity provider only
///
/// ## Returns
/// * `User` - the stored user
pub fn register<A, U>(auth: &A, users: &mut U, username: &str, email: &str, password: &str) -> CustomResult<User>
where
    A: Authenticator + ?Sized,
    U: UserDirectory + ?Sized,
{
    let username = required(username, "username")?;
    let email = required(email, "email")?;
    if password.is_empty() {
        return MissingFieldSnafu { field: "password" }.fail();
    }

    if users.find_user_by_username(&username)?.is_some() {
        warn!(target: "session:register", "username {} is already taken", username);
        return AuthenticationSnafu { reason: format!("username {username} is already taken") }.fail();
    }

    auth.sign_up(&email, password, &username)?;
    let user = users.insert_user(NewUser {
        username,
        email,
        is_admin: false,
    })?;

    info!(target: "session:register", "registered user {}", user.username);
    Ok(user)
}

impl SessionContext {
    /// # log in
    /// a username without an email is looked up to find the email to sign in with.
    /// the admin flag comes from the stored user row
    ///
    /// ## Arguments
    /// * `auth` - the identity provider
    /// * `users` - where user rows are stored
    /// * `credentials` - username or email, and the password
    ///
    /// ## Returns
    /// * `SessionContext` - the session of the logged in user
    pub fn login<A, U>(auth: &A, users: &mut U, credentials: &Credentials) -> CustomResult<SessionContext>
    where
        A: Authenticator + ?Sized,
        U: UserDirectory + ?Sized,
    {
        if credentials.password.is_empty() {
            return MissingFieldSnafu { field: "password" }.fail();
        }

        let username = credentials.username.trim();
        let email = credentials.email.trim();
        let email = match (username.is_empty(), email.is_empty()) {
            (true, true) => return MissingFieldSnafu { field: "username or email" }.fail(),
            (false, true) => match users.find_user_by_username(username)? {
                Some(user) => user.email,
                None => {
                    warn!(target: "session:login", "unknown username {}", username);
                    return Err(Error::not_found("user", username));
                }
            },
            (_, false) => email.to_string(),
        };

        if let Err(error) = auth.sign_in(&email, &credentials.password) {
            warn!(target: "session:login", "sign in failed for {}: {}", email, error);
            return Err(error);
        }

        let user = match users.find_user_by_email(&email)? {
            Some(user) => user,
            None => return Err(Error::not_found("user", email)),
        };

        info!(target: "session:login", "{} logged in (admin: {})", user.username, user.is_admin);
        Ok(SessionContext {
            user_id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        })
    }

    /// end the session, the context cannot be used afterwards
    pub fn logout(self) {
        info!(target: "session:logout", "{} logged out", self.username);
    }

    pub fn require_admin(&self, action: &str) -> CustomResult<()> {
        if !self.is_admin {
            warn!(target: "session:require_admin", "{} tried to {} without admin rights", self.username, action);
            return UnauthorizedSnafu { username: self.username.as_str(), action }.fail();
        }
        Ok(())
    }

    /// the name stored with submitted times
    pub fn display_name(&self) -> String {
        [self.username.trim(), self.email.trim()]
            .into_iter()
            .find(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_DISPLAY_NAME)
            .to_string()
    }
}
