//! SMTP `LOGIN` authentication

use std::fmt;

use thiserror::Error;

/// Prompt a relay sends when it wants the username
pub const USERNAME_PROMPT: &str = "Username:";

/// Prompt a relay sends when it wants the password
pub const PASSWORD_PROMPT: &str = "Password:";

/// The relay sent a challenge the mechanism does not recognise
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown prompt from server: {0:?}")]
pub struct AuthProtocolError(pub String);

/// A SASL-style challenge/response authentication mechanism.
///
/// Responses are plain text; base64 wrapping is the transport's job.
pub trait SmtpAuthenticator {
    /// Returns the mechanism name and the optional initial response.
    fn start(&self) -> (&'static str, Option<String>);

    /// Answers a decoded server challenge.
    ///
    /// `more` is `true` while the server is still expecting a response.
    fn next(&self, challenge: &str, more: bool) -> Result<Option<String>, AuthProtocolError>;
}

/// `LOGIN` mechanism, as required by relays such as Office 365
#[derive(Clone)]
pub struct LoginAuth {
    username: String,
    password: String,
}

impl LoginAuth {
    /// Creates a new `LOGIN` authenticator
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for LoginAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginAuth")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

impl SmtpAuthenticator for LoginAuth {
    fn start(&self) -> (&'static str, Option<String>) {
        ("LOGIN", Some(self.username.clone()))
    }

    fn next(&self, challenge: &str, more: bool) -> Result<Option<String>, AuthProtocolError> {
        if !more {
            return Ok(None);
        }

        match challenge {
            USERNAME_PROMPT => Ok(Some(self.username.clone())),
            PASSWORD_PROMPT => Ok(Some(self.password.clone())),
            other => Err(AuthProtocolError(other.to_string())),
        }
    }
}
