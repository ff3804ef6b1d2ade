//! API credentials and their `Basic` authorization encoding

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Authorization scheme prefix attached to every request
const AUTH_SCHEME: &str = "Basic";

/// Username/password pair used to authenticate against the scraping API
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    username: String,
    password: String,
}

impl ApiCredentials {
    /// Create credentials from a username and password
    ///
    /// # Example
    /// ```
    /// use scrapi_core::ApiCredentials;
    ///
    /// let credentials = ApiCredentials::new("user", "pass");
    /// assert_eq!(credentials.encoded(), "dXNlcjpwYXNz");
    /// ```
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Account name sent to the backend
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Base64 encoding of `username:password`
    pub fn encoded(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// Full value for the `Authorization` header
    pub fn authorization_header(&self) -> String {
        format!("{} {}", AUTH_SCHEME, self.encoded())
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
