use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{error, warn};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

use crate::modules::helpers::config::Config;

/// A request that carried the configured admin credentials.
#[derive(Debug)]
pub struct AdminUser {
    pub username: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// no admin credentials are configured, the admin surface stays closed
    NotConfigured,
    Missing,
    Invalid,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::NotConfigured => write!(f, "Admin credentials are not set"),
            AuthError::Missing => write!(f, "Auth required"),
            AuthError::Invalid => write!(f, "Invalid credentials"),
        }
    }
}

/// the failure of the admin guard for this request, read back by the catchers
pub struct AuthFailure(pub Option<AuthError>);

/// # parse a basic auth header
/// `Basic base64(user:pass)`. the password may contain colons.
///
/// ## Returns
/// * `Option<(String, String)>` - the user and password, `None` if the header is not valid basic auth
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let (scheme, token) = header.split_once(' ')?;
    if scheme != "Basic" || token.is_empty() {
        return None;
    }

    let decoded = STANDARD.decode(token).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;

    Some((user.to_string(), pass.to_string()))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let credentials = request
            .rocket()
            .state::<Config>()
            .and_then(|config| config.admin_credentials());

        let (user, pass) = match credentials {
            Some(credentials) => credentials,
            None => {
                error!(target:"guards/admin:from_request", "Admin credentials are not set, refusing {}", request.uri());
                request.local_cache(|| AuthFailure(Some(AuthError::NotConfigured)));
                return Outcome::Error((Status::InternalServerError, AuthError::NotConfigured));
            }
        };

        match request.headers().get_one("Authorization").and_then(parse_basic_auth) {
            Some((given_user, given_pass)) if given_user == user && given_pass == pass => {
                Outcome::Success(AdminUser { username: given_user })
            }
            Some((given_user, _)) => {
                warn!(target:"guards/admin:from_request", "Rejected admin login for {}", given_user);
                Outcome::Error((Status::Unauthorized, AuthError::Invalid))
            }
            None => Outcome::Error((Status::Unauthorized, AuthError::Missing)),
        }
    }
}
