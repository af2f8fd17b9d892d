use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::errors::AppError;
use crate::models::user::{Role, User};

pub const SESSION_COOKIE: &str = "session";

/// Identity snapshot carried in the session cookie. Taken at login and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Seals and unseals the session cookie.
///
/// The cookie value is the JSON `SessionUser` under AES-256-GCM, so it is both
/// encrypted and authenticated. Anything that fails to decrypt or parse reads as
/// no session at all.
#[derive(Clone)]
pub struct SessionCodec {
    key: Key,
    secure: bool,
    ttl: time::Duration,
}

impl SessionCodec {
    /// `secret` is stretched to the 64 bytes `Key` needs with SHA-512.
    pub fn new(secret: &str, secure: bool, ttl_days: i64) -> Self {
        let digest = Sha512::digest(secret.as_bytes());
        Self {
            key: Key::from(digest.as_slice()),
            secure,
            ttl: time::Duration::days(ttl_days),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Resolves the session straight from request headers.
    pub fn read(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let jar = PrivateCookieJar::from_headers(headers, self.key.clone());
        self.unseal(&jar)
    }

    pub fn unseal(&self, jar: &PrivateCookieJar) -> Option<SessionUser> {
        let cookie = jar.get(SESSION_COOKIE)?;
        serde_json::from_str(cookie.value()).ok()
    }

    pub fn seal(
        &self,
        jar: PrivateCookieJar,
        user: &SessionUser,
    ) -> Result<PrivateCookieJar, AppError> {
        let payload = serde_json::to_string(user).map_err(|e| AppError::Internal(e.into()))?;
        let cookie = Cookie::build((SESSION_COOKIE, payload))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(self.ttl);
        Ok(jar.add(cookie))
    }

    pub fn clear(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}
