//! The current session, passed explicitly to the code that needs to know who is logged in.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::auth::{UserID, cookie::get_token_from_cookies};

/// A logged in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserID,
}

/// Answers "who is logged in?" for the transaction service.
///
/// Every transaction query is scoped to the user of the current session.
pub trait SessionProvider {
    /// The session of the logged in user, or `None` if nobody is logged in.
    fn current_session(&self) -> Option<Session>;
}

/// A fixed session, e.g. for background work or tests.
impl SessionProvider for Option<Session> {
    fn current_session(&self) -> Option<Session> {
        *self
    }
}

/// The session read from the auth cookie of a request.
///
/// Extracting it never fails: a request without a valid auth cookie simply
/// has no session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CookieSession(Option<Session>);

impl CookieSession {
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        let session = get_token_from_cookies(jar)
            .ok()
            .map(|token| Session {
                user_id: token.user_id,
            });

        Self(session)
    }
}

impl SessionProvider for CookieSession {
    fn current_session(&self) -> Option<Session> {
        self.0
    }
}

impl<S> FromRequestParts<S> for CookieSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;

        Ok(Self::from_jar(&jar))
    }
}
