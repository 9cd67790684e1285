//! Session cookie handling and the login guard.
//!
//! The session is a single signed cookie carrying the id of the logged-in user.
//! Handlers never touch the cookie jar directly; they go through [`Session`],
//! [`CurrentUser`] (redirects anonymous visitors to the login page) or
//! [`MaybeUser`].

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use tracing::warn;

use crate::error::AppError;
use crate::models::user::User;
use crate::services::users::UserService;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

pub struct Session {
    jar: SignedCookieJar,
}

impl Session {
    /// Id stored in a validly signed session cookie, if any.
    pub fn user_id(&self) -> Option<i32> {
        let cookie = self.jar.get(SESSION_COOKIE)?;
        match cookie.value().parse() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(%e, "malformed user id in session cookie");
                None
            }
        }
    }

    pub fn login(self, user: &User) -> SignedCookieJar {
        let cookie = Cookie::build((SESSION_COOKIE, user.id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        self.jar.add(cookie)
    }

    pub fn logout(self) -> SignedCookieJar {
        self.jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }

    /// Loads the user the session points at. A session naming a user that no
    /// longer exists counts as anonymous.
    pub async fn user<U: UserService>(&self, users: &U) -> anyhow::Result<Option<User>> {
        match self.user_id() {
            Some(id) => users.find_by_id(id).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_request_parts(parts, state).await?;
        Ok(Self { jar })
    }
}

/// Guard for routes that need a logged-in user.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = match Session::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };

        match session.user(&state.users).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => Err(login_redirect(parts).into_response()),
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}

/// The logged-in user when there is one; never rejects anonymous visitors.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = match Session::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };
        Ok(Self(session.user(&state.users).await?))
    }
}

fn login_redirect(parts: &Parts) -> Redirect {
    Redirect::to(&format!("/login?next={}", parts.uri.path()))
}
