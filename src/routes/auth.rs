use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tera::Tera;
use tracing::{debug, info};

use crate::helpers::{page_context, RenderHtml};
use crate::models::user::CreateUser;
use crate::services::users::{UserService, UserServiceDb};
use crate::session::{CurrentUser, MaybeUser, Session};
use crate::state::AppState;
use crate::AppError;

// Missing fields count as empty, like blank inputs.
#[derive(Deserialize, Default)]
pub struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl CredentialsForm {
    fn trimmed(&self) -> (&str, &str) {
        (self.username.trim(), self.password.trim())
    }
}

async fn register_form(
    State(tera): State<Arc<Tera>>,
    MaybeUser(current): MaybeUser,
) -> Result<Html<String>, AppError> {
    tera.render_html("register.html", &page_context(current.as_ref()))
}

#[tracing::instrument(skip_all)]
async fn register(
    State(users): State<UserServiceDb>,
    State(tera): State<Arc<Tera>>,
    MaybeUser(current): MaybeUser,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let (username, password) = form.trimmed();

    if !username.is_empty() && !password.is_empty() {
        // Read-then-write: two racing registrations can both pass this check,
        // the UNIQUE constraint on username rejects the loser.
        if users.find_by_username(username).await?.is_none() {
            let user = users
                .create_user(&CreateUser {
                    username: username.to_owned(),
                    password: password.to_owned(),
                })
                .await?;
            info!(user.id, username = %user.username, "registered user");
            return Ok(Redirect::to("/login").into_response());
        }
        debug!(username, "username already taken");
    }

    Ok(tera
        .render_html("register.html", &page_context(current.as_ref()))?
        .into_response())
}

async fn login_form(
    State(tera): State<Arc<Tera>>,
    MaybeUser(current): MaybeUser,
) -> Result<Html<String>, AppError> {
    tera.render_html("login.html", &page_context(current.as_ref()))
}

#[tracing::instrument(skip_all)]
async fn login(
    State(users): State<UserServiceDb>,
    State(tera): State<Arc<Tera>>,
    session: Session,
    MaybeUser(current): MaybeUser,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let (username, password) = form.trimmed();

    match users.find_by_credentials(username, password).await? {
        Some(user) => {
            info!(user.id, "user logged in");
            Ok((session.login(&user), Redirect::to("/")).into_response())
        }
        None => {
            info!(username, "login rejected");
            Ok(tera
                .render_html("login.html", &page_context(current.as_ref()))?
                .into_response())
        }
    }
}

async fn logout(CurrentUser(user): CurrentUser, session: Session) -> impl IntoResponse {
    info!(user.id, "user logged out");
    (session.logout(), Redirect::to("/"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}
