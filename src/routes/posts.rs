use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use tera::Tera;
use tracing::info;

use crate::error::AppError;
use crate::helpers::{page_context, RenderHtml};
use crate::models::post::CreatePost;
use crate::services::posts::{PostService, PostServiceDb};
use crate::session::{CurrentUser, MaybeUser};
use crate::state::AppState;

/// Largest accepted post submission, image included.
const UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

async fn index(
    State(posts): State<PostServiceDb>,
    State(tera): State<Arc<Tera>>,
    MaybeUser(current): MaybeUser,
) -> Result<Html<String>, AppError> {
    let feed = posts.feed().await?;

    let mut ctx = page_context(current.as_ref());
    ctx.insert("posts", &feed);
    tera.render_html("index.html", &ctx)
}

async fn create_form(
    State(tera): State<Arc<Tera>>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, AppError> {
    tera.render_html("create.html", &page_context(Some(&user)))
}

#[tracing::instrument(skip_all)]
async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut title = String::new();
    let mut content = String::new();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => title = field.text().await?,
            "content" => content = field.text().await?,
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                if !file_name.is_empty() {
                    image = state.uploads.save(&file_name, &bytes).await?;
                }
            }
            _ => {}
        }
    }

    let new_post = CreatePost::new(
        &user,
        title.trim().to_owned(),
        content.trim().to_owned(),
        image,
    );
    let created = state.posts.create_post(&new_post).await?;
    info!(post.id = created.id, user.id, "created post");

    Ok(Redirect::to("/"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route(
            "/create",
            get(create_form)
                .post(create_post)
                .layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
}
