use std::sync::Arc;

use anyhow::anyhow;
use axum_extra::extract::cookie::Key;
use axum_macros::FromRef;
use tera::Tera;

use crate::config::AppCfg;
use crate::services::{self, posts::PostServiceDb, users::UserServiceDb};
use crate::uploads::UploadStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub users: UserServiceDb,
    pub posts: PostServiceDb,
    pub tera: Arc<Tera>,
    pub uploads: UploadStore,
    /// Signs the session cookie.
    pub key: Key,
}

impl AppState {
    /// Prepares the database, upload directory, templates and signing key.
    pub async fn build(cfg: &AppCfg) -> anyhow::Result<Self> {
        let key = Key::try_from(cfg.secret_key.as_bytes())
            .map_err(|e| anyhow!("secret_key is unusable as a signing key: {e}"))?;

        let uploads = UploadStore::new(&cfg.upload_dir);
        uploads.ensure_dir().await?;

        let pool = services::connect(&cfg.database_url, cfg.db_pool_size).await?;
        let tera = Tera::new(&cfg.templates)?;

        Ok(Self {
            users: UserServiceDb::new(pool.clone()),
            posts: PostServiceDb::new(pool),
            tera: Arc::new(tera),
            uploads,
            key,
        })
    }
}
