use axum::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::models::post::*;
use crate::schema::{post, user};

use super::{Pool, Svc};

#[async_trait]
pub trait PostService<E = anyhow::Error>: Svc {
    /// Every post, newest first, with the author's username when it still resolves.
    async fn feed(&self) -> Result<Vec<FeedEntry>, E>;
    async fn create_post(&self, post: &CreatePost) -> Result<Post, E>;
}

#[derive(Clone)]
pub struct PostServiceDb {
    db: Pool,
}

impl Svc for PostServiceDb {}

#[async_trait]
impl PostService<anyhow::Error> for PostServiceDb {
    async fn feed(&self) -> anyhow::Result<Vec<FeedEntry>> {
        let mut conn = self.db.get().await?;

        let rows: Vec<(Post, Option<String>)> = post::table
            .left_join(user::table)
            .select((Post::as_select(), user::username.nullable()))
            .order((post::date.desc(), post::id.desc()))
            .load(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(p, author)| FeedEntry::new(p, author))
            .collect())
    }

    async fn create_post(&self, p: &CreatePost) -> anyhow::Result<Post> {
        let mut conn = self.db.get().await?;

        let created = diesel::insert_into(post::table)
            .values(p)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(created)
    }
}

impl PostServiceDb {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }
}
