use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::models::user::User;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::post)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub date: NaiveDateTime,
    pub user_id: i32,
}

impl CreatePost {
    /// A post owned by `author`, stamped with the current UTC time.
    pub fn new(author: &User, title: String, content: String, image: Option<String>) -> Self {
        Self {
            title,
            content,
            image,
            date: Utc::now().naive_utc(),
            user_id: author.id,
        }
    }
}

#[derive(Serialize, Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = crate::schema::post)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub date: NaiveDateTime,
    pub user_id: i32,
}

// a post as shown on the feed, with its author resolved
#[derive(Serialize, Debug, Clone)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<String>,
    pub posted_at: String,
}

impl FeedEntry {
    pub fn new(post: Post, author: Option<String>) -> Self {
        let posted_at = post.date.format("%Y-%m-%d %H:%M").to_string();
        Self {
            post,
            author,
            posted_at,
        }
    }
}
