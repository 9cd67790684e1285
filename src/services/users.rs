use axum::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::models::user::*;
use crate::schema::user;

use super::{Pool, Svc};

#[async_trait]
pub trait UserService<E = anyhow::Error>: Svc {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, E>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, E>;
    /// Exact, plain-text match on both username and password.
    async fn find_by_credentials(&self, username: &str, password: &str)
        -> Result<Option<User>, E>;
    async fn create_user(&self, user: &CreateUser) -> Result<User, E>;
}

#[derive(Clone)]
pub struct UserServiceDb {
    db: Pool,
}

impl Svc for UserServiceDb {}

#[async_trait]
impl UserService<anyhow::Error> for UserServiceDb {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let mut conn = self.db.get().await?;
        let found = user::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let mut conn = self.db.get().await?;
        let found = user::table
            .filter(user::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        let mut conn = self.db.get().await?;
        let found = user::table
            .filter(user::username.eq(username))
            .filter(user::password.eq(password))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn create_user(&self, u: &CreateUser) -> anyhow::Result<User> {
        let mut conn = self.db.get().await?;

        let created = diesel::insert_into(user::table)
            .values(u)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(created)
    }
}

impl UserServiceDb {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }
}
