use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use super::{DaoBase, DaoResult, now_timestamp};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_id(&self, id: &str) -> DaoResult<Option<user::Model>> {
        Ok(User::find_by_id(id.to_string()).one(self.db()).await?)
    }

    pub async fn create_user(
        &self,
        id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            id: Set(id.to_string()),
            email: Set(email.map(str::to_string)),
            name: Set(name.map(str::to_string)),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };
        Ok(model.insert(self.db()).await?)
    }
}
