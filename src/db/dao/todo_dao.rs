use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use super::{
    DaoBase, DaoLayerError, DaoResult, TimestampedActiveModel, newest_first, stamp_new,
    timestamp_after,
};
use crate::db::entities::{prelude::Todo, todo};

const ENTITY: &str = "todo";

/// Item collection. Every method is a single statement; ownership rules live
/// in the service layer.
#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = Todo;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TodoDao {
    pub async fn find_by_id(&self, id: i32) -> DaoResult<Option<todo::Model>> {
        Ok(Todo::find_by_id(id).one(self.db()).await?)
    }

    /// Owner's items, newest first; equal timestamps fall back to id order.
    pub async fn find_by_owner(&self, owner_id: &str) -> DaoResult<Vec<todo::Model>> {
        let query = Todo::find().filter(todo::Column::OwnerId.eq(owner_id));
        let items = newest_first(query)
            .order_by_desc(todo::Column::Id)
            .all(self.db())
            .await?;
        Ok(items)
    }

    pub async fn insert(&self, owner_id: &str, text: &str) -> DaoResult<todo::Model> {
        let mut active = todo::ActiveModel {
            text: Set(text.to_string()),
            completed: Set(false),
            owner_id: Set(owner_id.to_string()),
            ..Default::default()
        };
        stamp_new(&mut active);
        Ok(active.insert(self.db()).await?)
    }

    pub async fn set_completed(
        &self,
        current: todo::Model,
        completed: bool,
    ) -> DaoResult<todo::Model> {
        let id = current.id;
        let updated_at = timestamp_after(current.updated_at);
        let mut active = current.into_active_model();
        active.completed = Set(completed);
        active.set_updated_at(updated_at);

        active.update(self.db()).await.map_err(|err| match err {
            // Row vanished between lookup and write.
            DbErr::RecordNotUpdated => DaoLayerError::NotFound {
                entity: ENTITY,
                id: id.to_string(),
            },
            other => DaoLayerError::Db(other),
        })
    }

    pub async fn delete_owned(&self, id: i32, owner_id: &str) -> DaoResult<()> {
        let result = Todo::delete_many()
            .filter(todo::Column::Id.eq(id))
            .filter(todo::Column::OwnerId.eq(owner_id))
            .exec(self.db())
            .await?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound {
                entity: ENTITY,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
