use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    services::{
        todo_service::{OwnershipPolicy, TodoService},
        user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    ownership: OwnershipPolicy,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
            ownership: OwnershipPolicy::default(),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db).with_ownership(state.config.identity.ownership_policy)
    }

    pub fn with_ownership(mut self, ownership: OwnershipPolicy) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn todo(&self) -> TodoService {
        TodoService::new(self.daos.todo(), self.ownership)
    }
}
