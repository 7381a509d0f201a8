use crate::{db::dao::UserDao, db::entities::user, error::AppError};

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_id(id).await?)
    }

    /// Returns the user with `id`, creating it first if needed.
    pub async fn ensure_user(
        &self,
        id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<user::Model, AppError> {
        if let Some(existing) = self.user_dao.find_by_id(id).await? {
            return Ok(existing);
        }
        Ok(self.user_dao.create_user(id, email, name).await?)
    }
}
