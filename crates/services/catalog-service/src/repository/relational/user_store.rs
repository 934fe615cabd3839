use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::write_error;
use crate::repository::contracts::UserRepository;
use crate::repository::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::AppResult;
use domain::User;

/// `users` table access.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let model = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(User::try_from).transpose()?)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(User::try_from).transpose()?)
    }

    async fn add(&self, user: &User) -> AppResult<()> {
        ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(write_error("User"))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        UserEntity::insert(ActiveModel::from(user))
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Email,
                        user::Column::PasswordHash,
                        user::Column::Role,
                        user::Column::IsActive,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error("User"))?;
        Ok(())
    }
}
