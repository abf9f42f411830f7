use shareit_core::{DomainError, NewUser, User, UserId, UserPatch};

use super::{AppServices, ServiceResult};
use crate::app::dto::UserBody;

impl AppServices {
    pub async fn create_user(&self, body: UserBody) -> ServiceResult<User> {
        let new = NewUser::new(body.email, body.name)?;
        if self.store.find_user_by_email(&new.email).await?.is_some() {
            return Err(duplicate_email(&new.email).into());
        }
        let user = self.store.insert_user(&new).await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: UserId) -> ServiceResult<User> {
        self.require_user(id).await
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<User>> {
        tracing::debug!("listing users");
        Ok(self.store.list_users().await?)
    }

    pub async fn patch_user(&self, id: UserId, body: UserBody) -> ServiceResult<User> {
        let patch = UserPatch::new(body.email, body.name)?;
        self.require_user(id).await?;

        if let Some(email) = &patch.email {
            if let Some(holder) = self.store.find_user_by_email(email).await? {
                if holder.id != id {
                    return Err(duplicate_email(email).into());
                }
            }
        }

        let user = self.store.update_user(id, &patch).await?;
        tracing::info!(user_id = %id, "user updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        if !self.store.delete_user(id).await? {
            return Err(DomainError::not_found(format!("user with id={id} not found")).into());
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}

fn duplicate_email(email: &str) -> DomainError {
    DomainError::conflict(format!("user with email={email} already exists"))
}
