//! User use-case service.
//!
//! # Invariants
//! - Deleting a user drops its memberships and unassigns its tasks
//!   (enforced by storage foreign keys).
//! - A blank username on patch is rejected with `400` and nothing written.

use crate::model::task::TaskDto;
use crate::model::user::{User, UserDto, UserId};
use crate::repo::task_repo::TaskStore;
use crate::repo::Store;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::response::ApiResponse;
use log::{info, warn};

pub const BLANK_USERNAME_MESSAGE: &str = "Username should not be empty";

pub struct UserService<U, T> {
    users: U,
    tasks: T,
}

impl<U, T> UserService<U, T>
where
    U: Store<User, UserId>,
    T: TaskStore,
{
    pub fn new(users: U, tasks: T) -> Self {
        Self { users, tasks }
    }

    pub fn list_users(&self) -> ServiceResult<Vec<UserDto>> {
        Ok(self.users.list()?.into_iter().map(UserDto::from).collect())
    }

    pub fn get_user(&self, user_id: UserId) -> ServiceResult<UserDto> {
        self.load_user(user_id).map(UserDto::from)
    }

    pub fn create_user(&self, dto: &UserDto) -> ServiceResult<UserDto> {
        let user = User::new(dto.username.clone().unwrap_or_default());
        self.users.save(&user)?;
        info!("event=user_create module=service status=ok user_id={}", user.id);
        Ok(UserDto::from(user))
    }

    /// Full update: the username is replaced by the incoming value, or
    /// cleared when the DTO carries none.
    pub fn replace_user(&self, user_id: UserId, dto: &UserDto) -> ServiceResult<UserDto> {
        let mut user = self.load_user(user_id)?;
        user.username = dto.username.clone().unwrap_or_default();
        self.users.save(&user)?;
        info!("event=user_replace module=service status=ok user_id={user_id}");
        Ok(UserDto::from(user))
    }

    pub fn patch_user(&self, user_id: UserId, dto: &UserDto) -> ServiceResult<ApiResponse<UserDto>> {
        let mut user = self.load_user(user_id)?;
        if let Some(username) = dto.username.as_deref() {
            if username.trim().is_empty() {
                warn!(
                    "event=user_patch module=service status=rejected user_id={user_id} reason=blank_username"
                );
                return Ok(ApiResponse::bad_request(BLANK_USERNAME_MESSAGE));
            }
            user.username = username.to_string();
        }
        self.users.save(&user)?;
        info!("event=user_patch module=service status=ok user_id={user_id}");
        Ok(ApiResponse::ok(UserDto::from(user)))
    }

    pub fn delete_user(&self, user_id: UserId) -> ServiceResult<()> {
        if !self.users.exists(user_id)? {
            return Err(ServiceError::not_found("User", user_id));
        }
        self.users.delete(user_id)?;
        info!("event=user_delete module=service status=ok user_id={user_id}");
        Ok(())
    }

    /// Tasks currently assigned to `user_id`.
    pub fn list_assigned_tasks(&self, user_id: UserId) -> ServiceResult<Vec<TaskDto>> {
        self.load_user(user_id)?;
        Ok(self
            .tasks
            .list_by_assignee(user_id)?
            .into_iter()
            .map(TaskDto::from)
            .collect())
    }

    fn load_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.users
            .get(user_id)?
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }
}
