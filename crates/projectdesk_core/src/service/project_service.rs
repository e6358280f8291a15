//! Project use-case service.
//!
//! # Responsibility
//! - Project CRUD, membership, and paged/filtered listing.
//! - Assigning tasks to project members.
//! - Mapping entities to `ProjectDto` at the boundary.
//!
//! # Invariants
//! - Lookups by id fail with `ServiceError::NotFound` before any mutation.
//! - Blank patch names and empty task lists come back as `400` responses and
//!   leave storage untouched.
//! - `replace_project` keeps the stored name; the incoming name is not applied.
//! - Task assignment requires existing project membership.

use crate::model::project::{Project, ProjectDto, ProjectId};
use crate::model::task::{Task, TaskId};
use crate::model::user::{User, UserDto, UserId};
use crate::repo::paging::{PageRequest, Sort, SortDirection};
use crate::repo::project_repo::ProjectStore;
use crate::repo::Store;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::response::{ApiResponse, StatusCode};
use log::{debug, info, warn};
use serde::Serialize;

pub const BLANK_PROJECT_NAME_MESSAGE: &str = "Project name should not be empty";
pub const NOT_A_MEMBER_MESSAGE: &str = "Specified user is not a member of the project";
pub const EMPTY_TASK_LIST_MESSAGE: &str = "Task list should not be empty";

/// Parameters of the paged project listing, as received from transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPageQuery {
    /// Case-insensitive exact name filter. `None` lists every project.
    pub name: Option<String>,
    /// Zero-based page index.
    pub page_index: u32,
    pub page_size: u32,
    /// One of `id`, `name`, `createdAt` (case-insensitive).
    pub sort_field: String,
    /// `ASC` (any case) for ascending; anything else sorts descending.
    pub sort_direction: String,
}

/// Body of a non-empty paged listing: `{"projects": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectsPage {
    pub projects: Vec<ProjectDto>,
}

/// Project service wired explicitly against its stores.
pub struct ProjectService<P, U, T> {
    projects: P,
    users: U,
    tasks: T,
}

impl<P, U, T> ProjectService<P, U, T>
where
    P: ProjectStore,
    U: Store<User, UserId>,
    T: Store<Task, TaskId>,
{
    pub fn new(projects: P, users: U, tasks: T) -> Self {
        Self {
            projects,
            users,
            tasks,
        }
    }

    /// Lists every project in storage order.
    pub fn list_projects(&self) -> ServiceResult<Vec<ProjectDto>> {
        let projects = self.projects.list()?;
        debug!(
            "event=project_list module=service status=ok count={}",
            projects.len()
        );
        Ok(projects.into_iter().map(ProjectDto::from).collect())
    }

    pub fn get_project(&self, project_id: ProjectId) -> ServiceResult<ProjectDto> {
        self.load_project(project_id).map(ProjectDto::from)
    }

    /// Persists a new project. The name is taken as-is; a missing name is
    /// stored as the empty string.
    pub fn create_project(&self, dto: &ProjectDto) -> ServiceResult<ProjectDto> {
        let project = Project::new(dto.name.clone().unwrap_or_default());
        self.projects.save(&project)?;
        info!(
            "event=project_create module=service status=ok project_id={}",
            project.id
        );
        Ok(ProjectDto::from(project))
    }

    /// Full update.
    ///
    /// Re-saves the stored project with its current name. The incoming DTO is
    /// accepted but its name is not applied.
    pub fn replace_project(
        &self,
        project_id: ProjectId,
        _dto: &ProjectDto,
    ) -> ServiceResult<ProjectDto> {
        let project = self.load_project(project_id)?;
        self.projects.save(&project)?;
        info!("event=project_replace module=service status=ok project_id={project_id}");
        Ok(ProjectDto::from(project))
    }

    /// Partial update of the name.
    ///
    /// - name absent: unchanged, `200`.
    /// - name blank after trim: `400`, nothing written.
    /// - otherwise: name replaced, `200`.
    pub fn patch_project(
        &self,
        project_id: ProjectId,
        dto: &ProjectDto,
    ) -> ServiceResult<ApiResponse<ProjectDto>> {
        let mut project = self.load_project(project_id)?;
        if let Some(name) = dto.name.as_deref() {
            if name.trim().is_empty() {
                warn!(
                    "event=project_patch module=service status=rejected project_id={project_id} reason=blank_name"
                );
                return Ok(ApiResponse::bad_request(BLANK_PROJECT_NAME_MESSAGE));
            }
            project.name = name.to_string();
        }

        self.projects.save(&project)?;
        info!("event=project_patch module=service status=ok project_id={project_id}");
        Ok(ApiResponse::ok(ProjectDto::from(project)))
    }

    pub fn delete_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        if !self.projects.exists(project_id)? {
            return Err(ServiceError::not_found("Project", project_id));
        }
        self.projects.delete(project_id)?;
        info!("event=project_delete module=service status=ok project_id={project_id}");
        Ok(())
    }

    /// Assigns every listed task to `user_id`.
    ///
    /// Tasks are processed in order and each is saved on its own; a missing
    /// task id aborts the call but keeps the assignments made before it.
    pub fn assign_tasks_to_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        task_ids: &[TaskId],
    ) -> ServiceResult<ApiResponse<()>> {
        self.load_project(project_id)?;
        self.load_user(user_id)?;

        if !self.projects.is_member(project_id, user_id)? {
            warn!(
                "event=task_assign module=service status=rejected project_id={project_id} user_id={user_id} reason=not_a_member"
            );
            return Err(ServiceError::InvalidArgument(NOT_A_MEMBER_MESSAGE.to_string()));
        }

        if task_ids.is_empty() {
            warn!(
                "event=task_assign module=service status=rejected project_id={project_id} user_id={user_id} reason=empty_task_list"
            );
            return Ok(ApiResponse::bad_request(EMPTY_TASK_LIST_MESSAGE));
        }

        for &task_id in task_ids {
            let mut task = self
                .tasks
                .get(task_id)?
                .ok_or_else(|| ServiceError::not_found("Task", task_id))?;
            task.assign_to(user_id);
            self.tasks.save(&task)?;
        }

        info!(
            "event=task_assign module=service status=ok project_id={project_id} user_id={user_id} count={}",
            task_ids.len()
        );
        Ok(ApiResponse::empty(StatusCode::Created))
    }

    /// Paged, optionally name-filtered, sorted listing.
    ///
    /// Returns `204` with no body when the page is empty, otherwise `200`
    /// with `{"projects": [...]}`.
    pub fn list_projects_page(
        &self,
        query: &ProjectPageQuery,
    ) -> ServiceResult<ApiResponse<ProjectsPage>> {
        let sort = Sort::by(
            query.sort_field.as_str(),
            SortDirection::from_token(&query.sort_direction),
        );
        let page = PageRequest::new(query.page_index, query.page_size, sort)?;

        let projects = match query.name.as_deref() {
            Some(name) => self.projects.find_by_name_ignore_case(name, &page)?,
            None => self.projects.list_page(&page)?.items,
        };

        debug!(
            "event=project_page module=service status=ok page_index={} page_size={} filtered={} count={}",
            query.page_index,
            query.page_size,
            query.name.is_some(),
            projects.len()
        );

        if projects.is_empty() {
            return Ok(ApiResponse::no_content());
        }
        Ok(ApiResponse::ok(ProjectsPage {
            projects: projects.into_iter().map(ProjectDto::from).collect(),
        }))
    }

    /// Adds `user_id` to the project's members. Re-adding is a no-op.
    pub fn add_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ServiceResult<ApiResponse<()>> {
        self.load_project(project_id)?;
        self.load_user(user_id)?;
        self.projects.add_member(project_id, user_id)?;
        info!("event=member_add module=service status=ok project_id={project_id} user_id={user_id}");
        Ok(ApiResponse::empty(StatusCode::Ok))
    }

    /// Removes `user_id` from the project's members.
    ///
    /// Fails with `InvalidArgument` when the user is not a member.
    pub fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ServiceResult<ApiResponse<()>> {
        self.load_project(project_id)?;
        self.load_user(user_id)?;
        if !self.projects.remove_member(project_id, user_id)? {
            return Err(ServiceError::InvalidArgument(NOT_A_MEMBER_MESSAGE.to_string()));
        }
        info!(
            "event=member_remove module=service status=ok project_id={project_id} user_id={user_id}"
        );
        Ok(ApiResponse::empty(StatusCode::Ok))
    }

    pub fn list_members(&self, project_id: ProjectId) -> ServiceResult<Vec<UserDto>> {
        self.load_project(project_id)?;
        let mut members = Vec::new();
        for user_id in self.projects.member_ids(project_id)? {
            if let Some(user) = self.users.get(user_id)? {
                members.push(UserDto::from(user));
            }
        }
        Ok(members)
    }

    fn load_project(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.projects
            .get(project_id)?
            .ok_or_else(|| ServiceError::not_found("Project", project_id))
    }

    fn load_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.users
            .get(user_id)?
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }
}
