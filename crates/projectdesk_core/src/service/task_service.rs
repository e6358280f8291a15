//! Task use-case service.
//!
//! Assignment is owned by `ProjectService::assign_tasks_to_member`; this
//! service never sets `user_id`.

use crate::model::project::{Project, ProjectId};
use crate::model::task::{Task, TaskDto, TaskId};
use crate::repo::task_repo::TaskStore;
use crate::repo::Store;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::response::ApiResponse;
use log::{info, warn};

pub const BLANK_TASK_TITLE_MESSAGE: &str = "Task title should not be empty";

pub struct TaskService<T, P> {
    tasks: T,
    projects: P,
}

impl<T, P> TaskService<T, P>
where
    T: TaskStore,
    P: Store<Project, ProjectId>,
{
    pub fn new(tasks: T, projects: P) -> Self {
        Self { tasks, projects }
    }

    pub fn list_tasks(&self) -> ServiceResult<Vec<TaskDto>> {
        Ok(self.tasks.list()?.into_iter().map(TaskDto::from).collect())
    }

    /// Tasks owned by `project_id`.
    pub fn list_project_tasks(&self, project_id: ProjectId) -> ServiceResult<Vec<TaskDto>> {
        if !self.projects.exists(project_id)? {
            return Err(ServiceError::not_found("Project", project_id));
        }
        Ok(self
            .tasks
            .list_by_project(project_id)?
            .into_iter()
            .map(TaskDto::from)
            .collect())
    }

    pub fn get_task(&self, task_id: TaskId) -> ServiceResult<TaskDto> {
        self.load_task(task_id).map(TaskDto::from)
    }

    /// Creates an unassigned task. `project_id`, when given, must exist.
    pub fn create_task(&self, dto: &TaskDto) -> ServiceResult<TaskDto> {
        if let Some(project_id) = dto.project_id {
            if !self.projects.exists(project_id)? {
                return Err(ServiceError::not_found("Project", project_id));
            }
        }
        let task = Task::new(dto.title.clone().unwrap_or_default(), dto.project_id);
        self.tasks.save(&task)?;
        info!("event=task_create module=service status=ok task_id={}", task.id);
        Ok(TaskDto::from(task))
    }

    /// Partial update of the title; other DTO fields are ignored.
    pub fn patch_task(&self, task_id: TaskId, dto: &TaskDto) -> ServiceResult<ApiResponse<TaskDto>> {
        let mut task = self.load_task(task_id)?;
        if let Some(title) = dto.title.as_deref() {
            if title.trim().is_empty() {
                warn!("event=task_patch module=service status=rejected task_id={task_id} reason=blank_title");
                return Ok(ApiResponse::bad_request(BLANK_TASK_TITLE_MESSAGE));
            }
            task.title = title.to_string();
        }
        self.tasks.save(&task)?;
        info!("event=task_patch module=service status=ok task_id={task_id}");
        Ok(ApiResponse::ok(TaskDto::from(task)))
    }

    pub fn delete_task(&self, task_id: TaskId) -> ServiceResult<()> {
        if !self.tasks.exists(task_id)? {
            return Err(ServiceError::not_found("Task", task_id));
        }
        self.tasks.delete(task_id)?;
        info!("event=task_delete module=service status=ok task_id={task_id}");
        Ok(())
    }

    fn load_task(&self, task_id: TaskId) -> ServiceResult<Task> {
        self.tasks
            .get(task_id)?
            .ok_or_else(|| ServiceError::not_found("Task", task_id))
    }
}
