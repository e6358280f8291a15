//! Argument model and request dispatch.

use clap::{Parser, Subcommand};
use log::{error, warn};
use projectdesk_core::{
    project_service, task_service, user_service, ApiResponse, ProjectDto, ProjectPageQuery,
    ServiceError, ServiceResult, Settings, StatusCode, TaskDto, UserDto,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "projectdesk")]
#[command(version, about = "Manage projects, users and task assignment", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database file (overrides PROJECTDESK_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides PROJECTDESK_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

impl Cli {
    pub fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(db) = &self.db {
            settings.db_path = db.clone();
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
        settings
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List all projects
    List,
    /// Show one project
    Get { id: Uuid },
    /// Create a project
    Create { name: Option<String> },
    /// Full update (PUT)
    Replace {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
    },
    /// Partial update (PATCH)
    Patch {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a project
    Delete { id: Uuid },
    /// Assign tasks to a project member
    Assign {
        project_id: Uuid,
        user_id: Uuid,
        /// Task ids, repeatable
        #[arg(long = "task")]
        tasks: Vec<Uuid>,
    },
    /// Paged, filtered and sorted listing
    Page {
        /// Case-insensitive exact name filter
        #[arg(long)]
        name: Option<String>,
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size (defaults to PROJECTDESK_PAGE_SIZE)
        #[arg(long)]
        size: Option<u32>,
        #[arg(long, default_value = "name")]
        sort: String,
        /// ASC sorts ascending, anything else descending
        #[arg(long, default_value = "ASC")]
        direction: String,
    },
    /// Add a user to a project
    AddMember { project_id: Uuid, user_id: Uuid },
    /// Remove a user from a project
    RemoveMember { project_id: Uuid, user_id: Uuid },
    /// List project members
    Members { project_id: Uuid },
}

#[derive(Subcommand)]
pub enum UserAction {
    List,
    Get { id: Uuid },
    Create { username: Option<String> },
    Replace {
        id: Uuid,
        #[arg(long)]
        username: Option<String>,
    },
    Patch {
        id: Uuid,
        #[arg(long)]
        username: Option<String>,
    },
    Delete { id: Uuid },
    /// Tasks assigned to the user
    Tasks { id: Uuid },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks, optionally only those of one project
    List {
        #[arg(long)]
        project: Option<Uuid>,
    },
    Get { id: Uuid },
    Create {
        title: Option<String>,
        #[arg(long)]
        project: Option<Uuid>,
    },
    Patch {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
    },
    Delete { id: Uuid },
}

/// Runs one command and converts the outcome into a JSON response.
///
/// Service errors become error responses; only serialization failures
/// surface as `Err`.
pub fn dispatch(
    conn: &Connection,
    settings: &Settings,
    command: Commands,
) -> anyhow::Result<ApiResponse<Value>> {
    match command {
        Commands::Projects { action } => dispatch_project(conn, settings, action),
        Commands::Users { action } => dispatch_user(conn, action),
        Commands::Tasks { action } => dispatch_task(conn, action),
    }
}

fn dispatch_project(
    conn: &Connection,
    settings: &Settings,
    action: ProjectAction,
) -> anyhow::Result<ApiResponse<Value>> {
    let service = project_service(conn);
    match action {
        ProjectAction::List => respond(service.list_projects().map(ApiResponse::ok)),
        ProjectAction::Get { id } => respond(service.get_project(id).map(ApiResponse::ok)),
        ProjectAction::Create { name } => respond(
            service
                .create_project(&ProjectDto { id: None, name })
                .map(ApiResponse::created),
        ),
        ProjectAction::Replace { id, name } => respond(
            service
                .replace_project(id, &ProjectDto { id: None, name })
                .map(ApiResponse::ok),
        ),
        ProjectAction::Patch { id, name } => {
            respond(service.patch_project(id, &ProjectDto { id: None, name }))
        }
        ProjectAction::Delete { id } => respond(service.delete_project(id).map(|()| empty_ok())),
        ProjectAction::Assign {
            project_id,
            user_id,
            tasks,
        } => respond(service.assign_tasks_to_member(project_id, user_id, &tasks)),
        ProjectAction::Page {
            name,
            page,
            size,
            sort,
            direction,
        } => {
            let query = ProjectPageQuery {
                name,
                page_index: page,
                page_size: size.unwrap_or(settings.default_page_size),
                sort_field: sort,
                sort_direction: direction,
            };
            respond(service.list_projects_page(&query))
        }
        ProjectAction::AddMember {
            project_id,
            user_id,
        } => respond(service.add_member(project_id, user_id)),
        ProjectAction::RemoveMember {
            project_id,
            user_id,
        } => respond(service.remove_member(project_id, user_id)),
        ProjectAction::Members { project_id } => {
            respond(service.list_members(project_id).map(ApiResponse::ok))
        }
    }
}

fn dispatch_user(conn: &Connection, action: UserAction) -> anyhow::Result<ApiResponse<Value>> {
    let service = user_service(conn);
    match action {
        UserAction::List => respond(service.list_users().map(ApiResponse::ok)),
        UserAction::Get { id } => respond(service.get_user(id).map(ApiResponse::ok)),
        UserAction::Create { username } => respond(
            service
                .create_user(&UserDto { id: None, username })
                .map(ApiResponse::created),
        ),
        UserAction::Replace { id, username } => respond(
            service
                .replace_user(id, &UserDto { id: None, username })
                .map(ApiResponse::ok),
        ),
        UserAction::Patch { id, username } => {
            respond(service.patch_user(id, &UserDto { id: None, username }))
        }
        UserAction::Delete { id } => respond(service.delete_user(id).map(|()| empty_ok())),
        UserAction::Tasks { id } => respond(service.list_assigned_tasks(id).map(ApiResponse::ok)),
    }
}

fn dispatch_task(conn: &Connection, action: TaskAction) -> anyhow::Result<ApiResponse<Value>> {
    let service = task_service(conn);
    match action {
        TaskAction::List { project: None } => respond(service.list_tasks().map(ApiResponse::ok)),
        TaskAction::List {
            project: Some(project_id),
        } => respond(service.list_project_tasks(project_id).map(ApiResponse::ok)),
        TaskAction::Get { id } => respond(service.get_task(id).map(ApiResponse::ok)),
        TaskAction::Create { title, project } => {
            let dto = TaskDto {
                title,
                project_id: project,
                ..TaskDto::default()
            };
            respond(service.create_task(&dto).map(ApiResponse::created))
        }
        TaskAction::Patch { id, title } => {
            let dto = TaskDto {
                title,
                ..TaskDto::default()
            };
            respond(service.patch_task(id, &dto))
        }
        TaskAction::Delete { id } => respond(service.delete_task(id).map(|()| empty_ok())),
    }
}

fn empty_ok() -> ApiResponse<()> {
    ApiResponse::empty(StatusCode::Ok)
}

/// Global error translation: every service error becomes a response.
fn respond<T: Serialize>(result: ServiceResult<ApiResponse<T>>) -> anyhow::Result<ApiResponse<Value>> {
    match result {
        Ok(response) => {
            let status = response.status;
            let body = serde_json::to_value(&response.body)?;
            Ok(match body {
                Value::Null => ApiResponse::empty(status),
                data => ApiResponse::with_data(status, data),
            })
        }
        Err(err) => {
            log_service_error(&err);
            Ok(ApiResponse::from_error(&err))
        }
    }
}

fn log_service_error(err: &ServiceError) {
    let status = err.status().as_u16();
    if status >= 500 {
        error!("event=request module=cli status=error http_status={status} error={err}");
    } else {
        warn!("event=request module=cli status=rejected http_status={status} error={err}");
    }
}

#[cfg(test)]
mod tests {
    use super::{dispatch, Cli};
    use clap::Parser;
    use projectdesk_core::db::open_db_in_memory;
    use projectdesk_core::{ApiResponse, Settings, StatusCode};
    use rusqlite::Connection;
    use serde_json::{json, Value};

    fn run(conn: &Connection, args: &[&str]) -> ApiResponse<Value> {
        let cli = Cli::try_parse_from(std::iter::once("projectdesk").chain(args.iter().copied()))
            .unwrap();
        dispatch(conn, &Settings::default(), cli.command).unwrap()
    }

    fn created_id(response: &ApiResponse<Value>) -> String {
        response.data().unwrap()["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn create_then_get_project() {
        let conn = open_db_in_memory().unwrap();

        let created = run(&conn, &["projects", "create", "Apollo"]);
        assert_eq!(created.status, StatusCode::Created);
        let id = created_id(&created);

        let fetched = run(&conn, &["projects", "get", &id]);
        assert_eq!(fetched.status, StatusCode::Ok);
        assert_eq!(fetched.data().unwrap()["name"], "Apollo");
    }

    #[test]
    fn unknown_project_maps_to_not_found_response() {
        let conn = open_db_in_memory().unwrap();
        let missing = uuid::Uuid::new_v4().to_string();

        let response = run(&conn, &["projects", "delete", &missing]);

        assert_eq!(response.status, StatusCode::NotFound);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "status": 404,
                "body": {"message": format!("Project was not found with ID : {missing}")}
            })
        );
    }

    #[test]
    fn assign_flow_through_cli() {
        let conn = open_db_in_memory().unwrap();
        let project = created_id(&run(&conn, &["projects", "create", "Apollo"]));
        let user = created_id(&run(&conn, &["users", "create", "ada"]));
        let task = created_id(&run(&conn, &["tasks", "create", "fuel", "--project", &project]));

        let rejected = run(&conn, &["projects", "assign", &project, &user, "--task", &task]);
        assert_eq!(rejected.status, StatusCode::BadRequest);

        run(&conn, &["projects", "add-member", &project, &user]);
        let empty = run(&conn, &["projects", "assign", &project, &user]);
        assert_eq!(empty.status, StatusCode::BadRequest);

        let assigned = run(&conn, &["projects", "assign", &project, &user, "--task", &task]);
        assert_eq!(assigned.status, StatusCode::Created);

        let tasks = run(&conn, &["users", "tasks", &user]);
        assert_eq!(tasks.data().unwrap()[0]["user_id"], Value::String(user));
    }

    #[test]
    fn page_uses_settings_default_size_and_reports_no_content() {
        let conn = open_db_in_memory().unwrap();

        let empty = run(&conn, &["projects", "page"]);
        assert_eq!(empty.status, StatusCode::NoContent);

        run(&conn, &["projects", "create", "Apollo"]);
        let page = run(&conn, &["projects", "page", "--name", "apollo", "--direction", "desc"]);
        assert_eq!(page.status, StatusCode::Ok);
        assert_eq!(page.data().unwrap()["projects"][0]["name"], "Apollo");
    }

    #[test]
    fn cli_overrides_take_precedence_over_settings() {
        let cli = Cli::try_parse_from([
            "projectdesk",
            "--db",
            "/tmp/other.db",
            "--log-level",
            "warn",
            "projects",
            "list",
        ])
        .unwrap();
        let settings = cli.apply_overrides(Settings::default());
        assert_eq!(settings.db_path, std::path::PathBuf::from("/tmp/other.db"));
        assert_eq!(settings.log_level, "warn");
    }
}
