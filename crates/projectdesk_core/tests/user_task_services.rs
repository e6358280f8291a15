use projectdesk_core::db::open_db_in_memory;
use projectdesk_core::service::task_service::BLANK_TASK_TITLE_MESSAGE;
use projectdesk_core::service::user_service::BLANK_USERNAME_MESSAGE;
use projectdesk_core::{
    project_service, task_service, user_service, ProjectDto, ResponseBody, ServiceError,
    StatusCode, TaskDto, UserDto,
};
use uuid::Uuid;

#[test]
fn user_crud_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);

    let created = users.create_user(&UserDto::named("ada")).unwrap();
    let id = created.id.unwrap();
    assert_eq!(users.get_user(id).unwrap().username.as_deref(), Some("ada"));

    let replaced = users.replace_user(id, &UserDto::named("lovelace")).unwrap();
    assert_eq!(replaced.username.as_deref(), Some("lovelace"));

    let patched = users.patch_user(id, &UserDto::named("countess")).unwrap();
    assert_eq!(patched.status, StatusCode::Ok);
    assert_eq!(users.list_users().unwrap().len(), 1);

    users.delete_user(id).unwrap();
    assert!(matches!(
        users.get_user(id).unwrap_err(),
        ServiceError::NotFound { entity: "User", .. }
    ));
    assert!(matches!(
        users.delete_user(id).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[test]
fn user_patch_rejects_blank_username() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);
    let id = users.create_user(&UserDto::named("grace")).unwrap().id.unwrap();

    let response = users.patch_user(id, &UserDto::named("  ")).unwrap();

    assert_eq!(response.status, StatusCode::BadRequest);
    assert_eq!(
        response.body,
        ResponseBody::Message(BLANK_USERNAME_MESSAGE.to_string())
    );
    assert_eq!(users.get_user(id).unwrap().username.as_deref(), Some("grace"));
}

#[test]
fn assigned_tasks_are_listed_per_user() {
    let conn = open_db_in_memory().unwrap();
    let projects = project_service(&conn);
    let users = user_service(&conn);
    let tasks = task_service(&conn);

    let project_id = projects
        .create_project(&ProjectDto::named("Apollo"))
        .unwrap()
        .id
        .unwrap();
    let user_id = users.create_user(&UserDto::named("ada")).unwrap().id.unwrap();
    projects.add_member(project_id, user_id).unwrap();

    let task = TaskDto {
        title: Some("telemetry".to_string()),
        project_id: Some(project_id),
        ..TaskDto::default()
    };
    let task_id = tasks.create_task(&task).unwrap().id.unwrap();
    tasks
        .create_task(&TaskDto {
            title: Some("unassigned".to_string()),
            ..TaskDto::default()
        })
        .unwrap();

    projects
        .assign_tasks_to_member(project_id, user_id, &[task_id])
        .unwrap();

    let assigned = users.list_assigned_tasks(user_id).unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, Some(task_id));
    assert_eq!(assigned[0].user_id, Some(user_id));
    assert_eq!(tasks.list_project_tasks(project_id).unwrap().len(), 1);
}

#[test]
fn task_create_requires_existing_project() {
    let conn = open_db_in_memory().unwrap();
    let tasks = task_service(&conn);
    let missing = Uuid::new_v4();

    let err = tasks
        .create_task(&TaskDto {
            title: Some("lost".to_string()),
            project_id: Some(missing),
            ..TaskDto::default()
        })
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { entity: "Project", id } if id == missing));
    assert!(tasks.list_tasks().unwrap().is_empty());
}

#[test]
fn task_create_ignores_incoming_assignee() {
    let conn = open_db_in_memory().unwrap();
    let tasks = task_service(&conn);

    let created = tasks
        .create_task(&TaskDto {
            title: Some("draft".to_string()),
            user_id: Some(Uuid::new_v4()),
            ..TaskDto::default()
        })
        .unwrap();

    assert_eq!(created.user_id, None);
}

#[test]
fn task_patch_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let tasks = task_service(&conn);
    let id = tasks
        .create_task(&TaskDto {
            title: Some("first".to_string()),
            ..TaskDto::default()
        })
        .unwrap()
        .id
        .unwrap();

    let blank = tasks
        .patch_task(
            id,
            &TaskDto {
                title: Some(String::new()),
                ..TaskDto::default()
            },
        )
        .unwrap();
    assert_eq!(blank.status, StatusCode::BadRequest);
    assert_eq!(
        blank.body,
        ResponseBody::Message(BLANK_TASK_TITLE_MESSAGE.to_string())
    );

    let renamed = tasks
        .patch_task(
            id,
            &TaskDto {
                title: Some("second".to_string()),
                ..TaskDto::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.into_data().unwrap().title.as_deref(), Some("second"));

    tasks.delete_task(id).unwrap();
    assert!(matches!(
        tasks.get_task(id).unwrap_err(),
        ServiceError::NotFound { entity: "Task", .. }
    ));
}
