use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{auth::extractors::AuthUser, pagination::Pagination, state::AppState};

use super::dto::{CreateTaskRequest, UpdateTaskRequest};
use super::repo_types::{NewTask, Task, TaskChanges, TaskStatus};
use super::services::{ensure_owner, validate_title};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    let (limit, offset) = p.clamped();
    let tasks = state
        .store
        .list_tasks(user_id, limit, offset)
        .await
        .map_err(internal)?;
    Ok(Json(tasks))
}

#[instrument(skip(state, body))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Task>), (StatusCode, String)> {
    let new = NewTask {
        user_id,
        title: validate_title(&body.title)?,
        description: body.description,
        status: TaskStatus::Pending,
        priority: body.priority.unwrap_or_default(),
        due_date: body.due_date,
    };
    let task = state.store.create_task(new).await.map_err(internal)?;
    info!(task_id = %task.id, %user_id, "task created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/tasks/{}", task.id).parse() {
        headers.insert(LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(task)))
}

#[instrument(skip(state, body))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, (StatusCode, String)> {
    let changes = TaskChanges {
        title: body.title.as_deref().map(validate_title).transpose()?,
        description: body.description,
        status: body.status,
        priority: body.priority,
        due_date: body.due_date,
    };
    let task = load_owned(&state, id, user_id).await?;
    let updated = state
        .store
        .update_task(task.id, changes)
        .await
        .map_err(internal)?
        .ok_or_else(not_found)?;
    info!(task_id = %updated.id, status = %updated.status, "task updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let task = load_owned(&state, id, user_id).await?;
    if !state.store.delete_task(task.id).await.map_err(internal)? {
        return Err(not_found());
    }
    info!(task_id = %task.id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 404 before 403: a missing task is never reported as someone else's.
async fn load_owned(
    state: &AppState,
    id: Uuid,
    user_id: Uuid,
) -> Result<Task, (StatusCode, String)> {
    let task = state
        .store
        .find_task(id)
        .await
        .map_err(internal)?
        .ok_or_else(not_found)?;
    ensure_owner(&task, user_id)?;
    Ok(task)
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Task not found".to_string())
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "task storage failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use super::*;
    use crate::app::build_app;
    use crate::store::memory::MemoryStore;

    struct Harness {
        server: TestServer,
        store: Arc<MemoryStore>,
        owner: Uuid,
        owner_auth: HeaderValue,
        stranger_auth: HeaderValue,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::fake_with_store(store.clone());
        let owner = Uuid::new_v4();
        let owner_auth = state.bearer(owner);
        let stranger_auth = state.bearer(Uuid::new_v4());
        Harness {
            server: TestServer::new(build_app(state)).unwrap(),
            store,
            owner,
            owner_auth,
            stranger_auth,
        }
    }

    async fn create(h: &Harness, body: Value) -> Value {
        let res = h
            .server
            .post("/api/v1/tasks")
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .json(&body)
            .await;
        res.assert_status(StatusCode::CREATED);
        res.json()
    }

    #[tokio::test]
    async fn create_defaults_to_pending_medium_with_location() {
        let h = harness();
        let res = h
            .server
            .post("/api/v1/tasks")
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .json(&json!({ "title": "  Renew passport " }))
            .await;
        res.assert_status(StatusCode::CREATED);
        let task: Value = res.json();
        assert_eq!(task["title"], "Renew passport");
        assert_eq!(task["status"], "pending");
        assert_eq!(task["priority"], "medium");
        assert_eq!(
            res.header(LOCATION),
            format!("/api/v1/tasks/{}", task["id"].as_str().unwrap()).as_str()
        );
        assert_eq!(h.store.tasks()[0].user_id, h.owner);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_on_create_and_update() {
        let h = harness();
        h.server
            .post("/api/v1/tasks")
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .json(&json!({ "title": "   " }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let task = create(&h, json!({ "title": "Pay rent" })).await;
        h.server
            .put(&format!("/api/v1/tasks/{}", task["id"].as_str().unwrap()))
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .json(&json!({ "title": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(h.store.tasks()[0].title, "Pay rent");
    }

    #[tokio::test]
    async fn partial_update_keeps_absent_fields() {
        let h = harness();
        let task = create(
            &h,
            json!({ "title": "Book flights", "description": "window seat", "priority": "high" }),
        )
        .await;

        let res = h
            .server
            .put(&format!("/api/v1/tasks/{}", task["id"].as_str().unwrap()))
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .json(&json!({ "status": "in_progress" }))
            .await;
        res.assert_status_ok();
        let updated: Value = res.json();
        assert_eq!(updated["status"], "in_progress");
        assert_eq!(updated["title"], "Book flights");
        assert_eq!(updated["description"], "window seat");
        assert_eq!(updated["priority"], "high");
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let h = harness();
        let path = format!("/api/v1/tasks/{}", Uuid::new_v4());
        h.server
            .put(&path)
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .json(&json!({ "status": "completed" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        h.server
            .delete(&path)
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_users_task_is_forbidden() {
        let h = harness();
        let task = create(&h, json!({ "title": "Private" })).await;
        let path = format!("/api/v1/tasks/{}", task["id"].as_str().unwrap());

        h.server
            .put(&path)
            .add_header(AUTHORIZATION, h.stranger_auth.clone())
            .json(&json!({ "status": "completed" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        h.server
            .delete(&path)
            .add_header(AUTHORIZATION, h.stranger_auth.clone())
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let rows: Vec<Value> = h
            .server
            .get("/api/v1/tasks")
            .add_header(AUTHORIZATION, h.stranger_auth.clone())
            .await
            .json();
        assert!(rows.is_empty());
        assert_eq!(h.store.tasks()[0].status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn delete_removes_the_task_once() {
        let h = harness();
        let keep = create(&h, json!({ "title": "Keep" })).await;
        let gone = create(&h, json!({ "title": "Drop" })).await;
        let path = format!("/api/v1/tasks/{}", gone["id"].as_str().unwrap());

        h.server
            .delete(&path)
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .await
            .assert_status(StatusCode::NO_CONTENT);
        h.server
            .delete(&path)
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let rows: Vec<Value> = h
            .server
            .get("/api/v1/tasks")
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .await
            .json();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], keep["id"]);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paged() {
        let h = harness();
        for title in ["first", "second", "third"] {
            create(&h, json!({ "title": title })).await;
        }
        let rows: Vec<Value> = h
            .server
            .get("/api/v1/tasks?limit=2")
            .add_header(AUTHORIZATION, h.owner_auth.clone())
            .await
            .json();
        let titles: Vec<_> = rows.iter().map(|r| r["title"].clone()).collect();
        assert_eq!(titles, ["third", "second"]);
    }
}
