use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::state::AppState;

use super::{CreateNote, UpdateNote};

use super::handlers;

#[derive(Debug, Deserialize)]
struct NoteIdPath {
    id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/notes", get(find_notes).post(create_note))
        .route("/notes/{id}", get(get_note).patch(update_note).delete(delete_note))
        .with_state(state)
}

async fn find_notes(State(AppState { conn }): State<AppState>) -> impl IntoResponse {
    handlers::find_notes(conn).await.map(Json)
}

async fn create_note(State(AppState { conn }): State<AppState>, Json(args): Json<CreateNote>) -> impl IntoResponse {
    handlers::create_note(args, conn)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn get_note(
    Path(NoteIdPath { id }): Path<NoteIdPath>,
    State(AppState { conn }): State<AppState>,
) -> impl IntoResponse {
    handlers::get_note(id, conn).await.map(Json)
}

async fn update_note(
    Path(NoteIdPath { id }): Path<NoteIdPath>,
    State(AppState { conn }): State<AppState>,
    Json(args): Json<UpdateNote>,
) -> impl IntoResponse {
    handlers::update_note(id, args, conn).await.map(Json)
}

async fn delete_note(
    Path(NoteIdPath { id }): Path<NoteIdPath>,
    State(AppState { conn }): State<AppState>,
) -> impl IntoResponse {
    handlers::delete_note(id, conn).await.map(Json)
}

#[cfg(test)]
mod tests {
    use crate::{
        db::{init_test_db, DB},
        errors::Result,
        notes::{Note, NotesResponse, QueryResult},
    };
    use axum_test::TestServer;
    use serde_json::json;

    #[tokio::test]
    async fn find_notes() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute_batch(
                r#"
                INSERT INTO notes (note, category, completed) VALUES ('first', 'General', 0);
                INSERT INTO notes (note, category, completed) VALUES ('second', 'General', 1);
                INSERT INTO notes (note, category, completed) VALUES ('third', 'General', 0);
                "#,
            )
            .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db).await?;
        let response = server.get("/notes").await;

        assert_eq!(response.status_code(), 200);
        let body = response.json::<NotesResponse>();
        assert_eq!(body.status, "success");
        assert_eq!(body.data.notes.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn list_returns_every_inserted_row() -> Result<()> {
        let db = init_test_db().await?;
        let server = test_server(db).await?;

        let mut ids = Vec::new();
        for n in 1..=3 {
            let response = server
                .post("/notes")
                .json(&json!({
                    "note": format!("note {n}"),
                    "completed": false
                }))
                .await;
            ids.push(response.json::<NotesResponse>().data.notes[0].id);
        }

        let listed = server.get("/notes").await.json::<NotesResponse>();
        assert!(listed.data.notes.len() >= 3);
        for id in ids {
            assert!(listed.data.notes.iter().any(|note| note.id == id));
        }
        Ok(())
    }

    #[tokio::test]
    async fn create_note() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .post("/notes")
            .json(&json!({
                "note": "hello",
                "completed": false
            }))
            .await;

        assert_eq!(response.status_code(), 201);
        let body = response.json::<NotesResponse>();
        assert_eq!(body.status, "success");
        let note = &body.data.notes[0];
        assert_eq!(note.note.as_deref(), Some("hello"));
        assert_eq!(note.category, "General");
        assert_eq!(note.completed, Some(false));
        Ok(())
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() -> Result<()> {
        let db = init_test_db().await?;
        let server = test_server(db).await?;

        let first = server
            .post("/notes")
            .json(&json!({"note": "a", "completed": false}))
            .await
            .json::<NotesResponse>();
        let second = server
            .post("/notes")
            .json(&json!({"note": "b", "completed": true}))
            .await
            .json::<NotesResponse>();

        let (a, b) = (first.data.notes[0].id, second.data.notes[0].id);
        assert_ne!(a, b);
        assert!(b > a);
        Ok(())
    }

    #[tokio::test]
    async fn get_note() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute_batch("INSERT INTO notes (id, note, category, completed) VALUES (7, 'first', 'General', 0);")
                .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db).await?;
        let response = server.get("/notes/7").await;

        assert_eq!(response.status_code(), 200);
        let body = response.json::<NotesResponse>();
        assert_eq!(body.data.notes[0].id, 7);
        assert_eq!(body.data.notes[0].note.as_deref(), Some("first"));
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_note() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server.get("/notes/999999").expect_failure().await;

        assert_eq!(response.status_code(), 404);
        let result = response.json::<QueryResult>();
        assert_eq!(result.row_count, 0);
        assert!(result.rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_note_garbage_id() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server.get("/notes/not-a-number").expect_failure().await;

        assert_eq!(response.status_code(), 404);
        Ok(())
    }

    #[tokio::test]
    async fn delete_note() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute(
                "INSERT INTO notes (id, note, category, completed) VALUES (7, 'first', 'General', 0);",
                [],
            )
            .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db.clone()).await?;
        let response = server.delete("/notes/7").await;

        assert_eq!(response.status_code(), 200);
        let result = response.json::<QueryResult>();
        assert_eq!(result.row_count, 1);
        assert_eq!(result.rows[0].id, 7);

        let gone = server.get("/notes/7").expect_failure().await;
        assert_eq!(gone.status_code(), 404);

        let count = db
            .call(|conn| {
                conn.query_row::<u32, _, _>("select count(*) from notes", [], |r| r.get(0))
                    .map_err(|e| e.into())
            })
            .await
            .unwrap();

        assert_eq!(count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_note() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server.delete("/notes/999999").expect_failure().await;

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<QueryResult>().row_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn update_note() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute_batch("INSERT INTO notes (id, note, category, completed) VALUES (7, 'first', 'General', 0);")
                .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db).await?;
        let response = server
            .patch("/notes/7")
            .json(&json!({
                "note": "second",
                "completed": true
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        let note = response.json::<Note>();
        assert_eq!(note.note.as_deref(), Some("second"));
        assert_eq!(note.completed, Some(true));

        let fetched = server.get("/notes/7").await.json::<NotesResponse>();
        assert_eq!(fetched.data.notes[0].completed, Some(true));
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_absent_fields() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute_batch("INSERT INTO notes (id, note, category, completed) VALUES (7, 'keep me', 'General', 0);")
                .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db).await?;
        let response = server.patch("/notes/7").json(&json!({"completed": true})).await;

        let note = response.json::<Note>();
        assert_eq!(note.note, None);
        assert_eq!(note.completed, Some(true));
        Ok(())
    }

    #[tokio::test]
    async fn update_leaves_updated_at_alone() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute_batch(
                r#"INSERT INTO notes (id, note, category, created_at, updated_at, completed)
                VALUES (7, 'first', 'General', '2024-01-01 00:00:00', '2024-01-02 00:00:00', 0);"#,
            )
            .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db).await?;
        let response = server
            .patch("/notes/7")
            .json(&json!({
                "note": "second",
                "completed": true
            }))
            .await;

        let note = response.json::<Note>();
        assert!(note.updated_at.to_rfc3339().starts_with("2024-01-02"));
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_note() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .patch("/notes/999999")
            .json(&json!({"note": "x", "completed": true}))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<QueryResult>().row_count, 0);
        Ok(())
    }

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, super::router).await
    }
}
