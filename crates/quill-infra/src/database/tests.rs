use std::sync::Arc;

use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::json;

use quill_core::domain::{CandidatePost, PostStatus};
use quill_core::ports::{IndexQuery, PostStore, Record, STATUS_INDEX};
use quill_core::{PostError, PostRepository, StoreError};

use crate::database::PostgresPostStore;
use crate::database::entity::post_record;

fn exec_result(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn row(post_id: &str, status: &str, created_at: &str) -> post_record::Model {
    post_record::Model {
        post_id: post_id.to_string(),
        status: status.to_string(),
        created_at: created_at.to_string(),
        record: json!({
            "postId": post_id,
            "title": "Title",
            "content": "Content",
            "status": status,
            "createdAt": created_at,
            "updatedAt": created_at,
            "tags": [],
        }),
    }
}

fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_put_if_absent_inserts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result(1)])
        .into_connection();
    let store = PostgresPostStore::new(db);

    let result = store
        .put_if_absent(
            "p1",
            record(json!({ "status": "draft", "createdAt": "2024-01-01T00:00:00.000Z" })),
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_put_if_absent_reports_conflict() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result(0)])
        .into_connection();
    let store = PostgresPostStore::new(db);

    let err = store
        .put_if_absent(
            "p1",
            record(json!({ "status": "draft", "createdAt": "2024-01-01T00:00:00.000Z" })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { ref key } if key == "p1"));
}

#[tokio::test]
async fn test_put_without_indexed_attributes_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let store = PostgresPostStore::new(db);

    let err = store
        .put_if_absent("p1", record(json!({ "title": "x" })))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Query(_)));
}

#[tokio::test]
async fn test_query_returns_records_in_row_order() {
    let post_id = uuid::Uuid::new_v4().to_string();
    let older_id = uuid::Uuid::new_v4().to_string();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            row(&post_id, "published", "2024-01-02T00:00:00.000Z"),
            row(&older_id, "published", "2024-01-01T00:00:00.000Z"),
        ]])
        .into_connection();
    let store = PostgresPostStore::new(db);

    let records = store
        .query_by_index(&IndexQuery::new(STATUS_INDEX, "published").descending().limit(50))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["postId"], post_id.as_str());
}

#[tokio::test]
async fn test_query_unknown_index() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let store = PostgresPostStore::new(db);

    let err = store
        .query_by_index(&IndexQuery::new("author", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownIndex(_)));
}

#[tokio::test]
async fn test_repository_over_postgres_lists_published() {
    let post_id = uuid::Uuid::new_v4().to_string();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(&post_id, "published", "2024-03-01T12:00:00.000Z")]])
        .into_connection();
    let repo = PostRepository::new(Arc::new(PostgresPostStore::new(db)));

    let posts = repo.list_published(None).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post_id.to_string(), post_id);
    assert_eq!(posts[0].status, PostStatus::Published);
}

#[tokio::test]
async fn test_repository_over_postgres_maps_conflict() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result(0)])
        .into_connection();
    let repo = PostRepository::new(Arc::new(PostgresPostStore::new(db)));

    let err = repo
        .create(&CandidatePost::new("Title", "Body"))
        .await
        .unwrap_err();
    assert!(matches!(err, PostError::Conflict { .. }));
}
