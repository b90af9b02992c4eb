mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{notes, SteppedRepository, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn created_note_is_listed_incomplete() -> Result<()> {
    let app = TestApp::new();
    let user = app.user("alice").await;

    let (status, body) = app.create(user, "groceries", "milk, eggs").await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message"], "New note created");
    assert!(body["data"].get("id").is_none());

    let (_, list) = app.list().await?;
    let listed = notes(&list);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "groceries");
    assert_eq!(listed[0]["text"], "milk, eggs");
    assert_eq!(listed[0]["completed"], false);
    Ok(())
}

#[tokio::test]
async fn duplicate_title_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;

    let (first, _) = app.create(alice, "standup", "notes").await?;
    let (second, body) = app.create(bob, "standup", "other notes").await?;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(body["message"], "Duplicate note title");
    assert_eq!(app.repo.note_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn title_match_is_case_sensitive() -> Result<()> {
    let app = TestApp::new();
    let user = app.user("alice").await;

    app.create(user, "Standup", "a").await?;
    let (status, _) = app.create(user, "standup", "b").await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.repo.note_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_listed() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .request(Method::POST, "/notes", Some(json!({ "title": "only a title", "text": "" })))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "All fields are required");
    assert!(body["field_errors"].get("user").is_some());
    assert!(body["field_errors"].get("text").is_some());
    assert!(body["field_errors"].get("title").is_none());
    Ok(())
}

#[tokio::test]
async fn unknown_owner_is_a_validation_error() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.create(Uuid::new_v4(), "lost", "text").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown user");
    assert_eq!(app.repo.note_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_body_gets_structured_error() -> Result<()> {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))?;

    let (status, body) = app.send(request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn concurrent_creates_with_same_title_may_both_succeed() -> Result<()> {
    // Both requests finish their duplicate lookup before either inserts
    let app = TestApp::with_steps(SteppedRepository::new().rendezvous_on_title(2));
    let user = app.user("alice").await;

    let attempts: Vec<_> = ["first", "second"]
        .into_iter()
        .map(|text| {
            let app = app.clone();
            tokio::spawn(async move { app.create(user, "racy", text).await })
        })
        .collect();

    for attempt in attempts {
        let (status, body) = attempt.await??;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }
    assert_eq!(app.repo.note_count().await, 2);

    let (_, list) = app.list().await?;
    assert!(notes(&list).iter().all(|n| n["title"] == "racy"));
    Ok(())
}
