// Runs against a real PostgreSQL when DATABASE_URL is set; skipped otherwise.
mod common;

use std::time::Duration;

use anyhow::{Context, Result};
use common::TestServer;
use notes_api::config::AppConfig;
use notes_api::database::{DatabaseManager, NoteRepository, PgNoteRepository};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

fn database_configured() -> bool {
    std::env::var("DATABASE_URL").map(|v| !v.is_empty()).unwrap_or(false)
}

#[tokio::test]
async fn note_lifecycle_against_postgres() -> Result<()> {
    if !database_configured() {
        eprintln!("DATABASE_URL not set; skipping live PostgreSQL test");
        return Ok(());
    }

    let pool = DatabaseManager::connect(&AppConfig::from_env().database).await?;
    let repo = PgNoteRepository::new(pool);
    repo.migrate().await?;
    let owner = repo.add_user("live-test").await?;

    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(15)).await?;
    let client = reqwest::Client::new();
    let url = format!("{}/notes", server.base_url);
    let title = format!("live-{}", Uuid::new_v4().simple());

    let res = client
        .post(&url)
        .json(&json!({ "user": owner.id, "title": title, "text": "from the live test" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(&url)
        .json(&json!({ "user": owner.id, "title": title, "text": "again" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let list: Value = client.get(&url).send().await?.json().await?;
    let note = list["data"]
        .as_array()
        .and_then(|notes| notes.iter().find(|n| n["title"] == title.as_str()).cloned())
        .context("created note missing from list")?;
    assert_eq!(note["username"], "live-test");
    assert_eq!(note["completed"], false);
    let id = note["id"].as_str().context("note without id")?.to_string();

    let res = client
        .patch(&url)
        .json(&json!({
            "id": id,
            "user": owner.id,
            "title": title,
            "text": "edited",
            "completed": true
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["note"]["completed"], true);

    let res = client.delete(&url).json(&json!({ "id": id })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert!(body["data"]["message"].as_str().unwrap_or_default().contains(&id));

    assert!(repo.select_by_id(Uuid::parse_str(&id)?).await?.is_none());
    repo.close().await;
    Ok(())
}
