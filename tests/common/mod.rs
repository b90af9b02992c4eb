#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Barrier;
use tower::ServiceExt;
use uuid::Uuid;

use notes_api::config::AppConfig;
use notes_api::database::{
    DatabaseError, MemoryNoteRepository, NewNote, Note, NoteRepository, User,
};
use notes_api::{app, AppState};

/// The real router over an in-memory store, driven without a socket
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryNoteRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(mut config: AppConfig) -> Self {
        config.api.enable_request_logging = false;
        let repo = Arc::new(MemoryNoteRepository::new());
        let router = app(AppState::new(repo.clone(), config));
        Self { router, repo }
    }

    /// Serve through a `SteppedRepository` over the usual memory store
    pub fn with_steps(steps: SteppedRepository) -> Self {
        let mut config = AppConfig::default();
        config.api.enable_request_logging = false;
        let repo = steps.inner.clone();
        let router = app(AppState::new(Arc::new(steps), config));
        Self { router, repo }
    }

    pub async fn user(&self, username: &str) -> Uuid {
        self.repo.add_user(username).await.id
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("response is not JSON: {}", String::from_utf8_lossy(&bytes))
            })?
        };
        Ok((status, value))
    }

    pub async fn list(&self) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, "/notes", None).await
    }

    pub async fn create(&self, user: Uuid, title: &str, text: &str) -> Result<(StatusCode, Value)> {
        self.request(
            Method::POST,
            "/notes",
            Some(json!({ "user": user, "title": title, "text": text })),
        )
        .await
    }

    pub async fn update(&self, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PATCH, "/notes", Some(body)).await
    }

    pub async fn delete(&self, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, "/notes", Some(body)).await
    }

    /// Create a note and find its id through the list endpoint
    pub async fn seed_note(&self, user: Uuid, title: &str, text: &str) -> Result<Uuid> {
        let (status, body) = self.create(user, title, text).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "seed failed: {} {}", status, body);
        note_id(&self.list().await?.1, title)
    }
}

/// Memory store with hooks that force a given interleaving between the
/// separate store calls a handler makes
pub struct SteppedRepository {
    inner: Arc<MemoryNoteRepository>,
    title_barrier: Option<Arc<Barrier>>,
    vanish_after_read: bool,
}

impl SteppedRepository {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryNoteRepository::new()),
            title_barrier: None,
            vanish_after_read: false,
        }
    }

    /// Hold every title lookup until `callers` lookups are waiting
    pub fn rendezvous_on_title(mut self, callers: usize) -> Self {
        self.title_barrier = Some(Arc::new(Barrier::new(callers)));
        self
    }

    /// Delete a note right after it has been read by id
    pub fn vanish_after_read(mut self) -> Self {
        self.vanish_after_read = true;
        self
    }
}

#[async_trait]
impl NoteRepository for SteppedRepository {
    fn backend_tag(&self) -> &'static str {
        self.inner.backend_tag()
    }

    async fn select_all(&self) -> Result<Vec<Note>, DatabaseError> {
        self.inner.select_all().await
    }

    async fn select_by_id(&self, id: Uuid) -> Result<Option<Note>, DatabaseError> {
        let note = self.inner.select_by_id(id).await?;
        if self.vanish_after_read {
            self.inner.delete(id).await?;
        }
        Ok(note)
    }

    async fn select_by_title(&self, title: &str) -> Result<Option<Note>, DatabaseError> {
        let note = self.inner.select_by_title(title).await?;
        if let Some(barrier) = &self.title_barrier {
            barrier.wait().await;
        }
        Ok(note)
    }

    async fn create(&self, note: NewNote) -> Result<Note, DatabaseError> {
        self.inner.create(note).await
    }

    async fn update(&self, note: &Note) -> Result<Note, DatabaseError> {
        self.inner.update(note).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.inner.delete(id).await
    }

    async fn select_users(&self, ids: &[Uuid]) -> Result<Vec<User>, DatabaseError> {
        self.inner.select_users(ids).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.inner.health_check().await
    }

    async fn close(&self) {
        self.inner.close().await
    }
}

/// Notes in a list response
pub fn notes(body: &Value) -> Vec<Value> {
    body["data"].as_array().cloned().unwrap_or_default()
}

/// Id of the note with `title` in a list response
pub fn note_id(body: &Value, title: &str) -> Result<Uuid> {
    let note = notes(body)
        .into_iter()
        .find(|n| n["title"] == title)
        .with_context(|| format!("no note titled {:?} in {}", title, body))?;
    let id = note["id"].as_str().context("note without id")?;
    Ok(Uuid::parse_str(id)?)
}

/// A compiled `notes-api serve` process on a free port
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Inherits DATABASE_URL from the test environment
        let child = Command::new(env!("CARGO_BIN_EXE_notes-api"))
            .arg("serve")
            .env("NOTES_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
