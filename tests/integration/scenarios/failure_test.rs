//! Error recovery: storage failures, missing staged data, transport outages

use std::sync::Arc;

use async_trait::async_trait;
use GameKeeper::database::CatalogStore;
use GameKeeper::models::{Category, Entry, NewEntry};
use GameKeeper::services::BackendKind;
use GameKeeper::state::context::keys;
use GameKeeper::state::Step;
use GameKeeper::{GameKeeperError, Result};

use crate::helpers::*;

/// A store whose every operation fails like a lost connection
struct BrokenStore;

fn broken() -> GameKeeperError {
    GameKeeperError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "storage offline"))
}

#[async_trait]
impl CatalogStore for BrokenStore {
    fn backend_name(&self) -> &'static str {
        "broken"
    }

    async fn add(&self, _entry: NewEntry) -> Result<i64> {
        Err(broken())
    }

    async fn get_all(&self) -> Result<Vec<Entry>> {
        Err(broken())
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<Entry>> {
        Err(broken())
    }

    async fn update(&self, _entry: &Entry) -> Result<()> {
        Err(broken())
    }

    async fn delete(&self, _id: i64) -> Result<()> {
        Err(broken())
    }

    async fn search(&self, _query: &str) -> Result<Vec<Entry>> {
        Err(broken())
    }

    async fn by_category_and_capacity(&self, _category: Category, _players: i32) -> Result<Vec<Entry>> {
        Err(broken())
    }
}

#[tokio::test]
async fn test_storage_failure_keeps_step_and_data() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingMax).await;
    let before = ctx.context(USER).await;

    ctx.backends.install(BackendKind::Json, Arc::new(BrokenStore));
    ctx.text(USER, "4").await;

    let after = ctx.context(USER).await;
    assert_eq!(after.step, Step::AddingMax);
    assert_eq!(after.get_string(keys::TITLE).as_deref(), Some("Catan"));
    assert_eq!(after.get_i64(keys::MIN_PLAYERS), before.get_i64(keys::MIN_PLAYERS));
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.backend"));

    // retry succeeds once storage is back
    ctx.backends.activate(BackendKind::Json).await.unwrap();
    ctx.text(USER, "4").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert_eq!(ctx.catalog().get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_json_write_then_retry_adds_once() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingMax).await;

    let blocker = ctx.temp_dir.path().join("games.json.tmp");
    std::fs::create_dir(&blocker).unwrap();
    ctx.text(USER, "4").await;

    assert_eq!(ctx.step(USER).await, Step::AddingMax);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.backend"));
    assert!(ctx.catalog().get_all().await.unwrap().is_empty());

    std::fs::remove_dir(&blocker).unwrap();
    ctx.text(USER, "4").await;

    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    let games = ctx.catalog().get_all().await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].title, "Catan");
}

#[tokio::test]
async fn test_storage_failure_on_selection_keeps_step() {
    let ctx = TestContext::new().await;
    let catan = ctx.reach(USER, Step::EditingSelect).await.unwrap();

    ctx.backends.install(BackendKind::Json, Arc::new(BrokenStore));
    ctx.press(USER, &format!("edit:{}", catan.id)).await;

    let context = ctx.context(USER).await;
    assert_eq!(context.step, Step::EditingSelect);
    assert!(context.selected_entry.is_none());
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.backend"));
}

#[tokio::test]
async fn test_missing_staged_title_returns_to_menu() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingMax).await;
    ctx.engine.storage().lock(USER).await.data.clear();

    ctx.text(USER, "4").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert!(ctx.transport.has_text(USER, &ctx.t("errors.missing_data")));
    assert!(ctx.catalog().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_staged_date_returns_to_menu() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::PlanningTime).await;
    ctx.engine.storage().lock(USER).await.staged_date = None;

    ctx.text(USER, "18:30").await;
    let context = ctx.context(USER).await;
    assert_eq!(context.step, Step::MainMenu);
    assert!(!context.has_staged_data());
    assert!(ctx.transport.has_text(USER, &ctx.t("errors.missing_data")));
}

#[tokio::test]
async fn test_transport_outage_does_not_break_conversation() {
    let ctx = TestContext::new().await;
    ctx.open_menu(USER).await;

    ctx.transport.set_failing(true);
    ctx.text(USER, "Add game").await;
    ctx.text(USER, "Catan").await;
    ctx.press(USER, "category:Strategy").await;
    assert_eq!(ctx.step(USER).await, Step::AddingMin);

    ctx.transport.set_failing(false);
    ctx.text(USER, "2").await;
    ctx.text(USER, "4").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
}
