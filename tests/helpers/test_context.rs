//! Test context for unified test setup
//!
//! Wires a `ConversationEngine` to a `RecordingTransport` and a JSON catalog
//! inside a temporary directory.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Once};

use tempfile::TempDir;
use GameKeeper::config::Settings;
use GameKeeper::models::{Entry, EntryStatus};
use GameKeeper::services::{BackendKind, BackendRegistry, CatalogService};
use GameKeeper::state::{ConversationContext, Step};
use GameKeeper::{ConversationEngine, I18n, InboundEvent};

use super::recording_transport::RecordingTransport;

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

pub const USER: i64 = 1001;

/// Unified test context that manages all test components
pub struct TestContext {
    pub engine: Arc<ConversationEngine>,
    pub transport: Arc<RecordingTransport>,
    pub i18n: Arc<I18n>,
    pub backends: Arc<BackendRegistry>,
    pub settings: Settings,
    pub temp_dir: TempDir,
    next_event: AtomicU64,
}

impl TestContext {
    /// A context with the JSON backend already active
    pub async fn new() -> Self {
        let ctx = Self::without_backend().await;
        ctx.backends
            .activate(BackendKind::Json)
            .await
            .expect("Failed to activate JSON backend");
        ctx
    }

    /// A context where no backend has been chosen yet
    pub async fn without_backend() -> Self {
        init_test_logging();

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = Self::create_test_settings(&temp_dir);

        let i18n = Arc::new(I18n::new(&settings.i18n).expect("Failed to load translations"));
        let backends = Arc::new(BackendRegistry::new(&settings));
        let transport = Arc::new(RecordingTransport::new());
        let engine = Arc::new(ConversationEngine::new(transport.clone(), i18n.clone(), backends.clone()));

        Self {
            engine,
            transport,
            i18n,
            backends,
            settings,
            temp_dir,
            next_event: AtomicU64::new(1),
        }
    }

    /// Create test-specific settings
    fn create_test_settings(temp_dir: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "12345:test_token".to_string();
        settings.storage.json_path = temp_dir.path().join("games.json").to_string_lossy().to_string();
        settings.logging.level = "debug".to_string();
        settings.logging.file_path = temp_dir.path().join("logs").to_string_lossy().to_string();
        settings
    }

    /// English translation of `key`
    pub fn t(&self, key: &str) -> String {
        self.i18n.t(key, "en", None)
    }

    pub async fn text(&self, user_id: i64, text: &str) {
        self.engine.dispatch(InboundEvent::text(user_id, text)).await;
    }

    /// Press a button; returns the generated event id
    pub async fn press(&self, user_id: i64, token: &str) -> String {
        let event_id = format!("cb-{}", self.next_event.fetch_add(1, Ordering::SeqCst));
        self.engine
            .dispatch(InboundEvent::selection(user_id, event_id.clone(), token))
            .await;
        event_id
    }

    pub async fn context(&self, user_id: i64) -> ConversationContext {
        self.engine
            .storage()
            .snapshot(user_id)
            .await
            .expect("User has no conversation yet")
    }

    pub async fn step(&self, user_id: i64) -> Step {
        self.context(user_id).await.step
    }

    pub fn catalog(&self) -> CatalogService {
        self.backends.current().expect("No active backend").catalog.clone()
    }

    pub async fn add_game(&self, title: &str, category: &str, min: i32, max: i32) -> Entry {
        self.catalog()
            .create(title, category, min, max)
            .await
            .expect("Failed to add game")
    }

    /// `/start` and pick the JSON source, ending in the main menu
    pub async fn open_menu(&self, user_id: i64) {
        self.text(user_id, "/start").await;
        self.press(user_id, "source:json").await;
        assert_eq!(self.step(user_id).await, Step::MainMenu);
    }

    /// Drive the conversation into `step`. Adds a game first when the step
    /// needs one to select.
    pub async fn reach(&self, user_id: i64, step: Step) -> Option<Entry> {
        self.open_menu(user_id).await;
        let entry = match step {
            Step::DeletingSelect
            | Step::DeletingConfirm
            | Step::EditingSelect
            | Step::EditingField
            | Step::PlanningSelect
            | Step::PlanningDate
            | Step::PlanningTime => Some(self.add_game("Catan", "Strategy", 2, 4).await),
            _ => None,
        };
        let id = entry.as_ref().map(|e| e.id).unwrap_or_default();

        match step {
            Step::Start => unreachable!("START is only left, never reached"),
            Step::ChoosingSource => self.text(user_id, "Change source").await,
            Step::MainMenu => {}
            Step::AddingName => self.text(user_id, "Add game").await,
            Step::AddingCategory => {
                self.text(user_id, "Add game").await;
                self.text(user_id, "Catan").await;
            }
            Step::AddingMin => {
                self.text(user_id, "Add game").await;
                self.text(user_id, "Catan").await;
                self.press(user_id, "category:Strategy").await;
            }
            Step::AddingMax => {
                self.text(user_id, "Add game").await;
                self.text(user_id, "Catan").await;
                self.press(user_id, "category:Strategy").await;
                self.text(user_id, "2").await;
            }
            Step::DeletingSelect => self.text(user_id, "Delete game").await,
            Step::DeletingConfirm => {
                self.text(user_id, "Delete game").await;
                self.press(user_id, &format!("delete:{}", id)).await;
            }
            Step::EditingSelect => self.text(user_id, "Edit game").await,
            Step::EditingField => {
                self.text(user_id, "Edit game").await;
                self.press(user_id, &format!("edit:{}", id)).await;
            }
            Step::PlanningSelect => self.text(user_id, "Plan session").await,
            Step::PlanningDate => {
                self.text(user_id, "Plan session").await;
                self.press(user_id, &format!("plan:{}", id)).await;
            }
            Step::PlanningTime => {
                self.text(user_id, "Plan session").await;
                self.press(user_id, &format!("plan:{}", id)).await;
                self.text(user_id, &tomorrow()).await;
            }
        }

        assert_eq!(self.step(user_id).await, step, "failed to reach {}", step);
        entry
    }
}

/// Tomorrow in DD.MM.YYYY, server local time
pub fn tomorrow() -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::days(1))
        .format("%d.%m.%Y")
        .to_string()
}

pub fn assert_active(entry: &Entry) {
    assert_eq!(entry.status, EntryStatus::Active, "{} should be active", entry.title);
}
