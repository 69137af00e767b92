//! Global shortcuts, menu routing and source selection

use std::collections::HashSet;
use std::sync::Arc;

use GameKeeper::handlers::{ConversationEngine, HandlerRegistry};
use GameKeeper::state::Step;
use GameKeeper::transport::Keyboard;
use GameKeeper::InboundEvent;

use crate::helpers::*;

const INTERRUPTIBLE: [Step; 12] = [
    Step::ChoosingSource,
    Step::AddingName,
    Step::AddingCategory,
    Step::AddingMin,
    Step::AddingMax,
    Step::DeletingSelect,
    Step::DeletingConfirm,
    Step::EditingSelect,
    Step::EditingField,
    Step::PlanningSelect,
    Step::PlanningDate,
    Step::PlanningTime,
];

#[tokio::test]
async fn test_back_from_every_step() {
    for step in INTERRUPTIBLE {
        let ctx = TestContext::new().await;
        ctx.reach(USER, step).await;

        ctx.press(USER, "back").await;
        let context = ctx.context(USER).await;
        assert_eq!(context.step, Step::MainMenu, "back from {}", step);
        assert!(!context.has_staged_data(), "state left after back from {}", step);
        assert_eq!(ctx.transport.last_keyboard(USER).map(|k| matches!(k, Keyboard::Reply(_))), Some(true));
    }
}

#[tokio::test]
async fn test_cancel_from_every_step() {
    for step in INTERRUPTIBLE {
        let ctx = TestContext::new().await;
        ctx.reach(USER, step).await;
        ctx.transport.clear();

        ctx.press(USER, "cancel").await;
        let context = ctx.context(USER).await;
        assert_eq!(context.step, Step::MainMenu, "cancel from {}", step);
        assert!(!context.has_staged_data(), "state left after cancel from {}", step);

        if let Some(workflow) = step.workflow() {
            let texts = ctx.transport.texts(USER);
            assert_eq!(texts[0], ctx.t(workflow.cancel_message_key()), "cancel message for {}", step);
        }
    }
}

#[tokio::test]
async fn test_start_resets_conversation() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingMax).await;

    ctx.text(USER, "/start").await;
    let context = ctx.context(USER).await;
    assert_eq!(context.step, Step::ChoosingSource);
    assert!(!context.has_staged_data());
    assert!(ctx.transport.last_tokens(USER).contains(&"back".to_string()));
}

#[tokio::test]
async fn test_source_selection_without_backend() {
    let ctx = TestContext::without_backend().await;

    ctx.text(USER, "hello").await;
    assert_eq!(ctx.step(USER).await, Step::ChoosingSource);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("welcome"));
    assert_eq!(
        ctx.transport.last_tokens(USER),
        vec!["source:json".to_string(), "source:postgres".to_string()]
    );

    ctx.text(USER, "json please").await;
    assert_eq!(ctx.step(USER).await, Step::ChoosingSource);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("source.use_buttons"));

    ctx.press(USER, "source:mongo").await;
    assert_eq!(ctx.step(USER).await, Step::ChoosingSource);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), "Unknown data source: source:mongo");

    ctx.press(USER, "source:json").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert!(ctx.transport.has_text(USER, "Data source selected: JSON file"));
    assert!(ctx.backends.current().is_some());
}

#[tokio::test]
async fn test_menu_without_backend_prompts_start() {
    let ctx = TestContext::without_backend().await;
    ctx.text(USER, "/start").await;
    ctx.press(USER, "back").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.no_backend"));

    ctx.text(USER, "Add game").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.no_backend"));
}

#[tokio::test]
async fn test_unknown_menu_command() {
    let ctx = TestContext::new().await;
    ctx.open_menu(USER).await;

    ctx.text(USER, "Play chess").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("menu.unknown_command"));
}

#[tokio::test]
async fn test_unexpected_selection_gets_alert() {
    let ctx = TestContext::new().await;
    ctx.open_menu(USER).await;

    let event_id = ctx.press(USER, "delete:1").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    let ack = ctx.transport.acks().into_iter().find(|(id, _, _)| *id == event_id).unwrap();
    assert_eq!(ack.1, ctx.t("errors.unsupported_action"));
    assert!(ack.2);
}

#[tokio::test]
async fn test_every_selection_acknowledged_once() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::DeletingConfirm).await;
    ctx.press(USER, "confirm:no").await;
    ctx.press(USER, "bogus").await;

    let acks = ctx.transport.acks();
    let ids: HashSet<_> = acks.iter().map(|(id, _, _)| id.clone()).collect();
    assert_eq!(ids.len(), acks.len());
    // source, delete, confirm, bogus
    assert_eq!(acks.len(), 4);
}

#[tokio::test]
async fn test_random_and_refresh_stay_in_menu() {
    let ctx = TestContext::new().await;
    ctx.open_menu(USER).await;

    ctx.text(USER, "Random game").await;
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("random.empty"));

    ctx.add_game("Azul", "Puzzle", 2, 4).await;
    ctx.text(USER, "Random game").await;
    let pick = ctx.transport.last_text(USER).unwrap();
    assert!(pick.starts_with("Random game:\n\nAzul"));
    assert!(pick.ends_with("Last played: never"));

    ctx.text(USER, "Refresh statuses").await;
    assert!(ctx.transport.has_text(USER, "Statuses refreshed. Changed: 0."));
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
}

#[tokio::test]
async fn test_russian_user() {
    let ctx = TestContext::new().await;
    let russian = |text: &str| InboundEvent::text(USER, text).with_language(Some("ru-RU".to_string()));

    ctx.engine.dispatch(russian("/start")).await;
    assert_eq!(ctx.context(USER).await.language, "ru");
    ctx.press(USER, "source:json").await;

    ctx.engine.dispatch(russian(&ctx.i18n.t("menu.add", "ru", None))).await;
    assert_eq!(ctx.step(USER).await, Step::AddingName);
    assert_eq!(
        ctx.transport.last_text(USER).unwrap(),
        ctx.i18n.t("adding.enter_title", "ru", None)
    );
}

#[tokio::test]
async fn test_english_labels_work_for_russian_user() {
    let ctx = TestContext::new().await;
    ctx.engine
        .dispatch(InboundEvent::text(USER, "/start").with_language(Some("ru".to_string())))
        .await;
    ctx.press(USER, "source:json").await;

    ctx.text(USER, "Add game").await;
    assert_eq!(ctx.step(USER).await, Step::AddingName);
}

#[tokio::test]
async fn test_unregistered_step_falls_back_to_menu() {
    let ctx = TestContext::new().await;
    let engine = Arc::new(ConversationEngine::with_handlers(
        ctx.transport.clone(),
        ctx.i18n.clone(),
        ctx.backends.clone(),
        HandlerRegistry::new(),
    ));

    engine.dispatch(InboundEvent::text(USER, "hello")).await;
    let context = engine.storage().snapshot(USER).await.unwrap();
    assert_eq!(context.step, Step::MainMenu);
    assert!(ctx.transport.has_text(USER, &ctx.t("errors.fallback")));
}
