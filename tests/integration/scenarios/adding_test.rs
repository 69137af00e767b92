//! Add-game workflow

use GameKeeper::models::Category;
use GameKeeper::state::context::keys;
use GameKeeper::state::Step;

use crate::helpers::*;

#[tokio::test]
async fn test_add_catan() {
    let ctx = TestContext::new().await;
    ctx.open_menu(USER).await;

    ctx.text(USER, "Add game").await;
    assert_eq!(ctx.step(USER).await, Step::AddingName);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("adding.enter_title"));

    ctx.text(USER, "Catan").await;
    assert_eq!(ctx.step(USER).await, Step::AddingCategory);
    let tokens = ctx.transport.last_tokens(USER);
    assert!(tokens.contains(&"category:Strategy".to_string()));
    assert!(tokens.contains(&"cancel".to_string()));

    ctx.press(USER, "category:Strategy").await;
    assert_eq!(ctx.step(USER).await, Step::AddingMin);

    ctx.text(USER, "2").await;
    assert_eq!(ctx.step(USER).await, Step::AddingMax);

    ctx.text(USER, "4").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert!(!ctx.context(USER).await.has_staged_data());

    let games = ctx.catalog().get_all().await.unwrap();
    assert_eq!(games.len(), 1);
    let catan = &games[0];
    assert_eq!(catan.title, "Catan");
    assert_eq!(catan.category, Category::Strategy);
    assert_eq!((catan.min_players, catan.max_players), (2, 4));
    assert!(catan.last_played.is_none());
    assert_active(catan);

    assert!(ctx.transport.has_text(USER, "Game 'Catan' added successfully!"));
    let menu = ctx.transport.last_text(USER).unwrap();
    assert!(menu.contains("1. Catan (Strategy)"));
}

#[tokio::test]
async fn test_short_title_keeps_step() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingName).await;

    ctx.text(USER, "A").await;
    assert_eq!(ctx.step(USER).await, Step::AddingName);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.title_length"));
    assert!(ctx.context(USER).await.get_string(keys::TITLE).is_none());
}

#[tokio::test]
async fn test_title_is_trimmed() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingName).await;

    ctx.text(USER, "   Azul   ").await;
    assert_eq!(ctx.context(USER).await.get_string(keys::TITLE).as_deref(), Some("Azul"));
}

#[tokio::test]
async fn test_player_count_errors() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingMin).await;

    ctx.text(USER, "two").await;
    assert_eq!(ctx.step(USER).await, Step::AddingMin);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.parse_number"));

    ctx.text(USER, "17").await;
    assert_eq!(ctx.step(USER).await, Step::AddingMin);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.min_players"));

    ctx.text(USER, "3").await;
    assert_eq!(ctx.step(USER).await, Step::AddingMax);

    ctx.text(USER, "2").await;
    assert_eq!(ctx.step(USER).await, Step::AddingMax);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.max_below_min"));

    ctx.text(USER, "3").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert_eq!(ctx.catalog().get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_text_instead_of_category_button() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingCategory).await;

    ctx.text(USER, "Strategy").await;
    assert_eq!(ctx.step(USER).await, Step::AddingCategory);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.use_buttons"));
}

#[tokio::test]
async fn test_unknown_category_token() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::AddingCategory).await;

    ctx.press(USER, "category:Chess").await;
    assert_eq!(ctx.step(USER).await, Step::AddingCategory);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.unknown_category"));
}
