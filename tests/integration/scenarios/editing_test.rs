//! Edit-game workflow

use GameKeeper::models::Category;
use GameKeeper::state::context::keys;
use GameKeeper::state::Step;

use crate::helpers::*;

#[tokio::test]
async fn test_edit_title() {
    let ctx = TestContext::new().await;
    let catan = ctx.reach(USER, Step::EditingField).await.unwrap();

    let context = ctx.context(USER).await;
    assert_eq!(context.selected_entry_id, Some(catan.id));
    assert_eq!(context.selected_entry.as_ref().map(|e| e.title.as_str()), Some("Catan"));

    ctx.press(USER, "field:title").await;
    assert_eq!(ctx.step(USER).await, Step::EditingField);
    assert_eq!(
        ctx.transport.last_text(USER).unwrap(),
        "Current Title: Catan\nEnter a new value:"
    );

    ctx.text(USER, "Catan: Seafarers").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert!(!ctx.context(USER).await.has_staged_data());

    let updated = ctx.catalog().require(catan.id).await.unwrap();
    assert_eq!(updated.title, "Catan: Seafarers");
    assert_eq!(updated.category, Category::Strategy);
}

#[tokio::test]
async fn test_edit_category_by_button() {
    let ctx = TestContext::new().await;
    let catan = ctx.reach(USER, Step::EditingField).await.unwrap();

    ctx.press(USER, "field:category").await;
    assert!(ctx.transport.last_tokens(USER).contains(&"category:Puzzle".to_string()));

    ctx.press(USER, "category:Puzzle").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert_eq!(ctx.catalog().require(catan.id).await.unwrap().category, Category::Puzzle);
}

#[tokio::test]
async fn test_invalid_value_stays_in_value_substate() {
    let ctx = TestContext::new().await;
    let catan = ctx.reach(USER, Step::EditingField).await.unwrap();

    ctx.press(USER, "field:max_players").await;
    ctx.text(USER, "1").await;

    assert_eq!(ctx.step(USER).await, Step::EditingField);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.max_below_min"));
    assert_eq!(
        ctx.context(USER).await.get_string(keys::EDITING_FIELD).as_deref(),
        Some("max_players")
    );

    ctx.text(USER, "6").await;
    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    assert_eq!(ctx.catalog().require(catan.id).await.unwrap().max_players, 6);
}

#[tokio::test]
async fn test_min_edit_does_not_recheck_max() {
    let ctx = TestContext::new().await;
    let catan = ctx.reach(USER, Step::EditingField).await.unwrap();

    ctx.press(USER, "field:min_players").await;
    ctx.text(USER, "6").await;

    assert_eq!(ctx.step(USER).await, Step::MainMenu);
    let updated = ctx.catalog().require(catan.id).await.unwrap();
    assert_eq!((updated.min_players, updated.max_players), (6, 4));
}

#[tokio::test]
async fn test_back_to_list() {
    let ctx = TestContext::new().await;
    let catan = ctx.reach(USER, Step::EditingField).await.unwrap();

    ctx.press(USER, "back_to_list").await;
    assert_eq!(ctx.step(USER).await, Step::EditingSelect);
    assert!(ctx.context(USER).await.selected_entry.is_none());
    assert!(ctx.transport.last_tokens(USER).contains(&format!("edit:{}", catan.id)));
}

#[tokio::test]
async fn test_text_before_choosing_field() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::EditingField).await;

    ctx.text(USER, "Something").await;
    assert_eq!(ctx.step(USER).await, Step::EditingField);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.use_buttons"));
}

#[tokio::test]
async fn test_unknown_field_token() {
    let ctx = TestContext::new().await;
    ctx.reach(USER, Step::EditingField).await;

    ctx.press(USER, "field:status").await;
    assert_eq!(ctx.step(USER).await, Step::EditingField);
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.unknown_field"));
}
