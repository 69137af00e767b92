//! Read-only query commands

use GameKeeper::handlers::CatalogQuery;
use GameKeeper::state::Step;

use crate::helpers::*;

async fn seeded() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.add_game("Catan", "Strategy", 3, 4).await;
    ctx.add_game("Terraforming Mars", "Strategy", 1, 5).await;
    ctx.add_game("Portal 2", "Puzzle", 1, 2).await;
    ctx
}

#[tokio::test]
async fn test_search_by_title_and_category() {
    let ctx = seeded().await;

    ctx.engine.answer_query(USER, None, CatalogQuery::Search("mars".into())).await;
    let text = ctx.transport.last_text(USER).unwrap();
    assert!(text.starts_with("Found 1:"));
    assert!(text.contains("Terraforming Mars"));

    ctx.engine.answer_query(USER, None, CatalogQuery::Search("strat".into())).await;
    assert!(ctx.transport.last_text(USER).unwrap().starts_with("Found 2:"));

    ctx.engine.answer_query(USER, None, CatalogQuery::Search("chess".into())).await;
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("queries.none"));
}

#[tokio::test]
async fn test_find_orders_by_capacity() {
    let ctx = seeded().await;

    ctx.engine.answer_query(USER, None, CatalogQuery::Find("Strategy 4".into())).await;
    let text = ctx.transport.last_text(USER).unwrap();
    let mars = text.find("Terraforming Mars").unwrap();
    let catan = text.find("Catan").unwrap();
    assert!(mars < catan);

    ctx.engine.answer_query(USER, None, CatalogQuery::Find("Strategy".into())).await;
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("queries.find_usage"));
}

#[tokio::test]
async fn test_players_query() {
    let ctx = seeded().await;

    ctx.engine.answer_query(USER, None, CatalogQuery::Players("1".into())).await;
    let text = ctx.transport.last_text(USER).unwrap();
    assert!(text.starts_with("Found 2:"));
    assert!(!text.contains("Catan"));

    ctx.engine.answer_query(USER, None, CatalogQuery::Players("many".into())).await;
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("queries.players_usage"));
}

#[tokio::test]
async fn test_queries_leave_conversation_alone() {
    let ctx = seeded().await;
    ctx.reach(USER, Step::AddingName).await;

    ctx.engine.answer_query(USER, None, CatalogQuery::Search("catan".into())).await;
    assert_eq!(ctx.step(USER).await, Step::AddingName);
}

#[tokio::test]
async fn test_queries_without_backend() {
    let ctx = TestContext::without_backend().await;
    ctx.engine.answer_query(USER, None, CatalogQuery::Search("catan".into())).await;
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.t("errors.no_backend"));
}

#[tokio::test]
async fn test_help() {
    let ctx = TestContext::new().await;
    ctx.engine.send_help(USER, Some("ru")).await;
    assert_eq!(ctx.transport.last_text(USER).unwrap(), ctx.i18n.t("help", "ru", None));
}
