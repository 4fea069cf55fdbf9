mod common;

use anyhow::Result;
use menu_engine::entity::models::MenuUsage;
use menu_engine::entity::seed::SeedOptions;
use menu_engine::permission::Principal;
use menu_engine::types::Scope;
use std::sync::Arc;
use uuid::Uuid;

// End-to-end behavior of the composed service: caching, invalidation, and
// the seed convenience flag.

#[tokio::test]
async fn unfiltered_tree_is_served_from_cache() -> Result<()> {
    let env = common::env().await?;
    let scope = Scope::dashboard(env.index.dashboard("D1").unwrap());

    let first = env.service.unfiltered_tree(scope).await?;
    let second = env.service.unfiltered_tree(scope).await?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[tokio::test]
async fn writes_show_up_after_invalidation() -> Result<()> {
    use menu_engine::entity::models::MenuItem;

    let env = common::env().await?;
    let dashboard = env.index.dashboard("D1").unwrap();
    let scope = Scope::dashboard(dashboard);
    let before = env.service.unfiltered_tree(scope).await?.len();

    let reports = env
        .store
        .insert_menu_item(MenuItem::new("Reports").with_target("reports"))
        .await?;
    env.store
        .insert_menu_usage(MenuUsage::new(reports, dashboard, 9))
        .await?;

    // Still the cached tree until the write surface invalidates the scope
    assert_eq!(env.service.unfiltered_tree(scope).await?.len(), before);

    env.service.invalidate(scope);
    let after = env.service.unfiltered_tree(scope).await?.len();
    assert_eq!(after, before + 1);
    Ok(())
}

#[tokio::test]
async fn scope_mismatch_surfaces_with_a_stable_code() -> Result<()> {
    let env = common::env().await?;
    let dashboard = env.index.dashboard("D1").unwrap();

    let err = env
        .service
        .menu_for(
            Scope::workspace(dashboard, Uuid::new_v4()),
            &Principal::new(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "WORKSPACE_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn grant_full_access_never_overrides_an_explicit_deny() -> Result<()> {
    let env = common::env_with(&SeedOptions { grant_full_access: true }).await?;
    let dashboard = env.index.dashboard("D1").unwrap();
    let u1 = env.index.user("u1").unwrap();
    let u2 = env.index.user("u2").unwrap();

    // u2 got the blanket full grant on everything
    let forest = env
        .service
        .menu_for(Scope::dashboard(dashboard), &Principal::new(u2))
        .await?;
    assert!(forest.find("Settings").is_some());

    // u1's explicit per-user deny predates the blanket grant; the grant is a
    // duplicate subject for that menu and is skipped
    let forest = env
        .service
        .menu_for(Scope::dashboard(dashboard), &Principal::new(u1))
        .await?;
    assert!(forest.find("Settings").is_none());
    Ok(())
}
