mod common;

use anyhow::Result;
use menu_engine::permission::Principal;
use menu_engine::resolver::Resolution;
use menu_engine::types::Scope;
use uuid::Uuid;

// Resolution outcomes as seen through the full pipeline.

#[tokio::test]
async fn static_beats_dynamic_and_unknown_targets_degrade() -> Result<()> {
    let env = common::env().await?;
    let dashboard = env.index.dashboard("D1").unwrap();
    let principal = Principal::new(Uuid::new_v4());

    let forest = env.service.menu_for(Scope::dashboard(dashboard), &principal).await?;

    // overview exists in both catalogs; the static manifest must win
    match &forest.find("Overview").unwrap().resolution {
        Resolution::Static(manifest) => assert_eq!(manifest.title, "Overview"),
        other => panic!("expected static resolution, got {:?}", other),
    }

    // tasks only exists dynamically
    assert!(matches!(
        forest.find("Tasks").unwrap().resolution,
        Resolution::Dynamic(_)
    ));

    // billing has no manifest anywhere; resolution carries the slug for
    // diagnostics instead of failing
    match &forest.find("Billing").unwrap().resolution {
        Resolution::Unresolved { target } => assert_eq!(target.as_deref(), Some("billing")),
        other => panic!("expected unresolved, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn registry_lookup_order_is_observable_directly() -> Result<()> {
    let registry = common::registry();
    let manifest = registry.find("overview").unwrap();
    assert_eq!(manifest.feature_kind, menu_engine::registry::FeatureKind::Static);
    assert!(registry.find_dynamic("overview").is_some());
    Ok(())
}
