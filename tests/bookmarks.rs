mod common;

use std::sync::Arc;

use common::{alice, signed_in, ScriptedService};
use wellkeep::{
    EntityTag, Notice, NoticeLevel, QueryCache, SaveOutcome, SavedItemType, SavedRef, SavedView,
    WellError, WellnessClient, WellnessService,
};

#[tokio::test]
async fn saving_the_same_mechanism_twice_keeps_one_entry() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    assert_eq!(
        client.save_coping_mechanism(7).await.unwrap(),
        SaveOutcome::Saved
    );
    assert_eq!(
        client.save_coping_mechanism(7).await.unwrap(),
        SaveOutcome::AlreadySaved
    );

    assert_eq!(service.calls("addCopingMechanismToSaved"), 1);

    let ledger = client.saved_items().await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].item_type, SavedItemType::CopingMechanism);
    assert_eq!(ledger[0].reference_id, 7);
    assert_ne!(ledger[0].id, 0, "the service assigns the real id");

    let notice = Notice::for_save(SaveOutcome::AlreadySaved, SavedItemType::CopingMechanism);
    assert_eq!(notice, Notice::info("This item is already saved"));
}

#[tokio::test]
async fn same_reference_id_of_different_kinds_are_distinct() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    client.save_coping_mechanism(3).await.unwrap();
    assert_eq!(client.save_topic(3).await.unwrap(), SaveOutcome::Saved);
    assert_eq!(
        Notice::for_save(client.save_topic(3).await.unwrap(), SavedItemType::Topic),
        Notice::info("This topic is already saved")
    );

    assert!(client.is_saved(SavedRef::mechanism(3)).await.unwrap());
    assert!(client.is_saved(SavedRef::topic(3)).await.unwrap());
    assert!(!client.is_saved(SavedRef::topic(4)).await.unwrap());
    assert_eq!(client.saved_items().await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_save_leaves_cache_untouched_then_retry_invalidates_once() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    // Prime the ledger so the cache holds a fresh copy.
    assert!(client.saved_items().await.unwrap().is_empty());
    assert_eq!(service.calls("getSavedItems"), 1);

    service.fail_writes(true);
    let error = client.save_topic(2).await.unwrap_err();
    assert!(matches!(error, WellError::Remote { .. }));
    assert_eq!(
        Notice::for_error(&error, "Failed to save topic"),
        Notice::error("Failed to save topic")
    );
    assert_eq!(client.cache().invalidation_count(EntityTag::SavedItems), 0);

    // Still served from cache: no refetch happened.
    assert!(client.saved_items().await.unwrap().is_empty());
    assert_eq!(service.calls("getSavedItems"), 1);

    service.fail_writes(false);
    assert_eq!(client.save_topic(2).await.unwrap(), SaveOutcome::Saved);
    assert_eq!(client.cache().invalidation_count(EntityTag::SavedItems), 1);
    assert_eq!(service.calls("addCategoryToSaved"), 2);

    let ledger = client.saved_items().await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].item_type, SavedItemType::Topic);
    assert_eq!(service.calls("getSavedItems"), 2);
}

#[tokio::test]
async fn saving_without_identity_makes_no_remote_call() {
    let service = ScriptedService::new();
    let client = WellnessClient::new(Arc::new(QueryCache::default())).with_service(service.clone());

    let error = client.save_coping_mechanism(1).await.unwrap_err();
    assert!(matches!(error, WellError::NotSignedIn));
    assert_eq!(
        Notice::for_save_error(&error, SavedItemType::CopingMechanism),
        Notice::error("Please sign in to save items: wellkeep login <principal>")
    );

    assert!(matches!(
        client.saved_items().await,
        Err(WellError::NotSignedIn)
    ));
    assert_eq!(service.total_calls(), 0);
}

#[tokio::test]
async fn missing_service_is_reported_not_panicked() {
    let client =
        WellnessClient::new(Arc::new(QueryCache::default())).with_identity(Some(alice()));

    let error = client.save_topic(1).await.unwrap_err();
    assert!(matches!(error, WellError::ServiceUnavailable));
    assert_eq!(
        Notice::for_error(&error, "Failed to save topic").level,
        NoticeLevel::Info
    );
    assert!(matches!(
        client.coping_mechanisms(None).await,
        Err(WellError::ServiceUnavailable)
    ));
}

#[tokio::test]
async fn saved_view_resolves_against_both_catalogs() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    client.save_coping_mechanism(7).await.unwrap();
    client.save_topic(2).await.unwrap();
    client.save_coping_mechanism(1).await.unwrap();
    // A bookmark pointing at nothing in the catalog is skipped.
    service
        .add_coping_mechanism_to_saved(&alice(), 0, 999)
        .await
        .unwrap();
    client.cache().invalidate(EntityTag::SavedItems).unwrap();

    match client.saved_view().await.unwrap() {
        SavedView::Items { mechanisms, topics } => {
            let ids: Vec<u64> = mechanisms.iter().map(|m| m.id).collect();
            assert_eq!(ids, vec![7, 1]);
            assert_eq!(topics.len(), 1);
            assert_eq!(topics[0].id, 2);
        }
        SavedView::Nothing => panic!("expected saved items"),
    }
}

#[tokio::test]
async fn empty_ledger_shows_nothing_without_fetching_mechanisms() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    assert_eq!(client.saved_view().await.unwrap(), SavedView::Nothing);
    assert_eq!(service.calls("getCopingMechanisms"), 0);
}

#[tokio::test]
async fn only_dangling_bookmarks_show_nothing() {
    let service = ScriptedService::new();
    let client = signed_in(&service);

    service
        .add_category_to_saved(&alice(), 0, 42)
        .await
        .unwrap();

    assert_eq!(client.saved_view().await.unwrap(), SavedView::Nothing);
}

#[tokio::test]
async fn ledgers_are_kept_per_principal() {
    let service = ScriptedService::new();
    let client = signed_in(&service);
    client.save_topic(1).await.unwrap();

    let mut other = client.clone();
    other.sign_out().unwrap();
    other.sign_in(wellkeep::Principal::parse("bob-principal").unwrap());

    assert!(other.saved_items().await.unwrap().is_empty());
    assert_eq!(client.saved_items().await.unwrap().len(), 1);
}
