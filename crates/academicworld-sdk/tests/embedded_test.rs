use academicworld_sdk::{
    DashboardClient, EmbeddedClient, MemoryStore, NoOpReason, SdkError, TransitionKind, YearRange,
};
use std::sync::Arc;

#[tokio::test]
async fn test_widgets_through_client() {
    let client = EmbeddedClient::with_sample_data().await;

    let keywords = client.top_keywords(YearRange::new(1982, 1982)).await.unwrap();
    assert_eq!(keywords.len(), 2);

    let pie = client
        .university_keyword_scores("Stanford University")
        .await
        .unwrap();
    assert_eq!(pie.labels[0], "natural language processing");

    let options = client.options().await.unwrap();
    assert_eq!(options.faculty.len(), 5);

    assert!(client.status().await.unwrap().is_healthy());
}

#[tokio::test]
async fn test_favorites_through_client() {
    let client = EmbeddedClient::with_sample_data().await;

    let added = client.add_favorite("computer vision").await.unwrap();
    assert_eq!(
        added.change,
        TransitionKind::Added { keyword: "computer vision".to_string() }
    );
    assert_eq!(added.snapshot.top_faculty[0].name, "Carol Okafor");

    let missing = client.remove_favorite("robotics").await.unwrap();
    assert_eq!(
        missing.change,
        TransitionKind::Unchanged { reason: NoOpReason::NotFavorite }
    );

    let edited = client.edit_favorites(Vec::new()).await.unwrap();
    assert!(edited.snapshot.favorites.is_empty());
    assert!(client.favorites().await.unwrap().top_faculty.is_empty());
}

#[tokio::test]
async fn test_failed_write_surfaces_as_error() {
    let store = Arc::new(MemoryStore::with_sample_data());
    let client = EmbeddedClient::with_store(store.clone()).await;
    store.set_failing(academicworld::StoreOp::WriteFavorites, true);

    let err = client.add_favorite("databases").await.unwrap_err();
    assert!(matches!(err, SdkError::FavoritesError(_)));
}
