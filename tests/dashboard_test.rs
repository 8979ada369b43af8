use academicworld::{Dashboard, FavoritesEvent, MemoryStore, StoreOp, YearRange};
use serde_json::json;
use std::sync::Arc;

async fn sample_dashboard() -> (Arc<MemoryStore>, Dashboard) {
    let store = Arc::new(MemoryStore::with_sample_data());
    let dashboard = Dashboard::in_memory(store.clone()).await;
    (store, dashboard)
}

#[tokio::test]
async fn test_top_keywords_first_year_only() {
    let (_, dashboard) = sample_dashboard().await;

    let table = dashboard.top_keywords(YearRange::new(1982, 1982)).await;

    assert_eq!(table.columns, vec!["Keyword", "Publication Count"]);
    assert_eq!(
        table.column("Keyword"),
        vec![&json!("databases"), &json!("machine learning")]
    );
    assert!(table.column("Publication Count").iter().all(|c| **c == json!(1)));
}

#[tokio::test]
async fn test_top_keywords_last_year_only() {
    let (_, dashboard) = sample_dashboard().await;

    let table = dashboard.top_keywords(YearRange::new(2023, 2023)).await;

    assert_eq!(table.records[0], vec![json!("machine learning"), json!(2)]);
    assert!(table.column("Keyword").iter().all(|k| **k != json!("computer vision")));
}

#[tokio::test]
async fn test_reversed_range_is_empty_without_query() {
    let (store, dashboard) = sample_dashboard().await;
    store.set_failing(StoreOp::TopKeywords, true);
    store.set_failing(StoreOp::GraphQueries, true);

    let reversed = YearRange::new(2023, 1982);
    let keywords = dashboard.top_keywords(reversed).await;
    let universities = dashboard.top_universities("machine learning", reversed).await;
    let faculty = dashboard.faculty_keyword_scores("Alice Chen", reversed).await;

    for table in [keywords, universities, faculty] {
        assert!(table.is_empty());
        assert!(!table.degraded);
    }
}

#[tokio::test]
async fn test_top_universities_single_year() {
    let (_, dashboard) = sample_dashboard().await;

    let table = dashboard
        .top_universities("machine learning", YearRange::new(1982, 1982))
        .await;

    assert_eq!(table.columns, vec!["University", "Publication Count"]);
    assert_eq!(table.len(), 2);
    assert!(table.column("Publication Count").iter().all(|c| **c == json!(1)));
}

#[tokio::test]
async fn test_faculty_scores_respect_range() {
    let (_, dashboard) = sample_dashboard().await;

    let full = dashboard
        .faculty_keyword_scores("Alice Chen", YearRange::full())
        .await;
    let early = dashboard
        .faculty_keyword_scores("Alice Chen", YearRange::new(1982, 1982))
        .await;

    assert_eq!(full.columns, vec!["Keyword", "Total Score"]);
    assert_eq!(full.len(), 2);
    assert_eq!(early.len(), 2);
    let ml_full = full.records[0][1].as_f64().unwrap();
    let ml_early = early.records[0][1].as_f64().unwrap();
    assert!(ml_full > ml_early);
}

#[tokio::test]
async fn test_failed_widget_query_is_degraded_empty_table() {
    let (store, dashboard) = sample_dashboard().await;
    store.set_failing(StoreOp::TopKeywords, true);

    let table = dashboard.top_keywords(YearRange::full()).await;
    assert!(table.is_empty());
    assert!(table.degraded);

    store.set_failing(StoreOp::TopKeywords, false);
    let table = dashboard.top_keywords(YearRange::full()).await;
    assert_eq!(table.len(), 6);
    assert!(!table.degraded);
}

#[tokio::test]
async fn test_favorites_panel_through_dashboard() {
    let (_, dashboard) = sample_dashboard().await;

    dashboard
        .apply(FavoritesEvent::Add("machine learning".to_string()))
        .await
        .unwrap();
    dashboard
        .apply(FavoritesEvent::Add("databases".to_string()))
        .await
        .unwrap();
    let snapshot = dashboard.favorites().await;
    assert_eq!(snapshot.favorites, vec!["machine learning", "databases"]);
    assert_eq!(
        snapshot.top_universities[0].name,
        "University of Illinois at Urbana-Champaign"
    );

    dashboard
        .apply(FavoritesEvent::Remove("databases".to_string()))
        .await
        .unwrap();
    let snapshot = dashboard.favorites().await;
    assert_eq!(snapshot.favorites, vec!["machine learning"]);
    let names: Vec<_> = snapshot.top_faculty.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Alice Chen", "Carol Okafor", "David Kim"]);
}

#[tokio::test]
async fn test_concurrent_events_are_serialized() {
    let (store, dashboard) = sample_dashboard().await;
    let dashboard = Arc::new(dashboard);

    let keywords = ["machine learning", "databases", "computer vision", "query optimization"];
    let handles: Vec<_> = keywords
        .iter()
        .map(|k| {
            let dashboard = Arc::clone(&dashboard);
            let keyword = k.to_string();
            tokio::spawn(async move { dashboard.apply(FavoritesEvent::Add(keyword)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let snapshot = dashboard.favorites().await;
    assert_eq!(snapshot.favorites.len(), keywords.len());
    let expected = academicworld::favorites::recompute(store.as_ref()).await;
    assert_eq!(snapshot.top_faculty, expected.top_faculty.into_rows());
}
