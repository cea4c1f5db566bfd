use async_trait::async_trait;
use exercise_video_updater::config::UpdateConfig;
use exercise_video_updater::{
    CatalogStore, CatalogUpdater, ConfigBuilder, LookupOutcome, NoDelay, VideoReference, VideoResolver,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::fs;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Resolver that finds the same video for every query
struct FixedResolver(&'static str);

#[async_trait]
impl VideoResolver for FixedResolver {
    async fn search(&self, _query: &str) -> LookupOutcome {
        LookupOutcome::Found(VideoReference::from(self.0.to_string()))
    }
}

async fn write_catalog(dir: &TempDir, value: &Value) -> CatalogStore {
    let path = dir.path().join("exercises.json");
    fs::write(&path, serde_json::to_string_pretty(value).unwrap())
        .await
        .unwrap();
    CatalogStore::new(path)
}

async fn read_catalog(store: &CatalogStore) -> Value {
    let content = fs::read_to_string(store.path()).await.unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_end_to_end_with_stub_resolver() {
    let temp_dir = TempDir::new().unwrap();
    let store = write_catalog(
        &temp_dir,
        &json!([
            {"name": "Push-up", "videoUrl": "http://example.com/x"},
            {"name": "Squat", "videoUrl": "https://real.site/abc"}
        ]),
    )
    .await;

    let updater = CatalogUpdater::new(
        FixedResolver("https://video.host/watch?v=12345678901"),
        NoDelay,
        UpdateConfig::default(),
    );
    let report = updater.run(&store).await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(
        read_catalog(&store).await,
        json!([
            {"name": "Push-up", "videoUrl": "https://video.host/watch?v=12345678901"},
            {"name": "Squat", "videoUrl": "https://real.site/abc"}
        ])
    );
}

#[tokio::test]
async fn test_second_pass_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = write_catalog(
        &temp_dir,
        &json!([
            {"name": "Lunge"},
            {"name": "Row", "videoUrl": ""},
            {"name": "Dip", "videoUrl": "https://real.site/dip"}
        ]),
    )
    .await;
    let updater = CatalogUpdater::new(
        FixedResolver("https://www.youtube.com/watch?v=zzzzzzzzzzz"),
        NoDelay,
        UpdateConfig::default(),
    );

    let first = updater.run(&store).await.unwrap();
    let after_first = fs::read_to_string(store.path()).await.unwrap();
    let second = updater.run(&store).await.unwrap();
    let after_second = fs::read_to_string(store.path()).await.unwrap();

    assert_eq!(first.updated, 2);
    assert_eq!(second.eligible, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_order_and_extra_fields_survive() {
    let temp_dir = TempDir::new().unwrap();
    let original = json!([
        {"id": "c", "name": "Curl", "videoUrl": "https://example.com/placeholder", "sets": 3},
        {"id": "a", "name": "Curl", "videoUrl": "https://real.site/curl"},
        {"id": "b", "name": "Press", "tags": ["push"], "videoUrl": null}
    ]);
    let store = write_catalog(&temp_dir, &original).await;

    let updater = CatalogUpdater::new(
        FixedResolver("https://www.youtube.com/watch?v=yyyyyyyyyyy"),
        NoDelay,
        UpdateConfig::default(),
    );
    updater.run(&store).await.unwrap();

    let content = fs::read_to_string(store.path()).await.unwrap();
    let saved: Value = serde_json::from_str(&content).unwrap();
    let ids: Vec<&str> = saved
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert_eq!(saved[0]["sets"], json!(3));
    assert_eq!(saved[1]["videoUrl"], json!("https://real.site/curl"));
    assert_eq!(saved[2]["videoUrl"], json!("https://www.youtube.com/watch?v=yyyyyyyyyyy"));
    // key order inside a record is kept
    assert!(content.find("\"tags\"").unwrap() < content.find("\"videoUrl\": \"https://www.youtube.com/watch?v=yyyyyyyyyyy\"").unwrap());
}

#[tokio::test]
async fn test_dry_run_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let store = write_catalog(&temp_dir, &json!([{"name": "Plank"}])).await;
    let before = fs::read_to_string(store.path()).await.unwrap();

    let settings = UpdateConfig {
        dry_run: true,
        ..UpdateConfig::default()
    };
    let updater = CatalogUpdater::new(
        FixedResolver("https://www.youtube.com/watch?v=xxxxxxxxxxx"),
        NoDelay,
        settings,
    );
    let report = updater.run(&store).await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(fs::read_to_string(store.path()).await.unwrap(), before);
}

#[tokio::test]
async fn test_search_page_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("search_query", "Push-up exercise tutorial exercise tutorial"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<script>var data = {"url":"/watch?v=aaaaaaaaaaa"};</script><a href="/watch?v=bbbbbbbbbbb">"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("search_query", "Squat exercise tutorial exercise tutorial"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let store = write_catalog(
        &temp_dir,
        &json!([
            {"name": "Push-up", "videoUrl": "http://example.com/x"},
            {"name": "Squat", "videoUrl": ""}
        ]),
    )
    .await;

    let config = ConfigBuilder::new()
        .with_endpoint(format!("{}/results", mock_server.uri()))
        .with_delay_range(0.0, 0.0)
        .build();
    let updater = CatalogUpdater::from_config(&config).unwrap();
    let report = updater.run(&store).await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(
        read_catalog(&store).await,
        json!([
            {"name": "Push-up", "videoUrl": "https://www.youtube.com/watch?v=aaaaaaaaaaa"},
            {"name": "Squat", "videoUrl": ""}
        ])
    );
}

#[tokio::test]
async fn test_malformed_catalog_is_not_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("exercises.json");
    fs::write(&path, "{\"name\": \"Squat\"").await.unwrap();

    let updater = CatalogUpdater::new(
        FixedResolver("https://www.youtube.com/watch?v=wwwwwwwwwww"),
        NoDelay,
        UpdateConfig::default(),
    );
    let result = updater.run(&CatalogStore::new(&path)).await;

    assert!(matches!(
        result,
        Err(exercise_video_updater::UpdaterError::MalformedInput { .. })
    ));
    assert_eq!(fs::read_to_string(&path).await.unwrap(), "{\"name\": \"Squat\"");
}
