use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use movie_recommender::{
    catalog::Catalog,
    client::HttpApiClient,
    db::{create_pool, SqliteHistoryStore},
    models::Movie,
    routes::{create_router, AppState},
    services::{ContentRecommender, VectorizerParams},
    ui::{HtmlPage, MemoryChartBackend, UiController},
};

fn movie(id: i64, title: &str, genres: &str, rating: f64, text: &str) -> Movie {
    Movie {
        id: Some(id),
        title: title.to_string(),
        overview: text.to_string(),
        genres: genres.to_string(),
        language: "en".to_string(),
        rating,
        release_date: None,
        year: Some(2000 + id as i32),
        combined_text: format!("{} {}", title, text).to_lowercase(),
    }
}

fn recommender() -> ContentRecommender {
    let catalog = Catalog::new(vec![
        movie(1, "Star Voyage", "Science Fiction, Adventure", 8.1, "a crew travels through space to a distant star"),
        movie(2, "Space Station", "Science Fiction", 7.2, "astronauts repair a failing space station in orbit"),
        movie(3, "City Detective", "Crime, Drama", 6.8, "a detective hunts a killer in the city"),
        movie(4, "Family Picnic", "Comedy, Family", 5.5, "a family picnic goes hilariously wrong"),
    ]);
    ContentRecommender::fit(
        Arc::new(catalog),
        VectorizerParams {
            max_features: 6000,
            min_df: 1,
        },
    )
}

async fn create_state(view_limit: i64) -> AppState {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    let store = SqliteHistoryStore::new(pool, 50, view_limit).await.unwrap();
    AppState::new(recommender(), Arc::new(store), "default")
}

async fn create_test_server() -> TestServer {
    TestServer::new(create_router(create_state(30).await)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "status": "healthy" }));

    let response = server.get("/api/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_empty_query_is_rejected_with_error_body() {
    let server = create_test_server().await;

    let response = server
        .post("/api/recommend")
        .json(&json!({ "query": "   ", "top_k": 5 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Please enter a keyword or description"
    );

    let history: Value = server.get("/api/history").await.json();
    assert!(history["searches"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommend_ranks_matching_movies_and_records_search() {
    let server = create_test_server().await;

    let response = server
        .post("/api/recommend")
        .json(&json!({ "query": "Space", "top_k": "2" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    let titles: Vec<&str> = results.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert!(titles.contains(&"Star Voyage"));
    assert!(titles.contains(&"Space Station"));
    assert!(results[0]["score"].as_f64().unwrap() >= results[1]["score"].as_f64().unwrap());

    let history: Value = server.get("/api/history").await.json();
    let searches = history["searches"].as_array().unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0]["query"], "Space");
    assert_eq!(searches[0]["result_count"], 2);
}

#[tokio::test]
async fn test_top_k_is_clamped_to_catalog_size() {
    let server = create_test_server().await;

    let body: Value = server
        .post("/api/recommend")
        .json(&json!({ "query": "detective", "top_k": 500 }))
        .await
        .json();
    assert_eq!(body["results"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_repeat_view_replaces_earlier_entry() {
    let server = create_test_server().await;

    for title in ["Star Voyage", "City Detective", "Star Voyage"] {
        let id = if title == "Star Voyage" { 1 } else { 3 };
        server
            .post("/api/history/view")
            .json(&json!({ "movie_id": id, "title": title, "genres": "Drama", "rating": 7.0 }))
            .await
            .assert_status_ok();
    }

    let history: Value = server.get("/api/history").await.json();
    let views = history["views"].as_array().unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0]["title"], "Star Voyage");
    assert_eq!(views[0]["movie_id"], "1");
    assert_eq!(views[1]["title"], "City Detective");
}

#[tokio::test]
async fn test_view_without_title_is_rejected() {
    let server = create_test_server().await;

    let response = server
        .post("/api/history/view")
        .json(&json!({ "movie_id": 1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Movie title is required");
}

#[tokio::test]
async fn test_view_history_is_trimmed_to_limit() {
    let server = TestServer::new(create_router(create_state(2).await)).unwrap();

    for id in 1..=4 {
        server
            .post("/api/history/view")
            .json(&json!({ "movie_id": id, "title": format!("Movie {}", id) }))
            .await
            .assert_status_ok();
    }

    let history: Value = server.get("/api/history").await.json();
    let titles: Vec<&str> = history["views"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Movie 4", "Movie 3"]);
}

#[tokio::test]
async fn test_clear_history() {
    let server = create_test_server().await;

    server
        .post("/api/recommend")
        .json(&json!({ "query": "family" }))
        .await
        .assert_status_ok();
    server
        .post("/api/history/view")
        .json(&json!({ "movie_id": 4, "title": "Family Picnic" }))
        .await
        .assert_status_ok();

    let response = server.post("/api/history/clear").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");

    let history: Value = server.get("/api/history").await.json();
    assert!(history["searches"].as_array().unwrap().is_empty());
    assert!(history["views"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_shape() {
    let server = create_test_server().await;

    let stats: Value = server.get("/api/stats").await.json();

    let bins = stats["rating_distribution"]["bins"].as_array().unwrap();
    let counts = stats["rating_distribution"]["counts"].as_array().unwrap();
    assert_eq!(bins.len(), counts.len() + 1);
    let total: u64 = counts.iter().map(|c| c.as_u64().unwrap()).sum();
    assert_eq!(total, 4);

    assert_eq!(stats["genre_counts"]["labels"][0], "Science Fiction");
    assert_eq!(stats["top_items"]["titles"][0], "Star Voyage");

    let heatmap = &stats["heatmap"];
    let n = heatmap["labels"].as_array().unwrap().len();
    assert_eq!(heatmap["matrix"].as_array().unwrap().len(), n);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let server = create_test_server().await;

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("8f14e45f-ceea-467f-a0e6-1d8d1a4b6f3c"),
        )
        .await;
    assert_eq!(
        response.header("x-request-id"),
        "8f14e45f-ceea-467f-a0e6-1d8d1a4b6f3c"
    );

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_page_controller_against_live_server() {
    let app = create_router(create_state(30).await);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let charts = MemoryChartBackend::default();
    let mut ui = UiController::new(
        HttpApiClient::new(format!("http://{}", addr)),
        HtmlPage::with_input("space station", "3"),
        charts.clone(),
    );

    ui.init().await;
    assert_eq!(charts.live_total(), 3);
    assert!(ui.page().heatmap.contains("heatmap-grid"));

    ui.recommend().await;
    assert_eq!(ui.page().error, "");
    assert_eq!(ui.page().results.matches("class=\"result-item\"").count(), 3);
    assert!(ui.page().results.contains("Space Station"));

    assert!(ui.open_result(0).await);
    assert!(ui.page().search_history.contains("space station"));
    assert!(ui.page().view_history.contains(&ui.results()[0].title));

    ui.page_mut().confirm_answer = true;
    ui.clear_history().await;
    assert!(ui.page().search_history.contains("No search history yet"));
    assert!(ui.page().view_history.contains("No viewed movies yet"));
}
