//! End-to-end HTTP tests: a full study round through the router with a
//! file-backed practice counter.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use study_engine::{
    create_router, today, AppState, Config, ProgressResponse, ScoreResponse, SessionView,
    SubmitResponse, Theme, ThemeResponse,
};
use tower::util::ServiceExt;

async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn temp_config(name: &str) -> (Config, std::path::PathBuf) {
    let dir = std::env::temp_dir().join(format!("study_api_{name}"));
    std::fs::remove_dir_all(&dir).ok();
    let config = Config {
        progress_file: dir.join("progress.json").display().to_string(),
        theme: Theme::Dark,
        ..Config::default()
    };
    (config, dir)
}

#[tokio::test]
async fn test_full_study_round() {
    let (config, dir) = temp_config("round");
    let router = create_router(AppState::new(config));

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/generate",
        Some(serde_json::json!({ "topic": "Newton's Laws of Motion" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let view: SessionView = serde_json::from_value(body).expect("session view");
    assert_eq!(view.theme, Theme::Dark);
    assert_eq!(view.practiced_today, 1);
    assert_eq!(view.questions.len(), 3);

    // Correct answers are [1, 0, 1]; answer B everywhere.
    let mut last = None;
    for question in 0..3 {
        let uri = format!("/api/quiz/{question}/select");
        let (status, _) = call(
            &router,
            Method::POST,
            &uri,
            Some(serde_json::json!({ "option": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/api/quiz/{question}/submit");
        let (status, body) = call(&router, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        last = Some(serde_json::from_value::<SubmitResponse>(body).expect("submit response"));
    }

    let last = last.expect("submitted");
    assert!(last.score.is_complete);
    assert_eq!(last.score.num_correct, 2);

    let (_, body) = call(&router, Method::GET, "/api/score", None).await;
    assert_eq!(body["numCorrect"], 2);
    assert_eq!(body["numSubmitted"], 3);
    assert_eq!(body["finalScore"]["correct"], 2);
    let score: ScoreResponse = serde_json::from_value(body).expect("score");
    assert_eq!(score.final_score.map(|s| s.to_string()).as_deref(), Some("2 / 3"));

    // Resetting the last (correct) question withdraws it from the score.
    let (status, body) = call(&router, Method::POST, "/api/quiz/2/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"]["numCorrect"], 1);
    assert_eq!(body["score"]["numSubmitted"], 2);
    assert_eq!(body["score"]["isComplete"], false);

    let (_, body) = call(&router, Method::GET, "/api/score", None).await;
    assert!(body.get("finalScore").is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_practice_count_persists_across_servers() {
    let (config, dir) = temp_config("persist");

    let router = create_router(AppState::new(config.clone()));
    for topic in ["photosynthesis", "blockchain"] {
        let (status, _) = call(
            &router,
            Method::POST,
            "/api/generate",
            Some(serde_json::json!({ "topic": topic })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = call(
        &router,
        Method::POST,
        "/api/generate",
        Some(serde_json::json!({ "topic": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let restarted = create_router(AppState::new(config));
    let (status, body) = call(&restarted, Method::GET, "/api/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    let progress: ProgressResponse = serde_json::from_value(body).expect("progress");
    assert_eq!(progress.date, today());
    assert_eq!(progress.practiced_today, 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_corrupted_progress_file_returns_500() {
    let (config, dir) = temp_config("corrupted");
    std::fs::create_dir_all(&dir).expect("dir");
    std::fs::write(dir.join("progress.json"), "not json").expect("write");

    let router = create_router(AppState::new(config));
    let (status, body) = call(&router, Method::GET, "/api/progress", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    // Content is still generated when the counter cannot be updated.
    let (status, _) = call(
        &router,
        Method::POST,
        "/api/generate",
        Some(serde_json::json!({ "topic": "oop" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = call(&router, Method::GET, "/api/session", None).await;
    let view: SessionView = serde_json::from_value(body).expect("session view");
    assert_eq!(view.topic.as_deref(), Some("oop"));
    assert!(view.status.starts_with("Error: "));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_theme_and_topics() {
    let (config, dir) = temp_config("theme");
    let router = create_router(AppState::new(config));

    let (_, body) = call(&router, Method::GET, "/api/topics", None).await;
    assert_eq!(body["topics"].as_array().map(Vec::len), Some(4));

    let (_, body) = call(&router, Method::POST, "/api/theme", None).await;
    let theme: ThemeResponse = serde_json::from_value(body).expect("theme");
    assert_eq!(theme.theme, Theme::Light);

    std::fs::remove_dir_all(&dir).ok();
}
