mod common;

use axum::http::StatusCode;
use serde_json::json;
use swimlog::models::UserRole;

#[tokio::test]
async fn test_swimmer_creates_and_reads_own_session() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, created) = common::post(
        &app,
        "/me/sessions",
        Some(&token),
        json!({"date": "2025-01-06", "notes": "aerobic"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["date"], "2025-01-06");
    let id = created["id"].as_i64().unwrap();

    let (status, set) = common::post(
        &app,
        &format!("/me/sessions/{}/sets", id),
        Some(&token),
        common::set_payload(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(set["session_id"], id);

    let (status, detail) = common::get(&app, &format!("/me/sessions/{}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["notes"], "aerobic");
    assert_eq!(detail["sets"][0]["stroke"], "free");
    assert_eq!(detail["sets"][0]["rep_times_sec"], json!([75, 76, 77, 75]));
    assert_eq!(detail["totals"]["total_distance_m"], 400.0);
    assert_eq!(detail["totals"]["avg_rpe"], 5.5);
}

#[tokio::test]
async fn test_session_analytics_payload() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let session = common::create_session(&pool, Some(swimmer.id), "2025-01-06").await;
    let sets = common::add_sample_sets(&pool, session.id).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, body) = common::get(
        &app,
        &format!("/sessions/{}/analytics", session.id),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"]["totals"]["total_reps"], 10);
    assert_eq!(body["detail"]["totals"]["avg_rep_time_sec"], 54.7);
    assert_eq!(body["summary"]["avg_pace_sec_per"], 78.14);
    assert_eq!(body["summary"]["avg_pace_formatted"], "1:18.14");
    assert_eq!(body["summary"]["pace_basis_m"], 100);
    assert_eq!(body["by_stroke"]["free"]["avg_pace_sec_per"], 75.75);
    assert_eq!(body["by_stroke"]["fly"]["avg_pace_sec_per"], 81.33);
    assert_eq!(body["best_set"]["set_id"], sets[0].id);
}

#[tokio::test]
async fn test_analytics_respects_pace_basis() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let session = common::create_session(&pool, Some(swimmer.id), "2025-01-06").await;
    common::add_sample_sets(&pool, session.id).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let uri = format!("/me/sessions/{}/analytics?pace_per_m=50", session.id);
    let (status, body) = common::get(&app, &uri, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["pace_basis_m"], 50);
    assert_eq!(body["summary"]["avg_pace_sec_per"], 39.07);
    assert_eq!(body["best_set"]["pace_basis_m"], 50);
}

#[tokio::test]
async fn test_other_swimmer_is_forbidden() {
    let pool = common::setup_test_db();
    let owner = common::create_test_user(&pool, "owner@example.com", UserRole::Swimmer).await;
    let other = common::create_test_user(&pool, "other@example.com", UserRole::Swimmer).await;
    let session = common::create_session(&pool, Some(owner.id), "2025-01-06").await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&other);

    for uri in [
        format!("/sessions/{}", session.id),
        format!("/sessions/{}/analytics", session.id),
        format!("/me/sessions/{}", session.id),
    ] {
        let (status, body) = common::get(&app, &uri, Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["detail"], "Forbidden.");
    }

    let (status, _) = common::post(
        &app,
        &format!("/sessions/{}/sets", session.id),
        Some(&token),
        common::set_payload(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_coach_reads_any_session_including_unowned() {
    let pool = common::setup_test_db();
    let coach = common::create_test_user(&pool, "coach@example.com", UserRole::Coach).await;
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let owned = common::create_session(&pool, Some(swimmer.id), "2025-01-06").await;
    let unowned = common::create_session(&pool, None, "2025-01-07").await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&coach);

    for id in [owned.id, unowned.id] {
        let (status, _) = common::get(&app, &format!("/sessions/{}", id), Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = common::post(
        &app,
        &format!("/sessions/{}/sets", unowned.id),
        Some(&token),
        common::set_payload(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unowned_session_is_forbidden_for_swimmers() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let unowned = common::create_session(&pool, None, "2025-01-07").await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, _) = common::get(&app, &format!("/sessions/{}", unowned.id), Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_session_is_404() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, body) = common::get(&app, "/sessions/999", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Session not found.");

    let (status, _) = common::post(&app, "/me/sessions/999/sets", Some(&token), common::set_payload()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_set_is_rejected_without_write() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let session = common::create_session(&pool, Some(swimmer.id), "2025-01-06").await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let mut payload = common::set_payload();
    payload["reps"] = json!(3);
    payload["stroke"] = json!("doggy");

    let (status, body) = common::post(
        &app,
        &format!("/me/sessions/{}/sets", session.id),
        Some(&token),
        payload,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e == "Expected 3 RPE inputs, got 4."));

    let (_, detail) = common::get(&app, &format!("/me/sessions/{}", session.id), Some(&token)).await;
    assert_eq!(detail["sets"], json!([]));
    assert_eq!(detail["totals"]["total_sets"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_422() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, body) = common::post(
        &app,
        "/me/sessions",
        Some(&token),
        json!({"date": "not-a-date"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Validation failed");
}

#[tokio::test]
async fn test_coach_cannot_use_swimmer_routes() {
    let pool = common::setup_test_db();
    let coach = common::create_test_user(&pool, "coach@example.com", UserRole::Coach).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&coach);

    let (status, body) = common::get(&app, "/me/sessions", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Insufficient role.");
}

#[tokio::test]
async fn test_dashboard_lists_newest_first_and_scopes_swimmers() {
    let pool = common::setup_test_db();
    let coach = common::create_test_user(&pool, "coach@example.com", UserRole::Coach).await;
    let a = common::create_test_user(&pool, "a@example.com", UserRole::Swimmer).await;
    let b = common::create_test_user(&pool, "b@example.com", UserRole::Swimmer).await;
    let older = common::create_session(&pool, Some(a.id), "2025-01-01").await;
    common::add_sample_sets(&pool, older.id).await;
    let newer = common::create_session(&pool, Some(a.id), "2025-01-05").await;
    common::create_session(&pool, Some(b.id), "2025-01-03").await;
    let app = common::create_test_app(pool);

    let (status, rows) = common::get(&app, "/sessions", Some(&common::token_for(&a))).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], newer.id);
    assert_eq!(rows[0]["avg_pace_sec_per"], serde_json::Value::Null);
    assert_eq!(rows[1]["avg_pace_formatted"], "1:18.14");

    let (_, rows) = common::get(&app, "/sessions?limit=2", Some(&common::token_for(&coach))).await;
    assert_eq!(rows.as_array().unwrap().len(), 2);

    let (_, rows) = common::get(&app, "/sessions", Some(&common::token_for(&coach))).await;
    assert_eq!(rows.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_dashboard_limit_out_of_range_is_422() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, _) = common::get(&app, "/me/sessions?limit=0", Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = common::get(&app, "/me/sessions?limit=501", Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_range_listing_and_summary() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let first = common::create_session(&pool, Some(swimmer.id), "2025-01-02").await;
    common::add_sample_sets(&pool, first.id).await;
    let second = common::create_session(&pool, Some(swimmer.id), "2025-01-04").await;
    common::add_sample_sets(&pool, second.id).await;
    common::create_session(&pool, Some(swimmer.id), "2025-01-03").await;
    common::create_session(&pool, Some(swimmer.id), "2025-02-01").await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, body) = common::get(
        &app,
        "/me/sessions/range?start=2025-01-02&end=2025-01-04",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-01-02", "2025-01-03", "2025-01-04"]);
    assert_eq!(body["summary"]["sessions"], 3);
    assert_eq!(body["summary"]["total_distance_m"], 1400.0);

    let (status, summary) = common::get(
        &app,
        "/me/sessions/range/summary?start=2025-01-02&end=2025-01-04",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["sessions"], 3);
    assert_eq!(summary["avg_rpe"], 6.5);
    assert_eq!(summary["avg_pace_sec_per"], 78.14);
}

#[tokio::test]
async fn test_reversed_range_is_400() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, body) = common::get(
        &app,
        "/me/sessions/range/summary?start=2025-01-05&end=2025-01-01",
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "end must be >= start");
}

#[tokio::test]
async fn test_empty_range_summary_has_nulls() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let app = common::create_test_app(pool);
    let token = common::token_for(&swimmer);

    let (status, summary) = common::get(
        &app,
        "/sessions/range/summary?start=2025-01-01&end=2025-01-31",
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["sessions"], 0);
    assert_eq!(summary["total_distance_m"], 0.0);
    assert!(summary["avg_rpe"].is_null());
    assert!(summary["avg_pace_formatted"].is_null());
}

#[tokio::test]
async fn test_non_numeric_path_id_is_json_validation_error() {
    let pool = common::setup_test_db();
    let swimmer = common::create_test_user(&pool, "s1@example.com", UserRole::Swimmer).await;
    let coach = common::create_test_user(&pool, "coach@example.com", UserRole::Coach).await;
    let app = common::create_test_app(pool);

    let response = common::send_raw(
        &app,
        "GET",
        "/sessions/abc",
        Some(&common::token_for(&swimmer)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.headers()[axum::http::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: serde_json::Value =
        serde_json::from_str(&common::body_text(response).await).unwrap();
    assert_eq!(body["detail"], "Validation failed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);

    for (uri, token) in [
        ("/me/sessions/abc/analytics", common::token_for(&swimmer)),
        ("/coach/swimmers/x/sessions/1", common::token_for(&coach)),
    ] {
        let (status, body) = common::get(&app, uri, Some(&token)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert_eq!(body["detail"], "Validation failed");
    }
}
