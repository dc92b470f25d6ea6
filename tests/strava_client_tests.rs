// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava client tests against a mock API.
//!
//! These tests verify that:
//! 1. Pagination stops on a short or empty page
//! 2. A 401 triggers exactly one refresh and one retry
//! 3. A second 401 after refresh is fatal

use activity_recap::models::RecapProfile;
use activity_recap::services::{StravaClient, StravaToken};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{activity_json, refresh_response};

fn client(server: &MockServer, page_size: u32) -> StravaClient {
    StravaClient::new("client_id".to_string(), "client_secret".to_string())
        .with_urls(
            &format!("{}/api/v3", server.uri()),
            &format!("{}/oauth/token", server.uri()),
        )
        .with_page_size(page_size)
}

fn token(access: &str) -> StravaToken {
    StravaToken::new(Some(access.to_string()), "refresh".to_string())
}

#[tokio::test]
async fn test_pagination_stops_on_short_page() {
    let server = MockServer::start().await;

    let pages = [
        json!([
            activity_json(1, "Run", "2024-01-01T07:00:00", 3.0, 27),
            activity_json(2, "Ride", "2024-01-02T07:00:00", 10.0, 40),
        ]),
        json!([
            activity_json(3, "Run", "2024-01-03T07:00:00", 5.0, 50),
            activity_json(4, "Walk", "2024-01-04T07:00:00", 1.0, 0),
        ]),
        json!([activity_json(5, "Swim", "2024-01-05T07:00:00", 0.5, 30)]),
    ];

    for (i, body) in pages.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/api/v3/athlete/activities"))
            .and(query_param("page", (i + 1).to_string()))
            .and(query_param("per_page", "2"))
            .and(header("authorization", "Bearer valid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    // A fourth page must never be requested
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut token = token("valid");
    let records = client(&server, 2)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .expect("fetch should succeed");

    // The zero-moving-time walk is dropped
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 5]);
}

#[tokio::test]
async fn test_pagination_stops_on_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            activity_json(1, "Run", "2024-01-01T07:00:00", 3.0, 27),
            activity_json(2, "Run", "2024-01-02T07:00:00", 3.0, 27),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut token = token("valid");
    let records = client(&server, 2)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_year_bounds_sent_as_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("after", "1704067199"))
        .and(query_param("before", "1735689600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut token = token("valid");
    let records = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_running_only_filters_categories() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            activity_json(1, "Run", "2024-01-01T07:00:00", 3.0, 27),
            activity_json(2, "Ride", "2024-01-02T07:00:00", 10.0, 40),
            activity_json(3, "TrailRun", "2024-01-03T07:00:00", 6.0, 70),
        ])))
        .mount(&server)
        .await;

    let mut token = token("valid");
    let records = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::RunningOnly)
        .await
        .unwrap();

    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Authorization Error"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refresh_response("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([activity_json(
            7,
            "Run",
            "2024-06-01T07:00:00",
            4.0,
            36
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let mut token = token("stale");
    let records = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .expect("retried request should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 7);
    assert_eq!(token.access_token(), Some("fresh"));
    assert_eq!(token.refresh_token(), "rotated_refresh");
    assert!(token.expires_at().is_some());
}

#[tokio::test]
async fn test_second_unauthorized_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refresh_response("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    let mut token = token("stale");
    let err = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .expect_err("second 401 should fail");

    assert!(err.is_strava_token_error(), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_missing_access_token_refreshes_first() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refresh_response("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut token = StravaToken::new(None, "refresh".to_string());
    client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .unwrap();

    assert_eq!(token.access_token(), Some("fresh"));
}

#[tokio::test]
async fn test_failed_refresh_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Bad Request",
            "errors": [{"resource": "RefreshToken", "code": "invalid"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut token = token("stale");
    let result = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_not_found_is_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut token = token("valid");
    let records = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_server_error_and_rate_limit_are_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut token = token("valid");
    let err = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .unwrap_err();
    assert!(err.is_strava_rate_limit());
}

#[tokio::test]
async fn test_server_error_mentioning_invalid_is_not_token_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(500).set_body_string("invalid upstream state"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refresh_response("fresh")))
        .expect(0)
        .mount(&server)
        .await;

    let mut token = token("valid");
    let err = client(&server, 200)
        .fetch_records_for_year(&mut token, 2024, RecapProfile::AllActivities)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("invalid upstream state"));
    assert!(!err.is_strava_token_error(), "500 treated as token rejection: {}", err);
}
