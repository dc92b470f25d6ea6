// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_recap::config::{Config, PublishConfig};
use activity_recap::models::ActivityRecord;
use serde_json::{json, Value};
use std::path::PathBuf;

#[allow(dead_code)]
pub const METERS_PER_MILE: f64 = 1609.344;

/// Throwaway RSA key pair committed for signing tests.
#[allow(dead_code)]
pub const TEST_PRIVATE_KEY_PATH: &str = "tests/fixtures/test_app_key.pem";
#[allow(dead_code)]
pub const TEST_PUBLIC_KEY_PATH: &str = "tests/fixtures/test_app_key.pub.pem";

/// Strava summary activity JSON. `local` is `YYYY-MM-DDTHH:MM:SS`.
#[allow(dead_code)]
pub fn activity_json(id: u64, sport: &str, local: &str, miles: f64, minutes: u64) -> Value {
    json!({
        "id": id,
        "name": format!("{} {}", sport, id),
        "type": sport,
        "sport_type": sport,
        "start_date": format!("{}Z", local),
        "start_date_local": format!("{}Z", local),
        "distance": miles * METERS_PER_MILE,
        "moving_time": minutes * 60,
        "elapsed_time": minutes * 60 + 30,
        "total_elevation_gain": 10.0,
        "average_speed": 3.0,
        "max_speed": 5.0
    })
}

#[allow(dead_code)]
pub fn make_record(id: u64, sport: &str, local: &str, miles: f64, minutes: u64) -> ActivityRecord {
    serde_json::from_value(activity_json(id, sport, local, miles, minutes))
        .expect("test activity should deserialize")
}

/// Dry-run config pointed at a mock server.
#[allow(dead_code)]
pub fn test_config(server_uri: &str) -> Config {
    let mut config = Config::test_default();
    config.strava.api_url = format!("{}/api/v3", server_uri);
    config.strava.oauth_url = format!("{}/oauth/token", server_uri);
    config
}

/// Publish settings pointed at a mock server.
#[allow(dead_code)]
pub fn test_publish_config(server_uri: &str) -> PublishConfig {
    PublishConfig {
        app_id: "12345".to_string(),
        installation_id: 42,
        private_key_path: PathBuf::from(TEST_PRIVATE_KEY_PATH),
        owner: "octo".to_string(),
        repo: "recaps".to_string(),
        branch: None,
        api_url: server_uri.to_string(),
    }
}

/// Strava token refresh response body.
#[allow(dead_code)]
pub fn refresh_response(access_token: &str) -> Value {
    json!({
        "token_type": "Bearer",
        "access_token": access_token,
        "refresh_token": "rotated_refresh",
        "expires_at": chrono::Utc::now().timestamp() + 6 * 3600,
        "expires_in": 6 * 3600
    })
}
