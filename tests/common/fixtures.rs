//! Content service fixtures served through wiremock

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Learning goal record as served by the content host
pub fn goal_json(uid: &str, name: &str, units: &[&str]) -> Value {
    json!({
        "uid": uid,
        "name": name,
        "parents": [],
        "blockedBy": [],
        "language": uid.split('_').next().unwrap_or(uid),
        "unitsOfMeaning": units,
        "userCreated": false
    })
}

/// Unit of meaning record as served by the content host
pub fn unit_json(uid: &str, content: &str, translations: &[&str]) -> Value {
    json!({
        "uid": uid,
        "content": content,
        "wordType": "noun",
        "translations": translations,
        "related": [],
        "userCreated": false,
        "credit": {
            "creationContext": "seeded for tests",
            "license": "CC0"
        }
    })
}

/// Serve a learning goal at `/learning_goals/{language}/{uid}.json`
pub async fn mount_goal(server: &MockServer, language: &str, goal: Value) {
    let uid = goal["uid"].as_str().unwrap_or_default().to_string();
    Mock::given(method("GET"))
        .and(path(format!("/learning_goals/{}/{}.json", language, uid)))
        .respond_with(ResponseTemplate::new(200).set_body_json(goal))
        .mount(server)
        .await;
}

/// Serve a unit at `/units_of_meaning/{uid language}/{uid}.json`
pub async fn mount_unit(server: &MockServer, unit: Value) {
    let uid = unit["uid"].as_str().unwrap_or_default().to_string();
    let language = uid.split('_').next().unwrap_or_default().to_string();
    Mock::given(method("GET"))
        .and(path(format!("/units_of_meaning/{}/{}.json", language, uid)))
        .respond_with(ResponseTemplate::new(200).set_body_json(unit))
        .mount(server)
        .await;
}

/// Mount the "Animals" goal: `en_goal1` with `en_cat` and `fr_chat`, which
/// are each other's translation
pub async fn mount_animals(server: &MockServer) {
    mount_goal(server, "en", goal_json("en_goal1", "Animals", &["en_cat", "fr_chat"])).await;
    mount_unit(server, unit_json("en_cat", "cat", &["fr_chat"])).await;
    mount_unit(server, unit_json("fr_chat", "chat", &["en_cat"])).await;
}
