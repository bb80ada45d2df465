mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_group_membership_lifecycle() {
    let (app, _store) = TestApp::new();

    // register the future group owner
    let (status, body) = app
        .send(Method::POST, "/users", None, Some(json!({ "email": "a@x.com", "name": "A" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], true);

    let (_, body) = app.send(Method::GET, "/users/a@x.com", None, None).await;
    assert_eq!(body, json!({ "role": null }));

    // creating a group promotes the creator
    let (status, body) = app
        .send(Method::POST, "/groups/a@x.com", None, Some(json!({ "name": "Hiking" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let group_id = body["insertedId"].as_str().unwrap().to_string();

    let (_, body) = app.send(Method::GET, "/users/a@x.com", None, None).await;
    assert_eq!(body, json!({ "role": "admin" }));

    // someone joins
    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/join-groups/{}", group_id),
            None,
            Some(json!({ "nickname": "B", "email": "b@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], 1);
    let member_id = body["memberId"].as_str().unwrap().to_string();

    let (_, group) = app
        .send(Method::GET, &format!("/group/{}", group_id), None, None)
        .await;
    assert_eq!(group["_id"], group_id.as_str());
    assert_eq!(group["name"], "Hiking");
    let members = group["membersInfo"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["nickname"], "B");
    assert_eq!(members[0]["_id"], member_id.as_str());

    // the owner removes the entry
    let token = app.token_for("a@x.com");
    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/manage-member/{}?memberId={}", group_id, member_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], 1);

    let (_, group) = app
        .send(Method::GET, &format!("/group/{}", group_id), None, None)
        .await;
    assert_eq!(group["membersInfo"], json!([]));
}

#[tokio::test]
async fn test_remove_member_accepts_legacy_group_id_param() {
    let (app, _store) = TestApp::new();
    app.send(Method::POST, "/users", None, Some(json!({ "email": "a@x.com" })))
        .await;
    let (_, body) = app
        .send(Method::POST, "/groups/a@x.com", None, Some(json!({ "name": "Hiking" })))
        .await;
    let group_id = body["insertedId"].as_str().unwrap().to_string();

    let join = Some(json!({ "nickname": "B" }));
    let (_, first) = app
        .send(Method::PATCH, &format!("/join-groups/{}", group_id), None, join.clone())
        .await;
    let (_, second) = app
        .send(Method::PATCH, &format!("/join-groups/{}", group_id), None, join)
        .await;
    assert_ne!(first["memberId"], second["memberId"]);

    let token = app.token_for("a@x.com");
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!(
                "/manage-member/{}?groupId={}",
                group_id,
                first["memberId"].as_str().unwrap()
            ),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, group) = app
        .send(Method::GET, &format!("/group/{}", group_id), None, None)
        .await;
    let members = group["membersInfo"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["_id"], second["memberId"]);
}

#[tokio::test]
async fn test_admin_edits_and_deletes_group() {
    let (app, _store) = TestApp::new();
    app.send(Method::POST, "/users", None, Some(json!({ "email": "a@x.com" })))
        .await;
    let (_, body) = app
        .send(Method::POST, "/groups/a@x.com", None, Some(json!({ "name": "Hiking" })))
        .await;
    let group_id = body["insertedId"].as_str().unwrap().to_string();
    let token = app.token_for("a@x.com");

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/manage-group/edit/{}", group_id),
            Some(&token),
            Some(json!({ "name": "Climbing" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matchedCount"], 1);

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/manage-group/edit/{}", group_id),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, groups) = app.send(Method::GET, "/groups", None, None).await;
    assert_eq!(groups[0]["name"], "Climbing");

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/manage-group/{}", group_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 1);

    let (status, body) = app
        .send(Method::GET, &format!("/group/{}", group_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_register_twice_and_malformed_ids() {
    let (app, _store) = TestApp::new();
    app.send(Method::POST, "/users", None, Some(json!({ "email": "a@x.com" })))
        .await;
    let (status, body) = app
        .send(Method::POST, "/users", None, Some(json!({ "email": "a@x.com" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "user already exist" }));

    let (status, body) = app.send(Method::GET, "/group/not-an-id", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);

    // undecodable path segment still answers with the error body
    let (status, body) = app.send(Method::GET, "/group/%FF", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_comments_and_liveness() {
    let (app, _store) = TestApp::new();

    let (status, body) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Hello world"));

    let (status, _) = app
        .send(Method::POST, "/comments", None, Some(json!({ "text": "Great trip" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, comments) = app.send(Method::GET, "/comments", None, None).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["text"], "Great trip");

    let (status, health) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_issued_token_carries_payload() {
    let (app, _store) = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/jwt", None, Some(json!({ "email": "a@x.com" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let claims = app.state.jwt_service.decode_token(token).unwrap();
    assert_eq!(claims.email(), Some("a@x.com"));

    let (status, _) = app
        .send(Method::POST, "/jwt", None, Some(json!("a@x.com")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
