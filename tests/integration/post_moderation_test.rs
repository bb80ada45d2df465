mod common;

use axum::http::{Method, StatusCode};
use bson::doc;
use serde_json::json;

use common::{seed_user, TestApp};

#[tokio::test]
async fn test_admin_moderates_post() {
    let (app, store) = TestApp::new();
    seed_user(&store, doc! { "email": "admin@x.com", "role": "admin", "admin": true }).await;
    let token = app.token_for("admin@x.com");

    let (status, body) = app
        .send(
            Method::POST,
            "/posts",
            None,
            Some(json!({ "title": "Trip", "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let post_id = body["insertedId"].as_str().unwrap().to_string();

    // submitted posts start pending whatever the client says
    let (_, post) = app
        .send(Method::GET, &format!("/post/{}", post_id), None, None)
        .await;
    assert_eq!(post["title"], "Trip");
    assert!(post.get("status").is_none());

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/manage-posts/{}?status=approved", post_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], 1);

    let (_, post) = app
        .send(Method::GET, &format!("/post/{}", post_id), None, None)
        .await;
    assert_eq!(post["status"], "approved");

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/manage-posts/{}?status=bogus", post_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);

    let (_, post) = app
        .send(Method::GET, &format!("/post/{}", post_id), None, None)
        .await;
    assert_eq!(post["status"], "approved");
    assert_eq!(post["title"], "Trip");
}

#[tokio::test]
async fn test_missing_status_is_rejected() {
    let (app, store) = TestApp::new();
    seed_user(&store, doc! { "email": "admin@x.com", "admin": true }).await;
    let token = app.token_for("admin@x.com");

    let (_, body) = app
        .send(Method::POST, "/posts", None, Some(json!({ "title": "Trip" })))
        .await;
    let post_id = body["insertedId"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/manage-posts/{}", post_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_query_answers_error_body() {
    let (app, store) = TestApp::new();
    seed_user(&store, doc! { "email": "admin@x.com", "admin": true }).await;
    let token = app.token_for("admin@x.com");

    let (_, body) = app
        .send(Method::POST, "/posts", None, Some(json!({ "title": "Trip" })))
        .await;
    let post_id = body["insertedId"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/manage-posts/{}?status=approved&status=denied", post_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);

    let (_, post) = app
        .send(Method::GET, &format!("/post/{}", post_id), None, None)
        .await;
    assert!(post.get("status").is_none());
}

#[tokio::test]
async fn test_manage_posts_requires_admin_flag() {
    let (app, store) = TestApp::new();
    seed_user(&store, doc! { "email": "admin@x.com", "admin": true }).await;
    // role string alone is not enough for admin-gate
    seed_user(&store, doc! { "email": "role-only@x.com", "role": "admin" }).await;

    app.send(Method::POST, "/posts", None, Some(json!({ "title": "One" })))
        .await;
    app.send(Method::POST, "/posts", None, Some(json!({ "title": "Two" })))
        .await;

    let (status, posts) = app
        .send(
            Method::GET,
            "/manage-posts",
            Some(&app.token_for("admin@x.com")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(
            Method::GET,
            "/manage-posts",
            Some(&app.token_for("role-only@x.com")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "forbidden access");

    // unrestricted listing is still open
    let (status, posts) = app.send(Method::GET, "/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().unwrap().len(), 2);
}
