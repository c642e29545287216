use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use ripple_core::domain::User;
use ripple_core::ports::TokenService;
use ripple_core::services::{NewAccount, NewPost};
use ripple_infra::{Argon2PasswordService, JwtConfig, JwtTokenService, LocalMediaStore};

use super::{configure_routes, json_config};
use crate::state::{AppState, Repositories};

const MAX_UPLOAD: usize = 1024 * 1024;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::new($state.tokens.clone()))
                .app_data(json_config())
                .configure(configure_routes),
        )
        .await
    };
}

struct Fixture {
    state: AppState,
    media: TempDir,
}

fn fixture() -> Fixture {
    let media = TempDir::new().unwrap();
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig::default()));
    let state = AppState::from_parts(
        Repositories::in_memory(),
        Arc::new(Argon2PasswordService::new()),
        tokens,
        Arc::new(LocalMediaStore::new(media.path().join("uploads"), MAX_UPLOAD)),
        MAX_UPLOAD,
    );
    Fixture { state, media }
}

async fn register(state: &AppState, name: &str) -> (User, String) {
    let user = state
        .accounts
        .signup(NewAccount {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "secret1".to_string(),
            bio: None,
            avatar: None,
        })
        .await
        .unwrap();
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    (user, token)
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn multipart(
    boundary: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[actix_web::test]
async fn test_health_is_public() {
    let fx = fixture();
    let app = app!(fx.state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_protected_route_requires_token() {
    let fx = fixture();
    let app = app!(fx.state);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_unknown_route_is_problem_json() {
    let fx = fixture();
    let app = app!(fx.state);

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], 404);
    assert!(body["request_id"].is_string());
}

#[actix_web::test]
async fn test_malformed_json_is_problem_json() {
    let fx = fixture();
    let (bob, token) = register(&fx.state, "bob").await;
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/users/{}/follow", bob.id))
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ not json")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["title"], "Bad Request");
}

#[actix_web::test]
async fn test_signup_multipart_with_avatar() {
    let fx = fixture();
    let app = app!(fx.state);

    let boundary = "RippleBoundary";
    let body = multipart(
        boundary,
        &[
            ("username", "ana"),
            ("email", "Ana@Example.com"),
            ("password", "secret1"),
            ("bio", "hello"),
        ],
        Some(("avatar", "me.png", "image/png", &b"\x89PNG"[..])),
    );
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["username"], "ana");
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert!(body["user"].get("passwordHash").is_none());
    let avatar = body["user"]["avatar"].as_str().unwrap();
    assert!(avatar.starts_with("uploads/"));
    assert!(avatar.ends_with("me.png"));
    assert!(fx.media.path().join("uploads").read_dir().unwrap().next().is_some());
}

#[actix_web::test]
async fn test_signup_short_password_is_rejected() {
    let fx = fixture();
    let app = app!(fx.state);

    let boundary = "RippleBoundary";
    let body = multipart(
        boundary,
        &[("username", "ana"), ("email", "ana@example.com"), ("password", "123")],
        None,
    );
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_signin_by_username_and_bad_password() {
    let fx = fixture();
    register(&fx.state, "ana").await;
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "ana", "password": "secret1" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["username"], "ana");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "ana@example.com", "password": "wrong-pw" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["detail"], "Invalid credentials");
}

#[actix_web::test]
async fn test_repeated_follow_keeps_one_edge_and_notifies_each_time() {
    let fx = fixture();
    let (ana, ana_token) = register(&fx.state, "ana").await;
    let (bob, bob_token) = register(&fx.state, "bob").await;
    let app = app!(fx.state);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/users/{}/follow", bob.id))
            .insert_header(bearer(&ana_token))
            .set_json(json!({ "followerId": ana.id }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Successfully followed user");
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", bob.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["followers"], json!([ana.id]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/notifications/{}", bob.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    for entry in list {
        assert_eq!(entry["type"], "follow");
        assert_eq!(entry["from"]["username"], "ana");
    }
}

#[actix_web::test]
async fn test_follow_actor_checks() {
    let fx = fixture();
    let (ana, ana_token) = register(&fx.state, "ana").await;
    let (bob, _) = register(&fx.state, "bob").await;
    let app = app!(fx.state);

    let cases = [
        (json!({}), StatusCode::BAD_REQUEST),
        (json!({ "followerId": "nope" }), StatusCode::BAD_REQUEST),
        (json!({ "followerId": bob.id }), StatusCode::FORBIDDEN),
    ];
    for (body, expected) in cases {
        let req = test::TestRequest::post()
            .uri(&format!("/api/users/{}/follow", bob.id))
            .insert_header(bearer(&ana_token))
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), expected);
    }

    // Self-follow
    let req = test::TestRequest::post()
        .uri(&format!("/api/users/{}/follow", ana.id))
        .insert_header(bearer(&ana_token))
        .set_json(json!({ "followerId": ana.id }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/users/not-a-uuid/follow")
        .insert_header(bearer(&ana_token))
        .set_json(json!({ "followerId": ana.id }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_like_comment_and_notifications() {
    let fx = fixture();
    let (ana, ana_token) = register(&fx.state, "ana").await;
    let (bob, bob_token) = register(&fx.state, "bob").await;
    let post = fx
        .state
        .posts
        .create(ana.id, NewPost {
            caption: Some("sunset".to_string()),
            ..NewPost::default()
        })
        .await
        .unwrap();
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/like", post.id))
        .insert_header(bearer(&bob_token))
        .set_json(json!({ "userId": bob.id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["likesCount"], 1);

    // The author liking their own post is counted but never notified.
    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/like", post.id))
        .insert_header(bearer(&ana_token))
        .set_json(json!({ "userId": ana.id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["likesCount"], 2);

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/comment", post.id))
        .insert_header(bearer(&bob_token))
        .set_json(json!({ "userId": bob.id, "text": "  nice  " }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Comment added successfully");
    assert_eq!(body["comment"]["text"], "nice");
    assert_eq!(body["comment"]["author"]["username"], "bob");
    let comment_id = body["comment"]["id"].clone();

    let req = test::TestRequest::get()
        .uri(&format!("/api/notifications/{}", ana.id))
        .insert_header(bearer(&ana_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["type"], "comment");
    assert_eq!(list[0]["comment"], comment_id);
    assert_eq!(list[0]["post"]["caption"], "sunset");
    assert_eq!(list[1]["type"], "like");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}/like", post.id))
        .insert_header(bearer(&bob_token))
        .set_json(json!({ "userId": bob.id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["likesCount"], 1);
}

#[actix_web::test]
async fn test_like_missing_post_is_not_found() {
    let fx = fixture();
    let (ana, token) = register(&fx.state, "ana").await;
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/like", uuid::Uuid::new_v4()))
        .insert_header(bearer(&token))
        .set_json(json!({ "userId": ana.id }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_only_author_deletes_post() {
    let fx = fixture();
    let (ana, ana_token) = register(&fx.state, "ana").await;
    let (_, bob_token) = register(&fx.state, "bob").await;
    let post = fx
        .state
        .posts
        .create(ana.id, NewPost::default())
        .await
        .unwrap();
    let app = app!(fx.state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer(&ana_token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header(bearer(&ana_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_create_post_with_video_is_reel() {
    let fx = fixture();
    let (ana, token) = register(&fx.state, "ana").await;
    let app = app!(fx.state);

    let boundary = "RippleBoundary";
    let user_id = ana.id.to_string();
    let body = multipart(
        boundary,
        &[("caption", "clip"), ("user", user_id.as_str())],
        Some(("photo", "clip.mp4", "video/mp4", &b"\x00\x00\x00\x18ftyp"[..])),
    );
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["kind"], "reel");
    assert_eq!(body["caption"], "clip");
}

#[actix_web::test]
async fn test_save_and_list_saved() {
    let fx = fixture();
    let (ana, token) = register(&fx.state, "ana").await;
    let post = fx
        .state
        .posts
        .create(ana.id, NewPost::default())
        .await
        .unwrap();
    let app = app!(fx.state);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/save", post.id))
            .insert_header(bearer(&token))
            .set_json(json!({ "userId": ana.id }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/saved/{}", ana.id))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["author"]["username"], "ana");
}

#[actix_web::test]
async fn test_messaging_flow() {
    let fx = fixture();
    let (ana, ana_token) = register(&fx.state, "ana").await;
    let (bob, bob_token) = register(&fx.state, "bob").await;
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .insert_header(bearer(&ana_token))
        .set_json(json!({ "sender": ana.id, "receiver": bob.id, "text": "hi bob" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/messages/unread-count/{}", bob.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/messages/conversations/{}", bob.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["user"]["username"], "ana");
    assert_eq!(body[0]["unreadCount"], 1);
    assert_eq!(body[0]["lastMessage"]["text"], "hi bob");

    // Reading the thread marks it read.
    let req = test::TestRequest::get()
        .uri(&format!("/api/messages/{}/{}", bob.id, ana.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["read"], true);

    let req = test::TestRequest::get()
        .uri(&format!("/api/messages/unread-count/{}", bob.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);

    // Someone else's inbox is off limits.
    let req = test::TestRequest::get()
        .uri(&format!("/api/messages/conversations/{}", bob.id))
        .insert_header(bearer(&ana_token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_notification_routes() {
    let fx = fixture();
    let (ana, ana_token) = register(&fx.state, "ana").await;
    let (bob, bob_token) = register(&fx.state, "bob").await;
    let app = app!(fx.state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/notifications/{}", bob.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));

    let req = test::TestRequest::post()
        .uri("/api/notifications")
        .insert_header(bearer(&ana_token))
        .set_json(json!({ "user": ana.id, "from": ana.id, "type": "follow" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "No self-notification created");

    let req = test::TestRequest::post()
        .uri("/api/notifications")
        .insert_header(bearer(&ana_token))
        .set_json(json!({ "user": bob.id, "from": ana.id, "type": "like" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/notifications")
        .insert_header(bearer(&ana_token))
        .set_json(json!({ "user": bob.id, "from": ana.id, "type": "follow" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;

    let req = test::TestRequest::put()
        .uri(&format!(
            "/api/notifications/{}/{}/read",
            bob.id,
            created["id"].as_str().unwrap()
        ))
        .insert_header(bearer(&bob_token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/notifications/{}/read", bob.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["updated"], 0);
}

#[actix_web::test]
async fn test_profile_edit_is_self_only() {
    let fx = fixture();
    let (ana, ana_token) = register(&fx.state, "ana").await;
    let (_, bob_token) = register(&fx.state, "bob").await;
    let app = app!(fx.state);

    let req = test::TestRequest::put()
        .uri("/api/users/ana")
        .insert_header(bearer(&bob_token))
        .set_json(json!({ "bio": "hacked" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", ana.id))
        .insert_header(bearer(&ana_token))
        .set_json(json!({ "displayName": "Ana B" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["displayName"], "Ana B");
    assert_eq!(body["gender"], "Not specified");

    let req = test::TestRequest::get()
        .uri("/api/users/search/ANA")
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_avatar_without_file_is_bad_request() {
    let fx = fixture();
    let (ana, token) = register(&fx.state, "ana").await;
    let app = app!(fx.state);

    let boundary = "RippleBoundary";
    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}/avatar", ana.id))
        .insert_header(bearer(&token))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(multipart(boundary, &[("note", "none")], None))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
