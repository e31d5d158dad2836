use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use storefront_engine::{
    db_types::Role,
    AuthApi,
    UserApi,
};

use super::{
    helpers::{bearer_header, sample_user, send, test_issuer},
    mocks::MockUserManager,
};
use crate::routes::{AdminStatusRoute, ListUsersRoute, PromoteUserRoute, UpsertUserRoute, UserSignInRoute};

fn configure_app(db: MockUserManager, db2: MockUserManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AuthApi::new(db)))
            .app_data(web::Data::new(UserApi::new(db2)))
            .app_data(web::Data::new(test_issuer()))
            .service(PromoteUserRoute::<MockUserManager>::new())
            .service(AdminStatusRoute::<MockUserManager>::new())
            .service(ListUsersRoute::<MockUserManager>::new())
            .service(UpsertUserRoute::<MockUserManager>::new())
            .service(UserSignInRoute::<MockUserManager>::new());
    }
}

#[actix_web::test]
async fn a_regular_user_cannot_promote_anyone() {
    let _ = env_logger::try_init().ok();
    let mut db = MockUserManager::new();
    db.expect_fetch_role_for_email().returning(|_| Ok(Some(Role::Regular)));
    let app = test::init_service(App::new().configure(configure_app(db, MockUserManager::new()))).await;
    let req = TestRequest::put()
        .uri("/user/admin/bob@example.com")
        .insert_header(bearer_header("pleb@example.com"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("'admin' is required"), "was: {body}");
}

#[actix_web::test]
async fn a_caller_without_a_user_record_cannot_promote_anyone() {
    let mut db = MockUserManager::new();
    db.expect_fetch_role_for_email().returning(|_| Ok(None));
    let app = test::init_service(App::new().configure(configure_app(db, MockUserManager::new()))).await;
    let req = TestRequest::put()
        .uri("/user/admin/bob@example.com")
        .insert_header(bearer_header("ghost@example.com"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("No user record exists for ghost@example.com"), "was: {body}");
}

#[actix_web::test]
async fn an_admin_can_promote_and_the_call_is_idempotent() {
    let mut db = MockUserManager::new();
    db.expect_fetch_role_for_email().returning(|_| Ok(Some(Role::Admin)));
    // Promoting an existing admin simply rewrites the same role.
    db.expect_set_role_for_email().times(2).returning(|email, role| Ok(sample_user(email, role)));
    let app = test::init_service(App::new().configure(configure_app(db, MockUserManager::new()))).await;
    for _ in 0..2 {
        let req = TestRequest::put()
            .uri("/user/admin/bob@example.com")
            .insert_header(bearer_header("boss@example.com"))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        let user: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(user["email"], "bob@example.com");
        assert_eq!(user["role"], "admin");
    }
}

#[actix_web::test]
async fn promotion_requires_credentials() {
    let app =
        test::init_service(App::new().configure(configure_app(MockUserManager::new(), MockUserManager::new()))).await;
    let req = TestRequest::put().uri("/user/admin/bob@example.com").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_status_is_false_for_unknown_emails() {
    let mut db = MockUserManager::new();
    db.expect_fetch_role_for_email().returning(|_| Ok(None));
    let app = test::init_service(App::new().configure(configure_app(db, MockUserManager::new()))).await;
    let req = TestRequest::get().uri("/admin/ghost@example.com").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"admin":false}"#);
}

#[actix_web::test]
async fn admin_status_is_true_for_admins() {
    let mut db = MockUserManager::new();
    db.expect_fetch_role_for_email().returning(|_| Ok(Some(Role::Admin)));
    let app = test::init_service(App::new().configure(configure_app(db, MockUserManager::new()))).await;
    let req = TestRequest::get().uri("/admin/boss@example.com").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"admin":true}"#);
}

#[actix_web::test]
async fn listing_users_needs_no_credentials() {
    let mut db2 = MockUserManager::new();
    db2.expect_fetch_all_users()
        .returning(|| Ok(vec![sample_user("amy@example.com", Role::Regular), sample_user("boss@example.com", Role::Admin)]));
    let app = test::init_service(App::new().configure(configure_app(MockUserManager::new(), db2))).await;
    let req = TestRequest::get().uri("/users").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let users: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(users.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn upserting_a_profile_returns_the_record_and_a_token() {
    let mut db2 = MockUserManager::new();
    db2.expect_upsert_user().returning(|email| Ok(sample_user(email, Role::Regular)));
    let app = test::init_service(App::new().configure(configure_app(MockUserManager::new(), db2))).await;
    for method in [TestRequest::put(), TestRequest::get()] {
        let req = method.uri("/user/carol@example.com").to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        let result: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(result["result"]["email"], "carol@example.com");
        // The issued token must verify with the server's own secret and carry the email.
        let token = result["token"].as_str().unwrap();
        let claims = test_issuer().decode_access_token(token).unwrap();
        assert_eq!(claims.email, "carol@example.com");
    }
}

#[actix_web::test]
async fn upserting_a_nonsense_email_is_rejected() {
    let app =
        test::init_service(App::new().configure(configure_app(MockUserManager::new(), MockUserManager::new()))).await;
    let req = TestRequest::put().uri("/user/not-an-email").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
