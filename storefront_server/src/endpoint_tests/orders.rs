use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use serde_json::json;
use storefront_engine::{traits::PaymentGatewayError, OrderFlowApi};

use super::{
    helpers::{bearer_header, sample_order, send, test_issuer},
    mocks::MockOrderDb,
};
use crate::routes::{OrderByIdRoute, ReconcileOrderRoute, SubmitOrderRoute, SubmitOrderUpdateRoute};

fn configure_app(db: MockOrderDb) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = OrderFlowApi::new(db, Default::default());
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(test_issuer()))
            .service(SubmitOrderRoute::<MockOrderDb>::new())
            .service(SubmitOrderUpdateRoute::<MockOrderDb>::new())
            .service(OrderByIdRoute::<MockOrderDb>::new())
            .service(ReconcileOrderRoute::<MockOrderDb>::new());
    }
}

fn order_body() -> serde_json::Value {
    json!({ "productId": 1, "buyerEmail": "alice@example.com", "quantity": 2, "price": 19.99 })
}

#[actix_web::test]
async fn a_new_submission_reports_created() {
    let mut db = MockOrderDb::new();
    db.expect_insert_order().returning(|_| Ok((sample_order(1, "alice@example.com", false, None), true)));
    let app = test::init_service(App::new().configure(configure_app(db))).await;
    let req = TestRequest::post().uri("/order").set_json(order_body()).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let submission: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(submission["created"], true);
    assert_eq!(submission["order"]["id"], 1);
}

#[actix_web::test]
async fn a_duplicate_submission_reports_the_existing_order() {
    let mut db = MockOrderDb::new();
    db.expect_insert_order().returning(|_| Ok((sample_order(42, "alice@example.com", false, None), false)));
    let app = test::init_service(App::new().configure(configure_app(db))).await;
    let req = TestRequest::post().uri("/order").set_json(order_body()).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let submission: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(submission["created"], false);
    assert_eq!(submission["order"]["id"], 42);
}

#[actix_web::test]
async fn the_put_variant_uses_the_same_submission_flow() {
    let mut db = MockOrderDb::new();
    db.expect_insert_order().returning(|_| Ok((sample_order(7, "alice@example.com", false, None), false)));
    let app = test::init_service(App::new().configure(configure_app(db))).await;
    let req = TestRequest::put().uri("/order/999").set_json(order_body()).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let submission: serde_json::Value = serde_json::from_str(&body).unwrap();
    // The path id played no part; identity came from the submission fields.
    assert_eq!(submission["order"]["id"], 7);
    assert_eq!(submission["created"], false);
}

#[actix_web::test]
async fn invalid_submissions_are_rejected_before_the_store_is_touched() {
    // No expectations: reaching the store fails the test.
    let app = test::init_service(App::new().configure(configure_app(MockOrderDb::new()))).await;
    for bad in [
        json!({ "productId": 1, "buyerEmail": "alice@example.com", "quantity": 0, "price": 19.99 }),
        json!({ "productId": 1, "buyerEmail": "alice@example.com", "quantity": 2, "price": -19.99 }),
        json!({ "productId": 1, "buyerEmail": "not-an-email", "quantity": 2, "price": 19.99 }),
    ] {
        let req = TestRequest::post().uri("/order").set_json(bad).to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "was: {body}");
    }
}

#[actix_web::test]
async fn fetching_an_unknown_order_is_not_found() {
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    let app = test::init_service(App::new().configure(configure_app(db))).await;
    let req = TestRequest::get().uri("/order/1234").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No order exists with id 1234"), "was: {body}");
}

#[actix_web::test]
async fn reconciliation_settles_the_order() {
    let mut db = MockOrderDb::new();
    db.expect_settle_order().returning(|id, p| {
        assert_eq!(p.transaction_id, "txn_123");
        Ok((sample_order(id, "alice@example.com", true, Some("txn_123")), true))
    });
    let app = test::init_service(App::new().configure(configure_app(db))).await;
    let req = TestRequest::patch()
        .uri("/order/5")
        .insert_header(bearer_header("alice@example.com"))
        .set_json(json!({ "transactionId": "txn_123", "amount": 1999 }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let result: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["settled"], true);
    assert_eq!(result["order"]["paid"], true);
    assert_eq!(result["order"]["transactionId"], "txn_123");
}

#[actix_web::test]
async fn replaying_a_reconciliation_is_a_noop_success() {
    let mut db = MockOrderDb::new();
    db.expect_settle_order()
        .returning(|id, _| Ok((sample_order(id, "alice@example.com", true, Some("txn_123")), false)));
    let app = test::init_service(App::new().configure(configure_app(db))).await;
    let req = TestRequest::patch()
        .uri("/order/5")
        .insert_header(bearer_header("alice@example.com"))
        .set_json(json!({ "transactionId": "txn_123", "amount": 1999 }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let result: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["settled"], false);
}

#[actix_web::test]
async fn a_conflicting_transaction_is_a_409() {
    let mut db = MockOrderDb::new();
    db.expect_settle_order()
        .returning(|id, p| Err(PaymentGatewayError::PaymentConflict { order_id: id, txid: p.transaction_id }));
    let app = test::init_service(App::new().configure(configure_app(db))).await;
    let req = TestRequest::patch()
        .uri("/order/5")
        .insert_header(bearer_header("alice@example.com"))
        .set_json(json!({ "transactionId": "txn_other", "amount": 1999 }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("already paid by a different transaction"), "was: {body}");
}

#[actix_web::test]
async fn reconciling_an_unknown_order_is_not_found() {
    let mut db = MockOrderDb::new();
    db.expect_settle_order().returning(|id, _| Err(PaymentGatewayError::OrderNotFound(id)));
    let app = test::init_service(App::new().configure(configure_app(db))).await;
    let req = TestRequest::patch()
        .uri("/order/5150")
        .insert_header(bearer_header("alice@example.com"))
        .set_json(json!({ "transactionId": "txn_123", "amount": 1999 }))
        .to_request();
    let (status, _body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn reconciliation_requires_a_token_and_sane_input() {
    let app = test::init_service(App::new().configure(configure_app(MockOrderDb::new()))).await;

    let req = TestRequest::patch()
        .uri("/order/5")
        .set_json(json!({ "transactionId": "txn_123", "amount": 1999 }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = TestRequest::patch()
        .uri("/order/5")
        .insert_header(bearer_header("alice@example.com"))
        .set_json(json!({ "transactionId": "", "amount": 1999 }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = TestRequest::patch()
        .uri("/order/5")
        .insert_header(bearer_header("alice@example.com"))
        .set_json(json!({ "transactionId": "txn_123", "amount": 0 }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
