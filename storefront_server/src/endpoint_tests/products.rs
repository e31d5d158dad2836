use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::Utc;
use msf_common::Cents;
use serde_json::json;
use storefront_engine::{
    db_types::{Product, Role},
    traits::CatalogApiError,
    AuthApi,
    CatalogApi,
};
use stripe_tools::{StripeApi, StripeConfig};

use super::{
    helpers::{bearer_header, send, test_issuer},
    mocks::{MockCatalogManager, MockUserManager},
};
use crate::routes::{create_payment_intent, CreateProductRoute, DeleteProductRoute, ProductByIdRoute, ProductsRoute};

fn sample_product(id: i64, name: &str) -> Product {
    Product { id, name: name.to_string(), price: Cents::from(1250), created_at: Utc::now() }
}

fn admin_caller() -> MockUserManager {
    let mut users = MockUserManager::new();
    users.expect_fetch_role_for_email().returning(|_| Ok(Some(Role::Admin)));
    users
}

fn configure_app(catalog: MockCatalogManager, users: MockUserManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(CatalogApi::new(catalog)))
            .app_data(web::Data::new(AuthApi::new(users)))
            .app_data(web::Data::new(test_issuer()))
            .service(ProductsRoute::<MockCatalogManager>::new())
            .service(ProductByIdRoute::<MockCatalogManager>::new())
            .service(CreateProductRoute::<MockCatalogManager, MockUserManager>::new())
            .service(DeleteProductRoute::<MockCatalogManager, MockUserManager>::new());
    }
}

#[actix_web::test]
async fn the_catalog_is_public() {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_products().returning(|| Ok(vec![sample_product(1, "Steel bracket")]));
    catalog.expect_fetch_product_by_id().returning(|id| Ok(Some(sample_product(id, "Steel bracket"))));
    let app = test::init_service(App::new().configure(configure_app(catalog, MockUserManager::new()))).await;

    let (status, body) = send(&app, TestRequest::get().uri("/product").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Steel bracket"), "was: {body}");

    let (status, body) = send(&app, TestRequest::get().uri("/product/1").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""id":1"#), "was: {body}");
}

#[actix_web::test]
async fn fetching_an_unknown_product_is_not_found() {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_product_by_id().returning(|_| Ok(None));
    let app = test::init_service(App::new().configure(configure_app(catalog, MockUserManager::new()))).await;
    let (status, _) = send(&app, TestRequest::get().uri("/product/999").to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn only_admins_can_create_products() {
    let mut users = MockUserManager::new();
    users.expect_fetch_role_for_email().returning(|_| Ok(Some(Role::Regular)));
    // No catalog expectations: the gate must reject before the catalog is touched.
    let app = test::init_service(App::new().configure(configure_app(MockCatalogManager::new(), users))).await;
    let req = TestRequest::post()
        .uri("/product")
        .insert_header(bearer_header("pleb@example.com"))
        .set_json(json!({ "name": "Gasket", "price": 1.50 }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admins_can_create_products() {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_insert_product().returning(|p| {
        assert_eq!(p.price, Cents::from(150));
        Ok(Product { id: 8, name: p.name, price: p.price, created_at: Utc::now() })
    });
    let app = test::init_service(App::new().configure(configure_app(catalog, admin_caller()))).await;
    let req = TestRequest::post()
        .uri("/product")
        .insert_header(bearer_header("boss@example.com"))
        .set_json(json!({ "name": "Gasket", "price": 1.50 }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let product: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(product["id"], 8);
    assert_eq!(product["price"], 1.5);
}

#[actix_web::test]
async fn nonsense_products_are_rejected_before_the_store_is_touched() {
    let app = test::init_service(App::new().configure(configure_app(MockCatalogManager::new(), admin_caller()))).await;
    for bad in [json!({ "name": "", "price": 1.50 }), json!({ "name": "Gasket", "price": 0.0 })] {
        let req = TestRequest::post()
            .uri("/product")
            .insert_header(bearer_header("boss@example.com"))
            .set_json(bad)
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn deleting_an_unknown_product_is_not_found_rather_than_an_error() {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_delete_product().returning(|id| Err(CatalogApiError::ProductNotFound(id)));
    let app = test::init_service(App::new().configure(configure_app(catalog, admin_caller()))).await;
    let req =
        TestRequest::delete().uri("/product/424242").insert_header(bearer_header("boss@example.com")).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No product exists with id 424242"), "was: {body}");
}

#[actix_web::test]
async fn deleting_a_product_succeeds_for_admins() {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_delete_product().returning(|_| Ok(()));
    let app = test::init_service(App::new().configure(configure_app(catalog, admin_caller()))).await;
    let req = TestRequest::delete().uri("/product/3").insert_header(bearer_header("boss@example.com")).to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Product 3 deleted"), "was: {body}");
}

//----------------------------------------------   Payment intent  ---------------------------------------------

#[actix_web::test]
async fn payment_intents_validate_the_price_before_calling_the_gateway() {
    // The gateway client points at the real config, but validation fires before any network call.
    let stripe = StripeApi::new(StripeConfig::default()).unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(stripe))
            .app_data(web::Data::new(test_issuer()))
            .service(create_payment_intent),
    )
    .await;
    for bad_price in [0.0, -19.99] {
        let req = TestRequest::post()
            .uri("/create-payment-intent")
            .insert_header(bearer_header("alice@example.com"))
            .set_json(json!({ "price": bad_price }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "was: {body}");
    }
}

#[actix_web::test]
async fn payment_intents_require_credentials() {
    let stripe = StripeApi::new(StripeConfig::default()).unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(stripe))
            .app_data(web::Data::new(test_issuer()))
            .service(create_payment_intent),
    )
    .await;
    let req = TestRequest::post().uri("/create-payment-intent").set_json(json!({ "price": 19.99 })).to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
