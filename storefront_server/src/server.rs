use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use storefront_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    AuthApi,
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
    UserApi,
};
use stripe_tools::StripeApi;

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        create_payment_intent,
        health,
        AdminStatusRoute,
        CreateProductRoute,
        DeleteProductRoute,
        ListUsersRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        ProductByIdRoute,
        ProductsRoute,
        PromoteUserRoute,
        ReconcileOrderRoute,
        SubmitOrderRoute,
        SubmitOrderUpdateRoute,
        UpsertUserRoute,
        UserSignInRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if let Some(email) = config.initial_admin.as_deref() {
        let auth_api = AuthApi::new(db.clone());
        let user = auth_api.promote_to_admin(email).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
        info!("🚀️ {} holds the admin role", user.email);
    }
    let handlers = EventHandlers::new(16, default_event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// The storefront does not deliver notifications itself; these hooks are where a delivery
/// component would subscribe. Until one does, the transitions are only logged.
fn default_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_new_order(|ev| {
        Box::pin(async move {
            info!(
                "📬️ Order #{} received. An order confirmation for {} would be sent here.",
                ev.order.id, ev.order.buyer_email
            );
        })
    });
    hooks.on_order_paid(|ev| {
        Box::pin(async move {
            info!("📬️ Order #{} is paid. A receipt for {} would be sent here.", ev.order.id, ev.order.buyer_email);
        })
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let stripe = StripeApi::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let host = config.host.clone();
    let port = config.port;
    let auth_config = config.auth.clone();
    let srv = HttpServer::new(move || {
        let order_api = OrderFlowApi::new(db.clone(), producers.clone());
        let auth_api = AuthApi::new(db.clone());
        let user_api = UserApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&auth_config);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("msf::access_log"))
            .app_data(web::Data::new(order_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(user_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(stripe.clone()))
            .app_data(web::Data::new(jwt_signer))
            .service(health)
            .service(create_payment_intent)
            .service(ListUsersRoute::<SqliteDatabase>::new())
            .service(AdminStatusRoute::<SqliteDatabase>::new())
            .service(PromoteUserRoute::<SqliteDatabase>::new())
            .service(UpsertUserRoute::<SqliteDatabase>::new())
            .service(UserSignInRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(SubmitOrderRoute::<SqliteDatabase>::new())
            .service(SubmitOrderUpdateRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(ReconcileOrderRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
