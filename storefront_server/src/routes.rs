//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (I/O, database round-trips, the
//! payment gateway call) is therefore expressed as an async function, so that worker threads keep serving other
//! requests while the operation is in flight.

use actix_web::{get, post, web, HttpResponse, Responder};
use log::*;
use msf_common::Cents;
use storefront_engine::{
    db_types::{NewOrder, NewPaymentRecord, NewProduct},
    traits::{CatalogManagement, PaymentGatewayDatabase, UserManagement},
    AuthApi,
    CatalogApi,
    OrderFlowApi,
    UserApi,
};
use stripe_tools::StripeApi;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{
        AdminStatus,
        OrderQueryParams,
        PaymentIntentParams,
        PaymentIntentResult,
        ReconcilePaymentParams,
        UpsertUserResult,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Payments  ----------------------------------------------------

/// Route handler for the create-payment-intent endpoint
///
/// Authenticated buyers ask the payment gateway to authorize a card charge for the given price.
/// The price is validated *before* the gateway is contacted, and the only thing that leaves this
/// handler is the client secret the storefront needs to confirm the charge client-side.
#[post("/create-payment-intent")]
pub async fn create_payment_intent(
    claims: JwtClaims,
    api: web::Data<StripeApi>,
    body: web::Json<PaymentIntentParams>,
) -> Result<HttpResponse, ServerError> {
    let price = body.into_inner().price;
    if !(price > 0.0) {
        return Err(ServerError::ValidationError(format!("price must be positive, got {price}")));
    }
    let amount = Cents::from_major_units(price).map_err(|e| ServerError::ValidationError(e.to_string()))?;
    debug!("💻️ Payment intent request from {} for {amount}", claims.email);
    let intent = api.create_payment_intent(amount).await.map_err(|e| {
        debug!("💻️ Could not create payment intent. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(PaymentIntentResult { client_secret: intent.client_secret }))
}

//----------------------------------------------   Users  ----------------------------------------------------

route!(list_users => Get "/users" impl UserManagement);
pub async fn list_users<B: UserManagement>(api: web::Data<UserApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET users");
    let users = api.all_users().await.map_err(|e| {
        debug!("💻️ Could not fetch users. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(users))
}

route!(admin_status => Get "/admin/{email}" impl UserManagement);
/// Answers `{"admin": bool}` for the given email. An email without a user record is simply not an
/// admin; only gated operations care about the difference.
pub async fn admin_status<B: UserManagement>(
    path: web::Path<String>,
    api: web::Data<AuthApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let email = path.into_inner();
    debug!("💻️ GET admin status for {email}");
    let admin = api.is_admin(&email).await.map_err(|e| {
        debug!("💻️ Could not fetch admin status. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(AdminStatus { admin }))
}

route!(promote_user => Put "/user/admin/{email}" impl UserManagement);
/// Route handler for the admin promotion endpoint
///
/// The caller must hold the admin role; the target is promoted via upsert-by-email, so promoting
/// an already-admin user is a no-op success and the call is safe to retry.
pub async fn promote_user<B: UserManagement>(
    claims: JwtClaims,
    path: web::Path<String>,
    api: web::Data<AuthApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let target = path.into_inner();
    api.require_admin(&claims.email).await.map_err(|e| {
        debug!("💻️ {} may not promote users. {e}", claims.email);
        ServerError::from(e)
    })?;
    validate_email(&target)?;
    info!("💻️ {} is promoting {target} to admin", claims.email);
    let user = api.promote_to_admin(&target).await.map_err(|e| {
        debug!("💻️ Could not promote {target}. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(user))
}

route!(upsert_user => Put "/user/{email}" impl UserManagement);
/// Route handler for the user upsert endpoint
///
/// Creates or refreshes the user record and issues a fresh one-hour access token for the session.
/// The stored role is never touched here; sign-in must not demote (or promote) anyone.
pub async fn upsert_user<B: UserManagement>(
    path: web::Path<String>,
    api: web::Data<UserApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    upsert_and_issue_token(&path.into_inner(), api.as_ref(), signer.as_ref()).await
}

route!(user_sign_in => Get "/user/{email}" impl UserManagement);
/// The storefront client calls this variant on sign-in; it is the same upsert.
pub async fn user_sign_in<B: UserManagement>(
    path: web::Path<String>,
    api: web::Data<UserApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    upsert_and_issue_token(&path.into_inner(), api.as_ref(), signer.as_ref()).await
}

async fn upsert_and_issue_token<B: UserManagement>(
    email: &str,
    api: &UserApi<B>,
    signer: &TokenIssuer,
) -> Result<HttpResponse, ServerError> {
    validate_email(email)?;
    debug!("💻️ Upserting user record for {email}");
    let user = api.upsert_user(email).await.map_err(|e| {
        debug!("💻️ Could not upsert user. {e}");
        ServerError::from(e)
    })?;
    let token = signer.issue_token(email)?;
    Ok(HttpResponse::Ok().json(UpsertUserResult { result: user, token }))
}

//----------------------------------------------   Catalog  ----------------------------------------------------

route!(products => Get "/product" impl CatalogManagement);
pub async fn products<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET products");
    let products = api.products().await.map_err(|e| {
        debug!("💻️ Could not fetch products. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/product/{id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET product {id}");
    let product = api.product_by_id(id).await.map_err(|e| {
        debug!("💻️ Could not fetch product. {e}");
        ServerError::from(e)
    })?;
    match product {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Err(ServerError::NoRecordFound(format!("No product exists with id {id}"))),
    }
}

route!(create_product => Post "/product" impl CatalogManagement, UserManagement);
/// Route handler for the product creation endpoint. Admin only.
pub async fn create_product<BCat: CatalogManagement, BUser: UserManagement>(
    claims: JwtClaims,
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<BCat>>,
    auth_api: web::Data<AuthApi<BUser>>,
) -> Result<HttpResponse, ServerError> {
    auth_api.require_admin(&claims.email).await.map_err(|e| {
        debug!("💻️ {} may not create products. {e}", claims.email);
        ServerError::from(e)
    })?;
    let product = body.into_inner();
    validate_new_product(&product)?;
    info!("💻️ {} is adding product '{}' to the catalog", claims.email, product.name);
    let product = api.add_product(product).await.map_err(|e| {
        debug!("💻️ Could not add product. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/product/{id}" impl CatalogManagement, UserManagement);
/// Route handler for the product deletion endpoint. Admin only.
///
/// Deleting an id that does not exist is reported as a 404, never as a server error.
pub async fn delete_product<BCat: CatalogManagement, BUser: UserManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<BCat>>,
    auth_api: web::Data<AuthApi<BUser>>,
) -> Result<HttpResponse, ServerError> {
    auth_api.require_admin(&claims.email).await.map_err(|e| {
        debug!("💻️ {} may not delete products. {e}", claims.email);
        ServerError::from(e)
    })?;
    let id = path.into_inner();
    info!("💻️ {} is deleting product {id}", claims.email);
    api.remove_product(id).await.map_err(|e| {
        debug!("💻️ Could not delete product {id}. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(crate::data_objects::JsonResponse::success(format!("Product {id} deleted"))))
}

//----------------------------------------------   Orders  ----------------------------------------------------

route!(submit_order => Post "/order" impl PaymentGatewayDatabase);
/// Route handler for the order submission endpoint
///
/// Submission is idempotent: a resubmission of an identical order (same product, buyer, quantity
/// and price) returns the original record with `created == false`, so client retries are safe.
pub async fn submit_order<B: PaymentGatewayDatabase>(
    body: web::Json<NewOrder>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order = body.into_inner();
    validate_new_order(&order)?;
    debug!("💻️ New order submission for {}", order.buyer_email);
    let submission = api.submit_order(order).await.map_err(|e| {
        debug!("💻️ Could not submit order. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(submission))
}

route!(submit_order_update => Put "/order/{id}" impl PaymentGatewayDatabase);
/// Idempotent order-create variant used by storefront clients that PUT against an order id.
///
/// Duplicate detection uses the same submission tuple as `POST /order`; the path id plays no part
/// in the order's identity.
pub async fn submit_order_update<B: PaymentGatewayDatabase>(
    path: web::Path<i64>,
    body: web::Json<NewOrder>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let order = body.into_inner();
    validate_new_order(&order)?;
    debug!("💻️ Order submission via PUT /order/{id} for {}", order.buyer_email);
    let submission = api.submit_order(order).await.map_err(|e| {
        debug!("💻️ Could not submit order. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(submission))
}

route!(my_orders => Get "/order" impl PaymentGatewayDatabase);
/// Route handler for the order listing endpoint
///
/// Authenticated buyers can list their own orders. The email in the query string must match the
/// identity in the access token; anything else is forbidden, regardless of what data exists.
pub async fn my_orders<B: PaymentGatewayDatabase>(
    claims: JwtClaims,
    query: web::Query<OrderQueryParams>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let email = query.into_inner().email;
    if email != claims.email {
        debug!("💻️ {} tried to list orders for {email}", claims.email);
        return Err(ServerError::InsufficientPermissions(
            "Orders can only be listed for the authenticated buyer".to_string(),
        ));
    }
    debug!("💻️ GET orders for {email}");
    let orders = api.orders_for_buyer(&email).await.map_err(|e| {
        debug!("💻️ Could not fetch orders. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/order/{id}" impl PaymentGatewayDatabase);
pub async fn order_by_id<B: PaymentGatewayDatabase>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET order {id}");
    let order = api.fetch_order(id).await.map_err(|e| {
        debug!("💻️ Could not fetch order. {e}");
        ServerError::from(e)
    })?;
    match order {
        Some(order) => Ok(HttpResponse::Ok().json(order)),
        None => Err(ServerError::NoRecordFound(format!("No order exists with id {id}"))),
    }
}

route!(reconcile_order => Patch "/order/{id}" impl PaymentGatewayDatabase);
/// Route handler for the payment reconciliation endpoint
///
/// Records the confirmed payment and transitions the order to paid. Replaying a confirmation with
/// the same transaction id is a no-op success; a different transaction id against a paid order is
/// a conflict.
pub async fn reconcile_order<B: PaymentGatewayDatabase>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<ReconcilePaymentParams>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let ReconcilePaymentParams { transaction_id, amount } = body.into_inner();
    if transaction_id.trim().is_empty() {
        return Err(ServerError::ValidationError("a transaction id is required".to_string()));
    }
    if amount <= 0 {
        return Err(ServerError::ValidationError(format!("amount must be positive, got {amount}")));
    }
    info!("💻️ Reconciling payment [{transaction_id}] against order #{order_id} for {}", claims.email);
    let payment = NewPaymentRecord::new(transaction_id, Cents::from(amount));
    let result = api.reconcile_payment(order_id, payment).await.map_err(|e| {
        debug!("💻️ Could not reconcile payment. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Validation  ----------------------------------------------------
// Malformed input is rejected here, before any store or gateway round-trip is made.

fn validate_email(email: &str) -> Result<(), ServerError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ServerError::ValidationError(format!("'{email}' is not a usable email address")));
    }
    Ok(())
}

fn validate_new_order(order: &NewOrder) -> Result<(), ServerError> {
    validate_email(&order.buyer_email)?;
    if order.quantity <= 0 {
        return Err(ServerError::ValidationError(format!("quantity must be positive, got {}", order.quantity)));
    }
    if !order.price.is_positive() {
        return Err(ServerError::ValidationError(format!("price must be positive, got {}", order.price)));
    }
    Ok(())
}

fn validate_new_product(product: &NewProduct) -> Result<(), ServerError> {
    if product.name.trim().is_empty() {
        return Err(ServerError::ValidationError("a product name is required".to_string()));
    }
    if !product.price.is_positive() {
        return Err(ServerError::ValidationError(format!("price must be positive, got {}", product.price)));
    }
    Ok(())
}
