use mockall::mock;
use storefront_engine::{
    db_types::{NewOrder, NewPaymentRecord, NewProduct, Order, Product, Role, User},
    traits::{
        AuthApiError,
        CatalogApiError,
        CatalogManagement,
        PaymentGatewayDatabase,
        PaymentGatewayError,
        UserManagement,
    },
};

mock! {
    pub UserManager {}
    impl UserManagement for UserManager {
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError>;
        async fn upsert_user(&self, email: &str) -> Result<User, AuthApiError>;
        async fn fetch_all_users(&self) -> Result<Vec<User>, AuthApiError>;
        async fn fetch_role_for_email(&self, email: &str) -> Result<Option<Role>, AuthApiError>;
        async fn set_role_for_email(&self, email: &str, role: Role) -> Result<User, AuthApiError>;
    }
}

mock! {
    pub OrderDb {}
    impl PaymentGatewayDatabase for OrderDb {
        async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), PaymentGatewayError>;
        async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentGatewayError>;
        async fn fetch_orders_for_buyer(&self, email: &str) -> Result<Vec<Order>, PaymentGatewayError>;
        async fn settle_order(&self, order_id: i64, payment: NewPaymentRecord) -> Result<(Order, bool), PaymentGatewayError>;
    }
}

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError>;
        async fn fetch_product_by_id(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;
        async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;
        async fn delete_product(&self, id: i64) -> Result<(), CatalogApiError>;
    }
}
