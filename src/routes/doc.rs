use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
        orders::{CreateOrderItem, CreateOrderRequest, OrderList, UpdateOrderStatusRequest},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        settings::{SettingList, UpsertSettingRequest},
        users::{UpdateUserRequest, UserList, UserResponse},
    },
    models::{
        Customer, EntityStatus, Order, OrderItem, OrderStatus, Product, Setting, SettingKind,
        UserRole,
    },
    response::{ApiResponse, Meta},
    routes::{auth, customers, health, orders, products, settings, users},
    store::Document,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order_status,
        orders::delete_order,
        settings::list_settings,
        settings::get_setting,
        settings::upsert_setting,
        settings::delete_setting,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            UserRole,
            EntityStatus,
            OrderStatus,
            SettingKind,
            Customer,
            Product,
            Order,
            OrderItem,
            Setting,
            Document<Customer>,
            Document<Product>,
            Document<Order>,
            Document<Setting>,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserResponse,
            UserList,
            UpdateUserRequest,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CustomerList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateOrderRequest,
            CreateOrderItem,
            UpdateOrderStatusRequest,
            OrderList,
            UpsertSettingRequest,
            SettingList,
            Meta,
            ApiResponse<UserResponse>,
            ApiResponse<LoginResponse>,
            ApiResponse<CustomerList>,
            ApiResponse<ProductList>,
            ApiResponse<OrderList>,
            ApiResponse<SettingList>,
            ApiResponse<UserList>,
            ApiResponse<Document<Customer>>,
            ApiResponse<Document<Product>>,
            ApiResponse<Document<Order>>,
            ApiResponse<Document<Setting>>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Settings", description = "Setting endpoints"),
        (name = "Users", description = "User administration endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
