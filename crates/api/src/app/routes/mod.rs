use axum::{
    routing::{get, patch, post, put},
    Router,
};

pub mod invoices;
pub mod system;
pub mod users;

/// Router for endpoints that anyone may call.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/login", post(users::login))
        .route("/users", post(users::register))
        .route("/invoices", get(invoices::list_invoices))
}

/// Router for endpoints that require a bearer token.
pub fn protected_router() -> Router {
    Router::new()
        .route("/users/:username", put(users::update_user).delete(users::delete_user))
        .route("/invoices", post(invoices::create_invoice))
        .route(
            "/invoices/:id",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .route("/invoices/:id/mark-as-paid", patch(invoices::mark_invoice_paid))
}
