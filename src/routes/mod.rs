use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::health_check;
use crate::handlers::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::state::AppState;

/// Binds a handler to whichever method filter the table gives it.
pub type Mount = fn(MethodFilter) -> MethodRouter<AppState>;

/// One entry of the route table.
pub struct Route {
    pub method: MethodFilter,
    pub path: &'static str,
    pub mount: Mount,
}

impl Route {
    fn new(method: MethodFilter, path: &'static str, mount: Mount) -> Self {
        Self {
            method,
            path,
            mount,
        }
    }

    pub fn into_method_router(self) -> MethodRouter<AppState> {
        (self.mount)(self.method)
    }
}

/// Every endpoint the service exposes.
pub fn route_table() -> Vec<Route> {
    vec![
        Route::new(MethodFilter::GET, "/health", |m| on(m, health_check)),
        Route::new(MethodFilter::POST, "/users", |m| on(m, create_user)),
        Route::new(MethodFilter::GET, "/users", |m| on(m, list_users)),
        Route::new(MethodFilter::GET, "/users/:id", |m| on(m, get_user)),
        Route::new(MethodFilter::PUT, "/users/:id", |m| on(m, update_user)),
        Route::new(MethodFilter::DELETE, "/users/:id", |m| on(m, delete_user)),
    ]
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    route_table()
        .into_iter()
        .fold(Router::new(), |router, entry| {
            tracing::debug!(method = ?entry.method, path = entry.path, "Registering route");
            router.route(entry.path, entry.into_method_router())
        })
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config))
        .layer(create_cors_layer(config))
        .with_state(state)
}
