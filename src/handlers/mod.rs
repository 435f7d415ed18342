use axum::response::Response;
use serde::Serialize;

use crate::utils::response::ok;

pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
}

pub async fn health_check() -> Response {
    ok(HealthPayload { status: "ok" })
}
