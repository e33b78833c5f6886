use actix_web::{HttpResponse, Responder, get, web};

use super::models::AppState;

/// Liveness probe; also reports the current chain height.
#[get("/health/")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().body(format!("ledger node up, height {} 🦀", state.node.height()))
}
