use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, NeighboursResponse};

#[get("/neighbours/")]
pub async fn get_neighbours(state: web::Data<AppState>) -> impl Responder {
    let neighbours = state
        .node
        .neighbours()
        .iter()
        .map(ToString::to_string)
        .collect();
    HttpResponse::Ok().json(NeighboursResponse { neighbours })
}
