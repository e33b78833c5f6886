use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, BalanceResponse};

/// Net amount for an address, recomputed from the whole chain.
#[get("/balance/{address}/")]
pub async fn get_balance(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let address = path.into_inner().0;
    let amount = state.node.calculate_total_amount(&address);
    HttpResponse::Ok().json(BalanceResponse { address, amount })
}
