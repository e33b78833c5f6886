use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};
use std::time::Instant;

use super::models::{AppState, NewTxRequest, NewTxResponse, PoolResponse};
use crate::transaction::MINING_SENDER;

/// Submit a signed transaction into the pool.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let t0 = Instant::now();
    debug!(
        "POST /transactions/ - received {} -> {} ({})",
        body.sender_blockchain_address, body.recipient_blockchain_address, body.value
    );

    if !body.value.is_finite() || body.value <= 0.0 {
        warn!("POST /transactions/ - rejected: non-positive value");
        return HttpResponse::BadRequest().body("value must be > 0");
    }
    // Rewards only enter through the miner.
    if body.sender_blockchain_address == MINING_SENDER {
        warn!("POST /transactions/ - rejected: reserved sender");
        return HttpResponse::BadRequest().body("reserved sender address");
    }

    let accepted = state.node.add_transaction(
        &body.sender_blockchain_address,
        &body.recipient_blockchain_address,
        body.value,
        body.sender_public_key.as_deref(),
        body.signature.as_deref(),
    );
    if !accepted {
        return HttpResponse::BadRequest().json(NewTxResponse { accepted });
    }

    info!(
        "POST /transactions/ - accepted ({} ms)",
        t0.elapsed().as_millis()
    );
    HttpResponse::Created().json(NewTxResponse { accepted })
}

/// List the pending pool.
#[get("/transactions/")]
pub async fn get_transactions(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.node.transaction_pool();
    HttpResponse::Ok().json(PoolResponse {
        size: transactions.len(),
        transactions,
    })
}
