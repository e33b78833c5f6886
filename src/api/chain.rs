use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, info};
use std::sync::Arc;

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.chain();
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        difficulty: state.node.config().difficulty,
        chain,
    })
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ValidateResponse {
        valid: state.node.is_valid_chain(),
        length: state.node.height(),
        difficulty: state.node.config().difficulty,
    })
}

/// Run one guarded mining cycle now. The proof search runs on the blocking
/// pool; `mined` is false when the pool is empty or a cycle is already running.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let node = Arc::clone(&state.node);
    let mined = match web::block(move || node.start_mining()).await {
        Ok(mined) => mined,
        Err(e) => {
            error!("POST /mine/ - mining task failed: {e}");
            return HttpResponse::InternalServerError().body("mining task failed");
        }
    };
    let length = state.node.height();
    info!("POST /mine/ - mined={mined} length={length}");
    HttpResponse::Ok().json(MineResponse { mined, length })
}
