use actix_web::{HttpResponse, Responder, post, web};
use log::warn;
use serde::Serialize;

use super::models::SignRequest;
use crate::wallet::Wallet;

#[derive(Serialize)]
struct NewWalletResponse {
    private_key: String,
    public_key: String,
    blockchain_address: String,
}

#[post("/wallet/new/")]
pub async fn create_wallet() -> impl Responder {
    match Wallet::generate() {
        Ok(wallet) => HttpResponse::Ok().json(NewWalletResponse {
            private_key: wallet.private_key_hex(),
            public_key: wallet.public_key_hex(),
            blockchain_address: wallet.blockchain_address().to_string(),
        }),
        Err(e) => {
            warn!("POST /wallet/new/ - {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

/// Sign a transfer with a supplied key; the result can be posted to
/// `/transactions/` as-is.
#[post("/wallet/sign/")]
pub async fn sign_transaction(body: web::Json<SignRequest>) -> impl Responder {
    let signed = Wallet::from_pkcs8_hex(&body.private_key)
        .and_then(|wallet| wallet.transfer(&body.recipient_blockchain_address, body.value));
    match signed {
        Ok(signed) => HttpResponse::Ok().json(signed),
        Err(e) => {
            warn!("POST /wallet/sign/ - {e}");
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}
