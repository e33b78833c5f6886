mod balance;
mod chain;
mod health;
pub mod models;
mod neighbours;
mod stats;
mod tx;
mod wallet;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_transactions)
            .service(balance::get_balance)
            .service(neighbours::get_neighbours)
            .service(stats::get_stats)
            .service(wallet::create_wallet)
            .service(wallet::sign_transaction),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    use super::models::*;
    use super::*;
    use crate::config::Config;
    use crate::node::Node;
    use crate::node::testing::NoPeers;
    use crate::wallet::Wallet;

    fn state() -> web::Data<AppState> {
        let config = Config {
            difficulty: 1,
            miner_address: "M".to_string(),
            ..Config::default()
        };
        web::Data::new(AppState::new(Arc::new(Node::new(config, NoPeers))))
    }

    #[actix_web::test]
    async fn signed_transfer_is_pooled_mined_and_counted() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;
        let alice = Wallet::generate().unwrap();
        let signed = alice.transfer("B", 2.0).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/v1/transactions/")
            .set_json(&signed)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/v1/transactions/").to_request();
        let pool: PoolResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pool.size, 1);

        let req = test::TestRequest::post().uri("/api/v1/mine/").to_request();
        let mined: MineResponse = test::call_and_read_body_json(&app, req).await;
        assert!(mined.mined);
        assert_eq!(mined.length, 2);

        let req = test::TestRequest::post().uri("/api/v1/mine/").to_request();
        let again: MineResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!again.mined);
        assert_eq!(again.length, 2);

        let uri = format!("/api/v1/balance/{}/", alice.blockchain_address());
        let req = test::TestRequest::get().uri(&uri).to_request();
        let balance: BalanceResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(balance.amount, -2.0);

        let req = test::TestRequest::get().uri("/api/v1/balance/M/").to_request();
        let balance: BalanceResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(balance.amount, 1.0);

        let req = test::TestRequest::get().uri("/api/v1/validate/").to_request();
        let validate: ValidateResponse = test::call_and_read_body_json(&app, req).await;
        assert!(validate.valid);
        assert_eq!(validate.length, 2);

        let req = test::TestRequest::get().uri("/api/v1/chain/").to_request();
        let chain: ChainResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(chain.chain.len(), 2);
        assert_eq!(chain.chain[1].previous_hash, chain.chain[0].hash());
    }

    #[actix_web::test]
    async fn tampered_or_reserved_transactions_are_rejected() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;
        let alice = Wallet::generate().unwrap();
        let mut tampered = alice.transfer("B", 2.0).unwrap();
        tampered.transaction.value = 200.0;

        let req = test::TestRequest::post()
            .uri("/api/v1/transactions/")
            .set_json(&tampered)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let reward = json!({
            "sender_blockchain_address": crate::transaction::MINING_SENDER,
            "recipient_blockchain_address": "me",
            "value": 50.0
        });
        let req = test::TestRequest::post()
            .uri("/api/v1/transactions/")
            .set_json(&reward)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/v1/stats/").to_request();
        let stats: StatsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats.pool_size, 0);
        assert_eq!(stats.height, 1);
    }

    #[actix_web::test]
    async fn wallet_helpers_produce_admissible_transactions() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post().uri("/api/v1/wallet/new/").to_request();
        let wallet: Value = test::call_and_read_body_json(&app, req).await;
        let private_key = wallet["private_key"].as_str().unwrap();
        let address = wallet["blockchain_address"].as_str().unwrap();
        assert!(crate::wallet::validate_address(address));

        let req = test::TestRequest::post()
            .uri("/api/v1/wallet/sign/")
            .set_json(json!({
                "private_key": private_key,
                "recipient_blockchain_address": "B",
                "value": 4.0
            }))
            .to_request();
        let signed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(signed["sender_blockchain_address"], address);

        let req = test::TestRequest::post()
            .uri("/api/v1/transactions/")
            .set_json(&signed)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn health_and_neighbours_respond() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert!(String::from_utf8_lossy(&body).contains("height 1"));

        let req = test::TestRequest::get().uri("/api/v1/neighbours/").to_request();
        let neighbours: NeighboursResponse = test::call_and_read_body_json(&app, req).await;
        assert!(neighbours.neighbours.is_empty());
    }
}
