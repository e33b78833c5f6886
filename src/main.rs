use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{error, info, warn};
use std::io;
use std::sync::Arc;

use pow_ledger::api::{self, AppState};
use pow_ledger::config::Config;
use pow_ledger::node::{Node, TcpProbe, scheduler};
use pow_ledger::wallet::{self, Wallet};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let mut config = Config::from_env().map_err(|e| {
        error!("{e}");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    if config.miner_address.is_empty() {
        let miner = Wallet::generate().map_err(io::Error::other)?;
        info!(
            "MINER_ADDRESS not set, mining to generated wallet {}",
            miner.blockchain_address()
        );
        config.miner_address = miner.blockchain_address().to_string();
    } else if !wallet::validate_address(&config.miner_address) {
        warn!(
            "MINER_ADDRESS {} is not a checksummed blockchain address",
            config.miner_address
        );
    }

    let host = config.host.clone();
    let port = config.port;
    let discovery = TcpProbe::from_config(&config);
    let node = Arc::new(Node::new(config, discovery));

    let mining = scheduler::spawn_mining_loop(Arc::clone(&node));
    let sync = scheduler::spawn_neighbour_sync_loop(Arc::clone(&node));

    println!("⛓️ Starting ledger node at http://{host}:{port}");

    let state = web::Data::new(AppState::new(Arc::clone(&node)));
    let served = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    node.shutdown();
    let _ = mining.await;
    let _ = sync.await;
    served
}
