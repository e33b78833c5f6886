use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let node = &state.node;
    let config = node.config();
    HttpResponse::Ok().json(StatsResponse {
        height: node.height(),
        difficulty: config.difficulty,
        mining_reward: config.mining_reward,
        mining_interval_secs: config.mining_interval.as_secs(),
        pool_size: node.pool_size(),
        neighbours: node.neighbours().len(),
    })
}
