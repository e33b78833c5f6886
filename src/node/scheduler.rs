use std::sync::Arc;
use std::time::Duration;

use log::info;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::Node;

/// Fire `job` on the blocking pool every `every`, until `shutdown` is
/// cancelled. Ticks do not wait for the previous run to finish; jobs guard
/// themselves against overlap.
pub fn spawn_periodic<F>(
    name: &'static str,
    every: Duration,
    shutdown: CancellationToken,
    job: F,
) -> JoinHandle<()>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    let job = Arc::new(job);
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("{name} loop started (every {every:?})");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let job = Arc::clone(&job);
                    tokio::task::spawn_blocking(move || job());
                }
            }
        }
        info!("{name} loop stopped");
    })
}

pub fn spawn_mining_loop(node: Arc<Node>) -> JoinHandle<()> {
    let every = node.config().mining_interval;
    let shutdown = node.shutdown_token();
    spawn_periodic("MINER", every, shutdown, move || node.start_mining())
}

pub fn spawn_neighbour_sync_loop(node: Arc<Node>) -> JoinHandle<()> {
    let every = node.config().neighbours_sync_interval;
    let shutdown = node.shutdown_token();
    spawn_periodic("NEIGHBOURS", every, shutdown, move || node.sync_neighbours())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::Config;
    use crate::node::testing::NoPeers;
    use crate::transaction::MINING_SENDER;

    #[tokio::test]
    async fn periodic_job_runs_until_shutdown() {
        let runs = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();
        let handle = {
            let runs = Arc::clone(&runs);
            spawn_periodic("TEST", Duration::from_millis(10), shutdown.clone(), move || {
                runs.fetch_add(1, Ordering::SeqCst);
                true
            })
        };

        time::sleep(Duration::from_millis(100)).await;
        shutdown.cancel();
        handle.await.unwrap();
        time::sleep(Duration::from_millis(20)).await;

        let seen = runs.load(Ordering::SeqCst);
        assert!(seen >= 2, "job ran {seen} times");
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), seen);
    }

    #[tokio::test]
    async fn mining_loop_seals_pending_transactions() {
        let config = Config {
            difficulty: 1,
            miner_address: "M".to_string(),
            mining_interval: Duration::from_millis(10),
            ..Config::default()
        };
        let node = Arc::new(Node::new(config, NoPeers));
        node.add_transaction(MINING_SENDER, "X", 1.0, None, None);

        let handle = spawn_mining_loop(Arc::clone(&node));
        for _ in 0..100 {
            if node.height() == 2 {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        node.shutdown();
        handle.await.unwrap();

        assert_eq!(node.height(), 2);
        assert_eq!(node.pool_size(), 0);
        assert_eq!(node.calculate_total_amount("M"), 1.0);
    }
}
