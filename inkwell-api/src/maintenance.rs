/// Background upkeep for the token store
///
/// Revoked and expired `access_tokens` rows can never authenticate again.
/// [`spawn_token_pruner`] deletes them on a fixed period for as long as the
/// server runs; the first pass happens immediately.

use inkwell_shared::models::access_token::AccessToken;
use sqlx::PgPool;
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

/// Deletes unusable token rows once, returning how many went
pub async fn prune_tokens(pool: &PgPool) -> u64 {
    match AccessToken::prune(pool).await {
        Ok(removed) => {
            if removed > 0 {
                info!(removed, "Pruned stale access tokens");
            } else {
                debug!("No stale access tokens to prune");
            }
            removed
        }
        Err(e) => {
            warn!(error = %e, "Failed to prune access tokens");
            0
        }
    }
}

/// Runs [`prune_tokens`] every `period` until the handle is aborted
pub fn spawn_token_pruner(pool: PgPool, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            prune_tokens(&pool).await;
        }
    })
}
