//! Background maintenance tasks.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::time::interval;
use tracing::{debug, error, info};

use fintrack_db::BudgetRepository;

/// Spawns the budget lifecycle sweeper.
///
/// On every tick the sweeper flips all budgets whose end date has passed to
/// inactive in one batch. A failed sweep is logged and retried on the next
/// tick; the task never exits.
pub fn spawn_budget_sweeper(db: Arc<DatabaseConnection>, interval_secs: u64) {
    tokio::spawn(async move {
        info!(interval_secs, "Starting budget lifecycle sweeper");
        sweep_expired_budgets(db, interval_secs).await;
    });
}

async fn sweep_expired_budgets(db: Arc<DatabaseConnection>, interval_secs: u64) {
    let repo = BudgetRepository::new((*db).clone());
    let mut interval = interval(Duration::from_secs(interval_secs));
    // The first tick fires immediately; skip it so a fresh boot does not
    // race the migrator.
    interval.tick().await;

    loop {
        interval.tick().await;

        match repo.deactivate_expired().await {
            Ok(0) => debug!("No expired budgets"),
            Ok(n) => info!(count = n, "Deactivated expired budgets"),
            Err(e) => error!(error = %e, "Budget sweep failed"),
        }
    }
}
