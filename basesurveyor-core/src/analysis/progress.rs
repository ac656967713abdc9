//! Progress notifications emitted while a base is analyzed.

/// Receives progress notifications from the schema builder.
///
/// Notifications are side effects only; nothing an observer does can
/// influence the resulting model.
pub trait ProgressObserver: Send + Sync {
    /// Called before the table at `index` (0-based) of `total` is walked.
    fn table_started(&self, index: usize, total: usize, table_name: &str);

    /// Called once after all tables were walked, before derivation.
    fn tables_finished(&self, _total: usize) {}
}

/// Reports progress through `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn table_started(&self, index: usize, total: usize, table_name: &str) {
        tracing::info!(
            "Analyzing table {}/{}: {}",
            index.saturating_add(1),
            total,
            table_name
        );
    }

    fn tables_finished(&self, total: usize) {
        tracing::info!("Analyzed {} tables", total);
    }
}

/// Discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn table_started(&self, _index: usize, _total: usize, _table_name: &str) {}
}
