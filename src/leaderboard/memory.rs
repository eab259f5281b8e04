//! In-process score table

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::RwLock;

use super::{LeaderboardBackend, LeaderboardEntry, LeaderboardError, TableInfo};

#[derive(Debug)]
pub struct MemoryLeaderboard {
    table_name: String,
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl MemoryLeaderboard {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::with_entries(table_name, Vec::new())
    }

    pub fn with_entries(table_name: impl Into<String>, entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            table_name: table_name.into(),
            entries: RwLock::new(entries),
        }
    }

    /// Snapshot of every stored item
    pub async fn entries(&self) -> Vec<LeaderboardEntry> {
        self.entries.read().await.clone()
    }
}

impl LeaderboardBackend for MemoryLeaderboard {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn describe(&self) -> BoxFuture<'_, Result<TableInfo, LeaderboardError>> {
        async move {
            Ok(TableInfo {
                name: self.table_name.clone(),
                status: "ACTIVE".to_string(),
                item_count: self.entries.read().await.len(),
            })
        }
        .boxed()
    }

    fn put_item(&self, entry: LeaderboardEntry) -> BoxFuture<'_, Result<(), LeaderboardError>> {
        async move {
            self.entries.write().await.push(entry);
            Ok(())
        }
        .boxed()
    }

    fn scan_times(&self) -> BoxFuture<'_, Result<Vec<f32>, LeaderboardError>> {
        async move { Ok(self.entries.read().await.iter().map(|e| e.time).collect()) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_describe_counts_items() {
        let table = MemoryLeaderboard::with_entries(
            "GameLeaderboard",
            vec![
                LeaderboardEntry::new("Player1", 3.0),
                LeaderboardEntry::new("Player2", 1.0),
            ],
        );
        let info = table.describe().await.unwrap();
        assert_eq!(info.name, "GameLeaderboard");
        assert_eq!(info.status, "ACTIVE");
        assert_eq!(info.item_count, 2);
    }

    #[tokio::test]
    async fn test_scan_keeps_storage_order() {
        let table = MemoryLeaderboard::new("GameLeaderboard");
        table.put_item(LeaderboardEntry::new("Player1", 3.0)).await.unwrap();
        table.put_item(LeaderboardEntry::new("Player2", 1.0)).await.unwrap();
        assert_eq!(table.scan_times().await.unwrap(), vec![3.0, 1.0]);
    }
}
