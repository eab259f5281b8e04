//! Score table stored as a JSON array on disk
//!
//! The file must exist before the table can be used, the way a hosted table
//! has to be created first. Writes go to a sibling temp file which is then
//! renamed over the table.

use std::path::{Path, PathBuf};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::Mutex;

use super::{LeaderboardBackend, LeaderboardEntry, LeaderboardError, TableInfo};

#[derive(Debug)]
pub struct FileLeaderboard {
    table_name: String,
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl FileLeaderboard {
    /// Use an existing table file
    pub fn open(table_name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            table_name: table_name.into(),
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Use the table file at `path`, creating an empty one if missing
    pub async fn create(
        table_name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, LeaderboardError> {
        let table = Self::open(table_name, path);
        if tokio::fs::try_exists(&table.path).await? {
            return Ok(table);
        }
        if let Some(parent) = table.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        table.write_entries(&[]).await?;
        log::info!(
            "Created table '{}' at {}",
            table.table_name,
            table.path.display()
        );
        Ok(table)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LeaderboardError::TableNotFound(self.table_name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl LeaderboardBackend for FileLeaderboard {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn describe(&self) -> BoxFuture<'_, Result<TableInfo, LeaderboardError>> {
        async move {
            let entries = self.read_entries().await?;
            Ok(TableInfo {
                name: self.table_name.clone(),
                status: "ACTIVE".to_string(),
                item_count: entries.len(),
            })
        }
        .boxed()
    }

    fn put_item(&self, entry: LeaderboardEntry) -> BoxFuture<'_, Result<(), LeaderboardError>> {
        async move {
            let _guard = self.write_lock.lock().await;
            let mut entries = self.read_entries().await?;
            entries.push(entry);
            self.write_entries(&entries).await
        }
        .boxed()
    }

    fn scan_times(&self) -> BoxFuture<'_, Result<Vec<f32>, LeaderboardError>> {
        async move {
            let entries = self.read_entries().await?;
            Ok(entries.into_iter().map(|e| e.time).collect())
        }
        .boxed()
    }
}
