use std::path::{Path, PathBuf};
use tokio::fs::{create_dir_all, OpenOptions};
use tokio::io;
use tokio::io::AsyncWriteExt;

/// Per-run artifact writer. Every package attempt leaves up to three files
/// under the run's log directory: `<pkg>.log`, `<pkg>.result`, `<pkg>.time`.
pub struct RunLogs {
    base_path: PathBuf,
}

impl RunLogs {
    pub fn new(base_path: &Path) -> RunLogs {
        RunLogs {
            base_path: base_path.to_path_buf(),
        }
    }

    pub fn package_log_path(&self, package: &str) -> PathBuf {
        self.base_path.join(format!("{package}.log"))
    }

    async fn ensure_dir(&self) -> Result<(), io::Error> {
        if !self.base_path.exists() {
            create_dir_all(&self.base_path).await?;
        }
        Ok(())
    }

    pub async fn append_log(&self, package: &str, data: &[u8]) -> Result<(), io::Error> {
        self.ensure_dir().await?;
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.package_log_path(package))
            .await?;
        file.write_all(data).await?;
        Ok(())
    }

    pub async fn write_result(&self, package: &str, code: i64) -> Result<(), io::Error> {
        self.ensure_dir().await?;
        let path = self.base_path.join(format!("{package}.result"));
        tokio::fs::write(path, format!("{code}\n")).await
    }

    pub async fn write_time(&self, package: &str, seconds: u64) -> Result<(), io::Error> {
        self.ensure_dir().await?;
        let path = self.base_path.join(format!("{package}.time"));
        tokio::fs::write(path, format!("{seconds}\n")).await
    }
}
