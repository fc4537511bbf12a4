use async_trait::async_trait;
use dashmap::DashSet;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader},
    sync::Mutex,
};
use tracing::{debug, instrument, warn};

use crate::record::ArticleRecord;
use crate::store::{RecordStore, errors::StoreError};

/// Just enough of a record to recover its source URL.
#[derive(Deserialize)]
struct UrlProbe {
    meta: ProbeMeta,
}

#[derive(Deserialize)]
struct ProbeMeta {
    data_info: ProbeDataInfo,
}

#[derive(Deserialize)]
struct ProbeDataInfo {
    url: String,
}

/// Append-only JSON Lines file, one record per line.
pub struct JsonlStore {
    path: PathBuf,
    writer: Mutex<Option<File>>,
    known: DashSet<String>,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(None),
            known: DashSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Open the output for appending. A tail left without a newline by an
/// interrupted run is terminated first so the next record starts on its own line.
async fn open_for_append(path: &Path) -> std::io::Result<File> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .await?;

    if file.metadata().await?.len() > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).await?;
        file.read_exact(&mut last).await?;
        if last[0] != b'\n' {
            debug!("Terminating partial trailing line in output file");
            file.write_all(b"\n").await?;
        }
    }
    Ok(file)
}

/// Source URL of one stored line, or `None` when the line is not a record.
pub fn url_from_line(line: &str) -> Option<String> {
    serde_json::from_str::<UrlProbe>(line)
        .ok()
        .map(|probe| probe.meta.data_info.url)
}

#[async_trait]
impl RecordStore for JsonlStore {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn seen_urls(&self) -> Result<HashSet<String>, StoreError> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No existing output, starting fresh");
                return Ok(HashSet::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut seen = HashSet::new();
        let mut lines = BufReader::new(file).lines();
        let mut line_no = 0usize;
        while let Some(line) = lines.next_line().await.map_err(|e| self.io_error(e))? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            match url_from_line(&line) {
                Some(url) => {
                    self.known.insert(url.clone());
                    seen.insert(url);
                }
                None => warn!("Skipping malformed line {} in output file", line_no),
            }
        }

        Ok(seen)
    }

    async fn append(&self, record: &ArticleRecord) -> Result<(), StoreError> {
        let url = record.url().to_string();
        let mut line = serde_json::to_string(record).map_err(|source| StoreError::Serialize {
            url: url.clone(),
            source,
        })?;
        line.push('\n');

        if !self.known.insert(url.clone()) {
            return Err(StoreError::Duplicate(url));
        }

        let mut writer = self.writer.lock().await;
        let result = async {
            if writer.is_none() {
                *writer = Some(open_for_append(&self.path).await?);
            }
            if let Some(file) = writer.as_mut() {
                file.write_all(line.as_bytes()).await?;
                file.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        }
        .await;

        if let Err(e) = result {
            // reopen on the next append so a partially written line gets terminated
            *writer = None;
            self.known.remove(&url);
            return Err(self.io_error(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Assembler, AssemblyInput, SiteProfile};
    use std::sync::Arc;

    fn record(url: &str) -> ArticleRecord {
        let content = "z".repeat(200);
        Assembler::new(SiteProfile::new("example.com"))
            .assemble(AssemblyInput {
                url,
                title: "Title",
                content: &content,
                has_recipe: false,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("out.jsonl"));
        assert!(store.seen_urls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_resume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        let store = JsonlStore::new(&path);
        store.append(&record("https://x/a")).await.unwrap();
        store.append(&record("https://x/b")).await.unwrap();

        let reopened = JsonlStore::new(&path);
        let seen = reopened.seen_urls().await.unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("https://x/a"));
        assert!(seen.contains("https://x/b"));
    }

    #[tokio::test]
    async fn test_malformed_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let good = serde_json::to_string(&record("https://x/good")).unwrap();
        let contents = format!(
            "{good}\nnot json at all\n\n{{\"meta\":{{\"data_info\":{{}}}}}}\n{{\"ID\":\"truncated"
        );
        tokio::fs::write(&path, contents).await.unwrap();

        let seen = JsonlStore::new(&path).seen_urls().await.unwrap();
        assert_eq!(seen, HashSet::from(["https://x/good".to_string()]));
    }

    #[tokio::test]
    async fn test_append_after_truncated_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let first = serde_json::to_string(&record("https://x/a")).unwrap();
        tokio::fs::write(&path, format!("{first}\n{{\"ID\":\"trunc"))
            .await
            .unwrap();

        let store = JsonlStore::new(&path);
        assert_eq!(store.seen_urls().await.unwrap().len(), 1);
        store.append(&record("https://x/b")).await.unwrap();
        store.append(&record("https://x/c")).await.unwrap();

        let seen = JsonlStore::new(&path).seen_urls().await.unwrap();
        assert_eq!(
            seen,
            HashSet::from([
                "https://x/a".to_string(),
                "https://x/b".to_string(),
                "https://x/c".to_string(),
            ])
        );

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "{\"ID\":\"trunc");
        assert!(contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_append_to_empty_file_adds_no_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        tokio::fs::write(&path, "").await.unwrap();

        let store = JsonlStore::new(&path);
        store.append(&record("https://x/a")).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(!contents.starts_with('\n'));
        assert_eq!(contents.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let store = JsonlStore::new(&path);
        store.append(&record("https://x/a")).await.unwrap();
        let err = store.append(&record("https://x/a")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(url) if url == "https://x/a"));

        let reopened = JsonlStore::new(&path);
        reopened.seen_urls().await.unwrap();
        assert!(matches!(
            reopened.append(&record("https://x/a")).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let store = Arc::new(JsonlStore::new(&path));

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(&record(&format!("https://x/{i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 32);
        let urls: HashSet<String> = lines
            .iter()
            .map(|line| {
                serde_json::from_str::<ArticleRecord>(line)
                    .unwrap()
                    .url()
                    .to_string()
            })
            .collect();
        assert_eq!(urls.len(), 32);
    }
}
