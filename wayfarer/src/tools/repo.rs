//! Download a Git repository's branch archive and unpack it under the data directory.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{required_str, Tool, ToolCallContent, ToolError, ToolSpec};

pub const TOOL_DOWNLOAD_REPO: &str = "download_and_extract_repo";

const MAX_ATTEMPTS: usize = 3;
const TEMP_DIR: &str = "_temp_extract";

/// Fetches `<repo>/archive/refs/heads/main.zip` (or `master.zip` when main is missing) and
/// extracts it into `<data_dir>/repo`, replacing whatever was there.
pub struct DownloadRepoTool {
    client: reqwest::Client,
    data_dir: PathBuf,
}

impl DownloadRepoTool {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            data_dir: data_dir.into(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Directory the archive is extracted into.
    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("repo")
    }

    /// Archive bytes, trying `main` then `master`, up to [`MAX_ATTEMPTS`] times.
    async fn download(&self, repo_url: &str) -> Result<Vec<u8>, ToolError> {
        let main_url = format!("{repo_url}/archive/refs/heads/main.zip");
        let master_url = format!("{repo_url}/archive/refs/heads/master.zip");
        let mut last_status = None;
        for attempt in 1..=MAX_ATTEMPTS {
            tracing::debug!(url = %main_url, attempt, "downloading repository archive");
            let mut response = self.get(&main_url).await?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                tracing::debug!(url = %master_url, attempt, "main branch missing, trying master");
                response = self.get(&master_url).await?;
            }
            if response.status().is_success() {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| ToolError::Transport(e.to_string()))?;
                return Ok(bytes.to_vec());
            }
            tracing::warn!(status = %response.status(), attempt, "failed to download repository");
            last_status = Some(response.status());
        }
        Err(ToolError::Transport(format!(
            "failed to download repository after {MAX_ATTEMPTS} attempts (last status: {})",
            last_status.map_or_else(|| "none".to_string(), |s| s.to_string())
        )))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ToolError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))
    }

    /// Downloads, then swaps the archive into `output_dir` on the blocking pool. The blocking
    /// half outlives a dropped future, so it checks `cancelled` and removes `output_dir`
    /// itself.
    async fn fetch_into(
        &self,
        repo_url: &str,
        output_dir: &Path,
        cancelled: Arc<AtomicBool>,
    ) -> Result<(), ToolError> {
        let bytes = self.download(repo_url).await?;
        let dir = output_dir.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let result = install_archive(bytes, &dir);
            if cancelled.load(Ordering::SeqCst) {
                remove_quietly(&dir);
                return Err(ToolError::Execution("repository download was cancelled".into()));
            }
            result
        })
        .await
        .map_err(|e| ToolError::Execution(format!("extract task failed: {e}")))?
    }
}

/// Removes the extraction directory unless disarmed.
///
/// Lives across the whole `call`, so the directory is cleaned both when the call fails and
/// when its future is dropped by a deadline.
struct CleanupGuard {
    dir: PathBuf,
    cancelled: Arc<AtomicBool>,
    armed: bool,
}

impl CleanupGuard {
    fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            cancelled: Arc::new(AtomicBool::new(false)),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.cancelled.store(true, Ordering::SeqCst);
        remove_quietly(&self.dir);
    }
}

fn remove_quietly(dir: &Path) {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => tracing::debug!(dir = %dir.display(), "removed repository after failed download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::debug!(error = %e, "cleanup after failed download"),
    }
}

/// Replaces `output_dir` with the archive's contents.
fn install_archive(bytes: Vec<u8>, output_dir: &Path) -> Result<(), ToolError> {
    if output_dir.exists() {
        tracing::info!(dir = %output_dir.display(), "replacing existing repository");
        std::fs::remove_dir_all(output_dir)
            .map_err(|e| ToolError::Execution(format!("cannot remove old repository: {e}")))?;
    }
    std::fs::create_dir_all(output_dir)
        .map_err(|e| ToolError::Execution(format!("cannot create {}: {e}", output_dir.display())))?;
    extract_flattened(bytes, output_dir)
}

/// Strips a trailing `.git` and then a trailing `/`.
fn normalize_repo_url(url: &str) -> &str {
    let url = url.trim();
    let url = url.strip_suffix(".git").unwrap_or(url);
    url.strip_suffix('/').unwrap_or(url)
}

/// Unzips into a temp dir under `output_dir`, then moves the contents of the archive's
/// top-level folder up into `output_dir`.
fn extract_flattened(bytes: Vec<u8>, output_dir: &Path) -> Result<(), ToolError> {
    let temp = output_dir.join(TEMP_DIR);
    std::fs::create_dir_all(&temp).map_err(io_err)?;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ToolError::Execution(format!("invalid zip file: {e}")))?;
    archive
        .extract(&temp)
        .map_err(|e| ToolError::Execution(format!("invalid zip file: {e}")))?;

    let mut nested: Vec<PathBuf> = std::fs::read_dir(&temp)
        .map_err(io_err)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    nested.sort();
    if let Some(top) = nested.first() {
        for entry in std::fs::read_dir(top).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            std::fs::rename(entry.path(), output_dir.join(entry.file_name())).map_err(io_err)?;
        }
    }
    std::fs::remove_dir_all(&temp).map_err(io_err)
}

fn io_err(e: std::io::Error) -> ToolError {
    ToolError::Execution(format!("OS error occurred: {e}"))
}

#[async_trait]
impl Tool for DownloadRepoTool {
    fn name(&self) -> &str {
        TOOL_DOWNLOAD_REPO
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            TOOL_DOWNLOAD_REPO,
            "Download a Git repository as a ZIP archive (main or master branch) and extract it \
             to the local data/repo directory, replacing any previous download. Returns the \
             path of the extracted repository.",
            json!({
                "type": "object",
                "properties": {
                    "repo_url": {
                        "type": "string",
                        "description": "Full URL of the repository, e.g. https://github.com/user/repo"
                    }
                },
                "required": ["repo_url"]
            }),
        )
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolError> {
        let repo_url = normalize_repo_url(required_str(&args, "repo_url")?);
        if repo_url.is_empty() {
            return Err(ToolError::InvalidInput("repo_url is empty".into()));
        }
        let output_dir = self.output_dir();
        let mut guard = CleanupGuard::new(output_dir.clone());
        self.fetch_into(repo_url, &output_dir, Arc::clone(&guard.cancelled))
            .await?;
        guard.disarm();
        Ok(ToolCallContent::new(output_dir.display().to_string()))
    }
}
