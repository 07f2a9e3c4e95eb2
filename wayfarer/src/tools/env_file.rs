//! Read the first `.env` file found under a directory.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{json, Value};
use walkdir::WalkDir;

use super::{required_str, Tool, ToolCallContent, ToolError, ToolSpec};

pub const TOOL_ENV_CONTENT: &str = "env_content";

/// Walks a directory tree (sorted by file name) and returns the content of the first
/// `.env` file.
#[derive(Debug, Default)]
pub struct EnvContentTool;

impl EnvContentTool {
    pub fn new() -> Self {
        Self
    }
}

fn find_env_file(root: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|e| e.file_type().is_file() && e.file_name() == ".env")
        .map(|e| e.into_path())
}

#[async_trait]
impl Tool for EnvContentTool {
    fn name(&self) -> &str {
        TOOL_ENV_CONTENT
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            TOOL_ENV_CONTENT,
            "Search a local directory and its subdirectories for a .env file and return its \
             complete content.",
            json!({
                "type": "object",
                "properties": {
                    "dir_path": {
                        "type": "string",
                        "description": "Local directory to search (not a URL)"
                    }
                },
                "required": ["dir_path"]
            }),
        )
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolError> {
        let dir = required_str(&args, "dir_path")?.to_string();
        let search_dir = dir.clone();
        let found = tokio::task::spawn_blocking(move || find_env_file(&search_dir))
            .await
            .map_err(|e| ToolError::Execution(format!("search task failed: {e}")))?;
        let Some(path) = found else {
            return Ok(ToolCallContent::new(format!("No .env file found in {dir}")));
        };
        tracing::debug!(path = %path.display(), "reading .env file");
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ToolError::Execution(format!("cannot read {}: {e}", path.display())))?;
        Ok(ToolCallContent::new(text))
    }
}
