use async_trait::async_trait;
use serde_json::Value;

use super::{ToolCallContent, ToolError, ToolSpec};

/// A named capability the model can request.
///
/// `call` receives the parsed JSON arguments object. Implementations should return errors
/// as [`ToolError`] rather than panicking; the caller reports them back to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; must equal `spec().name`.
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolError>;
}
