//! Name-based dispatch over a set of tools.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::builtin::all_tools;
use super::operations::KnotTools;
use super::tool::Tool;
use super::types::ToolDefinition;
use super::validation::validate_arguments;
use super::ToolArguments;
use crate::config::KnotConfig;
use crate::error::{into_envelope, KnotError, Result};

/// Ordered collection of tools, dispatched by name.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Registry of the four knot tools over `ops`.
    pub fn knot(ops: Arc<KnotTools>) -> Self {
        Self::new(all_tools(ops))
    }

    /// Registry of the knot tools over an HTTP backend.
    pub fn from_config(config: KnotConfig) -> Result<Self> {
        Ok(Self::knot(Arc::new(KnotTools::from_config(config)?)))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Validate `args` against the tool's schema, then execute it.
    pub async fn call(&self, name: &str, args: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| KnotError::UnknownTool(name.to_string()))?;
        validate_arguments(&args, &tool.parameters().schema)?;
        tool.execute(&ToolArguments::new(args)).await
    }

    /// Like [`call`](Self::call), but always yields an envelope.
    pub async fn dispatch(&self, name: &str, args: Value) -> Value {
        let result = self.call(name, args).await;
        match &result {
            Ok(_) => debug!(tool = name, "tool call succeeded"),
            Err(e) => warn!(tool = name, kind = %e.kind(), error = %e, "tool call failed"),
        }
        into_envelope(result)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
