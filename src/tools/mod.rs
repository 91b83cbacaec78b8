//! Tool surface
//!
//! Named operations the hosting assistant runtime can call with JSON
//! arguments. Each tool describes its parameters as a JSON schema.

pub mod flight_tools;

use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub use flight_tools::{SearchAirportTool, SearchFlightsTool};

/// A callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the runtime calls the tool by
    fn name(&self) -> &str;

    /// What the tool does, for the model
    fn description(&self) -> &str;

    /// JSON schema of the arguments object
    fn parameters(&self) -> Value;

    /// Run the tool
    async fn call(&self, arguments: Value) -> Result<Value, AppError>;
}

/// Tool description as published to the runtime
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: Value,
}

/// Registered tools, listed in name order
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool of the same name
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        let name = tool.name().to_string();
        tracing::debug!(tool = %name, "Registered tool");
        self.tools.insert(name, Box::new(tool));
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Definitions of every registered tool
    pub fn list_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters(),
            })
            .collect()
    }

    /// Call `name` with `arguments`
    ///
    /// Some runtimes send the arguments object JSON-encoded as a string; that
    /// form is decoded first.
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<Value, AppError> {
        let tool = self
            .get(name)
            .ok_or_else(|| AppError::ToolNotFound(name.to_string()))?;

        let arguments = match arguments {
            Value::String(encoded) => serde_json::from_str(&encoded).map_err(|e| {
                AppError::InvalidArguments(format!("arguments are not valid JSON: {}", e))
            })?,
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        tracing::info!(tool = %name, "Invoking tool");
        tool.call(arguments).await
    }
}
