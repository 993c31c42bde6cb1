//! Named-capability wrapper so an agent layer can discover and call the
//! most-cited lookup with plain string results.

use crate::config::ScraperConfig;
use crate::fetcher::Fetcher;
use crate::renderers::Renderer;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Registration data an agent framework needs to expose a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name.
    pub name: String,
    /// Description of what the tool does.
    pub description: String,
    /// JSON Schema for the tool's arguments.
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            input_schema: json!({}),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Sets the input schema.
    #[must_use]
    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = schema;
        self
    }
}

pub const TOOL_NAME: &str = "find_most_cited";

/// Prefix of every failure string returned by the tool
pub const ERROR_PREFIX: &str = "Error during scraping: ";

fn most_cited_definition(config: &ScraperConfig) -> ToolDefinition {
    ToolDefinition::new(TOOL_NAME)
        .with_description(format!(
            "Searches {} for articles about a topic and returns the most cited one \
             as \"<title> (<n> citations): <link>\".",
            config.base_url
        ))
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Topic to search for, e.g. \"bipolar disorder\""
                }
            },
            "required": ["query"]
        }))
}

/// The most-cited lookup exposed as a tool. Every call returns text; errors
/// never escape.
#[derive(Debug, Clone)]
pub struct MostCitedTool<R> {
    definition: ToolDefinition,
    fetcher: Fetcher<R>,
}

impl<R: Renderer> MostCitedTool<R> {
    pub fn new(fetcher: Fetcher<R>) -> Self {
        Self {
            definition: most_cited_definition(fetcher.config()),
            fetcher,
        }
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    /// Looks up the most-cited article for `query`.
    ///
    /// Returns `"<title> (<n> citations): <link>"`, `"No articles found."` or
    /// `"Error during scraping: <message>"`.
    pub async fn call(&self, query: &str) -> String {
        match self.fetcher.find_most_cited(query).await {
            Ok(result) => {
                ::log::info!("{} result for {:?}: {}", TOOL_NAME, query, result);
                result.to_string()
            }
            Err(e) => {
                ::log::error!("{} failed for {:?}: {}", TOOL_NAME, query, e);
                format!("{ERROR_PREFIX}{e}")
            }
        }
    }

    /// Calls the tool with JSON arguments of the shape `{"query": "..."}`
    pub async fn invoke(&self, arguments: &serde_json::Value) -> String {
        match arguments.get("query").and_then(serde_json::Value::as_str) {
            Some(query) => self.call(query).await,
            None => {
                ::log::warn!("{} called without a query: {}", TOOL_NAME, arguments);
                format!("{ERROR_PREFIX}missing string argument `query`")
            }
        }
    }
}
